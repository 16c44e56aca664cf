use bevy::{core_pipeline::tonemapping::Tonemapping, prelude::*};
use controller::constants::{
    CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_LOOK_AT, CAMERA_NEAR, CAMERA_OFFSET,
};

/// The single scene camera. Sits in world space until the character's rig is bound, then rides
/// along as its child.
#[derive(Component, Debug)]
pub struct PlayerCamera;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, add_camera);
}

fn add_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("Camera"),
        PlayerCamera,
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: CAMERA_FOV_DEG.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..default()
        }),
        Tonemapping::AcesFitted,
        follow_transform(),
    ));
}

/// Over the shoulder, looking at the character's chest. Also the world-space pose before the
/// character exists, since the character spawns at the origin.
pub fn follow_transform() -> Transform {
    Transform::from_translation(Vec3::from_array(CAMERA_OFFSET))
        .looking_at(Vec3::from_array(CAMERA_LOOK_AT), Vec3::Y)
}

/// Parents the camera to `character`, keeping [`follow_transform`] as its local offset.
pub fn attach_to(commands: &mut Commands, camera: Entity, character: Entity) {
    commands.entity(character).add_child(camera);
    commands.entity(camera).insert(follow_transform());
}
