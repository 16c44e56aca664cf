use bevy::{
    gltf::Gltf,
    light::{AmbientLight, NotShadowCaster, NotShadowReceiver},
    prelude::*,
    transform::TransformSystems,
};
use controller::constants::{LEVEL_OFFSET, LEVEL_ROTATION_X, LEVEL_SCALE};

#[derive(Component, Debug)]
pub struct Level;

/// Shadow behaviour for every mesh spawned under a scene root.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowRole {
    /// Receives shadows, never casts them.
    Receiver,
    /// Casts shadows, never receives them.
    Caster,
}

/// The key light.
#[derive(Component, Debug)]
pub struct SunLight;

/// Keeps a light aimed at an entity's world position.
#[derive(Component, Debug)]
pub struct LightTarget(pub Entity);

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 400.0,
        ..default()
    });

    app.add_systems(Startup, add_lights);
    app.add_systems(PostUpdate, apply_shadow_roles);
    app.add_systems(
        PostUpdate,
        aim_lights.before(TransformSystems::Propagate),
    );
}

fn add_lights(mut commands: Commands) {
    commands.spawn((
        Name::new("Sun"),
        SunLight,
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(5.0, 10.0, 7.5).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Rotated upside-right, lifted and scaled down to the character's units.
pub fn level_transform() -> Transform {
    Transform {
        translation: Vec3::from_array(LEVEL_OFFSET),
        rotation: Quat::from_rotation_x(LEVEL_ROTATION_X),
        scale: Vec3::splat(LEVEL_SCALE),
    }
}

/// First scene of a glTF, preferring the one it marks as default.
pub fn primary_scene(gltf: &Gltf) -> Option<Handle<Scene>> {
    gltf.default_scene
        .clone()
        .or_else(|| gltf.scenes.first().cloned())
}

/// Queues the level root. `None` when the asset has no scene to show; nothing is spawned then.
pub fn spawn_level(commands: &mut Commands, scene: Option<Handle<Scene>>) -> Option<Entity> {
    let Some(scene) = scene else {
        error!("level asset has no scene, nothing to insert");
        return None;
    };
    let level = commands
        .spawn((
            Name::new("Level"),
            Level,
            ShadowRole::Receiver,
            SceneRoot(scene),
            level_transform(),
        ))
        .id();
    info!("level inserted");
    Some(level)
}

/// Meshes show up a few frames after their scene root, so roles are applied as they appear.
fn apply_shadow_roles(
    mut commands: Commands,
    roots: Query<(Entity, &ShadowRole)>,
    children: Query<&Children>,
    new_meshes: Query<(), Added<Mesh3d>>,
) {
    for (root, role) in &roots {
        for entity in children.iter_descendants(root) {
            if !new_meshes.contains(entity) {
                continue;
            }
            match role {
                ShadowRole::Receiver => commands.entity(entity).insert(NotShadowCaster),
                ShadowRole::Caster => commands.entity(entity).insert(NotShadowReceiver),
            };
        }
    }
}

fn aim_lights(
    mut lights: Query<(&mut Transform, &LightTarget)>,
    targets: Query<&GlobalTransform>,
) {
    for (mut transform, target) in &mut lights {
        let Ok(target) = targets.get(target.0) else {
            continue;
        };
        transform.look_at(target.translation(), Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::world::CommandQueue;

    fn spawn_into(world: &mut World, scene: Option<Handle<Scene>>) -> Option<Entity> {
        let mut queue = CommandQueue::default();
        let level = {
            let mut commands = Commands::new(&mut queue, world);
            spawn_level(&mut commands, scene)
        };
        queue.apply(world);
        level
    }

    #[test]
    fn sceneless_level_spawns_nothing() {
        let mut world = World::new();
        assert_eq!(spawn_into(&mut world, None), None);
        assert_eq!(world.query::<&Level>().iter(&world).count(), 0);
    }

    #[test]
    fn level_with_a_scene_gets_a_receiving_root() {
        let mut world = World::new();
        let level = spawn_into(&mut world, Some(Handle::default())).unwrap();

        let entity = world.entity(level);
        assert!(entity.contains::<Level>());
        assert_eq!(entity.get::<ShadowRole>(), Some(&ShadowRole::Receiver));
        assert_eq!(entity.get::<Transform>(), Some(&level_transform()));
    }

    #[test]
    fn level_transform_flips_lifts_and_shrinks() {
        let transform = level_transform();
        assert_eq!(transform.translation, Vec3::new(0.0, 0.2, 0.0));
        assert_eq!(transform.scale, Vec3::splat(0.03));
        let up = transform.rotation * Vec3::Y;
        assert!((up - Vec3::NEG_Y).length() < 1e-5);
    }
}
