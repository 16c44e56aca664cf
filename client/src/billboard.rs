use crate::settings::Settings;
use bevy::prelude::*;
use controller::{AdCarousel, AdSequence, BillboardHost, BillboardPlacement};

/// Advertisement textures, in manifest order, ready to show.
#[derive(Message, Debug)]
pub struct AdsLoaded(pub AdSequence<Handle<Image>>);

/// The mounted billboard and its rotation state.
#[derive(Resource)]
pub struct Billboard(pub AdCarousel<Handle<Image>, Handle<StandardMaterial>>);

#[derive(Component, Debug)]
pub struct BillboardSurface;

/// Spawns billboard quads and swaps their material's texture.
struct SceneBillboards<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    meshes: &'a mut Assets<Mesh>,
    materials: &'a mut Assets<StandardMaterial>,
}

impl BillboardHost<Handle<Image>> for SceneBillboards<'_, '_, '_> {
    type Surface = Handle<StandardMaterial>;

    fn spawn_billboard(
        &mut self,
        placement: &BillboardPlacement,
        texture: &Handle<Image>,
    ) -> Handle<StandardMaterial> {
        let [width, height] = placement.size;
        let material = self.materials.add(StandardMaterial {
            base_color_texture: Some(texture.clone()),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });
        self.commands.spawn((
            Name::new("Billboard"),
            BillboardSurface,
            Mesh3d(self.meshes.add(Rectangle::new(width, height))),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(Vec3::from_array(placement.position))
                .with_rotation(Quat::from_rotation_y(placement.yaw)),
        ));
        material
    }

    fn set_texture(&mut self, surface: &Handle<StandardMaterial>, texture: &Handle<Image>) {
        // Mutable access marks the material changed, which re-extracts it for the next frame.
        if let Some(material) = self.materials.get_mut(surface) {
            material.base_color_texture = Some(texture.clone());
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Update, (mount_ads, rotate_ads).chain());
    app.add_systems(Last, stop_on_exit);
}

fn mount_ads(
    mut commands: Commands,
    mut msgs: MessageReader<AdsLoaded>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<Settings>,
) {
    for AdsLoaded(sequence) in msgs.read() {
        let mut carousel = AdCarousel::new(
            sequence.clone(),
            BillboardPlacement::default(),
            settings.0.tunables.ad_interval(),
        );
        let mut host = SceneBillboards {
            commands: &mut commands,
            meshes: &mut *meshes,
            materials: &mut *materials,
        };
        if carousel.create_ad_mesh(&mut host).is_ok() {
            commands.insert_resource(Billboard(carousel));
        }
    }
}

fn rotate_ads(
    mut commands: Commands,
    billboard: Option<ResMut<Billboard>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    time: Res<Time>,
) {
    let Some(mut billboard) = billboard else {
        return;
    };
    let mut host = SceneBillboards {
        commands: &mut commands,
        meshes: &mut *meshes,
        materials: &mut *materials,
    };
    let swaps = billboard.0.advance(time.delta(), &mut host);
    if swaps > 0 {
        trace!(index = billboard.0.sequence().index(), "billboard texture swapped");
    }
}

fn stop_on_exit(mut exits: MessageReader<AppExit>, billboard: Option<ResMut<Billboard>>) {
    if exits.read().next().is_none() {
        return;
    }
    if let Some(mut billboard) = billboard {
        billboard.0.stop_rotation();
    }
}
