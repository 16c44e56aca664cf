use crate::{
    animation::FadeIn,
    camera::{self, PlayerCamera},
    game_loop::Game,
    level::{LightTarget, ShadowRole, SunLight, primary_scene},
};
use bevy::{gltf::Gltf, prelude::*};
use controller::{ClipTable, ClipTableError, Pose};

/// A character glTF is available in `Assets<Gltf>`.
#[derive(Message, Debug)]
pub struct CharacterLoaded(pub Handle<Gltf>);

#[derive(Component, Debug)]
pub struct PlayerCharacter;

/// Simulated pose; the render transform follows it.
#[derive(Component, Debug, Default)]
pub struct CharacterPose(pub Pose);

/// Marks the character's bound `AnimationPlayer`.
#[derive(Component, Debug)]
pub struct CharacterRig;

/// Graph and clip table waiting for the scene's `AnimationPlayer` to spawn.
#[derive(Component)]
struct PendingRig {
    graph: Handle<AnimationGraph>,
    clips: ClipTable<AnimationNodeIndex>,
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Update, insert_character);
    app.add_systems(PreUpdate, bind_rig);
}

fn insert_character(
    mut commands: Commands,
    mut msgs: MessageReader<CharacterLoaded>,
    gltfs: Res<Assets<Gltf>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
) {
    for CharacterLoaded(handle) in msgs.read() {
        let Some(gltf) = gltfs.get(handle) else {
            error!("character asset vanished before insertion");
            continue;
        };
        let Some(scene) = primary_scene(gltf) else {
            error!("character asset has no scene, nothing to insert");
            continue;
        };

        let root = commands
            .spawn((
                Name::new("Character"),
                PlayerCharacter,
                CharacterPose::default(),
                ShadowRole::Caster,
                SceneRoot(scene),
                Transform::default(),
            ))
            .id();
        info!("character inserted");

        let named = gltf
            .named_animations
            .iter()
            .map(|(name, clip)| (&**name, clip));
        match build_rig(named) {
            Ok((graph, clips)) => {
                commands.entity(root).insert(PendingRig {
                    graph: graphs.add(graph),
                    clips,
                });
            }
            // Without a full clip table the game loop never opens its gate.
            Err(err) => error!("{err}, character stays in its bind pose"),
        }
    }
}

/// One graph node per named clip, and the clip table over those nodes.
fn build_rig<'a>(
    named: impl IntoIterator<Item = (&'a str, &'a Handle<AnimationClip>)>,
) -> Result<(AnimationGraph, ClipTable<AnimationNodeIndex>), ClipTableError> {
    let mut graph = AnimationGraph::new();
    let nodes: Vec<(&str, AnimationNodeIndex)> = named
        .into_iter()
        .map(|(name, clip)| (name, graph.add_clip(clip.clone(), 1.0, graph.root)))
        .collect();
    let clips = ClipTable::from_named(nodes)?;
    Ok((graph, clips))
}

/// Once the character's `AnimationPlayer` exists: hand it the graph, give the game loop its clip
/// table, then pick up the camera and the key light.
fn bind_rig(
    mut commands: Commands,
    mut game: ResMut<Game>,
    rigs: Query<(Entity, &PendingRig)>,
    children: Query<&Children>,
    players: Query<(), (With<AnimationPlayer>, Without<CharacterRig>)>,
    cameras: Query<Entity, With<PlayerCamera>>,
    suns: Query<Entity, With<SunLight>>,
) {
    for (root, rig) in &rigs {
        let Some(player) = children
            .iter_descendants(root)
            .find(|entity| players.contains(*entity))
        else {
            continue;
        };

        commands.entity(player).insert((
            AnimationGraphHandle(rig.graph.clone()),
            AnimationTransitions::new(),
            FadeIn::default(),
            CharacterRig,
        ));
        game.0.install_clips(rig.clips.clone());

        match cameras.single() {
            Ok(camera) => camera::attach_to(&mut commands, camera, root),
            Err(err) => warn!("camera not attached: {err}"),
        }
        for sun in &suns {
            commands.entity(sun).insert(LightTarget(root));
        }

        commands.entity(root).remove::<PendingRig>();
        debug!(?player, "character rig bound");
    }
}
