use crate::{
    animation::{BevyMixer, FadeIn},
    character::{CharacterPose, CharacterRig, PlayerCharacter},
    settings::Settings,
};
use bevy::prelude::*;
use controller::{Character, GameLoop, Renderer};

/// Held keys, clip table and locomotion state. Only main-schedule systems touch it.
#[derive(Resource)]
pub struct Game(pub GameLoop<AnimationNodeIndex>);

impl FromWorld for Game {
    fn from_world(world: &mut World) -> Self {
        let settings = world.get_resource::<Settings>().cloned().unwrap_or_default();
        Self(GameLoop::new(&settings.0.tunables))
    }
}

/// Frames handed to the renderer since startup.
///
/// Bevy's render sub-app draws after `Update`; the game loop's render call only records that a
/// frame went out.
#[derive(Resource, Debug, Default)]
pub struct PresentedFrames(pub u64);

impl Renderer for PresentedFrames {
    fn render(&mut self) {
        self.0 += 1;
    }
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<Game>();
    app.init_resource::<PresentedFrames>();

    app.add_systems(Update, (drive_frame, apply_pose_to_transform).chain());
}

fn drive_frame(
    mut game: ResMut<Game>,
    mut frames: ResMut<PresentedFrames>,
    time: Res<Time>,
    mut rigs: Query<
        (&mut AnimationPlayer, &mut AnimationTransitions, &mut FadeIn),
        With<CharacterRig>,
    >,
    mut poses: Query<&mut CharacterPose, With<PlayerCharacter>>,
) {
    let mut rig = rigs.single_mut().ok();
    let mut pose = poses.single_mut().ok();

    let mut mixer = rig.as_mut().map(|(player, transitions, fade_in)| BevyMixer {
        player: &mut **player,
        transitions: &mut **transitions,
        fade_in: &mut **fade_in,
    });
    let character = match (mixer.as_mut(), pose.as_mut()) {
        (Some(mixer), Some(pose)) => Some(Character {
            mixer,
            pose: &mut pose.0,
        }),
        _ => None,
    };

    let report = game.0.frame(time.elapsed(), character, &mut *frames);
    if let Some(clip) = report.clip {
        trace!(%clip, dt = ?report.dt, "gameplay frame");
    }
}

/// Copies the simulated pose onto the render transform, keeping the model's own scale.
fn apply_pose_to_transform(
    mut characters: Query<(&CharacterPose, &mut Transform), Changed<CharacterPose>>,
) {
    for (pose, mut transform) in &mut characters {
        let p = &pose.0;
        transform.translation = Vec3::new(p.translation.x, p.translation.y, p.translation.z);
        let q = p.rotation.quaternion();
        transform.rotation = Quat::from_xyzw(q.i, q.j, q.k, q.w);
    }
}
