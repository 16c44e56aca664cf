use crate::{
    animation::{AnimationController, Mixer},
    clip::{ClipName, ClipTable},
    config::Tunables,
    input::InputState,
    movement::{MovementController, Pose},
};
use std::time::Duration;
use tracing::info;

/// Turns a monotonic timestamp into per-frame deltas.
///
/// Deltas never go negative (a timestamp older than the last one yields zero) and are clamped to
/// `max_delta` so a stalled frame cannot fast-forward the animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameClock {
    last: Option<Duration>,
    max_delta: Duration,
}

impl FrameClock {
    pub fn new(max_delta: Duration) -> Self {
        Self {
            last: None,
            max_delta,
        }
    }

    /// First call yields zero.
    pub fn delta(&mut self, now: Duration) -> Duration {
        let dt = match self.last {
            Some(last) => now.saturating_sub(last),
            None => Duration::ZERO,
        };
        self.last = Some(self.last.map_or(now, |last| last.max(now)));
        dt.min(self.max_delta)
    }
}

/// Presents one frame.
pub trait Renderer {
    fn render(&mut self);
}

/// Mutable view of the loaded character for one frame.
pub struct Character<'a, M> {
    pub mixer: &'a mut M,
    pub pose: &'a mut Pose,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    /// Clip playing after this frame; `None` when the readiness gate was closed.
    pub clip: Option<ClipName>,
    pub dt: Duration,
}

impl FrameReport {
    pub fn ran_gameplay(&self) -> bool {
        self.clip.is_some()
    }
}

/// Per-frame driver. Owns the held keys and, once the character is in, the clip table.
#[derive(Debug)]
pub struct GameLoop<A> {
    pub input: InputState,
    animation: Option<AnimationController<A>>,
    movement: MovementController,
    clock: FrameClock,
    fade: Duration,
}

impl<A> GameLoop<A> {
    pub fn new(tunables: &Tunables) -> Self {
        Self {
            input: InputState::default(),
            animation: None,
            movement: MovementController {
                sprint_speed: tunables.sprint_speed,
                walk_speed: tunables.walk_speed,
                rotation_step: tunables.rotation_step(),
            },
            clock: FrameClock::new(tunables.max_frame_delta()),
            fade: tunables.fade(),
        }
    }

    /// Opens the readiness gate. A second table replaces the first and restarts at idle.
    pub fn install_clips(&mut self, clips: ClipTable<A>) {
        info!("clip table populated, gameplay enabled");
        self.animation = Some(AnimationController::new(clips, self.fade));
    }

    pub fn is_ready(&self) -> bool {
        self.animation.is_some()
    }

    pub fn current_clip(&self) -> Option<ClipName> {
        self.animation.as_ref().map(AnimationController::current)
    }

    /// Runs one frame at monotonic time `now`.
    ///
    /// With the gate open and a character present: animation, then movement. The render call
    /// happens either way.
    pub fn frame<M, R>(
        &mut self,
        now: Duration,
        character: Option<Character<'_, M>>,
        renderer: &mut R,
    ) -> FrameReport
    where
        M: Mixer<Action = A>,
        R: Renderer,
    {
        let dt = self.clock.delta(now);
        let mut clip = None;

        if let (Some(animation), Some(character)) = (self.animation.as_mut(), character) {
            let current = animation.step(&self.input, dt, character.mixer);
            self.movement.apply(&self.input, current, character.pose);
            clip = Some(current);
        }

        renderer.render();
        FrameReport { clip, dt }
    }
}
