use crate::{
    clip::{ClipName, ClipTable},
    input::InputState,
};
use std::time::Duration;

/// The character's animation mixer, as seen by the locomotion state machine.
pub trait Mixer {
    type Action;

    /// Fades `from` out and restarts `to` from its first frame, fading it in, both over `fade`.
    fn crossfade(&mut self, from: &Self::Action, to: &Self::Action, fade: Duration);

    /// Keeps `action` playing. Must not restart it or touch an ongoing fade.
    fn replay(&mut self, action: &Self::Action);

    /// Advances playback of every active action by `dt`.
    fn advance(&mut self, dt: Duration);
}

/// Picks the clip for the current input.
///
/// Priority: strafing/forward (run when sprinting), then backpedal, then punch, then idle.
pub fn select_clip(input: &InputState) -> ClipName {
    if input.is_advancing() {
        if input.sprint {
            ClipName::Run
        } else {
            ClipName::Walk
        }
    } else if input.down {
        ClipName::WalkBack
    } else if input.punch {
        ClipName::Punch
    } else {
        ClipName::Idle
    }
}

/// Locomotion state machine over a complete [`ClipTable`].
#[derive(Debug)]
pub struct AnimationController<A> {
    clips: ClipTable<A>,
    current: ClipName,
    fade: Duration,
}

impl<A> AnimationController<A> {
    pub fn new(clips: ClipTable<A>, fade: Duration) -> Self {
        Self {
            clips,
            current: ClipName::Idle,
            fade,
        }
    }

    pub fn current(&self) -> ClipName {
        self.current
    }

    pub fn clips(&self) -> &ClipTable<A> {
        &self.clips
    }

    /// Switches to `target`, crossfading when it differs from the current clip.
    ///
    /// Returns whether a crossfade was issued.
    pub fn transition<M>(&mut self, target: ClipName, mixer: &mut M) -> bool
    where
        M: Mixer<Action = A>,
    {
        if target == self.current {
            mixer.replay(self.clips.get(target));
            return false;
        }

        mixer.crossfade(self.clips.get(self.current), self.clips.get(target), self.fade);
        self.current = target;
        true
    }

    /// One frame: select, transition, then advance the mixer by `dt`.
    pub fn step<M>(&mut self, input: &InputState, dt: Duration, mixer: &mut M) -> ClipName
    where
        M: Mixer<Action = A>,
    {
        self.transition(select_clip(input), mixer);
        mixer.advance(dt);
        self.current
    }
}
