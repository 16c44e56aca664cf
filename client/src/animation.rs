use bevy::prelude::*;
use controller::Mixer;
use std::time::Duration;

/// Weight ramp of the clip most recently faded in.
///
/// `AnimationTransitions` only fades the outgoing clip; the incoming one is ramped here.
#[derive(Component, Debug, Default)]
pub struct FadeIn {
    node: Option<AnimationNodeIndex>,
    elapsed: Duration,
    duration: Duration,
}

impl FadeIn {
    fn weight(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}

/// The character's `AnimationPlayer` and its transition trackers, borrowed for one frame.
pub struct BevyMixer<'a> {
    pub player: &'a mut AnimationPlayer,
    pub transitions: &'a mut AnimationTransitions,
    pub fade_in: &'a mut FadeIn,
}

impl Mixer for BevyMixer<'_> {
    type Action = AnimationNodeIndex;

    fn crossfade(&mut self, _from: &AnimationNodeIndex, to: &AnimationNodeIndex, fade: Duration) {
        // `AnimationTransitions` tracks the outgoing clip itself and restarts the incoming one.
        *self.fade_in = FadeIn {
            node: Some(*to),
            elapsed: Duration::ZERO,
            duration: fade,
        };
        let weight = self.fade_in.weight();
        self.transitions
            .play(self.player, *to, fade)
            .set_weight(weight)
            .repeat();
    }

    fn replay(&mut self, action: &AnimationNodeIndex) {
        // Only the very first frame finds nothing playing; it has to go through the transition
        // tracker too, or the first crossfade would never fade it out.
        if !self.player.is_playing_animation(*action) {
            self.transitions
                .play(self.player, *action, Duration::ZERO)
                .repeat();
        }
    }

    /// Ramps the incoming clip's weight. Playback time itself is ticked by Bevy from
    /// `Time<Virtual>`, whose max delta is the same stall clamp.
    fn advance(&mut self, dt: Duration) {
        let Some(node) = self.fade_in.node else {
            return;
        };
        self.fade_in.elapsed += dt;
        let weight = self.fade_in.weight();
        if let Some(active) = self.player.animation_mut(node) {
            active.set_weight(weight);
        }
        if weight >= 1.0 {
            self.fade_in.node = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FADE: Duration = Duration::from_millis(400);

    fn weight_of(player: &AnimationPlayer, node: AnimationNodeIndex) -> f32 {
        player.animation(node).map(|active| active.weight()).unwrap_or(-1.0)
    }

    #[test]
    fn crossfade_ramps_the_incoming_clip_in_over_the_fade() {
        let mut player = AnimationPlayer::default();
        let mut transitions = AnimationTransitions::new();
        let mut fade_in = FadeIn::default();
        let idle = AnimationNodeIndex::new(1);
        let walk = AnimationNodeIndex::new(2);

        let mut mixer = BevyMixer {
            player: &mut player,
            transitions: &mut transitions,
            fade_in: &mut fade_in,
        };
        mixer.replay(&idle);
        mixer.advance(Duration::from_millis(16));
        mixer.crossfade(&idle, &walk, FADE);
        assert_eq!(weight_of(&*mixer.player, walk), 0.0);

        mixer.advance(FADE / 2);
        assert!((weight_of(&*mixer.player, walk) - 0.5).abs() < 1e-4);

        mixer.advance(FADE);
        assert_eq!(weight_of(&*mixer.player, walk), 1.0);
        assert_eq!(mixer.fade_in.node, None);
    }

    #[test]
    fn replay_leaves_a_running_fade_alone() {
        let mut player = AnimationPlayer::default();
        let mut transitions = AnimationTransitions::new();
        let mut fade_in = FadeIn::default();
        let walk = AnimationNodeIndex::new(2);

        let mut mixer = BevyMixer {
            player: &mut player,
            transitions: &mut transitions,
            fade_in: &mut fade_in,
        };
        mixer.crossfade(&AnimationNodeIndex::new(1), &walk, FADE);
        mixer.advance(FADE / 4);
        mixer.replay(&walk);
        assert!((weight_of(&*mixer.player, walk) - 0.25).abs() < 1e-4);
    }

    #[test]
    fn zero_fade_plays_at_full_weight() {
        let mut player = AnimationPlayer::default();
        let mut transitions = AnimationTransitions::new();
        let mut fade_in = FadeIn::default();
        let punch = AnimationNodeIndex::new(3);

        let mut mixer = BevyMixer {
            player: &mut player,
            transitions: &mut transitions,
            fade_in: &mut fade_in,
        };
        mixer.crossfade(&AnimationNodeIndex::new(1), &punch, Duration::ZERO);
        assert_eq!(weight_of(&*mixer.player, punch), 1.0);
    }
}
