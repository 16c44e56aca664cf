use crate::{clip::ClipName, input::InputState};
use nalgebra as na;

pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;

/// Character position and facing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Quat::identity(),
        }
    }
}

impl Pose {
    /// Local forward. Models face -Z.
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::z()
    }

    /// Heading about +Y, zero when facing -Z.
    pub fn yaw(&self) -> f32 {
        let forward = self.forward();
        (-forward.x).atan2(-forward.z)
    }
}

/// One frame of movement. At most one branch of input contributes, so the variants never combine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveStep {
    /// Slide along world X while turning about +Y by `yaw` radians.
    Strafe { dx: f32, yaw: f32 },
    /// Move along local facing; negative is backwards.
    Advance { distance: f32 },
}

impl MoveStep {
    pub fn apply(self, pose: &mut Pose) {
        match self {
            MoveStep::Strafe { dx, yaw } => {
                pose.translation.x += dx;
                pose.rotation =
                    pose.rotation * Quat::from_axis_angle(&na::Vector3::y_axis(), yaw);
            }
            MoveStep::Advance { distance } => {
                pose.translation += pose.forward() * distance;
            }
        }
    }
}

/// Turns held keys into per-frame displacement. Distances are per frame, not per second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementController {
    pub sprint_speed: f32,
    pub walk_speed: f32,
    /// Radians turned per strafing frame.
    pub rotation_step: f32,
}

impl MovementController {
    /// Backpedalling never sprints, even with shift held.
    pub fn speed(&self, input: &InputState, current: ClipName) -> f32 {
        if input.sprint && current != ClipName::WalkBack {
            self.sprint_speed
        } else {
            self.walk_speed
        }
    }

    /// Left beats right beats up beats down.
    pub fn step(&self, input: &InputState, current: ClipName) -> Option<MoveStep> {
        let speed = self.speed(input, current);
        if input.left {
            Some(MoveStep::Strafe {
                dx: -speed,
                yaw: self.rotation_step,
            })
        } else if input.right {
            Some(MoveStep::Strafe {
                dx: speed,
                yaw: -self.rotation_step,
            })
        } else if input.up {
            Some(MoveStep::Advance { distance: speed })
        } else if input.down {
            Some(MoveStep::Advance { distance: -speed })
        } else {
            None
        }
    }

    pub fn apply(&self, input: &InputState, current: ClipName, pose: &mut Pose) {
        if let Some(step) = self.step(input, current) {
            step.apply(pose);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1.0e-5;

    fn controller() -> MovementController {
        MovementController {
            sprint_speed: 0.1,
            walk_speed: 0.02,
            rotation_step: 4.0_f32.to_radians(),
        }
    }

    #[test]
    fn sprint_is_ignored_while_backpedalling() {
        let input = InputState {
            sprint: true,
            ..Default::default()
        };
        let c = controller();
        assert_eq!(c.speed(&input, ClipName::Run), 0.1);
        assert_eq!(c.speed(&input, ClipName::WalkBack), 0.02);
        assert_eq!(c.speed(&InputState::default(), ClipName::Walk), 0.02);
    }

    #[test]
    fn left_wins_over_every_other_direction() {
        let input = InputState {
            up: true,
            down: true,
            left: true,
            right: true,
            ..Default::default()
        };
        let step = controller().step(&input, ClipName::Walk).unwrap();
        assert_eq!(
            step,
            MoveStep::Strafe {
                dx: -0.02,
                yaw: 4.0_f32.to_radians()
            }
        );
    }

    #[test]
    fn right_strafes_positive_x_and_turns_clockwise() {
        let input = InputState {
            right: true,
            up: true,
            ..Default::default()
        };
        let mut pose = Pose::default();
        controller().apply(&input, ClipName::Walk, &mut pose);

        assert!((pose.translation.x - 0.02).abs() < EPS);
        assert!((pose.yaw() + 4.0_f32.to_radians()).abs() < EPS);
    }

    #[test]
    fn up_moves_along_local_facing() {
        let input = InputState {
            up: true,
            sprint: true,
            ..Default::default()
        };
        let mut pose = Pose {
            rotation: Quat::from_axis_angle(&na::Vector3::y_axis(), std::f32::consts::FRAC_PI_2),
            ..Default::default()
        };
        controller().apply(&input, ClipName::Run, &mut pose);

        // Facing -Z rotated +90° about Y is -X.
        assert!((pose.translation.x + 0.1).abs() < EPS);
        assert!(pose.translation.z.abs() < EPS);
    }

    #[test]
    fn down_backs_up_at_walk_speed() {
        let input = InputState {
            down: true,
            sprint: true,
            ..Default::default()
        };
        let mut pose = Pose::default();
        controller().apply(&input, ClipName::WalkBack, &mut pose);
        assert!((pose.translation.z - 0.02).abs() < EPS);
    }

    #[test]
    fn punch_alone_does_not_move() {
        let input = InputState {
            punch: true,
            ..Default::default()
        };
        assert_eq!(controller().step(&input, ClipName::Punch), None);
    }

    #[test]
    fn strafing_accumulates_yaw() {
        let input = InputState {
            left: true,
            ..Default::default()
        };
        let mut pose = Pose::default();
        for _ in 0..10 {
            controller().apply(&input, ClipName::Walk, &mut pose);
        }
        assert!((pose.yaw() - 40.0_f32.to_radians()).abs() < 1.0e-4);
        assert!((pose.translation.x + 0.2).abs() < 1.0e-4);
    }
}
