use std::time::Duration;

/// Level model, relative to the asset root.
pub const LEVEL_ASSET: &str = "wet-intersection.glb";

/// Character model, carrying its animation clips.
pub const CHARACTER_ASSET: &str = "soldierx.glb";

/// Advertisement images, in display order.
pub const AD_ASSETS: [&str; 4] = ["ad1.png", "ad2.png", "ad3.png", "ad4.png"];

/// Name of the bind-pose clip exported by Mixamo. It is never a locomotion clip.
pub const SENTINEL_CLIP: &str = "mixamo.com";

/// Crossfade duration between two locomotion clips.
pub const FADE_DURATION: Duration = Duration::from_millis(400);

/// How long each advertisement stays on the billboard.
pub const AD_INTERVAL: Duration = Duration::from_millis(2000);

/// Yaw applied per frame while strafing, in degrees.
pub const ROTATION_STEP_DEG: f32 = 4.0;

/// Distance covered per frame while sprinting (meters).
pub const SPRINT_SPEED: f32 = 0.1;

/// Distance covered per frame otherwise (meters).
pub const WALK_SPEED: f32 = 0.02;

/// Upper bound for a single frame delta.
///
/// A window drag or a debugger pause can stall the loop for seconds; feeding that into the
/// mixer would skip whole clips in one step.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

/// Corrective rotation about X applied to the level model (radians).
pub const LEVEL_ROTATION_X: f32 = -std::f32::consts::PI;

/// Level model offset (meters).
pub const LEVEL_OFFSET: [f32; 3] = [0.0, 0.2, 0.0];

/// Uniform scale applied to the level model. The source asset is authored in centimeters.
pub const LEVEL_SCALE: f32 = 0.03;

/// Billboard center in world space (meters).
pub const BILLBOARD_POSITION: [f32; 3] = [5.0, 2.0, 5.0];

/// Billboard yaw (radians).
pub const BILLBOARD_YAW: f32 = -std::f32::consts::FRAC_PI_2;

/// Billboard width and height (meters).
pub const BILLBOARD_SIZE: [f32; 2] = [4.0, 4.0];

/// Vertical field of view of the follow camera, in degrees.
pub const CAMERA_FOV_DEG: f32 = 45.0;

pub const CAMERA_NEAR: f32 = 0.01;

pub const CAMERA_FAR: f32 = 1000.0;

/// Camera position relative to the character once attached.
pub const CAMERA_OFFSET: [f32; 3] = [0.0, 2.5, 4.0];

/// Point the camera looks at, relative to the character (roughly chest height).
pub const CAMERA_LOOK_AT: [f32; 3] = [0.0, 1.5, 0.0];
