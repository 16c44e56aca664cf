//! Engine-agnostic character controller for the wet intersection scene.
//!
//! Everything here is plain data plus traits at the engine seams ([`AssetSource`], [`Mixer`],
//! [`BillboardHost`], [`Renderer`]); the Bevy client implements those.

pub mod animation;
pub mod carousel;
pub mod clip;
pub mod config;
pub mod constants;
pub mod game_loop;
pub mod input;
pub mod movement;
pub mod pipeline;

#[cfg(test)]
mod test_log;

pub use animation::{AnimationController, Mixer, select_clip};
pub use carousel::{AdCarousel, AdSequence, BillboardHost, BillboardPlacement, CarouselError, Ticker};
pub use clip::{ClipName, ClipTable, ClipTableError};
pub use config::{AssetManifest, Config, ConfigError, Tunables};
pub use game_loop::{Character, FrameClock, FrameReport, GameLoop, Renderer};
pub use input::{InputKey, InputState};
pub use movement::{MoveStep, MovementController, Pose};
pub use pipeline::{AssetGroup, AssetPipeline, AssetSource, Insertion, LoadError, LoadEvent};
