//! Billboard advertisement rotation.
//!
//! The carousel owns the loaded textures, the one billboard surface they are shown on, and the
//! repeating ticker that swaps the texture. Surface creation and texture swaps go through
//! [`BillboardHost`] so the same logic drives the engine and the tests.

use crate::constants::{BILLBOARD_POSITION, BILLBOARD_SIZE, BILLBOARD_YAW};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Repeating tick source driven by elapsed frame time.
///
/// Dropping the ticker is the cancellation; there is no handle that can outlive it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticker {
    period: Duration,
    elapsed: Duration,
}

impl Ticker {
    /// Periods shorter than a millisecond are raised to one.
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            elapsed: Duration::ZERO,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Accumulates `dt` and returns how many whole periods completed.
    pub fn tick(&mut self, dt: Duration) -> u32 {
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            fired += 1;
        }
        fired
    }
}

/// Loaded textures in display order plus the wrapping cursor.
#[derive(Clone, Debug, PartialEq)]
pub struct AdSequence<T> {
    textures: Vec<T>,
    index: usize,
}

impl<T> Default for AdSequence<T> {
    fn default() -> Self {
        Self {
            textures: Vec::new(),
            index: 0,
        }
    }
}

impl<T> AdSequence<T> {
    pub fn new(textures: Vec<T>) -> Self {
        Self { textures, index: 0 }
    }

    pub fn push(&mut self, texture: T) {
        self.textures.push(texture);
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&T> {
        self.textures.get(self.index)
    }

    /// Moves the cursor one step, wrapping at the end. `None` when empty.
    pub fn advance(&mut self) -> Option<&T> {
        if self.textures.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.textures.len();
        self.textures.get(self.index)
    }
}

/// Where the billboard goes and how big it is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BillboardPlacement {
    pub position: [f32; 3],
    /// Rotation about +Y in radians.
    pub yaw: f32,
    pub size: [f32; 2],
}

impl Default for BillboardPlacement {
    fn default() -> Self {
        Self {
            position: BILLBOARD_POSITION,
            yaw: BILLBOARD_YAW,
            size: BILLBOARD_SIZE,
        }
    }
}

/// Scene operations the carousel needs.
pub trait BillboardHost<T> {
    /// Handle to the surface's material.
    type Surface;

    /// Inserts a flat, transparent surface showing `texture`.
    fn spawn_billboard(&mut self, placement: &BillboardPlacement, texture: &T) -> Self::Surface;

    /// Rebinds the surface's material to `texture` and flags it for re-upload.
    fn set_texture(&mut self, surface: &Self::Surface, texture: &T);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CarouselError {
    #[error("no advertisement textures loaded")]
    NoTextures,
}

pub struct AdCarousel<T, S> {
    sequence: AdSequence<T>,
    placement: BillboardPlacement,
    interval: Duration,
    surface: Option<S>,
    rotation: Option<Ticker>,
}

impl<T, S> AdCarousel<T, S> {
    pub fn new(sequence: AdSequence<T>, placement: BillboardPlacement, interval: Duration) -> Self {
        Self {
            sequence,
            placement,
            interval,
            surface: None,
            rotation: None,
        }
    }

    pub fn sequence(&self) -> &AdSequence<T> {
        &self.sequence
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn is_rotating(&self) -> bool {
        self.rotation.is_some()
    }

    /// Puts the first texture on a new billboard and starts rotating.
    ///
    /// With nothing loaded this warns and leaves the scene untouched. Calling it again once a
    /// surface exists does not spawn a second one.
    pub fn create_ad_mesh<H>(&mut self, host: &mut H) -> Result<(), CarouselError>
    where
        H: BillboardHost<T, Surface = S>,
    {
        let Some(first) = self.sequence.current() else {
            warn!("no ads loaded, skipping billboard creation");
            return Err(CarouselError::NoTextures);
        };

        if self.surface.is_none() {
            self.surface = Some(host.spawn_billboard(&self.placement, first));
            info!(ads = self.sequence.len(), "billboard created");
        }
        self.start_rotation()
    }

    /// Starts the rotation timer. Already running is a no-op; the phase is kept.
    ///
    /// Refuses to start with nothing to rotate through.
    pub fn start_rotation(&mut self) -> Result<(), CarouselError> {
        if self.sequence.is_empty() {
            warn!("no ads loaded, not starting rotation");
            return Err(CarouselError::NoTextures);
        }
        if self.rotation.is_some() {
            debug!("ad rotation already running");
            return Ok(());
        }
        self.rotation = Some(Ticker::new(self.interval));
        Ok(())
    }

    /// Cancels the rotation timer, if any.
    pub fn stop_rotation(&mut self) {
        if self.rotation.take().is_some() {
            debug!("ad rotation stopped");
        }
    }

    /// Feeds elapsed time to the timer and swaps textures for every completed period.
    ///
    /// Returns the number of swaps.
    pub fn advance<H>(&mut self, dt: Duration, host: &mut H) -> u32
    where
        H: BillboardHost<T, Surface = S>,
    {
        let Some(ticker) = self.rotation.as_mut() else {
            return 0;
        };
        let fired = ticker.tick(dt);
        let Some(surface) = &self.surface else {
            return 0;
        };

        let mut swaps = 0;
        for _ in 0..fired {
            let Some(texture) = self.sequence.advance() else {
                break;
            };
            host.set_texture(surface, texture);
            swaps += 1;
        }
        swaps
    }
}
