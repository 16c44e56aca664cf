//! Asynchronous asset loading.
//!
//! Loading is split into two independent paths that run concurrently:
//!
//! - level: level model, then (only if that succeeded) the advertisement images
//! - character: character model with its animation clips
//!
//! Each path reports typed results as [`LoadEvent`]s on a channel instead of touching the scene
//! itself. A `LevelReady` event carries an [`Insertion`] the consumer settles once it has tried to
//! put the level into the scene; the level path waits on it and only requests ads after a
//! confirmed insertion.

use crate::{carousel::AdSequence, config::AssetManifest};
use crossbeam_channel::Sender;
use futures::channel::oneshot;
use std::future::Future;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("failed to load `{path}`: {reason}")]
    Fetch { path: String, reason: String },
    #[error("`{path}` is not a {expected}")]
    Decode {
        path: String,
        expected: &'static str,
    },
}

/// The engine's asset decoder.
pub trait AssetSource {
    type Level: Send;
    type Character: Send;
    type Texture: Send;

    fn load_level(&self, path: &str)
    -> impl Future<Output = Result<Self::Level, LoadError>> + Send;

    fn load_character(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<Self::Character, LoadError>> + Send;

    fn load_image(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<Self::Texture, LoadError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetGroup {
    Level,
    Character,
    Ads,
}

/// Reply slot for a delivered level.
///
/// Dropping it unsettled counts as a failed insertion.
#[derive(Debug)]
pub struct Insertion(oneshot::Sender<bool>);

impl Insertion {
    pub fn new() -> (Self, oneshot::Receiver<bool>) {
        let (tx, rx) = oneshot::channel();
        (Self(tx), rx)
    }

    /// The level is in the scene; ads may load.
    pub fn confirm(self) {
        let _ = self.0.send(true);
    }

    /// The level could not be inserted; ads are skipped.
    pub fn reject(self) {
        let _ = self.0.send(false);
    }
}

pub enum LoadEvent<S: AssetSource> {
    LevelReady {
        level: S::Level,
        insertion: Insertion,
    },
    CharacterReady(S::Character),
    /// Sent only after a confirmed level insertion, possibly holding fewer textures than
    /// requested, or none.
    AdsReady(AdSequence<S::Texture>),
    Failed { group: AssetGroup, error: LoadError },
}

impl<S: AssetSource> LoadEvent<S> {
    pub fn group(&self) -> AssetGroup {
        match self {
            LoadEvent::LevelReady { .. } => AssetGroup::Level,
            LoadEvent::CharacterReady(_) => AssetGroup::Character,
            LoadEvent::AdsReady(_) => AssetGroup::Ads,
            LoadEvent::Failed { group, .. } => *group,
        }
    }
}

pub struct AssetPipeline<S: AssetSource> {
    source: S,
    manifest: AssetManifest,
    events: Sender<LoadEvent<S>>,
}

impl<S: AssetSource> AssetPipeline<S> {
    pub fn new(source: S, manifest: AssetManifest, events: Sender<LoadEvent<S>>) -> Self {
        Self {
            source,
            manifest,
            events,
        }
    }

    /// Runs both load paths to completion. Neither path can fail the other.
    pub async fn run(&self) {
        futures::join!(self.level_path(), self.character_path());
    }

    /// Level, insertion, then ads. Ads are never requested unless the level made it into the
    /// scene.
    pub async fn level_path(&self) {
        let level = match self.load_level().await {
            Ok(level) => level,
            Err(error) => {
                self.fail(AssetGroup::Level, error);
                return;
            }
        };

        let (insertion, inserted) = Insertion::new();
        self.emit(LoadEvent::LevelReady { level, insertion });
        match inserted.await {
            Ok(true) => {}
            Ok(false) => {
                warn!("level was not inserted, skipping ads");
                return;
            }
            Err(oneshot::Canceled) => {
                warn!("level delivery abandoned, skipping ads");
                return;
            }
        }

        let ads = self.load_ads().await;
        self.emit(LoadEvent::AdsReady(ads));
    }

    pub async fn character_path(&self) {
        match self.load_character().await {
            Ok(character) => self.emit(LoadEvent::CharacterReady(character)),
            Err(error) => self.fail(AssetGroup::Character, error),
        }
    }

    pub async fn load_level(&self) -> Result<S::Level, LoadError> {
        let level = self.source.load_level(&self.manifest.level).await?;
        info!(path = %self.manifest.level, "level loaded");
        Ok(level)
    }

    pub async fn load_character(&self) -> Result<S::Character, LoadError> {
        let character = self.source.load_character(&self.manifest.character).await?;
        info!(path = %self.manifest.character, "character loaded");
        Ok(character)
    }

    /// Loads the ad images one after another, in order.
    ///
    /// The first failure stops the sequence; whatever loaded before it is kept.
    pub async fn load_ads(&self) -> AdSequence<S::Texture> {
        let mut ads = AdSequence::default();
        for path in &self.manifest.ads {
            match self.source.load_image(path).await {
                Ok(texture) => ads.push(texture),
                Err(error) => {
                    error!(%error, loaded = ads.len(), "error loading ads");
                    self.emit(LoadEvent::Failed {
                        group: AssetGroup::Ads,
                        error,
                    });
                    return ads;
                }
            }
        }
        info!(count = ads.len(), "all ads loaded");
        ads
    }

    fn fail(&self, group: AssetGroup, error: LoadError) {
        error!(?group, %error, "asset load failed");
        self.emit(LoadEvent::Failed { group, error });
    }

    fn emit(&self, event: LoadEvent<S>) {
        let group = event.group();
        if self.events.send(event).is_err() {
            warn!(?group, "load event dropped, scene is gone");
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::constants::AD_ASSETS;
    use crossbeam_channel::{Receiver, unbounded};
    use futures::executor::block_on;
    use std::{
        collections::HashSet,
        thread::{self, JoinHandle},
    };

    /// Resolves every path immediately, except the ones listed as failing.
    #[derive(Default)]
    pub(crate) struct FakeSource {
        pub failing: HashSet<String>,
    }

    impl FakeSource {
        pub fn failing(paths: &[&str]) -> Self {
            Self {
                failing: paths.iter().map(|p| p.to_string()).collect(),
            }
        }

        fn resolve(&self, path: &str) -> Result<String, LoadError> {
            if self.failing.contains(path) {
                Err(LoadError::Fetch {
                    path: path.to_string(),
                    reason: "404".to_string(),
                })
            } else {
                Ok(path.to_string())
            }
        }
    }

    impl AssetSource for FakeSource {
        type Level = String;
        type Character = String;
        type Texture = String;

        async fn load_level(&self, path: &str) -> Result<String, LoadError> {
            self.resolve(path)
        }

        async fn load_character(&self, path: &str) -> Result<String, LoadError> {
            self.resolve(path)
        }

        async fn load_image(&self, path: &str) -> Result<String, LoadError> {
            self.resolve(path)
        }
    }

    fn pipeline(source: FakeSource) -> (AssetPipeline<FakeSource>, Receiver<LoadEvent<FakeSource>>) {
        let (tx, rx) = unbounded();
        (AssetPipeline::new(source, AssetManifest::default(), tx), rx)
    }

    /// Stand-in for the scene: drains events on its own thread, settles every level insertion
    /// with `inserted`, and returns a compact event log once the pipeline is dropped.
    fn consume(rx: Receiver<LoadEvent<FakeSource>>, inserted: bool) -> JoinHandle<Vec<String>> {
        thread::spawn(move || {
            rx.iter()
                .map(|event| match event {
                    LoadEvent::LevelReady { level, insertion } => {
                        if inserted {
                            insertion.confirm();
                        } else {
                            insertion.reject();
                        }
                        format!("level {level}")
                    }
                    LoadEvent::CharacterReady(p) => format!("character {p}"),
                    LoadEvent::AdsReady(ads) => format!("ads {}", ads.len()),
                    LoadEvent::Failed { group, .. } => format!("failed {group:?}"),
                })
                .collect()
        })
    }

    fn run_all(source: FakeSource, inserted: bool) -> Vec<String> {
        let (pipeline, rx) = pipeline(source);
        let consumer = consume(rx, inserted);
        block_on(pipeline.run());
        drop(pipeline);
        consumer.join().unwrap()
    }

    fn run_level_path(source: FakeSource, inserted: bool) -> Vec<String> {
        let (pipeline, rx) = pipeline(source);
        let consumer = consume(rx, inserted);
        block_on(pipeline.level_path());
        drop(pipeline);
        consumer.join().unwrap()
    }

    #[test]
    fn everything_loads() {
        let log = run_all(FakeSource::default(), true);

        assert_eq!(log.len(), 3);
        assert!(log.contains(&"level wet-intersection.glb".to_string()));
        assert!(log.contains(&"character soldierx.glb".to_string()));
        assert!(log.contains(&"ads 4".to_string()));
    }

    #[test]
    fn ads_arrive_after_the_level() {
        let log = run_level_path(FakeSource::default(), true);
        assert_eq!(log, vec!["level wet-intersection.glb", "ads 4"]);
    }

    #[test]
    fn rejected_insertion_skips_ads() {
        let log = run_level_path(FakeSource::default(), false);
        assert_eq!(log, vec!["level wet-intersection.glb"]);
    }

    #[test]
    fn rejected_insertion_does_not_hold_up_the_character() {
        let log = run_all(FakeSource::default(), false);
        assert!(log.contains(&"character soldierx.glb".to_string()));
        assert!(!log.iter().any(|e| e.starts_with("ads")));
    }

    #[test]
    fn abandoned_insertion_skips_ads() {
        let (pipeline, rx) = pipeline(FakeSource::default());
        let consumer = thread::spawn(move || {
            rx.iter()
                .filter(|event| matches!(event, LoadEvent::AdsReady(_)))
                .count()
        });
        block_on(pipeline.level_path());
        drop(pipeline);
        assert_eq!(consumer.join().unwrap(), 0);
    }

    #[test]
    fn level_failure_skips_ads_but_not_the_character() {
        let log = run_all(FakeSource::failing(&["wet-intersection.glb"]), true);

        assert!(log.contains(&"failed Level".to_string()));
        assert!(log.contains(&"character soldierx.glb".to_string()));
        assert!(!log.iter().any(|e| e.starts_with("ads")));
    }

    #[test]
    fn character_failure_does_not_block_the_level() {
        let log = run_all(FakeSource::failing(&["soldierx.glb"]), true);

        assert!(log.contains(&"failed Character".to_string()));
        assert!(log.contains(&"level wet-intersection.glb".to_string()));
        assert!(log.contains(&"ads 4".to_string()));
    }

    #[test]
    fn ad_failure_keeps_the_loaded_prefix() {
        let (pipeline, rx) = pipeline(FakeSource::failing(&[AD_ASSETS[2]]));
        let ads = block_on(pipeline.load_ads());

        assert_eq!(ads.len(), 2);
        assert_eq!(ads.current(), Some(&"ad1.png".to_string()));
        let failures: Vec<AssetGroup> = rx.try_iter().map(|event| event.group()).collect();
        assert_eq!(failures, vec![AssetGroup::Ads]);
    }

    #[test]
    fn first_ad_failure_yields_an_empty_sequence() {
        let log = run_level_path(FakeSource::failing(&[AD_ASSETS[0]]), true);
        assert_eq!(log, vec!["level wet-intersection.glb", "failed Ads", "ads 0"]);
    }

    #[test]
    fn dropped_receiver_does_not_panic() {
        let (pipeline, rx) = pipeline(FakeSource::default());
        drop(rx);
        block_on(pipeline.run());
    }

    #[test]
    fn load_errors_render_the_path() {
        let err = LoadError::Fetch {
            path: "ad1.png".into(),
            reason: "404".into(),
        };
        assert_eq!(err.to_string(), "failed to load `ad1.png`: 404");
    }
}
