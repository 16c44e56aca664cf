//! Runs the asset pipeline on the IO task pool and feeds its results back into the world.

use crate::{
    billboard::AdsLoaded,
    character::CharacterLoaded,
    level::{primary_scene, spawn_level},
    settings::Settings,
};
use bevy::{gltf::Gltf, prelude::*, tasks::IoTaskPool};
use controller::{AssetGroup, AssetPipeline, AssetSource, LoadError, LoadEvent};
use crossbeam_channel::Receiver;
use std::collections::VecDeque;

/// [`AssetSource`] backed by Bevy's asset server.
#[derive(Clone)]
pub struct BevyAssetSource {
    server: AssetServer,
}

impl BevyAssetSource {
    async fn load_typed<A: Asset>(
        &self,
        path: &str,
        expected: &'static str,
    ) -> Result<Handle<A>, LoadError> {
        let handle = self
            .server
            .load_untyped_async(path.to_owned())
            .await
            .map_err(|err| LoadError::Fetch {
                path: path.to_string(),
                reason: err.to_string(),
            })?;
        handle.try_typed::<A>().map_err(|_| LoadError::Decode {
            path: path.to_string(),
            expected,
        })
    }
}

impl AssetSource for BevyAssetSource {
    type Level = Handle<Gltf>;
    type Character = Handle<Gltf>;
    type Texture = Handle<Image>;

    async fn load_level(&self, path: &str) -> Result<Handle<Gltf>, LoadError> {
        self.load_typed(path, "glTF model").await
    }

    async fn load_character(&self, path: &str) -> Result<Handle<Gltf>, LoadError> {
        self.load_typed(path, "glTF model").await
    }

    async fn load_image(&self, path: &str) -> Result<Handle<Image>, LoadError> {
        self.load_typed(path, "image").await
    }
}

type BevyLoadEvent = LoadEvent<BevyAssetSource>;

#[derive(Resource)]
struct LoadEvents(Receiver<BevyLoadEvent>);

/// Events received but not applied yet, one FIFO per load path.
///
/// The level is inserted right here so its [`Insertion`](controller::Insertion) can be
/// settled; the ads path only continues after a confirmed insertion.
///
/// A path's queue stalls while its head refers to a glTF not yet visible in `Assets<Gltf>`; the
/// other path keeps going.
#[derive(Resource, Default)]
struct PendingLoads {
    level_path: VecDeque<BevyLoadEvent>,
    character_path: VecDeque<BevyLoadEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Progress {
    #[default]
    Pending,
    Ready,
    Failed(String),
}

/// Outcome per asset group, for diagnostics.
#[derive(Resource, Debug, Default)]
pub struct LoadStatus {
    pub level: Progress,
    pub character: Progress,
    pub ads: Progress,
}

impl LoadStatus {
    fn entry(&mut self, group: AssetGroup) -> &mut Progress {
        match group {
            AssetGroup::Level => &mut self.level,
            AssetGroup::Character => &mut self.character,
            AssetGroup::Ads => &mut self.ads,
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<PendingLoads>();
    app.init_resource::<LoadStatus>();
    app.add_message::<CharacterLoaded>();
    app.add_message::<AdsLoaded>();

    app.add_systems(Startup, start_pipeline);
    app.add_systems(
        PreUpdate,
        dispatch_loads.run_if(resource_exists::<LoadEvents>),
    );
}

fn start_pipeline(mut commands: Commands, server: Res<AssetServer>, settings: Res<Settings>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    let source = BevyAssetSource {
        server: server.clone(),
    };
    let pipeline = AssetPipeline::new(source, settings.0.assets.clone(), tx);

    IoTaskPool::get()
        .spawn(async move { pipeline.run().await })
        .detach();

    commands.insert_resource(LoadEvents(rx));
    info!("asset pipeline started");
}

fn dispatch_loads(
    mut commands: Commands,
    events: Res<LoadEvents>,
    pending: ResMut<PendingLoads>,
    mut status: ResMut<LoadStatus>,
    gltfs: Res<Assets<Gltf>>,
    mut characters: MessageWriter<CharacterLoaded>,
    mut ads: MessageWriter<AdsLoaded>,
) {
    let pending = pending.into_inner();
    for event in events.0.try_iter() {
        match event.group() {
            AssetGroup::Character => pending.character_path.push_back(event),
            AssetGroup::Level | AssetGroup::Ads => pending.level_path.push_back(event),
        }
    }

    for queue in [&mut pending.level_path, &mut pending.character_path] {
        while let Some(event) = queue.pop_front() {
            match event {
                LoadEvent::LevelReady { level, insertion } => {
                    let Some(gltf) = gltfs.get(&level) else {
                        queue.push_front(LoadEvent::LevelReady { level, insertion });
                        break;
                    };
                    if spawn_level(&mut commands, primary_scene(gltf)).is_some() {
                        status.level = Progress::Ready;
                        insertion.confirm();
                    } else {
                        status.level = Progress::Failed("level asset has no scene".to_string());
                        insertion.reject();
                    }
                }
                LoadEvent::CharacterReady(handle) => {
                    if !gltfs.contains(handle.id()) {
                        queue.push_front(LoadEvent::CharacterReady(handle));
                        break;
                    }
                    status.character = Progress::Ready;
                    characters.write(CharacterLoaded(handle));
                }
                LoadEvent::AdsReady(sequence) => {
                    // A failure already recorded for the ads group stays visible.
                    if status.ads == Progress::Pending {
                        status.ads = Progress::Ready;
                    }
                    ads.write(AdsLoaded(sequence));
                }
                LoadEvent::Failed { group, error } => {
                    *status.entry(group) = Progress::Failed(error.to_string());
                }
            }
        }
    }
}
