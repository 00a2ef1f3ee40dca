/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use futures::future::join_all;
use parking_lot::Mutex;
use theater_core::prelude::{MessageBus, Pulsar};
use tracing::*;

use crate::config::TheaterConfig;
use crate::error::StageError;

/// Name of a [`Scene`] within a [`Stage`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(Arc<str>);

impl SceneId {
    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SceneId {
    fn from(value: &str) -> Self {
        Self(Arc::from(value))
    }
}

impl From<String> for SceneId {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a scene gets to wire itself up with.
#[derive(Debug, Clone)]
pub struct StageContext {
    bus: MessageBus,
    component_pulsar: Pulsar,
    space_pulsar: Pulsar,
}

impl StageContext {
    /// The stage's message bus.
    #[must_use]
    pub const fn bus(&self) -> &MessageBus {
        &self.bus
    }

    /// The fast pulsar driving components.
    #[must_use]
    pub const fn component_pulsar(&self) -> &Pulsar {
        &self.component_pulsar
    }

    /// The slow pulsar driving spaces.
    #[must_use]
    pub const fn space_pulsar(&self) -> &Pulsar {
        &self.space_pulsar
    }
}

/// A set of elements that is wired up when the stage enters it.
pub trait Scene: Send + Sync + 'static {
    /// Creates the scene's elements and registers their handlers and behaviors.
    fn init(&self, context: &StageContext);
}

/// The running application: one bus, a component pulsar, a space pulsar and scenes.
///
/// ```rust,ignore
/// let stage = Stage::launch_with_config(TheaterConfig::default()).await?;
/// stage.append_scene("title", TitleScene::default());
/// stage.enter_scene(&"title".into())?;
/// // ...
/// stage.shutdown().await?;
/// ```
pub struct Stage {
    config: TheaterConfig,
    context: StageContext,
    scenes: DashMap<SceneId, Arc<dyn Scene>>,
    current: Mutex<Option<SceneId>>,
}

impl Stage {
    /// Launches a stage using [`TheaterConfig::load`].
    ///
    /// # Errors
    ///
    /// See [`Stage::launch_with_config`].
    pub async fn launch() -> Result<Self, StageError> {
        Self::launch_with_config(TheaterConfig::load()).await
    }

    /// Builds the bus and both pulsars from `config` and starts them.
    ///
    /// # Errors
    ///
    /// [`StageError::Core`] if a configured pulsar interval is zero.
    #[instrument(skip(config))]
    pub async fn launch_with_config(config: TheaterConfig) -> Result<Self, StageError> {
        let component_pulsar = Pulsar::named("component", config.pulsar.component_interval())?;
        let space_pulsar = Pulsar::named("space", config.pulsar.space_interval())?;
        let bus = MessageBus::with_config(config.bus.clone());

        bus.start()?;
        component_pulsar.start()?;
        space_pulsar.start()?;
        debug!(
            component_interval = ?component_pulsar.interval(),
            space_interval = ?space_pulsar.interval(),
            "stage launched"
        );

        Ok(Self {
            config,
            context: StageContext {
                bus,
                component_pulsar,
                space_pulsar,
            },
            scenes: DashMap::new(),
            current: Mutex::new(None),
        })
    }

    /// The stage's message bus.
    #[must_use]
    pub const fn bus(&self) -> &MessageBus {
        &self.context.bus
    }

    /// The pulsar driving components.
    #[must_use]
    pub const fn component_pulsar(&self) -> &Pulsar {
        &self.context.component_pulsar
    }

    /// The pulsar driving spaces.
    #[must_use]
    pub const fn space_pulsar(&self) -> &Pulsar {
        &self.context.space_pulsar
    }

    /// Handles to the bus and pulsars.
    #[must_use]
    pub const fn context(&self) -> &StageContext {
        &self.context
    }

    /// The configuration the stage was launched with.
    #[must_use]
    pub const fn config(&self) -> &TheaterConfig {
        &self.config
    }

    /// Adds `scene` under `id`, replacing any scene already registered there.
    pub fn append_scene(&self, id: impl Into<SceneId>, scene: impl Scene) {
        let id = id.into();
        if self.scenes.insert(id.clone(), Arc::new(scene)).is_some() {
            warn!(scene = %id, "replaced existing scene");
        }
    }

    /// Makes `id` the current scene and runs its [`Scene::init`].
    ///
    /// # Errors
    ///
    /// [`StageError::UnknownScene`] if no scene was appended under `id`.
    #[instrument(skip(self))]
    pub fn enter_scene(&self, id: &SceneId) -> Result<(), StageError> {
        let scene = self
            .scenes
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| StageError::UnknownScene { id: id.clone() })?;

        scene.init(&self.context);
        *self.current.lock() = Some(id.clone());
        debug!("entered scene");
        Ok(())
    }

    /// The scene most recently entered.
    #[must_use]
    pub fn current_scene(&self) -> Option<SceneId> {
        self.current.lock().clone()
    }

    /// Stops both pulsars, then the bus, within the configured shutdown timeout.
    ///
    /// Queued messages are still delivered before the bus stops.
    ///
    /// # Errors
    ///
    /// [`StageError::ShutdownTimeout`] if in-flight work did not finish in time.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), StageError> {
        let timeout = self.config.shutdown_timeout();
        let context = self.context.clone();

        let stopping = async move {
            let pulsars = [&context.component_pulsar, &context.space_pulsar];
            let results = join_all(pulsars.iter().map(|pulsar| pulsar.stop())).await;
            for (pulsar, result) in pulsars.iter().zip(results) {
                if let Err(err) = result {
                    warn!(pulsar = pulsar.name(), error = %err, "pulsar was not running at shutdown");
                }
            }
            context.bus.stop().await;
        };

        match tokio::time::timeout(timeout, stopping).await {
            Ok(()) => {
                debug!("stage shut down");
                Ok(())
            }
            Err(_) => {
                error!(?timeout, "stage shutdown timed out");
                Err(StageError::ShutdownTimeout { timeout })
            }
        }
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("context", &self.context)
            .field("scenes", &self.scenes.len())
            .field("current", &self.current_scene())
            .finish()
    }
}
