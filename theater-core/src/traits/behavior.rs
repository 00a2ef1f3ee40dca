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

/// A shared reference to a registered behavior.
pub type BehaviorRef = Arc<dyn Behavior>;

/// Something that knows how to advance its own state by one tick.
///
/// Called from the pulsar's task on every tick, so `behave` should be short and must
/// not block. State lives behind interior mutability (atomics, locks).
pub trait Behavior: Send + Sync + 'static {
    /// Advances one tick.
    fn behave(&self);

    /// Name used in logs and panic reports. Defaults to the type name.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A [`Behavior`] backed by a closure. Build one with [`behavior_fn`].
pub struct BehaviorFn<F> {
    name: String,
    f: F,
}

/// Wraps `f` as a named behavior.
pub fn behavior_fn<F>(name: impl Into<String>, f: F) -> BehaviorFn<F>
where
    F: Fn() + Send + Sync + 'static,
{
    BehaviorFn {
        name: name.into(),
        f,
    }
}

impl<F> Behavior for BehaviorFn<F>
where
    F: Fn() + Send + Sync + 'static,
{
    fn behave(&self) {
        (self.f)();
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> fmt::Debug for BehaviorFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorFn").field("name", &self.name).finish()
    }
}
