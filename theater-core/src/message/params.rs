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

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Pointer position and relative motion, in logical screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerParams {
    /// Current x coordinate.
    pub x: i32,
    /// Current y coordinate.
    pub y: i32,
    /// Horizontal motion since the previous event.
    pub move_x: f64,
    /// Vertical motion since the previous event.
    pub move_y: f64,
}

/// A physical key and its auto-repeat count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyParams {
    /// Device scancode of the key.
    pub scancode: u32,
    /// Non-zero while the key is auto-repeating.
    pub repeat: u8,
}

/// A single loosely typed value inside [`MsgParams::Fields`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Text.
    Str(String),
    /// Flag.
    Bool(bool),
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// An application payload of any shareable type.
#[derive(Clone)]
pub struct CustomParams(Arc<dyn Any + Send + Sync>);

impl CustomParams {
    /// Wraps a value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Borrows the value if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for CustomParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomParams(..)")
    }
}

/// The payload of a [`Message`](crate::message::Message).
///
/// A closed set of shapes: the bus never looks inside, but handlers get typed access
/// instead of guessing at an untyped map. Missing or mistyped values come back as
/// `None`, never as a panic.
#[derive(Debug, Clone, Default)]
pub enum MsgParams {
    /// No payload.
    #[default]
    None,
    /// Pointer-device payload.
    Pointer(PointerParams),
    /// Keyboard payload.
    Key(KeyParams),
    /// String-keyed loosely typed values.
    Fields(BTreeMap<String, ParamValue>),
    /// Any application type.
    Custom(CustomParams),
}

impl MsgParams {
    /// Wraps an application value.
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Self::Custom(CustomParams::new(value))
    }

    /// Adds a field, turning the payload into [`MsgParams::Fields`].
    ///
    /// Any non-field payload is replaced.
    #[must_use]
    pub fn with_field(self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        let mut fields = match self {
            Self::Fields(fields) => fields,
            _ => BTreeMap::new(),
        };
        fields.insert(key.into(), value.into());
        Self::Fields(fields)
    }

    /// True when there is nothing to read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Fields(fields) => fields.is_empty(),
            _ => false,
        }
    }

    /// The pointer payload, if any.
    #[must_use]
    pub const fn pointer(&self) -> Option<&PointerParams> {
        match self {
            Self::Pointer(pointer) => Some(pointer),
            _ => None,
        }
    }

    /// The key payload, if any.
    #[must_use]
    pub const fn key(&self) -> Option<&KeyParams> {
        match self {
            Self::Key(key) => Some(key),
            _ => None,
        }
    }

    /// Looks up a raw field value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        match self {
            Self::Fields(fields) => fields.get(key),
            _ => None,
        }
    }

    /// Reads an integer field.
    #[must_use]
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            ParamValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Reads a floating point field.
    #[must_use]
    pub fn get_float(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            ParamValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Reads a text field.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            ParamValue::Str(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Reads a flag field.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            ParamValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Borrows a custom payload if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Custom(custom) => custom.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl From<PointerParams> for MsgParams {
    fn from(pointer: PointerParams) -> Self {
        Self::Pointer(pointer)
    }
}

impl From<KeyParams> for MsgParams {
    fn from(key: KeyParams) -> Self {
        Self::Key(key)
    }
}
