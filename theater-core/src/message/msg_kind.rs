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

use std::borrow::Cow;
use std::fmt;

/// The fixed vocabulary of input message kinds produced by an input source.
///
/// Each variant has a stable wire name (see [`InputKind::name`]) so that an input kind
/// and a custom kind spelled the same way route to the same handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputKind {
    /// Left pointer button pressed.
    MouseLeftDown,
    /// Left pointer button released without a drag.
    MouseLeftUp,
    /// Right pointer button pressed.
    MouseRightDown,
    /// Right pointer button released without a drag.
    MouseRightUp,
    /// Pointer moved while the left button is held.
    MouseLeftDragging,
    /// Pointer moved while the right button is held.
    MouseRightDragging,
    /// Left button released at the end of a drag.
    MouseLeftDrop,
    /// Right button released at the end of a drag.
    MouseRightDrop,
    /// Pointer moved with no button held.
    MouseMove,
    /// Wheel scrolled up.
    MouseWheelUp,
    /// Wheel scrolled down.
    MouseWheelDown,
    /// Key released.
    KeyPressOff,
    /// Key pressed.
    KeyPressOn,
    /// Key held long enough to auto-repeat.
    KeyPressRepeat,
}

impl InputKind {
    /// Every input kind, in declaration order.
    pub const ALL: [Self; 14] = [
        Self::MouseLeftDown,
        Self::MouseLeftUp,
        Self::MouseRightDown,
        Self::MouseRightUp,
        Self::MouseLeftDragging,
        Self::MouseRightDragging,
        Self::MouseLeftDrop,
        Self::MouseRightDrop,
        Self::MouseMove,
        Self::MouseWheelUp,
        Self::MouseWheelDown,
        Self::KeyPressOff,
        Self::KeyPressOn,
        Self::KeyPressRepeat,
    ];

    /// The stable name used as the routing key.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MouseLeftDown => "TheInputMouseLeftDown",
            Self::MouseLeftUp => "TheInputMouseLeftUp",
            Self::MouseRightDown => "TheInputMouseRightDown",
            Self::MouseRightUp => "TheInputMouseRightUp",
            Self::MouseLeftDragging => "TheInputMouseLeftDragging",
            Self::MouseRightDragging => "TheInputMouseRightDragging",
            Self::MouseLeftDrop => "TheInputMouseLeftDrop",
            Self::MouseRightDrop => "TheInputMouseRightDrop",
            Self::MouseMove => "TheInputMouseMove",
            Self::MouseWheelUp => "TheInputMouseWheelUp",
            Self::MouseWheelDown => "TheInputMouseWheelDown",
            Self::KeyPressOff => "TheInputKeyPressOff",
            Self::KeyPressOn => "TheInputKeyPressOn",
            Self::KeyPressRepeat => "TheInputKeyPressRepeat",
        }
    }

    /// Looks up an input kind by its stable name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// True for kinds whose payload is a pointer position.
    #[must_use]
    pub const fn is_pointer(self) -> bool {
        !self.is_key()
    }

    /// True for kinds whose payload is a key code.
    #[must_use]
    pub const fn is_key(self) -> bool {
        matches!(
            self,
            Self::KeyPressOff | Self::KeyPressOn | Self::KeyPressRepeat
        )
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The category of a message, used by the bus as an opaque routing key.
///
/// Application kinds are [`MsgKind::Custom`]. Construct them through
/// [`MsgKind::named`] or the `From<&'static str>` / `From<String>` conversions, which
/// canonicalise names belonging to the input vocabulary into [`MsgKind::Input`], so
/// `"TheInputMouseMove"` and `InputKind::MouseMove` are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MsgKind {
    /// A kind from the fixed input vocabulary.
    Input(InputKind),
    /// An application-defined kind.
    Custom(Cow<'static, str>),
}

impl MsgKind {
    /// Builds a kind from a name, canonicalising input-vocabulary names.
    #[must_use]
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        match InputKind::from_name(&name) {
            Some(input) => Self::Input(input),
            None => Self::Custom(name),
        }
    }

    /// The routing name of this kind.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Input(input) => input.name(),
            Self::Custom(name) => name,
        }
    }

    /// Returns the input kind, if this is one.
    #[must_use]
    pub const fn as_input(&self) -> Option<InputKind> {
        match self {
            Self::Input(input) => Some(*input),
            Self::Custom(_) => None,
        }
    }
}

impl From<InputKind> for MsgKind {
    fn from(kind: InputKind) -> Self {
        Self::Input(kind)
    }
}

impl From<&'static str> for MsgKind {
    fn from(name: &'static str) -> Self {
        Self::named(name)
    }
}

impl From<String> for MsgKind {
    fn from(name: String) -> Self {
        Self::named(name)
    }
}

impl fmt::Display for MsgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_names_round_trip() {
        for kind in InputKind::ALL {
            assert_eq!(InputKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(InputKind::from_name("NotAnInput"), None);
    }

    #[test]
    fn test_named_canonicalises_input_kinds() {
        assert_eq!(
            MsgKind::from("TheInputKeyPressOn"),
            MsgKind::Input(InputKind::KeyPressOn)
        );
        assert_eq!(
            MsgKind::from(String::from("TheInputMouseMove")),
            MsgKind::from(InputKind::MouseMove)
        );
    }

    #[test]
    fn test_custom_kinds_compare_by_name() {
        let borrowed = MsgKind::from("ScoreChanged");
        let owned = MsgKind::from(String::from("ScoreChanged"));
        assert_eq!(borrowed, owned);
        assert_eq!(borrowed.name(), "ScoreChanged");
        assert!(borrowed.as_input().is_none());
    }

    #[test]
    fn test_payload_families() {
        assert!(InputKind::KeyPressRepeat.is_key());
        assert!(InputKind::MouseWheelDown.is_pointer());
        assert!(!InputKind::MouseMove.is_key());
        assert_eq!(InputKind::ALL.iter().filter(|k| k.is_key()).count(), 3);
    }
}
