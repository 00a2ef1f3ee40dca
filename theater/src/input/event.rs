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

/// The physical device an [`InputEvent`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Device {
    /// Unknown or unsupported device.
    #[default]
    Unknown,
    /// Keyboard.
    Keyboard,
    /// Mouse or other pointer.
    Mouse,
    /// Game controller. Not translated yet.
    Joypad,
}

/// What happened, as reported by the input source.
///
/// `NoEvent` and `Unknown` carry no meaning for the bus; every other code maps to
/// exactly one [`InputKind`](theater_core::prelude::InputKind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventCode {
    /// The source had nothing to report.
    #[default]
    NoEvent,
    /// The source saw something it could not classify.
    Unknown,
    /// Left button pressed.
    MouseLeftDown,
    /// Left button released.
    MouseLeftUp,
    /// Right button pressed.
    MouseRightDown,
    /// Right button released.
    MouseRightUp,
    /// Moved with the left button held.
    MouseLeftDragging,
    /// Moved with the right button held.
    MouseRightDragging,
    /// Left button released after a drag.
    MouseLeftDrop,
    /// Right button released after a drag.
    MouseRightDrop,
    /// Moved with no button held.
    MouseMove,
    /// Wheel up.
    MouseWheelUp,
    /// Wheel down.
    MouseWheelDown,
    /// Key released.
    KeyPressOff,
    /// Key pressed.
    KeyPressOn,
    /// Key auto-repeat.
    KeyPressRepeat,
}

/// Physical key identifier as reported by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Scancode(pub u32);

impl fmt::Display for Scancode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Keyboard state attached to key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Keyboard {
    /// The key.
    pub scancode: Scancode,
    /// Non-zero while the key is held down and repeating.
    pub repeat: u8,
}

/// Pointer state attached to mouse events.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Mouse {
    /// Current x coordinate.
    pub x: i32,
    /// Current y coordinate.
    pub y: i32,
    /// Horizontal motion.
    pub move_x: f64,
    /// Vertical motion.
    pub move_y: f64,
}

/// One raw event from an input source.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputEvent {
    /// Source device.
    pub device: Device,
    /// What happened.
    pub code: EventCode,
    /// Keyboard state; meaningful for key codes.
    pub keyboard: Keyboard,
    /// Pointer state; meaningful for mouse codes.
    pub mouse: Mouse,
}

impl InputEvent {
    /// A mouse event at `(x, y)` with motion `(move_x, move_y)`.
    #[must_use]
    pub fn mouse(code: EventCode, x: i32, y: i32, move_x: f64, move_y: f64) -> Self {
        Self {
            device: Device::Mouse,
            code,
            mouse: Mouse {
                x,
                y,
                move_x,
                move_y,
            },
            ..Self::default()
        }
    }

    /// A keyboard event for `scancode`.
    #[must_use]
    pub fn key(code: EventCode, scancode: u32, repeat: u8) -> Self {
        Self {
            device: Device::Keyboard,
            code,
            keyboard: Keyboard {
                scancode: Scancode(scancode),
                repeat,
            },
            ..Self::default()
        }
    }
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.device {
            Device::Keyboard => write!(
                f,
                "keyboard {:?} scancode={} repeat={}",
                self.code, self.keyboard.scancode, self.keyboard.repeat
            ),
            Device::Mouse => write!(
                f,
                "mouse {:?} at ({}, {})",
                self.code, self.mouse.x, self.mouse.y
            ),
            Device::Joypad => write!(f, "joypad {:?}", self.code),
            Device::Unknown => write!(f, "unknown device {:?}", self.code),
        }
    }
}
