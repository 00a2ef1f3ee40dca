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

use theater_core::prelude::{ElementId, InputKind, KeyParams, Message, MsgParams, PointerParams};

use crate::input::{EventCode, InputEvent};

/// Maps a raw event code to its bus message kind.
///
/// Returns `None` for [`EventCode::NoEvent`] and [`EventCode::Unknown`].
#[must_use]
pub const fn input_kind(code: EventCode) -> Option<InputKind> {
    let kind = match code {
        EventCode::NoEvent | EventCode::Unknown => return None,
        EventCode::MouseLeftDown => InputKind::MouseLeftDown,
        EventCode::MouseLeftUp => InputKind::MouseLeftUp,
        EventCode::MouseRightDown => InputKind::MouseRightDown,
        EventCode::MouseRightUp => InputKind::MouseRightUp,
        EventCode::MouseLeftDragging => InputKind::MouseLeftDragging,
        EventCode::MouseRightDragging => InputKind::MouseRightDragging,
        EventCode::MouseLeftDrop => InputKind::MouseLeftDrop,
        EventCode::MouseRightDrop => InputKind::MouseRightDrop,
        EventCode::MouseMove => InputKind::MouseMove,
        EventCode::MouseWheelUp => InputKind::MouseWheelUp,
        EventCode::MouseWheelDown => InputKind::MouseWheelDown,
        EventCode::KeyPressOff => InputKind::KeyPressOff,
        EventCode::KeyPressOn => InputKind::KeyPressOn,
        EventCode::KeyPressRepeat => InputKind::KeyPressRepeat,
    };
    Some(kind)
}

/// Payload for an event of `kind`: pointer data for mouse kinds, key data for key kinds.
#[must_use]
pub fn input_params(kind: InputKind, event: &InputEvent) -> MsgParams {
    if kind.is_key() {
        MsgParams::Key(KeyParams {
            scancode: event.keyboard.scancode.0,
            repeat: event.keyboard.repeat,
        })
    } else {
        MsgParams::Pointer(PointerParams {
            x: event.mouse.x,
            y: event.mouse.y,
            move_x: event.mouse.move_x,
            move_y: event.mouse.move_y,
        })
    }
}

/// Builds the bus message for `event`, stamped with `sender_id`.
///
/// Returns `None` when the event code has no message kind.
#[must_use]
pub fn to_message(event: &InputEvent, sender_id: ElementId) -> Option<Message> {
    let kind = input_kind(event.code)?;
    Some(Message::new(kind, sender_id).with_params(input_params(kind, event)))
}
