//! Turning picked clicks and touches into taps on entities.
//!
//! Hit testing is left to mesh picking. Cards observe `Pointer<Click>`, which
//! bubbles up from any mesh below them, and forward the entity that was hit.

use bevy::{ecs::message::Message, prelude::*};

pub(super) fn plugin(app: &mut App) {
    app.add_message::<TapMessage>();
}

/// A tap that landed on `entity`.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapMessage {
    pub entity: Entity,
}

pub fn on_card_click(click: On<Pointer<Click>>, mut taps: MessageWriter<TapMessage>) {
    taps.write(TapMessage {
        entity: click.original_event_target(),
    });
}
