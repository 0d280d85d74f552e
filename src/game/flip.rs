//! Flipping cards in response to taps.
//!
//! A card is face up when its rotation is a half turn about X, and face down
//! otherwise. Nothing else records which way a card is facing; each tap reads
//! the card's current rotation and animates it to the other side.

use bevy::{math::curve::EaseFunction, prelude::*};
use bevy_tweening::{Tween, TweenAnim, lens::TransformRotationLens};
use std::{f32::consts::PI, time::Duration};

use super::{Card, FLIP_DURATION_SECS, FLIP_TOLERANCE, GameplaySystems};
use crate::{input::TapMessage, session::SessionPhase};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        handle_taps
            .in_set(GameplaySystems::Flip)
            .run_if(in_state(SessionPhase::Anchored)),
    );
}

/// Rotation of a face-up card: a half turn about X.
pub fn face_up_rotation() -> Quat {
    Quat::from_rotation_x(PI)
}

pub fn is_face_up(rotation: Quat) -> bool {
    rotation.angle_between(face_up_rotation()) <= FLIP_TOLERANCE
}

/// Where a flip starting from `rotation` ends up.
pub fn flip_target(rotation: Quat) -> Quat {
    if is_face_up(rotation) {
        Quat::IDENTITY
    } else {
        face_up_rotation()
    }
}

/// Walk up from a hit entity to the card that owns it, if any.
pub fn resolve_card(
    entity: Entity,
    is_card: impl Fn(Entity) -> bool,
    parents: &Query<&ChildOf>,
) -> Option<Entity> {
    let mut current = entity;
    loop {
        if is_card(current) {
            return Some(current);
        }
        current = parents.get(current).ok()?.parent();
    }
}

fn handle_taps(
    mut commands: Commands,
    mut taps: MessageReader<TapMessage>,
    cards: Query<(&Card, &Transform)>,
    parents: Query<&ChildOf>,
) {
    for tap in taps.read() {
        let Some(card) = resolve_card(tap.entity, |e| cards.contains(e), &parents) else {
            continue;
        };
        let Ok((&Card { index }, transform)) = cards.get(card) else {
            continue;
        };

        let from = transform.rotation;
        let to = flip_target(from);
        debug!(
            "Flipping card {index} {}",
            if is_face_up(to) { "face up" } else { "face down" }
        );
        // Replacing an in-flight tween retargets it from wherever it got to.
        commands.entity(card).insert(TweenAnim::new(Tween::new(
            EaseFunction::CubicInOut,
            Duration::from_secs_f32(FLIP_DURATION_SECS),
            TransformRotationLens {
                start: from,
                end: to,
            },
        )));
    }
}
