//! Occluder: a solid block under the board that hides anything below it.
//!
//! There is no depth-only material here, so the block is drawn unlit in the
//! backdrop colour. Geometry behind it disappears into the background the
//! same way it would behind a camera feed.

use bevy::prelude::*;

use super::{CARD_SIZE, OCCLUDER_GAP, OCCLUDER_SIZE, grid_footprint};

#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Occluder;

/// Center of the occluder relative to the anchor: directly below the grid,
/// top face just under the cards.
pub fn occluder_position() -> Vec3 {
    Vec3::new(
        0.0,
        -(CARD_SIZE[1] * 0.5 + OCCLUDER_GAP + OCCLUDER_SIZE * 0.5),
        0.0,
    )
}

pub fn spawn_occluder(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    anchor: Entity,
    backdrop: Color,
) -> Entity {
    debug_assert!(grid_footprint().max_element() <= OCCLUDER_SIZE);

    commands
        .spawn((
            Name::new("Occluder"),
            Occluder,
            // Blocks picks so taps below the board resolve to nothing.
            Pickable::default(),
            Mesh3d(meshes.add(Cuboid::from_length(OCCLUDER_SIZE))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: backdrop,
                unlit: true,
                ..default()
            })),
            Transform::from_translation(occluder_position()),
            ChildOf(anchor),
        ))
        .id()
}
