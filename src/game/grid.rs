//! Card grid: anchoring the board to a surface and laying out the cards.

use bevy::prelude::*;

use super::{
    CARD_COUNT, CARD_SIZE, CARD_SPACING, GRID_COLUMNS, GameplaySystems, MIN_PLANE_BOUNDS,
    spawn_occluder,
};
use crate::{
    input::on_card_click,
    session::{PlaneDetected, SessionPhase},
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        place_board
            .in_set(GameplaySystems::Place)
            .run_if(in_state(SessionPhase::Scanning)),
    );
}

/// The reference frame bound to a detected surface. Parent of every card and
/// the occluder.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct SurfaceAnchor {
    /// Extents of the surface this anchor was placed on.
    pub extents: Vec2,
}

/// A placeholder card on the board.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Card {
    pub index: usize,
}

/// The cards on the board, by stable index.
#[derive(Resource, Debug, Clone)]
pub struct CardGrid {
    pub cards: [Entity; CARD_COUNT],
    /// Hidden face model under each card, once dealt.
    pub faces: [Option<Entity>; CARD_COUNT],
}

impl CardGrid {
    pub fn is_dealt(&self) -> bool {
        self.faces.iter().all(Option::is_some)
    }
}

/// Column and row of a card in the grid.
pub fn grid_cell(index: usize) -> (usize, usize) {
    (index % GRID_COLUMNS, index / GRID_COLUMNS)
}

/// Position of a card relative to the anchor. The grid is centered on the
/// anchor and lies in its XZ plane.
pub fn grid_position(index: usize) -> Vec3 {
    let (column, row) = grid_cell(index);
    let rows = CARD_COUNT.div_ceil(GRID_COLUMNS);
    let column_offset = (GRID_COLUMNS as f32 - 1.0) * 0.5;
    let row_offset = (rows as f32 - 1.0) * 0.5;
    Vec3::new(
        (column as f32 - column_offset) * CARD_SPACING,
        0.0,
        (row as f32 - row_offset) * CARD_SPACING,
    )
}

/// Width (X) and depth (Z) covered by the cards.
pub fn grid_footprint() -> Vec2 {
    let rows = CARD_COUNT.div_ceil(GRID_COLUMNS);
    Vec2::new(
        (GRID_COLUMNS as f32 - 1.0) * CARD_SPACING + CARD_SIZE[0],
        (rows as f32 - 1.0) * CARD_SPACING + CARD_SIZE[2],
    )
}

fn place_board(
    mut commands: Commands,
    mut planes: MessageReader<PlaneDetected>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    clear_color: Res<ClearColor>,
    mut next_phase: ResMut<NextState<SessionPhase>>,
) {
    let Some(plane) = planes.read().find(|plane| plane.fits(MIN_PLANE_BOUNDS)) else {
        return;
    };

    info!(
        "Anchoring board to {:.2}m x {:.2}m plane at {:?}",
        plane.extents.x, plane.extents.y, plane.transform.translation
    );

    let grid = spawn_board(
        &mut commands,
        &mut meshes,
        &mut materials,
        plane,
        clear_color.0,
    );
    commands.insert_resource(grid);
    next_phase.set(SessionPhase::Anchored);
}

/// Spawn the anchor for `plane` with its cards and occluder.
pub fn spawn_board(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    plane: &PlaneDetected,
    backdrop: Color,
) -> CardGrid {
    let anchor = commands
        .spawn((
            Name::new("Surface Anchor"),
            SurfaceAnchor {
                extents: plane.extents,
            },
            plane.transform,
            Visibility::default(),
        ))
        .id();

    let cards = spawn_card_grid(commands, meshes, materials, anchor);
    spawn_occluder(commands, meshes, materials, anchor, backdrop);

    CardGrid {
        cards,
        faces: [None; CARD_COUNT],
    }
}

/// Spawn the face-down cards as children of `anchor`. Clicks on a card or on
/// anything below it become taps.
pub fn spawn_card_grid(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    anchor: Entity,
) -> [Entity; CARD_COUNT] {
    let [width, height, depth] = CARD_SIZE;
    let mesh = meshes.add(Cuboid::new(width, height, depth));
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.35, 0.34, 0.84),
        metallic: 1.0,
        perceptual_roughness: 0.4,
        ..default()
    });

    std::array::from_fn(|index| {
        commands
            .spawn((
                Name::new(format!("Card {index}")),
                Card { index },
                Pickable::default(),
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                Transform::from_translation(grid_position(index)),
                ChildOf(anchor),
            ))
            .observe(on_card_click)
            .id()
    })
}
