//! Dealing: putting two copies of every face model under the cards in a
//! random order.

use bevy::prelude::*;
use rand::{Rng, seq::SliceRandom};

use super::{
    CardGrid, COPIES_PER_FACE, DealRng, DealState, FACE_SCALE, FacesLoaded, GameplaySystems,
    LoadedFace, face_up_rotation,
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (
            deal_faces.run_if(resource_exists::<CardGrid>),
            make_face_meshes_pickable,
        )
            .in_set(GameplaySystems::Deal),
    );
}

/// A face model dealt onto a card.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct FaceModel {
    /// Which of the loaded models this is a copy of.
    pub asset: usize,
}

/// `copies` of every face, shuffled. Every ordering is equally likely.
pub fn deal<T: Clone, R: Rng + ?Sized>(faces: &[T], copies: usize, rng: &mut R) -> Vec<T> {
    let mut dealt: Vec<T> = faces
        .iter()
        .flat_map(|face| std::iter::repeat_n(face, copies))
        .cloned()
        .collect();
    dealt.shuffle(rng);
    dealt
}

fn deal_faces(
    mut commands: Commands,
    mut loaded: MessageReader<FacesLoaded>,
    mut grid: ResMut<CardGrid>,
    mut rng: ResMut<DealRng>,
    mut next_deal: ResMut<NextState<DealState>>,
) {
    for batch in loaded.read() {
        if grid.is_dealt() {
            warn!("Faces already dealt, ignoring another batch");
            continue;
        }
        let placed = place_faces(&mut commands, &mut grid, &batch.faces, &mut rng.rng);
        info!("Dealt {} faces (seed {})", placed.len(), rng.seed);
        next_deal.set(DealState::Dealt);
    }
}

/// Face scenes spawn their meshes a frame or more after the face itself. Mark
/// them pickable as they appear so clicks on a model reach its card.
fn make_face_meshes_pickable(
    mut commands: Commands,
    new_meshes: Query<Entity, (Added<Mesh3d>, Without<Pickable>)>,
    parents: Query<&ChildOf>,
    faces: Query<(), With<FaceModel>>,
) {
    for mesh in &new_meshes {
        if parents.iter_ancestors(mesh).any(|e| faces.contains(e)) {
            commands.entity(mesh).insert(Pickable::default());
        }
    }
}

/// Shuffle `faces` onto the cards of `grid`, one copy per card, each hidden
/// face down under its card.
pub fn place_faces<R: Rng + ?Sized>(
    commands: &mut Commands,
    grid: &mut CardGrid,
    faces: &[LoadedFace],
    rng: &mut R,
) -> Vec<Entity> {
    let dealt = deal(faces, COPIES_PER_FACE, rng);
    if dealt.len() != grid.cards.len() {
        warn!(
            "Dealing {} faces onto {} cards; some cards stay blank",
            dealt.len(),
            grid.cards.len()
        );
    }

    let mut placed = Vec::with_capacity(dealt.len());
    for (index, face) in dealt.iter().enumerate().take(grid.cards.len()) {
        let card = grid.cards[index];
        let entity = commands
            .spawn((
                Name::new(format!("Face {index} ({})", face.name)),
                FaceModel { asset: face.asset },
                SceneRoot(face.scene.clone()),
                Transform::from_rotation(face_up_rotation()).with_scale(Vec3::splat(FACE_SCALE)),
                ChildOf(card),
            ))
            .id();
        grid.faces[index] = Some(entity);
        placed.push(entity);
    }
    placed
}
