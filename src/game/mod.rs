//! Core game systems for the pairs board.

mod deal;
mod faces;
mod flip;
mod grid;
mod occluder;
mod rules;

pub use deal::*;
pub use faces::*;
pub use flip::*;
pub use grid::*;
pub use occluder::*;
pub use rules::*;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{AppSystems, cli};

/// Progress of putting faces on the cards.
#[derive(States, Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Reflect)]
pub enum DealState {
    /// Face models requested (or not yet requested); cards are blank.
    #[default]
    Loading,
    /// Every card carries a hidden face.
    Dealt,
    /// A face model failed to load; cards stay blank for the session.
    Failed,
}

/// Seeded RNG used to shuffle faces onto cards.
#[derive(Resource)]
pub struct DealRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DealRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DealRng {
    fn default() -> Self {
        let seed = cli::seed().unwrap_or_else(entropy_seed);
        Self::new(seed)
    }
}

fn entropy_seed() -> u64 {
    getrandom::u64().unwrap_or_else(|_| {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        nanos ^ 0x9e3779b97f4a7c15
    })
}

/// Execution order for board logic within `AppSystems::Update`.
#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum GameplaySystems {
    Place,
    Load,
    Deal,
    Flip,
}

pub fn plugin(app: &mut App) {
    app.init_state::<DealState>();
    app.init_resource::<DealRng>();
    app.configure_sets(
        Update,
        (
            GameplaySystems::Place,
            GameplaySystems::Load,
            GameplaySystems::Deal,
            GameplaySystems::Flip,
        )
            .chain()
            .in_set(AppSystems::Update),
    );
    app.add_plugins((
        deal::plugin,
        faces::plugin,
        flip::plugin,
        grid::plugin,
    ));
    app.add_systems(Startup, log_deal_seed);
}

fn log_deal_seed(rng: Res<DealRng>) {
    info!("Deal seed: {} (pass --seed={} to replay)", rng.seed, rng.seed);
}
