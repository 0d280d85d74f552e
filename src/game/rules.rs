use bevy::math::Vec2;

/// Number of cards on the board.
pub const CARD_COUNT: usize = 12;
/// Cards per row.
pub const GRID_COLUMNS: usize = 4;
/// Distance between neighbouring card centers, in meters.
pub const CARD_SPACING: f32 = 0.1;
/// Card box size (width, height, depth) in meters.
pub const CARD_SIZE: [f32; 3] = [0.06, 0.01, 0.08];
/// Smallest surface the board may be anchored to.
pub const MIN_PLANE_BOUNDS: Vec2 = Vec2::new(0.4, 0.4);

/// Edge length of the occluder cube.
pub const OCCLUDER_SIZE: f32 = 0.5;
/// Gap between the card plane and the occluder's top face.
pub const OCCLUDER_GAP: f32 = 0.001;

/// Models dealt onto the cards, each placed twice.
pub const FACE_MODELS: [&str; 6] = [
    "toy_biplane",
    "toy_car",
    "toy_drummer",
    "toy_robot_vintage",
    "gramophone",
    "tv_retro",
];
/// Copies of each model on the board.
pub const COPIES_PER_FACE: usize = 2;
/// Uniform scale applied to face models.
pub const FACE_SCALE: f32 = 0.002;

/// Length of a flip animation, in seconds.
pub const FLIP_DURATION_SECS: f32 = 0.25;
/// How close (radians) a card must be to face up to count as flipped. Loose
/// enough to absorb `f32` error in `Quat::angle_between` near zero.
pub const FLIP_TOLERANCE: f32 = 1e-2;

const _: () = assert!(FACE_MODELS.len() * COPIES_PER_FACE == CARD_COUNT);
