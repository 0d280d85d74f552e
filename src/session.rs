//! Tracking session: configuration, detected surfaces, and scene lighting.
//!
//! World tracking itself lives outside the game. Whatever tracks the world
//! reports surfaces as [`PlaneDetected`] messages; on desktop a stand-in
//! reports a single table plane at the origin once the session starts.

use bevy::{ecs::message::Message, prelude::*};

use crate::AppSystems;

/// Background colour, also used by the occluder so it reads as "nothing".
pub const BACKDROP_COLOR: Color = Color::srgb(0.05, 0.05, 0.07);

/// Extents the desktop stand-in reports for its table plane.
const TABLE_PLANE_EXTENTS: Vec2 = Vec2::new(0.6, 0.6);

pub(super) fn plugin(app: &mut App) {
    app.init_state::<SessionPhase>();
    app.init_resource::<ArSessionConfig>();
    app.add_message::<PlaneDetected>();

    app.add_systems(Startup, (start_session, report_table_plane).chain());
    app.add_systems(
        Update,
        log_detected_planes
            .in_set(AppSystems::RecordInput)
            .run_if(in_state(SessionPhase::Scanning)),
    );
}

/// Where the session is in bringing the board up.
#[derive(States, Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Reflect)]
pub enum SessionPhase {
    /// Waiting for a surface large enough to hold the board.
    #[default]
    Scanning,
    /// The board is anchored to a surface.
    Anchored,
}

/// How the tracking session is configured.
#[derive(Resource, Debug, Clone, Reflect)]
#[reflect(Resource)]
pub struct ArSessionConfig {
    /// Look for horizontal surfaces. The board can only rest on those.
    pub horizontal_planes: bool,
    /// Light the scene automatically rather than leaving it unlit.
    pub environment_lighting: bool,
    /// Outline anchored surfaces (dev builds only).
    pub show_anchor_geometry: bool,
}

impl Default for ArSessionConfig {
    fn default() -> Self {
        Self {
            horizontal_planes: true,
            environment_lighting: true,
            show_anchor_geometry: true,
        }
    }
}

/// A horizontal surface reported by world tracking.
#[derive(Message, Debug, Clone)]
pub struct PlaneDetected {
    /// Pose of the plane's center; the plane's normal is local +Y.
    pub transform: Transform,
    /// Width (local X) and depth (local Z) of the plane in meters.
    pub extents: Vec2,
}

impl PlaneDetected {
    /// Whether this plane can hold something that needs `min_bounds` of room.
    pub fn fits(&self, min_bounds: Vec2) -> bool {
        self.extents.x >= min_bounds.x && self.extents.y >= min_bounds.y
    }
}

fn start_session(mut commands: Commands, config: Res<ArSessionConfig>) {
    info!(
        "Starting session: horizontal planes {}, environment lighting {}",
        config.horizontal_planes, config.environment_lighting
    );

    if !config.environment_lighting {
        return;
    }

    commands.insert_resource(GlobalAmbientLight {
        color: Color::WHITE,
        brightness: 600.0,
        affects_lightmapped_meshes: true,
    });

    commands.spawn((
        Name::new("Session Sun"),
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(0.6, 1.2, 0.6).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Desktop stand-in for world tracking: the table is the world origin.
fn report_table_plane(config: Res<ArSessionConfig>, mut planes: MessageWriter<PlaneDetected>) {
    if !config.horizontal_planes {
        return;
    }
    planes.write(PlaneDetected {
        transform: Transform::IDENTITY,
        extents: TABLE_PLANE_EXTENTS,
    });
}

fn log_detected_planes(mut planes: MessageReader<PlaneDetected>) {
    for plane in planes.read() {
        debug!(
            "Plane detected at {:?} ({:.2}m x {:.2}m)",
            plane.transform.translation, plane.extents.x, plane.extents.y
        );
    }
}
