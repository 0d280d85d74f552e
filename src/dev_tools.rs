//! Development tools for the game. This plugin is only enabled in dev builds.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use crate::{
    game::{DealState, SurfaceAnchor, grid_footprint},
    session::{ArSessionConfig, SessionPhase},
};

const TOGGLE_KEY: KeyCode = KeyCode::F3;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Update, log_transition::<SessionPhase>);
    app.add_systems(Update, log_transition::<DealState>);
    app.add_systems(
        Update,
        toggle_anchor_geometry.run_if(input_just_pressed(TOGGLE_KEY)),
    );
    app.add_systems(
        Update,
        draw_anchor_geometry.run_if(|config: Res<ArSessionConfig>| config.show_anchor_geometry),
    );
}

fn log_transition<S: States>(mut transitions: MessageReader<StateTransitionEvent<S>>) {
    for transition in transitions.read() {
        info!("{:?} -> {:?}", transition.exited, transition.entered);
    }
}

fn toggle_anchor_geometry(mut config: ResMut<ArSessionConfig>) {
    config.show_anchor_geometry = !config.show_anchor_geometry;
}

/// Outline each anchored surface and the part of it the cards cover.
fn draw_anchor_geometry(mut gizmos: Gizmos, anchors: Query<(&SurfaceAnchor, &GlobalTransform)>) {
    // Gizmo rects lie in their local XY plane; turn them flat onto XZ.
    let flat = Quat::from_rotation_x(std::f32::consts::FRAC_PI_2);
    for (anchor, transform) in &anchors {
        let (_, rotation, translation) = transform.to_scale_rotation_translation();
        let isometry = Isometry3d::new(translation, rotation * flat);
        gizmos.rect(isometry, anchor.extents, Color::srgb(0.2, 0.8, 0.9));
        gizmos.rect(isometry, grid_footprint(), Color::srgb(0.9, 0.7, 0.2));
    }
}
