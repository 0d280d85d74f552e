// Support configuring Bevy lints within code.
#![cfg_attr(bevy_lint, feature(register_tool), register_tool(bevy))]
// Disable console on Windows for non-dev builds.
#![cfg_attr(not(feature = "dev"), windows_subsystem = "windows")]

mod cli;
#[cfg(feature = "dev")]
mod dev_tools;
mod game;
mod input;
mod session;

#[cfg(feature = "dev_native")]
use bevy::remote::http::RemoteHttpPlugin;
use bevy::{asset::AssetMetaCheck, prelude::*};
use bevy_tweening::TweeningPlugin;

fn main() -> AppExit {
    App::new().add_plugins(AppPlugin).run()
}

pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        // Add Bevy plugins.
        app.add_plugins((
            DefaultPlugins
                .set(AssetPlugin {
                    // Wasm builds will check for meta files (that don't exist) if this isn't set.
                    // This causes errors and even panics on web build on itch.
                    // See https://github.com/bevyengine/bevy_github_ci_template/issues/48.
                    meta_check: AssetMetaCheck::Never,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Window {
                        title: "Pairs".to_string(),
                        fit_canvas_to_parent: true,
                        ..default()
                    }
                    .into(),
                    ..default()
                }),
            MeshPickingPlugin,
            TweeningPlugin,
        ));

        app.insert_resource(MeshPickingSettings {
            require_markers: true,
            ..default()
        });
        app.insert_resource(ClearColor(session::BACKDROP_COLOR));

        // Add other plugins.
        app.add_plugins((
            #[cfg(feature = "dev")]
            dev_tools::plugin,
            game::plugin,
            input::plugin,
            session::plugin,
        ));

        // Add Bevy Remote Protocol for debugging (native dev only)
        #[cfg(feature = "dev_native")]
        {
            use bevy::remote::RemotePlugin;

            let port = cli::brp_port().unwrap_or(15702);

            app.add_plugins(RemotePlugin::default());
            app.add_plugins(RemoteHttpPlugin::default().with_port(port));
            info!("BRP listening on port {}", port);
        }

        // Order new `AppSystems` variants by adding them here:
        app.configure_sets(
            Update,
            (AppSystems::RecordInput, AppSystems::Update).chain(),
        );

        // Spawn the main camera.
        app.add_systems(Startup, spawn_camera);
    }
}

/// High-level groupings of systems for the app in the `Update` schedule.
/// When adding a new variant, make sure to order it in the `configure_sets`
/// call above.
#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub(crate) enum AppSystems {
    /// Record player input.
    RecordInput,
    /// Do everything else (consider splitting this into further variants).
    Update,
}

fn spawn_camera(mut commands: Commands) {
    // Roughly where a handheld device hovers over a table.
    let camera_transform = Transform::from_xyz(0.0, 0.45, 0.35).looking_at(Vec3::ZERO, Vec3::Y);
    commands.spawn((
        Name::new("Camera"),
        Camera3d::default(),
        camera_transform,
        MeshPickingCamera,
    ));
}
