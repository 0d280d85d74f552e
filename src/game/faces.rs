//! Face models: requesting the models the cards are dealt from and waiting
//! for all of them.
//!
//! Requests are issued together and may finish in any order. The outcome is
//! decided by [`join_ordered`]: every model loaded, in request order, or the
//! first failure in request order. Either way the pending requests are dropped
//! and the outcome is reported exactly once.

use bevy::{
    asset::RecursiveDependencyLoadState, ecs::message::Message, gltf::Gltf, prelude::*,
};
use std::task::Poll;
use thiserror::Error;

use super::{DealState, FACE_MODELS, GameplaySystems};
use crate::session::SessionPhase;

pub(super) fn plugin(app: &mut App) {
    app.add_message::<FacesLoaded>();
    app.add_systems(OnEnter(SessionPhase::Anchored), request_face_models::<Gltf>);
    app.add_systems(
        Update,
        poll_face_models::<Gltf>
            .in_set(GameplaySystems::Load)
            .run_if(resource_exists::<FaceRequests<Gltf>>),
    );
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FaceLoadError {
    #[error("face model `{name}` failed to load: {reason}")]
    Asset { name: &'static str, reason: String },
    #[error("face model `{name}` has no scene")]
    MissingScene { name: &'static str },
}

/// A model file a face can be drawn from.
pub trait FaceSource: Asset {
    /// The scene to spawn under a card, if the file has one.
    fn face_scene(&self) -> Option<Handle<Scene>>;
}

impl FaceSource for Gltf {
    fn face_scene(&self) -> Option<Handle<Scene>> {
        self.scenes.first().cloned()
    }
}

/// A face model that has been asked for. The handle is the model file
/// itself, so a file that fails to parse fails the request.
pub struct FaceRequest<A: Asset> {
    pub name: &'static str,
    pub model: Handle<A>,
}

/// Face models still in flight, in request order. Removed once the combined
/// load settles.
#[derive(Resource)]
pub struct FaceRequests<A: Asset>(pub Vec<FaceRequest<A>>);

/// A face model ready to be placed.
#[derive(Debug, Clone)]
pub struct LoadedFace {
    /// Position of the model in the request order.
    pub asset: usize,
    pub name: &'static str,
    pub scene: Handle<Scene>,
}

/// Fired once when every face model has loaded.
#[derive(Message, Debug, Clone)]
pub struct FacesLoaded {
    pub faces: Vec<LoadedFace>,
}

/// Asset path of a face model file.
pub fn face_model_path(name: &str) -> String {
    format!("models/{name}.glb")
}

/// Fold per-request results into one: `Ready(Ok)` with every value in input
/// order once all are ready, `Ready(Err)` with the first error in input order
/// as soon as any request has failed, `Pending` otherwise.
pub fn join_ordered<T, E>(
    polls: impl IntoIterator<Item = Poll<Result<T, E>>>,
) -> Poll<Result<Vec<T>, E>> {
    let mut values = Vec::new();
    let mut pending = false;
    for poll in polls {
        match poll {
            Poll::Ready(Ok(value)) => values.push(value),
            Poll::Ready(Err(err)) => return Poll::Ready(Err(err)),
            Poll::Pending => pending = true,
        }
    }
    if pending {
        Poll::Pending
    } else {
        Poll::Ready(Ok(values))
    }
}

/// Where a single request stands, given what the asset server reports for
/// the model file and, once loaded, the model itself.
pub fn request_status<A: FaceSource>(
    name: &'static str,
    state: Option<RecursiveDependencyLoadState>,
    model: Option<&A>,
) -> Poll<Result<Handle<Scene>, FaceLoadError>> {
    match state {
        Some(RecursiveDependencyLoadState::Loaded) => Poll::Ready(
            model
                .and_then(FaceSource::face_scene)
                .ok_or(FaceLoadError::MissingScene { name }),
        ),
        Some(RecursiveDependencyLoadState::Failed(err)) => {
            Poll::Ready(Err(FaceLoadError::Asset {
                name,
                reason: err.to_string(),
            }))
        }
        _ => Poll::Pending,
    }
}

fn request_face_models<A: FaceSource>(mut commands: Commands, asset_server: Res<AssetServer>) {
    let requests = FACE_MODELS
        .iter()
        .map(|&name| FaceRequest {
            name,
            model: asset_server.load::<A>(face_model_path(name)),
        })
        .collect::<Vec<_>>();
    info!("Requested {} face models", requests.len());
    commands.insert_resource(FaceRequests(requests));
}

fn poll_face_models<A: FaceSource>(
    mut commands: Commands,
    requests: Res<FaceRequests<A>>,
    models: Res<Assets<A>>,
    asset_server: Res<AssetServer>,
    mut loaded: MessageWriter<FacesLoaded>,
    mut next_deal: ResMut<NextState<DealState>>,
) {
    let polls = requests.0.iter().enumerate().map(|(asset, request)| {
        let state = asset_server.get_recursive_dependency_load_state(request.model.id());
        request_status(request.name, state, models.get(&request.model)).map_ok(|scene| {
            LoadedFace {
                asset,
                name: request.name,
                scene,
            }
        })
    });

    let Poll::Ready(outcome) = join_ordered(polls) else {
        return;
    };
    commands.remove_resource::<FaceRequests<A>>();

    match outcome {
        Ok(faces) => {
            info!("All {} face models loaded", faces.len());
            loaded.write(FacesLoaded { faces });
        }
        Err(err) => {
            error!("{err}");
            next_deal.set(DealState::Failed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::{
        asset::{AssetLoader, AssetMetaCheck, LoadContext, io::Reader},
        state::app::StatesPlugin,
    };

    fn ready<T>(value: T) -> Poll<Result<T, &'static str>> {
        Poll::Ready(Ok(value))
    }

    #[test]
    fn join_keeps_request_order() {
        let joined = join_ordered([ready(3), ready(1), ready(2)]);
        assert_eq!(joined, Poll::Ready(Ok(vec![3, 1, 2])));
    }

    #[test]
    fn join_waits_for_every_request() {
        let joined = join_ordered([ready(1), Poll::Pending, ready(3)]);
        assert_eq!(joined, Poll::Pending);
    }

    #[test]
    fn join_fails_as_soon_as_any_request_fails() {
        let joined = join_ordered([ready(1), Poll::Pending, Poll::Ready(Err("toy_car"))]);
        assert_eq!(joined, Poll::Ready(Err("toy_car")));
    }

    #[test]
    fn join_reports_first_failure_in_request_order() {
        let joined: Poll<Result<Vec<u8>, _>> = join_ordered([
            Poll::Pending,
            Poll::Ready(Err("gramophone")),
            Poll::Ready(Err("tv_retro")),
        ]);
        assert_eq!(joined, Poll::Ready(Err("gramophone")));
    }

    #[test]
    fn join_of_nothing_is_ready_and_empty() {
        let joined = join_ordered(std::iter::empty::<Poll<Result<u8, ()>>>());
        assert_eq!(joined, Poll::Ready(Ok(Vec::new())));
    }

    #[derive(Asset, TypePath)]
    struct TestModel {
        scene: Option<Handle<Scene>>,
    }

    impl FaceSource for TestModel {
        fn face_scene(&self) -> Option<Handle<Scene>> {
            self.scene.clone()
        }
    }

    /// Reads `scene` as a model with a scene, `empty` as a model without one,
    /// and rejects anything else.
    #[derive(TypePath)]
    struct TestModelLoader;

    impl AssetLoader for TestModelLoader {
        type Asset = TestModel;
        type Settings = ();
        type Error = std::io::Error;

        async fn load(
            &self,
            reader: &mut dyn Reader,
            _settings: &(),
            _load_context: &mut LoadContext<'_>,
        ) -> Result<TestModel, Self::Error> {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            match bytes.as_slice() {
                b"scene" => Ok(TestModel {
                    scene: Some(Handle::default()),
                }),
                b"empty" => Ok(TestModel { scene: None }),
                _ => Err(std::io::Error::other("not a model file")),
            }
        }

        fn extensions(&self) -> &[&str] {
            &["glb"]
        }
    }

    #[test]
    fn request_status_follows_recursive_load_state() {
        let model = TestModel {
            scene: Some(Handle::default()),
        };
        assert_eq!(
            request_status("toy_car", Some(RecursiveDependencyLoadState::Loaded), Some(&model)),
            Poll::Ready(Ok(Handle::default()))
        );
        assert_eq!(
            request_status::<TestModel>("toy_car", Some(RecursiveDependencyLoadState::Loading), None),
            Poll::Pending
        );
        assert_eq!(request_status::<TestModel>("toy_car", None, None), Poll::Pending);
    }

    #[test]
    fn loaded_model_without_a_scene_fails() {
        let model = TestModel { scene: None };
        assert_eq!(
            request_status("gramophone", Some(RecursiveDependencyLoadState::Loaded), Some(&model)),
            Poll::Ready(Err(FaceLoadError::MissingScene { name: "gramophone" }))
        );
    }

    /// Names of the faces in every `FacesLoaded` seen so far.
    #[derive(Resource, Default)]
    struct LoadedBatches(Vec<Vec<&'static str>>);

    fn record_batches(mut loaded: MessageReader<FacesLoaded>, mut batches: ResMut<LoadedBatches>) {
        for batch in loaded.read() {
            batches.0.push(batch.faces.iter().map(|face| face.name).collect());
        }
    }

    /// An app that loads face models from a fresh directory holding
    /// `contents(name)` for every model.
    fn loading_app(contents: impl Fn(&str) -> &'static [u8]) -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("temp dir");
        let models = dir.path().join("models");
        std::fs::create_dir(&models).expect("models dir");
        for name in FACE_MODELS {
            std::fs::write(models.join(format!("{name}.glb")), contents(name)).expect("model file");
        }

        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            AssetPlugin {
                file_path: dir.path().display().to_string(),
                watch_for_changes_override: Some(false),
                meta_check: AssetMetaCheck::Never,
                ..default()
            },
            StatesPlugin,
        ));
        app.init_asset::<TestModel>();
        app.register_asset_loader(TestModelLoader);
        app.init_state::<DealState>();
        app.add_message::<FacesLoaded>();
        app.init_resource::<LoadedBatches>();
        app.add_systems(Startup, request_face_models::<TestModel>);
        app.add_systems(
            Update,
            (
                poll_face_models::<TestModel>.run_if(resource_exists::<FaceRequests<TestModel>>),
                record_batches,
            )
                .chain(),
        );
        (app, dir)
    }

    /// Update until the requests are released, then once more so queued
    /// state changes apply.
    fn run_until_settled(app: &mut App) {
        for _ in 0..2000 {
            app.update();
            if !app.world().contains_resource::<FaceRequests<TestModel>>() {
                app.update();
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        panic!("face model requests never settled");
    }

    fn deal_state(app: &App) -> DealState {
        *app.world().resource::<State<DealState>>().get()
    }

    #[test]
    fn every_model_loaded_delivers_one_batch_in_request_order() {
        let (mut app, _dir) = loading_app(|_| b"scene".as_slice());
        run_until_settled(&mut app);

        let batches = &app.world().resource::<LoadedBatches>().0;
        assert_eq!(batches, &vec![FACE_MODELS.to_vec()]);
        assert_eq!(deal_state(&app), DealState::Loading);

        // Nothing more arrives once the requests are gone.
        app.update();
        assert_eq!(app.world().resource::<LoadedBatches>().0.len(), 1);
    }

    #[test]
    fn corrupt_model_file_fails_the_whole_load() {
        let (mut app, _dir) = loading_app(|name| match name {
            "toy_drummer" => b"corrupt".as_slice(),
            _ => b"scene".as_slice(),
        });
        run_until_settled(&mut app);

        assert_eq!(deal_state(&app), DealState::Failed);
        assert!(app.world().resource::<LoadedBatches>().0.is_empty());
    }

    #[test]
    fn model_without_a_scene_fails_the_whole_load() {
        let (mut app, _dir) = loading_app(|name| match name {
            "tv_retro" => b"empty".as_slice(),
            _ => b"scene".as_slice(),
        });
        run_until_settled(&mut app);

        assert_eq!(deal_state(&app), DealState::Failed);
        assert!(app.world().resource::<LoadedBatches>().0.is_empty());
    }

    #[test]
    fn load_error_names_the_failing_model() {
        let err = FaceLoadError::Asset {
            name: "toy_drummer",
            reason: "file not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "face model `toy_drummer` failed to load: file not found"
        );
    }

    #[test]
    fn face_models_live_under_models_dir() {
        assert_eq!(face_model_path("toy_car"), "models/toy_car.glb");
    }
}
