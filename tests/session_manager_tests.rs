// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session lifecycle tests: create, validate, store, persist, rehydrate,
//! re-select.

use chrono::Utc;
use mapty_tracker::config::Config;
use mapty_tracker::db::{KeyValueStore, MemoryStore};
use mapty_tracker::error::AppError;
use mapty_tracker::models::{Location, WorkoutForm, WorkoutKind};
use mapty_tracker::services::codec;
use mapty_tracker::services::session::{GEOLOCATION_ALERT, INVALID_INPUT_ALERT};
use mapty_tracker::services::{
    CommandBuffer, FixedPosition, FormState, GeolocationError, MapState, RenderCommand,
    SessionConfig, SessionManager,
};

mod common;
use common::{ready_session, test_session, FailingStore, HOME};

const KEY: &str = "workouts";

fn log_running(session: &mut SessionManager<MemoryStore, CommandBuffer>) -> String {
    session.map_click(Location::new(39.0, -12.0)).unwrap();
    let workout = session
        .submit(WorkoutForm::running(5.2, 24.0, 178.0))
        .expect("valid running workout");
    workout.id().to_string()
}

#[test]
fn test_submit_running_example() {
    let store = MemoryStore::new();
    let mut session = ready_session(&store);
    let before = session.store().len();

    session.map_click(Location::new(39.0, -12.0)).unwrap();
    let workout = session
        .submit(WorkoutForm::running(5.2, 24.0, 178.0))
        .expect("valid running workout");

    assert_eq!(workout.kind(), WorkoutKind::Running);
    assert_eq!(workout.pace(), Some(4.6));
    assert_eq!(workout.location(), Location::new(39.0, -12.0));
    let today = Utc::now().format("%B %-d").to_string();
    assert!(
        workout.description().contains(&today),
        "description {:?} should contain {:?}",
        workout.description(),
        today
    );
    assert_eq!(session.store().len(), before + 1);

    // Persisted text reproduces a running workout with the same pace
    let text = store.load(KEY).unwrap().expect("session should be persisted");
    let decoded = codec::decode(&text);
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].kind(), WorkoutKind::Running);
    assert_eq!(decoded[0].pace(), Some(4.6));
    assert_eq!(decoded[0], workout);
}

#[test]
fn test_submit_cycling_example() {
    let store = MemoryStore::new();
    let mut session = ready_session(&store);

    session.map_click(HOME).unwrap();
    let workout = session
        .submit(WorkoutForm::cycling(27.0, 95.0, 523.0))
        .expect("valid cycling workout");

    assert_eq!(workout.kind(), WorkoutKind::Cycling);
    assert_eq!(workout.speed(), Some(17.1));
    assert_eq!(workout.pace(), None);
}

#[test]
fn test_submit_renders_marker_list_entry_and_closes_form() {
    let store = MemoryStore::new();
    let mut session = ready_session(&store);

    session.map_click(HOME).unwrap();
    assert_eq!(
        session.renderer_mut().drain(),
        vec![RenderCommand::ShowForm { location: HOME }]
    );

    let workout = session
        .submit(WorkoutForm::cycling(27.0, 95.0, 523.0))
        .unwrap();
    let commands = session.renderer_mut().drain();

    assert_eq!(commands.len(), 3);
    match &commands[0] {
        RenderCommand::ShowMarker {
            id,
            popup_content,
            popup_class,
            ..
        } => {
            assert_eq!(id, workout.id());
            assert!(popup_content.starts_with("🚴‍♀️ Cycling on "));
            assert_eq!(popup_class, "cycling-popup");
        }
        other => panic!("expected marker, got {:?}", other),
    }
    assert_eq!(
        commands[1],
        RenderCommand::ShowListEntry {
            workout: workout.view()
        }
    );
    assert_eq!(commands[2], RenderCommand::HideForm);
    assert_eq!(session.form_state(), &FormState::Idle);
}

#[test]
fn test_invalid_input_changes_nothing() {
    let store = MemoryStore::new();
    let mut session = ready_session(&store);
    log_running(&mut session);
    let persisted = store.load(KEY).unwrap();

    let bad_forms = [
        WorkoutForm::running(0.0, 24.0, 178.0),
        WorkoutForm::running(5.2, -1.0, 178.0),
        WorkoutForm::running(5.2, 24.0, 0.0),
        WorkoutForm::running(f64::NAN, 24.0, 178.0),
        WorkoutForm::cycling(27.0, f64::INFINITY, 523.0),
        WorkoutForm::cycling(27.0, 95.0, f64::NAN),
    ];

    for form in bad_forms {
        session.map_click(HOME).unwrap();
        session.renderer_mut().drain();

        let err = session.submit(form.clone()).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)), "got {:?}", err);
        assert!(!err.invalid_fields().is_empty());

        assert_eq!(session.store().len(), 1);
        assert_eq!(store.load(KEY).unwrap(), persisted);
        // Form stays open with the rejected fields retained
        match session.form_state() {
            FormState::AwaitingInput {
                pending,
                draft: Some(draft),
            } => {
                assert_eq!(*pending, HOME);
                assert_eq!(draft.kind, form.kind);
                assert_eq!(draft.distance_km.is_some(), form.distance_km.is_some());
            }
            other => panic!("expected open form with draft, got {:?}", other),
        }
        assert_eq!(
            session.renderer_mut().drain(),
            vec![RenderCommand::Alert {
                message: INVALID_INPUT_ALERT.to_string()
            }]
        );
    }
}

#[test]
fn test_rejected_form_can_be_resubmitted() {
    let store = MemoryStore::new();
    let mut session = ready_session(&store);

    session.map_click(HOME).unwrap();
    let err = session
        .submit(WorkoutForm::running(5.2, 24.0, -5.0))
        .unwrap_err();
    assert_eq!(err.invalid_fields()[0].field, "cadence_spm");

    let workout = session.submit(WorkoutForm::running(5.2, 24.0, 178.0)).unwrap();
    assert_eq!(workout.location(), HOME);
    assert_eq!(session.store().len(), 1);
}

#[test]
fn test_cycling_elevation_may_be_zero_or_negative() {
    let store = MemoryStore::new();
    let mut session = ready_session(&store);

    for elevation in [0.0, -120.0] {
        session.map_click(HOME).unwrap();
        let workout = session
            .submit(WorkoutForm::cycling(27.0, 95.0, elevation))
            .expect("elevation only needs to be finite");
        assert_eq!(workout.view().elevation_gain_m, Some(elevation));
    }
}

#[test]
fn test_submit_without_map_click() {
    let store = MemoryStore::new();
    let mut session = ready_session(&store);

    let err = session
        .submit(WorkoutForm::running(5.2, 24.0, 178.0))
        .unwrap_err();
    assert!(matches!(err, AppError::NoPendingLocation));
    assert!(session.store().is_empty());
}

#[test]
fn test_map_click_ignored_until_map_ready() {
    let store = MemoryStore::new();
    let mut session = test_session(&store);

    assert_eq!(session.map_state(), &MapState::Pending);
    let err = session.map_click(HOME).unwrap_err();
    assert!(matches!(err, AppError::MapUnavailable(_)));
    assert_eq!(session.pending_location(), None);

    session.on_position(Ok(HOME)).unwrap();
    session.map_click(HOME).unwrap();
    assert_eq!(session.pending_location(), Some(HOME));
}

#[test]
fn test_second_click_moves_pending_location() {
    let store = MemoryStore::new();
    let mut session = ready_session(&store);

    session.map_click(Location::new(1.0, 1.0)).unwrap();
    session.map_click(Location::new(2.0, 2.0)).unwrap();
    let workout = session.submit(WorkoutForm::running(5.0, 25.0, 170.0)).unwrap();
    assert_eq!(workout.location(), Location::new(2.0, 2.0));
}

#[test]
fn test_map_click_rejects_out_of_range_location() {
    let store = MemoryStore::new();
    let mut session = ready_session(&store);

    let err = session.map_click(Location::new(120.0, 0.0)).unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
    assert_eq!(session.form_state(), &FormState::Idle);
}

#[tokio::test]
async fn test_geolocation_failure_leaves_map_inert() {
    let store = MemoryStore::new();
    let mut session = test_session(&store);

    let err = session.init_map(&FixedPosition::new(None)).await.unwrap_err();
    assert!(matches!(err, AppError::MapUnavailable(_)));
    assert!(matches!(session.map_state(), MapState::Unavailable { .. }));
    assert_eq!(
        session.renderer_mut().drain(),
        vec![RenderCommand::Alert {
            message: GEOLOCATION_ALERT.to_string()
        }]
    );

    assert!(matches!(
        session.map_click(HOME),
        Err(AppError::MapUnavailable(_))
    ));
}

#[test]
fn test_late_position_does_not_revive_failed_map() {
    let store = MemoryStore::new();
    let mut session = test_session(&store);

    session
        .on_position(Err(GeolocationError::PermissionDenied))
        .unwrap_err();
    let err = session.on_position(Ok(HOME)).unwrap_err();
    assert!(matches!(err, AppError::MapUnavailable(_)));
    assert!(matches!(session.map_state(), MapState::Unavailable { .. }));
    assert!(matches!(
        session.map_click(HOME),
        Err(AppError::MapUnavailable(_))
    ));
}

#[test]
fn test_map_click_wraps_longitude() {
    let store = MemoryStore::new();
    let mut session = ready_session(&store);

    session.map_click(Location::new(39.0, 190.0)).unwrap();
    assert_eq!(session.pending_location(), Some(Location::new(39.0, -170.0)));
}

#[tokio::test]
async fn test_init_map_sets_view() {
    let store = MemoryStore::new();
    let mut session = test_session(&store);

    let center = session
        .init_map(&FixedPosition::new(Some(HOME)))
        .await
        .unwrap();
    assert_eq!(center, HOME);
    assert_eq!(
        session.map_state(),
        &MapState::Ready {
            center: HOME,
            zoom: 13
        }
    );
    assert_eq!(
        session.renderer_mut().drain(),
        vec![RenderCommand::SetView {
            center: HOME,
            zoom: 13
        }]
    );

    // A late failure does not undo a ready map
    let center = session
        .on_position(Err(GeolocationError::PermissionDenied))
        .unwrap();
    assert_eq!(center, HOME);
    assert!(matches!(session.map_state(), MapState::Ready { .. }));
}

#[test]
fn test_recenter() {
    let store = MemoryStore::new();
    let mut session = ready_session(&store);

    session.map_click(Location::new(40.5, -3.7)).unwrap();
    let id = session
        .submit(WorkoutForm::running(5.0, 25.0, 170.0))
        .unwrap()
        .id()
        .to_string();
    session.renderer_mut().drain();

    assert_eq!(session.recenter(&id).unwrap(), Location::new(40.5, -3.7));
    assert_eq!(
        session.renderer_mut().drain(),
        vec![RenderCommand::RecenterOn {
            location: Location::new(40.5, -3.7),
            zoom: 13
        }]
    );

    let err = session.recenter("no-such-id").unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(session.renderer().commands().is_empty());
}

#[test]
fn test_find_returns_exact_record() {
    let store = MemoryStore::new();
    let mut session = ready_session(&store);

    session.map_click(HOME).unwrap();
    let workout = session.submit(WorkoutForm::cycling(27.0, 95.0, 523.0)).unwrap();

    assert_eq!(session.find(workout.id()), Some(&workout));
    assert_eq!(session.find("missing"), None);
}

#[test]
fn test_reset_clears_store_and_persistence() {
    let store = MemoryStore::new();
    let mut session = ready_session(&store);
    let id = log_running(&mut session);
    log_running(&mut session);

    session.reset().unwrap();

    assert_eq!(session.workouts().count(), 0);
    assert_eq!(store.load(KEY).unwrap(), None);
    assert!(matches!(session.recenter(&id), Err(AppError::NotFound(_))));
}

#[test]
fn test_rehydrates_from_previous_run() {
    let store = MemoryStore::new();
    let ids = {
        let mut session = ready_session(&store);
        session.map_click(HOME).unwrap();
        let run = session.submit(WorkoutForm::running(5.2, 24.0, 178.0)).unwrap();
        session.map_click(HOME).unwrap();
        let ride = session.submit(WorkoutForm::cycling(27.0, 95.0, 523.0)).unwrap();
        vec![run.id().to_string(), ride.id().to_string()]
    };

    // A fresh manager on the same store sees the same session
    let mut session = test_session(&store);
    let rehydrated: Vec<String> = session.workouts().map(|w| w.id().to_string()).collect();
    assert_eq!(rehydrated, ids);
    assert_eq!(session.find(&ids[0]).unwrap().pace(), Some(4.6));
    assert_eq!(session.find(&ids[1]).unwrap().speed(), Some(17.1));

    // List entries are drawn immediately, markers once the map is ready
    let commands = session.renderer_mut().drain();
    assert_eq!(commands.len(), 2);
    assert!(commands
        .iter()
        .all(|c| matches!(c, RenderCommand::ShowListEntry { .. })));

    session.on_position(Ok(HOME)).unwrap();
    let commands = session.renderer_mut().drain();
    assert_eq!(commands.len(), 3);
    assert!(matches!(commands[0], RenderCommand::SetView { .. }));
    assert!(matches!(&commands[1], RenderCommand::ShowMarker { id, .. } if *id == ids[0]));
    assert!(matches!(&commands[2], RenderCommand::ShowMarker { id, .. } if *id == ids[1]));
}

#[test]
fn test_corrupt_storage_starts_empty() {
    let store = MemoryStore::with_entry(KEY, "{\"version\": 1, \"workouts\": [oops");
    let session = test_session(&store);
    assert!(session.store().is_empty());
}

#[test]
fn test_duplicate_id_is_regenerated() {
    let store = MemoryStore::new();
    let mut ids = vec!["b", "a", "a"].into_iter().map(String::from).collect::<Vec<_>>();
    let mut session = ready_session(&store).with_id_generator(move || {
        ids.pop().unwrap_or_else(|| "exhausted".to_string())
    });

    session.map_click(HOME).unwrap();
    assert_eq!(
        session.submit(WorkoutForm::running(5.0, 25.0, 170.0)).unwrap().id(),
        "a"
    );
    session.map_click(HOME).unwrap();
    // "a" collides, the next id is used
    assert_eq!(
        session.submit(WorkoutForm::running(5.0, 25.0, 170.0)).unwrap().id(),
        "b"
    );
    assert_eq!(session.store().len(), 2);
}

#[test]
fn test_persistent_id_collision_is_reported() {
    let store = MemoryStore::new();
    let mut session = ready_session(&store).with_id_generator(|| "same".to_string());

    session.map_click(HOME).unwrap();
    session.submit(WorkoutForm::running(5.0, 25.0, 170.0)).unwrap();
    session.map_click(HOME).unwrap();
    let err = session
        .submit(WorkoutForm::running(5.0, 25.0, 170.0))
        .unwrap_err();

    assert!(matches!(err, AppError::DuplicateId(id) if id == "same"));
    assert_eq!(session.store().len(), 1);
}

#[test]
fn test_storage_failure_rolls_back_append() {
    let config = SessionConfig::from(&Config::test_default());
    let mut session = SessionManager::new(FailingStore, CommandBuffer::new(), config);
    session.on_position(Ok(HOME)).unwrap();

    session.map_click(HOME).unwrap();
    let err = session
        .submit(WorkoutForm::running(5.2, 24.0, 178.0))
        .unwrap_err();

    assert!(matches!(err, AppError::Storage(_)));
    assert!(session.store().is_empty());

    // Reset fails as a whole when storage cannot be cleared
    assert!(matches!(session.reset(), Err(AppError::Storage(_))));
}
