//! Integration tests for sweep state and event broadcasting
//!
//! These tests verify:
//! - Events arrive in lifecycle order for subscribers
//! - Multiple subscribers see the same events
//! - Asset snapshots stay valid while the coordinator moves on
//! - Metrics can be read from another task while builds run

use camino::Utf8PathBuf;
use stalesweep::services::RemoveError;
use stalesweep::{
    BuildReport, CleanCoordinator, CleanOptions, PathRemover, RawCleanOptions, RemoveOptions,
    SweepEvent, SweepState,
};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::timeout;

/// Reports every escaped pattern as a removed path under `cwd`
struct EchoRemover;

impl PathRemover for EchoRemover {
    fn remove(
        &self,
        patterns: &[String],
        options: &RemoveOptions,
    ) -> Result<Vec<Utf8PathBuf>, RemoveError> {
        Ok(patterns.iter().map(|p| options.cwd.join(p)).collect())
    }
}

fn coordinator(raw: RawCleanOptions) -> CleanCoordinator<EchoRemover> {
    let mut coordinator = CleanCoordinator::new(CleanOptions::resolve(&raw), EchoRemover);
    coordinator.attach_to("/project/dist");
    coordinator
}

async fn next_event(rx: &mut broadcast::Receiver<SweepEvent>) -> SweepEvent {
    timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("Timeout waiting for event")
        .expect("Channel closed")
}

#[tokio::test]
async fn test_events_follow_lifecycle_order() {
    let mut coordinator = coordinator(RawCleanOptions::default());
    let mut rx = coordinator.subscribe();

    coordinator.run_initial_clean(&BuildReport::default()).unwrap();
    coordinator
        .run_after_build(&BuildReport::with_assets(["main.js"]))
        .unwrap();
    coordinator
        .run_after_build(&BuildReport::failed("syntax error"))
        .unwrap();
    coordinator
        .run_after_build(&BuildReport::with_assets(["main.2.js"]))
        .unwrap();

    assert_eq!(
        next_event(&mut rx).await,
        SweepEvent::InitialCleanStarted {
            patterns: vec!["**/*".to_string()]
        }
    );
    assert_eq!(
        next_event(&mut rx).await,
        SweepEvent::FilesRemoved {
            paths: vec![Utf8PathBuf::from("/project/dist/**/*")],
            dry_run: false
        }
    );
    assert_eq!(
        next_event(&mut rx).await,
        SweepEvent::AssetsUpdated {
            current: 1,
            stale: Vec::new()
        }
    );
    assert_eq!(next_event(&mut rx).await, SweepEvent::BuildSkipped);
    assert_eq!(
        next_event(&mut rx).await,
        SweepEvent::AssetsUpdated {
            current: 1,
            stale: vec!["main.js".to_string()]
        }
    );
    assert_eq!(
        next_event(&mut rx).await,
        SweepEvent::FilesRemoved {
            paths: vec![Utf8PathBuf::from("/project/dist/main.js")],
            dry_run: false
        }
    );
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_multiple_subscribers() {
    let mut coordinator = coordinator(RawCleanOptions {
        dry: Some(true),
        ..Default::default()
    });
    let mut rx1 = coordinator.subscribe();
    let mut rx2 = coordinator.subscribe();

    coordinator
        .run_after_build(&BuildReport::failed("boom"))
        .unwrap();

    assert_eq!(next_event(&mut rx1).await, SweepEvent::BuildSkipped);
    assert_eq!(next_event(&mut rx2).await, SweepEvent::BuildSkipped);
}

#[tokio::test]
async fn test_dry_run_flag_is_reported() {
    let mut coordinator = coordinator(RawCleanOptions {
        allow_outside_project_root: Some(true),
        clean_once_before_patterns: Some(vec!["../coverage/*".to_string()]),
        ..Default::default()
    });
    let mut rx = coordinator.subscribe();

    coordinator.run_initial_clean(&BuildReport::default()).unwrap();

    let _started = next_event(&mut rx).await;
    match next_event(&mut rx).await {
        SweepEvent::FilesRemoved { dry_run, .. } => assert!(dry_run),
        other => panic!("Expected FilesRemoved, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_observer_task_receives_events() {
    let coordinator = Arc::new(Mutex::new(coordinator(RawCleanOptions::default())));
    let mut rx = coordinator.lock().unwrap().subscribe();

    let observer = tokio::spawn(async move {
        let mut stale = Vec::new();
        while let Ok(Ok(event)) = timeout(Duration::from_millis(500), rx.recv()).await {
            if let SweepEvent::AssetsUpdated { stale: names, .. } = event {
                stale.extend(names);
            }
        }
        stale
    });

    {
        let mut coordinator = coordinator.lock().unwrap();
        for build in [["a.js", "b.js"], ["a.js", "c.js"], ["d.js", "c.js"]] {
            coordinator
                .run_after_build(&BuildReport::with_assets(build))
                .unwrap();
        }
    }

    let stale = observer.await.unwrap();
    assert_eq!(stale, vec!["b.js".to_string(), "a.js".to_string()]);
}

#[tokio::test]
async fn test_metrics_readable_from_another_task() {
    let mut coordinator = coordinator(RawCleanOptions::default());
    let metrics = coordinator.metrics();

    coordinator
        .run_after_build(&BuildReport::with_assets(["a.js"]))
        .unwrap();
    coordinator
        .run_after_build(&BuildReport::with_assets(["b.js"]))
        .unwrap();

    let seen = tokio::spawn(async move {
        (
            metrics.builds_seen.load(Ordering::Relaxed),
            metrics.paths_removed.load(Ordering::Relaxed),
        )
    })
    .await
    .unwrap();

    assert_eq!(seen, (2, 1));
}

#[test]
fn test_snapshot_survives_replacement() {
    let mut state = SweepState::new();
    state.replace_assets(vec!["b.js".to_string(), "a.js".to_string()]);

    let snapshot = state.snapshot();
    let stale = state.replace_assets(vec!["c.js".to_string()]);

    assert_eq!(&*snapshot, ["a.js".to_string(), "b.js".to_string()].as_slice());
    assert_eq!(stale, vec!["a.js".to_string(), "b.js".to_string()]);
    assert_eq!(state.current_assets(), ["c.js".to_string()].as_slice());
}

#[test]
fn test_initial_clean_flag_never_resets() {
    let mut state = SweepState::new();
    assert!(!state.initial_clean_done());

    state.mark_initial_clean_done();
    state.replace_assets(Vec::new());
    state.mark_initial_clean_done();

    assert!(state.initial_clean_done());
}
