//! End-to-end tests: `PlaybackService` driving the simulated engine.
//!
//! Time is paused, so a multi-second "reading" completes instantly while the
//! real ticker and engine timers still fire in order.

use std::sync::Arc;
use std::time::Duration;

use briefly_core::{Article, VoiceDescriptor};
use briefly_tts::{
    MemoryPreferenceStore, PlaybackConfig, PlaybackController, PlaybackError, PlaybackEvent,
    PlaybackService, PlaybackStatus, SimulatedEngine, SimulatedEngineConfig,
};

fn config(voices: Vec<VoiceDescriptor>) -> PlaybackConfig {
    PlaybackConfig {
        simulated: SimulatedEngineConfig {
            chars_per_second: 100.0,
            voices,
        },
        ..PlaybackConfig::default()
    }
}

/// 300 characters of speech text: three seconds at 100 chars/s.
fn long_article() -> Article {
    Article::new("a1", "T").with_summary("x".repeat(297))
}

#[tokio::test(start_paused = true)]
async fn reading_runs_to_completion_through_pause() {
    let config = config(SimulatedEngineConfig::default().voices);
    let engine = SimulatedEngine::new(&config.simulated);
    let (controller, mut events) = PlaybackController::new(
        Box::new(engine),
        Arc::new(MemoryPreferenceStore::new()),
        config,
    );
    let service = PlaybackService::spawn(controller);
    let handle = service.handle();

    handle.initialize().await.unwrap();
    assert_eq!(
        handle.snapshot().voice.map(|v| v.id),
        Some("sim:en-US:ava".into())
    );

    assert!(handle.start(long_article()).await.unwrap());
    assert_eq!(handle.snapshot().status, PlaybackStatus::Playing);

    tokio::time::sleep(Duration::from_millis(1_050)).await;
    let mid = handle.snapshot().progress_percent;
    assert!(mid > 0.0 && mid < 100.0, "progress {mid}");

    handle.pause().await.unwrap();
    let paused_at = handle.snapshot().progress_percent;
    tokio::time::sleep(Duration::from_secs(10)).await;
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.status, PlaybackStatus::Paused);
    assert!((snapshot.progress_percent - paused_at).abs() < f64::EPSILON);

    handle.resume().await.unwrap();
    let mut updates = handle.subscribe();
    let done = updates
        .wait_for(|s| s.status == PlaybackStatus::Idle)
        .await
        .unwrap()
        .clone();
    assert!(done.article.is_none());
    assert!(done.progress_percent.abs() < f64::EPSILON);

    let mut seen = Vec::new();
    while let Ok(e) = events.try_recv() {
        seen.push(e);
    }
    assert!(seen.contains(&PlaybackEvent::Finished {
        article_id: "a1".into()
    }));
    assert!(seen.contains(&PlaybackEvent::StateChanged(PlaybackStatus::Ended)));

    service.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn lazily_published_voices_are_picked_up() {
    let config = config(Vec::new());
    let engine = SimulatedEngine::new(&config.simulated);
    let voices = engine.voices_handle();
    let (controller, _events) = PlaybackController::new(
        Box::new(engine),
        Arc::new(MemoryPreferenceStore::new()),
        config,
    );
    let service = PlaybackService::spawn(controller);
    let handle = service.handle();

    handle.initialize().await.unwrap();
    assert!(handle.snapshot().voice.is_none());

    let mut updates = handle.subscribe();
    voices.publish(vec![
        VoiceDescriptor::new("late:de", "Lena", "de-DE"),
        VoiceDescriptor::new("late:en", "Isla", "en-AU"),
    ]);
    let snapshot = updates
        .wait_for(|s| s.voice.is_some())
        .await
        .unwrap()
        .clone();

    // No platform default: first English voice wins.
    assert_eq!(snapshot.voice.map(|v| v.id), Some("late:en".into()));
    assert_eq!(handle.english_voices().await.unwrap().len(), 1);

    service.shutdown().await;
}

#[tokio::test]
async fn commands_after_shutdown_report_stopped_service() {
    let config = config(SimulatedEngineConfig::default().voices);
    let engine = SimulatedEngine::new(&config.simulated);
    let (controller, _events) = PlaybackController::new(
        Box::new(engine),
        Arc::new(MemoryPreferenceStore::new()),
        config,
    );
    let service = PlaybackService::spawn(controller);
    let handle = service.handle();

    handle.start(long_article()).await.unwrap();
    service.shutdown().await;

    assert_eq!(handle.snapshot().status, PlaybackStatus::Idle);
    let err = handle.pause().await.unwrap_err();
    assert!(matches!(err, PlaybackError::ServiceStopped), "got {err:?}");
}
