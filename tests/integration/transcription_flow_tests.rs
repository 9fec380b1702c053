//! Integration tests for the voice-note transcription flow.
//!
//! A scripted transcriber stands in for the speech-to-text gateway so
//! the busy indicator, the save/discard decision, and the failure
//! notice can be asserted deterministically.

use inbox_valet::models::session::ReviewFlow;
use inbox_valet::render;

use super::test_helpers::{
    failing_transcription_harness, harness, harness_with, origin, RecordingTransport,
    StubTranscriber, TransportCall,
};

// ─── Happy path ──────────────────────────────────────────────────────

#[tokio::test]
async fn voice_note_parks_transcript_for_decision() {
    let h = harness("Acheter du lait").await;

    h.driver
        .ingest_voice(origin(20), "file-abc")
        .await
        .expect("ingest voice");

    let calls = h.transport.calls();
    assert!(calls.contains(&TransportCall::Remove(origin(20))));
    assert!(calls.contains(&TransportCall::Fetch("file-abc".to_owned())));

    // The busy indicator rendered while the gateway call was outstanding.
    let busy_shown = calls
        .iter()
        .any(|call| matches!(call, TransportCall::Edit(_, view) if *view == render::busy_view()));
    assert!(busy_shown, "busy view must render before the outcome");

    assert_eq!(
        h.transport.last_view(),
        Some(render::transcript_view("Acheter du lait"))
    );
    assert_eq!(
        h.driver.snapshot().await.flow,
        ReviewFlow::AwaitingDecision {
            transcript: "Acheter du lait".to_owned()
        }
    );
    // Nothing is queued until the user decides.
    assert_eq!(h.repo.count().await.expect("count"), 0);
}

#[tokio::test]
async fn save_appends_transcript_to_the_queue() {
    let h = harness("Appeler Bob").await;
    h.driver
        .ingest_voice(origin(21), "file-1")
        .await
        .expect("ingest voice");

    h.driver.save_transcript().await.expect("save");

    assert_eq!(h.repo.count().await.expect("count"), 1);
    let item = h.repo.peek_first().await.expect("peek").expect("item");
    assert_eq!(item.content, "Appeler Bob");
    assert_eq!(h.transport.last_view(), Some(render::idle_view(1)));
    assert_eq!(h.driver.snapshot().await.flow, ReviewFlow::Idle);
}

#[tokio::test]
async fn discard_leaves_the_queue_untouched() {
    let h = harness("rien à garder").await;
    h.driver
        .ingest_text(origin(1), "existant")
        .await
        .expect("ingest");
    h.driver
        .ingest_voice(origin(22), "file-2")
        .await
        .expect("ingest voice");

    h.driver.discard_transcript().await.expect("discard");

    assert_eq!(h.repo.count().await.expect("count"), 1);
    let item = h.repo.peek_first().await.expect("peek").expect("item");
    assert_eq!(item.content, "existant");
    assert_eq!(h.transport.last_view(), Some(render::idle_view(1)));
    assert_eq!(h.driver.snapshot().await.flow, ReviewFlow::Idle);
}

// ─── Failure paths ───────────────────────────────────────────────────

#[tokio::test]
async fn transcription_failure_shows_notice_and_keeps_count() {
    let h = failing_transcription_harness().await;
    h.driver
        .ingest_text(origin(1), "déjà là")
        .await
        .expect("ingest");

    h.driver
        .ingest_voice(origin(23), "file-3")
        .await
        .expect("ingest voice");

    assert_eq!(h.repo.count().await.expect("count"), 1);
    assert_eq!(h.transport.last_view(), Some(render::failure_view(1)));
    assert_eq!(h.driver.snapshot().await.flow, ReviewFlow::Idle);
}

#[tokio::test]
async fn failed_download_skips_the_transcriber() {
    let h = harness_with(
        RecordingTransport::with_failing_fetch(),
        StubTranscriber::transcript("jamais produit"),
    )
    .await;

    h.driver
        .ingest_voice(origin(24), "file-4")
        .await
        .expect("ingest voice");

    assert_eq!(h.transcriber.call_count(), 0);
    assert_eq!(h.transport.last_view(), Some(render::failure_view(0)));
    assert_eq!(h.driver.snapshot().await.flow, ReviewFlow::Idle);
}

#[tokio::test]
async fn stale_save_press_is_a_no_op() {
    let h = harness("unused").await;
    let before = h.transport.calls().len();

    h.driver.save_transcript().await.expect("stale save");

    assert_eq!(h.repo.count().await.expect("count"), 0);
    assert_eq!(h.transport.calls().len(), before);
}

#[tokio::test]
async fn discard_without_pending_transcript_rerenders_idle() {
    let h = harness("unused").await;

    h.driver.discard_transcript().await.expect("discard");

    assert_eq!(h.transport.last_view(), Some(render::idle_view(0)));
    assert_eq!(h.driver.snapshot().await.flow, ReviewFlow::Idle);
}

// ─── Interleavings ───────────────────────────────────────────────────

#[tokio::test]
async fn text_during_pending_decision_drops_the_transcript() {
    let h = harness("transcription en attente").await;
    h.driver
        .ingest_voice(origin(25), "file-5")
        .await
        .expect("ingest voice");

    h.driver
        .ingest_text(origin(26), "nouvelle note")
        .await
        .expect("ingest");

    assert_eq!(h.repo.count().await.expect("count"), 1);
    let item = h.repo.peek_first().await.expect("peek").expect("item");
    assert_eq!(item.content, "nouvelle note");
    assert_eq!(h.driver.snapshot().await.flow, ReviewFlow::Idle);

    // A later save press must not resurrect the dropped transcript.
    h.driver.save_transcript().await.expect("stale save");
    assert_eq!(h.repo.count().await.expect("count"), 1);
}

#[tokio::test]
async fn stale_stop_during_pending_decision_returns_to_idle() {
    let h = harness("abandonné").await;
    h.driver
        .ingest_voice(origin(28), "file-7")
        .await
        .expect("ingest voice");

    h.driver.stop_review().await.expect("stop");

    assert_eq!(h.driver.snapshot().await.flow, ReviewFlow::Idle);
    assert_eq!(h.transport.last_view(), Some(render::idle_view(0)));

    // The pending transcript died with the flow reset.
    h.driver.save_transcript().await.expect("stale save");
    assert_eq!(h.repo.count().await.expect("count"), 0);
}

#[tokio::test]
async fn voice_during_review_abandons_the_pass() {
    let h = harness("mémo vocal").await;
    h.driver
        .ingest_text(origin(1), "en cours de revue")
        .await
        .expect("ingest");
    h.driver.begin_review(None).await.expect("begin review");

    h.driver
        .ingest_voice(origin(27), "file-6")
        .await
        .expect("ingest voice");
    h.driver.save_transcript().await.expect("save");

    assert_eq!(h.repo.count().await.expect("count"), 2);
    assert_eq!(h.driver.snapshot().await.flow, ReviewFlow::Idle);
    assert_eq!(h.transport.last_view(), Some(render::idle_view(2)));
}
