//! Chat turns end to end against a mock answer service.

use pretty_assertions::assert_eq;
use starchat::api::AnswerClient;
use starchat::app::{ChatState, Phase, PipelineDriver, PipelineEvent};
use starchat::error::{ChatError, FailureKind};
use starchat::types::config::LoadingSettings;
use starchat::types::{ContentBlock, MessageBody, StyledRun};
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{fast_retry, sample_request, stream_body};

const ENDPOINT: &str = "/api/chat/stream";

fn driver_for(server: &MockServer) -> PipelineDriver {
    let client = AnswerClient::new_with_base_url(&server.uri()).with_retry_policy(fast_retry());
    PipelineDriver::new(client, LoadingSettings::default())
}

async fn mount_body(server: &MockServer, status: u16, body: String) {
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(status).set_body_raw(body, "text/event-stream"))
        .mount(server)
        .await;
}

async fn run_turn(
    driver: &PipelineDriver,
) -> (Result<Vec<ContentBlock>, ChatError>, Vec<PipelineEvent>) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let result = driver.ask(&sample_request("Will I travel?"), &tx).await;
    drop(tx);
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    (result, events)
}

fn phases(events: &[PipelineEvent]) -> Vec<Phase> {
    events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::Phase(p) => Some(*p),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_successful_turn() {
    let server = MockServer::start().await;
    mount_body(&server, 200, stream_body(&["## Career\n", "• Promotion\n", "• Travel"])).await;

    let (result, events) = run_turn(&driver_for(&server)).await;
    let blocks = tokio_test::assert_ok!(result);

    assert_eq!(blocks.len(), 3);
    assert_eq!(
        phases(&events),
        vec![Phase::Sending, Phase::Streaming, Phase::Segmenting, Phase::Done]
    );
    assert_eq!(events.last(), Some(&PipelineEvent::Finished(blocks)));

    let partials: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::Partial(text) => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(
        partials,
        vec!["## Career\n", "## Career\n• Promotion\n", "## Career\n• Promotion\n• Travel"]
    );

    // Loading messages never follow answer text
    let first_partial = events
        .iter()
        .position(|e| matches!(e, PipelineEvent::Partial(_)))
        .unwrap();
    assert!(!events[first_partial..]
        .iter()
        .any(|e| matches!(e, PipelineEvent::Status(_))));
}

#[tokio::test]
async fn test_retries_exhausted_leave_one_failure() {
    let server = MockServer::start().await;
    mount_body(&server, 503, "busy".to_string()).await;

    let (result, events) = run_turn(&driver_for(&server)).await;

    assert!(matches!(result, Err(ChatError::TransientNetwork { attempts: 3, .. })));
    assert_eq!(
        phases(&events),
        vec![Phase::Sending, Phase::Retrying, Phase::Retrying, Phase::Aborted]
    );

    let retries = events
        .iter()
        .filter(|e| matches!(e, PipelineEvent::Retrying(_)))
        .count();
    assert_eq!(retries, 2);

    let busy: Vec<&String> = events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::Status(text) if text.starts_with("Server is busy") => Some(text),
            _ => None,
        })
        .collect();
    assert_eq!(busy.len(), 2);
    assert!(busy[0].ends_with("(attempt 2/3)"));
    assert!(busy[1].ends_with("(attempt 3/3)"));

    let failures: Vec<&PipelineEvent> = events
        .iter()
        .filter(|e| matches!(e, PipelineEvent::Failed(_)))
        .collect();
    assert_eq!(failures, vec![&PipelineEvent::Failed(FailureKind::ServerBusy)]);
    assert_eq!(events.last(), Some(&PipelineEvent::Failed(FailureKind::ServerBusy)));
}

#[tokio::test]
async fn test_stream_error_event_aborts_turn() {
    let server = MockServer::start().await;
    let body = "data: {\"status\":\"chunk\",\"response\":\"Half\"}\n\ndata: {\"status\":\"error\",\"error\":\"model crashed\"}\n\n";
    mount_body(&server, 200, body.to_string()).await;

    let (result, events) = run_turn(&driver_for(&server)).await;

    assert!(matches!(result, Err(ChatError::StreamAborted { .. })));
    assert_eq!(
        phases(&events),
        vec![Phase::Sending, Phase::Streaming, Phase::Aborted]
    );
    assert_eq!(events.last(), Some(&PipelineEvent::Failed(FailureKind::Generic)));
}

#[tokio::test]
async fn test_empty_answer_fails() {
    let server = MockServer::start().await;
    mount_body(&server, 200, "data: {\"status\":\"complete\"}\n\n".to_string()).await;

    let (result, events) = run_turn(&driver_for(&server)).await;

    assert!(matches!(result, Err(ChatError::EmptyResponse)));
    assert!(events.contains(&PipelineEvent::Failed(FailureKind::Generic)));
}

#[tokio::test]
async fn test_markup_only_answer_fails_as_empty() {
    let server = MockServer::start().await;
    mount_body(&server, 200, stream_body(&["<p> </p>", "<div></div>"])).await;

    let (result, events) = run_turn(&driver_for(&server)).await;

    assert!(matches!(result, Err(ChatError::EmptyResponse)));
    assert_eq!(phases(&events).last(), Some(&Phase::Aborted));
    assert!(phases(&events).contains(&Phase::Segmenting));
}

#[tokio::test]
async fn test_state_folds_failed_turn_into_one_notice() {
    let server = MockServer::start().await;
    mount_body(&server, 502, "bad gateway".to_string()).await;

    let (_, events) = run_turn(&driver_for(&server)).await;

    let mut state = ChatState::new();
    state.push_question("Will I travel?");
    for event in events {
        state.apply(event);
    }

    assert_eq!(state.placeholder(), None);
    assert_eq!(state.partial(), None);
    assert_eq!(state.notice_count(), 1);
    assert!(!state.is_loading());
    assert_eq!(
        state.last_message().map(|m| &m.body),
        Some(&MessageBody::Notice(FailureKind::ServerBusy))
    );
}

#[tokio::test]
async fn test_state_folds_answer() {
    let server = MockServer::start().await;
    mount_body(&server, 200, stream_body(&["Yes, soon."])).await;

    let (result, events) = run_turn(&driver_for(&server)).await;
    tokio_test::assert_ok!(result);

    let mut state = ChatState::new();
    state.push_question("Will I travel?");
    for event in events {
        state.apply(event);
    }

    assert_eq!(state.messages().len(), 2);
    assert_eq!(
        state.last_message().map(|m| &m.body),
        Some(&MessageBody::Answer(vec![ContentBlock::plain(vec![
            StyledRun::plain("Yes, soon.")
        ])]))
    );
}
