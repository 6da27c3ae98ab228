use std::collections::VecDeque;
use std::pin::Pin;

use futures::StreamExt as _;
use futures::stream;
use tracing::{debug, info};

use crate::decoder::EventDecoder;
use crate::error::ClientError;
use crate::event::PipelineEvent;
use crate::output::PipelineOutput;
use crate::session::{RunOutcome, RunSession};
use crate::transport::ByteStream;

type EventStream =
    Pin<Box<dyn futures::Stream<Item = Result<PipelineEvent, ClientError>> + Send + 'static>>;

/// Single-consumer handle for one streaming pipeline run.
///
/// The run owns the decoded event stream and the session it projects onto.
/// [`PipelineRun::next_event`] pulls one event at a time and applies it to
/// the session before returning it; decoding between transport suspensions
/// is synchronous, so no two events are ever applied concurrently. Dropping
/// the run abandons the stream and discards any buffered bytes.
pub struct PipelineRun {
    run_id: uuid::Uuid,
    events: EventStream,
    session: RunSession,
}

impl PipelineRun {
    pub(crate) fn new(bytes: ByteStream, session: RunSession) -> Self {
        let run_id = uuid::Uuid::new_v4();
        Self {
            run_id,
            events: Box::pin(decoded_event_stream(run_id, bytes)),
            session,
        }
    }

    /// Returns the id assigned to this run for log correlation.
    pub fn run_id(&self) -> uuid::Uuid {
        self.run_id
    }

    /// Waits for the next event, applies it to the session, and returns it.
    ///
    /// Returns `Ok(None)` once the byte stream ends. Transport read failures
    /// surface as errors; parse anomalies never do.
    pub async fn next_event(&mut self) -> Result<Option<PipelineEvent>, ClientError> {
        match self.events.next().await {
            Some(Ok(event)) => {
                debug!(run_id = %self.run_id, kind = event.kind(), "pipeline event");
                self.session.apply(&event);
                Ok(Some(event))
            }
            Some(Err(err)) => Err(err),
            None => Ok(None),
        }
    }

    /// The live session view for rendering after each event.
    pub fn session(&self) -> &RunSession {
        &self.session
    }

    /// An owned snapshot of the session, safe to hand to other tasks.
    pub fn snapshot(&self) -> RunSession {
        self.session.clone()
    }

    /// Drains remaining events and returns the final session.
    ///
    /// A stream that ends while the outcome is still pending is a protocol
    /// error: the backend always terminates a run with `result` or `error`.
    pub async fn finish(mut self) -> Result<RunSession, ClientError> {
        while self.next_event().await?.is_some() {}
        if !self.session.is_finished() {
            return Err(ClientError::protocol(
                "stream ended without a terminal event",
            ));
        }
        info!(
            run_id = %self.run_id,
            percent = self.session.progress_percent(),
            "pipeline run finished"
        );
        Ok(self.session)
    }

    /// Runs to completion and returns the pipeline output.
    ///
    /// A pipeline-reported failure becomes [`ClientError::Pipeline`].
    pub async fn collect_output(self) -> Result<PipelineOutput, ClientError> {
        let session = self.finish().await?;
        match session.into_outcome() {
            RunOutcome::Succeeded(output) => Ok(output),
            RunOutcome::Failed(message) => Err(ClientError::pipeline(message)),
            RunOutcome::Pending => Err(ClientError::protocol("run finished while still pending")),
        }
    }
}

fn decoded_event_stream(
    run_id: uuid::Uuid,
    bytes: ByteStream,
) -> impl futures::Stream<Item = Result<PipelineEvent, ClientError>> + Send {
    struct State {
        run_id: uuid::Uuid,
        bytes: ByteStream,
        decoder: Option<EventDecoder>,
        pending: VecDeque<PipelineEvent>,
    }

    stream::try_unfold(
        State {
            run_id,
            bytes,
            decoder: Some(EventDecoder::new()),
            pending: VecDeque::new(),
        },
        |mut state| async move {
            loop {
                if let Some(event) = state.pending.pop_front() {
                    return Ok(Some((event, state)));
                }
                let Some(decoder) = state.decoder.as_mut() else {
                    return Ok(None);
                };

                match state.bytes.next().await {
                    Some(Ok(chunk)) => {
                        for event in decoder.feed(&chunk) {
                            state.pending.push_back(event);
                        }
                    }
                    Some(Err(err)) => {
                        debug!(run_id = %state.run_id, %err, "stream read failed");
                        return Err(err);
                    }
                    None => {
                        if let Some(decoder) = state.decoder.take() {
                            decoder.close();
                        }
                    }
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::sample_output;
    use crate::stage::{StageCatalog, StageId};

    fn byte_stream(chunks: Vec<Vec<u8>>) -> ByteStream {
        Box::pin(stream::iter(
            chunks
                .into_iter()
                .map(|chunk| Ok::<_, ClientError>(bytes::Bytes::from(chunk))),
        ))
    }

    fn failing_stream(chunks: Vec<Vec<u8>>, err: ClientError) -> ByteStream {
        let mut items: Vec<Result<bytes::Bytes, ClientError>> = chunks
            .into_iter()
            .map(|chunk| Ok(bytes::Bytes::from(chunk)))
            .collect();
        items.push(Err(err));
        Box::pin(stream::iter(items))
    }

    fn run_over(chunks: Vec<Vec<u8>>) -> PipelineRun {
        PipelineRun::new(
            byte_stream(chunks),
            RunSession::new(StageCatalog::datavex_v1()),
        )
    }

    fn progress_record(stage: &str, label: &str) -> String {
        format!(
            "event: progress\ndata: {{\"type\":\"progress\",\"stage\":\"{stage}\",\"label\":\"{label}\",\"node\":\"n\"}}\n\n"
        )
    }

    fn result_record() -> String {
        let payload = serde_json::json!({ "output": sample_output() });
        format!("event: result\ndata: {payload}\n\n")
    }

    #[tokio::test]
    async fn applies_each_event_to_the_session_in_order() {
        let stream = format!(
            "{}{}{}",
            progress_record("scan_serp", "Scanning SERP"),
            progress_record("strategy_brief", "Writing brief"),
            result_record(),
        );
        let mut run = run_over(vec![stream.into_bytes()]);

        let first = run.next_event().await.expect("ok").expect("event");
        assert!(matches!(first, PipelineEvent::Progress { .. }));
        let active = run
            .session()
            .stages()
            .iter()
            .position(|s| s.active)
            .expect("active stage");
        assert_eq!(run.session().stages()[active].id, StageId::new("scan_serp"));

        run.next_event().await.expect("ok").expect("event");
        assert_eq!(run.session().label(), "Writing brief");

        let third = run.next_event().await.expect("ok").expect("event");
        assert!(matches!(third, PipelineEvent::Result { .. }));
        assert_eq!(run.session().progress_percent(), 100);

        assert!(run.next_event().await.expect("ok").is_none());
    }

    #[tokio::test]
    async fn events_survive_arbitrary_transport_chunking() {
        let stream = format!(
            "{}{}",
            progress_record("blog_draft_1", "Drafting…"),
            result_record()
        );
        let bytes = stream.into_bytes();
        // Rechunk into tiny 7-byte pieces, splitting lines and code points.
        let chunks: Vec<Vec<u8>> = bytes.chunks(7).map(<[u8]>::to_vec).collect();

        let session = run_over(chunks).finish().await.expect("finish");
        assert!(matches!(session.outcome(), RunOutcome::Succeeded(_)));
        assert_eq!(session.progress_percent(), 100);
    }

    #[tokio::test]
    async fn collect_output_returns_the_terminal_payload() {
        let run = run_over(vec![result_record().into_bytes()]);
        let output = run.collect_output().await.expect("output");
        assert_eq!(output, sample_output());
    }

    #[tokio::test]
    async fn pipeline_error_event_is_a_failed_outcome_not_a_stream_error() {
        let stream = format!(
            "{}event: error\ndata: {{\"message\":\"Upstream timeout\"}}\n\n",
            progress_record("scan_serp", "Scanning SERP")
        );
        let run = run_over(vec![stream.into_bytes()]);

        let session = run.finish().await.expect("finish is ok on pipeline error");
        assert_eq!(
            session.outcome(),
            &RunOutcome::Failed("Upstream timeout".into())
        );
    }

    #[tokio::test]
    async fn collect_output_maps_failed_outcome_to_pipeline_error() {
        let run = run_over(vec![
            b"event: error\ndata: {\"message\":\"boom\"}\n\n".to_vec(),
        ]);
        let err = run.collect_output().await.expect_err("should fail");
        assert!(matches!(err, ClientError::Pipeline { message } if message == "boom"));
    }

    #[tokio::test]
    async fn stream_ending_without_terminal_event_is_a_protocol_error() {
        let run = run_over(vec![
            progress_record("scan_serp", "Scanning SERP").into_bytes(),
        ]);
        let err = run.finish().await.expect_err("should fail");
        assert!(matches!(err, ClientError::Protocol(_)));
    }

    #[tokio::test]
    async fn transport_error_mid_stream_surfaces_from_next_event() {
        let mut run = PipelineRun::new(
            failing_stream(
                vec![progress_record("scan_serp", "Scanning SERP").into_bytes()],
                ClientError::transport("connection reset"),
            ),
            RunSession::new(StageCatalog::datavex_v1()),
        );

        run.next_event().await.expect("first event ok");
        let err = run.next_event().await.expect_err("should fail");
        assert!(matches!(err, ClientError::Transport { .. }));
    }

    #[tokio::test]
    async fn malformed_records_are_invisible_to_the_run() {
        let stream = format!(
            "event: progress\ndata: {{not json}}\n\n{}",
            result_record()
        );
        let session = run_over(vec![stream.into_bytes()])
            .finish()
            .await
            .expect("finish");
        assert!(matches!(session.outcome(), RunOutcome::Succeeded(_)));
    }

    #[tokio::test]
    async fn snapshot_is_isolated_from_later_updates() {
        let stream = format!(
            "{}{}",
            progress_record("scan_serp", "Scanning SERP"),
            result_record()
        );
        let mut run = run_over(vec![stream.into_bytes()]);

        run.next_event().await.expect("ok");
        let snapshot = run.snapshot();
        run.next_event().await.expect("ok");

        assert_eq!(snapshot.label(), "Scanning SERP");
        assert!(!snapshot.is_finished());
        assert!(run.session().is_finished());
    }
}
