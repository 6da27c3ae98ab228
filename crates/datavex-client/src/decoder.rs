use tracing::{debug, warn};

use crate::event::PipelineEvent;
use crate::output::PipelineOutput;
use crate::stage::StageId;

const EVENT_PREFIX: &str = "event: ";
const DATA_PREFIX: &str = "data: ";

/// Default message for `error` events that carry no `message` field.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

#[derive(serde::Deserialize)]
struct ProgressPayload {
    stage: String,
    label: String,
    node: String,
}

#[derive(serde::Deserialize)]
struct ResultPayload {
    output: PipelineOutput,
}

#[derive(serde::Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: Option<String>,
}

/// Incremental decoder turning raw byte chunks into pipeline events.
///
/// One owned instance per stream. The decoder carries three kinds of state
/// across `feed` calls: an undecoded byte tail (a UTF-8 code point split
/// across chunk boundaries), decoded text up to the last line terminator,
/// and the in-progress record's event type and data payload. A blank line
/// dispatches the record; every parse anomaly is absorbed here and never
/// surfaces to the caller.
#[derive(Default)]
pub struct EventDecoder {
    tail: Vec<u8>,
    line_buf: String,
    event_type: String,
    data: String,
}

impl EventDecoder {
    /// Creates a decoder with empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one transport chunk and returns every event it completes.
    ///
    /// Chunks may split lines and even multi-byte code points anywhere; the
    /// emitted event sequence is identical for every chunking of the same
    /// byte stream.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<PipelineEvent> {
        self.decode_utf8(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.line_buf.find('\n') {
            let mut line: String = self.line_buf.drain(..=pos).collect();
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
            self.handle_line(&line, &mut events);
        }
        events
    }

    /// Signals end of input, discarding any incomplete trailing state.
    pub fn close(self) {
        if !self.tail.is_empty()
            || !self.line_buf.is_empty()
            || !self.event_type.is_empty()
            || !self.data.is_empty()
        {
            warn!(
                buffered_bytes = self.tail.len() + self.line_buf.len(),
                event_type = %self.event_type,
                "discarding undispatched stream state at close"
            );
        }
    }

    /// Decodes `chunk` as UTF-8, carrying an incomplete trailing code point
    /// into the next call instead of replacing it.
    fn decode_utf8(&mut self, chunk: &[u8]) {
        let mut buf = std::mem::take(&mut self.tail);
        buf.extend_from_slice(chunk);

        let mut offset = 0;
        loop {
            match std::str::from_utf8(&buf[offset..]) {
                Ok(text) => {
                    self.line_buf.push_str(text);
                    offset = buf.len();
                    break;
                }
                Err(err) => {
                    let valid_up_to = err.valid_up_to();
                    if let Ok(text) = std::str::from_utf8(&buf[offset..offset + valid_up_to]) {
                        self.line_buf.push_str(text);
                    }
                    offset += valid_up_to;
                    match err.error_len() {
                        Some(invalid) => {
                            self.line_buf.push(char::REPLACEMENT_CHARACTER);
                            offset += invalid;
                        }
                        // Incomplete sequence at the end of the buffer.
                        None => break,
                    }
                }
            }
        }
        self.tail = buf.split_off(offset);
    }

    fn handle_line(&mut self, line: &str, events: &mut Vec<PipelineEvent>) {
        if let Some(rest) = line.strip_prefix(EVENT_PREFIX) {
            self.event_type = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix(DATA_PREFIX) {
            self.data = rest.trim().to_string();
        } else if line.is_empty() {
            if let Some(event) = self.dispatch() {
                events.push(event);
            }
        }
        // Anything else (comments, id fields, noise) is ignored.
    }

    /// Interprets the accumulated record and resets the in-progress state.
    fn dispatch(&mut self) -> Option<PipelineEvent> {
        let event_type = std::mem::take(&mut self.event_type);
        let data = std::mem::take(&mut self.data);
        if data.is_empty() {
            return None;
        }

        let payload: serde_json::Value = match serde_json::from_str(&data) {
            Ok(value) => value,
            Err(err) => {
                debug!(event_type = %event_type, %err, "dropping record with malformed payload");
                return None;
            }
        };

        match event_type.as_str() {
            "progress" => match serde_json::from_value::<ProgressPayload>(payload) {
                Ok(progress) => Some(PipelineEvent::Progress {
                    stage: StageId::new(progress.stage),
                    label: progress.label,
                    node: progress.node,
                }),
                Err(err) => {
                    debug!(%err, "dropping progress record with incomplete payload");
                    None
                }
            },
            "result" => match serde_json::from_value::<ResultPayload>(payload) {
                Ok(result) => Some(PipelineEvent::Result {
                    output: result.output,
                }),
                Err(err) => {
                    debug!(%err, "dropping result record with invalid output");
                    None
                }
            },
            "error" => match serde_json::from_value::<ErrorPayload>(payload) {
                Ok(error) => Some(PipelineEvent::Error {
                    message: error
                        .message
                        .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string()),
                }),
                Err(err) => {
                    debug!(%err, "dropping error record with invalid payload");
                    None
                }
            },
            other => {
                debug!(event_type = %other, "ignoring unrecognized event type");
                None
            }
        }
    }
}
