//! Server-Sent Events decoding
//!
//! [`SseDecoder`] turns an arbitrarily chunked byte stream into discrete
//! events. It is used both by the REST client (for `invoke/stream`) and by
//! the controller when relaying the agent framework's stream.

use futures::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::pin::Pin;

/// Event type used when the stream omits an `event:` field
pub const DEFAULT_EVENT_TYPE: &str = "message";

/// A single server-sent event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SseEvent {
    /// Event type (`event:` field)
    pub event: String,
    /// Event payload; multiple `data:` lines are joined with `\n`
    pub data: String,
}

impl SseEvent {
    /// Create a new event
    pub fn new(event: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            data: data.into(),
        }
    }

    /// Encode the event in wire format, terminated by a blank line
    pub fn to_wire(&self) -> String {
        let mut out = format!("event: {}\n", self.event);
        for line in self.data.split('\n') {
            out.push_str("data: ");
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        out
    }

    /// Parse the payload as JSON, if it is JSON
    pub fn json_data(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.data).ok()
    }
}

/// Incremental SSE parser
///
/// Bytes are buffered until a full line is available, so chunk boundaries
/// may fall anywhere, including inside a multi-byte character or between
/// `\r` and `\n`.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    /// Prefix of `buffer` already known to hold no newline
    scanned: usize,
    event: Option<String>,
    data: Vec<String>,
}

impl SseDecoder {
    /// Create an empty decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every event it completes
    ///
    /// Only the newly appended bytes are searched for line ends, and the
    /// consumed prefix is dropped once per call.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        let mut start = 0;
        let mut from = self.scanned;
        while let Some(offset) = self.buffer[from..].iter().position(|b| *b == b'\n') {
            let end = from + offset;
            let mut line = &self.buffer[start..end];
            if line.last() == Some(&b'\r') {
                line = &line[..line.len() - 1];
            }
            let line = String::from_utf8_lossy(line).into_owned();
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
            start = end + 1;
            from = start;
        }

        self.buffer.drain(..start);
        self.scanned = self.buffer.len();
        events
    }

    /// Flush at end of input
    ///
    /// A trailing event without its terminating blank line is still emitted.
    pub fn finish(&mut self) -> Option<SseEvent> {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            self.scanned = 0;
            let line = String::from_utf8_lossy(&rest);
            let line = line.trim_end_matches('\r').to_string();
            if let Some(event) = self.process_line(&line) {
                return Some(event);
            }
        }
        self.dispatch()
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        // comment / keep-alive
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            // id and retry carry no meaning for a relay without resumption
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = self.event.take();
        // a block without data lines is dropped, event type included
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseEvent {
            event: event
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string()),
            data,
        })
    }
}

/// Boxed stream of decoded events
pub type SseStream<E> = Pin<Box<dyn Stream<Item = std::result::Result<SseEvent, E>> + Send>>;

/// Decode a byte stream into an event stream
///
/// The first transport error is yielded and ends the stream.
pub fn decode_stream<S, B, E>(bytes: S) -> impl Stream<Item = std::result::Result<SseEvent, E>>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
{
    struct State<S> {
        bytes: Pin<Box<S>>,
        decoder: SseDecoder,
        pending: VecDeque<SseEvent>,
        done: bool,
    }

    let state = State {
        bytes: Box::pin(bytes),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(event) = state.pending.pop_front() {
                return Some((Ok(event), state));
            }
            if state.done {
                return None;
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    let events = state.decoder.push(chunk.as_ref());
                    state.pending.extend(events);
                }
                Some(Err(e)) => {
                    state.done = true;
                    return Some((Err(e), state));
                }
                None => {
                    state.done = true;
                    state.pending.extend(state.decoder.finish());
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decode_all(chunks: &[&[u8]]) -> Vec<SseEvent> {
        let mut decoder = SseDecoder::new();
        let mut events = Vec::new();
        for chunk in chunks {
            events.extend(decoder.push(chunk));
        }
        events.extend(decoder.finish());
        events
    }

    #[test]
    fn test_single_event() {
        let events = decode_all(&[b"event: task_result\ndata: {\"ok\":true}\n\n"]);
        assert_eq!(events, vec![SseEvent::new("task_result", "{\"ok\":true}")]);
    }

    #[test]
    fn test_multiline_data_and_crlf() {
        let events = decode_all(&[b"event: log\r\ndata: one\r\ndata: two\r\n\r\n"]);
        assert_eq!(events, vec![SseEvent::new("log", "one\ntwo")]);
    }

    #[test]
    fn test_default_event_type_and_comments() {
        let events = decode_all(&[b": keep-alive\n\ndata: hello\n\n"]);
        assert_eq!(events, vec![SseEvent::new(DEFAULT_EVENT_TYPE, "hello")]);
    }

    #[test]
    fn test_value_without_space() {
        let events = decode_all(&[b"event:delta\ndata:abc\n\n"]);
        assert_eq!(events, vec![SseEvent::new("delta", "abc")]);
    }

    #[test]
    fn test_trailing_event_without_blank_line() {
        let events = decode_all(&[b"event: done\ndata: bye"]);
        assert_eq!(events, vec![SseEvent::new("done", "bye")]);
    }

    #[test]
    fn test_wire_format_round_trip() {
        let event = SseEvent::new("message", "line one\nline two");
        assert_eq!(
            event.to_wire(),
            "event: message\ndata: line one\ndata: line two\n\n"
        );
        assert_eq!(decode_all(&[event.to_wire().as_bytes()]), vec![event]);
    }

    #[test]
    fn test_event_without_data_is_dropped() {
        let events = decode_all(&[b"event: ping\n\nevent: pong\ndata: x\n\n"]);
        assert_eq!(events, vec![SseEvent::new("pong", "x")]);

        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"event: ping\n\n").is_empty());
        assert_eq!(decoder.push(b"data: y\n\n"), vec![SseEvent::new(DEFAULT_EVENT_TYPE, "y")]);
    }

    #[test]
    fn test_empty_data_line_is_kept() {
        let events = decode_all(&[b"event: tick\ndata:\n\n"]);
        assert_eq!(events, vec![SseEvent::new("tick", "")]);
    }

    #[test]
    fn test_long_line_split_into_small_chunks() {
        let payload = "x".repeat(4 << 20);
        let wire = SseEvent::new("blob", payload.clone()).to_wire();

        let started = std::time::Instant::now();
        let mut decoder = SseDecoder::new();
        let mut events = Vec::new();
        for chunk in wire.as_bytes().chunks(1024) {
            events.extend(decoder.push(chunk));
        }
        assert!(started.elapsed() < std::time::Duration::from_secs(5));

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data.len(), payload.len());
    }

    #[test]
    fn test_many_events_in_one_chunk() {
        let wire: String = (0..50_000)
            .map(|i| SseEvent::new("TextMessage", i.to_string()).to_wire())
            .collect();

        let started = std::time::Instant::now();
        let events = SseDecoder::new().push(wire.as_bytes());
        assert!(started.elapsed() < std::time::Duration::from_secs(5));

        assert_eq!(events.len(), 50_000);
        assert_eq!(events[49_999].data, "49999");
    }

    #[tokio::test]
    async fn test_decode_stream_stops_on_error() {
        let chunks: Vec<std::result::Result<Vec<u8>, String>> = vec![
            Ok(b"event: a\ndata: 1\n\nevent: b\n".to_vec()),
            Ok(b"data: 2\n\n".to_vec()),
            Err("connection reset".to_string()),
            Ok(b"event: c\ndata: 3\n\n".to_vec()),
        ];
        let results: Vec<_> = decode_stream(stream::iter(chunks)).collect().await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0], Ok(SseEvent::new("a", "1")));
        assert_eq!(results[1], Ok(SseEvent::new("b", "2")));
        assert_eq!(results[2], Err("connection reset".to_string()));
    }

    proptest! {
        #[test]
        fn prop_chunking_does_not_change_events(
            payloads in proptest::collection::vec("[a-zA-Z0-9 {}:\"é]{0,24}", 1..6),
            splits in proptest::collection::vec(any::<prop::sample::Index>(), 0..8),
        ) {
            let wire: String = payloads
                .iter()
                .enumerate()
                .map(|(i, p)| SseEvent::new(format!("e{i}"), p.clone()).to_wire())
                .collect();
            let bytes = wire.as_bytes();

            let mut cuts: Vec<usize> = splits.iter().map(|ix| ix.index(bytes.len() + 1)).collect();
            cuts.sort_unstable();
            cuts.dedup();

            let mut chunks = Vec::new();
            let mut start = 0;
            for cut in cuts {
                chunks.push(&bytes[start..cut]);
                start = cut;
            }
            chunks.push(&bytes[start..]);

            prop_assert_eq!(decode_all(&chunks), decode_all(&[bytes]));
            prop_assert_eq!(decode_all(&[bytes]).len(), payloads.len());
        }
    }
}
