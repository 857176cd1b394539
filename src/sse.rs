// Server-sent event construction and parsing

use bytes::Bytes;
use std::convert::Infallible;

/// Sentinel payload marking the end of a relayed chat stream
pub const DONE_MARKER: &str = "[DONE]";

// Clients match the literal `data: ` prefix, space included
fn data_frame(payload: &str) -> Result<Bytes, Infallible> {
    Ok(Bytes::from(format!("data: {}\n\n", payload)))
}

/// Create a content event carrying one chunk of model output
pub fn content_event(chunk: &str) -> Result<Bytes, Infallible> {
    data_frame(&serde_json::json!({ "content": chunk }).to_string())
}

/// Create an error event; the stream is expected to end right after it
pub fn error_event(message: &str) -> Result<Bytes, Infallible> {
    data_frame(&serde_json::json!({ "error": message }).to_string())
}

/// Create the terminal `[DONE]` event
pub fn done_event() -> Result<Bytes, Infallible> {
    data_frame(DONE_MARKER)
}

/// A single dispatched SSE block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// Value of the `event:` field, if any
    pub event: Option<String>,
    /// All `data:` lines joined with `\n`
    pub data: String,
}

/// Incremental SSE parser
///
/// Bytes are buffered until a blank line closes a block, so frames come out
/// the same no matter where the transport splits the stream. Multi-byte
/// characters split across chunks are handled because decoding happens per
/// complete block rather than per chunk.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes and return every frame it completes
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<SseFrame>, std::str::Utf8Error> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some((end, delimiter_len)) = find_block_end(&self.buffer) {
            let block: Vec<u8> = self.buffer.drain(..end + delimiter_len).take(end).collect();
            if let Some(frame) = parse_block(std::str::from_utf8(&block)?) {
                frames.push(frame);
            }
        }
        Ok(frames)
    }

    /// Flush a trailing block that was not terminated by a blank line
    pub fn finish(&mut self) -> Result<Option<SseFrame>, std::str::Utf8Error> {
        if self.buffer.is_empty() {
            return Ok(None);
        }
        let block = std::mem::take(&mut self.buffer);
        Ok(parse_block(std::str::from_utf8(&block)?))
    }
}

fn find_block_end(buffer: &[u8]) -> Option<(usize, usize)> {
    let lf = find(buffer, b"\n\n").map(|i| (i, 2));
    let crlf = find(buffer, b"\r\n\r\n").map(|i| (i, 4));
    match (lf, crlf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn parse_block(block: &str) -> Option<SseFrame> {
    let mut event = None;
    let mut data_lines: Vec<&str> = Vec::new();

    for line in block.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() || line.starts_with(':') {
            continue;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => event = Some(value.to_string()),
            "data" => data_lines.push(value),
            _ => {}
        }
    }

    if data_lines.is_empty() {
        return None;
    }

    Some(SseFrame {
        event,
        data: data_lines.join("\n"),
    })
}
