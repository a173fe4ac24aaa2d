//! Decoding of generation fragments
//!
//! The backend answers `/api/generate` with a sequence of JSON objects, each
//! carrying a piece of text and a `done` flag. Streamed answers put one
//! object per line; a non-streamed answer is a single object that may be
//! pretty-printed over several lines. Objects are therefore read as a JSON
//! value stream, not split on newlines.

use crate::error::{GenError, Result};
use futures::{Stream, StreamExt};
use serde::Deserialize;
use tracing::{debug, warn};

/// One decoded generation fragment
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Fragment {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
    /// Set when the backend fails mid-generation
    #[serde(default)]
    pub error: Option<String>,
}

/// Decodes JSON objects from raw bytes, buffering an incomplete object
/// across chunks
#[derive(Debug, Default)]
pub struct FragmentDecoder {
    buffer: Vec<u8>,
}

impl FragmentDecoder {
    /// Feed a chunk and return every complete object decoded so far.
    ///
    /// A syntax error is returned in place and discards the rest of the
    /// buffer.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<serde_json::Result<Fragment>> {
        self.buffer.extend_from_slice(chunk);

        let mut decoded = Vec::new();
        let mut consumed = 0;
        let mut values =
            serde_json::Deserializer::from_slice(&self.buffer).into_iter::<Fragment>();
        loop {
            match values.next() {
                Some(Ok(fragment)) => {
                    decoded.push(Ok(fragment));
                    consumed = values.byte_offset();
                }
                // Incomplete object, wait for more bytes
                Some(Err(e)) if e.is_eof() => break,
                Some(Err(e)) => {
                    decoded.push(Err(e));
                    consumed = self.buffer.len();
                    break;
                }
                None => {
                    consumed = values.byte_offset();
                    break;
                }
            }
        }

        self.buffer.drain(..consumed);
        decoded
    }

    /// Report whatever is left once the stream has ended
    pub fn finish(&mut self) -> Option<serde_json::Result<Fragment>> {
        let rest = std::mem::take(&mut self.buffer);
        if rest.iter().all(u8::is_ascii_whitespace) {
            return None;
        }
        Some(serde_json::from_slice(&rest))
    }
}

/// Concatenate fragment text in arrival order.
///
/// Consumption stops at the first fragment with `done` set; nothing after it
/// is read. End of stream, a transport error or a malformed fragment before
/// that point also end consumption, and the text gathered so far is the
/// result. Zero-length text is an [`GenError::EmptyResponse`].
pub async fn collect_fragments<S, B, E>(status: u16, stream: S) -> Result<String>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut stream = std::pin::pin!(stream);
    let mut decoder = FragmentDecoder::default();
    let mut text = String::new();
    let mut count = 0usize;

    loop {
        let (batch, exhausted) = match stream.next().await {
            Some(Ok(chunk)) => (decoder.push(chunk.as_ref()), false),
            Some(Err(e)) => {
                warn!("Backend stream interrupted after {} fragments: {}", count, e);
                (Vec::new(), true)
            }
            None => (decoder.finish().into_iter().collect(), true),
        };

        for decoded in batch {
            match decoded {
                Ok(fragment) => {
                    if let Some(error) = fragment.error {
                        return Err(GenError::BackendError { status, body: error });
                    }
                    count += 1;
                    text.push_str(&fragment.response);
                    if fragment.done {
                        debug!("Backend completed after {} fragments", count);
                        return non_empty(text);
                    }
                }
                Err(e) => {
                    warn!("Malformed fragment from backend after {} fragments: {}", count, e);
                    return non_empty(text);
                }
            }
        }

        if exhausted {
            debug!("Backend stream ended without completion flag");
            return non_empty(text);
        }
    }
}

fn non_empty(text: String) -> Result<String> {
    if text.is_empty() {
        Err(GenError::EmptyResponse)
    } else {
        Ok(text)
    }
}
