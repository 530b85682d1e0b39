use std::collections::VecDeque;

use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use log::debug;

use crate::error::{Error, Result};

const CHAT_COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";
pub const DEFAULT_PROMPT: &str = "Summarize the following transcript:";

const MAX_COMPLETION_TOKENS: u32 = 8192;

/// Combined prompt: instruction first, then the transcript, single space
/// between them.
pub fn build_prompt(instruction: &str, source_text: &str) -> String {
    format!("{instruction} {source_text}")
}

/// Start a streaming summarization request.
///
/// Fragments arrive in generation order via [`SummaryStream::next_fragment`];
/// concatenating them yields the complete summary. A transport or API failure
/// (including mid-stream) surfaces as [`Error::SummarizationFailed`]; fragments
/// already yielded stand, but the caller must treat them as incomplete.
pub async fn stream_summary(
    client: &reqwest::Client,
    api_key: &str,
    model: &str,
    instruction: &str,
    source_text: &str,
) -> Result<SummaryStream> {
    debug!("Requesting streaming summary with model {model}");

    let body = serde_json::json!({
        "model": model,
        "messages": [
            {
                "role": "user",
                "content": build_prompt(instruction, source_text)
            }
        ],
        "temperature": 1,
        "max_completion_tokens": MAX_COMPLETION_TOKENS,
        "top_p": 1,
        "stream": true
    });

    let resp = client
        .post(CHAT_COMPLETIONS_URL)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| Error::summarization(Error::Http(e)))?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let message = resp.text().await.unwrap_or_default();
        return Err(Error::summarization(Error::Api {
            service: "generation",
            status,
            message,
        }));
    }

    let inner = resp
        .bytes_stream()
        .map(|chunk| chunk.map(|b| b.to_vec()).map_err(Error::Http))
        .boxed();

    Ok(SummaryStream::new(inner))
}

enum SseEvent {
    Fragment(String),
    Done,
}

/// One `data:` line of the SSE response. Returns `None` for keep-alives,
/// comments, and deltas without content.
fn parse_sse_data(line: &str) -> Option<SseEvent> {
    let data = line.trim().strip_prefix("data:")?.trim_start();
    if data == "[DONE]" {
        return Some(SseEvent::Done);
    }
    let json: serde_json::Value = serde_json::from_str(data).ok()?;
    let content = json
        .get("choices")?
        .get(0)?
        .get("delta")?
        .get("content")?
        .as_str()?;
    if content.is_empty() {
        None
    } else {
        Some(SseEvent::Fragment(content.to_string()))
    }
}

/// Append-only sequence of generated text fragments for one summary request.
/// Not restartable; discarded once consumed.
pub struct SummaryStream {
    inner: BoxStream<'static, Result<Vec<u8>>>,
    buf: Vec<u8>,
    pending: VecDeque<String>,
    done: bool,
}

impl SummaryStream {
    fn new(inner: BoxStream<'static, Result<Vec<u8>>>) -> Self {
        SummaryStream {
            inner,
            buf: Vec::new(),
            pending: VecDeque::new(),
            done: false,
        }
    }

    /// Next text fragment, in arrival order. `None` means the stream is
    /// complete; an `Err` means it failed mid-delivery and no further
    /// fragments will arrive.
    pub async fn next_fragment(&mut self) -> Option<Result<String>> {
        loop {
            if let Some(fragment) = self.pending.pop_front() {
                return Some(Ok(fragment));
            }
            if self.done {
                return None;
            }

            match self.inner.next().await {
                Some(Ok(chunk)) => {
                    self.buf.extend_from_slice(&chunk);
                    self.drain_complete_lines();
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(Error::summarization(e)));
                }
                None => {
                    self.done = true;
                    if !self.buf.is_empty() {
                        let rest = std::mem::take(&mut self.buf);
                        self.handle_line(&String::from_utf8_lossy(&rest));
                    }
                }
            }
        }
    }

    /// Consume the remaining stream and return the concatenated summary.
    pub async fn collect_text(mut self) -> Result<String> {
        let mut out = String::new();
        while let Some(fragment) = self.next_fragment().await {
            out.push_str(&fragment?);
        }
        Ok(out)
    }

    // SSE events are newline-delimited; multi-byte characters never span a
    // line boundary, so lossy conversion per line is safe.
    fn drain_complete_lines(&mut self) {
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            self.handle_line(&line);
        }
    }

    fn handle_line(&mut self, line: &str) {
        match parse_sse_data(line) {
            Some(SseEvent::Fragment(f)) => self.pending.push_back(f),
            Some(SseEvent::Done) => self.done = true,
            None => {}
        }
    }
}
