//! LLM provider implementations.

pub mod gemini;
pub mod mock;
pub mod ollama;

pub use gemini::GeminiClient;
pub use mock::MockClient;
pub use ollama::OllamaClient;

use futures::{Stream, StreamExt};
use mentor_core::{AppError, AppResult};
use std::pin::Pin;

/// Re-split an HTTP byte stream into trimmed, non-empty text lines.
///
/// Network chunks do not respect line boundaries, so bytes are buffered
/// until a newline arrives.
pub(crate) fn line_stream<S, B, E>(bytes: S) -> Pin<Box<dyn Stream<Item = AppResult<String>> + Send>>
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let state = (Box::pin(bytes), Vec::<u8>::new(), false);

    Box::pin(futures::stream::unfold(
        state,
        |(mut inner, mut buffer, mut finished)| async move {
            loop {
                if let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                    let raw: Vec<u8> = buffer.drain(..=pos).collect();
                    let line = String::from_utf8_lossy(&raw).trim().to_string();
                    if line.is_empty() {
                        continue;
                    }
                    return Some((Ok(line), (inner, buffer, finished)));
                }

                if finished {
                    let line = String::from_utf8_lossy(&buffer).trim().to_string();
                    buffer.clear();
                    if line.is_empty() {
                        return None;
                    }
                    return Some((Ok(line), (inner, buffer, finished)));
                }

                match inner.next().await {
                    Some(Ok(bytes)) => buffer.extend_from_slice(bytes.as_ref()),
                    Some(Err(e)) => {
                        buffer.clear();
                        let err = AppError::Llm(format!("Stream error: {}", e));
                        return Some((Err(err), (inner, buffer, true)));
                    }
                    None => finished = true,
                }
            }
        },
    ))
}

/// Read a non-success HTTP response into an error.
pub(crate) async fn api_error(provider: &str, response: reqwest::Response) -> AppError {
    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    AppError::Llm(format!("{} API error ({}): {}", provider, status, error_text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_line_stream_rejoins_split_lines() {
        let chunks: Vec<Result<&'static [u8], String>> = vec![
            Ok(b"{\"a\":"),
            Ok(b"1}\n\n{\"b\""),
            Ok(b":2}\n{\"c\":3}"),
        ];
        let lines: Vec<String> = line_stream(futures::stream::iter(chunks))
            .map(|line| line.unwrap())
            .collect()
            .await;

        assert_eq!(lines, vec!["{\"a\":1}", "{\"b\":2}", "{\"c\":3}"]);
    }

    #[tokio::test]
    async fn test_line_stream_surfaces_transport_errors() {
        let chunks: Vec<Result<&'static [u8], String>> =
            vec![Ok(b"partial"), Err("connection reset".to_string())];
        let items: Vec<AppResult<String>> =
            line_stream(futures::stream::iter(chunks)).collect().await;

        assert_eq!(items.len(), 1);
        assert!(items[0]
            .as_ref()
            .unwrap_err()
            .to_string()
            .contains("connection reset"));
    }
}
