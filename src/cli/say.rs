//! TUI-less "say" command

use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;

use crate::core::chat_stream::{ChatBackend, ChatStreamService, StreamMessage, StreamParams};
use crate::core::error::{ConnectionError, InputRejected};
use crate::core::locale::Locale;
use crate::core::session::ChatSession;

#[derive(Debug, thiserror::Error)]
pub enum SayError {
    #[error("nothing to say")]
    EmptyPrompt,

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub async fn run_say(
    prompt: Vec<String>,
    backend: Arc<dyn ChatBackend>,
    locale: Locale,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    let mut stdout = io::stdout();

    match say_to(&mut stdout, backend, locale, &prompt).await {
        Ok(_) => Ok(()),
        Err(SayError::EmptyPrompt) => {
            eprintln!("Usage: shadowcoder say <prompt>");
            std::process::exit(1);
        }
        Err(SayError::Connection(err)) => {
            eprintln!("\n\n❌ {}", locale.connection_error_message());
            eprintln!("   {err}");
            std::process::exit(1);
        }
        Err(SayError::Io(err)) => Err(err.into()),
    }
}

/// Streams one reply to `out` as it arrives and returns the full text.
pub async fn say_to<W: Write>(
    out: &mut W,
    backend: Arc<dyn ChatBackend>,
    locale: Locale,
    prompt: &str,
) -> Result<String, SayError> {
    let mut session = ChatSession::new(locale);
    let request = session.submit(prompt).map_err(|reason| match reason {
        InputRejected::Empty | InputRejected::Busy => SayError::EmptyPrompt,
    })?;
    let stream_id = request.stream_id;

    let (stream_service, mut rx) = ChatStreamService::new();
    stream_service.spawn_stream(StreamParams { backend, request });

    loop {
        let message = match rx.recv().await {
            Some((message, id)) if id == stream_id => message,
            Some(_) => continue,
            None => StreamMessage::Error(ConnectionError::Interrupted(
                "stream task stopped without a result".into(),
            )),
        };

        match message {
            StreamMessage::Chunk(content) => {
                session.on_fragment(stream_id, &content);
                write!(out, "{content}")?;
                out.flush()?;
            }
            StreamMessage::Error(err) => {
                session.on_stream_error(stream_id, &err);
                return Err(err.into());
            }
            StreamMessage::End => {
                session.on_stream_end(stream_id);
                writeln!(out)?;
                let reply = session.transcript().last().map(|turn| turn.text.clone());
                return Ok(reply.unwrap_or_default());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::ScriptedBackend;

    #[tokio::test]
    async fn prints_fragments_as_they_arrive() {
        let mut out = Vec::new();
        let backend = Arc::new(ScriptedBackend::replying(["Hel", "lo"]));
        let reply = say_to(&mut out, backend, Locale::En, "greet me")
            .await
            .expect("reply");

        assert_eq!(reply, "Hello");
        assert_eq!(String::from_utf8(out).unwrap(), "Hello\n");
    }

    #[tokio::test]
    async fn blank_prompt_is_rejected_before_any_request() {
        let backend = Arc::new(ScriptedBackend::replying(["unused"]));
        let result = say_to(&mut Vec::new(), backend.clone(), Locale::En, "  ").await;
        assert!(matches!(result, Err(SayError::EmptyPrompt)));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn stream_failure_keeps_partial_output() {
        let mut out = Vec::new();
        let backend = Arc::new(ScriptedBackend::new(vec![
            Ok("par".into()),
            Err(ConnectionError::Interrupted("reset".into())),
        ]));
        let result = say_to(&mut out, backend, Locale::En, "hi").await;

        assert!(matches!(
            result,
            Err(SayError::Connection(ConnectionError::Interrupted(_)))
        ));
        assert_eq!(String::from_utf8(out).unwrap(), "par");
    }
}
