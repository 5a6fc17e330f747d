use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::Content;
use crate::core::error::ConnectionError;
use crate::core::session::StreamRequest;

/// Reply fragments in arrival order. Finite and not restartable.
pub type FragmentStream = BoxStream<'static, Result<String, ConnectionError>>;

/// A provider able to answer one message given the prior conversation.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn stream_response(
        &self,
        context: Vec<Content>,
        message: String,
    ) -> Result<FragmentStream, ConnectionError>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum StreamMessage {
    Chunk(String),
    Error(ConnectionError),
    End,
}

pub struct StreamParams {
    pub backend: Arc<dyn ChatBackend>,
    pub request: StreamRequest,
}

/// Runs response streams on background tasks and funnels their events,
/// tagged with the stream id, into a single channel.
#[derive(Clone)]
pub struct ChatStreamService {
    tx: mpsc::UnboundedSender<(StreamMessage, u64)>,
}

impl ChatStreamService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(StreamMessage, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Every spawned stream ends with exactly one `End` or `Error`.
    pub fn spawn_stream(&self, params: StreamParams) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let StreamParams { backend, request } = params;
            let StreamRequest {
                stream_id,
                context,
                message,
            } = request;

            debug!(stream_id, "opening response stream");
            let mut fragments = match backend.stream_response(context, message).await {
                Ok(fragments) => fragments,
                Err(err) => {
                    warn!(stream_id, error = %err, "failed to open response stream");
                    let _ = tx.send((StreamMessage::Error(err), stream_id));
                    return;
                }
            };

            let mut received = 0usize;
            while let Some(item) = fragments.next().await {
                match item {
                    Ok(fragment) => {
                        received += 1;
                        if tx.send((StreamMessage::Chunk(fragment), stream_id)).is_err() {
                            debug!(stream_id, "receiver dropped, abandoning stream");
                            return;
                        }
                    }
                    Err(err) => {
                        let _ = tx.send((StreamMessage::Error(err), stream_id));
                        return;
                    }
                }
            }

            debug!(stream_id, fragments = received, "response stream closed");
            let _ = tx.send((StreamMessage::End, stream_id));
        });
    }

    #[cfg(test)]
    pub fn send_for_test(&self, message: StreamMessage, stream_id: u64) {
        let _ = self.tx.send((message, stream_id));
    }
}
