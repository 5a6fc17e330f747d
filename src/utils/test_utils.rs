use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures_util::{stream, StreamExt};

use crate::api::Content;
use crate::core::app::App;
use crate::core::chat_stream::{ChatBackend, FragmentStream};
use crate::core::error::ConnectionError;
use crate::core::locale::Locale;

type Recorded = Vec<(Vec<Content>, String)>;

/// Backend that replays a fixed script and records what it was asked.
pub struct ScriptedBackend {
    script: Result<Vec<Result<String, ConnectionError>>, ConnectionError>,
    calls: Mutex<Recorded>,
}

impl ScriptedBackend {
    pub fn new(items: Vec<Result<String, ConnectionError>>) -> Self {
        Self {
            script: Ok(items),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn replying<const N: usize>(fragments: [&str; N]) -> Self {
        Self::new(fragments.iter().map(|f| Ok(f.to_string())).collect())
    }

    pub fn failing_to_open(error: ConnectionError) -> Self {
        Self {
            script: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Recorded {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn stream_response(
        &self,
        context: Vec<Content>,
        message: String,
    ) -> Result<FragmentStream, ConnectionError> {
        self.calls.lock().unwrap().push((context, message));
        match &self.script {
            Ok(items) => Ok(stream::iter(items.clone()).boxed()),
            Err(err) => Err(err.clone()),
        }
    }
}

pub fn create_test_app() -> App {
    App::new(
        Arc::new(ScriptedBackend::replying(["ok"])),
        "test-model".to_string(),
        Locale::En,
    )
}
