//! Main chat event loop and UI rendering
//!
//! The loop owns the [`App`]. Each tick it redraws if anything changed, polls
//! the terminal for input, and drains every stream message that arrived since
//! the last tick.

mod keybindings;
pub mod lifecycle;

use std::error::Error;
use std::time::Duration;

use ratatui::crossterm::event::{self, Event};
use ratatui::prelude::Size;
use tokio::sync::mpsc;
use tracing::info;

use self::keybindings::action_for_key;
use self::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use crate::core::app::{apply_action, apply_actions, App, AppAction, AppActionContext, AppCommand};
use crate::core::chat_stream::{ChatStreamService, StreamMessage};
use crate::ui::renderer::ui;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub async fn run_chat(mut app: App) -> Result<(), Box<dyn Error>> {
    let mut terminal = setup_terminal()?;
    info!(model = %app.model, "chat session started");

    let result = event_loop(&mut terminal, &mut app).await;

    restore_terminal(&mut terminal)?;
    info!(turns = app.session.transcript().len(), "chat session ended");
    result
}

/// Decides when the screen is stale. The session revision covers transcript
/// and busy changes; key input and resizes mark the frame dirty.
#[derive(Debug, Default)]
struct RedrawState {
    drawn_revision: Option<u64>,
    dirty: bool,
}

impl RedrawState {
    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn needs_redraw(&self, app: &App) -> bool {
        // The pulse indicator animates while a reply is pending
        self.dirty || app.is_busy() || self.drawn_revision != Some(app.session.revision())
    }

    fn drawn(&mut self, app: &App) {
        self.drawn_revision = Some(app.session.revision());
        self.dirty = false;
    }
}

async fn event_loop(terminal: &mut ChatTerminal, app: &mut App) -> Result<(), Box<dyn Error>> {
    let (stream_service, mut rx) = ChatStreamService::new();
    let mut redraw = RedrawState::default();

    loop {
        if app.ui.exit_requested {
            return Ok(());
        }
        if redraw.needs_redraw(app) {
            terminal.draw(|f| ui(f, app))?;
            redraw.drawn(app);
        }
        let ctx = action_context(terminal.size()?);

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(action) = action_for_key(&key, ctx.term_height) {
                        dispatch(app, &stream_service, action, ctx);
                        redraw.mark_dirty();
                    }
                }
                Event::Resize(..) => redraw.mark_dirty(),
                _ => {}
            }
        }

        drain_stream_messages(app, &stream_service, &mut rx, ctx);
        // Yield so stream tasks progress between terminal polls
        tokio::task::yield_now().await;
    }
}

fn action_context(size: Size) -> AppActionContext {
    AppActionContext {
        term_width: size.width,
        term_height: size.height,
    }
}

fn dispatch(
    app: &mut App,
    stream_service: &ChatStreamService,
    action: AppAction,
    ctx: AppActionContext,
) {
    run_commands(stream_service, apply_action(app, action, ctx));
}

fn run_commands(
    stream_service: &ChatStreamService,
    commands: impl IntoIterator<Item = AppCommand>,
) {
    for command in commands {
        match command {
            AppCommand::SpawnStream(params) => stream_service.spawn_stream(params),
        }
    }
}

pub(crate) fn stream_action(message: StreamMessage, stream_id: u64) -> AppAction {
    match message {
        StreamMessage::Chunk(content) => AppAction::AppendResponseChunk { content, stream_id },
        StreamMessage::Error(error) => AppAction::StreamErrored { error, stream_id },
        StreamMessage::End => AppAction::StreamCompleted { stream_id },
    }
}

fn drain_stream_messages(
    app: &mut App,
    stream_service: &ChatStreamService,
    rx: &mut mpsc::UnboundedReceiver<(StreamMessage, u64)>,
    ctx: AppActionContext,
) {
    let actions: Vec<AppAction> = std::iter::from_fn(|| rx.try_recv().ok())
        .map(|(message, stream_id)| stream_action(message, stream_id))
        .collect();
    run_commands(stream_service, apply_actions(app, actions, ctx));
}
