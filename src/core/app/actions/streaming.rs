use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use super::{App, AppAction, AppActionContext, AppCommand};
use crate::core::chat_stream::StreamParams;

pub(super) fn handle_streaming_action(
    app: &mut App,
    action: AppAction,
    ctx: AppActionContext,
) -> Option<AppCommand> {
    match action {
        AppAction::AppendResponseChunk { content, stream_id } => {
            if app.session.on_fragment(stream_id, &content) {
                app.follow_latest(ctx.term_width, ctx.term_height);
            }
            None
        }
        AppAction::StreamErrored { error, stream_id } => {
            if app.session.on_stream_error(stream_id, &error) {
                app.follow_latest(ctx.term_width, ctx.term_height);
            }
            None
        }
        AppAction::StreamCompleted { stream_id } => {
            if app.session.on_stream_end(stream_id) {
                app.follow_latest(ctx.term_width, ctx.term_height);
            }
            None
        }
        AppAction::SubmitInput => {
            let message = app.ui.input.clone();
            let command = spawn_stream_for_message(app, message, ctx);
            if command.is_some() {
                app.ui.clear_input();
            }
            command
        }
        AppAction::SubmitMessage { message } => spawn_stream_for_message(app, message, ctx),
        _ => unreachable!("non-streaming action routed to streaming handler"),
    }
}

fn spawn_stream_for_message(
    app: &mut App,
    message: String,
    ctx: AppActionContext,
) -> Option<AppCommand> {
    match app.session.submit(&message) {
        Ok(request) => {
            app.ui.pulse_start = Instant::now();
            app.ui.auto_scroll = true;
            app.follow_latest(ctx.term_width, ctx.term_height);
            Some(AppCommand::SpawnStream(StreamParams {
                backend: Arc::clone(&app.backend),
                request,
            }))
        }
        Err(reason) => {
            debug!(%reason, "submission ignored");
            None
        }
    }
}
