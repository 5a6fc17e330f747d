mod input;
mod streaming;

use super::App;
use crate::core::chat_stream::StreamParams;
use crate::core::error::ConnectionError;

#[derive(Debug)]
pub enum AppAction {
    AppendResponseChunk {
        content: String,
        stream_id: u64,
    },
    StreamErrored {
        error: ConnectionError,
        stream_id: u64,
    },
    StreamCompleted {
        stream_id: u64,
    },
    /// Submits the current input buffer.
    SubmitInput,
    SubmitMessage {
        message: String,
    },
    InsertChar {
        ch: char,
    },
    Backspace,
    ScrollUp {
        lines: u16,
    },
    ScrollDown {
        lines: u16,
    },
    ScrollToLatest,
    Quit,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AppActionContext {
    pub term_width: u16,
    pub term_height: u16,
}

pub enum AppCommand {
    SpawnStream(StreamParams),
}

pub fn apply_actions(
    app: &mut App,
    actions: impl IntoIterator<Item = AppAction>,
    ctx: AppActionContext,
) -> Vec<AppCommand> {
    actions
        .into_iter()
        .filter_map(|action| apply_action(app, action, ctx))
        .collect()
}

pub fn apply_action(app: &mut App, action: AppAction, ctx: AppActionContext) -> Option<AppCommand> {
    match action {
        AppAction::AppendResponseChunk { .. }
        | AppAction::StreamErrored { .. }
        | AppAction::StreamCompleted { .. }
        | AppAction::SubmitInput
        | AppAction::SubmitMessage { .. } => streaming::handle_streaming_action(app, action, ctx),

        AppAction::InsertChar { .. }
        | AppAction::Backspace
        | AppAction::ScrollUp { .. }
        | AppAction::ScrollDown { .. }
        | AppAction::ScrollToLatest
        | AppAction::Quit => input::handle_input_action(app, action, ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transcript::{Role, TurnStatus};
    use crate::utils::test_utils::create_test_app;

    fn ctx() -> AppActionContext {
        AppActionContext {
            term_width: 80,
            term_height: 24,
        }
    }

    fn type_text(app: &mut App, text: &str) {
        let actions = text.chars().map(|ch| AppAction::InsertChar { ch });
        assert!(apply_actions(app, actions, ctx()).is_empty());
    }

    fn submit(app: &mut App) -> u64 {
        match apply_action(app, AppAction::SubmitInput, ctx()) {
            Some(AppCommand::SpawnStream(params)) => params.request.stream_id,
            None => panic!("expected a stream to be spawned"),
        }
    }

    #[test]
    fn submit_input_spawns_stream_and_clears_input() {
        let mut app = create_test_app();
        type_text(&mut app, "how do lifetimes work?");

        let command = apply_action(&mut app, AppAction::SubmitInput, ctx());
        let Some(AppCommand::SpawnStream(params)) = command else {
            panic!("expected a stream to be spawned");
        };
        assert_eq!(params.request.message, "how do lifetimes work?");
        assert!(params.request.context.is_empty());
        assert!(app.ui.input.is_empty());
        assert!(app.is_busy());
        assert_eq!(app.session.transcript().len(), 2);
    }

    #[test]
    fn rejected_submissions_keep_input_and_transcript() {
        let mut app = create_test_app();
        type_text(&mut app, "   ");
        assert!(apply_action(&mut app, AppAction::SubmitInput, ctx()).is_none());
        assert_eq!(app.ui.input, "   ");
        assert!(app.session.transcript().is_empty());

        app.ui.clear_input();
        type_text(&mut app, "first");
        submit(&mut app);
        type_text(&mut app, "second");
        assert!(apply_action(&mut app, AppAction::SubmitInput, ctx()).is_none());
        assert_eq!(app.ui.input, "second");
        assert_eq!(app.session.transcript().len(), 2);
    }

    #[test]
    fn stream_actions_drive_the_pending_reply() {
        let mut app = create_test_app();
        type_text(&mut app, "hi");
        let stream_id = submit(&mut app);

        let actions = vec![
            AppAction::AppendResponseChunk {
                content: "Hel".into(),
                stream_id,
            },
            AppAction::AppendResponseChunk {
                content: "lo".into(),
                stream_id: stream_id + 100,
            },
            AppAction::AppendResponseChunk {
                content: "lo".into(),
                stream_id,
            },
            AppAction::StreamCompleted { stream_id },
        ];
        assert!(apply_actions(&mut app, actions, ctx()).is_empty());

        let reply = app.session.transcript().last().expect("reply");
        assert_eq!(reply.text, "Hello");
        assert_eq!(reply.status, TurnStatus::Complete);
        assert!(!app.is_busy());
    }

    #[test]
    fn stream_error_appends_notice_and_frees_input() {
        let mut app = create_test_app();
        type_text(&mut app, "hi");
        let stream_id = submit(&mut app);

        apply_action(
            &mut app,
            AppAction::StreamErrored {
                error: ConnectionError::Transport("refused".into()),
                stream_id,
            },
            ctx(),
        );

        let last = app.session.transcript().last().expect("notice");
        assert_eq!(last.role, Role::Model);
        assert_eq!(last.status, TurnStatus::Notice);
        assert!(!app.is_busy());

        type_text(&mut app, "retry");
        assert!(apply_action(&mut app, AppAction::SubmitInput, ctx()).is_some());
    }

    #[test]
    fn submit_message_bypasses_the_input_buffer() {
        let mut app = create_test_app();
        type_text(&mut app, "draft");
        let command = apply_action(
            &mut app,
            AppAction::SubmitMessage {
                message: "direct".into(),
            },
            ctx(),
        );
        assert!(command.is_some());
        assert_eq!(app.ui.input, "draft");
    }

    #[test]
    fn scrolling_and_quit_update_ui_state() {
        let mut app = create_test_app();
        type_text(&mut app, "hi");
        let stream_id = submit(&mut app);
        apply_action(
            &mut app,
            AppAction::AppendResponseChunk {
                content: "line\n".repeat(40),
                stream_id,
            },
            ctx(),
        );
        let bottom = app.max_scroll_offset(80, 24);
        assert_eq!(app.ui.scroll_offset, bottom);

        apply_action(&mut app, AppAction::ScrollUp { lines: 5 }, ctx());
        assert_eq!(app.ui.scroll_offset, bottom - 5);
        assert!(!app.ui.auto_scroll);

        apply_action(&mut app, AppAction::ScrollDown { lines: 100 }, ctx());
        assert_eq!(app.ui.scroll_offset, bottom);
        assert!(app.ui.auto_scroll);

        apply_action(&mut app, AppAction::ScrollUp { lines: 2 }, ctx());
        apply_action(&mut app, AppAction::ScrollToLatest, ctx());
        assert_eq!(app.ui.scroll_offset, bottom);

        apply_action(&mut app, AppAction::Quit, ctx());
        assert!(app.ui.exit_requested);
    }
}
