use super::{App, AppAction, AppActionContext, AppCommand};

pub(super) fn handle_input_action(
    app: &mut App,
    action: AppAction,
    ctx: AppActionContext,
) -> Option<AppCommand> {
    match action {
        AppAction::InsertChar { ch } => {
            app.ui.insert_char(ch);
            None
        }
        AppAction::Backspace => {
            app.ui.backspace();
            None
        }
        AppAction::ScrollUp { lines } => {
            app.ui.scroll_up(lines);
            None
        }
        AppAction::ScrollDown { lines } => {
            let max_offset = app.max_scroll_offset(ctx.term_width, ctx.term_height);
            app.ui.scroll_down(lines, max_offset);
            None
        }
        AppAction::ScrollToLatest => {
            let max_offset = app.max_scroll_offset(ctx.term_width, ctx.term_height);
            app.ui.scroll_to_bottom(max_offset);
            None
        }
        AppAction::Quit => {
            app.ui.exit_requested = true;
            None
        }
        _ => unreachable!("non-input action routed to input handler"),
    }
}
