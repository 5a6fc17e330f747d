use std::sync::Arc;

use ratatui::text::Line;

use crate::core::chat_stream::ChatBackend;
use crate::core::locale::Locale;
use crate::core::session::ChatSession;
use crate::ui::transcript_view::build_transcript_lines;

pub mod actions;
pub mod ui_state;

pub use actions::{apply_action, apply_actions, AppAction, AppActionContext, AppCommand};
pub use ui_state::UiState;

pub struct App {
    pub session: ChatSession,
    pub ui: UiState,
    pub backend: Arc<dyn ChatBackend>,
    pub model: String,
}

impl App {
    pub fn new(backend: Arc<dyn ChatBackend>, model: String, locale: Locale) -> Self {
        Self {
            session: ChatSession::new(locale),
            ui: UiState::new(),
            backend,
            model,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.session.is_busy()
    }

    pub fn transcript_lines(&self, width: u16) -> Vec<Line<'static>> {
        build_transcript_lines(
            self.session.transcript(),
            self.session.locale(),
            width as usize,
        )
    }

    pub fn max_scroll_offset(&self, term_width: u16, term_height: u16) -> u16 {
        let viewport = ui_state::transcript_viewport_height(term_height);
        ui_state::max_scroll_offset(self.transcript_lines(term_width).len(), viewport)
    }

    /// Keeps the newest line in view unless the user has scrolled away.
    pub fn follow_latest(&mut self, term_width: u16, term_height: u16) {
        if !self.ui.auto_scroll || term_height == 0 {
            return;
        }
        self.ui.scroll_offset = self.max_scroll_offset(term_width, term_height);
    }
}
