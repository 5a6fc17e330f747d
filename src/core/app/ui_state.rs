use std::time::Instant;

/// Rows taken by the bordered single-line input box.
pub const INPUT_AREA_HEIGHT: u16 = 3;
/// Rows taken by the title line above the transcript.
pub const TITLE_HEIGHT: u16 = 1;

pub struct UiState {
    pub input: String,
    pub scroll_offset: u16,
    /// When set, every transcript change scrolls the newest line into view.
    pub auto_scroll: bool,
    pub pulse_start: Instant,
    pub exit_requested: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            scroll_offset: 0,
            auto_scroll: true,
            pulse_start: Instant::now(),
            exit_requested: false,
        }
    }

    pub fn insert_char(&mut self, ch: char) {
        self.input.push(ch);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Scrolls toward older lines and stops following new output.
    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
        self.auto_scroll = false;
    }

    /// Scrolls toward newer lines; reaching the bottom resumes following.
    pub fn scroll_down(&mut self, lines: u16, max_offset: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines).min(max_offset);
        self.auto_scroll = self.scroll_offset >= max_offset;
    }

    pub fn scroll_to_bottom(&mut self, max_offset: u16) {
        self.scroll_offset = max_offset;
        self.auto_scroll = true;
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

/// Transcript rows visible for a terminal of `term_height` rows.
pub fn transcript_viewport_height(term_height: u16) -> u16 {
    term_height
        .saturating_sub(INPUT_AREA_HEIGHT)
        .saturating_sub(TITLE_HEIGHT)
}

pub fn max_scroll_offset(total_lines: usize, viewport_height: u16) -> u16 {
    let total = u16::try_from(total_lines).unwrap_or(u16::MAX);
    total.saturating_sub(viewport_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrolling_up_stops_following_and_bottom_resumes() {
        let mut ui = UiState::new();
        ui.scroll_to_bottom(20);
        ui.scroll_up(5);
        assert_eq!(ui.scroll_offset, 15);
        assert!(!ui.auto_scroll);

        ui.scroll_down(3, 20);
        assert!(!ui.auto_scroll);
        ui.scroll_down(10, 20);
        assert_eq!(ui.scroll_offset, 20);
        assert!(ui.auto_scroll);
    }

    #[test]
    fn viewport_and_offset_math_saturates() {
        assert_eq!(transcript_viewport_height(24), 20);
        assert_eq!(transcript_viewport_height(2), 0);
        assert_eq!(max_scroll_offset(10, 20), 0);
        assert_eq!(max_scroll_offset(30, 20), 10);
    }

    #[test]
    fn input_editing_handles_multibyte_characters() {
        let mut ui = UiState::new();
        for ch in "مرحبا".chars() {
            ui.insert_char(ch);
        }
        ui.backspace();
        assert_eq!(ui.input, "مرحب");
        ui.clear_input();
        assert!(ui.input.is_empty());
    }
}
