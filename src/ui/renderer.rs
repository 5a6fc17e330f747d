use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::app::ui_state::{max_scroll_offset, INPUT_AREA_HEIGHT, TITLE_HEIGHT};
use crate::core::app::App;

pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(INPUT_AREA_HEIGHT)])
        .split(f.area());

    // Lines are pre-wrapped so scroll math matches the rendered output
    let lines = app.transcript_lines(chunks[0].width);
    let available_height = chunks[0].height.saturating_sub(TITLE_HEIGHT);
    let max_offset = max_scroll_offset(lines.len(), available_height);
    let scroll_offset = if app.ui.auto_scroll {
        max_offset
    } else {
        app.ui.scroll_offset.min(max_offset)
    };

    let title = format!("ShadowCoder v{} • {}", env!("CARGO_PKG_VERSION"), app.model);
    let messages_paragraph = Paragraph::new(lines)
        .block(Block::default().title(title))
        .scroll((scroll_offset, 0));
    f.render_widget(messages_paragraph, chunks[0]);

    let input_title = if app.is_busy() {
        "Waiting for reply (↑/↓ to scroll, Ctrl+C to quit)"
    } else {
        "Type your message (Enter to send, ↑/↓ to scroll, Ctrl+C to quit)"
    };

    let inner_width = chunks[1].width.saturating_sub(2) as usize;
    let reserved = if app.is_busy() { 3 } else { 1 };
    let visible_input = visible_tail(&app.ui.input, inner_width.saturating_sub(reserved));

    let input_text = if app.is_busy() {
        let symbol = pulse_symbol(app.ui.pulse_start.elapsed().as_millis());
        let padding = inner_width
            .saturating_sub(visible_input.width())
            .saturating_sub(2);
        format!("{visible_input}{}{symbol}", " ".repeat(padding))
    } else {
        visible_input.to_string()
    };

    let input = Paragraph::new(input_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Reset))
            .title(input_title),
    );
    f.render_widget(input, chunks[1]);

    let cursor_x = u16::try_from(visible_input.width()).unwrap_or(u16::MAX);
    f.set_cursor_position((
        chunks[1].x + 1 + cursor_x.min(chunks[1].width.saturating_sub(2)),
        chunks[1].y + 1,
    ));
}

/// Longest suffix of `text` that fits in `width` cells.
fn visible_tail(text: &str, width: usize) -> &str {
    let mut used = 0usize;
    let mut start = text.len();
    for (idx, ch) in text.char_indices().rev() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > width {
            break;
        }
        used += ch_width;
        start = idx;
    }
    &text[start..]
}

/// Streaming indicator cycling empty, half and full twice a second.
fn pulse_symbol(elapsed_ms: u128) -> char {
    let pulse_phase = (elapsed_ms % 1000) as f32 / 500.0;
    let pulse_intensity = if pulse_phase < 1.0 {
        pulse_phase
    } else {
        2.0 - pulse_phase
    };

    if pulse_intensity < 0.33 {
        '○'
    } else if pulse_intensity < 0.66 {
        '◐'
    } else {
        '●'
    }
}
