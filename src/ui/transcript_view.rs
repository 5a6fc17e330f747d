//! Flattens the transcript into pre-wrapped display lines.
//!
//! The output depends only on the transcript, the locale and the width, so
//! rendering the same transcript twice yields the same lines.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::locale::Locale;
use crate::core::transcript::{ChatTurn, Role, Transcript, TurnStatus};
use crate::utils::wrap::wrap_text;

pub fn build_transcript_lines(
    transcript: &Transcript,
    locale: Locale,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for turn in transcript.iter() {
        push_turn_lines(&mut lines, turn, locale, width);
    }
    lines
}

fn push_turn_lines(lines: &mut Vec<Line<'static>>, turn: &ChatTurn, locale: Locale, width: usize) {
    let (label, label_style) = match (turn.role, turn.status) {
        (_, TurnStatus::Notice) => (
            locale.model_label(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        (Role::User, _) => (
            locale.user_label(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        (Role::Model, _) => (
            locale.model_label(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    };

    lines.push(Line::from(vec![
        Span::styled(label.to_string(), label_style),
        Span::styled(
            format!("  {}", turn.created_at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ),
    ]));

    if turn.is_streaming() && turn.text.is_empty() {
        lines.push(Line::from(Span::styled(
            locale.processing_label().to_string(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    } else {
        let body_style = match turn.status {
            TurnStatus::Notice => Style::default().fg(Color::Red),
            _ => Style::default(),
        };
        for text in wrap_text(&turn.text, width) {
            lines.push(Line::from(Span::styled(text, body_style)));
        }
    }

    lines.push(Line::from(""));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transcript::ChatTurn;

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn sample() -> Transcript {
        let mut transcript = Transcript::new();
        transcript.push(ChatTurn::user("hello there"));
        let reply = transcript.push(ChatTurn::pending_reply());
        transcript.append_fragment(reply, "general kenobi");
        transcript.settle(reply, TurnStatus::Complete);
        transcript
    }

    #[test]
    fn rendering_is_idempotent() {
        let transcript = sample();
        let first = build_transcript_lines(&transcript, Locale::En, 40);
        let second = build_transcript_lines(&transcript, Locale::En, 40);
        assert_eq!(first, second);
    }

    #[test]
    fn each_turn_has_header_body_and_spacer() {
        let transcript = sample();
        let text = plain(&build_transcript_lines(&transcript, Locale::En, 40));
        assert_eq!(text.len(), 6);
        assert!(text[0].starts_with("You  "));
        assert_eq!(text[1], "hello there");
        assert_eq!(text[2], "");
        assert!(text[3].starts_with("ShadowCoder  "));
        assert_eq!(text[4], "general kenobi");
    }

    #[test]
    fn empty_streaming_reply_shows_processing_label() {
        let mut transcript = Transcript::new();
        transcript.push(ChatTurn::user("q"));
        transcript.push(ChatTurn::pending_reply());

        let text = plain(&build_transcript_lines(&transcript, Locale::Ar, 40));
        assert_eq!(text[4], Locale::Ar.processing_label());
    }

    #[test]
    fn long_replies_wrap_to_width() {
        let mut transcript = Transcript::new();
        let reply = transcript.push(ChatTurn::pending_reply());
        transcript.append_fragment(reply, "alpha beta gamma delta");

        let text = plain(&build_transcript_lines(&transcript, Locale::En, 11));
        assert_eq!(&text[1..3], ["alpha beta", "gamma delta"]);
    }

    #[test]
    fn notices_are_styled_as_errors() {
        let mut transcript = Transcript::new();
        transcript.push(ChatTurn::notice(Locale::En.connection_error_message()));
        let lines = build_transcript_lines(&transcript, Locale::En, 200);
        assert_eq!(lines[1].spans[0].style.fg, Some(Color::Red));
    }
}
