use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use librarian_core::models::Role;

use crate::ui::{theme, App, InputMode};

pub fn render_chat(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).split(area);
    render_transcript(f, app, chunks[0]);
    render_input(f, app, chunks[1]);
}

fn render_transcript(f: &mut Frame, app: &mut App, area: Rect) {
    let width = area.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = Vec::new();

    for turn in app.transcript.turns() {
        let (label, color) = match turn.role {
            Role::User => ("you", theme::ROLE_USER),
            Role::Assistant => ("librarian", theme::ROLE_ASSISTANT),
        };
        let prefix = format!(" {label} › ");
        let indent = " ".repeat(prefix.width());
        let body_width = width.saturating_sub(prefix.width());

        for (i, piece) in wrap_text(&turn.content, body_width).into_iter().enumerate() {
            let lead = if i == 0 {
                Span::styled(
                    prefix.clone(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )
            } else {
                Span::raw(indent.clone())
            };
            lines.push(Line::from(vec![
                lead,
                Span::styled(piece, Style::default().fg(theme::TEXT_PRIMARY)),
            ]));
        }
        lines.push(Line::default());
    }

    // The reconciliation placeholder; removed when the turn settles
    if app.turn.is_busy() {
        lines.push(Line::from(Span::styled(
            " librarian is typing…",
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let viewport = area.height as usize;
    let max_scroll = lines.len().saturating_sub(viewport);
    app.max_scroll = max_scroll;
    let offset = app.scroll_offset.min(max_scroll);

    let visible: Vec<Line> = lines.into_iter().skip(offset).take(viewport).collect();
    f.render_widget(Paragraph::new(visible), area);
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;
    let title = if app.turn.is_busy() {
        "Message (sending…)"
    } else {
        "Message"
    };
    let border = if editing {
        theme::ACCENT_PRIMARY
    } else {
        theme::BORDER_INACTIVE
    };
    let cursor = if editing { "▏" } else { "" };

    let widget = Paragraph::new(format!("{}{cursor}", app.chat_input))
        .style(Style::default().fg(theme::TEXT_PRIMARY).bg(theme::BG_INPUT))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(border)),
        );
    f.render_widget(widget, area);
}

/// Greedy word wrap by display width. Words wider than the viewport are
/// hard-broken; explicit newlines are preserved.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return text.split('\n').map(str::to_string).collect();
    }
    let mut out = Vec::new();
    for raw in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0usize;
        for word in raw.split_whitespace() {
            let word_width: usize = word.chars().map(|c| c.width().unwrap_or(0)).sum();
            let sep = if line_width == 0 { 0 } else { 1 };
            if line_width + sep + word_width <= width {
                if sep == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_width += sep + word_width;
                continue;
            }
            if line_width > 0 {
                out.push(std::mem::take(&mut line));
                line_width = 0;
            }
            if word_width <= width {
                line.push_str(word);
                line_width = word_width;
            } else {
                for c in word.chars() {
                    let c_width = c.width().unwrap_or(0);
                    if line_width + c_width > width && line_width > 0 {
                        out.push(std::mem::take(&mut line));
                        line_width = 0;
                    }
                    line.push(c);
                    line_width += c_width;
                }
            }
        }
        out.push(line);
    }
    out
}
