pub mod chat;
pub mod login;
pub mod register;

pub use chat::render_chat;
pub use login::render_login;
pub use register::render_register;

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::theme;

/// A labelled single-line form field with a focus border.
pub(crate) fn render_field(
    f: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    focused: bool,
    mask: bool,
) {
    let display = if mask {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let cursor = if focused { "▏" } else { "" };
    let border = if focused {
        theme::ACCENT_PRIMARY
    } else {
        theme::BORDER_INACTIVE
    };
    let widget = Paragraph::new(format!("{display}{cursor}"))
        .style(Style::default().fg(theme::TEXT_PRIMARY).bg(theme::BG_INPUT))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(label.to_string())
                .border_style(Style::default().fg(border)),
        );
    f.render_widget(widget, area);
}

/// A horizontally centered column for the auth forms.
pub(crate) fn form_column(area: Rect, max_width: u16) -> Rect {
    let width = area.width.min(max_width);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    Rect::new(x, area.y + 1, width, area.height.saturating_sub(1))
}
