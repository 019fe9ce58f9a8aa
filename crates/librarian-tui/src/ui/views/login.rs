use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    widgets::Paragraph,
    Frame,
};

use super::{form_column, render_field};
use crate::ui::{theme, App};

pub fn render_login(f: &mut Frame, app: &App, area: Rect) {
    let column = form_column(area, 60);
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .split(column);

    let instructions = Paragraph::new("Sign in to the librarian")
        .style(Style::default().fg(theme::TEXT_PRIMARY))
        .alignment(Alignment::Center);
    f.render_widget(instructions, chunks[0]);

    render_field(f, chunks[2], "Email", &app.login.email, app.login.focus == 0, false);
    render_field(
        f,
        chunks[3],
        "Password",
        &app.login.password,
        app.login.focus == 1,
        true,
    );

    let status = if app.login.busy {
        Paragraph::new("Signing in…").style(Style::default().fg(theme::TEXT_DIM))
    } else if let Some(error) = &app.login.error {
        Paragraph::new(error.as_str()).style(Style::default().fg(theme::ACCENT_ERROR))
    } else {
        Paragraph::new("")
    };
    f.render_widget(status.alignment(Alignment::Center), chunks[4]);
}
