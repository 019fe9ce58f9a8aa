use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    widgets::Paragraph,
    Frame,
};

use super::{form_column, render_field};
use crate::ui::{theme, App};

pub fn render_register(f: &mut Frame, app: &App, area: Rect) {
    let column = form_column(area, 60);
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .split(column);

    let instructions = Paragraph::new("Create an account")
        .style(Style::default().fg(theme::TEXT_PRIMARY))
        .alignment(Alignment::Center);
    f.render_widget(instructions, chunks[0]);

    let form = &app.register;
    render_field(f, chunks[2], "Email", &form.email, form.focus == 0, false);
    render_field(f, chunks[3], "Name (optional)", &form.name, form.focus == 1, false);
    render_field(f, chunks[4], "Password", &form.password, form.focus == 2, true);
    render_field(f, chunks[5], "Role (optional)", &form.role, form.focus == 3, false);

    let status = if form.busy {
        Paragraph::new("Creating account…").style(Style::default().fg(theme::TEXT_DIM))
    } else if let Some(error) = &form.error {
        Paragraph::new(error.as_str()).style(Style::default().fg(theme::ACCENT_ERROR))
    } else {
        Paragraph::new("")
    };
    f.render_widget(status.alignment(Alignment::Center), chunks[6]);
}
