use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Paragraph},
    Frame,
};

use librarian_core::session::Gate;

use crate::ui::views::{render_chat, render_login, render_register};
use crate::ui::{theme, App, InputMode, NoticeLevel, View};

pub(crate) fn render(f: &mut Frame, app: &mut App) {
    let bg = Block::default().style(Style::default().bg(theme::BG_APP));
    f.render_widget(bg, f.area());

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(f.area());

    render_header(f, app, chunks[0]);

    match app.view {
        View::Login => render_login(f, app, chunks[1]),
        View::Register => render_register(f, app, chunks[1]),
        // Admission is re-derived from session state on every frame
        View::Chat => match Gate::evaluate(&app.session) {
            Gate::Admitted => render_chat(f, app, chunks[1]),
            Gate::Pending => render_waiting(f, chunks[1]),
            Gate::Denied => render_login(f, app, chunks[1]),
        },
    }

    render_footer(f, app, chunks[2]);
    render_status(f, app, chunks[3]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.view {
        View::Login => "Librarian — Sign in".to_string(),
        View::Register => "Librarian — Create account".to_string(),
        View::Chat => match app.session.user() {
            Some(user) => format!("Librarian — Chat ({})", user.email),
            None => "Librarian — Chat".to_string(),
        },
    };
    let header = Paragraph::new(format!(" {title}")).style(
        Style::default()
            .fg(theme::ACCENT_PRIMARY)
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(header, area);
}

fn render_waiting(f: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }
    let waiting = Paragraph::new("Checking session…")
        .style(Style::default().fg(theme::TEXT_MUTED))
        .alignment(Alignment::Center);
    let centered = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
    f.render_widget(waiting, centered);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if app.pending_quit {
        (
            "⚠ Press Ctrl+C again to quit".to_string(),
            Style::default().fg(theme::ACCENT_ERROR),
        )
    } else {
        let hints = match (app.view, app.input_mode) {
            (View::Login, _) => "Enter sign in · Tab next field · Ctrl+R create account",
            (View::Register, _) => "Enter create account · Tab next field · Esc back to sign-in",
            (View::Chat, InputMode::Editing) => {
                "Enter send · /filter key=value · Esc browse · Ctrl+L log out"
            }
            (View::Chat, InputMode::Normal) => {
                "i compose · j/k scroll · G bottom · Ctrl+L log out · q quit"
            }
        };
        (hints.to_string(), Style::default().fg(theme::TEXT_MUTED))
    };
    f.render_widget(Paragraph::new(format!(" {text}")).style(style), area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    if let Some(notice) = app.current_notice() {
        let color = match notice.level {
            NoticeLevel::Info => theme::ACCENT_PRIMARY,
            NoticeLevel::Success => theme::ACCENT_SUCCESS,
            NoticeLevel::Warning => theme::ACCENT_WARNING,
            NoticeLevel::Error => theme::ACCENT_ERROR,
        };
        let status = Paragraph::new(format!(" {} {}", notice.level.icon(), notice.message))
            .style(Style::default().fg(color));
        f.render_widget(status, area);
        return;
    }

    if app.view == View::Chat {
        let mut parts = Vec::new();
        if let Some(filter) = &app.where_filter {
            let terms: Vec<String> = filter
                .iter()
                .map(|(k, v)| match v {
                    serde_json::Value::String(s) => format!("{k}={s}"),
                    other => format!("{k}={other}"),
                })
                .collect();
            parts.push(format!("filter: {}", terms.join(" ")));
        }
        if let Some(title) = &app.last_title {
            parts.push(format!("recommended: {title}"));
        }
        if !parts.is_empty() {
            let status = Paragraph::new(format!(" {}", parts.join(" · ")))
                .style(Style::default().fg(theme::TEXT_DIM));
            f.render_widget(status, area);
        }
    }
}
