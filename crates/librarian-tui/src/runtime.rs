use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::input::handle_key;
use crate::render::render;
use crate::ui::{App, AppEvent, Tui, View};

/// The single cooperative loop: draw a frame, then wait on whichever happens
/// first — a terminal event, a settled network task, or the tick.
pub(crate) async fn run_app(
    terminal: &mut Tui,
    app: &mut App,
    mut events_rx: UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let mut event_stream = EventStream::new();
    let mut tick_interval = tokio::time::interval(Duration::from_millis(100));

    while app.running {
        terminal.draw(|f| render(f, app))?;

        tokio::select! {
            maybe_event = event_stream.next() => {
                if let Some(Ok(event)) = maybe_event {
                    match event {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            if key.code == KeyCode::Char('c')
                                && key.modifiers.contains(KeyModifiers::CONTROL)
                            {
                                if app.pending_quit {
                                    app.quit();
                                } else {
                                    // First Ctrl+C arms the quit; the footer warns
                                    app.pending_quit = true;
                                }
                            } else {
                                app.pending_quit = false;
                                handle_key(app, key)?;
                            }
                        }
                        Event::Mouse(mouse) => {
                            if app.view == View::Chat {
                                match mouse.kind {
                                    MouseEventKind::ScrollUp => app.scroll_up(3),
                                    MouseEventKind::ScrollDown => app.scroll_down(3),
                                    _ => {}
                                }
                            }
                        }
                        Event::Paste(text) => app.paste(&text),
                        _ => {}
                    }
                }
            }

            // Outcomes of spawned network tasks (identity, login, register, chat)
            Some(event) = events_rx.recv() => {
                app.on_event(event);
            }

            _ = tick_interval.tick() => {
                app.tick();
            }
        }
    }

    Ok(())
}
