//! Async preview loop for the terminal front end.

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind};
use futures::StreamExt;
use std::time::{Duration, Instant};

use crate::component::CameraCapture;
use crate::preview::PreviewView;
use crate::render;

/// How long the "captured" note stays in the status line.
const CAPTURE_FLASH: Duration = Duration::from_secs(2);

/// Drive the component from terminal events.
///
/// Handles two concurrent concerns via `tokio::select!`:
/// 1. Keyboard input and resize via the crossterm `EventStream`
/// 2. Preview rendering on a ~15 FPS interval
///
/// Keys: `1`-`9` switch to the nth listed device, space/enter captures,
/// `q`/Esc exits. Exits when the user quits or the event stream ends.
pub async fn run(
    component: &mut CameraCapture,
    mut on_capture: impl FnMut(&str),
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut stdout = std::io::stdout();
    let mut event_stream = EventStream::new();

    let mut render_interval = tokio::time::interval(Duration::from_millis(67));
    render_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let (mut term_cols, mut term_rows) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut last_capture: Option<Instant> = None;

    loop {
        let options = component.options().clone();
        let area = render::preview_area(options.width, options.height, term_cols, term_rows);

        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        match key_action(&key) {
                            Some(Action::Quit) => break,
                            Some(Action::Capture) => {
                                if let Some(url) = component.capture() {
                                    on_capture(&url);
                                    last_capture = Some(Instant::now());
                                }
                            }
                            Some(Action::Select(n)) => {
                                let id = component.devices().get(n).map(|d| d.id.clone());
                                if let Some(id) = id {
                                    component.select_device(&id);
                                }
                            }
                            None => {}
                        }
                    }
                    Some(Ok(Event::Resize(cols, rows))) => {
                        term_cols = cols;
                        term_rows = rows;
                        render::clear_area(
                            &mut stdout,
                            ratatui::layout::Rect { x: 0, y: 0, width: cols, height: rows },
                        )?;
                    }
                    Some(Ok(_)) => {
                        // Ignore other events (mouse, focus, etc.)
                    }
                    Some(Err(e)) => {
                        return Err(Box::new(e));
                    }
                    None => {
                        // Event stream ended - shouldn't happen normally
                        break;
                    }
                }
            }

            _ = render_interval.tick() => {
                match component.view() {
                    PreviewView::Live(frame) | PreviewView::Still(frame) => {
                        render::render_frame(&mut stdout, &frame, area)?;
                    }
                    PreviewView::Empty => {
                        let msg = if component.state().is_loading {
                            "Loading..."
                        } else {
                            "No video"
                        };
                        render::render_message(&mut stdout, msg, area)?;
                    }
                }

                if last_capture.is_some_and(|t| t.elapsed() > CAPTURE_FLASH) {
                    last_capture = None;
                }
                let status = status_line(component, last_capture.is_some());
                render::render_status(&mut stdout, &status, area.height, term_cols)?;
            }
        }
    }

    Ok(())
}

enum Action {
    Quit,
    Capture,
    Select(usize),
}

fn key_action(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(' ') | KeyCode::Enter => Some(Action::Capture),
        KeyCode::Char(c @ '1'..='9') => Some(Action::Select(c as usize - '1' as usize)),
        _ => None,
    }
}

/// One line of selector contents, error text, and key hints.
fn status_line(component: &CameraCapture, just_captured: bool) -> String {
    let state = component.state();

    if let Some(error) = &state.error_message {
        return format!("{}  |  q quit", error);
    }

    let mut parts: Vec<String> = Vec::new();
    for (i, device) in component.devices().iter().enumerate() {
        let marker = if state.selected_device_id.as_deref() == Some(device.id.as_str()) {
            "*"
        } else {
            " "
        };
        parts.push(format!("{}{} {}", i + 1, marker, device.display_label()));
    }
    let selector = if parts.is_empty() {
        "no cameras".to_string()
    } else {
        parts.join("  ")
    };

    let capture_hint = if just_captured {
        "captured!"
    } else if state.capture_enabled {
        "SPACE capture"
    } else {
        "capture disabled"
    };

    format!("{}  |  {}  |  q quit", selector, capture_hint)
}
