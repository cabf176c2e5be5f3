//! Runtime: unified event loop and input routing for the TUI.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode, mouse capture).
//! - Drive a single event loop that handles input and timer deadlines.
//! - Route input to the main view and execute returned `Effect`s.
//! - Render only when `App` marks itself dirty.
//!
//! Event Loop Strategy
//! - A dedicated input task reads `crossterm` events and forwards them over a
//!   channel. Pointer moves are throttled to one per frame.
//! - Smart ticking: a fast interval only while a timer is pending (hover
//!   intent, search debounce, reveal, boundary auto-retry); a long interval
//!   when idle.
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::MouseEventKind;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use meganav_types::{CloseReason, Effect, Modal, Msg};
use ratatui::{Terminal, prelude::*};
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{info, warn};

use crate::app::App;
use crate::cmd;
use crate::ui::components::component::Component;
use crate::ui::main_component::MainView;

const FRAME: Duration = Duration::from_millis(16);
const IDLE_TICK: Duration = Duration::from_millis(5000);

/// Spawn a dedicated input task that polls terminal input and forwards
/// `crossterm` events over a Tokio channel.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    let mut last_mouse_move = Instant::now();

    tokio::task::spawn_blocking(move || {
        loop {
            match event::poll(FRAME) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(error) => {
                    warn!(%error, "Failed to poll terminal events");
                    break;
                }
            }
            match event::read() {
                Ok(event) => {
                    // Throttle mouse moves to once per frame.
                    let is_mouse_move = event.as_mouse_event().is_some_and(|e| e.kind == MouseEventKind::Moved);
                    if is_mouse_move {
                        if last_mouse_move.elapsed() < FRAME {
                            continue;
                        }
                        last_mouse_move = Instant::now();
                    }
                    if sender.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    warn!(%error, "Failed to read terminal event");
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    terminal.draw(|frame| {
        let area = frame.area();
        main_view.render(frame, area, app);
    })?;
    Ok(())
}

fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Resize(width, height) => main_view.handle_message(app, &Msg::Resize(width, height)),
        Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

fn is_ctrl_c(event: &Event) -> bool {
    matches!(event, Event::Key(key) if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Sets up the terminal, runs the event loop until quit, then tears every
/// timer and listener down before restoring the terminal.
pub async fn run_app(mut app: App) -> Result<()> {
    let mut input_receiver = spawn_input_thread();
    let mut main_view = MainView::new();
    let mut terminal = setup_terminal()?;

    let mut current_interval = IDLE_TICK;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(&mut terminal, &mut app, &mut main_view)?;
    app.take_dirty();

    // Track the last known terminal size to synthesize Resize messages when
    // some terminals fail to emit them reliably.
    let mut last_size: Option<(u16, u16)> = crossterm::terminal::size().ok();

    loop {
        let target_interval = if app.next_deadline().is_some() { FRAME } else { IDLE_TICK };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        let mut effects = Vec::new();
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                match maybe_event {
                    Some(event) if is_ctrl_c(&event) => break,
                    Some(event) => effects.extend(handle_input_event(&mut app, &mut main_view, event)),
                    // Input channel closed; shut down cleanly.
                    None => break,
                }
            }
            _ = ticker.tick() => {
                effects.extend(main_view.handle_message(&mut app, &Msg::Tick));
            }
            _ = signal::ctrl_c() => break,
        }

        if !effects.is_empty() {
            handle_navigation_effects(&mut app, &mut main_view, &mut effects);
            if cmd::run_from_effects(&mut app, effects).quit {
                break;
            }
            app.sync_surfaces(Instant::now());
        }

        // Fallback: detect terminal size changes even if no explicit Resize
        // event was received.
        if let Ok((w, h)) = crossterm::terminal::size()
            && last_size != Some((w, h))
        {
            last_size = Some((w, h));
            main_view.handle_message(&mut app, &Msg::Resize(w, h));
        }

        if app.take_dirty() {
            render(&mut terminal, &mut app, &mut main_view)?;
        }
    }

    info!("Shutting down navigation");
    app.teardown();
    cleanup_terminal(&mut terminal)?;
    Ok(())
}

/// Applies modal effects to the main view, leaving the rest for the
/// command layer.
fn handle_navigation_effects(app: &mut App, main_view: &mut MainView, effects: &mut Vec<Effect>) {
    let navigation_effects = effects
        .extract_if(.., |effect| matches!(effect, Effect::ShowModal(_) | Effect::CloseModal))
        .collect::<Vec<Effect>>();

    for effect in navigation_effects {
        match effect {
            Effect::ShowModal(modal) => {
                if app.open_modal == Some(Modal::Search) && modal != Modal::Search {
                    app.close_search_view(CloseReason::Superseded);
                }
                main_view.set_open_modal(app, Some(modal));
            }
            Effect::CloseModal => {
                if app.open_modal == Some(Modal::Search) {
                    app.close_search_view(CloseReason::Explicit);
                }
                main_view.set_open_modal(app, None);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::sample_app;

    #[test]
    fn modal_effects_are_consumed_and_others_kept() {
        let mut app = sample_app(120);
        let mut main_view = MainView::new();
        let mut effects = vec![Effect::ShowModal(Modal::Search), Effect::GoHome];
        handle_navigation_effects(&mut app, &mut main_view, &mut effects);
        assert_eq!(effects, vec![Effect::GoHome]);
        assert_eq!(app.open_modal, Some(Modal::Search));
        assert!(main_view.modal_view.is_some());

        let mut effects = vec![Effect::CloseModal];
        handle_navigation_effects(&mut app, &mut main_view, &mut effects);
        assert!(effects.is_empty());
        assert_eq!(app.open_modal, None);
        assert!(main_view.modal_view.is_none());
    }
}
