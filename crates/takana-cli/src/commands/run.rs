use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use tracing::{info, warn};

use takana_core::{nav::NavLink, AppConfig, Viewport};
use takana_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::{handle_key_event, Action},
    keymap::Keymap,
    load_theme,
    widgets::{NavBarWidget, PageWidget, RangeOverlayWidget, StatusBarWidget},
};

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    // Create keymap from config
    let keymap = Keymap::from_config(&config.keymap);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("Takana Juo"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, config, &keymap).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// The page area leaves the bottom row to the status bar
fn page_viewport(width: u16, height: u16) -> Viewport {
    Viewport::new(width as f64, height.saturating_sub(1) as f64)
}

async fn event_loop<B: Backend>(terminal: &mut Terminal<B>, config: Arc<AppConfig>, keymap: &Keymap) -> Result<()> {
    let size = terminal.size()?;
    let theme = load_theme(&config.ui.colors);
    let mut app = App::new(
        config.clone(),
        theme,
        page_viewport(size.width, size.height),
        Instant::now(),
    )?;

    // Terminal input arrives over a channel; the wait timeout is the frame clock
    let mut events = EventHandler::new(config.ui.tick_rate(), config.ui.frame_duration());

    loop {
        // Advance timelines, snap transitions and gesture detection
        let needs_fast_update = app.tick(Instant::now());

        terminal.draw(|frame| draw(frame, &app))?;

        // Use the faster frame rate while anything is moving
        let event = if needs_fast_update {
            events.next_animation().await?
        } else {
            events.next().await?
        };
        match event {
            AppEvent::Key(key) => {
                let action = handle_key_event(key, &app, keymap);
                handle_action(&mut app, action, Instant::now());
            }
            AppEvent::Wheel(notches) => {
                app.scroll_lines(notches as i32, Instant::now());
            }
            AppEvent::Resize(width, height) => {
                app.resize(width, height.saturating_sub(1));
            }
            AppEvent::Tick => {}
        }

        if app.should_quit {
            break;
        }
    }

    app.shutdown();
    info!("preview closed");
    Ok(())
}

fn draw(frame: &mut Frame, app: &App) {
    // Main layout: page + status bar
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());
    let page = main_layout[0];

    PageWidget::render(frame, page, app);
    NavBarWidget::render(frame, Rect { height: page.height.min(1), ..page }, app);
    if app.show_overlay {
        RangeOverlayWidget::render(frame, page, app);
    }
    StatusBarWidget::render(frame, main_layout[1], app);
}

fn handle_action(app: &mut App, action: Action, now: Instant) {
    if !matches!(action, Action::Pending(_)) {
        app.clear_pending_key();
    }
    if action.is_gesture() {
        app.clear_status();
    }

    match action {
        Action::Quit => {
            app.should_quit = true;
        }
        Action::ScrollDown => app.scroll_lines(1, now),
        Action::ScrollUp => app.scroll_lines(-1, now),
        Action::ScrollHalfPageDown => app.scroll_half_page_down(now),
        Action::ScrollHalfPageUp => app.scroll_half_page_up(now),
        Action::ScrollPageDown => app.scroll_page_down(now),
        Action::ScrollPageUp => app.scroll_page_up(now),
        Action::JumpToTop => app.jump_to_top(now),
        Action::JumpToBottom => app.jump_to_bottom(now),
        Action::Pending(c) => {
            app.pending_key = Some(c);
        }
        Action::GotoMenu => goto(app, NavLink::Menu, now),
        Action::GotoReviews => goto(app, NavLink::Reviews, now),
        Action::GotoOrder => goto(app, NavLink::Order, now),
        Action::NextLink => app.next_link(),
        Action::PrevLink => app.prev_link(),
        Action::OpenLink => {
            if let Some(link) = app.focused_link().copied() {
                if let Err(e) = open::that(link.url) {
                    warn!("Failed to open {}: {}", link.url, e);
                    app.set_status(format!("Failed to open link: {}", e));
                } else {
                    app.set_status(format!("Opened {}", link.label));
                }
            } else {
                app.set_status("No link focused (Tab to select one)");
            }
        }
        Action::ToggleSnap => app.toggle_snap(),
        Action::ToggleOverlay => app.toggle_overlay(),
        Action::ExitMode => app.exit_mode(),
        Action::None => {}
    }
}

fn goto(app: &mut App, link: NavLink, now: Instant) {
    if let Err(e) = app.goto(link, now) {
        app.set_status(format!("Cannot scroll to {}: {}", link.label(), e));
    }
}
