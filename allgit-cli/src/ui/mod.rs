//! Interactive dashboard
//!
//! One loop owns the terminal and the coordinator. It waits on terminal
//! input and on row updates from background probes, handling one event at a
//! time, then redraws.

mod keys;
mod render;

use std::io::{self, Stdout};

use allgit_core::RefreshCoordinator;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, widgets::TableState, Terminal};
use tracing::info;

use keys::{Action, Pane};

type DashboardTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Dashboard state that is not owned by the coordinator
pub struct App {
    coordinator: RefreshCoordinator,
    focus: Pane,
    /// Scroll offsets for the detail panes, indexed like `Pane::DETAIL`
    scroll: [u16; 4],
    table_state: TableState,
}

impl App {
    fn new(coordinator: RefreshCoordinator) -> Self {
        Self {
            coordinator,
            focus: Pane::Table,
            scroll: [0; 4],
            table_state: TableState::default(),
        }
    }

    /// Apply one action; returns true when the dashboard should exit
    fn handle(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::Focus(pane) => self.focus = pane,
            Action::Up | Action::Down => self.navigate(action == Action::Down),
            Action::Refresh => {
                self.coordinator.refresh_selected();
            }
            Action::RefreshAll => {
                self.coordinator.refresh_all();
            }
            Action::Pull => {
                self.coordinator.pull_selected();
            }
            Action::Push => {
                self.coordinator.push_selected();
            }
            Action::ClearErrors => {
                self.coordinator.clear_errors();
                self.scroll = [0; 4];
            }
        }
        false
    }

    fn navigate(&mut self, down: bool) {
        match Pane::DETAIL.iter().position(|p| *p == self.focus) {
            Some(i) => {
                self.scroll[i] = if down {
                    self.scroll[i].saturating_add(1)
                } else {
                    self.scroll[i].saturating_sub(1)
                };
            }
            None => {
                let before = self.coordinator.selected_index();
                if down {
                    self.coordinator.select_next();
                } else {
                    self.coordinator.select_previous();
                }
                if self.coordinator.selected_index() != before {
                    self.scroll = [0; 4];
                }
            }
        }
    }
}

/// Run the dashboard until the operator quits
pub async fn run(mut coordinator: RefreshCoordinator) -> anyhow::Result<()> {
    coordinator.start();

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, App::new(coordinator)).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn event_loop(terminal: &mut DashboardTerminal, mut app: App) -> anyhow::Result<()> {
    let mut events = EventStream::new();

    loop {
        terminal.draw(|frame| render::draw(frame, &mut app))?;

        tokio::select! {
            Some(update) = app.coordinator.next_update() => {
                app.coordinator.apply(update);
            }
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(action) = keys::action_for(key) {
                        if app.handle(action) {
                            info!("Quit requested");
                            break;
                        }
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
        }
    }

    Ok(())
}

fn setup_terminal() -> anyhow::Result<DashboardTerminal> {
    install_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

/// Leave raw mode and the alternate screen before a panic message prints
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
        default_hook(info);
    }));
}

fn restore_terminal(terminal: &mut DashboardTerminal) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
