//! Core TUI application state and event loop.
//!
//! Pipelines run on spawned tasks; a [`ChannelUi`] forwards every
//! controller UI call as a [`UiEvent`], and the event loop drains the
//! channel each tick and applies the events to screen state. Trigger
//! state carried by those events is what gates re-entrancy: a screen
//! whose trigger is disabled never emits a start intent.

use std::io;
use std::time::Duration;

use color_eyre::eyre::{Result, eyre};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use tokio::sync::mpsc;
use url::Url;

use ragdesk_client::{ApiClient, ClientOptions};
use ragdesk_core::{Trigger, TriggerState, UiPort, run_ask, run_crawl_and_index};
use ragdesk_shared::{AskParams, IngestParams, Source, load_config};

use crate::screens::{AskScreen, IngestScreen, ScreenAction, ScreenId};
use crate::widgets::status_bar;

// ---------------------------------------------------------------------------
// Channel-backed UI port
// ---------------------------------------------------------------------------

/// One controller UI call, carried from a pipeline task to the event loop.
#[derive(Debug)]
pub(crate) enum UiEvent {
    Alert(String),
    Status(String),
    StatusAppend(String),
    Trigger(Trigger, TriggerState),
    Answer(String),
    ClearSources,
    Sources(Vec<Source>),
}

/// `UiPort` implementation handed to spawned pipeline tasks.
#[derive(Clone)]
pub(crate) struct ChannelUi {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl UiPort for ChannelUi {
    fn alert(&self, message: &str) {
        let _ = self.tx.send(UiEvent::Alert(message.to_string()));
    }

    fn set_status(&self, message: &str) {
        let _ = self.tx.send(UiEvent::Status(message.to_string()));
    }

    fn append_status(&self, message: &str) {
        let _ = self.tx.send(UiEvent::StatusAppend(message.to_string()));
    }

    fn set_trigger(&self, trigger: Trigger, state: TriggerState) {
        let _ = self.tx.send(UiEvent::Trigger(trigger, state));
    }

    fn show_answer(&self, text: &str) {
        let _ = self.tx.send(UiEvent::Answer(text.to_string()));
    }

    fn clear_sources(&self) {
        let _ = self.tx.send(UiEvent::ClearSources);
    }

    fn render_sources(&self, sources: &[Source]) {
        let _ = self.tx.send(UiEvent::Sources(sources.to_vec()));
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Application state.
pub(crate) struct App {
    /// Currently active screen tab.
    active_tab: usize,
    /// Available screens.
    tabs: Vec<ScreenId>,
    /// Whether the app should quit.
    should_quit: bool,
    /// Message shown in the bottom bar (also where alerts land).
    status: String,
    /// Whether help overlay is visible.
    show_help: bool,
    ingest: IngestScreen,
    ask: AskScreen,
    client: ApiClient,
    ingest_params: IngestParams,
    ask_params: AskParams,
    ui: ChannelUi,
    events_rx: mpsc::UnboundedReceiver<UiEvent>,
}

impl App {
    pub(crate) fn new(
        client: ApiClient,
        ingest_params: IngestParams,
        ask_params: AskParams,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            active_tab: 0,
            tabs: vec![ScreenId::Ingest, ScreenId::Ask],
            should_quit: false,
            status: format!("Connected to {}", client.base_url()),
            show_help: false,
            ingest: IngestScreen::new(),
            ask: AskScreen::new(),
            client,
            ingest_params,
            ask_params,
            ui: ChannelUi { tx },
            events_rx: rx,
        }
    }

    fn active_screen(&self) -> ScreenId {
        self.tabs[self.active_tab]
    }

    fn is_editing(&self) -> bool {
        match self.active_screen() {
            ScreenId::Ingest => self.ingest.is_editing(),
            ScreenId::Ask => self.ask.is_editing(),
        }
    }

    /// Apply one pipeline UI event to screen state.
    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Alert(message) => {
                self.status = message;
            }
            UiEvent::Status(message) => {
                self.ingest.set_status(&message);
            }
            UiEvent::StatusAppend(message) => {
                self.ingest.append_status(&message);
            }
            UiEvent::Trigger(Trigger::Crawl, state) => {
                self.ingest.set_crawl_trigger(state);
            }
            UiEvent::Trigger(Trigger::Ask, state) => {
                self.ask.set_trigger(state);
            }
            UiEvent::Answer(text) => {
                self.ask.show_answer(&text);
            }
            UiEvent::ClearSources => {
                self.ask.clear_sources();
            }
            UiEvent::Sources(sources) => {
                self.ask.set_sources(sources);
            }
        }
    }

    fn dispatch(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::StartIngest(url) => {
                let client = self.client.clone();
                let ui = self.ui.clone();
                let params = self.ingest_params.clone();
                tokio::spawn(async move {
                    run_crawl_and_index(&client, &ui, &url, &params).await;
                });
            }
            ScreenAction::StartAsk(question) => {
                let client = self.client.clone();
                let ui = self.ui.clone();
                let params = self.ask_params.clone();
                tokio::spawn(async move {
                    run_ask(&client, &ui, &question, &params).await;
                });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point and event loop
// ---------------------------------------------------------------------------

/// Entry point — loads config, sets up terminal, runs event loop, restores
/// terminal.
pub(crate) fn run() -> Result<()> {
    let config = load_config()?;
    let base_url = Url::parse(&config.server.base_url)
        .map_err(|e| eyre!("invalid service base URL '{}': {e}", config.server.base_url))?;
    let options = ClientOptions {
        timeout: config.server.timeout_secs.map(Duration::from_secs),
    };
    let client = ApiClient::new(base_url, &options)?;

    let app = App::new(
        client,
        IngestParams::from(&config),
        AskParams::from(&config),
    );

    // Setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        // Apply anything the pipeline tasks reported since the last tick.
        while let Ok(event) = app.events_rx.try_recv() {
            app.apply_event(event);
        }

        terminal.draw(|f| draw(f, &app))?;

        // Poll for events with 100ms timeout for responsive UI
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                handle_key(&mut app, key.code, key.modifiers);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    // Global keybindings (always active)
    match code {
        KeyCode::Char('q') | KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('q') if !app.is_editing() => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('?') if !app.is_editing() => {
            app.show_help = !app.show_help;
            return;
        }
        KeyCode::Esc if app.show_help => {
            app.show_help = false;
            return;
        }
        // Tab navigation with number keys
        KeyCode::Char(c @ '1'..='2') if !app.is_editing() => {
            let idx = (c as usize) - ('1' as usize);
            if idx < app.tabs.len() {
                app.active_tab = idx;
            }
            return;
        }
        KeyCode::Tab if !app.is_editing() => {
            app.active_tab = (app.active_tab + 1) % app.tabs.len();
            return;
        }
        KeyCode::BackTab if !app.is_editing() => {
            app.active_tab = if app.active_tab == 0 {
                app.tabs.len() - 1
            } else {
                app.active_tab - 1
            };
            return;
        }
        _ => {}
    }

    // If help is showing, consume any key to dismiss
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Delegate to current screen
    let action = match app.active_screen() {
        ScreenId::Ingest => app.ingest.handle_key(code, modifiers),
        ScreenId::Ask => app.ask.handle_key(code, modifiers),
    };

    if let Some(action) = action {
        app.dispatch(action);
    }
}

fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    // Tab bar
    let tab_titles: Vec<Line> = app.tabs.iter().map(|s| Line::from(format!("{s}"))).collect();

    let tabs = Tabs::new(tab_titles)
        .block(Block::default().borders(Borders::ALL).title(" ragdesk "))
        .select(app.active_tab)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" │ ");

    f.render_widget(tabs, chunks[0]);

    // Content area — delegate to screen
    match app.active_screen() {
        ScreenId::Ingest => app.ingest.draw(f, chunks[1]),
        ScreenId::Ask => app.ask.draw(f, chunks[1]),
    }

    // Status bar
    let bar = status_bar(&app.status);
    f.render_widget(bar, chunks[2]);

    // Help overlay
    if app.show_help {
        draw_help_overlay(f);
    }
}

fn draw_help_overlay(f: &mut Frame) {
    let area = centered_rect(60, 60, f.area());

    let help_text = vec![
        Line::from("Keybindings").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("  1-2          Switch to screen"),
        Line::from("  Tab/S-Tab    Next/previous screen"),
        Line::from("  ?            Toggle this help"),
        Line::from("  q / Ctrl-C   Quit"),
        Line::from(""),
        Line::from("Screen-specific:").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from("  Enter        Edit field / activate button"),
        Line::from("  Esc          Stop editing"),
        Line::from("  ↑/↓          Move between rows"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help — press any key to close ")
                .style(Style::default().bg(Color::DarkGray)),
        )
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));

    // Clear background
    f.render_widget(ratatui::widgets::Clear, area);
    f.render_widget(help, area);
}

/// Create a centered rectangle with percentage width and height.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
