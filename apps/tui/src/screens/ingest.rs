//! "Ingest" screen — URL input, crawl trigger, and pipeline status.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use ragdesk_core::{TriggerState, labels};

use super::ScreenAction;

/// Which row is focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Url,
    Button,
}

pub(crate) struct IngestScreen {
    url: String,
    focused: Field,
    editing: bool,
    status: String,
    crawl_trigger: TriggerState,
}

impl IngestScreen {
    pub(crate) fn new() -> Self {
        Self {
            url: String::new(),
            focused: Field::Url,
            editing: false,
            status: "Enter a website URL, then activate the crawl button.".to_string(),
            crawl_trigger: TriggerState::enabled(labels::CRAWL_IDLE),
        }
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.editing
    }

    pub(crate) fn set_status(&mut self, message: &str) {
        self.status = message.to_string();
    }

    pub(crate) fn append_status(&mut self, message: &str) {
        self.status.push_str(message);
    }

    pub(crate) fn set_crawl_trigger(&mut self, state: TriggerState) {
        self.crawl_trigger = state;
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // URL
                Constraint::Length(3), // Crawl button
                Constraint::Length(1), // Hint
                Constraint::Min(1),    // Status
            ])
            .split(area);

        // URL field
        let url_style = if self.focused == Field::Url && self.editing {
            Style::default().fg(Color::Yellow)
        } else if self.focused == Field::Url {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let url_block = Block::default()
            .borders(Borders::ALL)
            .title(" Website URL ")
            .border_style(url_style);
        let url_text = Paragraph::new(self.url.as_str()).block(url_block);
        f.render_widget(url_text, chunks[0]);

        // Crawl trigger
        let button_style = if !self.crawl_trigger.enabled {
            Style::default().fg(Color::DarkGray)
        } else if self.focused == Field::Button {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let button = Paragraph::new(format!("[ {} ]", self.crawl_trigger.label))
            .style(button_style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(button, chunks[1]);

        // Hint
        let hint = if self.editing {
            "Type to edit · Esc to stop editing · Tab to next row"
        } else {
            "Enter to edit / activate · ↑/↓ to move"
        };
        let hint_p = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(hint_p, chunks[2]);

        // Status area
        let status_block = Block::default().borders(Borders::ALL).title(" Status ");
        let status_text = Paragraph::new(self.status.as_str())
            .wrap(Wrap { trim: false })
            .block(status_block);
        f.render_widget(status_text, chunks[3]);
    }

    pub(crate) fn handle_key(
        &mut self,
        code: KeyCode,
        _modifiers: KeyModifiers,
    ) -> Option<ScreenAction> {
        if self.editing {
            match code {
                KeyCode::Esc => {
                    self.editing = false;
                }
                KeyCode::Tab | KeyCode::Enter => {
                    self.editing = false;
                    self.focused = Field::Button;
                }
                KeyCode::Backspace => {
                    self.url.pop();
                }
                KeyCode::Char(c) => {
                    self.url.push(c);
                }
                _ => {}
            }
            return None;
        }

        match code {
            KeyCode::Enter => match self.focused {
                Field::Url => {
                    self.editing = true;
                    None
                }
                // The disabled trigger is the re-entrancy gate: no intent
                // is emitted while a pipeline is in flight.
                Field::Button if self.crawl_trigger.enabled => {
                    Some(ScreenAction::StartIngest(self.url.clone()))
                }
                Field::Button => None,
            },
            KeyCode::Up | KeyCode::Down => {
                self.focused = match self.focused {
                    Field::Url => Field::Button,
                    Field::Button => Field::Url,
                };
                None
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(screen: &mut IngestScreen, code: KeyCode) -> Option<ScreenAction> {
        screen.handle_key(code, KeyModifiers::NONE)
    }

    fn type_url(screen: &mut IngestScreen, url: &str) {
        press(screen, KeyCode::Enter); // start editing
        for c in url.chars() {
            press(screen, KeyCode::Char(c));
        }
        press(screen, KeyCode::Esc);
    }

    #[test]
    fn enter_on_enabled_button_emits_start() {
        let mut screen = IngestScreen::new();
        type_url(&mut screen, "https://example.com");
        press(&mut screen, KeyCode::Down); // focus button

        let action = press(&mut screen, KeyCode::Enter);
        assert_eq!(
            action,
            Some(ScreenAction::StartIngest("https://example.com".into()))
        );
    }

    #[test]
    fn disabled_trigger_gates_activation() {
        let mut screen = IngestScreen::new();
        type_url(&mut screen, "https://example.com");
        press(&mut screen, KeyCode::Down);
        screen.set_crawl_trigger(TriggerState::disabled(labels::CRAWLING));

        assert_eq!(press(&mut screen, KeyCode::Enter), None);
    }

    #[test]
    fn typing_edits_url_and_never_emits() {
        let mut screen = IngestScreen::new();
        assert_eq!(press(&mut screen, KeyCode::Enter), None); // editing on
        assert!(screen.is_editing());
        assert_eq!(press(&mut screen, KeyCode::Char('x')), None);
        press(&mut screen, KeyCode::Backspace);
        for c in "https://a".chars() {
            press(&mut screen, KeyCode::Char(c));
        }
        press(&mut screen, KeyCode::Esc);
        assert!(!screen.is_editing());
        assert_eq!(screen.url, "https://a");
    }

    #[test]
    fn status_updates_replace_and_append() {
        let mut screen = IngestScreen::new();
        screen.set_status("Starting crawl process...");
        screen.append_status(" Now creating vector store...");
        assert_eq!(
            screen.status,
            "Starting crawl process... Now creating vector store..."
        );
    }
}
