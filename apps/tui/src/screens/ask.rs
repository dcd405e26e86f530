//! "Ask" screen — question input, ask trigger, answer text, and source
//! links.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use ragdesk_core::{TriggerState, labels};
use ragdesk_shared::Source;

use super::ScreenAction;

/// Which row is focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Question,
    Button,
}

pub(crate) struct AskScreen {
    question: String,
    focused: Field,
    editing: bool,
    ask_trigger: TriggerState,
    /// The answer area stays hidden until the first ask run reveals it.
    answer_visible: bool,
    answer: String,
    sources: Vec<Source>,
}

impl AskScreen {
    pub(crate) fn new() -> Self {
        Self {
            question: String::new(),
            focused: Field::Question,
            editing: false,
            ask_trigger: TriggerState::enabled(labels::ASK_IDLE),
            answer_visible: false,
            answer: String::new(),
            sources: Vec::new(),
        }
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.editing
    }

    pub(crate) fn set_trigger(&mut self, state: TriggerState) {
        self.ask_trigger = state;
    }

    pub(crate) fn show_answer(&mut self, text: &str) {
        self.answer_visible = true;
        self.answer = text.to_string();
    }

    pub(crate) fn clear_sources(&mut self) {
        self.sources.clear();
    }

    pub(crate) fn set_sources(&mut self, sources: Vec<Source>) {
        self.sources = sources;
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),      // Question
                Constraint::Length(3),      // Ask button
                Constraint::Length(1),      // Hint
                Constraint::Min(4),         // Answer
                Constraint::Percentage(35), // Sources
            ])
            .split(area);

        // Question field
        let question_style = if self.focused == Field::Question && self.editing {
            Style::default().fg(Color::Yellow)
        } else if self.focused == Field::Question {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let question_block = Block::default()
            .borders(Borders::ALL)
            .title(" Question ")
            .border_style(question_style);
        let question_text = Paragraph::new(self.question.as_str()).block(question_block);
        f.render_widget(question_text, chunks[0]);

        // Ask trigger
        let button_style = if !self.ask_trigger.enabled {
            Style::default().fg(Color::DarkGray)
        } else if self.focused == Field::Button {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let button = Paragraph::new(format!("[ {} ]", self.ask_trigger.label))
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

        // Answer area (revealed by the first run)
        if self.answer_visible {
            let answer_block = Block::default().borders(Borders::ALL).title(" Answer ");
            let answer_text = Paragraph::new(self.answer.as_str())
                .wrap(Wrap { trim: false })
                .block(answer_block);
            f.render_widget(answer_text, chunks[3]);

            // Sources, in the order the service returned them
            let items: Vec<ListItem> = self
                .sources
                .iter()
                .enumerate()
                .map(|(i, source)| {
                    let mut lines = vec![Line::from(vec![
                        Span::raw(format!("{}. ", i + 1)),
                        Span::styled(
                            source.url.clone(),
                            Style::default()
                                .fg(Color::Blue)
                                .add_modifier(Modifier::UNDERLINED),
                        ),
                    ])];
                    if let Some(snippet) = &source.snippet {
                        lines.push(
                            Line::from(format!("   {snippet}"))
                                .style(Style::default().fg(Color::DarkGray)),
                        );
                    }
                    ListItem::new(lines)
                })
                .collect();

            let list =
                List::new(items).block(Block::default().borders(Borders::ALL).title(" Sources "));
            f.render_widget(list, chunks[4]);
        }
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
                    self.question.pop();
                }
                KeyCode::Char(c) => {
                    self.question.push(c);
                }
                _ => {}
            }
            return None;
        }

        match code {
            KeyCode::Enter => match self.focused {
                Field::Question => {
                    self.editing = true;
                    None
                }
                Field::Button if self.ask_trigger.enabled => {
                    Some(ScreenAction::StartAsk(self.question.clone()))
                }
                Field::Button => None,
            },
            KeyCode::Up | KeyCode::Down => {
                self.focused = match self.focused {
                    Field::Question => Field::Button,
                    Field::Button => Field::Question,
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

    fn press(screen: &mut AskScreen, code: KeyCode) -> Option<ScreenAction> {
        screen.handle_key(code, KeyModifiers::NONE)
    }

    #[test]
    fn enter_on_enabled_button_emits_start() {
        let mut screen = AskScreen::new();
        press(&mut screen, KeyCode::Enter);
        for c in "what is it?".chars() {
            press(&mut screen, KeyCode::Char(c));
        }
        press(&mut screen, KeyCode::Tab); // stop editing, focus button

        let action = press(&mut screen, KeyCode::Enter);
        assert_eq!(action, Some(ScreenAction::StartAsk("what is it?".into())));
    }

    #[test]
    fn disabled_trigger_gates_activation() {
        let mut screen = AskScreen::new();
        press(&mut screen, KeyCode::Down); // focus button
        screen.set_trigger(TriggerState::disabled(labels::GENERATING));

        assert_eq!(press(&mut screen, KeyCode::Enter), None);
    }

    #[test]
    fn answer_area_revealed_on_first_show() {
        let mut screen = AskScreen::new();
        assert!(!screen.answer_visible);

        screen.show_answer("Generating answer...");
        assert!(screen.answer_visible);
        assert_eq!(screen.answer, "Generating answer...");

        screen.show_answer("42");
        assert_eq!(screen.answer, "42");
    }

    #[test]
    fn sources_replace_in_received_order() {
        let mut screen = AskScreen::new();
        screen.set_sources(vec![
            Source {
                url: "http://a".into(),
                snippet: None,
            },
            Source {
                url: "http://b".into(),
                snippet: Some("chunk b".into()),
            },
        ]);
        assert_eq!(screen.sources[0].url, "http://a");
        assert_eq!(screen.sources[1].url, "http://b");

        screen.clear_sources();
        assert!(screen.sources.is_empty());
    }
}
