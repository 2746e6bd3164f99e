use crate::game::Difficulty;
use crate::session::{GameMode, GameState, Notification, RecordingSink, Session, SessionEvent};
use crate::storage::{KeyValueStore, Rank, Settings};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::{execute, style::Print};
use ratatui::{backend::Backend, Terminal};
use std::io;

pub struct App {
    session: Session,
    notifications: RecordingSink,
    settings: Settings,
    settings_store: Box<dyn KeyValueStore>,
    cursor: usize,
    should_quit: bool,
    message: Option<String>,
    /// Name typed so far while the high-score prompt is open
    name_entry: Option<String>,
    pending_bell: bool,
}

impl App {
    /// `notifications` must share its queue with the session's sink.
    pub fn new(
        session: Session,
        notifications: RecordingSink,
        settings: Settings,
        settings_store: Box<dyn KeyValueStore>,
    ) -> Self {
        App {
            session,
            notifications,
            settings,
            settings_store,
            cursor: 0,
            should_quit: false,
            message: None,
            name_entry: None,
            pending_bell: false,
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if std::mem::take(&mut self.pending_bell) {
                let _ = execute!(io::stdout(), Print('\u{7}'));
            }

            if self.should_quit {
                break;
            }

            self.handle_events()?;
            self.tick();
        }
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Drive delayed steps and the clock.
    fn tick(&mut self) {
        for event in self.session.poll() {
            if let SessionEvent::GameOver(over) = event {
                if over.leaderboard_eligible {
                    self.name_entry = Some(String::new());
                }
            }
        }
        self.drain_notifications();
    }

    /// Handle key press
    fn handle_key(&mut self, key: KeyEvent) {
        if self.name_entry.is_some() {
            self.handle_name_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.session.quit();
                self.should_quit = true;
            }
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Enter | KeyCode::Char(' ') => self.flip(),
            KeyCode::Char('p') => {
                if self.session.pause() {
                    self.set_message("Paused. Press P to resume.");
                } else if self.session.resume() {
                    self.message = None;
                }
            }
            KeyCode::Char('r') => self.restart(None),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.restart(Some(Difficulty::ALL[index]));
            }
            KeyCode::Char('s') => self.toggle_sound(),
            _ => {}
        }
        self.drain_notifications();
    }

    fn handle_name_key(&mut self, key: KeyEvent) {
        let Some(buffer) = self.name_entry.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Char(c) => buffer.push(c),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Esc => {
                self.name_entry = None;
                self.set_message("Score not saved. Press R to play again.");
            }
            KeyCode::Enter => {
                let name = std::mem::take(buffer);
                self.name_entry = None;
                self.submit(&name);
            }
            _ => {}
        }
    }

    fn submit(&mut self, name: &str) {
        match self.session.submit_score(name) {
            Ok(submission) => {
                let placed = match submission.rank {
                    Rank::Ranked(n) => format!("Ranked #{n}!"),
                    Rank::NotRanked => "Not quite a top score.".to_string(),
                };
                match submission.persist_error {
                    Some(e) => self.set_message(format!("{placed} (not saved to disk: {e})")),
                    None => self.set_message(placed),
                }
            }
            Err(e) => self.set_message(e.to_string()),
        }
    }

    fn flip(&mut self) {
        match self.session.state() {
            GameState::Finished => self.set_message("Round over! Press R to play again."),
            GameState::Paused => self.set_message("Paused. Press P to resume."),
            GameState::Idle => self.set_message("Press R to start a round."),
            GameState::Playing => {
                self.session.select(self.cursor);
            }
        }
    }

    fn restart(&mut self, difficulty: Option<Difficulty>) {
        let result = match (difficulty, self.session.mode()) {
            (None, _) => self.session.restart(),
            (Some(d), GameMode::SinglePlayer) => self.session.start_single(d),
            (Some(d), GameMode::Multiplayer) => {
                let names: Vec<String> =
                    self.session.players().iter().map(|p| p.name().to_string()).collect();
                self.session.start_multiplayer(d, &names)
            }
        };
        self.cursor = 0;
        self.name_entry = None;
        match result {
            Ok(()) => self.set_message(format!("New {} round!", self.session.difficulty())),
            Err(e) => self.set_message(format!("Could not start: {e}")),
        }
        // queued flips from the old round are irrelevant now
        self.notifications.drain();
    }

    fn toggle_sound(&mut self) {
        self.settings.sound_enabled = !self.settings.sound_enabled;
        let state = if self.settings.sound_enabled { "on" } else { "off" };
        match self.settings.save(&mut *self.settings_store) {
            Ok(()) => self.set_message(format!("Sound {state}")),
            Err(_) => self.set_message(format!("Sound {state} (settings not saved)")),
        }
    }

    fn move_cursor(&mut self, rows: isize, cols: isize) {
        let Some(board) = self.session.board() else {
            return;
        };
        let len = board.len();
        if len == 0 {
            return;
        }
        let columns = self.session.difficulty().columns().max(1);
        let row = (self.cursor / columns) as isize + rows;
        let col = (self.cursor % columns) as isize + cols;
        if row < 0 || col < 0 || col >= columns as isize {
            return;
        }
        let target = row as usize * columns + col as usize;
        if target < len {
            self.cursor = target;
        }
    }

    fn drain_notifications(&mut self) {
        for notification in self.notifications.drain() {
            let text = match notification {
                Notification::Flip => continue,
                Notification::Match => "Match!".to_string(),
                Notification::NoMatch => "No match.".to_string(),
                Notification::Combo(streak) => format!("Combo x{streak}!"),
                Notification::Victory => self.victory_message(),
                Notification::TurnChange(index) => match self.session.players().get(index) {
                    Some(player) => format!("{}'s turn", player.name()),
                    None => continue,
                },
            };
            if self.settings.audible() && !matches!(notification, Notification::NoMatch) {
                self.pending_bell = true;
            }
            self.message = Some(text);
        }
    }

    fn victory_message(&self) -> String {
        let Some(over) = self.session.game_over() else {
            return "Round complete!".to_string();
        };
        match self.session.mode() {
            GameMode::SinglePlayer => format!(
                "Round complete! {} points, {} star(s).",
                over.breakdown.total, over.breakdown.stars
            ),
            GameMode::Multiplayer => {
                let names: Vec<&str> = over
                    .winners
                    .iter()
                    .filter_map(|&i| self.session.players().get(i))
                    .map(|p| p.name())
                    .collect();
                if names.len() > 1 {
                    format!("Tie between {}!", names.join(" and "))
                } else {
                    format!("{} wins!", names.join(""))
                }
            }
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        super::game_view::render(
            frame,
            &self.session,
            self.cursor,
            &self.message,
            self.name_entry.as_deref(),
            self.settings.high_contrast,
        );
    }
}
