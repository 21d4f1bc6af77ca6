mod ui;
mod widgets;

use std::io;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::analytics;
use crate::catalog::{self, Font, Sticker, Theme};
use crate::engine::{Action, Outcome};
use crate::models::DailyMode;
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Revisions,
    Report,
    Shop,
}

impl View {
    fn next(&self) -> Self {
        match self {
            View::Dashboard => View::Revisions,
            View::Revisions => View::Report,
            View::Report => View::Shop,
            View::Shop => View::Dashboard,
        }
    }

    fn prev(&self) -> Self {
        match self {
            View::Dashboard => View::Shop,
            View::Revisions => View::Dashboard,
            View::Report => View::Revisions,
            View::Shop => View::Report,
        }
    }
}

pub struct StatefulList<T> {
    pub items: Vec<T>,
    pub selected: Option<usize>,
}

impl<T> StatefulList<T> {
    fn with_items(items: Vec<T>) -> Self {
        let selected = if items.is_empty() { None } else { Some(0) };
        Self { items, selected }
    }

    // Keeps the cursor near where it was after the list is rebuilt
    fn replace_items(&mut self, items: Vec<T>) {
        self.selected = match (self.selected, items.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
        self.items = items;
    }

    fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) => {
                if i >= self.items.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.selected = Some(i);
    }

    fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) => {
                if i == 0 {
                    self.items.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.selected = Some(i);
    }

    fn first(&mut self) {
        if !self.items.is_empty() {
            self.selected = Some(0);
        }
    }

    fn last(&mut self) {
        if !self.items.is_empty() {
            self.selected = Some(self.items.len() - 1);
        }
    }

    fn selected_item(&self) -> Option<&T> {
        self.selected.and_then(|i| self.items.get(i))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShopItem {
    Theme(&'static Theme),
    Font(&'static Font),
    Sticker(&'static Sticker),
}

impl ShopItem {
    pub fn id(&self) -> &'static str {
        match self {
            ShopItem::Theme(t) => t.id,
            ShopItem::Font(f) => f.id,
            ShopItem::Sticker(s) => s.id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShopItem::Theme(t) => t.name,
            ShopItem::Font(f) => f.name,
            ShopItem::Sticker(s) => s.name,
        }
    }

    pub fn price(&self) -> u32 {
        match self {
            ShopItem::Theme(t) => t.price,
            ShopItem::Font(f) => f.price,
            ShopItem::Sticker(s) => s.price,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ShopItem::Theme(_) => "Theme",
            ShopItem::Font(_) => "Font",
            ShopItem::Sticker(_) => "Sticker",
        }
    }

    fn buy(&self) -> Action {
        let id = self.id().to_string();
        let price = self.price();
        match self {
            ShopItem::Theme(_) => Action::BuyTheme { id, price },
            ShopItem::Font(_) => Action::BuyFont { id, price },
            ShopItem::Sticker(_) => Action::BuySticker { id, price },
        }
    }

    // Stickers are placed, not equipped
    fn equip(&self) -> Option<Action> {
        let id = self.id().to_string();
        match self {
            ShopItem::Theme(_) => Some(Action::SetTheme { id }),
            ShopItem::Font(_) => Some(Action::SetFont { id }),
            ShopItem::Sticker(_) => None,
        }
    }
}

/// Turns the quick-log prompt into an action.
///
/// Lecture mode expects `subject/topic/minutes`; practice mode expects
/// `subject/topic/attempted/incorrect`.
pub fn parse_quick_log(mode: DailyMode, input: &str) -> Result<Action, String> {
    let parts: Vec<&str> = input.split('/').map(str::trim).collect();
    let number = |s: &str, what: &str| {
        s.parse::<u32>()
            .map_err(|_| format!("'{}' is not a valid {}", s, what))
    };

    match (mode, parts.as_slice()) {
        (_, [subject, topic, ..]) if subject.is_empty() || topic.is_empty() => {
            Err("Subject and topic are required".to_string())
        }
        (DailyMode::Level1, [subject, topic, minutes]) => {
            let minutes = number(*minutes, "minute count")?;
            if minutes == 0 {
                return Err("Minutes must be positive".to_string());
            }
            Ok(Action::LogLecture {
                subject: subject.to_string(),
                topic: topic.to_string(),
                minutes,
            })
        }
        (DailyMode::Level2, [subject, topic, attempted, incorrect]) => {
            let attempted = number(*attempted, "question count")?;
            let incorrect = number(*incorrect, "question count")?;
            if incorrect > attempted {
                return Err("Incorrect answers cannot exceed questions attempted".to_string());
            }
            Ok(Action::LogPractice {
                subject: subject.to_string(),
                topic: topic.to_string(),
                attempted,
                incorrect,
            })
        }
        (DailyMode::Level1, _) => Err("Format: subject/topic/minutes".to_string()),
        (DailyMode::Level2, _) => Err("Format: subject/topic/attempted/incorrect".to_string()),
    }
}

pub struct App {
    store: Store,
    pub view: View,
    pub today: NaiveDate,
    pub revisions: StatefulList<String>,
    pub shop: StatefulList<ShopItem>,
    pub quote: &'static str,
    pub message: Option<String>,
    pub input: String,
    pub input_mode: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: Store) -> Self {
        let quote = catalog::persona(store.state().exam_goal).random_quote();
        let mut app = Self {
            store,
            view: View::Dashboard,
            today: Utc::now().date_naive(),
            revisions: StatefulList::with_items(Vec::new()),
            shop: StatefulList::with_items(Vec::new()),
            quote,
            message: None,
            input: String::new(),
            input_mode: false,
            should_quit: false,
        };
        app.refresh_data();
        app
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn refresh_data(&mut self) {
        self.today = Utc::now().date_naive();
        let state = self.store.state();

        let due: Vec<String> = analytics::due_revisions(state, self.today)
            .into_iter()
            .map(|d| d.task.id.clone())
            .collect();
        self.revisions.replace_items(due);

        let items: Vec<ShopItem> = catalog::THEMES
            .iter()
            .map(ShopItem::Theme)
            .chain(catalog::FONTS.iter().map(ShopItem::Font))
            .chain(
                catalog::stickers_for_goal(state.exam_goal)
                    .into_iter()
                    .map(ShopItem::Sticker),
            )
            .collect();
        self.shop.replace_items(items);
    }

    fn apply(&mut self, action: Action, done: &str) {
        self.message = Some(match self.store.dispatch(action) {
            Ok(Outcome::Applied) => format!("{} (ink: {})", done, self.store.state().ink_points),
            Ok(Outcome::Ignored(reason)) => format!("Nothing changed: {}", reason),
            Err(e) => format!("Saved in memory only: {}", e),
        });
        self.refresh_data();
    }

    fn selected_revision(&self) -> Option<String> {
        self.revisions.selected_item().cloned()
    }

    fn submit_input(&mut self) {
        let input = std::mem::take(&mut self.input);
        match parse_quick_log(self.store.state().daily_mode, &input) {
            Ok(action) => self.apply(action, "Logged"),
            Err(e) => self.message = Some(e),
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Quick-log prompt swallows all keys until submitted or cancelled
        if self.input_mode {
            match key {
                KeyCode::Esc => {
                    self.input_mode = false;
                    self.input.clear();
                }
                KeyCode::Enter => {
                    self.input_mode = false;
                    self.submit_input();
                }
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Char(c) => {
                    self.input.push(c);
                }
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Char('q') => self.should_quit = true,

            KeyCode::Char('r') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.refresh_data();
                self.message = None;
            }

            KeyCode::Esc => self.message = None,

            // View switching
            KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => self.view = self.view.prev(),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => {
                if modifiers.contains(KeyModifiers::SHIFT) {
                    self.view = self.view.prev();
                } else {
                    self.view = self.view.next();
                }
            }

            // List navigation
            KeyCode::Char('j') | KeyCode::Down => match self.view {
                View::Revisions => self.revisions.next(),
                View::Shop => self.shop.next(),
                _ => {}
            },
            KeyCode::Char('k') | KeyCode::Up => match self.view {
                View::Revisions => self.revisions.previous(),
                View::Shop => self.shop.previous(),
                _ => {}
            },
            KeyCode::Char('g') => match self.view {
                View::Revisions => self.revisions.first(),
                View::Shop => self.shop.first(),
                _ => {}
            },
            KeyCode::Char('G') => match self.view {
                View::Revisions => self.revisions.last(),
                View::Shop => self.shop.last(),
                _ => {}
            },

            // Dashboard
            KeyCode::Char('a') if self.view == View::Dashboard => {
                self.input_mode = true;
                self.input.clear();
            }
            KeyCode::Char('m') if self.view == View::Dashboard => {
                let mode = match self.store.state().daily_mode {
                    DailyMode::Level1 => DailyMode::Level2,
                    DailyMode::Level2 => DailyMode::Level1,
                };
                self.apply(Action::SetDailyMode(mode), "Mode switched");
            }

            // Revisions
            KeyCode::Char('d') | KeyCode::Enter if self.view == View::Revisions => {
                if let Some(task_id) = self.selected_revision() {
                    self.apply(Action::MarkRevisionDone { task_id }, "Revision done");
                }
            }
            KeyCode::Char('p') if self.view == View::Revisions => {
                if let Some(task_id) = self.selected_revision() {
                    self.apply(Action::PostponeRevision { task_id }, "Revision postponed");
                }
            }

            // Shop
            KeyCode::Char('b') | KeyCode::Enter if self.view == View::Shop => {
                if let Some(item) = self.shop.selected_item().copied() {
                    self.apply(item.buy(), &format!("Bought {}", item.name()));
                }
            }
            KeyCode::Char('e') if self.view == View::Shop => {
                if let Some(item) = self.shop.selected_item().copied() {
                    match item.equip() {
                        Some(action) => self.apply(action, &format!("Now using {}", item.name())),
                        None => {
                            self.message =
                                Some("Stickers are placed from the command line".to_string())
                        }
                    }
                }
            }

            _ => {}
        }
    }
}

pub fn run(store: Store) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store);

    let result = run_app(&mut terminal, &mut app);

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

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key.code, key.modifiers);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
