mod analytics;
mod catalog;
mod engine;
mod models;
mod rewards;
mod storage;
mod store;
mod tui;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use engine::{Action, Outcome};
use models::{DailyMode, ExamGoal, JsonOutput, RevisionStats};
use store::Store;

const DEFAULT_DB_NAME: &str = "papermock.db";
const MAX_SUBJECTS: usize = 10;

#[derive(Parser)]
#[command(name = "papermock")]
#[command(about = "A paper-notebook study tracker: log sessions, earn ink, keep up with revisions")]
#[command(version)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up your profile and exam goal
    Onboard {
        /// Your name
        #[arg(long, short)]
        name: String,

        /// Exam goal: neet/jee/upsc/custom
        #[arg(long, short)]
        goal: String,

        /// Comma-separated subjects (defaults to the goal's usual set)
        #[arg(long, short)]
        subjects: Option<String>,

        /// Title shown before your name (defaults to the goal's title)
        #[arg(long)]
        title: Option<String>,
    },

    /// Log a study session
    #[command(subcommand)]
    Log(LogCommands),

    /// Work through scheduled revisions
    #[command(subcommand)]
    Revision(RevisionCommands),

    /// Spend ink on themes, fonts and stickers
    #[command(subcommand)]
    Shop(ShopCommands),

    /// Decorate your notebook with stickers
    #[command(subcommand)]
    Sticker(StickerCommands),

    /// Choose which log form the dashboard opens with: lecture/practice
    Mode { mode: String },

    /// Set the exam date (YYYY-MM-DD)
    Target { date: String },

    /// Show today's overview
    Status,

    /// Show the weekly analytics report
    Report,

    /// Launch interactive terminal UI
    Tui,
}

#[derive(Subcommand)]
enum LogCommands {
    /// Lecture or reading time; schedules four revisions
    Lecture {
        subject: String,
        topic: String,

        /// Minutes studied
        #[arg(long, short, value_parser = clap::value_parser!(u32).range(10..=240))]
        minutes: u32,
    },

    /// A practice set of questions
    Practice {
        subject: String,
        topic: String,

        /// Questions attempted
        #[arg(long, short)]
        total: u32,

        /// Questions answered incorrectly
        #[arg(long, short)]
        incorrect: u32,
    },

    /// A freeform revision with both time and questions
    Manual {
        subject: String,
        topic: String,

        /// Minutes studied
        #[arg(long, short, value_parser = clap::value_parser!(u32).range(5..=180))]
        minutes: u32,

        /// Questions attempted
        #[arg(long, short)]
        total: u32,

        /// Questions answered incorrectly
        #[arg(long, short)]
        incorrect: u32,
    },
}

#[derive(Subcommand)]
enum RevisionCommands {
    /// List revisions due today or overdue
    List {
        /// Also list upcoming revisions
        #[arg(long, short)]
        all: bool,
    },

    /// Tick off a revision without recording stats
    Done {
        /// Revision ID (a unique prefix is enough)
        id: String,
    },

    /// Complete a revision and record how it went
    Complete {
        /// Revision ID (a unique prefix is enough)
        id: String,

        /// Minutes spent
        #[arg(long, short, value_parser = clap::value_parser!(u32).range(5..=120))]
        minutes: u32,

        /// Questions attempted
        #[arg(long, short, default_value_t = 0)]
        total: u32,

        /// Questions answered incorrectly
        #[arg(long, short, default_value_t = 0)]
        incorrect: u32,
    },

    /// Push a revision off the list for 10 ink
    Postpone {
        /// Revision ID (a unique prefix is enough)
        id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ItemKind {
    Theme,
    Font,
    Sticker,
}

#[derive(Subcommand)]
enum ShopCommands {
    /// List shop items
    List {
        /// Only list one kind of item
        #[arg(value_enum)]
        kind: Option<ItemKind>,
    },

    /// Buy an item at its catalog price
    Buy {
        #[arg(value_enum)]
        kind: ItemKind,

        /// Item ID
        id: String,
    },

    /// Equip an unlocked theme or font
    Equip {
        #[arg(value_enum)]
        kind: ItemKind,

        /// Item ID
        id: String,
    },
}

#[derive(Subcommand)]
enum StickerCommands {
    /// Place an owned sticker on the notebook
    Place {
        /// Sticker ID
        id: String,

        /// Horizontal position
        #[arg(long, default_value_t = 50.0)]
        x: f64,

        /// Vertical position
        #[arg(long, default_value_t = 50.0)]
        y: f64,
    },

    /// Peel off a placed sticker
    Remove {
        /// Placed sticker ID (a unique prefix is enough)
        id: String,
    },

    /// List placed stickers
    List,
}

#[derive(Debug, Serialize)]
struct ShopRow {
    kind: &'static str,
    id: &'static str,
    name: &'static str,
    preview: &'static str,
    price: u32,
    owned: bool,
    equipped: bool,
}

fn get_db_path() -> PathBuf {
    if let Ok(path) = std::env::var("PAPERMOCK_DB") {
        return PathBuf::from(path);
    }

    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("papermock");

    std::fs::create_dir_all(&config_dir).ok();
    config_dir.join(DEFAULT_DB_NAME)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(e) = run(cli) {
        if json {
            let _ = print_json(&JsonOutput::<()>::err(e.to_string()));
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let db_path = get_db_path();
    let mut store = Store::open(&db_path)?;
    let today = Utc::now().date_naive();
    let json = cli.json;

    match cli.command {
        Commands::Onboard {
            name,
            goal,
            subjects,
            title,
        } => {
            let goal = ExamGoal::from_str(&goal).ok_or_else(|| {
                format!("Invalid goal '{}'. Use: neet, jee, upsc, or custom", goal)
            })?;
            let name = require_text(&name, "name")?;
            let persona = catalog::persona(goal);
            let subjects = match subjects {
                Some(list) => parse_subjects(&list),
                None => persona.default_subjects(),
            };
            let title = title.unwrap_or_else(|| persona.title.to_string());
            let greeting = format!("Welcome, {} {}! Preparing for {}.", title, name, goal.label());

            dispatch(
                &mut store,
                Action::CompleteOnboarding {
                    name,
                    goal,
                    subjects,
                    title,
                },
                json,
                &greeting,
            )?;
        }

        Commands::Log(log_cmd) => match log_cmd {
            LogCommands::Lecture {
                subject,
                topic,
                minutes,
            } => {
                let action = Action::LogLecture {
                    subject: require_text(&subject, "subject")?,
                    topic: require_text(&topic, "topic")?,
                    minutes,
                };
                dispatch(
                    &mut store,
                    action,
                    json,
                    &format!("Logged {} min lecture; 4 revisions scheduled", minutes),
                )?;
            }

            LogCommands::Practice {
                subject,
                topic,
                total,
                incorrect,
            } => {
                check_counts(total, incorrect)?;
                let action = Action::LogPractice {
                    subject: require_text(&subject, "subject")?,
                    topic: require_text(&topic, "topic")?,
                    attempted: total,
                    incorrect,
                };
                dispatch(
                    &mut store,
                    action,
                    json,
                    &format!("Logged practice: {}/{} correct", total - incorrect, total),
                )?;
            }

            LogCommands::Manual {
                subject,
                topic,
                minutes,
                total,
                incorrect,
            } => {
                check_counts(total, incorrect)?;
                let action = Action::LogManualRevision {
                    subject: require_text(&subject, "subject")?,
                    topic: require_text(&topic, "topic")?,
                    minutes,
                    attempted: total,
                    incorrect,
                };
                dispatch(&mut store, action, json, "Logged revision session")?;
            }
        },

        Commands::Revision(rev_cmd) => match rev_cmd {
            RevisionCommands::List { all } => {
                let state = store.state();
                let due = analytics::due_revisions(state, today);
                let upcoming = if all {
                    analytics::upcoming_revisions(state, today)
                } else {
                    Vec::new()
                };

                if json {
                    print_json(&JsonOutput::ok(serde_json::json!({
                        "due": due,
                        "upcoming": upcoming
                    })))?;
                } else {
                    if due.is_empty() {
                        println!("No revisions due. All caught up!");
                    } else {
                        println!(
                            "{:<10} {:<16} {:<28} {:<12} STATUS",
                            "ID", "SUBJECT", "TOPIC", "SCHEDULED"
                        );
                        println!("{}", "-".repeat(80));
                        for d in &due {
                            println!(
                                "{:<10} {:<16} {:<28} {:<12} {}",
                                short_id(&d.task.id),
                                truncate(&d.task.subject, 16),
                                truncate(&d.task.topic, 28),
                                d.task.scheduled_date,
                                d.due.label()
                            );
                        }
                    }
                    if all && !upcoming.is_empty() {
                        println!();
                        println!("--- Upcoming ---");
                        for task in &upcoming {
                            println!(
                                "{:<10} {:<16} {:<28} {}",
                                short_id(&task.id),
                                truncate(&task.subject, 16),
                                truncate(&task.topic, 28),
                                task.scheduled_date
                            );
                        }
                    }
                }
            }

            RevisionCommands::Done { id } => {
                let task_id = resolve_revision(&store, &id)?;
                dispatch(
                    &mut store,
                    Action::MarkRevisionDone { task_id },
                    json,
                    "Revision done",
                )?;
            }

            RevisionCommands::Complete {
                id,
                minutes,
                total,
                incorrect,
            } => {
                check_counts(total, incorrect)?;
                let task_id = resolve_revision(&store, &id)?;
                dispatch(
                    &mut store,
                    Action::CompleteRevision {
                        task_id,
                        stats: RevisionStats {
                            duration_minutes: minutes,
                            questions_attempted: total,
                            questions_incorrect: incorrect,
                        },
                    },
                    json,
                    "Revision completed",
                )?;
            }

            RevisionCommands::Postpone { id } => {
                let task_id = resolve_revision(&store, &id)?;
                dispatch(
                    &mut store,
                    Action::PostponeRevision { task_id },
                    json,
                    "Revision postponed",
                )?;
            }
        },

        Commands::Shop(shop_cmd) => match shop_cmd {
            ShopCommands::List { kind } => {
                let rows = shop_rows(&store, kind);
                if json {
                    print_json(&JsonOutput::ok(&rows))?;
                } else {
                    println!("Ink: {}", store.state().ink_points);
                    println!();
                    println!(
                        "{:<8} {:<16} {:<20} {:<18} {:>6}  STATUS",
                        "KIND", "ID", "NAME", "PREVIEW", "PRICE"
                    );
                    println!("{}", "-".repeat(83));
                    for row in &rows {
                        let status = if row.equipped {
                            "equipped"
                        } else if row.owned {
                            "owned"
                        } else {
                            "-"
                        };
                        println!(
                            "{:<8} {:<16} {:<20} {:<18} {:>6}  {}",
                            row.kind,
                            row.id,
                            row.name,
                            truncate(row.preview, 16),
                            row.price,
                            status
                        );
                    }
                }
            }

            ShopCommands::Buy { kind, id } => {
                let (action, name) = match kind {
                    ItemKind::Theme => {
                        let theme = catalog::theme_by_id(&id)
                            .ok_or_else(|| format!("Unknown theme '{}'", id))?;
                        (
                            Action::BuyTheme {
                                id: theme.id.to_string(),
                                price: theme.price,
                            },
                            theme.name,
                        )
                    }
                    ItemKind::Font => {
                        let font = catalog::font_by_id(&id)
                            .ok_or_else(|| format!("Unknown font '{}'", id))?;
                        (
                            Action::BuyFont {
                                id: font.id.to_string(),
                                price: font.price,
                            },
                            font.name,
                        )
                    }
                    ItemKind::Sticker => {
                        let sticker = catalog::sticker_by_id(&id)
                            .ok_or_else(|| format!("Unknown sticker '{}'", id))?;
                        (
                            Action::BuySticker {
                                id: sticker.id.to_string(),
                                price: sticker.price,
                            },
                            sticker.name,
                        )
                    }
                };
                dispatch(&mut store, action, json, &format!("Bought {}", name))?;
            }

            ShopCommands::Equip { kind, id } => {
                let (action, name) = match kind {
                    ItemKind::Theme => {
                        let theme = catalog::theme_by_id(&id)
                            .ok_or_else(|| format!("Unknown theme '{}'", id))?;
                        (
                            Action::SetTheme {
                                id: theme.id.to_string(),
                            },
                            theme.name,
                        )
                    }
                    ItemKind::Font => {
                        let font = catalog::font_by_id(&id)
                            .ok_or_else(|| format!("Unknown font '{}'", id))?;
                        (
                            Action::SetFont {
                                id: font.id.to_string(),
                            },
                            font.name,
                        )
                    }
                    ItemKind::Sticker => {
                        return Err("Stickers are placed, not equipped. Use: sticker place".into());
                    }
                };
                dispatch(&mut store, action, json, &format!("Now using {}", name))?;
            }
        },

        Commands::Sticker(sticker_cmd) => match sticker_cmd {
            StickerCommands::Place { id, x, y } => {
                let sticker = catalog::sticker_by_id(&id)
                    .ok_or_else(|| format!("Unknown sticker '{}'", id))?;
                if !store.state().owns_sticker(sticker.id) {
                    return Err(format!(
                        "You don't own '{}' yet. Buy it with: shop buy sticker {}",
                        sticker.name, sticker.id
                    )
                    .into());
                }
                dispatch(
                    &mut store,
                    Action::PlaceSticker {
                        sticker_id: sticker.id.to_string(),
                        x,
                        y,
                    },
                    json,
                    &format!("Placed {}", sticker.name),
                )?;
            }

            StickerCommands::Remove { id } => {
                let instance_id = resolve_prefix(
                    store.state().placed_stickers.iter().map(|p| p.id.as_str()),
                    &id,
                    "placed sticker",
                )?;
                dispatch(
                    &mut store,
                    Action::RemoveSticker { instance_id },
                    json,
                    "Sticker removed",
                )?;
            }

            StickerCommands::List => {
                let placed = &store.state().placed_stickers;
                if json {
                    print_json(&JsonOutput::ok(placed))?;
                } else if placed.is_empty() {
                    println!("No stickers placed.");
                } else {
                    println!("{:<10} {:<16} {:>6} {:>6}", "ID", "STICKER", "X", "Y");
                    println!("{}", "-".repeat(42));
                    for p in placed {
                        let name = catalog::sticker_by_id(&p.sticker_id)
                            .map(|s| s.name)
                            .unwrap_or("?");
                        println!(
                            "{:<10} {:<16} {:>6.1} {:>6.1}",
                            short_id(&p.id),
                            name,
                            p.x,
                            p.y
                        );
                    }
                }
            }
        },

        Commands::Mode { mode } => {
            let mode = DailyMode::from_str(&mode)
                .ok_or_else(|| format!("Invalid mode '{}'. Use: lecture or practice", mode))?;
            dispatch(
                &mut store,
                Action::SetDailyMode(mode),
                json,
                &format!("Dashboard opens with {} logging", mode.label().to_lowercase()),
            )?;
        }

        Commands::Target { date } => {
            let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
                .map_err(|_| format!("Invalid date '{}'. Use YYYY-MM-DD", date))?;
            dispatch(
                &mut store,
                Action::SetTargetDate(day),
                json,
                &format!("Exam date set to {}", day),
            )?;
        }

        Commands::Status => print_status(&store, today, json)?,

        Commands::Report => print_report(&store, today, json)?,

        Commands::Tui => {
            tui::run(store)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

// Runs one action and reports the outcome and any ink movement
fn dispatch(
    store: &mut Store,
    action: Action,
    json: bool,
    message: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let before = store.state().ink_points;
    let outcome = store.dispatch(action)?;
    let balance = store.state().ink_points;

    match outcome {
        Outcome::Applied if json => {
            print_json(&JsonOutput::ok(serde_json::json!({
                "ink": balance,
                "delta": balance - before
            })))?;
        }
        Outcome::Applied if balance != before => {
            println!("{} ({:+} ink, balance {}).", message, balance - before, balance);
        }
        Outcome::Applied => println!("{}.", message),
        Outcome::Ignored(reason) if json => {
            print_json(&JsonOutput::<()>::err(reason.to_string()))?;
        }
        Outcome::Ignored(reason) => println!("Nothing changed: {}.", reason),
    }
    Ok(())
}

fn print_status(
    store: &Store,
    today: NaiveDate,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = store.state();
    let summary = analytics::summary(state, today);
    let todays = analytics::sessions_on(state, today);
    let persona = catalog::persona(state.exam_goal);

    if json {
        print_json(&JsonOutput::ok(serde_json::json!({
            "name": state.display_name(),
            "goal": state.exam_goal,
            "onboarded": state.is_onboarded(),
            "theme": store.current_theme().id,
            "font": store.current_font().id,
            "dailyMode": state.daily_mode,
            "today": todays,
            "summary": summary
        })))?;
        return Ok(());
    }

    if !state.is_onboarded() {
        println!("Not set up yet. Run: papermock onboard --name <NAME> --goal <neet|jee|upsc|custom>");
        println!();
    }

    println!("=== {} ===", state.display_name());
    if state.is_onboarded() {
        println!("\"{}\"", persona.random_quote());
    }
    println!();
    println!("Ink: {}", summary.ink_points);
    println!(
        "Theme: {}   Font: {}   Mode: {}",
        store.current_theme().name,
        store.current_font().name,
        state.daily_mode.label()
    );
    match summary.days_until_target {
        Some(days) if days >= 0 => println!("Exam in {} days", days),
        Some(days) => println!("Exam date passed {} days ago", -days),
        None => println!("No exam date set"),
    }

    println!();
    println!("--- Today ---");
    if todays.is_empty() {
        println!("Nothing logged yet.");
    }
    for s in &todays {
        let detail = match s.level {
            models::SessionLevel::Lecture => format!("{} min", s.minutes()),
            models::SessionLevel::Practice => format!("{}/{} correct", s.correct(), s.attempted()),
            models::SessionLevel::Manual => format!(
                "{} min, {}/{} correct",
                s.minutes(),
                s.correct(),
                s.attempted()
            ),
        };
        println!(
            "{:<9} {:<16} {:<28} {}",
            s.level.label(),
            truncate(&s.subject, 16),
            truncate(&s.topic, 28),
            detail
        );
    }

    println!();
    println!(
        "Revisions: {} due, {} pending, {} completed, {} skipped",
        summary.due_revisions,
        summary.pending_revisions,
        summary.completed_revisions,
        summary.skipped_revisions
    );
    Ok(())
}

fn print_report(
    store: &Store,
    today: NaiveDate,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = analytics::report(store.state(), today);
    if json {
        print_json(&JsonOutput::ok(&report))?;
        return Ok(());
    }

    println!("=== Weekly Report ===");
    println!("Accuracy: {}%", report.accuracy);
    println!("Speed: {} questions/hour", report.speed);

    println!();
    println!("--- Growth (this week vs last) ---");
    if report.growth.is_empty() {
        println!("No subjects yet.");
    }
    for row in &report.growth {
        println!(
            "{:<16} {:>5} min {:>5} min  {:+}%",
            truncate(&row.subject, 16),
            row.current,
            row.previous,
            row.percent
        );
    }

    println!();
    println!("--- Last 28 days ---");
    let strip: String = report.heat.iter().map(|d| d.tier.glyph()).collect();
    println!("{}", strip);

    println!();
    println!("--- Last 7 days ---");
    for day in &report.trend {
        println!(
            "{}  {:>4} min  {:>4} questions",
            day.day.format("%a %d"),
            day.minutes,
            day.questions
        );
    }
    Ok(())
}

fn shop_rows(store: &Store, kind: Option<ItemKind>) -> Vec<ShopRow> {
    let state = store.state();
    let wants = |k: ItemKind| kind.map_or(true, |only| only == k);
    let mut rows = Vec::new();

    if wants(ItemKind::Theme) {
        rows.extend(catalog::THEMES.iter().map(|t| ShopRow {
            kind: "theme",
            id: t.id,
            name: t.name,
            preview: t.palette.accent,
            price: t.price,
            owned: state.owns_theme(t.id),
            equipped: state.current_theme_id == t.id,
        }));
    }
    if wants(ItemKind::Font) {
        rows.extend(catalog::FONTS.iter().map(|f| ShopRow {
            kind: "font",
            id: f.id,
            name: f.name,
            preview: f.family,
            price: f.price,
            owned: state.owns_font(f.id),
            equipped: state.current_font_id == f.id,
        }));
    }
    if wants(ItemKind::Sticker) {
        rows.extend(
            catalog::stickers_for_goal(state.exam_goal)
                .into_iter()
                .map(|s| ShopRow {
                    kind: "sticker",
                    id: s.id,
                    name: s.name,
                    preview: s.content,
                    price: s.price,
                    owned: state.owns_sticker(s.id),
                    equipped: false,
                }),
        );
    }
    rows
}

fn resolve_revision(store: &Store, prefix: &str) -> Result<String, String> {
    resolve_prefix(
        store.state().revisions.iter().map(|r| r.id.as_str()),
        prefix,
        "revision",
    )
}

/// Finds the one id equal to, or starting with, `prefix`.
fn resolve_prefix<'a, I>(ids: I, prefix: &str, what: &str) -> Result<String, String>
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(format!("No {} id given", what));
    }

    let mut matches = Vec::new();
    for id in ids {
        if id == prefix {
            return Ok(id.to_string());
        }
        if id.starts_with(prefix) {
            matches.push(id);
        }
    }

    match matches.as_slice() {
        [] => Err(format!("No {} matches '{}'", what, prefix)),
        [only] => Ok(only.to_string()),
        _ => Err(format!(
            "'{}' matches {} {}s; use more characters",
            prefix,
            matches.len(),
            what
        )),
    }
}

fn parse_subjects(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .take(MAX_SUBJECTS)
        .map(String::from)
        .collect()
}

fn require_text(value: &str, field: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("The {} cannot be empty", field));
    }
    Ok(trimmed.to_string())
}

fn check_counts(total: u32, incorrect: u32) -> Result<(), String> {
    if incorrect > total {
        return Err(format!(
            "Incorrect answers ({}) cannot exceed questions attempted ({})",
            incorrect, total
        ));
    }
    Ok(())
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
