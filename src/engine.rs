//! The state engine: the only code that mutates `UserState`.
//!
//! Every action is a synchronous transition `(state, action, now) -> state`.
//! Preconditions are checked before anything is written, so an ignored
//! action leaves the state exactly as it was. Invalid actions are never
//! errors; they come back as `Outcome::Ignored` with the reason.

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::catalog::{self, Font, Theme};
use crate::models::{
    DailyMode, ExamGoal, PlacedSticker, RevisionStats, RevisionStatus, RevisionTask,
    SessionLevel, StudySession, UserState,
};
use crate::rewards::{
    combined_ink, correct_answers, lecture_ink, practice_ink, revision_ink, COST_POSTPONE,
    ONBOARDING_TARGET_MONTHS, REVISION_OFFSETS_DAYS,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CompleteOnboarding {
        name: String,
        goal: ExamGoal,
        subjects: Vec<String>,
        title: String,
    },
    LogLecture {
        subject: String,
        topic: String,
        minutes: u32,
    },
    LogPractice {
        subject: String,
        topic: String,
        attempted: u32,
        incorrect: u32,
    },
    LogManualRevision {
        subject: String,
        topic: String,
        minutes: u32,
        attempted: u32,
        incorrect: u32,
    },
    MarkRevisionDone {
        task_id: String,
    },
    CompleteRevision {
        task_id: String,
        stats: RevisionStats,
    },
    PostponeRevision {
        task_id: String,
    },
    BuyTheme {
        id: String,
        price: u32,
    },
    BuyFont {
        id: String,
        price: u32,
    },
    BuySticker {
        id: String,
        price: u32,
    },
    SetTheme {
        id: String,
    },
    SetFont {
        id: String,
    },
    PlaceSticker {
        sticker_id: String,
        x: f64,
        y: f64,
    },
    RemoveSticker {
        instance_id: String,
    },
    SetDailyMode(DailyMode),
    SetTargetDate(NaiveDate),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::CompleteOnboarding { .. } => "complete_onboarding",
            Action::LogLecture { .. } => "log_lecture",
            Action::LogPractice { .. } => "log_practice",
            Action::LogManualRevision { .. } => "log_manual_revision",
            Action::MarkRevisionDone { .. } => "mark_revision_done",
            Action::CompleteRevision { .. } => "complete_revision",
            Action::PostponeRevision { .. } => "postpone_revision",
            Action::BuyTheme { .. } => "buy_theme",
            Action::BuyFont { .. } => "buy_font",
            Action::BuySticker { .. } => "buy_sticker",
            Action::SetTheme { .. } => "set_theme",
            Action::SetFont { .. } => "set_font",
            Action::PlaceSticker { .. } => "place_sticker",
            Action::RemoveSticker { .. } => "remove_sticker",
            Action::SetDailyMode(_) => "set_daily_mode",
            Action::SetTargetDate(_) => "set_target_date",
        }
    }
}

/// Why an action left the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("no revision with that id")]
    UnknownRevision,

    #[error("revision is already {}", .0.label().to_lowercase())]
    RevisionClosed(RevisionStatus),

    #[error("not enough ink: need {needed}, have {available}")]
    InsufficientInk { needed: i64, available: i64 },

    #[error("already unlocked")]
    AlreadyOwned,

    #[error("not unlocked yet")]
    NotOwned,

    #[error("no placed sticker with that id")]
    UnknownPlacement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored(Rejection),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

pub fn reduce(state: &mut UserState, action: Action, now: DateTime<Utc>) -> Outcome {
    let kind = action.name();
    let outcome = match action {
        Action::CompleteOnboarding {
            name,
            goal,
            subjects,
            title,
        } => complete_onboarding(state, name, goal, subjects, title, now),
        Action::LogLecture {
            subject,
            topic,
            minutes,
        } => log_lecture(state, subject, topic, minutes, now),
        Action::LogPractice {
            subject,
            topic,
            attempted,
            incorrect,
        } => log_practice(state, subject, topic, attempted, incorrect, now),
        Action::LogManualRevision {
            subject,
            topic,
            minutes,
            attempted,
            incorrect,
        } => log_manual_revision(state, subject, topic, minutes, attempted, incorrect, now),
        Action::MarkRevisionDone { task_id } => close_revision(state, &task_id, None, now),
        Action::CompleteRevision { task_id, stats } => {
            close_revision(state, &task_id, Some(stats), now)
        }
        Action::PostponeRevision { task_id } => postpone_revision(state, &task_id),
        Action::BuyTheme { id, price } => {
            buy(&mut state.unlocked_themes, &mut state.ink_points, id, price)
        }
        Action::BuyFont { id, price } => {
            buy(&mut state.unlocked_fonts, &mut state.ink_points, id, price)
        }
        Action::BuySticker { id, price } => {
            buy(&mut state.unlocked_stickers, &mut state.ink_points, id, price)
        }
        Action::SetTheme { id } => equip(&state.unlocked_themes, &mut state.current_theme_id, id),
        Action::SetFont { id } => equip(&state.unlocked_fonts, &mut state.current_font_id, id),
        Action::PlaceSticker { sticker_id, x, y } => place_sticker(state, sticker_id, x, y),
        Action::RemoveSticker { instance_id } => remove_sticker(state, &instance_id),
        Action::SetDailyMode(mode) => {
            state.daily_mode = mode;
            Outcome::Applied
        }
        Action::SetTargetDate(day) => {
            state.target_date = Some(day);
            Outcome::Applied
        }
    };

    match outcome {
        Outcome::Applied => debug!(action = kind, ink = state.ink_points, "action applied"),
        Outcome::Ignored(reason) => debug!(action = kind, %reason, "action ignored"),
    }
    outcome
}

/// The equipped theme. Unknown ids resolve to the first catalog theme.
pub fn current_theme(state: &UserState) -> &'static Theme {
    catalog::resolve_theme(&state.current_theme_id)
}

/// The equipped font. Unknown ids resolve to the first catalog font.
pub fn current_font(state: &UserState) -> &'static Font {
    catalog::resolve_font(&state.current_font_id)
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn complete_onboarding(
    state: &mut UserState,
    name: String,
    goal: ExamGoal,
    subjects: Vec<String>,
    title: String,
    now: DateTime<Utc>,
) -> Outcome {
    let persona = catalog::persona(goal);
    let theme_id = persona.default_theme_id.to_string();

    if !state.owns_theme(&theme_id) {
        state.unlocked_themes.push(theme_id.clone());
    }
    state.user_name = name;
    state.user_title = title;
    state.exam_goal = goal;
    state.subjects = subjects;
    state.target_date = now
        .date_naive()
        .checked_add_months(Months::new(ONBOARDING_TARGET_MONTHS));
    state.current_theme_id = theme_id;
    Outcome::Applied
}

fn push_session(state: &mut UserState, session: StudySession) {
    state.sessions.insert(0, session);
}

fn log_lecture(
    state: &mut UserState,
    subject: String,
    topic: String,
    minutes: u32,
    now: DateTime<Utc>,
) -> Outcome {
    let session = StudySession {
        id: new_id(),
        level: SessionLevel::Lecture,
        subject,
        topic,
        duration_minutes: Some(minutes),
        questions_attempted: None,
        questions_incorrect: None,
        questions_correct: None,
        date: now,
    };

    let today = now.date_naive();
    let scheduled = REVISION_OFFSETS_DAYS.iter().map(|days| RevisionTask {
        id: new_id(),
        original_session_id: session.id.clone(),
        subject: session.subject.clone(),
        topic: session.topic.clone(),
        scheduled_date: today + Duration::days(*days),
        status: RevisionStatus::Pending,
        completed_date: None,
        duration_minutes: None,
        questions_attempted: None,
        questions_incorrect: None,
        questions_correct: None,
    });
    state.revisions.extend(scheduled);

    state.ink_points += lecture_ink(minutes);
    push_session(state, session);
    Outcome::Applied
}

fn log_practice(
    state: &mut UserState,
    subject: String,
    topic: String,
    attempted: u32,
    incorrect: u32,
    now: DateTime<Utc>,
) -> Outcome {
    let correct = correct_answers(attempted, incorrect);
    state.ink_points += practice_ink(correct);
    push_session(
        state,
        StudySession {
            id: new_id(),
            level: SessionLevel::Practice,
            subject,
            topic,
            duration_minutes: None,
            questions_attempted: Some(attempted),
            questions_incorrect: Some(incorrect),
            questions_correct: Some(correct),
            date: now,
        },
    );
    Outcome::Applied
}

// Freeform revision log; scheduled tasks are not touched
fn log_manual_revision(
    state: &mut UserState,
    subject: String,
    topic: String,
    minutes: u32,
    attempted: u32,
    incorrect: u32,
    now: DateTime<Utc>,
) -> Outcome {
    let correct = correct_answers(attempted, incorrect);
    state.ink_points += combined_ink(minutes, correct);
    push_session(
        state,
        StudySession {
            id: new_id(),
            level: SessionLevel::Manual,
            subject,
            topic,
            duration_minutes: Some(minutes),
            questions_attempted: Some(attempted),
            questions_incorrect: Some(incorrect),
            questions_correct: Some(correct),
            date: now,
        },
    );
    Outcome::Applied
}

fn pending_revision<'a>(
    state: &'a mut UserState,
    task_id: &str,
) -> Result<&'a mut RevisionTask, Rejection> {
    let task = state
        .revisions
        .iter_mut()
        .find(|r| r.id == task_id)
        .ok_or(Rejection::UnknownRevision)?;
    if task.status != RevisionStatus::Pending {
        return Err(Rejection::RevisionClosed(task.status));
    }
    Ok(task)
}

// Shared by "mark done" (no stats) and "complete" (with stats)
fn close_revision(
    state: &mut UserState,
    task_id: &str,
    stats: Option<RevisionStats>,
    now: DateTime<Utc>,
) -> Outcome {
    let task = match pending_revision(state, task_id) {
        Ok(task) => task,
        Err(reason) => return Outcome::Ignored(reason),
    };

    task.status = RevisionStatus::Completed;
    task.completed_date = Some(now);
    if let Some(s) = &stats {
        task.duration_minutes = Some(s.duration_minutes);
        task.questions_attempted = Some(s.questions_attempted);
        task.questions_incorrect = Some(s.questions_incorrect);
        task.questions_correct = Some(correct_answers(
            s.questions_attempted,
            s.questions_incorrect,
        ));
    }

    state.ink_points += revision_ink(stats.as_ref());
    Outcome::Applied
}

fn postpone_revision(state: &mut UserState, task_id: &str) -> Outcome {
    let available = state.ink_points;
    let task = match pending_revision(state, task_id) {
        Ok(task) => task,
        Err(reason) => return Outcome::Ignored(reason),
    };
    if available < COST_POSTPONE {
        return Outcome::Ignored(Rejection::InsufficientInk {
            needed: COST_POSTPONE,
            available,
        });
    }

    task.status = RevisionStatus::Skipped;
    state.ink_points -= COST_POSTPONE;
    Outcome::Applied
}

fn buy(owned: &mut Vec<String>, ink: &mut i64, id: String, price: u32) -> Outcome {
    if owned.contains(&id) {
        return Outcome::Ignored(Rejection::AlreadyOwned);
    }
    let price = i64::from(price);
    if *ink < price {
        return Outcome::Ignored(Rejection::InsufficientInk {
            needed: price,
            available: *ink,
        });
    }

    *ink -= price;
    owned.push(id);
    Outcome::Applied
}

fn equip(owned: &[String], current: &mut String, id: String) -> Outcome {
    if !owned.contains(&id) {
        return Outcome::Ignored(Rejection::NotOwned);
    }
    *current = id;
    Outcome::Applied
}

fn place_sticker(state: &mut UserState, sticker_id: String, x: f64, y: f64) -> Outcome {
    // Ownership is deliberately not enforced here
    if !state.owns_sticker(&sticker_id) {
        debug!(sticker = %sticker_id, "placing a sticker that was never bought");
    }
    state.placed_stickers.push(PlacedSticker {
        id: new_id(),
        sticker_id,
        x,
        y,
    });
    Outcome::Applied
}

fn remove_sticker(state: &mut UserState, instance_id: &str) -> Outcome {
    let before = state.placed_stickers.len();
    state.placed_stickers.retain(|s| s.id != instance_id);
    if state.placed_stickers.len() == before {
        return Outcome::Ignored(Rejection::UnknownPlacement);
    }
    Outcome::Applied
}
