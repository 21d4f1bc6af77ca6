//! Read-only views derived from the session and revision history.
//!
//! Nothing here is cached: every function recomputes from `UserState`, and
//! "today" is always passed in so results are reproducible.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

use crate::models::{RevisionStatus, RevisionTask, SessionLevel, StudySession, UserState};
use crate::rewards::{
    combined_ink, correct_answers, lecture_ink, practice_ink, revision_ink,
    ASSUMED_REVISION_MINUTES,
};

pub const HEAT_WINDOW_DAYS: i64 = 28;
pub const TREND_WINDOW_DAYS: i64 = 7;

// Half rounds toward positive infinity
fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

fn completed_revisions(state: &UserState) -> impl Iterator<Item = &RevisionTask> {
    state
        .revisions
        .iter()
        .filter(|r| r.is_completed() && r.completed_date.is_some())
}

fn completion_day(task: &RevisionTask) -> Option<NaiveDate> {
    task.completed_date.map(|d| d.date_naive())
}

// Minutes a completed revision contributes to time charts
fn charted_minutes(task: &RevisionTask) -> u32 {
    task.duration_minutes
        .filter(|m| *m > 0)
        .unwrap_or(ASSUMED_REVISION_MINUTES)
}

/// Percentage of questions answered correctly, 0 when nothing was attempted.
pub fn accuracy(state: &UserState) -> u32 {
    let mut total: u64 = 0;
    let mut correct: u64 = 0;

    for s in &state.sessions {
        if matches!(s.level, SessionLevel::Practice | SessionLevel::Manual) {
            total += u64::from(s.attempted());
            correct += u64::from(s.correct());
        }
    }
    for r in state.revisions.iter().filter(|r| r.is_completed()) {
        let attempted = r.questions_attempted.unwrap_or(0);
        total += u64::from(attempted);
        correct += u64::from(correct_answers(
            attempted,
            r.questions_incorrect.unwrap_or(0),
        ));
    }

    if total == 0 {
        return 0;
    }
    round_half_up(100.0 * correct as f64 / total as f64) as u32
}

/// Questions per hour over records that logged both time and questions.
pub fn speed(state: &UserState) -> u32 {
    let mut minutes: u64 = 0;
    let mut questions: u64 = 0;

    let manual = state
        .sessions
        .iter()
        .filter(|s| s.level == SessionLevel::Manual)
        .map(|s| (s.minutes(), s.attempted()));
    let revised = state
        .revisions
        .iter()
        .filter(|r| r.is_completed())
        .map(|r| {
            (
                r.duration_minutes.unwrap_or(0),
                r.questions_attempted.unwrap_or(0),
            )
        });

    for (m, q) in manual.chain(revised) {
        if m > 0 && q > 0 {
            minutes += u64::from(m);
            questions += u64::from(q);
        }
    }

    if minutes == 0 {
        return 0;
    }
    round_half_up(questions as f64 * 60.0 / minutes as f64) as u32
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectGrowth {
    pub subject: String,
    pub current: u64,
    pub previous: u64,
    pub delta: i64,
    pub percent: i64,
}

pub fn growth_percent(current: u64, previous: u64) -> i64 {
    if previous > 0 {
        let delta = current as f64 - previous as f64;
        round_half_up(100.0 * delta / previous as f64)
    } else if current > 0 {
        100
    } else {
        0
    }
}

/// Sunday on or before `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_sunday()))
}

/// Study minutes per subject, this calendar week against the previous one.
///
/// Every onboarding subject gets a row even when idle; other subjects appear
/// once they have activity in either week. Sorted by this week's minutes,
/// busiest first.
pub fn weekly_growth(state: &UserState, today: NaiveDate) -> Vec<SubjectGrowth> {
    let this_week = week_start(today);
    let last_week = this_week - Duration::days(7);
    let next_week = this_week + Duration::days(7);

    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, (u64, u64)> = HashMap::new();
    for subject in &state.subjects {
        if !totals.contains_key(subject) {
            totals.insert(subject.clone(), (0, 0));
            order.push(subject.clone());
        }
    }

    let mut record = |day: NaiveDate, subject: &str, minutes: u32| {
        let bucket = if day >= this_week && day < next_week {
            0
        } else if day >= last_week && day < this_week {
            1
        } else {
            return;
        };
        let entry = totals.entry(subject.to_string()).or_insert_with(|| {
            order.push(subject.to_string());
            (0, 0)
        });
        if bucket == 0 {
            entry.0 += u64::from(minutes);
        } else {
            entry.1 += u64::from(minutes);
        }
    };

    for s in state.sessions.iter().filter(|s| s.minutes() > 0) {
        record(s.day(), &s.subject, s.minutes());
    }
    for r in completed_revisions(state) {
        if let Some(day) = completion_day(r) {
            record(day, &r.subject, charted_minutes(r));
        }
    }

    let mut rows: Vec<SubjectGrowth> = order
        .into_iter()
        .map(|subject| {
            let (current, previous) = totals.get(&subject).copied().unwrap_or((0, 0));
            SubjectGrowth {
                delta: current as i64 - previous as i64,
                percent: growth_percent(current, previous),
                subject,
                current,
                previous,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.current.cmp(&a.current));
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatTier {
    Idle,
    Light,
    Steady,
    Strong,
    Intense,
}

impl HeatTier {
    pub fn for_ink(ink: i64) -> Self {
        match ink {
            i64::MIN..=0 => HeatTier::Idle,
            1..=50 => HeatTier::Light,
            51..=100 => HeatTier::Steady,
            101..=200 => HeatTier::Strong,
            _ => HeatTier::Intense,
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            HeatTier::Idle => '.',
            HeatTier::Light => '░',
            HeatTier::Steady => '▒',
            HeatTier::Strong => '▓',
            HeatTier::Intense => '█',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeatDay {
    pub day: NaiveDate,
    pub ink: i64,
    pub tier: HeatTier,
}

/// Ink a session earned when it was logged.
pub fn session_ink(session: &StudySession) -> i64 {
    match session.level {
        SessionLevel::Lecture => lecture_ink(session.minutes()),
        SessionLevel::Practice => practice_ink(session.correct()),
        SessionLevel::Manual => combined_ink(session.minutes(), session.correct()),
    }
}

/// Ink earned per day over the last 28 days, oldest first.
pub fn heat_index(state: &UserState, today: NaiveDate) -> Vec<HeatDay> {
    let first = today - Duration::days(HEAT_WINDOW_DAYS - 1);
    let mut earned: HashMap<NaiveDate, i64> = HashMap::new();

    for s in &state.sessions {
        *earned.entry(s.day()).or_insert(0) += session_ink(s);
    }
    for r in completed_revisions(state) {
        if let Some(day) = completion_day(r) {
            *earned.entry(day).or_insert(0) += revision_ink(r.recorded_stats().as_ref());
        }
    }

    (0..HEAT_WINDOW_DAYS)
        .map(|offset| {
            let day = first + Duration::days(offset);
            let ink = earned.get(&day).copied().unwrap_or(0);
            HeatDay {
                day,
                ink,
                tier: HeatTier::for_ink(ink),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Due {
    DueToday,
    Overdue,
}

impl Due {
    pub fn label(&self) -> &'static str {
        match self {
            Due::DueToday => "Due Today",
            Due::Overdue => "Overdue",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DueRevision<'a> {
    pub task: &'a RevisionTask,
    pub due: Due,
}

/// Pending revisions scheduled on or before `today`, oldest first.
pub fn due_revisions(state: &UserState, today: NaiveDate) -> Vec<DueRevision<'_>> {
    let mut due: Vec<DueRevision<'_>> = state
        .revisions
        .iter()
        .filter(|r| r.is_pending() && r.scheduled_date <= today)
        .map(|task| DueRevision {
            task,
            due: if task.scheduled_date == today {
                Due::DueToday
            } else {
                Due::Overdue
            },
        })
        .collect();
    due.sort_by_key(|d| d.task.scheduled_date);
    due
}

pub fn upcoming_revisions(state: &UserState, today: NaiveDate) -> Vec<&RevisionTask> {
    let mut upcoming: Vec<&RevisionTask> = state
        .revisions
        .iter()
        .filter(|r| r.is_pending() && r.scheduled_date > today)
        .collect();
    upcoming.sort_by_key(|r| r.scheduled_date);
    upcoming
}

pub fn sessions_on(state: &UserState, day: NaiveDate) -> Vec<&StudySession> {
    state.sessions.iter().filter(|s| s.day() == day).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayTotals {
    pub day: NaiveDate,
    pub minutes: u64,
    pub questions: u64,
}

/// Minutes and questions per day for the week ending `today`.
pub fn daily_trend(state: &UserState, today: NaiveDate) -> Vec<DayTotals> {
    (0..TREND_WINDOW_DAYS)
        .rev()
        .map(|back| {
            let day = today - Duration::days(back);
            let mut totals = DayTotals {
                day,
                minutes: 0,
                questions: 0,
            };
            for s in sessions_on(state, day) {
                totals.minutes += u64::from(s.minutes());
                totals.questions += u64::from(s.attempted());
            }
            for r in completed_revisions(state).filter(|r| completion_day(r) == Some(day)) {
                totals.minutes += u64::from(charted_minutes(r));
                totals.questions += u64::from(r.questions_attempted.unwrap_or(0));
            }
            totals
        })
        .collect()
}

/// Days left until the exam; negative once it has passed.
pub fn days_until_target(state: &UserState, today: NaiveDate) -> Option<i64> {
    state.target_date.map(|t| (t - today).num_days())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub sessions: usize,
    pub minutes: u64,
    pub questions: u64,
    pub pending_revisions: usize,
    pub due_revisions: usize,
    pub completed_revisions: usize,
    pub skipped_revisions: usize,
    pub ink_points: i64,
    pub days_until_target: Option<i64>,
}

pub fn summary(state: &UserState, today: NaiveDate) -> Summary {
    let mut minutes: u64 = state.sessions.iter().map(|s| u64::from(s.minutes())).sum();
    let mut questions: u64 = state.sessions.iter().map(|s| u64::from(s.attempted())).sum();
    for r in state.revisions.iter().filter(|r| r.is_completed()) {
        minutes += u64::from(r.duration_minutes.unwrap_or(0));
        questions += u64::from(r.questions_attempted.unwrap_or(0));
    }

    let count = |status: RevisionStatus| state.revisions.iter().filter(|r| r.status == status).count();

    Summary {
        sessions: state.sessions.len(),
        minutes,
        questions,
        pending_revisions: count(RevisionStatus::Pending),
        due_revisions: due_revisions(state, today).len(),
        completed_revisions: count(RevisionStatus::Completed),
        skipped_revisions: count(RevisionStatus::Skipped),
        ink_points: state.ink_points,
        days_until_target: days_until_target(state, today),
    }
}

/// Everything the weekly report shows, in one serializable bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub accuracy: u32,
    pub speed: u32,
    pub growth: Vec<SubjectGrowth>,
    pub heat: Vec<HeatDay>,
    pub trend: Vec<DayTotals>,
}

pub fn report(state: &UserState, today: NaiveDate) -> Report {
    Report {
        accuracy: accuracy(state),
        speed: speed(state),
        growth: weekly_growth(state, today),
        heat: heat_index(state, today),
        trend: daily_trend(state, today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(d: NaiveDate, hour: u32) -> DateTime<Utc> {
        Utc.from_utc_datetime(&d.and_hms_opt(hour, 0, 0).unwrap())
    }

    // 2024-03-06 is a Wednesday; its week starts Sunday 2024-03-03
    fn today() -> NaiveDate {
        day(2024, 3, 6)
    }

    fn session(
        level: SessionLevel,
        subject: &str,
        minutes: Option<u32>,
        attempted: Option<u32>,
        incorrect: Option<u32>,
        on: NaiveDate,
    ) -> StudySession {
        StudySession {
            id: format!("{}-{}-{}", subject, on, level.as_u8()),
            level,
            subject: subject.to_string(),
            topic: "Topic".to_string(),
            duration_minutes: minutes,
            questions_attempted: attempted,
            questions_incorrect: incorrect,
            questions_correct: attempted.map(|a| correct_answers(a, incorrect.unwrap_or(0))),
            date: at(on, 9),
        }
    }

    fn revision(id: &str, subject: &str, scheduled: NaiveDate) -> RevisionTask {
        RevisionTask {
            id: id.to_string(),
            original_session_id: "s".to_string(),
            subject: subject.to_string(),
            topic: "Topic".to_string(),
            scheduled_date: scheduled,
            status: RevisionStatus::Pending,
            completed_date: None,
            duration_minutes: None,
            questions_attempted: None,
            questions_incorrect: None,
            questions_correct: None,
        }
    }

    fn completed(
        id: &str,
        subject: &str,
        on: NaiveDate,
        stats: Option<(u32, u32, u32)>,
    ) -> RevisionTask {
        let mut task = revision(id, subject, on);
        task.status = RevisionStatus::Completed;
        task.completed_date = Some(at(on, 18));
        if let Some((minutes, attempted, incorrect)) = stats {
            task.duration_minutes = Some(minutes);
            task.questions_attempted = Some(attempted);
            task.questions_incorrect = Some(incorrect);
            task.questions_correct = Some(correct_answers(attempted, incorrect));
        }
        task
    }

    mod efficiency_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn accuracy_zero_without_questions() {
            let mut state = UserState::default();
            state.sessions.push(session(
                SessionLevel::Lecture,
                "Physics",
                Some(60),
                None,
                None,
                today(),
            ));
            assert_eq!(accuracy(&state), 0);
        }

        #[test]
        fn accuracy_combines_sessions_and_revisions() {
            let mut state = UserState::default();
            state.sessions.push(session(
                SessionLevel::Practice,
                "Chem",
                None,
                Some(20),
                Some(5),
                today(),
            ));
            state
                .revisions
                .push(completed("r1", "Chem", today(), Some((30, 10, 5))));
            // (15 + 5) / 30
            assert_eq!(accuracy(&state), 67);
        }

        #[test]
        fn accuracy_ignores_pending_revisions() {
            let mut state = UserState::default();
            let mut pending = revision("r1", "Chem", today());
            pending.questions_attempted = Some(10);
            state.revisions.push(pending);
            assert_eq!(accuracy(&state), 0);
        }

        #[test]
        fn speed_zero_without_timed_questions() {
            let mut state = UserState::default();
            state.sessions.push(session(
                SessionLevel::Practice,
                "Chem",
                None,
                Some(40),
                Some(0),
                today(),
            ));
            assert_eq!(speed(&state), 0);
        }

        #[test]
        fn speed_uses_manual_sessions_and_revisions() {
            let mut state = UserState::default();
            state.sessions.push(session(
                SessionLevel::Manual,
                "Maths",
                Some(30),
                Some(20),
                Some(2),
                today(),
            ));
            state
                .revisions
                .push(completed("r1", "Maths", today(), Some((30, 10, 0))));
            // 30 questions in one hour
            assert_eq!(speed(&state), 30);
        }

        #[test]
        fn speed_skips_records_missing_either_side() {
            let mut state = UserState::default();
            state.sessions.push(session(
                SessionLevel::Manual,
                "Maths",
                Some(45),
                Some(0),
                Some(0),
                today(),
            ));
            state
                .revisions
                .push(completed("r1", "Maths", today(), Some((0, 12, 0))));
            state.sessions.push(session(
                SessionLevel::Manual,
                "Maths",
                Some(20),
                Some(10),
                Some(0),
                today(),
            ));
            assert_eq!(speed(&state), 30);
        }
    }

    mod growth_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn week_starts_on_sunday() {
            assert_eq!(week_start(today()), day(2024, 3, 3));
            assert_eq!(week_start(day(2024, 3, 3)), day(2024, 3, 3));
            assert_eq!(week_start(day(2024, 3, 9)), day(2024, 3, 3));
        }

        #[test]
        fn percent_rules() {
            assert_eq!(growth_percent(90, 60), 50);
            assert_eq!(growth_percent(30, 60), -50);
            assert_eq!(growth_percent(30, 0), 100);
            assert_eq!(growth_percent(0, 0), 0);
            assert_eq!(growth_percent(1, 3), -67);
        }

        #[test]
        fn large_minute_totals_do_not_overflow() {
            let mut state = UserState::default();
            for _ in 0..3 {
                state.sessions.push(session(
                    SessionLevel::Lecture,
                    "Physics",
                    Some(u32::MAX),
                    None,
                    None,
                    day(2024, 3, 4),
                ));
            }
            let rows = weekly_growth(&state, today());
            assert_eq!(rows[0].current, 3 * u64::from(u32::MAX));
            assert_eq!(rows[0].previous, 0);
            assert_eq!(rows[0].percent, 100);
        }

        #[test]
        fn buckets_by_calendar_week() {
            let mut state = UserState::default();
            state.subjects = vec!["Physics".to_string(), "Biology".to_string()];
            // this week
            state.sessions.push(session(
                SessionLevel::Lecture,
                "Physics",
                Some(90),
                None,
                None,
                day(2024, 3, 3),
            ));
            // last week
            state.sessions.push(session(
                SessionLevel::Lecture,
                "Physics",
                Some(60),
                None,
                None,
                day(2024, 3, 2),
            ));
            // two weeks ago, outside both windows
            state.sessions.push(session(
                SessionLevel::Lecture,
                "Physics",
                Some(500),
                None,
                None,
                day(2024, 2, 24),
            ));

            let rows = weekly_growth(&state, today());
            assert_eq!(
                rows,
                vec![
                    SubjectGrowth {
                        subject: "Physics".to_string(),
                        current: 90,
                        previous: 60,
                        delta: 30,
                        percent: 50,
                    },
                    SubjectGrowth {
                        subject: "Biology".to_string(),
                        current: 0,
                        previous: 0,
                        delta: 0,
                        percent: 0,
                    },
                ]
            );
        }

        #[test]
        fn completed_revisions_default_to_fifteen_minutes() {
            let mut state = UserState::default();
            state.subjects = vec!["Biology".to_string()];
            state
                .revisions
                .push(completed("r1", "Biology", today(), None));
            state
                .revisions
                .push(completed("r2", "Biology", today(), Some((40, 0, 0))));

            let rows = weekly_growth(&state, today());
            assert_eq!(rows[0].current, 55);
            assert_eq!(rows[0].percent, 100);
        }

        #[test]
        fn unlisted_subjects_appear_and_sort_first_when_busier() {
            let mut state = UserState::default();
            state.subjects = vec!["Physics".to_string()];
            state.sessions.push(session(
                SessionLevel::Manual,
                "History",
                Some(30),
                Some(5),
                Some(1),
                today(),
            ));

            let rows = weekly_growth(&state, today());
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].subject, "History");
            assert_eq!(rows[1].subject, "Physics");
        }

        #[test]
        fn practice_sessions_carry_no_minutes() {
            let mut state = UserState::default();
            state.subjects = vec!["Chem".to_string()];
            state.sessions.push(session(
                SessionLevel::Practice,
                "Chem",
                None,
                Some(20),
                Some(5),
                today(),
            ));
            assert_eq!(weekly_growth(&state, today())[0].current, 0);
        }
    }

    mod heat_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn tier_thresholds() {
            assert_eq!(HeatTier::for_ink(0), HeatTier::Idle);
            assert_eq!(HeatTier::for_ink(1), HeatTier::Light);
            assert_eq!(HeatTier::for_ink(50), HeatTier::Light);
            assert_eq!(HeatTier::for_ink(51), HeatTier::Steady);
            assert_eq!(HeatTier::for_ink(100), HeatTier::Steady);
            assert_eq!(HeatTier::for_ink(101), HeatTier::Strong);
            assert_eq!(HeatTier::for_ink(200), HeatTier::Strong);
            assert_eq!(HeatTier::for_ink(201), HeatTier::Intense);
            assert_eq!(HeatTier::Idle.glyph(), '.');
            assert_eq!(HeatTier::Intense.glyph(), '█');
        }

        #[test]
        fn covers_twenty_eight_days_ending_today() {
            let heat = heat_index(&UserState::default(), today());
            assert_eq!(heat.len(), 28);
            assert_eq!(heat[0].day, day(2024, 2, 8));
            assert_eq!(heat[27].day, today());
            assert!(heat.iter().all(|d| d.tier == HeatTier::Idle));
        }

        #[test]
        fn sums_ink_per_day() {
            let mut state = UserState::default();
            state.sessions.push(session(
                SessionLevel::Lecture,
                "Physics",
                Some(61),
                None,
                None,
                today(),
            ));
            state.sessions.push(session(
                SessionLevel::Practice,
                "Chem",
                None,
                Some(20),
                Some(5),
                today(),
            ));
            state
                .revisions
                .push(completed("r1", "Physics", today(), None));
            state
                .revisions
                .push(completed("r2", "Physics", today(), Some((30, 10, 3))));

            let heat = heat_index(&state, today());
            // 30 + 7 + 10 + 28
            assert_eq!(heat[27].ink, 75);
            assert_eq!(heat[27].tier, HeatTier::Steady);
        }

        #[test]
        fn ignores_activity_outside_window() {
            let mut state = UserState::default();
            state.sessions.push(session(
                SessionLevel::Lecture,
                "Physics",
                Some(600),
                None,
                None,
                day(2024, 2, 7),
            ));
            let heat = heat_index(&state, today());
            assert!(heat.iter().all(|d| d.ink == 0));
        }

        #[test]
        fn session_ink_matches_logging_credit() {
            let manual = session(
                SessionLevel::Manual,
                "Biology",
                Some(45),
                Some(12),
                Some(0),
                today(),
            );
            assert_eq!(session_ink(&manual), 28);
        }
    }

    mod revision_view_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn due_revisions_tags_and_sorts() {
            let mut state = UserState::default();
            state.revisions.push(revision("today", "A", today()));
            state.revisions.push(revision("old", "A", day(2024, 3, 1)));
            state.revisions.push(revision("future", "A", day(2024, 3, 9)));
            let mut skipped = revision("skipped", "A", day(2024, 3, 2));
            skipped.status = RevisionStatus::Skipped;
            state.revisions.push(skipped);

            let due = due_revisions(&state, today());
            let ids: Vec<&str> = due.iter().map(|d| d.task.id.as_str()).collect();
            assert_eq!(ids, vec!["old", "today"]);
            assert_eq!(due[0].due, Due::Overdue);
            assert_eq!(due[1].due, Due::DueToday);
        }

        #[test]
        fn upcoming_excludes_due() {
            let mut state = UserState::default();
            state.revisions.push(revision("later", "A", day(2024, 3, 20)));
            state.revisions.push(revision("soon", "A", day(2024, 3, 7)));
            state.revisions.push(revision("now", "A", today()));

            let ids: Vec<&str> = upcoming_revisions(&state, today())
                .iter()
                .map(|r| r.id.as_str())
                .collect();
            assert_eq!(ids, vec!["soon", "later"]);
        }

        #[test]
        fn sessions_on_filters_by_day() {
            let mut state = UserState::default();
            state.sessions.push(session(
                SessionLevel::Lecture,
                "A",
                Some(10),
                None,
                None,
                today(),
            ));
            state.sessions.push(session(
                SessionLevel::Lecture,
                "B",
                Some(10),
                None,
                None,
                day(2024, 3, 5),
            ));
            let found = sessions_on(&state, today());
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].subject, "A");
        }
    }

    mod trend_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn seven_days_oldest_first() {
            let trend = daily_trend(&UserState::default(), today());
            assert_eq!(trend.len(), 7);
            assert_eq!(trend[0].day, day(2024, 2, 29));
            assert_eq!(trend[6].day, today());
        }

        #[test]
        fn large_daily_totals_do_not_overflow() {
            let mut state = UserState::default();
            for _ in 0..2 {
                state.sessions.push(session(
                    SessionLevel::Manual,
                    "Physics",
                    Some(u32::MAX),
                    Some(u32::MAX),
                    Some(0),
                    today(),
                ));
            }
            let trend = daily_trend(&state, today());
            assert_eq!(trend[6].minutes, 2 * u64::from(u32::MAX));
            assert_eq!(trend[6].questions, 2 * u64::from(u32::MAX));
        }

        #[test]
        fn adds_sessions_and_revisions() {
            let mut state = UserState::default();
            state.sessions.push(session(
                SessionLevel::Manual,
                "A",
                Some(30),
                Some(10),
                Some(2),
                today(),
            ));
            state.revisions.push(completed("r1", "A", today(), None));
            state
                .revisions
                .push(completed("r2", "A", today(), Some((20, 5, 0))));

            let trend = daily_trend(&state, today());
            assert_eq!(trend[6].minutes, 65);
            assert_eq!(trend[6].questions, 15);
        }
    }

    mod summary_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn countdown_to_target() {
            let mut state = UserState::default();
            assert_eq!(days_until_target(&state, today()), None);
            state.target_date = Some(day(2024, 3, 16));
            assert_eq!(days_until_target(&state, today()), Some(10));
            state.target_date = Some(day(2024, 3, 1));
            assert_eq!(days_until_target(&state, today()), Some(-5));
        }

        #[test]
        fn summary_counts() {
            let mut state = UserState::default();
            state.sessions.push(session(
                SessionLevel::Lecture,
                "A",
                Some(60),
                None,
                None,
                today(),
            ));
            state.revisions.push(revision("r1", "A", today()));
            state.revisions.push(revision("r2", "A", day(2024, 3, 10)));
            state
                .revisions
                .push(completed("r3", "A", today(), Some((15, 4, 1))));
            let mut skipped = revision("r4", "A", today());
            skipped.status = RevisionStatus::Skipped;
            state.revisions.push(skipped);

            let s = summary(&state, today());
            assert_eq!(s.sessions, 1);
            assert_eq!(s.minutes, 75);
            assert_eq!(s.questions, 4);
            assert_eq!(s.pending_revisions, 2);
            assert_eq!(s.due_revisions, 1);
            assert_eq!(s.completed_revisions, 1);
            assert_eq!(s.skipped_revisions, 1);
            assert_eq!(s.ink_points, 200);
        }
    }
}
