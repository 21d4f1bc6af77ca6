use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{DEFAULT_FONT_ID, DEFAULT_THEME_ID};
use crate::rewards::STARTING_INK;

// Exam the user is preparing for; drives the persona defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExamGoal {
    #[serde(rename = "NEET")]
    Neet,
    #[serde(rename = "JEE")]
    Jee,
    #[serde(rename = "UPSC")]
    Upsc,
    Custom,
    #[default]
    #[serde(rename = "")]
    Unset,
}

impl ExamGoal {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "neet" | "medical" => Some(ExamGoal::Neet),
            "jee" | "engineering" => Some(ExamGoal::Jee),
            "upsc" | "civil" => Some(ExamGoal::Upsc),
            "custom" | "other" => Some(ExamGoal::Custom),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExamGoal::Neet => "NEET",
            ExamGoal::Jee => "JEE",
            ExamGoal::Upsc => "UPSC",
            ExamGoal::Custom => "Custom",
            ExamGoal::Unset => "Not chosen",
        }
    }
}

// Session kinds: 1 = lecture (time), 2 = practice (questions), 3 = manual revision (both)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SessionLevel {
    Lecture = 1,
    Practice = 2,
    Manual = 3,
}

impl SessionLevel {
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(SessionLevel::Lecture),
            2 => Some(SessionLevel::Practice),
            3 => Some(SessionLevel::Manual),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionLevel::Lecture => "Lecture",
            SessionLevel::Practice => "Practice",
            SessionLevel::Manual => "Revision",
        }
    }
}

impl From<SessionLevel> for u8 {
    fn from(level: SessionLevel) -> Self {
        level.as_u8()
    }
}

impl TryFrom<u8> for SessionLevel {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        SessionLevel::from_u8(v).ok_or_else(|| format!("unknown session level {}", v))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevisionStatus {
    Pending,
    Completed,
    Skipped,
}

impl RevisionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RevisionStatus::Pending => "Pending",
            RevisionStatus::Completed => "Completed",
            RevisionStatus::Skipped => "Skipped",
        }
    }
}

// Which logging form the dashboard opens with. Purely a UI hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DailyMode {
    #[default]
    #[serde(rename = "LEVEL_1")]
    Level1,
    #[serde(rename = "LEVEL_2")]
    Level2,
}

impl DailyMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "level_1" | "level1" | "1" | "lecture" => Some(DailyMode::Level1),
            "level_2" | "level2" | "2" | "practice" => Some(DailyMode::Level2),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DailyMode::Level1 => "Lecture",
            DailyMode::Level2 => "Practice",
        }
    }
}

// One logged study session. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    pub level: SessionLevel,
    pub subject: String,
    pub topic: String,
    #[serde(
        default,
        deserialize_with = "lenient_count::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_minutes: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_count::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub questions_attempted: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_count::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub questions_incorrect: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_count::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub questions_correct: Option<u32>,
    pub date: DateTime<Utc>,
}

impl StudySession {
    pub fn minutes(&self) -> u32 {
        self.duration_minutes.unwrap_or(0)
    }

    pub fn attempted(&self) -> u32 {
        self.questions_attempted.unwrap_or(0)
    }

    pub fn correct(&self) -> u32 {
        self.questions_correct.unwrap_or(0)
    }

    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

/// Performance recorded when a scheduled revision is worked through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionStats {
    pub duration_minutes: u32,
    pub questions_attempted: u32,
    pub questions_incorrect: u32,
}

// A spaced-repetition reminder spawned from a lecture session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionTask {
    pub id: String,
    pub original_session_id: String,
    pub subject: String,
    pub topic: String,
    pub scheduled_date: NaiveDate,
    pub status: RevisionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient_count::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_minutes: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_count::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub questions_attempted: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_count::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub questions_incorrect: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_count::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub questions_correct: Option<u32>,
}

impl RevisionTask {
    pub fn is_pending(&self) -> bool {
        self.status == RevisionStatus::Pending
    }

    pub fn is_completed(&self) -> bool {
        self.status == RevisionStatus::Completed
    }

    /// Stats captured by a full completion; `None` for a plain "done" tick.
    pub fn recorded_stats(&self) -> Option<RevisionStats> {
        if self.duration_minutes.is_none() && self.questions_attempted.is_none() {
            return None;
        }
        Some(RevisionStats {
            duration_minutes: self.duration_minutes.unwrap_or(0),
            questions_attempted: self.questions_attempted.unwrap_or(0),
            questions_incorrect: self.questions_incorrect.unwrap_or(0),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedSticker {
    pub id: String,
    pub sticker_id: String,
    pub x: f64,
    pub y: f64,
}

/// The whole persisted document. One instance per user, saved wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserState {
    // Identity
    pub user_name: String,
    pub user_title: String,
    pub exam_goal: ExamGoal,
    #[serde(with = "optional_day")]
    pub target_date: Option<NaiveDate>,
    pub subjects: Vec<String>,

    // Economy
    pub ink_points: i64,
    pub daily_mode: DailyMode,

    // History, newest session first
    pub sessions: Vec<StudySession>,
    pub revisions: Vec<RevisionTask>,

    // Cosmetics
    pub unlocked_themes: Vec<String>,
    pub current_theme_id: String,
    pub unlocked_fonts: Vec<String>,
    pub current_font_id: String,
    pub unlocked_stickers: Vec<String>,
    pub placed_stickers: Vec<PlacedSticker>,
}

impl Default for UserState {
    fn default() -> Self {
        Self {
            user_name: String::new(),
            user_title: String::new(),
            exam_goal: ExamGoal::Unset,
            target_date: None,
            subjects: Vec::new(),
            ink_points: STARTING_INK,
            daily_mode: DailyMode::Level1,
            sessions: Vec::new(),
            revisions: Vec::new(),
            unlocked_themes: vec![DEFAULT_THEME_ID.to_string()],
            current_theme_id: DEFAULT_THEME_ID.to_string(),
            unlocked_fonts: vec![DEFAULT_FONT_ID.to_string()],
            current_font_id: DEFAULT_FONT_ID.to_string(),
            unlocked_stickers: Vec::new(),
            placed_stickers: Vec::new(),
        }
    }
}

impl UserState {
    pub fn is_onboarded(&self) -> bool {
        self.exam_goal != ExamGoal::Unset
    }

    pub fn owns_theme(&self, id: &str) -> bool {
        self.unlocked_themes.iter().any(|t| t == id)
    }

    pub fn owns_font(&self, id: &str) -> bool {
        self.unlocked_fonts.iter().any(|f| f == id)
    }

    pub fn owns_sticker(&self, id: &str) -> bool {
        self.unlocked_stickers.iter().any(|s| s == id)
    }

    pub fn revision(&self, id: &str) -> Option<&RevisionTask> {
        self.revisions.iter().find(|r| r.id == id)
    }

    pub fn display_name(&self) -> String {
        match (self.user_title.is_empty(), self.user_name.is_empty()) {
            (_, true) => "Student".to_string(),
            (true, false) => self.user_name.clone(),
            (false, false) => format!("{} {}", self.user_title, self.user_name),
        }
    }
}

// targetDate is stored as "YYYY-MM-DD", with "" meaning "not set"
mod optional_day {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(day) => serializer.serialize_str(&day.format(FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(str::trim).and_then(parse))
    }

    // Accepts both plain dates and full ISO timestamps
    fn parse(s: &str) -> Option<NaiveDate> {
        if s.is_empty() {
            return None;
        }
        let head = s.get(..10).unwrap_or(s);
        NaiveDate::parse_from_str(head, FORMAT).ok()
    }
}

// Counts from the web form were stored as `parseInt` results and may be
// negative or fractional; they are clamped into range on load.
mod lenient_count {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<f64>::deserialize(deserializer)?;
        Ok(raw.map(clamp))
    }

    fn clamp(value: f64) -> u32 {
        if value.is_nan() || value <= 0.0 {
            0
        } else if value >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            value.floor() as u32
        }
    }
}

// JSON output wrapper for CLI
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}
