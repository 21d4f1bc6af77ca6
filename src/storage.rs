use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::UserState;

/// Key the whole document lives under. Bumped only on incompatible layouts.
pub const STORAGE_KEY: &str = "papermock_data_v9";

// Fields added after the first release; re-defaulted when missing or falsy
const LATE_FIELDS: [&str; 4] = ["subjects", "unlockedFonts", "userTitle", "targetDate"];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("state document error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    pub fn read_raw(&self) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![STORAGE_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Loads the stored document, migrated over the defaults.
    ///
    /// Never fails: a missing, unreadable or unparseable document yields
    /// `UserState::default()` and a warning in the log. An unparseable
    /// document is first copied to a side key so the next save cannot
    /// destroy it.
    pub fn load(&self) -> UserState {
        match self.read_raw() {
            Ok(Some(raw)) => match parse_document(&raw) {
                Ok(state) => state,
                Err(e) => {
                    warn!(error = %e, "stored state is unusable, using defaults");
                    match self.set_aside(&raw) {
                        Ok(key) => warn!(%key, "unusable state kept for recovery"),
                        Err(e) => warn!(error = %e, "failed to keep unusable state"),
                    }
                    UserState::default()
                }
            },
            Ok(None) => {
                debug!("no stored state, starting fresh");
                UserState::default()
            }
            Err(e) => {
                warn!(error = %e, "failed to read stored state, using defaults");
                UserState::default()
            }
        }
    }

    /// Copies `raw` under a timestamped key next to the live document.
    fn set_aside(&self, raw: &str) -> Result<String> {
        let now = Utc::now();
        let key = format!("{}_unusable_{}", STORAGE_KEY, now.format("%Y%m%dT%H%M%S%.3f"));
        self.conn.execute(
            "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, raw, now.to_rfc3339()],
        )?;
        Ok(key)
    }

    /// Overwrites the stored document with `state`. Last write wins.
    pub fn save(&self, state: &UserState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        self.conn.execute(
            r#"
            INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![STORAGE_KEY, json, Utc::now().to_rfc3339()],
        )?;
        debug!(bytes = json.len(), "state saved");
        Ok(())
    }
}

pub fn parse_document(raw: &str) -> Result<UserState> {
    merge_with_defaults(serde_json::from_str::<Value>(raw)?)
}

/// Shallow-merges a stored document over the default one.
///
/// Top-level keys in `stored` replace the defaults wholesale. Nulls count as
/// absent. Fields in `LATE_FIELDS` fall back to their defaults when falsy
/// (`""`, `false`, `0`) so documents from older releases pick them up.
pub fn merge_with_defaults(stored: Value) -> Result<UserState> {
    let Value::Object(defaults) = serde_json::to_value(UserState::default())? else {
        return Ok(UserState::default());
    };
    let Value::Object(stored) = stored else {
        debug!("stored state is not an object, using defaults");
        return Ok(UserState::default());
    };

    let mut merged: Map<String, Value> = defaults.clone();
    for (key, value) in stored {
        if !value.is_null() {
            merged.insert(key, value);
        }
    }

    for key in LATE_FIELDS {
        if is_falsy(merged.get(key)) {
            if let Some(default) = defaults.get(key) {
                merged.insert(key.to_string(), default.clone());
            }
        }
    }

    Ok(serde_json::from_value(Value::Object(merged))?)
}

fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExamGoal, RevisionStatus, SessionLevel};
    use chrono::NaiveDate;
    use serde_json::json;

    fn setup_storage() -> Storage {
        let storage = Storage::open(":memory:").expect("Failed to create in-memory database");
        storage.init().expect("Failed to initialize database");
        storage
    }

    fn write_raw(storage: &Storage, raw: &str) {
        storage
            .conn
            .execute(
                "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?1, ?2, '')",
                params![STORAGE_KEY, raw],
            )
            .unwrap();
    }

    mod init_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn init_creates_table() {
            let storage = setup_storage();
            let rows: i64 = storage
                .conn
                .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))
                .expect("kv_store table should exist");
            assert_eq!(rows, 0);
        }

        #[test]
        fn init_is_idempotent() {
            let storage = setup_storage();
            storage.init().expect("second init should succeed");
        }
    }

    mod round_trip_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        fn sample_state() -> UserState {
            let mut state: UserState = serde_json::from_value(json!({
                "userName": "Asha",
                "userTitle": "Dr.",
                "examGoal": "NEET",
                "targetDate": "2024-09-01",
                "subjects": ["Physics", "Biology"],
                "inkPoints": 245,
                "dailyMode": "LEVEL_2",
                "sessions": [{
                    "id": "s1",
                    "level": 1,
                    "subject": "Physics",
                    "topic": "Optics",
                    "durationMinutes": 60,
                    "date": "2024-03-01T10:30:00.000Z"
                }],
                "revisions": [{
                    "id": "r1",
                    "originalSessionId": "s1",
                    "subject": "Physics",
                    "topic": "Optics",
                    "scheduledDate": "2024-03-02",
                    "status": "COMPLETED",
                    "completedDate": "2024-03-02T08:00:00.000Z"
                }],
                "unlockedThemes": ["default", "surgical_green"],
                "currentThemeId": "surgical_green",
                "unlockedStickers": ["dna"],
                "placedStickers": [{"id": "p1", "stickerId": "dna", "x": 10.5, "y": 20.0}]
            }))
            .unwrap();
            state.unlocked_fonts.push("caveat".to_string());
            state
        }

        #[test]
        fn load_empty_store_gives_defaults() {
            let storage = setup_storage();
            assert_eq!(storage.load(), UserState::default());
        }

        #[test]
        fn save_then_load_round_trips() {
            let storage = setup_storage();
            let state = sample_state();
            storage.save(&state).unwrap();
            assert_eq!(storage.load(), state);
        }

        #[test]
        fn save_overwrites_previous_document() {
            let storage = setup_storage();
            storage.save(&sample_state()).unwrap();
            let fresh = UserState::default();
            storage.save(&fresh).unwrap();

            assert_eq!(storage.load(), fresh);
            let rows: i64 = storage
                .conn
                .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))
                .unwrap();
            assert_eq!(rows, 1);
        }

        #[test]
        fn sample_parses_original_encodings() {
            let state = sample_state();
            assert_eq!(state.exam_goal, ExamGoal::Neet);
            assert_eq!(state.sessions[0].level, SessionLevel::Lecture);
            assert_eq!(state.revisions[0].status, RevisionStatus::Completed);
            assert_eq!(state.target_date, NaiveDate::from_ymd_opt(2024, 9, 1));
        }

        #[test]
        fn file_backed_store_survives_reopen() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("papermock.db");

            {
                let storage = Storage::open(&path).unwrap();
                storage.init().unwrap();
                storage.save(&sample_state()).unwrap();
            }

            let storage = Storage::open(&path).unwrap();
            storage.init().unwrap();
            assert_eq!(storage.load(), sample_state());
        }
    }

    mod migration_tests {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn missing_fields_take_defaults() {
            let state = merge_with_defaults(json!({"userName": "Ravi", "inkPoints": 50})).unwrap();
            assert_eq!(state.user_name, "Ravi");
            assert_eq!(state.ink_points, 50);
            assert_eq!(state.unlocked_themes, vec!["default"]);
            assert_eq!(state.unlocked_fonts, vec!["patrick"]);
            assert_eq!(state.current_font_id, "patrick");
        }

        #[test]
        fn late_fields_redefaulted_when_falsy() {
            let state = merge_with_defaults(json!({
                "subjects": null,
                "unlockedFonts": false,
                "userTitle": null,
                "targetDate": 0
            }))
            .unwrap();
            assert!(state.subjects.is_empty());
            assert_eq!(state.unlocked_fonts, vec!["patrick"]);
            assert_eq!(state.user_title, "");
            assert!(state.target_date.is_none());
        }

        #[test]
        fn empty_arrays_are_kept() {
            let state = merge_with_defaults(json!({"unlockedFonts": []})).unwrap();
            assert!(state.unlocked_fonts.is_empty());
        }

        #[test]
        fn null_fields_count_as_absent() {
            let state = merge_with_defaults(json!({"sessions": null, "inkPoints": null})).unwrap();
            assert!(state.sessions.is_empty());
            assert_eq!(state.ink_points, 200);
        }

        #[test]
        fn unknown_fields_are_ignored() {
            let state = merge_with_defaults(json!({"legacyStreak": 12, "userName": "Mei"})).unwrap();
            assert_eq!(state.user_name, "Mei");
        }

        #[test]
        fn non_object_document_gives_defaults() {
            assert_eq!(merge_with_defaults(json!([1, 2])).unwrap(), UserState::default());
            assert_eq!(merge_with_defaults(json!(5)).unwrap(), UserState::default());
        }

        fn side_copies(storage: &Storage) -> Vec<String> {
            let mut stmt = storage
                .conn
                .prepare("SELECT value FROM kv_store WHERE key LIKE 'papermock_data_v9_unusable_%'")
                .unwrap();
            let values = stmt
                .query_map([], |row| row.get(0))
                .unwrap()
                .collect::<std::result::Result<Vec<String>, _>>()
                .unwrap();
            values
        }

        #[test]
        fn unparseable_document_falls_back() {
            let storage = setup_storage();
            write_raw(&storage, "{not json");
            assert_eq!(storage.load(), UserState::default());
            assert_eq!(side_copies(&storage), vec!["{not json".to_string()]);
        }

        #[test]
        fn mistyped_document_falls_back() {
            let storage = setup_storage();
            write_raw(&storage, r#"{"inkPoints": "lots"}"#);
            assert_eq!(storage.load(), UserState::default());
        }

        #[test]
        fn unusable_document_survives_next_save() {
            let storage = setup_storage();
            let raw = r#"{"userName": "Asha", "sessions": "broken"}"#;
            write_raw(&storage, raw);

            let state = storage.load();
            storage.save(&state).unwrap();

            assert_eq!(side_copies(&storage), vec![raw.to_string()]);
            assert_eq!(storage.load(), UserState::default());
        }

        #[test]
        fn readable_document_is_not_copied() {
            let storage = setup_storage();
            write_raw(&storage, r#"{"userName": "Asha"}"#);
            assert_eq!(storage.load().user_name, "Asha");
            assert!(side_copies(&storage).is_empty());
        }

        #[test]
        fn web_app_document_with_negative_count_loads() {
            let raw = r#"{
                "userName": "Asha",
                "examGoal": "NEET",
                "inkPoints": 480,
                "sessions": [
                    {
                        "id": "a",
                        "level": 2,
                        "subject": "Chemistry",
                        "topic": "Moles",
                        "questionsAttempted": 10,
                        "questionsIncorrect": -3,
                        "questionsCorrect": 13,
                        "date": "2024-03-01T10:30:00.000Z"
                    },
                    {
                        "id": "b",
                        "level": 1,
                        "subject": "Physics",
                        "topic": "Optics",
                        "durationMinutes": 60,
                        "date": "2024-02-29T09:00:00.000Z"
                    }
                ]
            }"#;

            let state = parse_document(raw).unwrap();
            assert_eq!(state.user_name, "Asha");
            assert_eq!(state.ink_points, 480);
            assert_eq!(state.sessions.len(), 2);
            assert_eq!(state.sessions[0].questions_incorrect, Some(0));
            assert_eq!(state.sessions[0].correct(), 13);
        }

        #[test]
        fn falsy_checks() {
            assert!(is_falsy(None));
            assert!(is_falsy(Some(&json!(""))));
            assert!(is_falsy(Some(&json!(0))));
            assert!(!is_falsy(Some(&json!([]))));
            assert!(!is_falsy(Some(&json!("x"))));
        }
    }
}
