use std::sync::Arc;

use log::warn;
use serde::Deserialize;
use serde_json::Value;

use crate::core::storage::SlotStorage;
use crate::error::Result;
use crate::model::course::Course;

pub const SELECTED_COURSES_KEY: &str = "selectedCourses";

/// The user's selected courses, kept as a JSON array in one storage slot.
/// The slot is re-read on every call, so it stays the single source of truth.
pub struct ScheduleStore {
    storage: Arc<dyn SlotStorage>,
    key: String,
}

impl ScheduleStore {
    pub fn new(storage: Arc<dyn SlotStorage>) -> Self {
        Self::with_key(storage, SELECTED_COURSES_KEY)
    }

    pub fn with_key(storage: Arc<dyn SlotStorage>, key: impl Into<String>) -> Self {
        ScheduleStore {
            storage,
            key: key.into(),
        }
    }

    /// Absent slot, invalid JSON and non-array values all read as empty.
    pub fn load(&self) -> Vec<Course> {
        self.load_raw().iter().filter_map(|item| decode(&self.key, item)).collect()
    }

    /// Number of stored entries, including ones that do not read as a course.
    pub fn count(&self) -> usize {
        self.load_raw().len()
    }

    /// Appends `course` unless a course with the same id is already selected.
    /// The slot is only rewritten when the list actually grows.
    pub fn add(&self, course: Course) -> Result<Vec<Course>> {
        let mut items = self.load_raw();
        let present = items
            .iter()
            .filter_map(|item| decode(&self.key, item))
            .any(|c| c.id == course.id);
        if !present {
            items.push(serde_json::to_value(&course)?);
            self.persist(&items)?;
        }
        Ok(items.iter().filter_map(|item| decode(&self.key, item)).collect())
    }

    /// Removes every course whose id renders as `id`. Entries that do not read
    /// as a course are kept as stored, and nothing is written if no id matched.
    pub fn remove_by_id(&self, id: &str) -> Result<Vec<Course>> {
        let mut items = self.load_raw();
        let before = items.len();
        items.retain(|item| match decode(&self.key, item) {
            Some(course) => course.id.to_string() != id,
            None => true,
        });
        if items.len() != before {
            self.persist(&items)?;
        }
        Ok(items.iter().filter_map(|item| decode(&self.key, item)).collect())
    }

    /// Deletes the slot itself rather than storing an empty list.
    pub fn clear(&self) -> Result<()> {
        self.storage.remove_item(&self.key)
    }

    fn load_raw(&self) -> Vec<Value> {
        let Some(raw) = self.storage.get_item(&self.key) else {
            return Vec::new();
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items,
            Ok(other) => {
                warn!("slot {} holds {} instead of a list, ignoring it", self.key, json_kind(&other));
                Vec::new()
            }
            Err(err) => {
                warn!("could not read {} from storage: {}", self.key, err);
                Vec::new()
            }
        }
    }

    fn persist(&self, items: &[Value]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.storage.set_item(&self.key, &json)
    }
}

fn decode(key: &str, item: &Value) -> Option<Course> {
    match Course::deserialize(item) {
        Ok(course) => Some(course),
        Err(err) => {
            warn!("skipping unreadable entry in {}: {}", key, err);
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
