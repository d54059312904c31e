use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::core::normalizer;

/// Hour assumed when a course time is missing or unreadable.
pub const OPENING_HOUR: u8 = 8;

static CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d{1,2})(?::(\d{1,2}))?(?::\d{1,2})?\s*$").expect("static regex"));

/// Course identifiers arrive either as database integers or as strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CourseId {
    Number(i64),
    Text(String),
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourseId::Number(n) => write!(f, "{}", n),
            CourseId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for CourseId {
    fn from(value: i64) -> Self {
        CourseId::Number(value)
    }
}

impl From<&str> for CourseId {
    fn from(value: &str) -> Self {
        CourseId::Text(value.to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const WORK_WEEK: [Weekday; 5] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }

    /// Letter used by the registrar's compact codes ("MWF", "TR").
    pub fn from_code(letter: char) -> Option<Self> {
        match letter {
            'M' => Some(Weekday::Mon),
            'T' => Some(Weekday::Tue),
            'W' => Some(Weekday::Wed),
            'R' => Some(Weekday::Thu),
            'F' => Some(Weekday::Fri),
            _ => None,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Weekday {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Mon" => Ok(Weekday::Mon),
            "Tue" => Ok(Weekday::Tue),
            "Wed" => Ok(Weekday::Wed),
            "Thu" => Ok(Weekday::Thu),
            "Fri" => Ok(Weekday::Fri),
            "Sat" => Ok(Weekday::Sat),
            "Sun" => Ok(Weekday::Sun),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

impl ClockTime {
    /// Reads `H`, `HH`, `HH:MM` or `HH:MM:SS`. A missing or out-of-range hour
    /// falls back to the opening hour, a missing or out-of-range minute to zero.
    pub fn parse(value: Option<&str>) -> Self {
        let caps = value.and_then(|v| CLOCK_RE.captures(v));
        let field = |i: usize| {
            caps.as_ref()
                .and_then(|c| c.get(i))
                .and_then(|m| m.as_str().parse::<u8>().ok())
        };
        ClockTime {
            hour: field(1).filter(|h| *h < 24).unwrap_or(OPENING_HOUR),
            minute: field(2).filter(|m| *m < 60).unwrap_or(0),
        }
    }
}

/// A course record as it arrives from the catalog endpoint or from storage.
/// Every field is optional and read leniently: a field of the wrong JSON type
/// reads as absent instead of rejecting the record.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RawCourse {
    pub id: Option<CourseId>,
    pub code: Option<String>,
    pub title: Option<String>,
    pub instructor: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub days: Option<RawDays>,
}

impl RawCourse {
    /// Database rows use `start_time`/`end_time`, stored courses `start`/`end`;
    /// the database names win when both are present.
    pub fn from_object(row: &Map<String, Value>) -> Self {
        let text = |key: &str| row.get(key).and_then(scalar_text);
        RawCourse {
            id: row.get("id").and_then(course_id),
            code: text("code"),
            title: text("title"),
            instructor: text("instructor"),
            start_time: text("start_time").or_else(|| text("start")),
            end_time: text("end_time").or_else(|| text("end")),
            days: row.get("days").and_then(raw_days),
        }
    }
}

impl<'de> Deserialize<'de> for RawCourse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Object(row) => Ok(RawCourse::from_object(&row)),
            other => Err(serde::de::Error::custom(format!(
                "expected a course object, found {}",
                other
            ))),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Whole numbers (including `6.0`) become numeric ids; other numbers keep
/// their text form so they still compare by string.
fn course_id(value: &Value) -> Option<CourseId> {
    match value {
        Value::String(s) => Some(CourseId::Text(s.clone())),
        Value::Number(n) => Some(number_id(n)),
        _ => None,
    }
}

fn number_id(n: &Number) -> CourseId {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if let Some(i) = n.as_i64() {
        return CourseId::Number(i);
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < MAX_EXACT => CourseId::Number(f as i64),
        _ => CourseId::Text(n.to_string()),
    }
}

fn raw_days(value: &Value) -> Option<RawDays> {
    match value {
        Value::String(code) => Some(RawDays::Code(code.clone())),
        Value::Array(items) => Some(RawDays::List(
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
        )),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDays {
    List(Vec<String>),
    Code(String),
}

impl fmt::Display for RawDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawDays::List(labels) => f.write_str(&labels.join(",")),
            RawDays::Code(code) => f.write_str(code),
        }
    }
}

/// Canonical course shape used everywhere after ingestion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCourse")]
pub struct Course {
    pub id: CourseId,
    pub code: String,
    pub title: String,
    pub instructor: Option<String>,
    pub start: String,
    pub end: String,
    pub days: Vec<Weekday>,
}

impl Course {
    pub fn start_time(&self) -> ClockTime {
        ClockTime::parse(Some(&self.start))
    }

    pub fn end_time(&self) -> ClockTime {
        ClockTime::parse(Some(&self.end))
    }

    pub fn instructor_label(&self) -> &str {
        match self.instructor.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "TBA",
        }
    }

    pub fn days_label(&self) -> String {
        self.days
            .iter()
            .map(|d| d.label())
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn time_range(&self) -> String {
        format!("{}–{}", self.start, self.end)
    }
}

impl From<RawCourse> for Course {
    fn from(raw: RawCourse) -> Self {
        normalizer::normalize(raw)
    }
}

impl From<Course> for RawCourse {
    fn from(course: Course) -> Self {
        RawCourse {
            id: Some(course.id),
            code: Some(course.code),
            title: Some(course.title),
            instructor: course.instructor,
            start_time: Some(course.start),
            end_time: Some(course.end),
            days: Some(RawDays::List(
                course.days.iter().map(|d| d.label().to_string()).collect(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_time_reads_hours_and_minutes() {
        assert_eq!(ClockTime::parse(Some("09:00")), ClockTime { hour: 9, minute: 0 });
        assert_eq!(ClockTime::parse(Some("14:45")), ClockTime { hour: 14, minute: 45 });
        assert_eq!(ClockTime::parse(Some("7")), ClockTime { hour: 7, minute: 0 });
    }

    #[test]
    fn clock_time_defaults_to_opening_hour() {
        let opening = ClockTime { hour: OPENING_HOUR, minute: 0 };
        assert_eq!(ClockTime::parse(None), opening);
        assert_eq!(ClockTime::parse(Some("")), opening);
        assert_eq!(ClockTime::parse(Some("noon")), opening);
        assert_eq!(ClockTime::parse(Some("27:00")), opening);
        assert_eq!(ClockTime::parse(Some("123:00")), opening);
        assert_eq!(ClockTime::parse(Some("9:75")), ClockTime { hour: 9, minute: 0 });
        assert_eq!(ClockTime::parse(Some("09:30:00")), ClockTime { hour: 9, minute: 30 });
    }

    #[test]
    fn mistyped_fields_read_as_absent() {
        let raw: RawCourse = serde_json::from_str(
            r#"{"id": 6.0, "code": "CPTS121", "instructor": 42, "title": ["x"],
                "start_time": "09:00", "start": "10:00", "days": ["Mon", 3, "Wed"]}"#,
        )
        .unwrap();
        assert_eq!(raw.id, Some(CourseId::Number(6)));
        assert_eq!(raw.instructor.as_deref(), Some("42"));
        assert_eq!(raw.title, None);
        assert_eq!(raw.start_time.as_deref(), Some("09:00"));
        assert_eq!(raw.days, Some(RawDays::List(vec!["Mon".to_string(), "Wed".to_string()])));

        let fractional: RawCourse = serde_json::from_str(r#"{"id": 1.5}"#).unwrap();
        assert_eq!(fractional.id, Some(CourseId::Text("1.5".to_string())));
        assert!(serde_json::from_str::<RawCourse>("3").is_err());
    }

    #[test]
    fn persisted_course_reads_back_identically() {
        let json = r#"{"id":1,"code":"CPTS101","title":"Intro","instructor":null,
            "start":"09:00","end":"10:15","days":["Mon","Wed","Fri"]}"#;
        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.id, CourseId::Number(1));
        assert_eq!(course.days, vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]);
        assert_eq!(course.instructor_label(), "TBA");

        let again: Course = serde_json::from_str(&serde_json::to_string(&course).unwrap()).unwrap();
        assert_eq!(again, course);
    }

    #[test]
    fn numeric_and_text_ids_are_distinct() {
        assert_ne!(CourseId::from(1), CourseId::from("1"));
        assert_eq!(CourseId::from(1).to_string(), CourseId::from("1").to_string());
    }
}
