use crate::model::course::{Course, CourseId, RawCourse, RawDays, Weekday};

/// Decodes a compact day code such as "MWF" or "TR", keeping input order and
/// dropping letters that name no weekday.
pub fn parse_days(code: &str) -> Vec<Weekday> {
    code.chars().filter_map(Weekday::from_code).collect()
}

fn parse_day_labels(labels: &[String]) -> Vec<Weekday> {
    labels.iter().filter_map(|label| label.parse().ok()).collect()
}

/// Turns a loosely shaped record into a canonical [`Course`]. Never fails:
/// missing text fields become empty strings and undecodable days an empty list.
pub fn normalize(raw: RawCourse) -> Course {
    let code = raw.code.unwrap_or_default();
    let start = raw.start_time.unwrap_or_default();
    let end = raw.end_time.unwrap_or_default();

    let id = raw.id.unwrap_or_else(|| {
        let days = raw.days.as_ref().map(ToString::to_string).unwrap_or_default();
        CourseId::Text(format!("{}-{}-{}", code, start, days))
    });

    let days = match &raw.days {
        Some(RawDays::List(labels)) => parse_day_labels(labels),
        Some(RawDays::Code(code)) => parse_days(code),
        None => Vec::new(),
    };

    Course {
        id,
        code,
        title: raw.title.unwrap_or_default(),
        instructor: raw.instructor,
        start,
        end,
        days,
    }
}
