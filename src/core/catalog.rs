use log::{info, warn};

use crate::error::Result;
use crate::model::course::{Course, CourseId, Weekday};

/// Case-insensitive substring match over code, title and instructor.
/// A blank query keeps every course; order always follows the input.
pub fn filter<'a>(courses: &'a [Course], query: &str) -> Vec<&'a Course> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return courses.iter().collect();
    }
    courses
        .iter()
        .filter(|c| {
            c.code.to_lowercase().contains(&needle)
                || c.title.to_lowercase().contains(&needle)
                || c.instructor
                    .as_deref()
                    .unwrap_or("")
                    .to_lowercase()
                    .contains(&needle)
        })
        .collect()
}

/// Courses shown when the catalog endpoint is unreachable or returns nothing.
pub fn fallback_courses() -> Vec<Course> {
    use Weekday::*;
    let course = |id: i64, code: &str, title: &str, instructor: &str, start: &str, end: &str, days: &[Weekday]| Course {
        id: CourseId::Number(id),
        code: code.to_string(),
        title: title.to_string(),
        instructor: Some(instructor.to_string()),
        start: start.to_string(),
        end: end.to_string(),
        days: days.to_vec(),
    };
    vec![
        course(1, "CPTS101", "Intro to Computer Science", "Dr. Smith", "09:00", "10:15", &[Mon, Wed, Fri]),
        course(2, "CPTS322", "Software Engineering", "Dr. Lee", "11:00", "12:15", &[Tue, Thu]),
        course(3, "MATH201", "Calculus I", "Dr. Johnson", "14:00", "15:15", &[Mon, Wed, Fri]),
    ]
}

/// Outcome of one catalog load as the catalog page consumes it.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogLoad {
    pub courses: Vec<Course>,
    pub using_fallback: bool,
}

impl CatalogLoad {
    /// Any fetch error, and an empty live list, degrade to the fallback courses.
    pub fn from_fetch(result: Result<Vec<Course>>) -> Self {
        match result {
            Ok(courses) if !courses.is_empty() => {
                info!("loaded {} courses from the catalog endpoint", courses.len());
                CatalogLoad {
                    courses,
                    using_fallback: false,
                }
            }
            Ok(_) => {
                warn!("catalog endpoint returned no courses, using fallback data");
                Self::fallback()
            }
            Err(err) => {
                warn!("catalog fetch failed, using fallback data: {}", err);
                Self::fallback()
            }
        }
    }

    pub fn fallback() -> Self {
        CatalogLoad {
            courses: fallback_courses(),
            using_fallback: true,
        }
    }

    pub fn find(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id.to_string() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;
    use reqwest::StatusCode;

    #[test]
    fn empty_query_is_identity() {
        let courses = fallback_courses();
        let all: Vec<Course> = filter(&courses, "").into_iter().cloned().collect();
        assert_eq!(all, courses);
        assert_eq!(filter(&courses, "   \t").len(), courses.len());
    }

    #[test]
    fn matching_ignores_case() {
        let courses = fallback_courses();
        let lower = filter(&courses, "cpts");
        let upper = filter(&courses, "CPTS");
        assert_eq!(lower, upper);
        let codes: Vec<&str> = lower.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["CPTS101", "CPTS322"]);
    }

    #[test]
    fn matches_title_and_instructor() {
        let courses = fallback_courses();
        assert_eq!(filter(&courses, "calculus")[0].code, "MATH201");
        assert_eq!(filter(&courses, "dr. lee")[0].code, "CPTS322");
        assert!(filter(&courses, "biology").is_empty());
    }

    #[test]
    fn missing_instructor_matches_as_empty() {
        let mut courses = fallback_courses();
        courses[0].instructor = None;
        assert!(filter(&courses, "smith").is_empty());
        assert_eq!(filter(&courses, "intro").len(), 1);
    }

    #[test]
    fn empty_or_failed_fetch_uses_fallback() {
        let empty = CatalogLoad::from_fetch(Ok(Vec::new()));
        assert!(empty.using_fallback);
        assert_eq!(empty.courses, fallback_courses());

        let failed = CatalogLoad::from_fetch(Err(PlannerError::Status(StatusCode::BAD_GATEWAY)));
        assert!(failed.using_fallback);
        assert_eq!(failed.courses.len(), 3);
    }

    #[test]
    fn live_courses_are_kept() {
        let mut live = fallback_courses();
        live.truncate(1);
        let load = CatalogLoad::from_fetch(Ok(live.clone()));
        assert!(!load.using_fallback);
        assert_eq!(load.courses, live);
        assert_eq!(load.find("1").map(|c| c.code.as_str()), Some("CPTS101"));
        assert!(load.find("9").is_none());
    }
}
