use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use log::debug;

use crate::error::{PlannerError, Result};
use crate::model::course::{Course, Weekday};

pub const DEFAULT_START_HOUR: u8 = 8;
pub const DEFAULT_END_HOUR: u8 = 18;

/// Row 1 holds the day headers, so the first hour sits on row 2.
const FIRST_HOUR_ROW: u16 = 2;

/// Visible hour range of the weekly grid plus the weekday column mapping.
/// Columns 0 and 1 are reserved for the hour labels and the corner spacer.
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    pub start_hour: u8,
    pub end_hour: u8,
    pub columns: BTreeMap<Weekday, u16>,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
            columns: Weekday::WORK_WEEK
                .iter()
                .zip(2u16..)
                .map(|(day, col)| (*day, col))
                .collect(),
        }
    }
}

impl GridConfig {
    pub fn new(start_hour: u8, end_hour: u8) -> Result<Self> {
        if start_hour > end_hour || end_hour > 23 {
            return Err(PlannerError::Config(format!(
                "invalid visible hours {}..={}",
                start_hour, end_hour
            )));
        }
        Ok(GridConfig {
            start_hour,
            end_hour,
            ..GridConfig::default()
        })
    }

    pub fn visible_hours(&self) -> RangeInclusive<u8> {
        self.start_hour..=self.end_hour
    }

    pub fn row_for_hour(&self, hour: u8) -> u16 {
        u16::from(hour - self.start_hour) + FIRST_HOUR_ROW
    }

    pub fn last_row(&self) -> u16 {
        self.row_for_hour(self.end_hour)
    }

    /// Mapped weekdays ordered by column.
    pub fn days(&self) -> Vec<Weekday> {
        let mut days: Vec<(u16, Weekday)> = self.columns.iter().map(|(d, c)| (*c, *d)).collect();
        days.sort();
        days.into_iter().map(|(_, d)| d).collect()
    }
}

/// Placement of one course on one of its meeting days.
#[derive(Clone, Debug, PartialEq)]
pub struct GridCell<'a> {
    pub course: &'a Course,
    pub day: Weekday,
    pub column: u16,
    pub start_row: u16,
    pub row_span: u16,
    /// Set when the span was cut short at the last visible hour.
    pub clipped: bool,
}

/// Places every course once per meeting day. Rows snap to whole hours and
/// colliding courses are emitted independently. Courses starting outside the
/// visible hours produce no cells; spans running past the last row are clamped.
pub fn layout<'a>(courses: &'a [Course], config: &GridConfig) -> Vec<GridCell<'a>> {
    let mut cells = Vec::new();
    for course in courses {
        let start = course.start_time().hour;
        let end = course.end_time().hour;
        if !config.visible_hours().contains(&start) {
            debug!(
                "{} starts at {}:00, outside the visible hours {}..={}",
                course.code, start, config.start_hour, config.end_hour
            );
            continue;
        }

        let start_row = config.row_for_hour(start);
        let wanted = (i32::from(end) - i32::from(start)).max(1) as u16;
        let available = config.last_row() - start_row + 1;
        let row_span = wanted.min(available);
        let clipped = wanted > available;

        for day in &course.days {
            let Some(column) = config.columns.get(day) else {
                continue;
            };
            cells.push(GridCell {
                course,
                day: *day,
                column: *column,
                start_row,
                row_span,
                clipped,
            });
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::course::CourseId;

    fn course(start: &str, end: &str, days: &[Weekday]) -> Course {
        Course {
            id: CourseId::from("c"),
            code: "CPTS101".to_string(),
            title: "Intro".to_string(),
            instructor: None,
            start: start.to_string(),
            end: end.to_string(),
            days: days.to_vec(),
        }
    }

    #[test]
    fn course_occupies_one_cell_per_day() {
        use Weekday::*;
        let courses = vec![course("09:00", "10:15", &[Mon, Wed, Fri])];
        let cells = layout(&courses, &GridConfig::default());
        assert_eq!(cells.len(), 3);
        assert!(cells.iter().all(|c| c.start_row == 3 && c.row_span == 1 && !c.clipped));
        let columns: Vec<u16> = cells.iter().map(|c| c.column).collect();
        assert_eq!(columns, vec![2, 4, 6]);
    }

    #[test]
    fn zero_or_negative_duration_spans_one_row() {
        let courses = vec![
            course("10:00", "10:00", &[Weekday::Tue]),
            course("11:00", "09:00", &[Weekday::Thu]),
        ];
        let cells = layout(&courses, &GridConfig::default());
        assert_eq!(cells.len(), 2);
        assert!(cells.iter().all(|c| c.row_span == 1));
        assert_eq!(cells[0].start_row, 4);
        assert_eq!(cells[1].column, 5);
    }

    #[test]
    fn multi_hour_course_spans_rows() {
        let courses = vec![course("13:00", "16:00", &[Weekday::Mon])];
        let cells = layout(&courses, &GridConfig::default());
        assert_eq!(cells[0].start_row, 7);
        assert_eq!(cells[0].row_span, 3);
    }

    #[test]
    fn unmapped_days_are_dropped() {
        let courses = vec![course("09:00", "10:00", &[Weekday::Sat, Weekday::Tue])];
        let cells = layout(&courses, &GridConfig::default());
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].day, Weekday::Tue);
    }

    #[test]
    fn overlapping_courses_are_not_reflowed() {
        let courses = vec![
            course("09:00", "10:00", &[Weekday::Mon]),
            course("09:00", "11:00", &[Weekday::Mon]),
        ];
        let cells = layout(&courses, &GridConfig::default());
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].column, cells[1].column);
        assert_eq!(cells[0].start_row, cells[1].start_row);
    }

    #[test]
    fn span_past_last_hour_is_clamped() {
        let courses = vec![course("17:00", "20:00", &[Weekday::Wed])];
        let cells = layout(&courses, &GridConfig::default());
        assert_eq!(cells[0].start_row, 11);
        assert_eq!(cells[0].row_span, 2);
        assert!(cells[0].clipped);
    }

    #[test]
    fn start_outside_visible_hours_is_rejected() {
        let courses = vec![
            course("07:00", "09:00", &[Weekday::Mon]),
            course("19:00", "20:00", &[Weekday::Mon]),
        ];
        assert!(layout(&courses, &GridConfig::default()).is_empty());
    }

    #[test]
    fn missing_start_uses_opening_hour() {
        let courses = vec![course("", "", &[Weekday::Fri])];
        let cells = layout(&courses, &GridConfig::default());
        assert_eq!(cells[0].start_row, 2);
        assert_eq!(cells[0].row_span, 1);
    }

    #[test]
    fn config_rejects_inverted_hours() {
        assert!(GridConfig::new(18, 8).is_err());
        assert!(GridConfig::new(8, 24).is_err());
        let config = GridConfig::new(7, 20).unwrap();
        assert_eq!(config.last_row(), 15);
        assert_eq!(config.days(), Weekday::WORK_WEEK.to_vec());
    }
}
