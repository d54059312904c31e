use std::fmt;

use chrono::NaiveTime;

use crate::core::grid::{GridConfig, layout};
use crate::model::course::{Course, Weekday};

const TIME_WIDTH: usize = 9;
const DAY_WIDTH: usize = 12;

/// `8` -> `8:00 AM`, `13` -> `1:00 PM`.
pub fn hour_label(hour: u8) -> String {
    NaiveTime::from_hms_opt(u32::from(hour), 0, 0)
        .map(|t| t.format("%-I:%M %p").to_string())
        .unwrap_or_default()
}

fn fit(text: &str, width: usize) -> String {
    let mut cell: String = text.chars().take(width - 1).collect();
    while cell.chars().count() < width {
        cell.push(' ');
    }
    cell
}

/// Weekly grid as text. Each course shows its code on its first hour row and
/// a continuation mark below; courses sharing a slot are joined with `/`.
pub struct GridView<'a> {
    pub courses: &'a [Course],
    pub config: &'a GridConfig,
}

impl GridView<'_> {
    fn slots(&self, days: &[Weekday], hours: usize) -> Vec<Vec<Vec<String>>> {
        let config = self.config;
        let mut slots = vec![vec![Vec::<String>::new(); days.len()]; hours];
        for cell in layout(self.courses, config) {
            let Some(col) = days.iter().position(|d| *d == cell.day) else {
                continue;
            };
            let first = usize::from(cell.start_row - config.row_for_hour(config.start_hour));
            for offset in 0..usize::from(cell.row_span) {
                let mark = if offset == 0 {
                    cell.course.code.clone()
                } else {
                    "·".to_string()
                };
                if let Some(row) = slots.get_mut(first + offset) {
                    row[col].push(mark);
                }
            }
        }
        slots
    }
}

impl fmt::Display for GridView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days = self.config.days();
        let hours: Vec<u8> = self.config.visible_hours().collect();
        let slots = self.slots(&days, hours.len());

        let mut header = fit("", TIME_WIDTH);
        for day in &days {
            header.push_str(&fit(day.label(), DAY_WIDTH));
        }
        writeln!(f, "{}", header.trim_end())?;

        for (hour, row) in hours.iter().zip(&slots) {
            let mut line = fit(&hour_label(*hour), TIME_WIDTH);
            for entries in row {
                line.push_str(&fit(&entries.join("/"), DAY_WIDTH));
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

/// Schedule page: class count, grid and the removal list.
pub struct SchedulePage<'a> {
    pub courses: &'a [Course],
    pub config: &'a GridConfig,
}

impl fmt::Display for SchedulePage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Weekly schedule")?;
        writeln!(f, "Classes in schedule: {}", self.courses.len())?;
        writeln!(f)?;
        write!(f, "{}", GridView { courses: self.courses, config: self.config })?;

        if self.courses.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "Remove a class with `remove <ID>`:")?;
        for course in self.courses {
            writeln!(
                f,
                "  {}: {} — {} • {} • {} • {}",
                course.id,
                course.code,
                course.title,
                course.instructor_label(),
                course.days_label(),
                course.time_range()
            )?;
        }
        Ok(())
    }
}

pub fn render_grid(courses: &[Course], config: &GridConfig) -> String {
    GridView { courses, config }.to_string()
}

pub fn render_schedule(courses: &[Course], config: &GridConfig) -> String {
    SchedulePage { courses, config }.to_string()
}
