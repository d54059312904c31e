use std::fmt;

use crate::core::catalog::{CatalogLoad, filter};
use crate::model::course::Course;

pub const FALLBACK_NOTE: &str = "Using mock data – backend at /api/courses was not available.";

/// Catalog page: the loaded courses narrowed by a search query.
pub struct CatalogPage<'a> {
    pub shown: Vec<&'a Course>,
    pub total: usize,
    pub using_fallback: bool,
}

impl<'a> CatalogPage<'a> {
    pub fn new(load: &'a CatalogLoad, query: &str) -> Self {
        CatalogPage {
            shown: filter(&load.courses, query),
            total: load.courses.len(),
            using_fallback: load.using_fallback,
        }
    }
}

impl fmt::Display for CatalogPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "COURSE CATALOG")?;
        writeln!(f, "Available courses")?;
        writeln!(f)?;
        writeln!(f, "Showing {} of {} courses", self.shown.len(), self.total)?;
        if self.using_fallback {
            writeln!(f, "{}", FALLBACK_NOTE)?;
        }
        writeln!(f)?;

        for course in &self.shown {
            writeln!(f, "[{}] {} — {}", course.id, course.code, course.title)?;
            writeln!(
                f,
                "    {} • {} • {}",
                course.instructor_label(),
                course.days_label(),
                course.time_range()
            )?;
        }
        Ok(())
    }
}

pub fn render_catalog(load: &CatalogLoad, query: &str) -> String {
    CatalogPage::new(load, query).to_string()
}
