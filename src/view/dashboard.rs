use std::fmt;

use crate::core::load::LoadEstimate;
use crate::model::auth_user::AuthUser;

const REMINDERS: [&str; 3] = [
    "Watch for time overlaps when adding new classes.",
    "Aim for 12–18 credits for a balanced semester.",
    "Revisit this page after each change to your schedule.",
];

const MILESTONES: [(&str, &str); 5] = [
    ("Apr 01", "Registration opens"),
    ("Aug 26", "Semester begins"),
    ("Sep 06", "Add/drop deadline"),
    ("Oct 21", "Midterms"),
    ("Dec 09", "Finals week"),
];

fn bar(percent: f64, width: usize) -> String {
    let filled = ((percent / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Signed-in landing page with the credit load overview.
pub struct DashboardPage<'a> {
    pub user: &'a AuthUser,
    pub estimate: &'a LoadEstimate,
}

impl fmt::Display for DashboardPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (user, estimate) = (self.user, self.estimate);
        writeln!(f, "Class Scheduler")?;
        writeln!(f, "Welcome back, {}", user.email.as_deref().unwrap_or(user.friendly_name()))?;
        writeln!(f)?;

        writeln!(f, "Overview")?;
        writeln!(f, "  Scheduled classes: {}", estimate.courses)?;
        writeln!(f, "  Estimated credits: {} cr", estimate.credits)?;
        let [credits_bar, classes_bar, target_bar] = estimate.overview_bars();
        writeln!(f, "  Credits  {}", bar(credits_bar, 20))?;
        writeln!(f, "  Classes  {}", bar(classes_bar, 20))?;
        writeln!(f, "  Target   {}", bar(target_bar, 20))?;
        writeln!(f)?;

        writeln!(f, "Planning status")?;
        writeln!(
            f,
            "  You're currently at {} credits out of an ideal {}.",
            estimate.credits, estimate.target
        )?;
        writeln!(
            f,
            "  {} {} {}%",
            bar(estimate.percent, 30),
            estimate.label,
            estimate.percent.round()
        )?;
        writeln!(f)?;

        writeln!(f, "Reminders")?;
        for reminder in REMINDERS {
            writeln!(f, "  - {}", reminder)?;
        }
        writeln!(f)?;

        writeln!(f, "Upcoming milestones")?;
        for (date, label) in MILESTONES {
            writeln!(f, "  {}  {}", date, label)?;
        }
        Ok(())
    }
}

pub struct ProfilePage<'a>(pub &'a AuthUser);

impl fmt::Display for ProfilePage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Profile")?;
        writeln!(f, "  Name      {}", self.0.friendly_name())?;
        writeln!(f, "  Email     {}", self.0.email.as_deref().unwrap_or(""))?;
        writeln!(f, "  Provider  {}", self.0.provider_label())
    }
}

pub fn render_dashboard(user: &AuthUser, estimate: &LoadEstimate) -> String {
    DashboardPage { user, estimate }.to_string()
}

pub fn render_profile(user: &AuthUser) -> String {
    ProfilePage(user).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::load::estimate;
    use chrono::Utc;

    fn user() -> AuthUser {
        AuthUser {
            uid: "u".to_string(),
            email: Some("ada@wsu.edu".to_string()),
            display_name: None,
            provider_id: Some("google.com".to_string()),
            id_token: "t".to_string(),
            refresh_token: "r".to_string(),
            expires_at: Utc::now(),
        }
    }

    #[test]
    fn dashboard_shows_load() {
        let text = render_dashboard(&user(), &estimate(4));
        assert!(text.contains("Welcome back, ada@wsu.edu"));
        assert!(text.contains("Estimated credits: 12 cr"));
        assert!(text.contains("Standard load 80%"));
        assert!(text.contains("Finals week"));
    }

    #[test]
    fn empty_schedule_is_not_started() {
        let text = render_dashboard(&user(), &estimate(0));
        assert!(text.contains("Not started 0%"));
    }

    #[test]
    fn profile_lists_account() {
        let text = render_profile(&user());
        assert!(text.contains("Name      ada"));
        assert!(text.contains("Provider  google.com"));
    }

    #[test]
    fn bars_fill_proportionally() {
        assert_eq!(bar(50.0, 4), "[##--]");
        assert_eq!(bar(100.0, 4), "[####]");
        assert_eq!(bar(0.0, 4), "[----]");
    }
}
