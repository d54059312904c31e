use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::catalog_client::DEFAULT_API_BASE;
use crate::core::grid::{DEFAULT_END_HOUR, DEFAULT_START_HOUR, GridConfig};
use crate::core::identity::DEFAULT_IDENTITY_BASE;
use crate::error::Result;

#[derive(Debug, Parser)]
#[command(name = "course-planner", version, about = "Browse the course catalog and plan a weekly schedule")]
pub struct Cli {
    /// Base URL of the catalog backend.
    #[arg(long, env = "COURSE_API_BASE_URL", default_value = DEFAULT_API_BASE, global = true)]
    pub api_base: String,

    /// File holding the durable slots (selected courses, signed-in user).
    #[arg(long, env = "COURSE_PLANNER_STORAGE", default_value = "data/local_storage.json", global = true)]
    pub storage: PathBuf,

    #[arg(long, env = "FIREBASE_API_KEY", global = true, hide_env_values = true)]
    pub firebase_api_key: Option<String>,

    #[arg(long, env = "COURSE_PLANNER_IDENTITY_BASE", default_value = DEFAULT_IDENTITY_BASE, global = true)]
    pub identity_base: String,

    /// More output per occurrence (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the course catalog.
    Catalog {
        /// Case-insensitive search over code, title and instructor.
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Add a catalog course to the schedule by id.
    Add { id: String },
    /// Show the weekly schedule.
    Schedule {
        #[command(flatten)]
        grid: GridArgs,
    },
    /// Remove a course from the schedule by id.
    Remove { id: String },
    /// Remove every course from the schedule.
    Clear,
    /// Show the planning dashboard for the signed-in user.
    Dashboard,
    /// Show the signed-in account.
    Profile,
    /// Sign in with email and password, or with a federated provider token.
    Login {
        /// OAuth id token issued by the federated provider.
        #[arg(long)]
        idp_token: Option<String>,
        #[arg(long, default_value = "google.com", requires = "idp_token")]
        provider: String,
    },
    /// Sign out and forget the stored session.
    Logout,
}

#[derive(Debug, Clone, Copy, clap::Args)]
pub struct GridArgs {
    #[arg(long, default_value_t = DEFAULT_START_HOUR)]
    pub start_hour: u8,
    #[arg(long, default_value_t = DEFAULT_END_HOUR)]
    pub end_hour: u8,
}

impl GridArgs {
    pub fn to_config(self) -> Result<GridConfig> {
        GridConfig::new(self.start_hour, self.end_hour)
    }
}

impl Cli {
    /// `RUST_LOG` wins; otherwise the `-v` count picks the level.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_catalog_query() {
        let cli = Cli::try_parse_from(["course-planner", "catalog", "--query", "cpts"]).unwrap();
        assert!(matches!(cli.command, Command::Catalog { ref query } if query == "cpts"));
        assert_eq!(cli.log_filter(), "warn");
    }

    #[test]
    fn schedule_accepts_hour_overrides() {
        let cli = Cli::try_parse_from(["course-planner", "-vv", "schedule", "--end-hour", "20"]).unwrap();
        let Command::Schedule { grid } = cli.command else {
            panic!("expected schedule command");
        };
        let config = grid.to_config().unwrap();
        assert_eq!((config.start_hour, config.end_hour), (8, 20));
        assert_eq!(cli.log_filter(), "debug");
    }

    #[test]
    fn provider_requires_token() {
        assert!(Cli::try_parse_from(["course-planner", "login", "--provider", "github.com"]).is_err());
        assert!(Cli::try_parse_from(["course-planner", "login", "--idp-token", "t"]).is_ok());
    }
}
