use std::pin::pin;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use course_planner::config::{Cli, Command};
use course_planner::core::catalog::CatalogLoad;
use course_planner::core::catalog_client::CatalogClient;
use course_planner::core::grid::GridConfig;
use course_planner::core::identity::{AuthSession, FirebaseIdentity};
use course_planner::core::load::estimate;
use course_planner::core::schedule_store::ScheduleStore;
use course_planner::core::storage::{FileStorage, SlotStorage};
use course_planner::error::PlannerError;
use course_planner::http::build_client;
use course_planner::utils::input::{input, input_password};
use course_planner::view::catalog::render_catalog;
use course_planner::view::dashboard::{render_dashboard, render_profile};
use course_planner::view::schedule::render_schedule;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the catalog once; Ctrl-C cancels the load and discards any late result.
async fn load_catalog(catalog: &CatalogClient) -> Option<CatalogLoad> {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });
    let load = catalog.load(&cancel).await;
    watcher.abort();
    load
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_filter());

    // One storage instance shared by every page.
    let storage: Arc<dyn SlotStorage> = Arc::new(FileStorage::open(&cli.storage));
    let schedule = ScheduleStore::new(storage.clone());

    let identity = FirebaseIdentity::new(
        build_client(None)?,
        cli.identity_base.as_str(),
        cli.firebase_api_key.clone().unwrap_or_default(),
    );
    let session = AuthSession::new(Arc::new(identity), storage.clone());
    session.restore();

    let catalog = CatalogClient::new(build_client(Some(session.token_source()))?, cli.api_base.as_str());

    match cli.command {
        Command::Catalog { query } => {
            if let Some(load) = load_catalog(&catalog).await {
                print!("{}", render_catalog(&load, &query));
            }
        }
        Command::Add { id } => {
            let Some(load) = load_catalog(&catalog).await else {
                return Ok(());
            };
            let course = load
                .find(&id)
                .cloned()
                .ok_or_else(|| PlannerError::UnknownCourse(id.clone()))?;
            let courses = schedule.add(course).context("could not save the schedule")?;
            print!("{}", render_schedule(&courses, &GridConfig::default()));
        }
        Command::Schedule { grid } => {
            let config = grid.to_config()?;
            print!("{}", render_schedule(&schedule.load(), &config));
        }
        Command::Remove { id } => {
            let courses = schedule.remove_by_id(&id).context("could not save the schedule")?;
            print!("{}", render_schedule(&courses, &GridConfig::default()));
        }
        Command::Clear => {
            schedule.clear().context("could not clear the schedule")?;
            println!("Schedule cleared.");
        }
        Command::Dashboard => {
            let mut changes = pin!(session.changes());
            let user = changes
                .next()
                .await
                .flatten()
                .ok_or(PlannerError::NotSignedIn)
                .context("run `course-planner login` first")?;
            print!("{}", render_dashboard(&user, &estimate(schedule.count())));
        }
        Command::Profile => {
            let user = session
                .current_user()
                .ok_or(PlannerError::NotSignedIn)
                .context("run `course-planner login` first")?;
            print!("{}", render_profile(&user));
        }
        Command::Login { idp_token, provider } => {
            if cli.firebase_api_key.is_none() {
                bail!("FIREBASE_API_KEY (or --firebase-api-key) is required to sign in");
            }
            let result = match idp_token {
                Some(token) => session.sign_in_with_idp(&provider, &token).await,
                None => {
                    let email = input("Email:")?;
                    let password = input_password("Password:")?;
                    session.sign_in_with_password(&email, &password).await
                }
            };
            let user = result.context("login failed, please try again")?;
            println!("Login successful! Signed in as {}", user.friendly_name());
        }
        Command::Logout => {
            session.sign_out();
            println!("Signed out.");
        }
    }
    Ok(())
}
