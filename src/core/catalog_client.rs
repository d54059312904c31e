use log::{info, warn};
use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::core::catalog::CatalogLoad;
use crate::core::normalizer::normalize;
use crate::error::{PlannerError, Result};
use crate::model::course::{Course, RawCourse};

pub const DEFAULT_API_BASE: &str = "http://localhost:3001";

pub struct CatalogClient {
    client: ClientWithMiddleware,
    api_base: String,
}

impl CatalogClient {
    pub fn new(client: ClientWithMiddleware, api_base: impl Into<String>) -> Self {
        CatalogClient {
            client,
            api_base: api_base.into(),
        }
    }

    pub fn courses_url(&self) -> Result<Url> {
        Ok(Url::parse(&format!(
            "{}/api/courses",
            self.api_base.trim_end_matches('/')
        ))?)
    }

    /// One `GET /api/courses`. Non-2xx answers are errors; a body that is not
    /// a JSON array yields no courses.
    pub async fn fetch_courses(&self) -> Result<Vec<Course>> {
        let response = self.client.get(self.courses_url()?).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PlannerError::Status(status));
        }
        let json: Value = response.json().await?;
        Ok(courses_from_json(json))
    }

    /// Fetches once and falls back to the fixed catalog on any failure.
    /// Returns `None` when `cancel` fires first, so a view that has gone away
    /// never sees the result.
    pub async fn load(&self, cancel: &CancellationToken) -> Option<CatalogLoad> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("catalog load cancelled, discarding result");
                None
            }
            result = self.fetch_courses() => {
                if cancel.is_cancelled() {
                    info!("catalog load finished after cancellation, discarding result");
                    return None;
                }
                Some(CatalogLoad::from_fetch(result))
            }
        }
    }
}

pub fn courses_from_json(json: Value) -> Vec<Course> {
    let Value::Array(rows) = json else {
        warn!("catalog response is not a list");
        return Vec::new();
    };
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<RawCourse>(row) {
            Ok(raw) => Some(normalize(raw)),
            Err(err) => {
                warn!("skipping unreadable catalog row: {}", err);
                None
            }
        })
        .collect()
}
