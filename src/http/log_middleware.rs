use std::time::Instant;

use http::Extensions;
use log::debug;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result};

/// Logs method, path, status and latency of every outbound request.
/// Query strings are left out since they can carry API keys.
pub struct RequestLogMiddleware;

#[async_trait::async_trait]
impl Middleware for RequestLogMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        let method = req.method().clone();
        let target = format!("{}{}", req.url().origin().ascii_serialization(), req.url().path());
        let started = Instant::now();

        let result = next.run(req, extensions).await;
        match &result {
            Ok(response) => debug!(
                "{} {} -> {} in {:?}",
                method,
                target,
                response.status(),
                started.elapsed()
            ),
            Err(err) => debug!("{} {} failed after {:?}: {}", method, target, started.elapsed(), err),
        }
        result
    }
}
