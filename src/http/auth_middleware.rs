use std::sync::Arc;

use http::Extensions;
use log::warn;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result};

/// Yields the current id token, or `None` while signed out.
pub type TokenFn = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Attaches `Authorization: Bearer <id token>` while a user is signed in.
pub struct AuthHeaderMiddleware {
    pub token_fn: TokenFn,
}

#[async_trait::async_trait]
impl Middleware for AuthHeaderMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        if let Some(token) = (self.token_fn)() {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    req.headers_mut().insert(AUTHORIZATION, value);
                }
                Err(err) => warn!("id token is not a valid header value, sending anonymously: {}", err),
            }
        }
        next.run(req, extensions).await
    }
}
