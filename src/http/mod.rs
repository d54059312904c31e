pub mod auth_middleware;
pub mod log_middleware;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};

use crate::error::Result;
use auth_middleware::{AuthHeaderMiddleware, TokenFn};
use log_middleware::RequestLogMiddleware;

/// Builds the shared HTTP client. With a token source every request carries
/// the signed-in user's id token.
pub fn build_client(token_fn: Option<TokenFn>) -> Result<ClientWithMiddleware> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("course-planner/", env!("CARGO_PKG_VERSION"))),
    );
    let client = Client::builder().default_headers(headers).build()?;

    let builder = ClientBuilder::new(client).with(RequestLogMiddleware);
    let builder = match token_fn {
        Some(token_fn) => builder.with(AuthHeaderMiddleware { token_fn }),
        None => builder,
    };
    Ok(builder.build())
}
