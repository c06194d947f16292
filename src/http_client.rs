use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

const FIXTURE_REQUEST_TIMEOUT_SECS: u64 = 10;
const FIXTURE_USER_AGENT: &str = "Mozilla/5.0";

static FIXTURE_CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared blocking client for fixture feeds. FotMob rejects requests
/// without a browser user agent, so it is set once here.
pub fn fixture_client() -> Result<&'static Client> {
    FIXTURE_CLIENT.get_or_try_init(|| {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(FIXTURE_USER_AGENT));
        Client::builder()
            .timeout(Duration::from_secs(FIXTURE_REQUEST_TIMEOUT_SECS))
            .default_headers(headers)
            .build()
            .context("failed to build fixture http client")
    })
}
