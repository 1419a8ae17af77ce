use reqwest::{Client, StatusCode};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Where TimeZoneDB publishes its CSV dump
pub const DEFAULT_DATASET_URL: &str = "https://timezonedb.com/files/timezonedb.csv.zip";

/// Download the whole archive into memory with a single GET request.
///
/// Anything other than `200 OK` is treated as a failure. There is no retry:
/// regeneration is run by hand and a failed download is simply rerun.
pub async fn fetch(url: &str) -> Result<Vec<u8>> {
    let fetch_error = |reason: String| Error::Fetch {
        url: url.to_string(),
        reason,
    };

    let client = Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| fetch_error(e.to_string()))?;

    info!(url, "downloading dataset");
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| fetch_error(e.to_string()))?;

    if resp.status() != StatusCode::OK {
        return Err(fetch_error(format!("response status is {}", resp.status())));
    }

    let body = resp
        .bytes()
        .await
        .map_err(|e| fetch_error(e.to_string()))?;
    debug!(bytes = body.len(), "download complete");

    Ok(body.to_vec())
}
