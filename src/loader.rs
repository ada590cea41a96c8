use std::{fs, path::PathBuf, time::Duration};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::{cli::Source, record::PublicationRecord};

/// Where the publications live relative to the page.
pub const DEFAULT_SOURCE: &str = "./data/publications_since_2020.json";

/// Everything that can stop the list from being loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to load publications: {status}")]
    Http { status: u16 },

    #[error("Failed to parse publications: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to fetch publications from {url}: {source}")]
    Network {
        url: Url,
        #[source]
        source: ureq::Error,
    },

    #[error("Failed to read publications from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Load the record list from `source`.
///
/// A payload without an `items` array is not an error; it simply has nothing to show.
pub fn load(
    source: &Source,
    timeout: Option<Duration>,
) -> Result<Vec<PublicationRecord>, LoadError> {
    let body = match source {
        Source::Url(url) => fetch(url, timeout)?,
        Source::File(path) => fs::read(path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?,
    };
    let records = parse_items(&body)?;
    info!(%source, records = records.len(), "loaded publications");
    Ok(records)
}

/// Fetch `url`, asking every cache on the way to stay out of it.
fn fetch(url: &Url, timeout: Option<Duration>) -> Result<Vec<u8>, LoadError> {
    let network = |source: ureq::Error| LoadError::Network {
        url: url.clone(),
        source,
    };
    let cfg = ureq::Agent::config_builder()
        .timeout_connect(Some(Duration::from_secs(5)))
        .timeout_global(timeout)
        .http_status_as_error(false)
        .build();
    let agent = ureq::Agent::new_with_config(cfg);
    let mut res = agent
        .get(url.as_str())
        .header("Accept", "application/json")
        .header("Cache-Control", "no-store")
        .header("Pragma", "no-cache")
        .call()
        .map_err(network)?;

    let status = res.status();
    debug!(%url, status = status.as_u16(), "publications response");
    if !status.is_success() {
        return Err(LoadError::Http {
            status: status.as_u16(),
        });
    }
    res.body_mut().read_to_vec().map_err(network)
}

/// Pull the `items` array out of a payload.
pub fn parse_items(body: &[u8]) -> Result<Vec<PublicationRecord>, LoadError> {
    let payload: Value = serde_json::from_slice(body)?;
    let items = match payload {
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    Ok(items.into_iter().map(PublicationRecord::from_value).collect())
}
