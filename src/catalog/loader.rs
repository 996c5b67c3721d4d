use serde::Deserialize;
use std::path::PathBuf;

use super::CatalogStore;
use crate::{
    error::{AppError, AppResult},
    models::Destination,
};

/// Columns a catalog must carry for its rows to be matchable
const REQUIRED_COLUMNS: [&str; 5] = [
    "Destination",
    "Destination_Type",
    "Travel_Purpose",
    "Travel_season",
    "Budget",
];

/// Where the catalog is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Url(String),
}

impl CatalogSource {
    /// Interprets `http://` and `https://` locations as URLs, anything else as a path
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            CatalogSource::Url(trimmed.to_string())
        } else {
            CatalogSource::File(PathBuf::from(trimmed))
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// One raw catalog row; blanks are rejected later by [`Destination::new`]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogRow {
    #[serde(rename = "Destination")]
    destination: String,
    #[serde(rename = "Destination_Type")]
    destination_type: String,
    #[serde(rename = "Travel_Purpose")]
    travel_purpose: String,
    #[serde(rename = "Travel_season")]
    travel_season: String,
    #[serde(rename = "Budget")]
    budget: String,
    #[serde(rename = "Municipality")]
    municipality: String,
    #[serde(rename = "Packing Tips")]
    packing_tips: String,
}

/// Reads and parses the catalog
///
/// Any failure to obtain the bytes or to read the header row is a
/// [`AppError::CatalogUnavailable`]; malformed data rows are skipped with a warning.
pub async fn load(source: &CatalogSource, http_client: &reqwest::Client) -> AppResult<CatalogStore> {
    tracing::info!(source = %source, "Loading destination catalog");

    let bytes = match source {
        CatalogSource::File(path) => tokio::fs::read(path).await.map_err(|e| {
            AppError::CatalogUnavailable(format!("cannot read {}: {}", path.display(), e))
        })?,
        CatalogSource::Url(url) => fetch(http_client, url).await?,
    };

    parse_catalog(&bytes)
}

async fn fetch(http_client: &reqwest::Client, url: &str) -> AppResult<Vec<u8>> {
    let response = http_client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| AppError::CatalogUnavailable(format!("cannot fetch {}: {}", url, e)))?;

    let body = response
        .bytes()
        .await
        .map_err(|e| AppError::CatalogUnavailable(format!("cannot read body of {}: {}", url, e)))?;

    Ok(body.to_vec())
}

/// Parses CSV bytes into a catalog snapshot
pub fn parse_catalog(bytes: &[u8]) -> AppResult<CatalogStore> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| AppError::CatalogUnavailable(format!("unreadable header row: {}", e)))?
        .clone();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::CatalogUnavailable(format!(
            "missing columns: {}",
            missing.join(", ")
        )));
    }

    let mut destinations = Vec::new();
    let mut skipped = 0usize;

    for (index, result) in reader.deserialize::<CatalogRow>().enumerate() {
        // header is line 1
        let line = index + 2;

        let row = match result {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!(line, error = %e, "Skipping unreadable catalog row");
                skipped += 1;
                continue;
            }
        };

        match Destination::new(
            &row.destination,
            &row.destination_type,
            &row.travel_purpose,
            &row.travel_season,
            &row.municipality,
            &row.budget,
            &row.packing_tips,
        ) {
            Ok(destination) => destinations.push(destination),
            Err(e) => {
                tracing::warn!(
                    line,
                    destination = %row.destination,
                    error = %e,
                    "Skipping malformed catalog row"
                );
                skipped += 1;
            }
        }
    }

    tracing::info!(
        rows_loaded = destinations.len(),
        rows_skipped = skipped,
        "Destination catalog parsed"
    );

    Ok(CatalogStore::new(destinations))
}
