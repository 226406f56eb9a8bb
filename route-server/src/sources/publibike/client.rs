//! PubliBike HTTP client.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::cache::{CacheConfig, DirectoryEntry, StationDirectoryCache};
use crate::domain::StationSnapshot;
use crate::sources::{AdapterError, SearchArea, StationFeed, read_body};

use super::types::StationDto;

/// Default base URL for the PubliBike public API.
const DEFAULT_BASE_URL: &str = "https://api.publibike.ch/v1";

/// Default maximum concurrent detail requests.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Configuration for the PubliBike client.
#[derive(Debug, Clone)]
pub struct PubliBikeConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent station detail requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Station directory cache settings
    pub cache: CacheConfig,
}

impl Default for PubliBikeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
            cache: CacheConfig::default(),
        }
    }
}

impl PubliBikeConfig {
    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set maximum concurrent detail requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// PubliBike API client.
///
/// Uses a semaphore to limit concurrent detail requests and a shared cache
/// for the station directory.
#[derive(Debug, Clone)]
pub struct PubliBikeClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
    directory: StationDirectoryCache,
}

impl PubliBikeClient {
    /// Create a new PubliBike client with the given configuration.
    pub fn new(config: PubliBikeConfig) -> Result<Self, AdapterError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
            directory: StationDirectoryCache::new(&config.cache),
        })
    }

    /// Overview of all stations, from cache when fresh.
    pub async fn directory(&self) -> Result<DirectoryEntry, AdapterError> {
        if let Some(cached) = self.directory.get(&self.base_url).await {
            return Ok(cached);
        }

        let url = format!("{}/public/stations", self.base_url);
        let response = self.http.get(&url).send().await?;
        let body = read_body(response).await?;

        let stations: Vec<StationDto> =
            serde_json::from_str(&body).map_err(|e| AdapterError::json(e, &body))?;

        debug!(count = stations.len(), "Fetched PubliBike station directory");

        let entry = Arc::new(stations);
        self.directory
            .insert(self.base_url.clone(), entry.clone())
            .await;
        Ok(entry)
    }

    /// Details (including vehicles) for one station.
    pub async fn station_details(&self, id: i64) -> Result<StationDto, AdapterError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| AdapterError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/public/stations/{}", self.base_url, id);
        let response = self.http.get(&url).send().await?;
        let body = read_body(response).await?;

        serde_json::from_str(&body).map_err(|e| AdapterError::json(e, &body))
    }

    /// Active stations inside `area`, with live occupancy.
    ///
    /// A station whose detail request fails is reported from the overview,
    /// i.e. with no bikes, so it can still serve as a return station.
    pub async fn stations_in(&self, area: &SearchArea) -> Result<Vec<StationSnapshot>, AdapterError> {
        let directory = self.directory().await?;

        let candidates: Vec<&StationDto> = directory
            .iter()
            .filter(|s| s.is_active())
            .filter(|s| s.location().is_ok_and(|loc| area.contains(&loc)))
            .collect();

        let futures: Vec<_> = candidates
            .iter()
            .map(|overview| async move {
                match self.station_details(overview.id).await {
                    Ok(detail) => detail,
                    Err(e) => {
                        debug!(
                            station = overview.id,
                            error = %e,
                            "Failed to fetch station details, using overview"
                        );
                        (*overview).clone()
                    }
                }
            })
            .collect();

        let snapshots = join_all(futures)
            .await
            .iter()
            .filter_map(|dto| match dto.to_snapshot() {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    warn!(station = dto.id, error = %e, "Skipping station with bad position");
                    None
                }
            })
            .collect();

        Ok(snapshots)
    }
}

impl StationFeed for PubliBikeClient {
    async fn list_stations(&self, area: &SearchArea) -> Result<Vec<StationSnapshot>, AdapterError> {
        self.stations_in(area).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = PubliBikeConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_concurrent, 8);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let config = PubliBikeConfig::default().with_base_url("http://localhost:9000/v1/");
        assert_eq!(config.base_url, "http://localhost:9000/v1");
    }

    #[tokio::test]
    async fn cached_directory_avoids_request() {
        // Unroutable base URL: any real request would fail
        let config = PubliBikeConfig::default()
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(1);
        let client = PubliBikeClient::new(config).unwrap();

        let station: StationDto = serde_json::from_value(serde_json::json!({
            "id": 1, "latitude": 46.948, "longitude": 7.44, "state": {"id": 1}
        }))
        .unwrap();
        client
            .directory
            .insert("http://127.0.0.1:9", Arc::new(vec![station]))
            .await;

        let directory = client.directory().await.unwrap();
        assert_eq!(directory.len(), 1);

        // Detail request fails, overview is used instead
        let area = SearchArea::new(crate::domain::Coordinate::new(46.948, 7.44).unwrap(), 500.0);
        let stations = client.list_stations(&area).await.unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].bikes_available, 0);
    }
}
