//! Process configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::planner::PlannerConfig;
use crate::sources::otp::OtpConfig;
use crate::sources::publibike::PubliBikeConfig;
use crate::sources::sharedmobility::SharedMobilityConfig;

/// Allowed range for the per-source timeout, in seconds.
pub const ADAPTER_TIMEOUT_RANGE: (u64, u64) = (8, 12);

/// Everything `main` needs to start the server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub otp: OtpConfig,
    pub publibike: PubliBikeConfig,
    pub sharedmobility: SharedMobilityConfig,
    pub planner: PlannerConfig,
    /// Serve recorded responses from this directory instead of live APIs.
    pub fixture_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            otp: OtpConfig::default(),
            publibike: PubliBikeConfig::default(),
            sharedmobility: SharedMobilityConfig::default(),
            planner: PlannerConfig::default(),
            fixture_dir: None,
        }
    }
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`. Unset or unparseable
    /// values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(addr) = var("BIND_ADDR") {
            match addr.parse() {
                Ok(addr) => config.bind_addr = addr,
                Err(e) => warn!(value = %addr, error = %e, "Ignoring invalid BIND_ADDR"),
            }
        }
        if let Some(url) = var("OTP_BASE_URL") {
            config.otp = config.otp.with_base_url(url);
        }
        if let Some(router) = var("OTP_ROUTER_ID") {
            config.otp = config.otp.with_router_id(router);
        }
        if let Some(url) = var("PUBLIBIKE_API_BASE") {
            config.publibike = config.publibike.with_base_url(url);
        }
        if let Some(url) = var("SHAREDMOBILITY_BASE_URL") {
            config.sharedmobility = config.sharedmobility.with_base_url(url);
        }
        if let Some(secs) = var("ADAPTER_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(secs) => config = config.with_adapter_timeout_secs(secs),
                Err(e) => warn!(value = %secs, error = %e, "Ignoring invalid ADAPTER_TIMEOUT_SECS"),
            }
        }
        config.fixture_dir = var("FIXTURE_DIR").map(PathBuf::from);

        config
    }

    /// Set the per-source timeout, clamped to the allowed range.
    ///
    /// HTTP clients get the same limit so a late answer is abandoned
    /// rather than read and discarded.
    pub fn with_adapter_timeout_secs(mut self, secs: u64) -> Self {
        let (min, max) = ADAPTER_TIMEOUT_RANGE;
        let clamped = secs.clamp(min, max);
        if clamped != secs {
            warn!(requested = secs, used = clamped, "Adapter timeout out of range, clamped");
        }

        self.planner = self
            .planner
            .with_adapter_timeout(Duration::from_secs(clamped));
        self.otp = self.otp.with_timeout(clamped);
        self.publibike = self.publibike.with_timeout(clamped);
        self.sharedmobility = self.sharedmobility.with_timeout(clamped);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = from_pairs(&[]);
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.planner.adapter_timeout, Duration::from_secs(10));
        assert!(config.fixture_dir.is_none());
    }

    #[test]
    fn reads_variables() {
        let config = from_pairs(&[
            ("BIND_ADDR", "0.0.0.0:8000"),
            ("OTP_BASE_URL", "http://otp:8080/otp"),
            ("OTP_ROUTER_ID", "bern"),
            ("PUBLIBIKE_API_BASE", "http://bikes/v1/"),
            ("SHAREDMOBILITY_BASE_URL", "http://sm/v1"),
            ("ADAPTER_TIMEOUT_SECS", "9"),
            ("FIXTURE_DIR", "data/fixtures"),
        ]);

        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.otp.base_url, "http://otp:8080/otp");
        assert_eq!(config.otp.router_id, "bern");
        assert_eq!(config.publibike.base_url, "http://bikes/v1");
        assert_eq!(config.sharedmobility.base_url, "http://sm/v1");
        assert_eq!(config.planner.adapter_timeout, Duration::from_secs(9));
        assert_eq!(config.otp.timeout_secs, 9);
        assert_eq!(config.fixture_dir, Some(PathBuf::from("data/fixtures")));
    }

    #[test]
    fn timeout_clamped_to_range() {
        let low = from_pairs(&[("ADAPTER_TIMEOUT_SECS", "2")]);
        assert_eq!(low.planner.adapter_timeout, Duration::from_secs(8));

        let high = from_pairs(&[("ADAPTER_TIMEOUT_SECS", "60")]);
        assert_eq!(high.planner.adapter_timeout, Duration::from_secs(12));
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let config = from_pairs(&[("BIND_ADDR", "nowhere"), ("ADAPTER_TIMEOUT_SECS", "soon")]);
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.planner.adapter_timeout, Duration::from_secs(10));
    }
}
