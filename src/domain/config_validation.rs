//! Configuration validation.
//!
//! Validates config fields before the pipeline runs. Command-line overrides
//! are applied by the caller, so required keys may be satisfied either way.

use crate::domain::error::SectorboardError;
use crate::ports::config_port::ConfigPort;
use std::net::SocketAddr;

pub const DEFAULT_OUTPUT: &str = "dashboard.html";
pub const DEFAULT_TITLE: &str = "Market Dashboard";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";

/// Fully resolved run settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub data_root: String,
    pub sector_map: String,
    pub output: String,
    pub title: String,
}

/// Resolves the run settings, preferring explicit overrides over config keys.
pub fn build_run_config(
    config: &dyn ConfigPort,
    data_root: Option<&str>,
    sector_map: Option<&str>,
    output: Option<&str>,
) -> Result<RunConfig, SectorboardError> {
    let data_root = resolve_required(config, "data", "root", data_root)?;
    let sector_map = resolve_required(config, "data", "sector_map", sector_map)?;
    let output = output
        .map(str::to_string)
        .or_else(|| config.get_string("report", "output"))
        .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
    let title = config
        .get_string("report", "title")
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    Ok(RunConfig {
        data_root,
        sector_map,
        output,
        title,
    })
}

/// Resolves only the price data root, for commands that never read sectors.
pub fn resolve_data_root(
    config: &dyn ConfigPort,
    data_root: Option<&str>,
) -> Result<String, SectorboardError> {
    resolve_required(config, "data", "root", data_root)
}

fn resolve_required(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    override_value: Option<&str>,
) -> Result<String, SectorboardError> {
    let value = override_value
        .map(str::to_string)
        .or_else(|| config.get_string(section, key))
        .ok_or_else(|| SectorboardError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        })?;
    if value.trim().is_empty() {
        return Err(SectorboardError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{} must not be empty", key),
        });
    }
    Ok(value.trim().to_string())
}

pub fn validate_listen_addr(config: &dyn ConfigPort) -> Result<SocketAddr, SectorboardError> {
    let value = config
        .get_string("web", "listen")
        .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
    value
        .trim()
        .parse()
        .map_err(|_| SectorboardError::ConfigInvalid {
            section: "web".to_string(),
            key: "listen".to_string(),
            reason: format!("'{}' is not a socket address", value),
        })
}
