use std::fs;
use std::path::Path;

use crate::cli::{RateArgs, SweepArgs};
use crate::error::{Error, Result};
use crate::models::SweepConfig;
use crate::sweep::server_counts;

pub fn load_config(path: &Path) -> Result<SweepConfig> {
    let contents = fs::read_to_string(path).map_err(|err| {
        Error::ConfigIo(format!(
            "failed to read config '{}': {}",
            path.display(),
            err
        ))
    })?;
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .unwrap_or("");

    match ext {
        "toml" => toml::from_str(&contents)
            .map_err(|err| Error::ConfigParse(format!("failed to parse TOML: {}", err))),
        "json" => serde_json::from_str(&contents)
            .map_err(|err| Error::ConfigParse(format!("failed to parse JSON: {}", err))),
        "" => Err(Error::UnsupportedConfigFormat("unknown".to_string())),
        _ => Err(Error::UnsupportedConfigFormat(ext.to_string())),
    }
}

/// Resolves rates from an optional config file, with explicit flags taking
/// precedence.
pub fn build_rate_config(args: &RateArgs) -> Result<SweepConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SweepConfig::default(),
    };
    if let Some(rate) = args.arrival_rate {
        config.arrival_rate = rate;
    }
    if let Some(rate) = args.service_rate {
        config.service_rate = rate;
    }
    Ok(config)
}

pub fn build_config(args: &SweepArgs) -> Result<SweepConfig> {
    let mut config = build_rate_config(&args.rates)?;
    if args.start.is_some() {
        config.start = args.start;
    }
    if let Some(count) = args.count {
        config.count = count;
    }
    validate_config(&config)?;
    Ok(config)
}

/// Boundary checks for user-supplied configuration. The queuing core
/// assumes these hold and does not repeat them.
pub fn validate_config(config: &SweepConfig) -> Result<()> {
    if !(config.arrival_rate.is_finite() && config.arrival_rate > 0.0) {
        return Err(Error::InvalidArrivalRate(config.arrival_rate));
    }
    if !(config.service_rate.is_finite() && config.service_rate > 0.0) {
        return Err(Error::InvalidServiceRate(config.service_rate));
    }
    // Without a start the range is checked from 1; the prompt fills it in later.
    server_counts(config.start.unwrap_or(1), config.count)?;
    Ok(())
}
