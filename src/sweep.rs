use std::ops::RangeInclusive;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::validate_config;
use crate::error::{Error, Result};
use crate::models::SweepConfig;
use crate::queuing::{QueuingCalculator, QueuingMetrics, QueuingParameters};

/// Largest number of server counts evaluated in one sweep.
pub const MAX_SWEEP_COUNT: u32 = 100_000;

#[derive(Clone, Debug, Serialize)]
pub struct SweepReport {
    pub parameters: QueuingParameters,
    pub start: u32,
    pub count: u32,
    pub results: Vec<QueuingMetrics>,
}

impl SweepReport {
    /// Smallest swept server count that reaches steady state.
    pub fn first_steady(&self) -> Option<u32> {
        self.results
            .iter()
            .find(|metrics| metrics.steady_state)
            .map(|metrics| metrics.number_of_servers)
    }
}

/// `count` consecutive server counts beginning at `start`.
pub fn server_counts(start: u32, count: u32) -> Result<RangeInclusive<u32>> {
    if start == 0 {
        return Err(Error::InvalidStart);
    }
    if count == 0 {
        return Err(Error::InvalidCount);
    }
    if count > MAX_SWEEP_COUNT {
        return Err(Error::SweepTooLarge {
            count,
            max: MAX_SWEEP_COUNT,
        });
    }
    let end = start
        .checked_add(count - 1)
        .ok_or(Error::SweepOverflow { start, count })?;
    Ok(start..=end)
}

pub fn run_sweep(config: &SweepConfig) -> Result<SweepReport> {
    validate_config(config)?;
    let start = config.start.ok_or(Error::MissingStart)?;
    let counts = server_counts(start, config.count)?;
    let calculator = QueuingCalculator::new(config.parameters());

    info!(
        start,
        count = config.count,
        arrival_rate = config.arrival_rate,
        service_rate = config.service_rate,
        "sweeping server counts"
    );
    let results: Vec<QueuingMetrics> = counts.map(|servers| calculator.compute(servers)).collect();

    let report = SweepReport {
        parameters: *calculator.parameters(),
        start,
        count: config.count,
        results,
    };
    match report.first_steady() {
        Some(servers) => info!(servers, "first steady-state configuration"),
        None => warn!(start, count = config.count, "every swept configuration is overloaded"),
    }

    Ok(report)
}

/// Evaluates a single server count with the sweep's validation rules.
pub fn run_single(config: &SweepConfig, servers: u32) -> Result<SweepReport> {
    validate_config(config)?;
    if servers == 0 {
        return Err(Error::InvalidServerCount);
    }
    let calculator = QueuingCalculator::new(config.parameters());
    Ok(SweepReport {
        parameters: *calculator.parameters(),
        start: servers,
        count: 1,
        results: vec![calculator.compute(servers)],
    })
}
