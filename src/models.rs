use serde::{Deserialize, Serialize};

use crate::queuing::QueuingParameters;

pub const DEFAULT_ARRIVAL_RATE: f64 = 1.0;
pub const DEFAULT_SERVICE_RATE: f64 = 0.2;
pub const DEFAULT_SWEEP_COUNT: u32 = 10;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SweepConfig {
    #[serde(default = "default_arrival_rate")]
    pub arrival_rate: f64,
    #[serde(default = "default_service_rate")]
    pub service_rate: f64,
    #[serde(default)]
    pub start: Option<u32>,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default)]
    pub labels: Labels,
}

impl SweepConfig {
    pub fn parameters(&self) -> QueuingParameters {
        QueuingParameters::new(self.arrival_rate, self.service_rate)
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            arrival_rate: DEFAULT_ARRIVAL_RATE,
            service_rate: DEFAULT_SERVICE_RATE,
            start: None,
            count: DEFAULT_SWEEP_COUNT,
            labels: Labels::default(),
        }
    }
}

/// Nouns used by the human presenter, e.g. "polling booths" and "voters".
/// `time` labels durations ("minutes"), `time_unit` labels rates ("per minute").
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Labels {
    pub server: String,
    pub customer: String,
    pub time: String,
    pub time_unit: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            server: "servers".to_string(),
            customer: "customers".to_string(),
            time: "minutes".to_string(),
            time_unit: "minute".to_string(),
        }
    }
}

fn default_arrival_rate() -> f64 {
    DEFAULT_ARRIVAL_RATE
}

fn default_service_rate() -> f64 {
    DEFAULT_SERVICE_RATE
}

fn default_count() -> u32 {
    DEFAULT_SWEEP_COUNT
}
