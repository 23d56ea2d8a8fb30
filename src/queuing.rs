//! Steady-state metrics for the M/M/c queue.
//!
//! The calculator is a pure function of the arrival rate, the per-server
//! service rate and the number of servers. An overloaded system
//! (utilization >= 1) is reported as a value with unbounded queue metrics,
//! never as an error.

use serde::Serialize;
use tracing::debug;

/// Fixed model inputs: λ (arrivals per unit time) and μ (completions per
/// unit time per server).
///
/// These are not validated here; `config::validate_config` rejects
/// non-positive or non-finite rates before a calculator is built from user
/// input.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct QueuingParameters {
    pub arrival_rate: f64,
    pub service_rate: f64,
}

impl QueuingParameters {
    pub fn new(arrival_rate: f64, service_rate: f64) -> Self {
        Self {
            arrival_rate,
            service_rate,
        }
    }

    /// Offered load r = λ/μ, in Erlangs.
    pub fn offered_load(&self) -> f64 {
        self.arrival_rate / self.service_rate
    }

    /// Per-server utilization ρ = λ/(c·μ).
    pub fn utilization(&self, servers: u32) -> f64 {
        self.arrival_rate / (f64::from(servers) * self.service_rate)
    }

    /// Mean duration of a single service, 1/μ.
    pub fn mean_service_time(&self) -> f64 {
        1.0 / self.service_rate
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QueuingMetrics {
    pub number_of_servers: u32,
    pub steady_state: bool,
    pub server_utilization: f64,
    pub probability_of_system_idle: f64,
    pub probability_arrival_has_to_wait: f64,
    pub expected_queue_length: f64,
    pub average_waiting_time_in_queue: f64,
    pub average_waiting_time_in_system: f64,
}

impl QueuingMetrics {
    fn overloaded(servers: u32, utilization: f64) -> Self {
        Self {
            number_of_servers: servers,
            steady_state: false,
            server_utilization: utilization,
            probability_of_system_idle: 0.0,
            probability_arrival_has_to_wait: 1.0,
            expected_queue_length: f64::INFINITY,
            average_waiting_time_in_queue: f64::INFINITY,
            average_waiting_time_in_system: f64::INFINITY,
        }
    }

    /// Expected number of customers in the system, Ls = Lq + λ/μ.
    pub fn expected_in_system(&self, params: &QueuingParameters) -> f64 {
        self.expected_queue_length + params.offered_load()
    }
}

/// Computes M/M/c metrics for a fixed pair of rates.
#[derive(Clone, Copy, Debug)]
pub struct QueuingCalculator {
    params: QueuingParameters,
}

impl QueuingCalculator {
    pub fn new(params: QueuingParameters) -> Self {
        Self { params }
    }

    pub fn parameters(&self) -> &QueuingParameters {
        &self.params
    }

    pub fn compute(&self, servers: u32) -> QueuingMetrics {
        compute_metrics(&self.params, servers)
    }
}

/// ln-ratio below which a Poisson term no longer changes the running sum.
const NEGLIGIBLE_LN_RATIO: f64 = -40.0;

/// Evaluates the Erlang-C family for `servers` parallel servers.
///
/// The Poisson terms r^k/k! are built with the recurrence
/// term_k = term_{k-1}·r/k in log space and summed with a running
/// log-sum-exp, so neither c! nor r^c is ever formed and memory is constant.
/// Once k passes 2r each term at most halves the previous one; when a term
/// drops below rounding the remaining summands are skipped and the c-term is
/// reached through Stirling's series. Results match the textbook formulas
/// for any `u32` server count.
///
/// `servers == 0` gives an infinite utilization and takes the overloaded
/// branch.
pub fn compute_metrics(params: &QueuingParameters, servers: u32) -> QueuingMetrics {
    let utilization = params.utilization(servers);
    if utilization >= 1.0 {
        debug!(servers, utilization, "overloaded, queue metrics unbounded");
        return QueuingMetrics::overloaded(servers, utilization);
    }

    let offered_load = params.offered_load();
    let ln_load = offered_load.ln();
    // ln(r^k / k!) and ln(k!) for the current k.
    let mut ln_term = 0.0;
    let mut ln_factorial = 0.0;
    let mut peak: f64 = 0.0;
    // k < c customers present: at least one server free. Scaled by e^-peak.
    let mut below_capacity = 0.0;
    let mut k = 0u32;
    while k < servers {
        if ln_term > peak {
            below_capacity *= (peak - ln_term).exp();
            peak = ln_term;
        }
        below_capacity += (ln_term - peak).exp();
        if f64::from(k) + 1.0 >= 2.0 * offered_load && ln_term - peak < NEGLIGIBLE_LN_RATIO {
            break;
        }
        k += 1;
        let ln_k = f64::from(k).ln();
        ln_term += ln_load - ln_k;
        ln_factorial += ln_k;
    }

    let ln_tail = if k == servers {
        ln_term
    } else {
        ln_term + f64::from(servers - k) * ln_load
            - (ln_factorial_stirling(f64::from(servers)) - ln_factorial)
    };
    if ln_tail > peak {
        below_capacity *= (peak - ln_tail).exp();
        peak = ln_tail;
    }
    // k >= c customers present: geometric tail over the queue.
    let at_capacity = (ln_tail - peak).exp() / (1.0 - utilization);
    let normaliser = below_capacity + at_capacity;

    let idle = (-peak).exp() / normaliser;
    let wait = at_capacity / normaliser;
    let queue_length = wait * utilization / (1.0 - utilization);
    let wait_in_queue = queue_length / params.arrival_rate;
    let wait_in_system = wait_in_queue + params.mean_service_time();

    debug!(
        servers,
        utilization,
        p_wait = wait,
        lq = queue_length,
        "steady state"
    );

    QueuingMetrics {
        number_of_servers: servers,
        steady_state: true,
        server_utilization: utilization,
        probability_of_system_idle: idle,
        probability_arrival_has_to_wait: wait,
        expected_queue_length: queue_length,
        average_waiting_time_in_queue: wait_in_queue,
        average_waiting_time_in_system: wait_in_system,
    }
}

/// Stirling's series for ln(n!).
fn ln_factorial_stirling(n: f64) -> f64 {
    n * n.ln() - n + 0.5 * (std::f64::consts::TAU * n).ln() + 1.0 / (12.0 * n)
        - 1.0 / (360.0 * n * n * n)
}
