use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::Labels;
use crate::queuing::QueuingMetrics;
use crate::sweep::SweepReport;

pub trait Formatter {
    fn write(&self, report: &SweepReport, labels: &Labels) -> Result<String>;
}

/// Sentences per server count, one template for steady systems and one for
/// overloaded ones.
pub struct HumanFormatter;

/// One line per server count.
pub struct SummaryFormatter;

/// Pretty-printed JSON. Infinite metrics serialise as `null`.
pub struct JsonFormatter;

impl Formatter for HumanFormatter {
    fn write(&self, report: &SweepReport, labels: &Labels) -> Result<String> {
        let noun = if report.count == 1 {
            "configuration"
        } else {
            "configurations"
        };
        let mut lines = vec![
            "--- M/M/c Queue Analysis ---".to_string(),
            format!(
                "Analyzing {} {} starting from {} {}.",
                report.count, noun, report.start, labels.server
            ),
            format!(
                "Arrival rate (λ): {} {} per {}",
                report.parameters.arrival_rate, labels.customer, labels.time_unit
            ),
            format!(
                "Service rate per server (μ): {} {} per {}",
                report.parameters.service_rate, labels.customer, labels.time_unit
            ),
        ];

        for metrics in &report.results {
            lines.push(String::new());
            lines.push(format!(
                "--- Results for {} {} ---",
                metrics.number_of_servers, labels.server
            ));
            if metrics.steady_state {
                steady_lines(&mut lines, metrics, labels);
            } else {
                overloaded_lines(&mut lines, metrics, labels);
            }
        }

        lines.push(String::new());
        lines.push(match report.first_steady() {
            Some(servers) => format!(
                "Fewest {} reaching a steady state in this range: {}",
                labels.server, servers
            ),
            None => "No configuration in this range reaches a steady state.".to_string(),
        });
        lines.push("--- Analysis Complete ---".to_string());
        Ok(join_lines(&lines))
    }
}

fn steady_lines(lines: &mut Vec<String>, metrics: &QueuingMetrics, labels: &Labels) {
    let lead = format!(
        "When the number of {} is {},",
        labels.server, metrics.number_of_servers
    );
    lines.extend([
        format!(
            "{} the probability that an arrival has to wait is {}.",
            lead,
            percent(metrics.probability_arrival_has_to_wait)
        ),
        format!(
            "{} the probability of finding the system idle is {:.4}.",
            lead, metrics.probability_of_system_idle
        ),
        format!(
            "{} the expected queue length is {:.2} {}.",
            lead, metrics.expected_queue_length, labels.customer
        ),
        format!(
            "{} the average waiting time in the queue is {:.2} {}.",
            lead, metrics.average_waiting_time_in_queue, labels.time
        ),
        format!(
            "{} the average waiting time in the system is {:.2} {}.",
            lead, metrics.average_waiting_time_in_system, labels.time
        ),
        format!(
            "{} the server utilization is {}.",
            lead,
            percent(metrics.server_utilization)
        ),
        "The system is in a steady state.".to_string(),
    ]);
}

fn overloaded_lines(lines: &mut Vec<String>, metrics: &QueuingMetrics, labels: &Labels) {
    let lead = "While overloaded,";
    lines.extend([
        format!(
            "When the number of {} is {}, the system is OVERLOADED.",
            labels.server, metrics.number_of_servers
        ),
        format!(
            "{} the server utilization is {}.",
            lead,
            percent(metrics.server_utilization)
        ),
        format!(
            "{} the probability that an arrival has to wait is {}.",
            lead,
            percent(metrics.probability_arrival_has_to_wait)
        ),
        format!(
            "{} the probability of finding the system idle is {:.2}.",
            lead, metrics.probability_of_system_idle
        ),
        format!("{} the expected queue length is infinite.", lead),
        format!("{} the average waiting time in the queue is infinite.", lead),
        format!("{} the average waiting time in the system is infinite.", lead),
        "The system is NOT in a steady state.".to_string(),
    ]);
}

impl Formatter for SummaryFormatter {
    fn write(&self, report: &SweepReport, _labels: &Labels) -> Result<String> {
        let mut lines = vec![format!(
            "lambda={} mu={} start={} count={}",
            report.parameters.arrival_rate,
            report.parameters.service_rate,
            report.start,
            report.count
        )];
        for metrics in &report.results {
            let state = if metrics.steady_state {
                "steady"
            } else {
                "overloaded"
            };
            lines.push(format!(
                "c={} {} rho={} p_wait={} p0={:.4} lq={:.2} wq={:.2} ws={:.2}",
                metrics.number_of_servers,
                state,
                percent(metrics.server_utilization),
                percent(metrics.probability_arrival_has_to_wait),
                metrics.probability_of_system_idle,
                metrics.expected_queue_length,
                metrics.average_waiting_time_in_queue,
                metrics.average_waiting_time_in_system
            ));
        }
        lines.push(match report.first_steady() {
            Some(servers) => format!("first_steady={}", servers),
            None => "first_steady=none".to_string(),
        });
        Ok(join_lines(&lines))
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a SweepReport,
    first_steady: Option<u32>,
}

impl Formatter for JsonFormatter {
    fn write(&self, report: &SweepReport, _labels: &Labels) -> Result<String> {
        let body = JsonReport {
            report,
            first_steady: report.first_steady(),
        };
        let mut out = serde_json::to_string_pretty(&body)
            .map_err(|err| Error::Output(format!("failed to serialize report: {}", err)))?;
        out.push('\n');
        Ok(out)
    }
}

fn join_lines(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SweepConfig;
    use crate::sweep::run_sweep;

    fn report(start: u32, count: u32) -> SweepReport {
        let config = SweepConfig {
            start: Some(start),
            count,
            ..SweepConfig::default()
        };
        run_sweep(&config).expect("sweep should succeed")
    }

    #[test]
    fn human_uses_steady_template() {
        let out = HumanFormatter
            .write(&report(6, 1), &Labels::default())
            .unwrap();
        assert!(out.contains(
            "When the number of servers is 6, the probability that an arrival has to wait is 58.75%."
        ));
        assert!(out.contains("the probability of finding the system idle is 0.0045."));
        assert!(out.contains("the expected queue length is 2.94 customers."));
        assert!(out.contains("the average waiting time in the system is 7.94 minutes."));
        assert!(out.contains("the server utilization is 83.33%."));
        assert!(out.contains("The system is in a steady state."));
        assert!(!out.contains("OVERLOADED"));
    }

    #[test]
    fn human_header_uses_configured_time_unit() {
        let labels = Labels {
            time: "hours".to_string(),
            time_unit: "hour".to_string(),
            ..Labels::default()
        };
        let out = HumanFormatter.write(&report(6, 1), &labels).unwrap();
        assert!(out.contains("Arrival rate (λ): 1 customers per hour\n"));
        assert!(out.contains("Service rate per server (μ): 0.2 customers per hour\n"));
        assert!(out.contains("the average waiting time in the queue is 2.94 hours."));
        assert!(!out.contains("unit time"));
    }

    #[test]
    fn human_output_ends_with_single_newline() {
        let out = HumanFormatter
            .write(&report(6, 1), &Labels::default())
            .unwrap();
        assert!(out.starts_with("--- M/M/c Queue Analysis ---\n"));
        assert!(out.ends_with("--- Analysis Complete ---\n"));
        assert!(out.contains("starting from 6 servers.\n\n--- Results for 6 servers ---\n"));
    }

    #[test]
    fn human_uses_overloaded_template() {
        let out = HumanFormatter
            .write(&report(5, 1), &Labels::default())
            .unwrap();
        assert!(out.contains("When the number of servers is 5, the system is OVERLOADED."));
        assert!(out.contains("While overloaded, the server utilization is 100.00%."));
        assert!(out.contains("the probability of finding the system idle is 0.00."));
        assert!(out.contains("the expected queue length is infinite."));
        assert!(out.contains("The system is NOT in a steady state."));
        assert!(out.contains("No configuration in this range reaches a steady state."));
    }

    #[test]
    fn human_applies_labels() {
        let labels = Labels {
            server: "polling booths".to_string(),
            customer: "voters".to_string(),
            time: "minutes".to_string(),
            time_unit: "minute".to_string(),
        };
        let out = HumanFormatter.write(&report(6, 2), &labels).unwrap();
        assert!(out.contains("Arrival rate (λ): 1 voters per minute"));
        assert!(out.contains("--- Results for 7 polling booths ---"));
        assert!(out.contains("the expected queue length is 0.81 voters."));
        assert!(out.contains("Fewest polling booths reaching a steady state in this range: 6"));
    }

    #[test]
    fn summary_prints_infinity_as_inf() {
        let out = SummaryFormatter
            .write(&report(5, 2), &Labels::default())
            .unwrap();
        let expected = concat!(
            "lambda=1 mu=0.2 start=5 count=2\n",
            "c=5 overloaded rho=100.00% p_wait=100.00% p0=0.0000 lq=inf wq=inf ws=inf\n",
            "c=6 steady rho=83.33% p_wait=58.75% p0=0.0045 lq=2.94 wq=2.94 ws=7.94\n",
            "first_steady=6\n",
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn json_serialises_infinity_as_null() {
        let out = JsonFormatter
            .write(&report(5, 2), &Labels::default())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["first_steady"], 6);
        assert_eq!(value["parameters"]["arrival_rate"], 1.0);
        let results = value["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["steady_state"], false);
        assert!(results[0]["expected_queue_length"].is_null());
        assert_eq!(results[1]["number_of_servers"], 6);
        assert!(results[1]["expected_queue_length"].as_f64().unwrap() > 2.9);
    }
}
