use std::io;

use mmc_sweep::cli::{self, Command, FormatArg};
use mmc_sweep::config;
use mmc_sweep::error::Result;
use mmc_sweep::logging;
use mmc_sweep::models::SweepConfig;
use mmc_sweep::output::{Formatter, HumanFormatter, JsonFormatter, SummaryFormatter};
use mmc_sweep::sweep;

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = cli::parse_args()?;

    match args.command {
        Command::Run(args) => {
            let mut config = config::build_config(&args.sweep)?;
            if config.start.is_none() {
                let stdin = io::stdin();
                let start = cli::prompt_start(&mut stdin.lock(), &mut io::stderr())?;
                config.start = Some(start);
            }
            let report = sweep::run_sweep(&config)?;
            print!("{}", formatter_for(args.format).write(&report, &config.labels)?);
        }
        Command::Compute(args) => {
            let config = config::build_rate_config(&args.rates)?;
            let report = sweep::run_single(&config, args.servers)?;
            print!("{}", formatter_for(args.format).write(&report, &config.labels)?);
        }
        Command::ShowConfig(args) => {
            let config = config::build_config(&args)?;
            print_config(&config);
        }
    }

    Ok(())
}

fn print_config(config: &SweepConfig) {
    println!("Arrival rate: {}", config.arrival_rate);
    println!("Service rate: {}", config.service_rate);
    println!("Offered load: {}", config.parameters().offered_load());
    match config.start {
        Some(start) => println!("Start: {}", start),
        None => println!("Start: (prompt)"),
    }
    println!("Count: {}", config.count);
    println!(
        "Labels: server={}, customer={}, time={}, time_unit={}",
        config.labels.server, config.labels.customer, config.labels.time, config.labels.time_unit
    );
}

fn formatter_for(format: FormatArg) -> Box<dyn Formatter> {
    match format {
        FormatArg::Human => Box::new(HumanFormatter),
        FormatArg::Summary => Box::new(SummaryFormatter),
        FormatArg::Json => Box::new(JsonFormatter),
    }
}
