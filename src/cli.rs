use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::error::{Error, Result};

pub const START_PROMPT: &str = "Enter the STARTING number of servers (c): ";

#[derive(Parser, Debug)]
#[command(
    name = "mmc-sweep",
    version,
    about = "M/M/c queue metrics across a range of server counts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate consecutive server counts starting at --start (prompted when omitted)
    Run(RunArgs),
    /// Evaluate a single server count
    Compute(ComputeArgs),
    /// Print the resolved configuration without computing anything
    ShowConfig(SweepArgs),
}

#[derive(Args, Clone, Debug, Default)]
pub struct RateArgs {
    #[arg(long, help = "TOML or JSON file with rates, sweep range and labels")]
    pub config: Option<PathBuf>,
    #[arg(long, allow_negative_numbers = true, help = "Arrivals per unit time (λ)")]
    pub arrival_rate: Option<f64>,
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Completions per unit time per server (μ)"
    )]
    pub service_rate: Option<f64>,
}

#[derive(Args, Clone, Debug, Default)]
pub struct SweepArgs {
    #[command(flatten)]
    pub rates: RateArgs,
    #[arg(long)]
    pub start: Option<u32>,
    #[arg(long)]
    pub count: Option<u32>,
}

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub sweep: SweepArgs,
    #[arg(long, value_enum, default_value_t = FormatArg::Human)]
    pub format: FormatArg,
}

#[derive(Args, Clone, Debug)]
pub struct ComputeArgs {
    #[command(flatten)]
    pub rates: RateArgs,
    #[arg(long)]
    pub servers: u32,
    #[arg(long, value_enum, default_value_t = FormatArg::Human)]
    pub format: FormatArg,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Human,
    Summary,
    Json,
}

pub fn parse_args() -> Result<Cli> {
    Cli::try_parse().map_err(|err| match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
        _ => Error::Cli(err.to_string()),
    })
}

/// Reads the starting server count, re-prompting until a positive whole
/// number is entered.
pub fn prompt_start<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<u32> {
    loop {
        write!(output, "{}", START_PROMPT).map_err(write_error)?;
        output.flush().map_err(write_error)?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .map_err(|err| Error::Io(format!("failed to read input: {}", err)))?;
        if read == 0 {
            return Err(Error::InputClosed);
        }

        let message = match line.trim().parse::<i64>() {
            Ok(value) if value <= 0 => "Number of servers must be a positive whole number.",
            Ok(value) => match u32::try_from(value) {
                Ok(start) => return Ok(start),
                Err(_) => "Number of servers is too large.",
            },
            Err(_) => "Invalid input. Please enter a whole number.",
        };
        writeln!(output, "{}", message).map_err(write_error)?;
    }
}

fn write_error(err: std::io::Error) -> Error {
    Error::Io(format!("failed to write prompt: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompt(input: &str) -> (Result<u32>, String) {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = prompt_start(&mut reader, &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn prompt_accepts_positive_integer() {
        let (result, output) = prompt("6\n");
        assert_eq!(result.unwrap(), 6);
        assert_eq!(output, START_PROMPT);
    }

    #[test]
    fn prompt_trims_surrounding_whitespace() {
        let (result, _) = prompt("  12  \r\n");
        assert_eq!(result.unwrap(), 12);
    }

    #[test]
    fn prompt_retries_after_invalid_input() {
        let (result, output) = prompt("six\n4.5\n7\n");
        assert_eq!(result.unwrap(), 7);
        assert_eq!(
            output.matches("Invalid input. Please enter a whole number.").count(),
            2
        );
        assert_eq!(output.matches(START_PROMPT).count(), 3);
    }

    #[test]
    fn prompt_retries_after_non_positive_input() {
        let (result, output) = prompt("0\n-3\n2\n");
        assert_eq!(result.unwrap(), 2);
        assert_eq!(
            output
                .matches("Number of servers must be a positive whole number.")
                .count(),
            2
        );
    }

    #[test]
    fn prompt_rejects_values_beyond_u32() {
        let (result, output) = prompt("5000000000\n3\n");
        assert_eq!(result.unwrap(), 3);
        assert!(output.contains("Number of servers is too large."));
    }

    #[test]
    fn prompt_fails_when_input_closes() {
        let (result, _) = prompt("abc\n");
        assert!(matches!(result, Err(Error::InputClosed)));
    }

    #[test]
    fn cli_parses_run_subcommand() {
        let cli = Cli::try_parse_from([
            "mmc-sweep",
            "run",
            "--start",
            "6",
            "--arrival-rate",
            "2.5",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.sweep.start, Some(6));
                assert_eq!(args.sweep.count, None);
                assert_eq!(args.sweep.rates.arrival_rate, Some(2.5));
                assert_eq!(args.format, FormatArg::Json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn cli_requires_servers_for_compute() {
        assert!(Cli::try_parse_from(["mmc-sweep", "compute"]).is_err());
    }
}
