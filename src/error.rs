use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("arrival rate must be a finite number > 0 (got {0})")]
    InvalidArrivalRate(f64),
    #[error("service rate must be a finite number > 0 (got {0})")]
    InvalidServiceRate(f64),
    #[error("starting number of servers must be greater than 0")]
    InvalidStart,
    #[error("starting number of servers is required")]
    MissingStart,
    #[error("sweep count must be greater than 0")]
    InvalidCount,
    #[error("sweep count {count} exceeds the maximum of {max}")]
    SweepTooLarge { count: u32, max: u32 },
    #[error("sweep of {count} configurations starting at {start} exceeds the supported server range")]
    SweepOverflow { start: u32, count: u32 },
    #[error("number of servers must be greater than 0")]
    InvalidServerCount,
    #[error("input closed before a starting number of servers was entered")]
    InputClosed,
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    Output(String),
    #[error("{0}")]
    ConfigIo(String),
    #[error("{0}")]
    ConfigParse(String),
    #[error("unsupported config format '{0}'")]
    UnsupportedConfigFormat(String),
    #[error("{0}")]
    Cli(String),
}

pub type Result<T> = std::result::Result<T, Error>;
