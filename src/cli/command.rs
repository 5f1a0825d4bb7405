use std::path::PathBuf;

use castape::process::encode::BaudRate;
use clap::{Args, Parser as ClapParser, Subcommand, ValueEnum};

#[derive(Debug, ClapParser)]
#[command(
    name       = env!("CARGO_PKG_NAME"),
    version    = env!("CARGO_PKG_VERSION"),
    author     = env!("CARGO_PKG_AUTHORS"),
    about      = "Tools for converting MSX cassette images into playable audio",
    long_about = None,
)]
pub struct Cli {
    /// Set the log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub loglevel: LogLevel,

    /// Treat warnings as fatal errors (fail on first warning).
    #[arg(long, global = true)]
    pub strict: bool,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Show progress bars during operations.
    #[arg(long, global = true)]
    pub progress: bool,

    /// Choose an operation to perform.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert a .cas tape image into a WAV file.
    Convert(ConvertArgs),

    /// List the files stored in a .cas tape image.
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Input .cas image (use "-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output WAV file [default: INPUT with a .wav extension].
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Tape transfer speed.
    #[arg(long, value_enum, default_value_t = BaudArg::Standard)]
    pub baud: BaudArg,

    /// Seconds of silence before each file, 0 selects the default [default: 2].
    #[arg(long, value_name = "SECONDS")]
    pub silence: Option<f64>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Input .cas image (use "-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Print the listing as YAML.
    #[arg(long)]
    pub yaml: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum BaudArg {
    /// 1200 baud, readable by every MSX.
    #[value(name = "1200")]
    Standard,
    /// 2400 baud.
    #[value(name = "2400")]
    Fast,
}

impl From<BaudArg> for BaudRate {
    fn from(value: BaudArg) -> Self {
        match value {
            BaudArg::Standard => BaudRate::Standard,
            BaudArg::Fast => BaudRate::Fast,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    /// Disable logging output.
    Off,
    /// No output except errors.
    Error,
    /// Show warnings and errors.
    Warn,
    /// Show info, warnings and errors (default).
    Info,
    /// Show debug, info, warnings and errors.
    Debug,
    /// Show all log messages including trace.
    Trace,
}

impl LogLevel {
    /// Convert LogLevel to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Colorized human-readable text.
    Plain,
    /// Structured JSON per log record.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_convert() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from(["castools", "--strict", "convert", "--baud", "2400", "--silence", "0.5", "game.cas"])?;
        assert!(cli.strict);
        let Commands::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.baud, BaudArg::Fast);
        assert_eq!(args.silence, Some(0.5));
        assert_eq!(args.output, None);
        Ok(())
    }

    #[test]
    fn rejects_unsupported_baud() {
        assert!(Cli::try_parse_from(["castools", "convert", "--baud", "4800", "game.cas"]).is_err());
    }
}
