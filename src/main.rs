use anyhow::Result;
use clap::Parser as ClapParser;
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;

use cli::command::{Cli, Commands, LogFormat};
use cli::convert::cmd_convert;
use cli::list::cmd_list;

mod byteorder;
mod cli;
mod input;
pub(crate) mod timestamp;
mod wav;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let base_level = cli.loglevel.to_level_filter();

    let multi = MultiProgress::new();

    let mut env_builder = env_logger::Builder::from_default_env();
    env_builder.filter_level(base_level);
    match cli.log_format {
        LogFormat::Plain => {
            env_builder.format_timestamp_secs();
        }
        LogFormat::Json => {
            env_builder.format(|buf, record| {
                use std::io::Write;
                let line = json_record(
                    &buf.timestamp().to_string(),
                    record.level(),
                    &record.args().to_string(),
                )?;
                writeln!(buf, "{line}")
            });
        }
    }

    let pb = if cli.progress {
        let logger = env_builder.build();
        LogWrapper::new(multi.clone(), logger).try_init()?;
        Some(&multi)
    } else {
        env_builder.try_init()?;
        None
    };

    match cli.command {
        Commands::Convert(ref args) => cmd_convert(args, &cli, pb)?,
        Commands::List(ref args) => cmd_list(args)?,
    }

    Ok(())
}

/// One log record as a single-line JSON object.
fn json_record(ts: &str, level: log::Level, msg: &str) -> serde_json::Result<String> {
    serde_json::to_string(&serde_json::json!({
        "ts": ts,
        "lvl": level.as_str(),
        "msg": msg,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn json_record_escapes_message() -> Result<()> {
        let msg = "Cannot open /home/o'neil/m\u{fa}sica.cas: \"bad\"\tname";
        let line = json_record("2026-01-01T00:00:00Z", log::Level::Warn, msg)?;
        assert!(!line.contains('\n'));

        let value: Value = serde_json::from_str(&line)?;
        assert_eq!(value["msg"], msg);
        assert_eq!(value["lvl"], "WARN");
        assert_eq!(value["ts"], "2026-01-01T00:00:00Z");
        Ok(())
    }
}
