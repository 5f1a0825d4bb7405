use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use castape::process::encode::{Encoder, EncodingConfig, LONG_SILENCE};
use castape::process::scan::{ScanEvent, Scanner};
use indicatif::MultiProgress;
use log::Level;

use super::command::{Cli, ConvertArgs};
use super::progress::create_progress_bar;
use crate::input::InputReader;
use crate::timestamp::samples_str;
use crate::wav::WAVWriter;

pub fn cmd_convert(args: &ConvertArgs, cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    let mut config = EncodingConfig {
        baud_rate: args.baud.into(),
        ..Default::default()
    };
    if let Some(seconds) = args.silence {
        config.silence = silence_samples(seconds, config.sample_rate)?;
    }

    let output_path = output_path(&args.input, args.output.as_deref())?;

    let mut input_reader = InputReader::new(&args.input)?;
    if input_reader.is_pipe() {
        log::debug!("Reading image from stdin");
    }
    let image = input_reader.read_all()?;
    log::info!(
        "Converting {} ({} bytes) at {}",
        args.input.display(),
        image.len(),
        config.baud_rate
    );

    convert_image(&image, &output_path, config, cli.strict, multi)
}

/// Encodes `image` into a WAV file at `output_path`, removing the file again on failure.
pub fn convert_image(
    image: &[u8],
    output_path: &Path,
    config: EncodingConfig,
    strict: bool,
    multi: Option<&MultiProgress>,
) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Cannot create {}", output_path.display()))?;

    let result = write_wav(image, file, config, strict, multi);
    match result {
        Ok(samples) => {
            log::info!(
                "Wrote {} ({} samples, {})",
                output_path.display(),
                samples,
                samples_str(samples, config.sample_rate)
            );
            Ok(())
        }
        Err(e) => {
            if let Err(remove_err) = std::fs::remove_file(output_path) {
                log::warn!("Failed to remove {}: {remove_err}", output_path.display());
            }
            Err(e)
        }
    }
}

/// Streams the tape signal of `image` into `file`. Returns the number of samples written.
fn write_wav(
    image: &[u8],
    file: File,
    config: EncodingConfig,
    strict: bool,
    multi: Option<&MultiProgress>,
) -> Result<u64> {
    let mut wav = WAVWriter::new(file);
    wav.configure_audio_format(config.sample_rate, 1, 8)?;
    wav.write_header()?;

    let mut encoder = Encoder::new(&mut wav, config);
    let mut scanner = Scanner::new(image, &config);

    // Configure fail level based on strict mode
    let fail_level = if strict { Level::Warn } else { Level::Error };
    scanner.set_fail_level(fail_level);

    let pb = multi
        .map(|multi| create_progress_bar(multi, image.len() as u64))
        .transpose()?;

    while let Some(event) = scanner.step(&mut encoder)? {
        if let Some(ref pb) = pb {
            if let ScanEvent::File(summary) = event {
                pb.set_message(format!("{} file at {:#08x}", summary.kind, summary.offset));
            }
            pb.set_position(scanner.position() as u64);
        }
    }

    let samples = encoder.samples_written();
    encoder.finish()?;
    wav.finish()?;

    let stats = wav.stats();
    log::debug!(
        "{} bytes of {}-bit audio, {} channel(s) at {} Hz",
        stats.data_written,
        stats.bits_per_sample,
        stats.channels,
        stats.sample_rate
    );
    wav.into_inner()?.sync_all()?;

    drop(pb);

    if scanner.skipped() > 0 {
        log::warn!("{} bytes outside blocks were skipped", scanner.skipped());
    }
    log::info!("Encoded {} files", scanner.files());

    Ok(samples)
}

/// Converts a gap length in seconds into whole samples. Zero selects the default gap.
pub fn silence_samples(seconds: f64, sample_rate: u32) -> Result<u32> {
    if !seconds.is_finite() || seconds < 0.0 {
        bail!("Silence must be a non-negative number of seconds, got {seconds}");
    }
    if seconds == 0.0 {
        return Ok(LONG_SILENCE);
    }
    let samples = (seconds * sample_rate as f64).trunc();
    if samples > u32::MAX as f64 {
        bail!("Silence of {seconds} seconds is too long");
    }
    Ok(samples as u32)
}

/// Resolves the WAV path, deriving it from the input when none is given.
pub fn output_path(input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    if let Some(output) = output {
        return Ok(output.to_path_buf());
    }
    if input.as_os_str() == "-" {
        bail!("An output path is required when reading from stdin");
    }

    let path = input.with_extension("wav");
    if path == input {
        bail!(
            "Refusing to overwrite {}, give an output path",
            input.display()
        );
    }
    Ok(path)
}
