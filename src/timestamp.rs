pub fn time_str(sec: f64) -> String {
    let ms = sec * 1000f64;
    let hours = (ms / 3600000f64) as u64;
    let minutes = ((ms % 3600000f64) / 60000f64) as u64;
    let seconds = ((ms % 60000f64) / 1000f64) as u64;
    let milliseconds = (ms % 1000f64) as u64;

    format!(
        "{hours:0width$}:{minutes:02}:{seconds:02}.{milliseconds:03}",
        width = if hours >= 100 { 0 } else { 2 }
    )
}

/// Playback duration of `samples` samples at `sample_rate`.
pub fn samples_str(samples: u64, sample_rate: u32) -> String {
    time_str(samples as f64 / sample_rate as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_durations() {
        assert_eq!(time_str(0.0), "00:00:00.000");
        assert_eq!(time_str(3723.5), "01:02:03.500");
        assert_eq!(samples_str(499_500, 43200), "00:00:11.562");
    }
}
