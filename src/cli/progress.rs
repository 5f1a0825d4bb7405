use std::ops::Deref;

use anyhow::Result;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Progress bar over the bytes of a tape image.
pub fn create_progress_bar(multi: &MultiProgress, total_bytes: u64) -> Result<ClearOnDrop> {
    let pb = multi.add(ProgressBar::new(total_bytes));
    pb.set_style(ProgressStyle::with_template(
        "{bar:40.cyan/blue} {bytes}/{total_bytes} ({percent}%)\n{msg} | elapsed: {elapsed_precise} | ETA: {eta_precise}",
    )?);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb.set_message("scanning image");
    Ok(ClearOnDrop(pb))
}

/// Removes the bar from its [MultiProgress] when dropped, also on early returns.
pub struct ClearOnDrop(ProgressBar);

impl Deref for ClearOnDrop {
    type Target = ProgressBar;

    fn deref(&self) -> &ProgressBar {
        &self.0
    }
}

impl Drop for ClearOnDrop {
    fn drop(&mut self) {
        self.0.finish_and_clear();
    }
}
