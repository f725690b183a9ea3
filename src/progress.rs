use indicatif::{ProgressBar, ProgressStyle};

/// Fewer files than this resolve too fast to be worth a bar
const PROGRESS_THRESHOLD: u64 = 10;

const TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Progress over the files checked in one run; a no-op when hidden.
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    pub fn new(total: u64, enabled: bool) -> Self {
        if !enabled || total < PROGRESS_THRESHOLD {
            return Self { bar: None };
        }

        let bar = ProgressBar::new(total);
        match ProgressStyle::default_bar().template(TEMPLATE) {
            Ok(style) => bar.set_style(style.progress_chars("=>-")),
            Err(e) => log::debug!("progress template rejected: {e}"),
        }
        Self { bar: Some(bar) }
    }

    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }

    pub fn set_message(&self, msg: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(msg.to_string());
        }
    }

    pub fn inc(&self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    /// Print a line without tearing the bar.
    pub fn println(&self, line: &str) {
        match &self.bar {
            Some(bar) => bar.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_below_threshold() {
        assert!(!ProgressReporter::new(PROGRESS_THRESHOLD - 1, true).is_visible());
    }

    #[test]
    fn test_hidden_when_disabled() {
        assert!(!ProgressReporter::new(100, false).is_visible());
    }

    #[test]
    fn test_visible_at_threshold() {
        let progress = ProgressReporter::new(PROGRESS_THRESHOLD, true);
        assert!(progress.is_visible());
        progress.inc();
        progress.finish();
    }
}
