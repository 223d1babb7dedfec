//! Phase progress reporting; compiles to no-ops when the `progress` feature
//! is disabled or output is silenced.

use std::borrow::Cow;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};
#[cfg(feature = "progress")]
use std::time::Duration;

/// A spinner or bar for one scan phase
pub struct PhaseProgress {
    #[cfg(feature = "progress")]
    bar: Option<ProgressBar>,
}

impl PhaseProgress {
    /// Indeterminate spinner (used while crawling)
    pub fn spinner(message: impl Into<Cow<'static, str>>, enabled: bool) -> Self {
        #[cfg(feature = "progress")]
        {
            let bar = enabled.then(|| {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.cyan} {msg}")
                        .unwrap(),
                );
                spinner.set_message(message);
                spinner.enable_steady_tick(Duration::from_millis(80));
                spinner
            });
            Self { bar }
        }
        #[cfg(not(feature = "progress"))]
        {
            let _ = (message.into(), enabled);
            Self {}
        }
    }

    /// Bar over `len` documents
    pub fn bar(len: usize, message: impl Into<Cow<'static, str>>, enabled: bool) -> Self {
        #[cfg(feature = "progress")]
        {
            let bar = enabled.then(|| {
                let pb = ProgressBar::new(len as u64);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec}) {msg}")
                        .unwrap()
                        .progress_chars("=> "),
                );
                pb.set_message(message);
                pb
            });
            Self { bar }
        }
        #[cfg(not(feature = "progress"))]
        {
            let _ = (len, message.into(), enabled);
            Self {}
        }
    }

    pub fn inc(&self) {
        #[cfg(feature = "progress")]
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    pub fn finish(self, message: impl Into<Cow<'static, str>>) {
        #[cfg(feature = "progress")]
        if let Some(bar) = self.bar {
            bar.finish_with_message(message);
            return;
        }
        let _ = message.into();
    }
}
