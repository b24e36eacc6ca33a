//! Scan progress events and a terminal renderer.
//!
//! The scanner reports progress as structured [`ProgressEvent`]s through the
//! [`ProgressCallback`] trait. Callbacks run synchronously on the scanning
//! thread; an observer that owns a UI must marshal events onto its own
//! thread before touching UI state.
//!
//! [`Progress`] renders events with `indicatif` for the command-line front end.

use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Stage of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Directory traversal and candidate bucketing
    Walking,
    /// Content hashing of candidate groups
    Hashing,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Walking => write!(f, "walking"),
            Self::Hashing => write!(f, "hashing"),
        }
    }
}

/// A single progress notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Stage being reported
    pub phase: Phase,
    /// Items completed so far (1-based)
    pub current: usize,
    /// Total items in this phase, or 0 when unknown (walking)
    pub total: usize,
}

impl ProgressEvent {
    /// Event for the n-th directory visited.
    #[must_use]
    pub fn walking(dirs_visited: usize) -> Self {
        Self {
            phase: Phase::Walking,
            current: dirs_visited,
            total: 0,
        }
    }

    /// Event for the i-th of N candidate groups hashed.
    #[must_use]
    pub fn hashing(current: usize, total: usize) -> Self {
        Self {
            phase: Phase::Hashing,
            current,
            total,
        }
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phase {
            Phase::Walking => write!(f, "Scanned {} directories", self.current),
            Phase::Hashing => write!(f, "Hashed {}/{} groups", self.current, self.total),
        }
    }
}

/// Observer of scan progress.
///
/// Implement this trait to receive progress updates during a scan. Every
/// method has an empty default so observers only override what they need.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - The phase starting
    /// * `total` - Number of items in the phase, 0 when unknown
    fn on_phase_start(&self, _phase: Phase, _total: usize) {}

    /// Called after each unit of work (a directory, a candidate group).
    fn on_progress(&self, event: &ProgressEvent);

    /// Called when a phase completes.
    fn on_phase_end(&self, _phase: Phase) {}
}

/// Progress reporter using indicatif.
///
/// Shows a spinner while walking and a bar while hashing.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, nothing is drawn.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupemgr::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
        }
    }

    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn hashing_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(ref pb) = *guard {
                f(pb);
            }
        }
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: Phase, total: usize) {
        if self.quiet {
            return;
        }

        let pb = match phase {
            Phase::Walking => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(Self::walking_style());
                pb.set_message("Walking directory");
                pb.enable_steady_tick(Duration::from_millis(100));
                pb
            }
            Phase::Hashing => {
                let pb = ProgressBar::new(total as u64);
                pb.set_style(Self::hashing_style());
                pb.set_message("Hashing");
                pb
            }
        };

        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_progress(&self, event: &ProgressEvent) {
        if self.quiet {
            return;
        }
        self.with_bar(|pb| {
            if event.phase == Phase::Hashing {
                pb.set_position(event.current as u64);
            }
            pb.set_message(event.to_string());
        });
    }

    fn on_phase_end(&self, phase: Phase) {
        if self.quiet {
            return;
        }
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_with_message(format!("{phase} complete"));
            }
        }
    }
}
