//! Roster progress reporting.
//!
//! The roster driver emits [`ProgressEvent`]s; the CLI prints them with
//! [`ConsoleProgress`] and tests usually discard them with [`NullProgress`].
//!
//! # Example
//!
//! ```
//! use cardsmith::progress::{ConsoleProgress, ProgressEvent, ProgressReporter};
//!
//! let reporter = ConsoleProgress::with_output(Vec::new());
//! reporter.report(ProgressEvent::RosterStarted { roster: "regular".to_string(), total_cards: 2 });
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Outcome of a single card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardStatus {
    /// Image and metadata written
    Written,
    /// Card could not be produced
    Failed(String),
}

impl std::fmt::Display for CardStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardStatus::Written => write!(f, "written"),
            CardStatus::Failed(e) => write!(f, "failed: {}", e),
        }
    }
}

/// Events that can be reported during a roster run.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A roster started
    RosterStarted {
        /// Roster label, e.g. "regular" or "shining"
        roster: String,
        total_cards: usize,
    },
    /// A card started
    CardStarted { card: String },
    /// A card finished
    CardCompleted {
        card: String,
        status: CardStatus,
        duration_ms: u64,
    },
    /// A roster finished
    RosterCompleted {
        roster: String,
        succeeded: usize,
        failed: usize,
        duration_ms: u64,
    },
    /// A recoverable problem
    Warning { card: Option<String>, message: String },
    /// A problem that cost a card
    Error { card: Option<String>, message: String },
}

/// Trait for progress reporters.
pub trait ProgressReporter {
    /// Report a progress event.
    fn report(&self, event: ProgressEvent);

    /// Check if this reporter wants verbose output.
    fn is_verbose(&self) -> bool {
        false
    }
}

/// A progress reporter that discards all events.
#[derive(Debug, Default)]
pub struct NullProgress;

impl ProgressReporter for NullProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Console progress reporter with optional colors.
pub struct ConsoleProgress {
    use_colors: bool,
    verbose: bool,
    current: AtomicUsize,
    total: AtomicUsize,
    /// Output writer (stderr unless replaced)
    output: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for ConsoleProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleProgress")
            .field("use_colors", &self.use_colors)
            .field("verbose", &self.verbose)
            .field("current", &self.current)
            .field("total", &self.total)
            .finish()
    }
}

impl ConsoleProgress {
    /// Create a console reporter writing colored lines to stderr.
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
            current: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
            output: Mutex::new(Box::new(std::io::stderr())),
        }
    }

    /// Create a console reporter that writes plain lines to a custom output.
    pub fn with_output<W: Write + Send + 'static>(output: W) -> Self {
        Self {
            use_colors: false,
            verbose: false,
            current: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
            output: Mutex::new(Box::new(output)),
        }
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{}{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.color(text, "\x1b[32m")
    }

    fn yellow(&self, text: &str) -> String {
        self.color(text, "\x1b[33m")
    }

    fn red(&self, text: &str) -> String {
        self.color(text, "\x1b[31m")
    }

    fn cyan(&self, text: &str) -> String {
        self.color(text, "\x1b[36m")
    }

    fn writeln(&self, line: &str) {
        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(output, "{}", line);
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

fn with_card(card: Option<String>, message: &str) -> String {
    match card {
        Some(card) => format!("{}: {}", card, message),
        None => message.to_string(),
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::RosterStarted { roster, total_cards } => {
                self.total.store(total_cards, Ordering::SeqCst);
                self.current.store(0, Ordering::SeqCst);
                self.writeln(&format!(
                    "{} Generating {} {} card{}...",
                    self.cyan("[cards]"),
                    total_cards,
                    roster,
                    if total_cards == 1 { "" } else { "s" }
                ));
            }
            ProgressEvent::CardStarted { card } => {
                if self.verbose {
                    let current = self.current.load(Ordering::SeqCst) + 1;
                    let total = self.total.load(Ordering::SeqCst);
                    self.writeln(&format!("{} [{}/{}] Rendering {}...", self.cyan("[cards]"), current, total, card));
                }
            }
            ProgressEvent::CardCompleted { card, status, duration_ms } => {
                let current = self.current.fetch_add(1, Ordering::SeqCst) + 1;
                let total = self.total.load(Ordering::SeqCst);
                let status_str = match &status {
                    CardStatus::Written => self.green("ok"),
                    CardStatus::Failed(_) => self.red("FAILED"),
                };
                self.writeln(&format!(
                    "{} [{}/{}] {} {} ({})",
                    self.cyan("[cards]"),
                    current,
                    total,
                    status_str,
                    card,
                    format_duration(duration_ms)
                ));
            }
            ProgressEvent::RosterCompleted { roster, succeeded, failed, duration_ms } => {
                if failed == 0 {
                    self.writeln(&format!(
                        "{} {} {} card{} in {}",
                        self.green("[done]"),
                        succeeded,
                        roster,
                        if succeeded == 1 { "" } else { "s" },
                        format_duration(duration_ms)
                    ));
                } else {
                    self.writeln(&format!(
                        "{} {} roster: {} written, {} {} in {}",
                        self.red("[error]"),
                        roster,
                        succeeded,
                        failed,
                        if failed == 1 { "failure" } else { "failures" },
                        format_duration(duration_ms)
                    ));
                }
            }
            ProgressEvent::Warning { card, message } => {
                self.writeln(&format!("{} {}", self.yellow("[warn]"), with_card(card, &message)));
            }
            ProgressEvent::Error { card, message } => {
                self.writeln(&format!("{} {}", self.red("[error]"), with_card(card, &message)));
            }
        }
    }

    fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Format a duration in milliseconds to a human-readable string.
pub(crate) fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let minutes = ms / 60_000;
        let seconds = (ms % 60_000) / 1000;
        format!("{}m {}s", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct TestWriter(Arc<Mutex<Vec<u8>>>);

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture() -> (ConsoleProgress, Arc<Mutex<Vec<u8>>>) {
        let output = Arc::new(Mutex::new(Vec::new()));
        let reporter = ConsoleProgress::with_output(TestWriter(Arc::clone(&output)));
        (reporter, output)
    }

    fn text(output: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8_lossy(&output.lock().unwrap()).into_owned()
    }

    #[test]
    fn test_card_status_display() {
        assert_eq!(CardStatus::Written.to_string(), "written");
        assert_eq!(CardStatus::Failed("disk full".to_string()).to_string(), "failed: disk full");
    }

    #[test]
    fn test_roster_started() {
        let (reporter, output) = capture();
        reporter.report(ProgressEvent::RosterStarted { roster: "shining".to_string(), total_cards: 3 });
        assert!(text(&output).contains("Generating 3 shining cards"));
    }

    #[test]
    fn test_card_completed_counts_up() {
        let (reporter, output) = capture();
        reporter.report(ProgressEvent::RosterStarted { roster: "regular".to_string(), total_cards: 2 });
        for card in ["Pikachu", "Eevee"] {
            reporter.report(ProgressEvent::CardCompleted {
                card: card.to_string(),
                status: CardStatus::Written,
                duration_ms: 40,
            });
        }
        let text = text(&output);
        assert!(text.contains("[1/2] ok Pikachu (40ms)"));
        assert!(text.contains("[2/2] ok Eevee (40ms)"));
    }

    #[test]
    fn test_card_failed_prints_reason() {
        let (reporter, output) = capture();
        reporter.report(ProgressEvent::Error {
            card: Some("Gengar".to_string()),
            message: "permission denied".to_string(),
        });
        reporter.report(ProgressEvent::CardCompleted {
            card: "Gengar".to_string(),
            status: CardStatus::Failed("permission denied".to_string()),
            duration_ms: 5,
        });
        let text = text(&output);
        assert!(text.contains("[error] Gengar: permission denied"));
        assert!(text.contains("FAILED Gengar"));
        assert_eq!(text.matches("permission denied").count(), 1);
    }

    #[test]
    fn test_card_started_only_when_verbose() {
        let (reporter, output) = capture();
        reporter.report(ProgressEvent::CardStarted { card: "Mew".to_string() });
        assert!(text(&output).is_empty());

        let (reporter, output) = capture();
        let reporter = reporter.with_verbose(true);
        reporter.report(ProgressEvent::CardStarted { card: "Mew".to_string() });
        assert!(text(&output).contains("Rendering Mew"));
    }

    #[test]
    fn test_roster_completed() {
        let (reporter, output) = capture();
        reporter.report(ProgressEvent::RosterCompleted {
            roster: "regular".to_string(),
            succeeded: 4,
            failed: 0,
            duration_ms: 1500,
        });
        reporter.report(ProgressEvent::RosterCompleted {
            roster: "shining".to_string(),
            succeeded: 1,
            failed: 2,
            duration_ms: 200,
        });
        let text = text(&output);
        assert!(text.contains("[done] 4 regular cards in 1.5s"));
        assert!(text.contains("2 failures"));
    }

    #[test]
    fn test_warning_with_card() {
        let (reporter, output) = capture();
        reporter.report(ProgressEvent::Warning {
            card: Some("Pikachu".to_string()),
            message: "no artwork".to_string(),
        });
        assert!(text(&output).contains("[warn] Pikachu: no artwork"));
    }

    #[test]
    fn test_colors_wrap_labels() {
        let (reporter, output) = capture();
        let reporter = reporter.with_colors(true);
        reporter.report(ProgressEvent::Error { card: None, message: "boom".to_string() });
        assert!(text(&output).contains("\x1b[31m[error]\x1b[0m boom"));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(999), "999ms");
        assert_eq!(format_duration(1500), "1.5s");
        assert_eq!(format_duration(90000), "1m 30s");
    }
}
