use std::time::{Duration, Instant};

use console::style;
use log::debug;

/// Where dispatches report progress and outcome to the user.
pub trait Feedback {
    fn set_busy(&mut self, busy: bool);

    /// Hides both the error and the success banner.
    fn hide_messages(&mut self);

    fn show_error(&mut self, message: &str);

    fn show_success(&mut self, message: &str);

    /// Raises the success banner again after a dispatch hid it, without
    /// announcing it a second time.
    fn keep_success(&mut self, message: &str) {
        self.show_success(message);
    }
}

/// In-memory banner state. At most one banner is visible at a time, and the
/// success banner hides itself once `success_ttl` has elapsed.
#[derive(Debug, Clone)]
pub struct Banners {
    busy: bool,
    error: Option<String>,
    success: Option<(String, Instant)>,
    success_ttl: Duration,
}

impl Banners {
    pub const DEFAULT_SUCCESS_TTL: Duration = Duration::from_secs(5);

    pub fn new(success_ttl: Duration) -> Self {
        Self {
            busy: false,
            error: None,
            success: None,
            success_ttl,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success_at(Instant::now())
    }

    pub fn success_at(&self, now: Instant) -> Option<&str> {
        match self.success {
            Some((ref message, shown_at))
                if now.saturating_duration_since(shown_at) < self.success_ttl =>
            {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}

impl Default for Banners {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SUCCESS_TTL)
    }
}

impl Feedback for Banners {
    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    fn hide_messages(&mut self) {
        self.error = None;
        self.success = None;
    }

    fn show_error(&mut self, message: &str) {
        self.success = None;
        self.error = Some(message.to_string());
    }

    fn show_success(&mut self, message: &str) {
        self.error = None;
        self.success = Some((message.to_string(), Instant::now()));
    }
}

/// Prints banners to stderr as they are raised.
#[derive(Debug, Clone, Default)]
pub struct TerminalFeedback {
    banners: Banners,
}

impl TerminalFeedback {
    pub fn new(success_ttl: Duration) -> Self {
        Self {
            banners: Banners::new(success_ttl),
        }
    }

    pub fn banners(&self) -> &Banners {
        &self.banners
    }
}

impl Feedback for TerminalFeedback {
    fn set_busy(&mut self, busy: bool) {
        if busy {
            debug!("Waiting for server response...");
        } else {
            debug!("Server response handled");
        }
        self.banners.set_busy(busy);
    }

    fn hide_messages(&mut self) {
        self.banners.hide_messages();
    }

    fn show_error(&mut self, message: &str) {
        eprintln!("{} {message}", style("error:").red().bold());
        self.banners.show_error(message);
    }

    fn show_success(&mut self, message: &str) {
        eprintln!("{} {message}", style("ok:").green().bold());
        self.banners.show_success(message);
    }

    fn keep_success(&mut self, message: &str) {
        self.banners.show_success(message);
    }
}
