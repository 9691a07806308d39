//! Admin-facing notifications and confirmation prompts.
//!
//! Every page reports outcomes through a [`Notifier`]: one message per
//! success or failure. Whoever holds the receiving end decides how to show
//! them; [`log_notifications`] writes them to the log.

use std::io::{self, BufRead, Write};
use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    /// Client-side form checks; never reached the network.
    Validation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Notifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(NotificationLevel::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NotificationLevel::Error, message.into());
    }

    pub fn validation(&self, message: impl Into<String>) {
        self.push(NotificationLevel::Validation, message.into());
    }

    fn push(&self, level: NotificationLevel, message: String) {
        if self.sender.send(Notification { level, message }).is_err() {
            warn!("Notification dropped, no listener");
        }
    }
}

/// Drains notifications into the log until every [`Notifier`] is gone.
pub async fn log_notifications(mut receiver: mpsc::UnboundedReceiver<Notification>) {
    while let Some(n) = receiver.recv().await {
        match n.level {
            NotificationLevel::Success => info!(target: "toast", "{}", n.message),
            NotificationLevel::Validation => warn!(target: "toast", "{}", n.message),
            NotificationLevel::Error => error!(target: "toast", "{}", n.message),
        }
    }
}

/// Blocking yes/no gate in front of destructive actions.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Asks on the terminal. Anything but `y`/`yes` declines.
///
/// Blocks on stdin, so callers run it off the async runtime. Prompts from
/// several pages are asked one at a time.
#[derive(Debug, Default)]
pub struct TerminalConfirm {
    prompt_lock: Mutex<()>,
}

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        let _turn = self.prompt_lock.lock().unwrap_or_else(PoisonError::into_inner);
        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

/// Fixed answer, for scripted runs.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}
