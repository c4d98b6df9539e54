// src/utils/notify.rs: Progress notifications for the hosting platform

use std::fmt;

use anyhow::Result;
use log::{error, info, warn};


#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(tag)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub title: String,
    pub body: String,
}

impl Message {
    pub fn new<T: Into<String>, B: Into<String>>(title: T, body: B) -> Self {
        Message { title: title.into(), body: body.into() }
    }
}


/// Side channel for progress reports. Callers treat failures as non-fatal.
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &Message) -> Result<()>;
}


/// Sends notifications to the process log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, severity: Severity, message: &Message) -> Result<()> {
        match severity {
            Severity::Info => info!("{}: {}", message.title, message.body),
            Severity::Warning => warn!("{}: {}", message.title, message.body),
            Severity::Error => error!("{}: {}", message.title, message.body),
        }
        Ok(())
    }
}


/// Send and swallow: a failing notifier is logged and otherwise ignored.
pub fn notify_best_effort(notifier: &dyn Notifier, severity: Severity, message: Message) {
    if let Err(e) = notifier.notify(severity, &message) {
        warn!("Failed to send {} notification '{}': {}", severity, message.title, e);
    }
}
