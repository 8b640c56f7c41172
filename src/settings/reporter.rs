use std::sync::Mutex;

use super::client::SettingsError;

/// Side channel for failures the resolver swallows.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &SettingsError);
}

/// Logs swallowed failures through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, error: &SettingsError) {
        tracing::error!(error = %error, "Failed to fetch site settings, using defaults");
    }
}

/// Keeps the rendered message of every reported failure.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<String> {
        self.reports
            .lock()
            .map(|reports| reports.clone())
            .unwrap_or_default()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, error: &SettingsError) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push(error.to_string());
        }
    }
}
