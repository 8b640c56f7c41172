use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::cache::QueryCache;
use super::client::{SettingsError, SettingsSource, SETTINGS_PATH};
use super::reporter::ErrorReporter;
use crate::domain::SiteSettings;

/// External events that ask the resolver to refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// Periodic tick: refetch unconditionally.
    Interval,
    /// The consuming view regained focus: refetch only if stale.
    Focus,
}

/// Resolves the current site settings, never failing.
///
/// Successful fetches are cached under [`SETTINGS_PATH`]. Any failure is
/// handed to the [`ErrorReporter`] and answered with
/// [`SiteSettings::default`]; failures are not cached.
pub struct SettingsResolver {
    source: Arc<dyn SettingsSource>,
    cache: QueryCache<SiteSettings>,
    reporter: Arc<dyn ErrorReporter>,
    updates: watch::Sender<SiteSettings>,
}

impl SettingsResolver {
    pub fn new(
        source: Arc<dyn SettingsSource>,
        cache: QueryCache<SiteSettings>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        let (updates, _) = watch::channel(SiteSettings::default());
        Self {
            source,
            cache,
            reporter,
            updates,
        }
    }

    /// Cached settings while fresh, otherwise a new fetch.
    pub async fn get_settings(&self) -> SiteSettings {
        let result = self
            .cache
            .get_or_fetch(SETTINGS_PATH, || self.source.fetch_settings())
            .await;
        self.settle(result)
    }

    /// Fetches regardless of freshness.
    pub async fn refresh(&self) -> SiteSettings {
        let result = self
            .cache
            .refetch(SETTINGS_PATH, || self.source.fetch_settings())
            .await;
        self.settle(result)
    }

    pub async fn handle(&self, trigger: RefreshTrigger) -> SiteSettings {
        tracing::debug!(?trigger, "Refreshing site settings");
        match trigger {
            RefreshTrigger::Interval => self.refresh().await,
            RefreshTrigger::Focus => self.get_settings().await,
        }
    }

    /// Receives every resolved value that differs from the previous one.
    pub fn subscribe(&self) -> watch::Receiver<SiteSettings> {
        self.updates.subscribe()
    }

    /// Drives periodic and externally triggered refreshes.
    ///
    /// The first tick fires immediately. The task ends once every
    /// sender for `triggers` has been dropped.
    pub fn spawn(
        self: Arc<Self>,
        refresh_every: Duration,
        mut triggers: mpsc::Receiver<RefreshTrigger>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(refresh_every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.handle(RefreshTrigger::Interval).await;
                    }
                    trigger = triggers.recv() => match trigger {
                        Some(trigger) => {
                            self.handle(trigger).await;
                        }
                        None => break,
                    },
                }
            }

            tracing::info!("Settings refresh loop stopped");
        })
    }

    fn settle(&self, result: Result<SiteSettings, SettingsError>) -> SiteSettings {
        let settings = match result {
            Ok(settings) => settings,
            Err(error) => {
                self.reporter.report(&error);
                SiteSettings::default()
            }
        };

        self.updates.send_if_modified(|current| {
            if *current == settings {
                false
            } else {
                *current = settings.clone();
                true
            }
        });

        settings
    }
}
