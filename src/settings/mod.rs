//! Client-side resolution of the site settings record.
//!
//! [`SettingsResolver`] fetches `/api/admin/settings` through a
//! [`SettingsSource`], caches successes in a [`QueryCache`] and falls back to
//! [`SiteSettings::default`](crate::domain::SiteSettings) on any failure.

pub mod cache;
pub mod client;
pub mod reporter;
pub mod resolver;

pub use cache::QueryCache;
pub use client::{SettingsClient, SettingsError, SettingsSource, SETTINGS_PATH};
pub use reporter::{ErrorReporter, RecordingReporter, TracingReporter};
pub use resolver::{RefreshTrigger, SettingsResolver};

use std::sync::Arc;

use crate::config::ResolverConfig;

/// Resolver wired to the HTTP endpoint with tracing-based reporting.
pub fn http_resolver(config: &ResolverConfig) -> SettingsResolver {
    SettingsResolver::new(
        Arc::new(SettingsClient::new(config.base_url.clone())),
        QueryCache::new(config.stale_after()),
        Arc::new(TracingReporter),
    )
}
