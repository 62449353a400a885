use std::collections::HashMap;

use time::Duration;

use crate::{Locale, resolve_href};

/// Name of the cookie remembering the visitor's display language.
pub const LOCALE_COOKIE: &str = "federation_locale";

/// How long a locale choice is remembered.
pub const PREFERENCE_TTL: Duration = Duration::days(365);

/// Durable key-value storage for visitor preferences.
///
/// The server backs it with cookies; tests use [`MemoryPreferenceStore`].
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str, ttl: Duration);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryPreferenceStore {
    entries: HashMap<String, (String, Duration)>,
}

impl MemoryPreferenceStore {
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.entries.get(key).map(|(_, ttl)| *ttl)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|(value, _)| value.to_owned())
    }

    fn set(&mut self, key: &str, value: &str, ttl: Duration) {
        self.entries
            .insert(key.to_owned(), (value.to_owned(), ttl));
    }
}

/// Locale remembered by `store`, ignoring values that are not supported
/// anymore.
pub fn preferred_locale<S: PreferenceStore + ?Sized>(store: &S) -> Option<Locale> {
    store
        .get(LOCALE_COOKIE)
        .and_then(|value| Locale::parse(&value).ok())
}

/// Rewrites `current_href` for `target` and remembers the choice.
///
/// Returns `None` when `target` is already active, in which case nothing is
/// persisted and no navigation should happen.
pub fn switch_locale<S: PreferenceStore + ?Sized>(
    store: &mut S,
    current_href: &str,
    current: Locale,
    target: Locale,
) -> Option<String> {
    if current == target {
        return None;
    }

    let destination = resolve_href(current_href, current, target);
    store.set(LOCALE_COOKIE, target.tag(), PREFERENCE_TTL);

    tracing::info!(
        from = %current,
        to = %target,
        destination = %destination,
        "locale switched"
    );

    Some(destination)
}
