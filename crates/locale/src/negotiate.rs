use std::str::FromStr;

use crate::Locale;

/// Picks the supported locale the client ranks highest in an
/// `Accept-Language` header. Region subtags are ignored (`ar-AE` is `ar`),
/// entries with `q=0` or an unreadable weight are skipped and ties keep
/// header order.
pub fn negotiate(accept_language: &str) -> Option<Locale> {
    let mut best: Option<(Locale, f32)> = None;

    for entry in accept_language.split(',') {
        let mut parts = entry.split(';');
        let tag = parts.next().unwrap_or_default().trim();

        let Some(quality) = parts
            .find_map(|param| param.trim().strip_prefix("q="))
            .map(|q| f32::from_str(q.trim()).ok())
            .unwrap_or(Some(1.0))
        else {
            continue;
        };

        if quality <= 0.0 {
            continue;
        }

        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        let Some(locale) = Locale::from_segment(&primary) else {
            continue;
        };

        if best.is_none_or(|(_, q)| quality > q) {
            best = Some((locale, quality));
        }
    }

    best.map(|(locale, _)| locale)
}
