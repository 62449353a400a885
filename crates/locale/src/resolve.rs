use crate::Locale;

/// Computes the path to navigate to when switching from `current` to
/// `target` while on `current_path`.
///
/// The path is only the path component of a URL; use [`resolve_href`] for
/// hrefs that may carry a query string or fragment. When both locales are
/// equal the path is returned untouched and callers must skip navigation.
///
/// ```
/// use federation_locale::{resolve, Locale};
///
/// assert_eq!(resolve("/", Locale::En, Locale::Ar), "/ar");
/// assert_eq!(resolve("/ar/ar/news", Locale::Ar, Locale::En), "/news");
/// ```
pub fn resolve(current_path: &str, current: Locale, target: Locale) -> String {
    if current == target {
        return current_path.to_owned();
    }

    localize(&bare_path(current_path), target)
}

/// Same as [`resolve`] but keeps the `?query` and `#fragment` of `href`
/// attached to the rewritten path.
pub fn resolve_href(href: &str, current: Locale, target: Locale) -> String {
    if current == target {
        return href.to_owned();
    }

    let (path, suffix) = split_href(href);

    format!("{}{suffix}", resolve(path, current, target))
}

/// Strips the locale prefix from `path`, repairing doubled prefixes
/// (`/ar/ar/news`) first. The result always starts with `/` and never
/// starts with a locale segment.
pub fn bare_path(path: &str) -> String {
    let path = collapse_doubled_prefix(collapse_slashes(&rooted(path)));
    let (segment, rest) = split_first_segment(&path);

    match Locale::from_segment(segment) {
        Some(_) if rest.is_empty() => "/".to_owned(),
        Some(_) => rest.to_owned(),
        None => path,
    }
}

/// Prefixes a bare path for `locale`. The default locale never gets a
/// prefix and the site root of a prefixed locale is `/<tag>` exactly.
pub fn localize(bare: &str, locale: Locale) -> String {
    let bare = rooted(bare);

    let path = if locale.is_default() {
        bare
    } else if bare == "/" {
        format!("/{locale}")
    } else {
        format!("/{locale}{bare}")
    };

    collapse_slashes(&path)
}

impl Locale {
    /// Locale carried by a request path together with its bare path.
    /// Unprefixed paths belong to [`Locale::DEFAULT`].
    pub fn from_path(path: &str) -> (Locale, String) {
        let repaired = collapse_doubled_prefix(collapse_slashes(&rooted(path)));
        let (segment, _) = split_first_segment(&repaired);
        let locale = Locale::from_segment(segment).unwrap_or(Locale::DEFAULT);

        (locale, bare_path(&repaired))
    }
}

/// Canonical form of a request path, or `None` when `path` is already
/// canonical. Non-canonical paths are the ones carrying an explicit
/// default-locale prefix, a doubled locale prefix, a trailing slash after
/// a locale prefix or runs of slashes.
pub fn canonical_path(path: &str) -> Option<String> {
    let (locale, bare) = Locale::from_path(path);
    let canonical = localize(&bare, locale);

    (canonical != path).then_some(canonical)
}

fn rooted(path: &str) -> String {
    if path.starts_with('/') {
        path.to_owned()
    } else {
        format!("/{path}")
    }
}

fn collapse_slashes(path: &str) -> String {
    let mut collapsed = String::with_capacity(path.len());
    let mut previous_slash = false;

    for c in path.chars() {
        if c == '/' && previous_slash {
            continue;
        }
        previous_slash = c == '/';
        collapsed.push(c);
    }

    collapsed
}

/// Splits `/seg/rest` into `("seg", "/rest")`; `rest` is empty when the
/// path has a single segment.
fn split_first_segment(path: &str) -> (&str, &str) {
    let trimmed = path.strip_prefix('/').unwrap_or(path);

    match trimmed.find('/') {
        Some(index) => (&trimmed[..index], &trimmed[index..]),
        None => (trimmed, ""),
    }
}

fn collapse_doubled_prefix(mut path: String) -> String {
    loop {
        let (first, rest) = split_first_segment(&path);
        if Locale::from_segment(first).is_none() || rest.is_empty() {
            return path;
        }

        let (second, tail) = split_first_segment(rest);
        if Locale::from_segment(second).is_none() {
            return path;
        }

        tracing::debug!(path = %path, "collapsing doubled locale prefix");
        path = format!("/{first}{tail}");
    }
}

fn split_href(href: &str) -> (&str, &str) {
    match href.find(['?', '#']) {
        Some(index) => href.split_at(index),
        None => (href, ""),
    }
}
