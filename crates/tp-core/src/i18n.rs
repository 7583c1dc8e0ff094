//! Locale helpers.

/// The default language; the pretty-print fast path only applies here.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Reduce a BCP 47 locale tag to its primary language subtag.
///
/// `"en-US"` becomes `"en"`, `"zh-TW"` becomes `"zh"`. The tag is lowercased;
/// an empty locale maps to the default language.
#[must_use]
pub fn locale_to_language(locale: &str) -> String {
    let primary = locale.split(['-', '_']).next().unwrap_or_default();
    if primary.is_empty() {
        return DEFAULT_LANGUAGE.to_string();
    }
    primary.to_ascii_lowercase()
}
