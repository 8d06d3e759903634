//! Node name to URL segment conversion

use deunicode::deunicode;
use docroute_core::{SlugConfig, SlugMode};
use std::borrow::Cow;

/// Convert a node name into a URL-safe segment.
///
/// Runs of anything that is not a letter or digit collapse into a single
/// separator; apostrophes are dropped so `Let's go` becomes `lets-go`.
/// Leading and trailing separators never appear. The result may be empty.
pub fn to_url_segment(text: &str, config: &SlugConfig) -> String {
    let separator = config.separator.as_char();
    let source: Cow<'_, str> = match config.mode {
        SlugMode::Full | SlugMode::Ascii => Cow::Owned(deunicode(text)),
        SlugMode::Safe => Cow::Borrowed(text),
    };

    let mut out = String::with_capacity(source.len());
    let mut pending_separator = false;

    for c in source.chars() {
        let keep = match config.mode {
            SlugMode::Safe => c.is_alphanumeric(),
            SlugMode::Full | SlugMode::Ascii => c.is_ascii_alphanumeric(),
        };

        if keep {
            if pending_separator && !out.is_empty() {
                out.push(separator);
            }
            pending_separator = false;
            match config.mode {
                SlugMode::Ascii => out.push(c),
                SlugMode::Full | SlugMode::Safe => out.extend(c.to_lowercase()),
            }
        } else if !matches!(c, '\'' | '\u{2019}') {
            pending_separator = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use docroute_core::SlugSeparator;

    fn config(mode: SlugMode) -> SlugConfig {
        SlugConfig {
            mode,
            separator: SlugSeparator::Dash,
        }
    }

    #[test]
    fn test_safe_mode_keeps_unicode() {
        let c = config(SlugMode::Safe);
        assert_eq!(to_url_segment("Products & Services", &c), "products-services");
        assert_eq!(to_url_segment("Über Straße", &c), "über-straße");
        assert_eq!(to_url_segment("  --Home--  ", &c), "home");
    }

    #[test]
    fn test_full_mode_transliterates() {
        let c = config(SlugMode::Full);
        assert_eq!(to_url_segment("Über Straße", &c), "uber-strasse");
        assert_eq!(to_url_segment("Let's Go!", &c), "lets-go");
    }

    #[test]
    fn test_ascii_mode_preserves_case() {
        let c = config(SlugMode::Ascii);
        assert_eq!(to_url_segment("Café Noir", &c), "Cafe-Noir");
    }

    #[test]
    fn test_underscore_separator() {
        let c = SlugConfig {
            mode: SlugMode::Safe,
            separator: SlugSeparator::Underscore,
        };
        assert_eq!(to_url_segment("red shoes/sale", &c), "red_shoes_sale");
    }

    #[test]
    fn test_punctuation_only_is_empty() {
        assert_eq!(to_url_segment("?!/", &SlugConfig::default()), "");
        assert_eq!(to_url_segment("", &SlugConfig::default()), "");
    }
}
