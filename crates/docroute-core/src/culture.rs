//! Culture tags and text direction
//!
//! A culture is a BCP-47-ish language tag such as `en-US` or `ar-SA`.
//! An absent or blank tag means the invariant culture. All comparisons
//! are ASCII case-insensitive since stored casing cannot be trusted.

/// Language subtags written right-to-left when no script subtag says otherwise.
const RTL_LANGUAGES: &[&str] = &[
    "ar", "arc", "ckb", "dv", "fa", "he", "iw", "ks", "ku", "lrc", "mzn", "pnb", "ps", "sd",
    "syr", "ug", "ur", "yi",
];

/// Script subtags written right-to-left.
const RTL_SCRIPTS: &[&str] = &["arab", "hebr", "nkoo", "rohg", "syrc", "thaa", "adlm"];

/// Normalize an optional culture: blank becomes `None`, everything else is trimmed.
pub fn normalize(culture: Option<&str>) -> Option<&str> {
    culture.map(str::trim).filter(|c| !c.is_empty())
}

/// Case-insensitive culture comparison. Two invariant cultures are equal.
pub fn eq(a: Option<&str>, b: Option<&str>) -> bool {
    match (normalize(a), normalize(b)) {
        (None, None) => true,
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

/// Key used for culture-indexed maps and persisted entries ("" = invariant).
pub fn storage_key(culture: Option<&str>) -> String {
    normalize(culture)
        .map(|c| c.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Whether text in the given culture is laid out right-to-left.
///
/// Unknown tags are treated as left-to-right. An explicit script subtag
/// (`az-Arab`, `ku-Latn`) takes precedence over the language subtag.
pub fn is_right_to_left(culture: &str) -> bool {
    let mut parts = culture.trim().split(['-', '_']).filter(|p| !p.is_empty());

    let Some(language) = parts.next() else {
        return false;
    };

    for part in parts {
        if part.len() == 4 && part.chars().all(|c| c.is_ascii_alphabetic()) {
            let script = part.to_ascii_lowercase();
            return RTL_SCRIPTS.contains(&script.as_str());
        }
    }

    let language = language.to_ascii_lowercase();
    RTL_LANGUAGES.contains(&language.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_blank_is_invariant() {
        assert_eq!(normalize(None), None);
        assert_eq!(normalize(Some("")), None);
        assert_eq!(normalize(Some("   ")), None);
        assert_eq!(normalize(Some(" en-US ")), Some("en-US"));
    }

    #[test]
    fn test_eq_ignores_case() {
        assert!(eq(Some("da-DK"), Some("DA-dk")));
        assert!(eq(None, Some("")));
        assert!(!eq(Some("da-DK"), None));
        assert!(!eq(Some("da-DK"), Some("en-US")));
    }

    #[test]
    fn test_storage_key() {
        assert_eq!(storage_key(Some("en-US")), "en-us");
        assert_eq!(storage_key(None), "");
        assert_eq!(storage_key(Some(" ")), "");
    }

    #[test]
    fn test_right_to_left_languages() {
        assert!(is_right_to_left("ar"));
        assert!(is_right_to_left("ar-SA"));
        assert!(is_right_to_left("he-IL"));
        assert!(is_right_to_left("FA-ir"));
        assert!(!is_right_to_left("en-US"));
        assert!(!is_right_to_left("da-DK"));
        assert!(!is_right_to_left(""));
    }

    #[test]
    fn test_script_subtag_overrides_language() {
        assert!(is_right_to_left("az-Arab"));
        assert!(!is_right_to_left("ku-Latn"));
        assert!(is_right_to_left("pa-Arab-PK"));
    }
}
