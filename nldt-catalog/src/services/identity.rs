//! Identity deriver
//!
//! Turns a display name into a stable, filesystem-safe identifier ("slug").
//! Everything here is pure and total: no I/O, no panics, never an empty
//! identifier.

use std::path::Path;

/// Maximum identifier length in bytes (identifiers are ASCII)
pub const MAX_IDENTIFIER_LEN: usize = 70;

/// Returned when normalisation leaves nothing
pub const PLACEHOLDER_IDENTIFIER: &str = "item";

const SEPARATOR: char = '-';

fn is_quote(ch: char) -> bool {
    matches!(
        ch,
        '\'' | '"' | '`' | '\u{00B4}' | '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201C}' | '\u{201D}' | '\u{201E}'
    )
}

/// ASCII fold for lowercase Latin letters with diacritics
fn fold(ch: char) -> Option<&'static str> {
    let s = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => "i",
        'ł' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'œ' => "oe",
        'ř' => "r",
        'ß' => "ss",
        'ś' | 'š' | 'ş' => "s",
        'ť' | 'ţ' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(s)
}

/// Derive an identifier from free text
///
/// Lowercases, drops quote characters, folds diacritics to ASCII, collapses
/// every run of other characters into one `-`, trims separators and
/// truncates to [`MAX_IDENTIFIER_LEN`].
///
/// `"F-16 Fighting Falcon"` → `"f-16-fighting-falcon"`
pub fn derive_identifier(display_name: &str) -> String {
    let mut out = String::with_capacity(display_name.len());
    let mut pending_separator = false;

    let mut push = |c: char, out: &mut String| {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push(SEPARATOR);
            }
            pending_separator = false;
            out.push(c);
        } else {
            pending_separator = true;
        }
    };

    for ch in display_name.to_lowercase().chars() {
        if is_quote(ch) {
            continue;
        }
        match fold(ch) {
            Some(ascii) => ascii.chars().for_each(|c| push(c, &mut out)),
            None => push(ch, &mut out),
        }
    }

    out.truncate(MAX_IDENTIFIER_LEN);
    let trimmed = out.trim_end_matches(SEPARATOR);

    if trimmed.is_empty() {
        PLACEHOLDER_IDENTIFIER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Identifier of an existing asset: the file stem, verbatim
///
/// No re-normalisation, so the identity survives later changes to the
/// display name.
pub fn identifier_from_asset(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Lowercase with whitespace runs collapsed to one space
pub fn normalize_alias(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Answer aliases for a display name
///
/// The normalised name plus a short form without parenthesised segments.
/// `"Boeing AH-64 (Apache)"` → `["boeing ah-64", "boeing ah-64 (apache)"]`
pub fn aliases_for(display_name: &str) -> Vec<String> {
    let full = normalize_alias(display_name);

    let mut short = String::with_capacity(full.len());
    let mut depth = 0usize;
    for ch in full.chars() {
        match ch {
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            _ if depth == 0 => short.push(ch),
            _ => {}
        }
    }
    let short = normalize_alias(&short);

    let mut aliases: Vec<String> = [full, short].into_iter().filter(|a| !a.is_empty()).collect();
    aliases.sort();
    aliases.dedup();
    aliases
}

/// Readable name for a record that only has an identifier
///
/// `"cv90-infantry_fighting"` → `"Cv90 Infantry Fighting"`
pub fn display_name_from_identifier(identifier: &str) -> String {
    identifier
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_basic_slug() {
        assert_eq!(derive_identifier("F-16 Fighting Falcon"), "f-16-fighting-falcon");
        assert_eq!(derive_identifier("  Zr.Ms. Holland  "), "zr-ms-holland");
    }

    #[test]
    fn test_quotes_are_dropped_not_separated() {
        assert_eq!(derive_identifier("Hr.Ms. Karel Doorman’s deck"), "hr-ms-karel-doormans-deck");
        assert_eq!(derive_identifier("\"Walrus\"-klasse"), "walrus-klasse");
    }

    #[test]
    fn test_diacritics_folded() {
        assert_eq!(derive_identifier("Zeven Provinciën"), "zeven-provincien");
        assert_eq!(derive_identifier("Straße Ærø"), "strasse-aero");
    }

    #[test]
    fn test_empty_and_punctuation_yield_placeholder() {
        assert_eq!(derive_identifier(""), PLACEHOLDER_IDENTIFIER);
        assert_eq!(derive_identifier("?!  --- ()"), PLACEHOLDER_IDENTIFIER);
        assert_eq!(derive_identifier("’’"), PLACEHOLDER_IDENTIFIER);
    }

    #[test]
    fn test_truncation_does_not_leave_separator() {
        let name = format!("{} tail", "a".repeat(69));
        let id = derive_identifier(&name);
        assert_eq!(id, "a".repeat(69));
        assert!(derive_identifier(&"word ".repeat(40)).len() <= MAX_IDENTIFIER_LEN);
    }

    #[test]
    fn test_asset_identifier_is_verbatim() {
        assert_eq!(
            identifier_from_asset(Path::new("images/luchtmacht/F-35_Lightning II.jpg")).as_deref(),
            Some("F-35_Lightning II")
        );
        assert_eq!(identifier_from_asset(Path::new("")), None);
    }

    #[test]
    fn test_aliases() {
        assert_eq!(
            aliases_for("Boeing  AH-64 (Apache)"),
            vec!["boeing ah-64".to_string(), "boeing ah-64 (apache)".to_string()]
        );
        assert_eq!(aliases_for("NH90"), vec!["nh90".to_string()]);
        assert!(aliases_for("   ").is_empty());
    }

    #[test]
    fn test_display_name_from_identifier() {
        assert_eq!(display_name_from_identifier("cv90-infantry_fighting"), "Cv90 Infantry Fighting");
        assert_eq!(display_name_from_identifier("---"), "");
    }

    fn is_identifier_char(c: char) -> bool {
        c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
    }

    proptest! {
        #[test]
        fn prop_identifier_shape(name in "\\PC{0,200}") {
            let id = derive_identifier(&name);
            prop_assert!(!id.is_empty());
            prop_assert!(id.len() <= MAX_IDENTIFIER_LEN);
            prop_assert!(id.chars().all(is_identifier_char), "bad identifier {:?}", id);
            prop_assert!(!id.starts_with('-') && !id.ends_with('-'));
            prop_assert!(!id.contains("--"));
        }

        #[test]
        fn prop_identifier_deterministic_and_stable(name in "\\PC{0,120}") {
            let id = derive_identifier(&name);
            prop_assert_eq!(&derive_identifier(&name), &id);
            prop_assert_eq!(derive_identifier(&id), id);
        }

        #[test]
        fn prop_long_names_truncated(name in "[A-Za-z0-9 ]{71,200}") {
            prop_assert!(derive_identifier(&name).len() <= MAX_IDENTIFIER_LEN);
        }
    }
}
