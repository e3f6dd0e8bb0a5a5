//! French phone number normalization and matching.
//!
//! Numbers are compared by their national digit form (`0612345678`). The
//! rules are intentionally narrow: only the `33` / `0033` country prefixes
//! are rewritten and nothing is validated, so foreign numbers only match
//! when their raw digits are identical.

/// Placeholder shown when a call carries no number.
pub const NO_NUMBER: &str = "Non disponible";

/// Reduces a phone number to its comparable digit form.
///
/// Every non-ASCII-digit is dropped, then a leading `33` or `0033` is
/// replaced by a single `0`. The rewrite repeats until no prefix is left
/// (`0033033...` would otherwise expose a second `0033`), which keeps the
/// function idempotent.
pub fn normalize(raw: &str) -> String {
    let mut digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    loop {
        if let Some(rest) = digits.strip_prefix("0033") {
            digits = format!("0{}", rest);
        } else if let Some(rest) = digits.strip_prefix("33") {
            digits = format!("0{}", rest);
        } else {
            return digits;
        }
    }
}

/// Returns true when both numbers normalize to the same non-empty value.
pub fn phones_match(a: &str, b: &str) -> bool {
    let a = normalize(a);
    !a.is_empty() && a == normalize(b)
}

/// Renders a number for humans: `06 12 34 56 78` for French numbers.
///
/// Only the empty string gives [`NO_NUMBER`]; blank input cleans down to
/// `""`. French forms (`+33`, `33`, `0033`, `0`) are rewritten to their
/// national `0…` form and grouped in pairs when that form has ten digits,
/// otherwise returned ungrouped. Anything else is returned cleaned (digits
/// and `+` only).
pub fn format_display(raw: &str) -> String {
    if raw.is_empty() {
        return NO_NUMBER.to_string();
    }

    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    let national = if let Some(rest) = cleaned.strip_prefix("+33") {
        format!("0{}", rest)
    } else if cleaned.starts_with('+') {
        return cleaned;
    } else {
        normalize(&cleaned)
    };

    if !national.starts_with('0') {
        cleaned
    } else if is_french_national(&national) {
        group_pairs(&national)
    } else {
        national
    }
}

fn is_french_national(digits: &str) -> bool {
    digits.len() == 10 && digits.starts_with('0') && digits.chars().all(|c| c.is_ascii_digit())
}

fn group_pairs(digits: &str) -> String {
    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| String::from_utf8_lossy(pair).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "+33612345678",
        "0033612345678",
        "33612345678",
        "0612345678",
        "06 12 34 56 78",
        "06.12.34.56.78",
        "+44 20 7946 0958",
        "+1 (555) 010-9999",
        "abc",
        "3333",
        "003300330612",
        "0033033612345678",
        "33033612345678",
    ];

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in SAMPLES {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "input: {raw:?}");
        }
    }

    #[test]
    fn test_normalize_french_forms() {
        assert_eq!(normalize("+33612345678"), "0612345678");
        assert_eq!(normalize("0033612345678"), "0612345678");
        assert_eq!(normalize("0612345678"), "0612345678");
        assert_eq!(normalize("33612345678"), "0612345678");
        assert_eq!(normalize("06 12-34.56 78"), "0612345678");
        assert_eq!(normalize("0033033612345678"), "0612345678");
    }

    #[test]
    fn test_normalize_strips_silently() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("tel: inconnu"), "");
        assert_eq!(normalize("+44 20 7946 0958"), "442079460958");
    }

    #[test]
    fn test_phones_match() {
        assert!(phones_match("+33 6 12 34 56 78", "06.12.34.56.78"));
        assert!(!phones_match("", "0612345678"));
        assert!(!phones_match("", ""));
        assert!(!phones_match("abc", "xyz"));
        assert!(!phones_match("0612345678", "0612345679"));
    }

    #[test]
    fn test_phones_match_is_symmetric() {
        for a in SAMPLES {
            for b in SAMPLES {
                assert_eq!(phones_match(a, b), phones_match(b, a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_format_display() {
        assert_eq!(format_display(""), "Non disponible");
        assert_eq!(format_display("+33612345678"), "06 12 34 56 78");
        assert_eq!(format_display("0033612345678"), "06 12 34 56 78");
        assert_eq!(format_display("33612345678"), "06 12 34 56 78");
        assert_eq!(format_display("0612345678"), "06 12 34 56 78");
        assert_eq!(format_display("+33 6 12 34 56 78"), "06 12 34 56 78");
    }

    #[test]
    fn test_format_display_passthrough() {
        assert_eq!(format_display("+44 20 7946 0958"), "+442079460958");
        assert_eq!(format_display("612345678"), "612345678");
        assert_eq!(format_display("061234"), "061234");
    }

    #[test]
    fn test_format_display_short_french_numbers_keep_national_form() {
        assert_eq!(format_display("+3361234"), "061234");
        assert_eq!(format_display("33612"), "0612");
        assert_eq!(format_display("0033 6 12"), "0612");
    }

    #[test]
    fn test_format_display_blank_input() {
        assert_eq!(format_display(""), NO_NUMBER);
        assert_eq!(format_display("   "), "");
        assert_eq!(format_display("tel: inconnu"), "");
    }
}
