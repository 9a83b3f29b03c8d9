//! Text normalization primitives applied to records at commit time.
//!
//! The rules mirror the legacy registration data: display names are stored
//! folded to uppercase ASCII, document numbers as bare digits, and phone
//! numbers in E.164-ish form with the Brazilian country code as default.

/// Domestic phone numbers carry at most 11 digits
/// (2-digit area code + up to 9 subscriber digits).
const DOMESTIC_MAX_DIGITS: usize = 11;

/// Default country code prefixed to domestic phone numbers.
const DEFAULT_COUNTRY_CODE: &str = "55";

/// Trim, uppercase, and fold a display name to ASCII.
///
/// Latin diacritics map to their base letter; any character still outside
/// ASCII after folding is dropped. Lossy for non-Latin scripts — kept as
/// observed legacy behavior.
pub fn fold_upper(s: &str) -> String {
    s.trim()
        .chars()
        .flat_map(char::to_uppercase)
        .map(fold_char)
        .filter(char::is_ascii)
        .collect()
}

fn fold_char(c: char) -> char {
    match c {
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'Ç' => 'C',
        'Ñ' => 'N',
        'Ý' => 'Y',
        _ => c,
    }
}

/// Keep only ASCII digits. Used for document numbers and zip codes.
pub fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// Trim and lowercase an email-typed contact value.
pub fn normalize_email(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Normalize a phone-typed contact value.
///
/// Non-digits are stripped. A value that already carried a `+` keeps its
/// digits as-is; otherwise the default country code is prefixed when the
/// digit count fits a domestic number. Empty input stays empty.
pub fn normalize_phone(s: &str) -> String {
    let trimmed = s.trim();
    let digits = digits_only(trimmed);
    if digits.is_empty() {
        return String::new();
    }
    if trimmed.starts_with('+') || digits.len() > DOMESTIC_MAX_DIGITS {
        format!("+{digits}")
    } else {
        format!("+{DEFAULT_COUNTRY_CODE}{digits}")
    }
}
