//! Normalization rules shared by identity resolution and fingerprinting

/// Trimmed text, `None` when nothing is left
pub fn text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Trimmed, lowercased text, `None` when nothing is left
pub fn folded(value: Option<&str>) -> Option<String> {
    text(value).map(|v| v.to_lowercase())
}

/// Digits only, `None` when the value has no digits
pub fn digits(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.chars().filter(char::is_ascii_digit).collect::<String>())
        .filter(|v| !v.is_empty())
}
