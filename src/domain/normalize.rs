use unicode_normalization::UnicodeNormalization;

/// Normalizes free-text fields (merchant name, city, description) for BR Code
/// compatibility.
///
/// Decomposes to NFD and drops combining diacritical marks, keeps only ASCII
/// word characters plus space, hyphen, period and comma, collapses whitespace
/// runs and trims. The BR Code manual (v2.0.0+, May 2020) allows spaces in
/// free-text fields but the payload must stay ASCII-safe, so symbols like `&`
/// and `$` are dropped outright.
///
/// Payment keys are never passed through here; they go into the payload
/// verbatim.
pub fn normalize(text: &str) -> String {
    let filtered: String = text
        .nfd()
        .filter(|&c| !matches!(c, '\u{0300}'..='\u{036f}'))
        .filter(|&c| {
            c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace() || matches!(c, '-' | '.' | ',')
        })
        .collect();

    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates to at most `max` bytes. Only meaningful after [`normalize`],
/// whose output is ASCII, so the cut can never split a character.
pub fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
