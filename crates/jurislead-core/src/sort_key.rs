//! Sort keys for IPC section identifiers.
//!
//! Section identifiers are a number with an optional letter suffix for
//! sections inserted by amendment: `120`, `120A`, `120B`, `376`, `376A`,
//! `376AB`, `376D`, `376DA`. Plain string ordering gets these wrong
//! (`"1000" < "302"`), so listings sort on a normalised key instead.
//!
//! Callers may pass display forms such as `"IPC 302"` or `"Section 498A"`;
//! the prefix is ignored.

/// Strip a leading `IPC`, `Section`, `Sec.` or `s.` marker and whitespace.
fn strip_prefix(s: &str) -> &str {
    let mut rest = s.trim();
    loop {
        let lower = rest.to_ascii_lowercase();
        let cut = ["ipc", "section", "sec.", "s."]
            .iter()
            .find(|p| lower.starts_with(**p))
            .map(|p| p.len());
        match cut {
            Some(n) => rest = rest[n..].trim_start(),
            None => return rest,
        }
    }
}

/// Numeric part of a section identifier, e.g. `"498A"` → `498`.
///
/// Returns 0 when the identifier has no leading digits.
pub fn section_number(s: &str) -> u32 {
    let s = strip_prefix(s);
    let end = s
        .as_bytes()
        .iter()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(s.len());
    s[..end].parse().unwrap_or(0)
}

/// Normalise a section identifier into a lexicographically-sortable string.
///
/// Input: `"302"`, `"304A"`, `"376AB"`, `"IPC 120B"`
/// Output: `"0302.00.00"`, `"0304.01.00"`, `"0376.01.02"`, `"0120.02.00"`
///
/// Up to two suffix letters are kept (A=01 … Z=26); anything after the
/// first non-letter is ignored.
pub fn normalize_section(s: &str) -> String {
    let s = strip_prefix(s);
    if s.is_empty() {
        return "0000.00.00".to_string();
    }

    let upper = s.to_ascii_uppercase();
    let bytes = upper.as_bytes();

    let digit_end = bytes
        .iter()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(bytes.len());
    let base: u32 = upper[..digit_end].parse().unwrap_or(0);

    let mut letters = [0u32; 2];
    for (slot, b) in letters
        .iter_mut()
        .zip(bytes[digit_end..].iter().take_while(|b| b.is_ascii_uppercase()))
    {
        *slot = (b - b'A') as u32 + 1;
    }

    format!("{:04}.{:02}.{:02}", base, letters[0], letters[1])
}
