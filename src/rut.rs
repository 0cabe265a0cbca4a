//! Lenient RUT canonicalization
//!
//! Accepts any separator style ("15421741K", "15.421.741-K", "15421741-K")
//! and renders the dotted/dashed canonical form. The check digit is NOT
//! verified; the upstream page is the authority on whether the RUT exists.

use crate::error::{AppError, AppResult};

/// Canonical RUT: numeric body plus upper-cased check character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRut {
    body: String,
    check: char,
}

impl CanonicalRut {
    /// `body` grouped in 3-digit clusters from the right, `-` and check char appended
    pub fn formatted(&self) -> String {
        let body: Vec<char> = self.body.chars().collect();
        let mut grouped = String::with_capacity(body.len() + body.len() / 3 + 2);
        for (i, ch) in body.iter().enumerate() {
            let remaining = body.len() - i;
            if i > 0 && remaining % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(*ch);
        }
        format!("{}-{}", grouped, self.check)
    }
}

impl std::fmt::Display for CanonicalRut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.formatted())
    }
}

/// Normalizes arbitrary user input into a [`CanonicalRut`]
///
/// Lowercases, keeps only digits and `k`, splits the last character off as the
/// check character. Fails when fewer than 2 significant characters remain.
/// Idempotent: dots and dashes are stripped before regrouping, so normalizing
/// an already-canonical string yields the same string.
pub fn normalize(raw: &str) -> AppResult<CanonicalRut> {
    let filtered: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == 'k')
        .collect();

    if filtered.len() < 2 {
        return Err(AppError::InvalidRut);
    }

    let mut chars = filtered.chars();
    let check = chars.next_back().unwrap_or('0').to_ascii_uppercase();
    let body: String = chars.collect();

    Ok(CanonicalRut { body, check })
}
