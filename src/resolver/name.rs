use ens_normalize_rs::EnsNameNormalizer;
use std::sync::OnceLock;

use crate::models::{GrantsError, Result};

/// Characters that can never appear in a resolvable name label.
const RESERVED: &[char] = &['/', '\\', '?', '#', '@', ':', '%', '"', '<', '>', '[', ']', '|', '^', '`', '{', '}'];

fn normalizer() -> &'static EnsNameNormalizer {
    static NORMALIZER: OnceLock<EnsNameNormalizer> = OnceLock::new();
    NORMALIZER.get_or_init(EnsNameNormalizer::default)
}

/// Canonical ENSIP-15 form of a dotted name.
///
/// Empty labels and whitespace, control or URL-reserved characters are
/// rejected up front so the error names the offending part. Everything else
/// goes through the ENSIP-15 normalizer: case folding, width mapping
/// (fullwidth to ASCII), NFC composition and the emoji/confusable rules.
pub fn normalize_name(input: &str) -> Result<String> {
    let name = input.trim();

    if name.is_empty() {
        return Err(GrantsError::InvalidName("name is empty".to_string()));
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err(GrantsError::InvalidName(format!("{} contains an empty label", name)));
        }
        if let Some(c) = label.chars().find(|c| c.is_whitespace() || c.is_control() || RESERVED.contains(c)) {
            return Err(GrantsError::InvalidName(format!("{} contains disallowed character {:?}", name, c)));
        }
    }

    normalizer()
        .normalize(name)
        .map_err(|e| GrantsError::InvalidName(format!("{} is not a valid name: {}", name, e)))
}
