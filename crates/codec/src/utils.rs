//! Shared codec validation helpers.

use fanout_core::{FeedError, Result};

/// Fail if `value` contains any character from `reserved`.
///
/// Free function so any textual codec can guard its fields against the
/// characters its token format reserves. Numeric fields are safe by
/// construction; anything user-influenced must pass through here before
/// being joined into a token.
pub fn check_reserved(value: &str, reserved: &[char]) -> Result<()> {
    if let Some(character) = value.chars().find(|c| reserved.contains(c)) {
        return Err(FeedError::ReservedCharacter {
            character,
            value: value.to_string(),
        });
    }
    Ok(())
}
