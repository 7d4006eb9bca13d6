//! Validation shared by the 3-letter station and line codes.

/// Check that `s` is exactly 3 uppercase ASCII letters.
pub(super) fn parse_code(s: &str) -> Result<[u8; 3], &'static str> {
    let bytes: [u8; 3] = s
        .as_bytes()
        .try_into()
        .map_err(|_| "must be exactly 3 characters")?;

    if !bytes.iter().all(u8::is_ascii_uppercase) {
        return Err("must be uppercase ASCII letters A-Z");
    }

    Ok(bytes)
}

pub(super) fn code_str(bytes: &[u8; 3]) -> &str {
    // Only ASCII uppercase letters are ever stored
    std::str::from_utf8(bytes).unwrap_or_default()
}
