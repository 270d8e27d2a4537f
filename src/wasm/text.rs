//! Null-terminated string decoding for module callbacks

/// Decode the UTF-8 string starting at `offset` up to the first NUL byte or
/// the end of `bytes`. Invalid sequences are replaced with U+FFFD.
///
/// Returns `None` when `offset` lies outside `bytes`.
pub fn decode_c_string(bytes: &[u8], offset: usize) -> Option<String> {
    let tail = bytes.get(offset..)?;
    let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    Some(String::from_utf8_lossy(&tail[..end]).into_owned())
}
