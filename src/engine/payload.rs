use rand::Rng;

/// Characters used for upload payloads.
pub const PAYLOAD_CHARSET: &str = "aBcD123.!#";

/// Random string of `length` characters drawn from [`PAYLOAD_CHARSET`].
#[must_use]
pub fn random_string(length: usize) -> String {
    random_string_with_charset(length, PAYLOAD_CHARSET)
}

/// Random string of `length` characters drawn from `charset`.
///
/// An empty charset yields an empty string.
#[must_use]
pub fn random_string_with_charset(length: usize, charset: &str) -> String {
    let chars: Vec<char> = charset.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    let mut rng = rand::thread_rng();
    (0..length)
        .filter_map(|_| chars.get(rng.gen_range(0..chars.len())).copied())
        .collect()
}
