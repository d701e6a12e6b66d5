use xxhash_rust::xxh3::xxh3_128;

pub fn xxhash_base64_url(input: &[u8]) -> String {
  let hash = xxh3_128(input).to_le_bytes();
  base64_simd::URL_SAFE_NO_PAD.encode_to_string(hash)
}

/// Hash shortened to `len` characters, for use in file names.
pub fn xxhash_short(input: &[u8], len: usize) -> String {
  let mut hash = xxhash_base64_url(input);
  hash.truncate(len);
  hash
}

#[test]
fn test_xxhash_is_stable() {
  assert_eq!(xxhash_base64_url(b"hello"), xxhash_base64_url(b"hello"));
  assert_ne!(xxhash_base64_url(b"hello"), xxhash_base64_url(b"hello!"));
  assert_eq!(xxhash_base64_url(b"hello").len(), 22);
  assert_eq!(xxhash_short(b"hello", 8).len(), 8);
}
