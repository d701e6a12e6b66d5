use memchr::memmem;

/// Number of `\n` in `str`, saturating at `u32::MAX`.
#[inline]
pub fn lines_count(str: &str) -> u32 {
  u32::try_from(memmem::find_iter(str.as_bytes(), "\n").count()).unwrap_or(u32::MAX)
}

/// Number of lines `str` occupies once emitted, which is what transformers report as `lineCount`.
#[inline]
pub fn code_lines_count(str: &str) -> u32 {
  lines_count(str) + 1
}

#[test]
fn test() {
  assert_eq!(lines_count("a\nb\nc"), 2);
  assert_eq!(lines_count("a\nb\nc\n"), 3);
  assert_eq!(lines_count("a"), 0);
  assert_eq!(code_lines_count("a"), 1);
  assert_eq!(code_lines_count(""), 1);
}
