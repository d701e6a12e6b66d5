use serialpack_sourcemap::{Position, SourceLocation};

const VOID: &str = "void 0";

/// Overwrite every call site of the dependency in `slot` with `void 0`.
///
/// The rewritten code has the same byte length and the same line breaks as the input, so line
/// counts and source maps stay valid. Returns `None` when any location does not point at a
/// call through `dependencyMap[slot]`, or when `code` references the slot outside of the
/// locations. The edge must be kept in both cases.
pub fn blank_dependency_calls(code: &str, locs: &[SourceLocation], slot: usize) -> Option<String> {
  if locs.is_empty() {
    return None;
  }
  let needle = format!("dependencyMap[{slot}]");

  let line_starts = line_starts(code);
  let mut ranges = locs
    .iter()
    .map(|loc| {
      let start = byte_offset(code, &line_starts, loc.start)?;
      let end = byte_offset(code, &line_starts, loc.end)?;
      (start < end && code[start..end].contains(&needle)).then_some((start, end))
    })
    .collect::<Option<Vec<_>>>()?;
  ranges.sort_unstable();
  let mut last_end = 0;
  ranges.retain(|&(start, end)| {
    // Nested or repeated locations are already covered by an earlier range.
    let is_covered = start < last_end;
    last_end = last_end.max(end);
    !is_covered
  });

  let covered =
    ranges.iter().map(|&(start, end)| code[start..end].matches(&needle).count()).sum::<usize>();
  if covered != code.matches(&needle).count() {
    return None;
  }

  let mut bytes = code.as_bytes().to_vec();
  for (start, end) in ranges {
    for byte in &mut bytes[start..end] {
      if !matches!(*byte, b'\n' | b'\r') {
        *byte = b' ';
      }
    }
    let replacement_len = VOID.len().min(end - start);
    bytes[start..start + replacement_len].copy_from_slice(&VOID.as_bytes()[..replacement_len]);
  }

  // Only whole characters inside `code` were overwritten with ASCII.
  String::from_utf8(bytes).ok()
}

fn line_starts(code: &str) -> Vec<usize> {
  std::iter::once(0).chain(code.match_indices('\n').map(|(index, _)| index + 1)).collect()
}

/// Lines are 1-based, columns count UTF-16 code units from the start of the line.
fn byte_offset(code: &str, line_starts: &[usize], position: Position) -> Option<usize> {
  let line_index = usize::try_from(position.line).ok()?.checked_sub(1)?;
  let line_start = *line_starts.get(line_index)?;
  let line_end = line_starts.get(line_index + 1).map_or(code.len(), |next| next - 1);
  let line = &code[line_start..line_end];

  let mut utf16_column = 0u32;
  for (byte_index, ch) in line.char_indices() {
    if utf16_column == position.column {
      return Some(line_start + byte_index);
    }
    if utf16_column > position.column {
      return None;
    }
    utf16_column += u32::try_from(ch.len_utf16()).ok()?;
  }
  (utf16_column == position.column).then_some(line_end)
}
