use arcstr::ArcStr;
use oxc_sourcemap::{SourceMap, SourceMapBuilder};
use serde::{Deserialize, Serialize};

/// `line` is 1-based and `column` 0-based, the convention transformers report locations in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
  pub line: u32,
  pub column: u32,
}

impl Position {
  pub fn new(line: u32, column: u32) -> Self {
    Self { line, column }
  }
}

/// The span of a call site in a module's compiled code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
  pub start: Position,
  pub end: Position,
}

impl std::fmt::Display for SourceLocation {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}:{}", self.start.line, self.start.column)
  }
}

/// One raw mapping of a module's compiled code, relative to that code alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingSegment {
  pub generated: Position,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub original: Option<Position>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<ArcStr>,
}

impl MappingSegment {
  pub fn new(generated: Position, original: Position) -> Self {
    Self { generated, original: Some(original), name: None }
  }
}

/// Build a standalone source map from raw segments.
///
/// `line_shift` moves every generated line down, for code that gets emitted below a header.
/// Segments pointing at line 0 are malformed and dropped.
pub fn collapse_segments(
  segments: &[MappingSegment],
  source: &str,
  source_content: Option<&str>,
  line_shift: u32,
) -> SourceMap {
  let mut builder = SourceMapBuilder::default();
  let source_id = builder.set_source_and_content(source, source_content.unwrap_or_default());

  for segment in segments {
    let Some(dst_line) = segment.generated.line.checked_sub(1) else {
      continue;
    };
    let name_id = segment.name.as_ref().map(|name| builder.add_name(name));
    match segment.original {
      Some(original) if original.line > 0 => builder.add_token(
        dst_line + line_shift,
        segment.generated.column,
        original.line - 1,
        original.column,
        Some(source_id),
        name_id,
      ),
      _ => builder.add_token(dst_line + line_shift, segment.generated.column, 0, 0, None, None),
    }
  }

  builder.into_sourcemap()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn shifts_generated_lines_only() {
    let segments = vec![
      MappingSegment::new(Position::new(1, 0), Position::new(1, 0)),
      MappingSegment {
        generated: Position::new(2, 4),
        original: Some(Position::new(3, 2)),
        name: Some("foo".into()),
      },
    ];
    let map = collapse_segments(&segments, "/app/foo.js", Some("const foo = 1;"), 1);
    let tokens = map
      .get_tokens()
      .map(|token| (token.get_dst_line(), token.get_dst_col(), token.get_src_line(), token.get_src_col()))
      .collect::<Vec<_>>();
    assert_eq!(tokens, vec![(1, 0, 0, 0), (2, 4, 2, 2)]);
    assert_eq!(map.get_source(0), Some("/app/foo.js"));
  }

  #[test]
  fn drops_malformed_segments() {
    let segments = vec![MappingSegment::new(Position::new(0, 0), Position::new(1, 0))];
    let map = collapse_segments(&segments, "/app/foo.js", None, 0);
    assert_eq!(map.get_tokens().count(), 0);
  }
}
