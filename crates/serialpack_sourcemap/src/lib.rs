mod lines_count;
mod mapping;
mod source;
mod source_joiner;

pub use crate::{
  lines_count::{code_lines_count, lines_count},
  mapping::{MappingSegment, Position, SourceLocation, collapse_segments},
  source::{Source, SourceMapSource},
  source_joiner::SourceJoiner,
};
pub use oxc_sourcemap::{ConcatSourceMapBuilder, SourceMap, SourceMapBuilder, Token};
