use oxc_sourcemap::{ConcatSourceMapBuilder, SourceMap};

use super::source::Source;

/// Joins sources with `\n` and concatenates their source maps.
///
/// Every source starts on a fresh line, so the map of the n-th source is offset by the sum of
/// `lines_count() + 1` of all sources before it.
#[derive(Default)]
pub struct SourceJoiner<'source> {
  inner: Vec<Box<dyn Source + Send + 'source>>,
  enable_sourcemap: bool,
}

impl<'source> SourceJoiner<'source> {
  pub fn with_sourcemap(enable_sourcemap: bool) -> Self {
    Self { enable_sourcemap, ..Self::default() }
  }

  pub fn append_source<T: Source + Send + 'source>(&mut self, source: T) {
    self.inner.push(Box::new(source));
  }

  pub fn join(&self) -> (String, Option<SourceMap>) {
    let sources_len = self.inner.len();
    if sources_len == 0 {
      return (String::new(), self.enable_sourcemap.then(|| ConcatSourceMapBuilder::default().into_sourcemap()));
    }
    let sources_iter = self.inner.iter().enumerate();

    let size_hint_of_ret_source = sources_iter.clone().map(|(_idx, source)| source.content().len()).sum::<usize>()
        + /* Each source we will emit a '\n' but exclude last one */ (sources_len - /* Exclude the last source  */ 1);
    let mut ret_source = String::with_capacity(size_hint_of_ret_source);
    let mut sourcemap_builder = self.enable_sourcemap.then(ConcatSourceMapBuilder::default);
    let mut line_offset = 0;

    for (index, source) in sources_iter {
      if let (Some(builder), Some(sourcemap)) = (sourcemap_builder.as_mut(), source.sourcemap()) {
        builder.add_sourcemap(sourcemap, line_offset);
      }
      line_offset += source.lines_count() + 1;

      ret_source.push_str(source.content());
      if index < sources_len - 1 {
        ret_source.push('\n');
      }
    }

    (ret_source, sourcemap_builder.map(ConcatSourceMapBuilder::into_sourcemap))
  }
}
