use std::path::Path;

use serialpack_common::{ModulePath, NormalizedSerializerOptions};
use serialpack_utils::concat_string;

/// Join `base_url` and a relative file path with exactly one `/`.
pub fn join_url(base_url: &str, path: &str) -> String {
  concat_string!(base_url.trim_end_matches('/'), "/", path.trim_start_matches('/'))
}

/// URL of a lazily built bundle of `path` on the dev server.
pub fn dev_server_bundle_url(path: &ModulePath, options: &NormalizedSerializerOptions) -> String {
  let relative = path.stabilize(&options.project_root);
  let without_ext = Path::new(&relative).with_extension("");
  let without_ext = without_ext.to_string_lossy();

  let mut query = vec![];
  if let Some(platform) = &options.platform {
    query.push(concat_string!("platform=", urlencoding::encode(platform)));
  }
  query.push(format!("dev={}", options.dev));
  query.push(format!("minify={}", options.minify));
  query.push("modulesOnly=true".to_string());
  query.push("runModule=false".to_string());

  concat_string!(join_url(&options.base_url, &without_ext), ".bundle?", query.join("&"))
}

#[cfg(test)]
mod tests {
  use super::*;
  use serialpack_common::{SerializerOptions, TransformOptions};

  use crate::utils::normalize_options::normalize_options;

  #[test]
  fn joins_without_duplicate_slashes() {
    assert_eq!(join_url("/", "lazy-abc.js"), "/lazy-abc.js");
    assert_eq!(join_url("https://cdn.example.com/assets/", "/lazy.js"), "https://cdn.example.com/assets/lazy.js");
  }

  #[test]
  fn dev_server_url() {
    let transform_options =
      TransformOptions { dev: true, platform: Some("ios".into()), ..TransformOptions::default() };
    let options = normalize_options(
      SerializerOptions {
        project_root: Some("/app".into()),
        base_url: Some("http://localhost:8081/".into()),
        ..Default::default()
      },
      &transform_options,
    )
    .unwrap();
    assert_eq!(
      dev_server_bundle_url(&"/app/src/lazy.tsx".into(), &options),
      "http://localhost:8081/src/lazy.bundle?platform=ios&dev=true&minify=false&modulesOnly=true&runModule=false"
    );
  }

  #[test]
  fn dev_server_url_encodes_the_platform() {
    let transform_options =
      TransformOptions { platform: Some("my os&tv".into()), ..TransformOptions::default() };
    let options = normalize_options(
      SerializerOptions { project_root: Some("/app".into()), ..Default::default() },
      &transform_options,
    )
    .unwrap();
    assert_eq!(
      dev_server_bundle_url(&"/app/lazy.js".into(), &options),
      "/lazy.bundle?platform=my%20os%26tv&dev=false&minify=false&modulesOnly=true&runModule=false"
    );
  }
}
