use std::path::Path;

/// Name a chunk after the module it is rooted at.
///
/// Platform and other secondary extensions are dropped (`lazy.ios.js` -> `lazy`), and
/// `index` modules are named after their directory. Characters that are awkward in URLs
/// collapse into a single `_`.
pub fn chunk_name_of(path: &Path) -> String {
  let file_name = path.file_name().map(|name| name.to_string_lossy()).unwrap_or_default();
  let stem = file_name.split('.').next().unwrap_or_default();

  let name = if matches!(stem, "index" | "") {
    path
      .parent()
      .and_then(Path::file_name)
      .map_or_else(|| stem.to_string(), |dir| dir.to_string_lossy().into_owned())
  } else {
    stem.to_string()
  };

  let sanitized = sanitize(&name);
  if sanitized.is_empty() { "chunk".to_string() } else { sanitized }
}

fn sanitize(name: &str) -> String {
  let mut sanitized = String::with_capacity(name.len());
  for char in name.chars() {
    if char.is_ascii_alphanumeric() || matches!(char, '-' | '_') {
      sanitized.push(char);
    } else if !sanitized.ends_with('_') {
      sanitized.push('_');
    }
  }
  sanitized
}

#[test]
fn test_chunk_name_of() {
  assert_eq!(chunk_name_of(Path::new("/app/src/lazy.js")), "lazy");
  assert_eq!(chunk_name_of(Path::new("/app/src/Settings.ios.tsx")), "Settings");
  assert_eq!(chunk_name_of(Path::new("/app/screens/index.js")), "screens");
  assert_eq!(chunk_name_of(Path::new("/app/node_modules/@scope/pkg/index.js")), "pkg");
  assert_eq!(chunk_name_of(Path::new("/app/@@weird name!.js")), "_weird_name_");
  assert_eq!(chunk_name_of(Path::new("/index.js")), "index");
  assert_eq!(chunk_name_of(Path::new("/app/+.js")), "_");
}
