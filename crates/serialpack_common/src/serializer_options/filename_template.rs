const NAME_PATTERN: &str = "[name]";
const HASH_PATTERN: &str = "[hash]";

/// A filename pattern such as `[name]-[hash].js`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTemplate {
  template: String,
}

impl FilenameTemplate {
  pub fn new(template: String) -> Self {
    Self { template }
  }

  pub fn has_hash_pattern(&self) -> bool {
    self.template.contains(HASH_PATTERN)
  }

  pub fn render(&self, name: Option<&str>, hash: Option<&str>) -> String {
    let mut rendered = self.template.clone();
    if let Some(name) = name {
      rendered = rendered.replace(NAME_PATTERN, name);
    }
    if let Some(hash) = hash {
      rendered = rendered.replace(HASH_PATTERN, hash);
    }
    rendered
  }
}

#[test]
fn test_render() {
  let template = FilenameTemplate::new("[name]-[hash].js".to_string());
  assert!(template.has_hash_pattern());
  assert_eq!(template.render(Some("lazy"), Some("abc123")), "lazy-abc123.js");
  assert!(!FilenameTemplate::new("[name].js".to_string()).has_hash_pattern());
}
