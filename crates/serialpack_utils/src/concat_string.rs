/// Concatenate string-like values into one `String`, allocating once.
///
/// ```ignore
/// assert_eq!(concat_string!("__r(", id, ");"), "__r(0);");
/// ```
#[macro_export]
macro_rules! concat_string {
  () => { String::new() };
  ($($s:expr),+ $(,)?) => {{
    let mut len = 0;
    $(len += AsRef::<str>::as_ref(&$s).len();)+
    let mut buf = String::with_capacity(len);
    $(buf.push_str(AsRef::<str>::as_ref(&$s));)+
    buf
  }};
}

#[test]
fn test_concat_string() {
  let id = String::from("12");
  assert_eq!(concat_string!("__r(", id, ");"), "__r(12);");
  assert_eq!(concat_string!(), "");
}
