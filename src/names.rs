//! Slash form (`java/lang/String`) is how names live in the model; dot
//! form (`java.lang.String`) is only produced for display.

use std::cmp::Ordering;

pub fn to_dot_form(name: &str) -> String {
    name.replace('/', ".")
}

pub fn to_slash_form(name: &str) -> String {
    name.replace('.', "/")
}

/// Package of a slash-form class name, still in slash form. The default
/// package is the empty string.
pub fn package_of(class_name: &str) -> &str {
    class_name
        .rfind('/')
        .map_or("", |index| &class_name[..index])
}

/// Case-insensitive ordering for file names; names differing only in case
/// fall back to a byte comparison so the order stays total.
pub fn compare_ignore_case(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(right))
}
