//! Ordered defaulting over alias keys.
//!
//! Callers spell the same property several ways (`fill`, `backgroundColor`,
//! `color`). Every lookup that accepts aliases goes through [`first_of`] so
//! precedence is written down once, at the call site, as an ordered list.

use serde_json::{Map, Value};

/// The first candidate that is present.
pub fn first_of<T>(candidates: impl IntoIterator<Item = Option<T>>) -> Option<T> {
    candidates.into_iter().flatten().next()
}

pub fn first_str<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    first_of(keys.iter().map(|k| object.get(*k).and_then(Value::as_str)))
}
