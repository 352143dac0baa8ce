//! Find every value stored under a key, anywhere in a JSON tree.
//!
//! The page data nests result records at varying depths depending on the
//! layout the site chose for a query, so the parser does not navigate a fixed
//! path. Instead it asks for every `videoRenderer` wherever it sits.
//!
//! Only objects are searched. Arrays held by an object are walked for the
//! objects they contain; a tree whose root is not an object yields nothing,
//! and arrays directly inside arrays are never looked into.
use serde_json::Value;
use serde_json::map::Iter as ObjectIter;
use std::slice::Iter as ArrayIter;

enum Frame<'a> {
    Object(ObjectIter<'a>),
    Array(ArrayIter<'a, Value>),
}

/// Lazy pre-order walk returned by [`extract_all`].
///
/// Values are produced in document order, a match before anything nested
/// inside it. The walk only borrows the tree; calling [`extract_all`] again
/// starts over.
pub struct ExtractAll<'k, 'a> {
    key: &'k str,
    stack: Vec<Frame<'a>>,
}

/// Every value found under `key` in `tree`.
///
/// ```
/// use serde_json::json;
/// use tally_youtube::extract::extract_all;
///
/// let tree = json!({"k": 1, "a": {"k": 2}, "b": [{"k": 3}, {"x": 4}]});
/// let found: Vec<_> = extract_all("k", &tree).cloned().collect();
/// assert_eq!(found, vec![json!(1), json!(2), json!(3)]);
/// ```
pub fn extract_all<'k, 'a>(key: &'k str, tree: &'a Value) -> ExtractAll<'k, 'a> {
    let stack = match tree {
        Value::Object(map) => vec![Frame::Object(map.iter())],
        _ => Vec::new(),
    };
    ExtractAll { key, stack }
}

impl<'a> Iterator for ExtractAll<'_, 'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let step = match self.stack.last_mut()? {
                Frame::Object(entries) => entries.next().map(|(k, v)| (Some(k.as_str()), v)),
                Frame::Array(items) => items.next().map(|v| (None, v)),
            };
            let Some((name, value)) = step else {
                self.stack.pop();
                continue;
            };

            match value {
                Value::Object(map) => self.stack.push(Frame::Object(map.iter())),
                Value::Array(items) if name.is_some() => {
                    self.stack.push(Frame::Array(items.iter()))
                }
                _ => {}
            }

            if name == Some(self.key) {
                return Some(value);
            }
        }
    }
}
