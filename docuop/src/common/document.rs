use im::OrdMap;
use smallvec::SmallVec;

use crate::common::{Value, FIELD_SEPARATOR};
use crate::errors::{ErrorKind, UopError, UopResult};
use std::fmt::{Debug, Display};

type FieldVec = SmallVec<[String; 8]>;

/// A schemaless mapping from field name to [Value].
///
/// The same type carries logical documents, stored documents, criteria,
/// native filters and native update documents; only the field names differ
/// (`id` versus `_id`, `gt` versus `$gt`).
///
/// Backed by `im::OrdMap`, so cloning is O(1) and keys iterate in sorted
/// order. Dotted paths (`address.city`) are resolved by [Document::get_path]
/// and [Document::put_path]; [Document::put] and [Document::get] treat keys
/// literally.
#[derive(Clone, Eq, PartialEq, Hash, Default, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Document {
    data: OrdMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: OrdMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of top level entries.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Associates `value` with `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty.
    pub fn put<K: Into<String>, T: Into<Value>>(&mut self, key: K, value: T) -> UopResult<()> {
        let key = key.into();
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(UopError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }
        self.data.insert(key, value.into());
        Ok(())
    }

    /// Returns the value stored under the top level `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Resolves a dotted path through embedded documents and array positions.
    ///
    /// A literal top level key wins over path resolution, so a field that
    /// contains the separator can still be read.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        if let Some(value) = self.data.get(path) {
            return Some(value);
        }
        if !path.contains(FIELD_SEPARATOR) {
            return None;
        }

        let mut segments = path.split(FIELD_SEPARATOR);
        let mut current = self.data.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Document(doc) => doc.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Sets a value at a dotted path, creating embedded documents on the way.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty, has an empty segment, or
    /// traverses a field that already holds a non-document value.
    pub fn put_path<T: Into<Value>>(&mut self, path: &str, value: T) -> UopResult<()> {
        match path.split_once(FIELD_SEPARATOR) {
            None => self.put(path, value),
            Some((head, rest)) => {
                if head.is_empty() || rest.is_empty() {
                    log::error!("Invalid field path {}", path);
                    return Err(UopError::new(
                        &format!("Invalid field path {}", path),
                        ErrorKind::InvalidOperation,
                    ));
                }

                let mut nested = match self.data.get(head) {
                    Some(Value::Document(doc)) => doc.clone(),
                    None | Some(Value::Null) => Document::new(),
                    Some(other) => {
                        log::error!("Cannot create field {} inside non-document value {}", path, other);
                        return Err(UopError::new(
                            &format!("Cannot create field {} inside non-document value", path),
                            ErrorKind::InvalidOperation,
                        ));
                    }
                };
                nested.put_path(rest, value)?;
                self.data.insert(head.to_string(), Value::Document(nested));
                Ok(())
            }
        }
    }

    /// Removes the top level `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    /// Removes the value at a dotted path. Missing paths are ignored.
    pub fn remove_path(&mut self, path: &str) -> Option<Value> {
        if self.data.contains_key(path) {
            return self.data.remove(path);
        }
        let (head, rest) = path.split_once(FIELD_SEPARATOR)?;
        let mut nested = self.data.get(head)?.as_document()?.clone();
        let removed = nested.remove_path(rest);
        if removed.is_some() {
            self.data.insert(head.to_string(), Value::Document(nested));
        }
        removed
    }

    /// Renames `from` to `to`. Returns `false` when `from` is absent.
    ///
    /// An existing value under `to` is overwritten, so at most one of the
    /// two keys is present afterwards.
    pub fn rename_key(&mut self, from: &str, to: &str) -> bool {
        match self.data.remove(from) {
            Some(value) => {
                self.data.insert(to.to_string(), value);
                true
            }
            None => false,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Top level field names in sorted order.
    pub fn keys(&self) -> FieldVec {
        self.data.keys().cloned().collect()
    }

    /// The first entry in key order, if any.
    pub fn first_entry(&self) -> Option<(&String, &Value)> {
        self.data.iter().next()
    }

    /// Iterates the top level entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    /// Copies every entry of `other` into this document, recursing into
    /// embedded documents present on both sides.
    pub fn merge(&mut self, other: &Document) {
        for (key, value) in other.data.iter() {
            match (self.data.get(key), value) {
                (Some(Value::Document(mine)), Value::Document(theirs)) => {
                    let mut merged = mine.clone();
                    merged.merge(theirs);
                    self.data.insert(key.clone(), Value::Document(merged));
                }
                _ => {
                    self.data.insert(key.clone(), value.clone());
                }
            }
        }
    }

    pub(crate) fn to_pretty_json(&self, indent: usize) -> String {
        if self.data.is_empty() {
            return "{}".to_string();
        }

        let indent_str = " ".repeat(indent + 2);
        let mut json_string = String::with_capacity(self.data.len() * 30);
        json_string.push_str("{\n");
        let entries: Vec<String> = self
            .data
            .iter()
            .map(|(key, value)| format!("{}\"{}\": {}", indent_str, key, value.to_pretty_json(indent + 2)))
            .collect();
        json_string.push_str(&entries.join(",\n"));
        json_string.push('\n');
        json_string.push_str(&" ".repeat(indent));
        json_string.push('}');
        json_string
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Document {
            data: iter.into_iter().filter(|(k, _)| !k.is_empty()).collect(),
        }
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = im::ordmap::ConsumingIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_pretty_json(0))
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_pretty_json(0))
    }
}

/// Strips the quotes `stringify!` leaves around quoted macro keys.
#[doc(hidden)]
pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Builds a [Document] from `key: value` pairs.
///
/// Keys may be bare identifiers or string literals (needed for operator keys
/// such as `"$gt"`). Values may be expressions, nested `{ ... }` documents or
/// `[ ... ]` arrays.
///
/// ```rust,ignore
/// let criteria = doc! {
///     "$gt": { age: 3 },
/// };
/// let person = doc! {
///     name: "x",
///     age: 5,
///     tags: ["a", "b"],
/// };
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::common::Document::new()
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_mut)]
            let mut doc = $crate::common::Document::new();
            $(
                doc.put($crate::common::normalize(stringify!($key)), $crate::doc_value!($value))
                    .expect("doc! keys are never empty");
            )*
            doc
        }
    };
}

/// Helper for the [doc!] macro converting nested documents, arrays and expressions.
#[macro_export]
macro_rules! doc_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
