use crate::common::{Document, SortOrder, Value};

/// Options of [TenantScopedCollection::find](crate::collection::TenantScopedCollection::find).
///
/// - `projection`: fields to return. With exactly one field, `find` returns
///   the raw values of that field instead of documents.
/// - `order_by`: sort fields; a leading `-` sorts that field descending.
/// - `limit`: maximum number of results. A limit of one ignores ordering.
/// - `ids_only`: return only native identifiers, unordered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub(crate) projection: Option<Vec<String>>,
    pub(crate) order_by: Vec<String>,
    pub(crate) limit: Option<usize>,
    pub(crate) ids_only: bool,
}

/// Find options sorting by the given fields.
pub fn order_by(fields: &[&str]) -> FindOptions {
    FindOptions::new().order_by(fields)
}

/// Find options returning at most `limit` results.
pub fn limit_to(limit: usize) -> FindOptions {
    FindOptions::new().limit(limit)
}

/// Find options returning only the listed fields.
pub fn only_cols(fields: &[&str]) -> FindOptions {
    FindOptions::new().only_cols(fields)
}

/// Find options returning only identifiers.
pub fn ids_only() -> FindOptions {
    FindOptions::new().ids_only()
}

impl FindOptions {
    pub fn new() -> FindOptions {
        FindOptions::default()
    }

    pub fn only_cols(mut self, fields: &[&str]) -> FindOptions {
        self.projection = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn order_by(mut self, fields: &[&str]) -> FindOptions {
        self.order_by.extend(fields.iter().map(|f| f.to_string()));
        self
    }

    pub fn limit(mut self, limit: usize) -> FindOptions {
        self.limit = Some(limit);
        self
    }

    pub fn ids_only(mut self) -> FindOptions {
        self.ids_only = true;
        self
    }

    /// Parses `order_by` into sort keys.
    pub(crate) fn sort_keys(&self) -> Vec<(String, SortOrder)> {
        self.order_by
            .iter()
            .filter(|field| !field.is_empty() && field.as_str() != "-")
            .map(|field| match field.strip_prefix('-') {
                Some(name) => (name.to_string(), SortOrder::Descending),
                None => (field.clone(), SortOrder::Ascending),
            })
            .collect()
    }
}

/// The result of a find.
#[derive(Debug, Clone, PartialEq)]
pub enum FindResult {
    /// Whole or projected documents with the logical identifier.
    Documents(Vec<Document>),
    /// The values of the single projected field, one per match.
    Values(Vec<Value>),
}

impl FindResult {
    pub fn len(&self) -> usize {
        match self {
            FindResult::Documents(docs) => docs.len(),
            FindResult::Values(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn documents(&self) -> Option<&[Document]> {
        match self {
            FindResult::Documents(docs) => Some(docs),
            FindResult::Values(_) => None,
        }
    }

    pub fn values(&self) -> Option<&[Value]> {
        match self {
            FindResult::Values(values) => Some(values),
            FindResult::Documents(_) => None,
        }
    }

    /// The documents of this result; a value result yields no documents.
    pub fn into_documents(self) -> Vec<Document> {
        match self {
            FindResult::Documents(docs) => docs,
            FindResult::Values(_) => Vec::new(),
        }
    }

    /// The values of this result; a document result yields no values.
    pub fn into_values(self) -> Vec<Value> {
        match self {
            FindResult::Values(values) => values,
            FindResult::Documents(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    #[test]
    fn sort_keys_parse_direction() {
        let options = order_by(&["name", "-age", "", "-"]);
        assert_eq!(
            options.sort_keys(),
            vec![
                ("name".to_string(), SortOrder::Ascending),
                ("age".to_string(), SortOrder::Descending),
            ]
        );
    }

    #[test]
    fn builders() {
        let options = only_cols(&["a", "b"]).limit(3).order_by(&["a"]);
        assert_eq!(options.projection, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(options.limit, Some(3));
        assert_eq!(options.order_by, vec!["a".to_string()]);
        assert!(!options.ids_only);

        assert!(ids_only().ids_only);
        assert_eq!(limit_to(1).limit, Some(1));
        assert_eq!(FindOptions::default(), FindOptions::new());
    }

    #[test]
    fn find_result_accessors() {
        let docs = FindResult::Documents(vec![doc! { id: 1 }]);
        assert_eq!(docs.len(), 1);
        assert!(docs.values().is_none());
        assert_eq!(docs.documents().map(|d| d.len()), Some(1));
        assert!(docs.clone().into_values().is_empty());
        assert_eq!(docs.into_documents(), vec![doc! { id: 1 }]);

        let values = FindResult::Values(vec![Value::I32(1), Value::I32(2)]);
        assert_eq!(values.values().map(|v| v.len()), Some(2));
        assert!(values.clone().into_documents().is_empty());
        assert!(!values.is_empty());
        assert!(FindResult::Values(vec![]).is_empty());
    }
}
