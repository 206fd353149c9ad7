use crate::common::{Document, Value, LOGICAL_ID, NATIVE_ID, OP_AND, OP_IN};
use crate::criteria::Criteria;

/// Anything that can carry documents back from the store.
///
/// Implemented for single documents, optional documents and document lists.
/// Plain value lists (the result of `distinct`) pass through unchanged.
pub trait StorageShape: Sized {
    fn denormalize_ids(self, translator: &CriteriaTranslator) -> Self;
}

impl StorageShape for Document {
    fn denormalize_ids(self, translator: &CriteriaTranslator) -> Self {
        translator.denormalize_document(self)
    }
}

impl StorageShape for Option<Document> {
    fn denormalize_ids(self, translator: &CriteriaTranslator) -> Self {
        self.map(|doc| translator.denormalize_document(doc))
    }
}

impl StorageShape for Vec<Document> {
    fn denormalize_ids(self, translator: &CriteriaTranslator) -> Self {
        self.into_iter()
            .map(|doc| translator.denormalize_document(doc))
            .collect()
    }
}

impl StorageShape for Vec<Value> {
    fn denormalize_ids(self, _translator: &CriteriaTranslator) -> Self {
        self
    }
}

/// Rewrites logical criteria and documents into the store's native shape.
///
/// The translator is stateless apart from the two identifier field names. It
/// never fails: input it does not recognise is handed to the store verbatim
/// and any error surfaces there.
#[derive(Debug, Clone)]
pub struct CriteriaTranslator {
    logical_id: String,
    native_id: String,
}

impl CriteriaTranslator {
    pub fn new() -> CriteriaTranslator {
        CriteriaTranslator::with_id_fields(LOGICAL_ID, NATIVE_ID)
    }

    pub fn with_id_fields(logical_id: &str, native_id: &str) -> CriteriaTranslator {
        CriteriaTranslator {
            logical_id: logical_id.to_string(),
            native_id: native_id.to_string(),
        }
    }

    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    pub fn native_id(&self) -> &str {
        &self.native_id
    }

    /// Maps a logical field name to the name used in storage.
    pub fn native_field(&self, field: &str) -> String {
        if field == self.logical_id {
            self.native_id.clone()
        } else {
            field.to_string()
        }
    }

    /// Renames a top level logical identifier to the native one.
    ///
    /// Documents without the logical identifier are returned unchanged.
    pub fn normalize_id_for_storage(&self, mut doc: Document) -> Document {
        doc.rename_key(&self.logical_id, &self.native_id);
        doc
    }

    /// Renames the native identifier back to the logical one.
    pub fn denormalize_id_from_storage<T: StorageShape>(&self, data: T) -> T {
        data.denormalize_ids(self)
    }

    fn denormalize_document(&self, mut doc: Document) -> Document {
        doc.rename_key(&self.native_id, &self.logical_id);
        doc
    }

    /// Parses a mapping-shaped criteria and translates it to a native filter.
    ///
    /// Translating an already translated filter yields the same filter.
    pub fn translate_criteria(&self, criteria: &Document) -> Document {
        self.to_native(&Criteria::from(criteria.clone()))
    }

    /// Translates a [Criteria] into the native filter document.
    pub fn to_native(&self, criteria: &Criteria) -> Document {
        match criteria {
            Criteria::Equality { field, value } => {
                single(self.native_field(field), value.clone())
            }
            Criteria::Comparison { op, field, value } => single(
                self.native_field(field),
                single(op.native_token().to_string(), value.clone()),
            ),
            Criteria::Containment { field, values } => single(
                self.native_field(field),
                single(OP_IN.to_string(), Value::Array(values.clone())),
            ),
            Criteria::Compound(items) => match items.as_slice() {
                [] => Document::new(),
                [only] => self.to_native(only),
                many => {
                    let clauses: Vec<Value> = many
                        .iter()
                        .filter(|c| !c.is_all())
                        .map(|c| Value::Document(self.to_native(c)))
                        .collect();
                    match clauses.len() {
                        0 => Document::new(),
                        _ => single(OP_AND.to_string(), Value::Array(clauses)),
                    }
                }
            },
            Criteria::Native(doc) => self.normalize_id_for_storage(doc.clone()),
        }
    }
}

impl Default for CriteriaTranslator {
    fn default() -> Self {
        CriteriaTranslator::new()
    }
}

fn single<V: Into<Value>>(key: String, value: V) -> Document {
    std::iter::once((key, value.into())).collect()
}
