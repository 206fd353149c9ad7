use crate::common::{
    Document, Value, LOGICAL_ID, NATIVE_ID, OP_EQ, OP_GT, OP_GTE, OP_IN, OP_LT, OP_LTE, OP_NE,
    OP_REGEX,
};
use std::fmt::{Display, Formatter};

/// Comparison operators understood by the criteria language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
    Neq,
}

impl ComparisonOp {
    /// Parses an operator token.
    ///
    /// Both the bare (`gt`) and the `$`-prefixed (`$gt`) spellings are
    /// accepted; `neq` additionally accepts the native `$ne`.
    pub fn from_token(token: &str) -> Option<ComparisonOp> {
        match token.strip_prefix('$').unwrap_or(token) {
            "gt" => Some(ComparisonOp::Gt),
            "gte" => Some(ComparisonOp::Gte),
            "lt" => Some(ComparisonOp::Lt),
            "lte" => Some(ComparisonOp::Lte),
            "eq" => Some(ComparisonOp::Eq),
            "neq" | "ne" => Some(ComparisonOp::Neq),
            _ => None,
        }
    }

    /// The operator key of the native filter.
    pub fn native_token(&self) -> &'static str {
        match self {
            ComparisonOp::Gt => OP_GT,
            ComparisonOp::Gte => OP_GTE,
            ComparisonOp::Lt => OP_LT,
            ComparisonOp::Lte => OP_LTE,
            ComparisonOp::Eq => OP_EQ,
            ComparisonOp::Neq => OP_NE,
        }
    }
}

impl Display for ComparisonOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.native_token())
    }
}

/// The logical query filter accepted by a tenant scoped collection.
///
/// Criteria are built either with the constructors below or by converting a
/// mapping-shaped [Document] (`Criteria::from(doc)`), which recognises:
///
/// - `{}` as match-all,
/// - `{op: {field: value}}` with a single supported operator key as a comparison,
/// - `{field: {in: [values]}}` as containment,
/// - `{field: scalar}` as equality.
///
/// Anything else, including every multi-key mapping and every malformed
/// operator value, becomes [Criteria::Native] and reaches the store verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Criteria {
    Equality { field: String, value: Value },
    Comparison { op: ComparisonOp, field: String, value: Value },
    Containment { field: String, values: Vec<Value> },
    /// Conjunction; an empty compound matches every document.
    Compound(Vec<Criteria>),
    /// Already in native shape.
    Native(Document),
}

impl Criteria {
    /// Matches every document.
    pub fn all() -> Criteria {
        Criteria::Compound(Vec::new())
    }

    pub fn eq<T: Into<Value>>(field: &str, value: T) -> Criteria {
        Criteria::Equality {
            field: field.to_string(),
            value: value.into(),
        }
    }

    /// Matches the document whose logical identifier is `id`.
    pub fn by_id<T: Into<Value>>(id: T) -> Criteria {
        Criteria::eq(LOGICAL_ID, id)
    }

    pub fn compare<T: Into<Value>>(op: ComparisonOp, field: &str, value: T) -> Criteria {
        Criteria::Comparison {
            op,
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn gt<T: Into<Value>>(field: &str, value: T) -> Criteria {
        Criteria::compare(ComparisonOp::Gt, field, value)
    }

    pub fn gte<T: Into<Value>>(field: &str, value: T) -> Criteria {
        Criteria::compare(ComparisonOp::Gte, field, value)
    }

    pub fn lt<T: Into<Value>>(field: &str, value: T) -> Criteria {
        Criteria::compare(ComparisonOp::Lt, field, value)
    }

    pub fn lte<T: Into<Value>>(field: &str, value: T) -> Criteria {
        Criteria::compare(ComparisonOp::Lte, field, value)
    }

    pub fn neq<T: Into<Value>>(field: &str, value: T) -> Criteria {
        Criteria::compare(ComparisonOp::Neq, field, value)
    }

    pub fn is_in<T: Into<Value>>(field: &str, values: Vec<T>) -> Criteria {
        Criteria::Containment {
            field: field.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn and(criteria: Vec<Criteria>) -> Criteria {
        Criteria::Compound(criteria)
    }

    pub fn native(filter: Document) -> Criteria {
        Criteria::Native(filter)
    }

    /// Matches documents whose `column` value ends with `_<uuid>`.
    pub fn column_class_check(column: &str, uuid: &str) -> Criteria {
        let pattern = Value::from(format!("_{}$", regex::escape(uuid)));
        let expr: Document = std::iter::once((OP_REGEX.to_string(), pattern)).collect();
        Criteria::Native(std::iter::once((column.to_string(), Value::from(expr))).collect())
    }

    /// Whether the criteria selects every document.
    pub fn is_all(&self) -> bool {
        match self {
            Criteria::Compound(items) => items.iter().all(Criteria::is_all),
            Criteria::Native(doc) => doc.is_empty(),
            _ => false,
        }
    }

    /// The identifier an id-only equality targets, if that is all this criteria does.
    pub(crate) fn targeted_id(&self) -> Option<&Value> {
        match self {
            Criteria::Equality { field, value } if field == LOGICAL_ID || field == NATIVE_ID => {
                Some(value)
            }
            Criteria::Compound(items) if items.len() == 1 => items[0].targeted_id(),
            _ => None,
        }
    }

    fn parse(doc: Document) -> Criteria {
        if doc.is_empty() {
            return Criteria::all();
        }
        if doc.size() > 1 {
            return Criteria::Native(doc);
        }

        let parsed = match doc.first_entry() {
            Some((key, value)) => match ComparisonOp::from_token(key) {
                Some(op) => Self::parse_operator_first(op, value),
                None => Self::parse_field_first(key, value),
            },
            None => None,
        };
        parsed.unwrap_or(Criteria::Native(doc))
    }

    fn parse_operator_first(op: ComparisonOp, value: &Value) -> Option<Criteria> {
        let operand = value.as_document().filter(|d| d.size() == 1)?;
        let (field, value) = operand.first_entry()?;
        Some(Criteria::compare(op, field, value.clone()))
    }

    fn parse_field_first(field: &str, value: &Value) -> Option<Criteria> {
        match value {
            Value::Document(expr) => {
                if expr.size() != 1 {
                    return None;
                }
                let (op, operand) = expr.first_entry()?;
                match (op.as_str(), operand) {
                    ("in" | OP_IN, Value::Array(values)) => {
                        Some(Criteria::Containment {
                            field: field.to_string(),
                            values: values.clone(),
                        })
                    }
                    _ => None,
                }
            }
            scalar => Some(Criteria::eq(field, scalar.clone())),
        }
    }
}

impl Default for Criteria {
    fn default() -> Self {
        Criteria::all()
    }
}

impl From<Document> for Criteria {
    fn from(doc: Document) -> Self {
        Criteria::parse(doc)
    }
}

impl From<Option<Document>> for Criteria {
    fn from(doc: Option<Document>) -> Self {
        doc.map(Criteria::parse).unwrap_or_default()
    }
}

impl From<Option<Criteria>> for Criteria {
    fn from(criteria: Option<Criteria>) -> Self {
        criteria.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    #[test]
    fn operator_tokens() {
        assert_eq!(ComparisonOp::from_token("gt"), Some(ComparisonOp::Gt));
        assert_eq!(ComparisonOp::from_token("$gte"), Some(ComparisonOp::Gte));
        assert_eq!(ComparisonOp::from_token("$neq"), Some(ComparisonOp::Neq));
        assert_eq!(ComparisonOp::from_token("$ne"), Some(ComparisonOp::Neq));
        assert_eq!(ComparisonOp::from_token("age"), None);
        assert_eq!(ComparisonOp::Neq.native_token(), "$ne");
        assert_eq!(ComparisonOp::Lte.to_string(), "$lte");
    }

    #[test]
    fn empty_mapping_is_all() {
        let criteria = Criteria::from(doc! {});
        assert!(criteria.is_all());
        assert!(Criteria::from(None::<Document>).is_all());
    }

    #[test]
    fn operator_first_mapping_parses_to_comparison() {
        let criteria = Criteria::from(doc! { "$gt": { age: 3 } });
        assert_eq!(criteria, Criteria::gt("age", 3));

        let criteria = Criteria::from(doc! { lte: { age: 3 } });
        assert_eq!(criteria, Criteria::lte("age", 3));
    }

    #[test]
    fn malformed_operator_value_is_native() {
        let raw = doc! { "$gt": 5 };
        assert_eq!(Criteria::from(raw.clone()), Criteria::Native(raw));

        let raw = doc! { "$gt": { age: 3, size: 4 } };
        assert_eq!(Criteria::from(raw.clone()), Criteria::Native(raw));
    }

    #[test]
    fn field_first_mappings() {
        assert_eq!(Criteria::from(doc! { name: "x" }), Criteria::eq("name", "x"));
        assert_eq!(
            Criteria::from(doc! { age: { "$in": [1, 2] } }),
            Criteria::is_in("age", vec![1, 2])
        );
        assert_eq!(
            Criteria::from(doc! { age: { in: [1, 2] } }),
            Criteria::is_in("age", vec![1, 2])
        );

        let native = doc! { age: { "$gt": 3 } };
        assert_eq!(Criteria::from(native.clone()), Criteria::Native(native));
    }

    #[test]
    fn multi_key_mapping_passes_through() {
        let raw = doc! { "$gt": { age: 3 }, name: "x" };
        assert_eq!(Criteria::from(raw.clone()), Criteria::Native(raw));
    }

    #[test]
    fn targeted_id() {
        assert_eq!(Criteria::by_id(5).targeted_id(), Some(&Value::I32(5)));
        assert_eq!(Criteria::and(vec![Criteria::by_id(5)]).targeted_id(), Some(&Value::I32(5)));
        assert_eq!(Criteria::eq("name", "x").targeted_id(), None);
        assert_eq!(Criteria::all().targeted_id(), None);
    }

    #[test]
    fn column_class_check_builds_regex() {
        let criteria = Criteria::column_class_check("kind", "a.b");
        match criteria {
            Criteria::Native(doc) => {
                let expr = doc.get("kind").and_then(|v| v.as_document()).unwrap();
                assert_eq!(expr.get("$regex"), Some(&Value::from("_a\\.b$")));
            }
            other => panic!("unexpected criteria {:?}", other),
        }
    }

    #[test]
    fn nested_all_is_all() {
        let criteria = Criteria::and(vec![Criteria::all(), Criteria::native(Document::new())]);
        assert!(criteria.is_all());
        assert!(!Criteria::eq("a", 1).is_all());
    }
}
