use crate::common::{
    Document, Value, OP_AND, OP_EQ, OP_EXISTS, OP_GT, OP_GTE, OP_IN, OP_LT, OP_LTE, OP_NE,
    OP_NIN, OP_OR, OP_REGEX,
};
use crate::errors::{ErrorKind, UopError, UopResult};
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;
use std::mem::discriminant;

const OP_OPTIONS: &str = "$options";

/// A native filter document compiled once and evaluated per document.
#[derive(Debug, Clone)]
pub(crate) enum NativeFilter {
    All,
    And(Vec<NativeFilter>),
    Or(Vec<NativeFilter>),
    Field { path: String, conditions: Vec<Condition> },
}

#[derive(Debug, Clone)]
pub(crate) enum Condition {
    Equals(Value),
    NotEquals(Value),
    Compare(Ordering, bool, Value),
    In(Vec<Value>),
    NotIn(Vec<Value>),
    Matches(Regex),
    Exists(bool),
}

impl NativeFilter {
    /// Compiles a native filter.
    ///
    /// # Errors
    ///
    /// Returns `FilterError` for unknown operators, operator values of the
    /// wrong shape and invalid regular expressions.
    pub(crate) fn compile(filter: &Document) -> UopResult<NativeFilter> {
        let mut clauses = Vec::with_capacity(filter.size());
        for (key, value) in filter.iter() {
            clauses.push(Self::compile_clause(key, value)?);
        }
        Ok(match clauses.len() {
            0 => NativeFilter::All,
            1 => clauses.remove(0),
            _ => NativeFilter::And(clauses),
        })
    }

    fn compile_clause(key: &str, value: &Value) -> UopResult<NativeFilter> {
        match key {
            OP_AND => Ok(NativeFilter::And(Self::compile_list(key, value)?)),
            OP_OR => Ok(NativeFilter::Or(Self::compile_list(key, value)?)),
            op if op.starts_with('$') => Err(filter_error(&format!(
                "Unknown top level operator {}",
                op
            ))),
            field => Ok(NativeFilter::Field {
                path: field.to_string(),
                conditions: Self::compile_conditions(field, value)?,
            }),
        }
    }

    fn compile_list(op: &str, value: &Value) -> UopResult<Vec<NativeFilter>> {
        let items = match value.as_array() {
            Some(items) if !items.is_empty() => items,
            _ => return Err(filter_error(&format!("{} needs a non-empty array", op))),
        };

        items
            .iter()
            .map(|item| match item.as_document() {
                Some(doc) => Self::compile(doc),
                None => Err(filter_error(&format!("{} entries must be documents", op))),
            })
            .collect()
    }

    fn compile_conditions(field: &str, value: &Value) -> UopResult<Vec<Condition>> {
        let expr = match value {
            Value::Document(expr) if is_operator_document(expr) => expr,
            _ => return Ok(vec![Condition::Equals(value.clone())]),
        };

        if expr.iter().any(|(key, _)| !key.starts_with('$')) {
            return Err(filter_error(&format!(
                "Field {} mixes operators and plain fields",
                field
            )));
        }

        let mut conditions = Vec::with_capacity(expr.size());
        for (op, operand) in expr.iter() {
            let condition = match op.as_str() {
                OP_EQ => Condition::Equals(operand.clone()),
                OP_NE => Condition::NotEquals(operand.clone()),
                OP_GT => Condition::Compare(Ordering::Greater, false, operand.clone()),
                OP_GTE => Condition::Compare(Ordering::Greater, true, operand.clone()),
                OP_LT => Condition::Compare(Ordering::Less, false, operand.clone()),
                OP_LTE => Condition::Compare(Ordering::Less, true, operand.clone()),
                OP_IN => Condition::In(array_operand(op, operand)?),
                OP_NIN => Condition::NotIn(array_operand(op, operand)?),
                OP_EXISTS => Condition::Exists(operand.as_bool().unwrap_or(!operand.is_null())),
                OP_REGEX => Condition::Matches(compile_regex(operand, expr.get(OP_OPTIONS))?),
                OP_OPTIONS if expr.contains_key(OP_REGEX) => continue,
                unknown => {
                    return Err(filter_error(&format!("Unknown operator {}", unknown)));
                }
            };
            conditions.push(condition);
        }
        Ok(conditions)
    }

    pub(crate) fn matches(&self, doc: &Document) -> bool {
        match self {
            NativeFilter::All => true,
            NativeFilter::And(filters) => filters.iter().all(|f| f.matches(doc)),
            NativeFilter::Or(filters) => filters.iter().any(|f| f.matches(doc)),
            NativeFilter::Field { path, conditions } => {
                let value = doc.get_path(path);
                conditions.iter().all(|c| c.test(value))
            }
        }
    }
}

impl Condition {
    fn test(&self, value: Option<&Value>) -> bool {
        match self {
            Condition::Equals(expected) => equals(value, expected),
            Condition::NotEquals(expected) => !equals(value, expected),
            Condition::Compare(direction, inclusive, bound) => {
                any_element(value, |v| compare(v, bound, *direction, *inclusive))
            }
            Condition::In(candidates) => candidates.iter().any(|c| equals(value, c)),
            Condition::NotIn(candidates) => !candidates.iter().any(|c| equals(value, c)),
            Condition::Matches(regex) => {
                any_element(value, |v| v.as_str().is_some_and(|s| regex.is_match(s)))
            }
            Condition::Exists(expected) => value.is_some() == *expected,
        }
    }
}

/// A field matches a value when it equals it, or when it is an array
/// holding it. A missing field equals null.
fn equals(value: Option<&Value>, expected: &Value) -> bool {
    match value {
        None => expected.is_null(),
        Some(actual) if actual == expected => true,
        Some(Value::Array(items)) => items.iter().any(|item| item == expected),
        Some(_) => false,
    }
}

fn any_element<F: Fn(&Value) -> bool>(value: Option<&Value>, test: F) -> bool {
    match value {
        None => false,
        Some(array @ Value::Array(items)) => test(array) || items.iter().any(&test),
        Some(v) => test(v),
    }
}

/// Ranges only compare values of the same kind; all numbers are one kind.
fn compare(value: &Value, bound: &Value, direction: Ordering, inclusive: bool) -> bool {
    let comparable =
        (value.is_number() && bound.is_number()) || discriminant(value) == discriminant(bound);
    if !comparable {
        return false;
    }

    let ordering = value.cmp(bound);
    ordering == direction || (inclusive && ordering == Ordering::Equal)
}

fn is_operator_document(expr: &Document) -> bool {
    expr.iter().any(|(key, _)| key.starts_with('$'))
}

fn array_operand(op: &str, operand: &Value) -> UopResult<Vec<Value>> {
    match operand.as_array() {
        Some(values) => Ok(values.clone()),
        None => Err(filter_error(&format!("{} needs an array", op))),
    }
}

fn compile_regex(pattern: &Value, options: Option<&Value>) -> UopResult<Regex> {
    let pattern = match pattern.as_str() {
        Some(pattern) => pattern,
        None => return Err(filter_error("$regex needs a string pattern")),
    };
    let flags = options.and_then(|o| o.as_str()).unwrap_or("");

    let regex = RegexBuilder::new(pattern)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .build()?;
    Ok(regex)
}

fn filter_error(message: &str) -> UopError {
    log::error!("Invalid native filter: {}", message);
    UopError::new(message, ErrorKind::FilterError)
}
