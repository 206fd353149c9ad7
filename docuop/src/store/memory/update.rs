use crate::common::{Document, Value, NATIVE_ID, OP_INC, OP_SET, OP_UNSET};
use crate::errors::{ErrorKind, UopError, UopResult};

/// A native update document, checked once before it touches any document.
#[derive(Debug, Clone)]
pub(crate) enum NativeUpdate {
    /// Replaces the whole document, keeping its identifier.
    Replace(Document),
    Operators {
        set: Document,
        unset: Vec<String>,
        inc: Document,
    },
}

impl NativeUpdate {
    /// Parses a native update.
    ///
    /// A document whose keys all start with `$` is an operator update; a
    /// document without any such key is a replacement.
    ///
    /// # Errors
    ///
    /// Returns `UpdateError` for an empty update, a mix of operators and
    /// plain fields, unknown operators and operator values that are not
    /// documents.
    pub(crate) fn parse(update: &Document) -> UopResult<NativeUpdate> {
        if update.is_empty() {
            return Err(update_error("Update document cannot be empty"));
        }

        let operator_count = update.iter().filter(|(k, _)| k.starts_with('$')).count();
        if operator_count == 0 {
            return Ok(NativeUpdate::Replace(update.clone()));
        }
        if operator_count != update.size() {
            return Err(update_error("Update document mixes operators and plain fields"));
        }

        let mut set = Document::new();
        let mut unset = Vec::new();
        let mut inc = Document::new();
        for (op, operand) in update.iter() {
            let fields = match operand.as_document() {
                Some(fields) => fields,
                None => return Err(update_error(&format!("{} needs a document", op))),
            };

            match op.as_str() {
                OP_SET => set.merge(fields),
                OP_UNSET => unset.extend(fields.keys()),
                OP_INC => {
                    if let Some((field, _)) = fields.iter().find(|(_, v)| !v.is_number()) {
                        return Err(update_error(&format!("$inc on {} needs a number", field)));
                    }
                    inc.merge(fields);
                }
                unknown => {
                    return Err(update_error(&format!("Unknown update operator {}", unknown)))
                }
            }
        }
        Ok(NativeUpdate::Operators { set, unset, inc })
    }

    /// Applies the update to a copy of `original`.
    ///
    /// # Errors
    ///
    /// Returns `UpdateError` when the update would change the identifier or
    /// increment a non-numeric field.
    pub(crate) fn apply(&self, original: &Document) -> UopResult<Document> {
        let updated = match self {
            NativeUpdate::Replace(replacement) => {
                let mut updated = replacement.clone();
                if let Some(id) = original.get(NATIVE_ID) {
                    if updated.get(NATIVE_ID).is_none() {
                        updated.put(NATIVE_ID, id.clone())?;
                    }
                }
                updated
            }
            NativeUpdate::Operators { set, unset, inc } => {
                let mut updated = original.clone();
                for (path, value) in set.iter() {
                    updated.put_path(path, value.clone())?;
                }
                for path in unset {
                    updated.remove_path(path);
                }
                for (path, delta) in inc.iter() {
                    let current = updated.get_path(path).cloned();
                    updated.put_path(path, increment(path, current, delta)?)?;
                }
                updated
            }
        };

        if updated.get(NATIVE_ID) != original.get(NATIVE_ID) {
            return Err(update_error("The _id field cannot be modified"));
        }
        Ok(updated)
    }
}

fn increment(path: &str, current: Option<Value>, delta: &Value) -> UopResult<Value> {
    match (current, delta) {
        (None, delta) | (Some(Value::Null), delta) => Ok(delta.clone()),
        (Some(Value::I32(a)), Value::I32(b)) => Ok(match a.checked_add(*b) {
            Some(sum) => Value::I32(sum),
            None => Value::I64(a as i64 + *b as i64),
        }),
        (Some(current), delta) => match (current.as_i64(), delta.as_i64()) {
            (Some(a), Some(b)) => a
                .checked_add(b)
                .map(Value::I64)
                .ok_or_else(|| update_error(&format!("$inc on {} overflows", path))),
            _ => match (current.as_f64(), delta.as_f64()) {
                (Some(a), Some(b)) => Ok(Value::F64(a + b)),
                _ => Err(update_error(&format!("$inc on {} needs a numeric field", path))),
            },
        },
    }
}

fn update_error(message: &str) -> UopError {
    log::error!("Invalid native update: {}", message);
    UopError::new(message, ErrorKind::UpdateError)
}
