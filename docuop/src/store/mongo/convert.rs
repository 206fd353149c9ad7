use crate::common::{Document, ObjectId, SortOrder, Value};
use mongodb::bson::{self, oid, Bson};

/// Stores an [ObjectId] as a 12 byte server object id: four zero bytes
/// followed by the big-endian id value.
pub(crate) fn object_id_to_oid(id: &ObjectId) -> oid::ObjectId {
    let mut bytes = [0u8; 12];
    bytes[4..].copy_from_slice(&id.id_value().to_be_bytes());
    oid::ObjectId::from_bytes(bytes)
}

/// The [ObjectId] behind a server object id, if it was written by this
/// driver. Ids generated elsewhere come back as their 24 digit hex string.
pub(crate) fn oid_to_value(oid: &oid::ObjectId) -> Value {
    let bytes = oid.bytes();
    if bytes[..4] == [0u8; 4] {
        let mut value = [0u8; 8];
        value.copy_from_slice(&bytes[4..]);
        Value::ObjectId(ObjectId::from_id_value(u64::from_be_bytes(value)))
    } else {
        Value::String(oid.to_hex())
    }
}

pub(crate) fn to_bson(value: &Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(v) => Bson::Boolean(*v),
        Value::I32(v) => Bson::Int32(*v),
        Value::I64(v) => Bson::Int64(*v),
        Value::F64(v) => Bson::Double(*v),
        Value::String(v) => Bson::String(v.clone()),
        Value::ObjectId(id) => Bson::ObjectId(object_id_to_oid(id)),
        Value::Document(doc) => Bson::Document(to_bson_document(doc)),
        Value::Array(values) => Bson::Array(values.iter().map(to_bson).collect()),
    }
}

pub(crate) fn from_bson(value: Bson) -> Value {
    match value {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(v) => Value::Bool(v),
        Bson::Int32(v) => Value::I32(v),
        Bson::Int64(v) => Value::I64(v),
        Bson::Double(v) => Value::F64(v),
        Bson::String(v) | Bson::Symbol(v) | Bson::JavaScriptCode(v) => Value::String(v),
        Bson::ObjectId(oid) => oid_to_value(&oid),
        Bson::DateTime(dt) => Value::I64(dt.timestamp_millis()),
        Bson::Document(doc) => Value::Document(from_bson_document(doc)),
        Bson::Array(values) => Value::Array(values.into_iter().map(from_bson).collect()),
        Bson::RegularExpression(regex) => Value::String(regex.pattern),
        other => Value::String(other.to_string()),
    }
}

pub(crate) fn to_bson_document(doc: &Document) -> bson::Document {
    let mut native = bson::Document::new();
    for (key, value) in doc.iter() {
        native.insert(key.clone(), to_bson(value));
    }
    native
}

pub(crate) fn from_bson_document(doc: bson::Document) -> Document {
    doc.into_iter()
        .map(|(key, value)| (key, from_bson(value)))
        .collect()
}

/// Ordered key document for sorts and index specifications.
pub(crate) fn keys_document(keys: &[(String, SortOrder)]) -> bson::Document {
    let mut native = bson::Document::new();
    for (field, order) in keys {
        native.insert(field.clone(), Bson::Int32(order.direction()));
    }
    native
}

/// Reads an index key specification back. Non numeric directions, such as
/// `"text"`, count as ascending.
pub(crate) fn keys_from_document(keys: &bson::Document) -> Vec<(String, SortOrder)> {
    keys.iter()
        .map(|(field, direction)| {
            let descending = match direction {
                Bson::Int32(v) => *v < 0,
                Bson::Int64(v) => *v < 0,
                Bson::Double(v) => *v < 0.0,
                _ => false,
            };
            (field.clone(), SortOrder::from_ascending(!descending))
        })
        .collect()
}
