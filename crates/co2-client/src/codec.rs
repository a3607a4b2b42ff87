//! JSON <-> BSON conversion for Data API payloads.
//!
//! The Data API speaks plain JSON with its own `$`-prefixed wrappers
//! (`{"$uuid": ..}`, `{"$date": ..}`, `{"$objectId": ..}`). Those wrappers are
//! kept as ordinary sub-documents so that an `_id` read from one response can
//! be sent back verbatim inside a filter.

use bson::{Bson, Document};
use serde_json::{Map, Number, Value};

pub fn document_from_json(map: Map<String, Value>) -> Document {
    let mut doc = Document::new();
    for (key, value) in map {
        doc.insert(key, bson_from_json(value));
    }
    doc
}

pub fn bson_from_json(value: Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(b),
        Value::Number(n) => number_to_bson(&n),
        Value::String(s) => Bson::String(s),
        Value::Array(items) => Bson::Array(items.into_iter().map(bson_from_json).collect()),
        Value::Object(map) => Bson::Document(document_from_json(map)),
    }
}

fn number_to_bson(n: &Number) -> Bson {
    if let Some(i) = n.as_i64() {
        Bson::Int64(i)
    } else {
        n.as_f64().map(Bson::Double).unwrap_or(Bson::Null)
    }
}

pub fn document_to_json(doc: &Document) -> Map<String, Value> {
    doc.iter()
        .map(|(key, value)| (key.clone(), bson_to_json(value)))
        .collect()
}

pub fn bson_to_json(value: &Bson) -> Value {
    match value {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::Int32(i) => Value::from(*i),
        Bson::Int64(i) => Value::from(*i),
        Bson::Double(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Bson::String(s) => Value::String(s.clone()),
        Bson::Array(items) => Value::Array(items.iter().map(bson_to_json).collect()),
        Bson::Document(doc) => Value::Object(document_to_json(doc)),
        // Native BSON types only show up in documents built in-process.
        other => serde_json::to_value(other).unwrap_or(Value::Null),
    }
}

/// Text shown for a value in labels and table cells.
pub fn display_text(value: &Bson) -> String {
    match value {
        Bson::String(s) => s.clone(),
        Bson::Null | Bson::Undefined => String::new(),
        other => bson_to_json(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use serde_json::json;

    #[test]
    fn wrapper_objects_round_trip_unchanged() {
        let value = json!({
            "_id": { "$uuid": "0191c4a2-0000-7000-8000-000000000001" },
            "criado_em": { "$date": 1717171717000_i64 },
        });
        let Value::Object(map) = value.clone() else {
            panic!("expected object");
        };
        let doc = document_from_json(map);
        assert!(matches!(doc.get("_id"), Some(Bson::Document(_))));
        assert_eq!(Value::Object(document_to_json(&doc)), value);
    }

    #[test]
    fn integers_and_doubles_keep_their_kind() {
        assert_eq!(bson_from_json(json!(42)), Bson::Int64(42));
        assert_eq!(bson_from_json(json!(1.5)), Bson::Double(1.5));
        assert_eq!(bson_to_json(&Bson::Int32(7)), json!(7));
    }

    #[test]
    fn display_text_unquotes_strings_only() {
        assert_eq!(display_text(&Bson::String("Recife".into())), "Recife");
        assert_eq!(display_text(&Bson::Int64(3)), "3");
        assert_eq!(display_text(&Bson::Null), "");
        assert_eq!(
            display_text(&Bson::Document(doc! { "$uuid": "abc" })),
            r#"{"$uuid":"abc"}"#
        );
    }
}
