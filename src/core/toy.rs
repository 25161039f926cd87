//! Toy records and their JSON wire form
//!
//! A toy is stored as an opaque BSON [`Document`]: the gateway never validates
//! or reshapes the caller's fields. The well-known field names are collected in
//! [`fields`] so that filters, sorts and updates agree on spelling.
//!
//! # Wire format
//!
//! Documents travel as JSON. Conversion follows what a browser client of the
//! service expects:
//! - `ObjectId` values render as their 24-character hex string
//! - datetimes render as RFC 3339 strings
//! - everything else renders as relaxed Extended JSON (plain numbers, strings)

use crate::core::error::RequestError;
use mongodb::bson::{Bson, Document};
use serde_json::Value;

/// A toy record as persisted in the collection.
pub type Toy = Document;

/// Field names used by the gateway's queries.
pub mod fields {
    pub const ID: &str = "_id";
    pub const TOY_NAME: &str = "toyName";
    pub const CATEGORY: &str = "category";
    pub const SELLER_EMAIL: &str = "sellerEmail";
    pub const PRICE: &str = "price";
    pub const AVAILABLE_QUANTITY: &str = "availableQuantity";
    pub const DETAILS: &str = "details";
}

/// Convert a request body into a BSON document.
///
/// Only JSON objects are accepted; the content is otherwise stored as-is.
pub fn json_to_document(json: Value) -> Result<Document, RequestError> {
    match json_to_bson(json) {
        Bson::Document(doc) => Ok(doc),
        _ => Err(RequestError::InvalidBody {
            message: "expected a JSON object".to_string(),
        }),
    }
}

/// Convert any JSON value into BSON.
///
/// Integers become `Int64`. Integers beyond the `i64` range are stored as
/// doubles instead of being rejected.
pub fn json_to_bson(json: Value) -> Bson {
    match json {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Bson::Int64(i),
            None => n.as_f64().map_or(Bson::Null, Bson::Double),
        },
        Value::String(s) => Bson::String(s),
        Value::Array(items) => Bson::Array(items.into_iter().map(json_to_bson).collect()),
        Value::Object(map) => Bson::Document(
            map.into_iter()
                .map(|(key, value)| (key, json_to_bson(value)))
                .collect(),
        ),
    }
}

/// Convert a stored document into its JSON wire form.
pub fn document_to_json(doc: Document) -> Value {
    bson_to_json(Bson::Document(doc))
}

/// Convert any BSON value into its JSON wire form.
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => Value::String(s),
            Err(_) => Bson::DateTime(dt).into_relaxed_extjson(),
        },
        Bson::Document(doc) => Value::Object(
            doc.into_iter()
                .map(|(key, value)| (key, bson_to_json(value)))
                .collect(),
        ),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;
    use mongodb::bson::oid::ObjectId;
    use serde_json::json;

    #[test]
    fn test_object_id_renders_as_hex() {
        let oid = ObjectId::new();
        let value = document_to_json(doc! { "_id": oid, "toyName": "Racecar" });
        assert_eq!(value["_id"], json!(oid.to_hex()));
        assert_eq!(value["toyName"], "Racecar");
    }

    #[test]
    fn test_numbers_render_plain() {
        let value = document_to_json(doc! {
            "price": 12.5,
            "availableQuantity": 3_i32,
            "sold": 7_i64,
            "tags": ["a", { "nested": ObjectId::parse_str("64b7f0c2a1b2c3d4e5f60718").unwrap() }],
        });
        assert_eq!(value["price"], json!(12.5));
        assert_eq!(value["availableQuantity"], json!(3));
        assert_eq!(value["sold"], json!(7));
        assert_eq!(value["tags"][1]["nested"], "64b7f0c2a1b2c3d4e5f60718");
    }

    #[test]
    fn test_body_must_be_object() {
        assert!(json_to_document(json!([1, 2, 3])).is_err());
        assert!(json_to_document(json!("toy")).is_err());

        let doc = json_to_document(json!({ "toyName": "Robot", "price": "10" })).unwrap();
        assert_eq!(doc.get_str("toyName").unwrap(), "Robot");
        assert_eq!(doc.get_str("price").unwrap(), "10");
    }

    #[test]
    fn test_body_keeps_every_value() {
        let doc = json_to_document(json!({
            "price": 18446744073709551615_u64,
            "availableQuantity": 3,
            "rating": 4.5,
            "details": null,
            "tags": ["new", { "onSale": true }],
        }))
        .unwrap();

        assert_eq!(doc.get("price"), Some(&Bson::Double(u64::MAX as f64)));
        assert_eq!(doc.get("availableQuantity"), Some(&Bson::Int64(3)));
        assert_eq!(doc.get("rating"), Some(&Bson::Double(4.5)));
        assert_eq!(doc.get("details"), Some(&Bson::Null));
        assert_eq!(
            doc.get_array("tags").unwrap()[1],
            Bson::Document(doc! { "onSale": true })
        );
    }
}
