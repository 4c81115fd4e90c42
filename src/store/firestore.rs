//! Firestore REST adapter
//!
//! Talks to the Firestore v1 REST API. Documents are translated between
//! plain JSON objects and Firestore's typed value encoding at this
//! boundary, so the rest of the crate never sees `stringValue` wrappers.

use reqwest::StatusCode;
use serde_json::{json, Map, Value};

use super::{Document, DocumentStore, Filter, OrderBy, StoreError};
use crate::config::FirestoreConfig;

const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Firestore-backed document store
pub struct FirestoreStore {
    client: reqwest::Client,
    base_url: String,
    root: String,
}

impl FirestoreStore {
    pub fn new(config: &FirestoreConfig) -> Self {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let root = format!(
            "projects/{}/databases/{}/documents",
            config.project_id, config.database
        );
        Self {
            client: reqwest::Client::new(),
            base_url,
            root,
        }
    }

    fn doc_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}/{}", self.base_url, self.root, collection, id)
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.root, collection)
    }

    fn query_url(&self) -> String {
        format!("{}/{}:runQuery", self.base_url, self.root)
    }
}

#[async_trait::async_trait]
impl DocumentStore for FirestoreStore {
    async fn query(
        &self,
        collection: &str,
        filter: Option<Filter>,
        order: Option<OrderBy>,
    ) -> Result<Vec<Document>, StoreError> {
        let mut structured = json!({
            "from": [{ "collectionId": collection }]
        });

        if let Some(filter) = filter {
            structured["where"] = json!({
                "fieldFilter": {
                    "field": { "fieldPath": filter.field },
                    "op": "EQUAL",
                    "value": to_firestore_value(&filter.value),
                }
            });
        }

        if let Some(order) = order {
            structured["orderBy"] = json!([{
                "field": { "fieldPath": order.field },
                "direction": if order.descending { "DESCENDING" } else { "ASCENDING" },
            }]);
        }

        let response = self
            .client
            .post(self.query_url())
            .json(&json!({ "structuredQuery": structured }))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let response = check_status(response)?;
        let results: Vec<Value> = response
            .json()
            .await
            .map_err(|e| StoreError::Invalid(e.to_string()))?;

        // runQuery streams one entry per result; entries without a
        // `document` key carry only read metadata.
        let mut docs = Vec::new();
        for entry in results {
            if let Some(doc) = entry.get("document") {
                docs.push(parse_document(doc)?);
            }
        }
        Ok(docs)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let response = self
            .client
            .get(self.doc_url(collection, id))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response)?;
        let doc: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Invalid(e.to_string()))?;
        Ok(Some(parse_document(&doc)?))
    }

    async fn set(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError> {
        let response = self
            .client
            .patch(self.doc_url(collection, id))
            .json(&json!({ "fields": to_firestore_fields(&fields)? }))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        check_status(response)?;
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError> {
        let field_paths: Vec<(String, String)> = fields
            .as_object()
            .map(|obj| {
                obj.keys()
                    .map(|k| ("updateMask.fieldPaths".to_string(), k.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let response = self
            .client
            .patch(self.doc_url(collection, id))
            .query(&field_paths)
            .query(&[("currentDocument.exists", "true")])
            .json(&json!({ "fields": to_firestore_fields(&fields)? }))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(format!("{collection}/{id}")));
        }
        check_status(response)?;
        Ok(())
    }

    async fn add(&self, collection: &str, fields: Value) -> Result<String, StoreError> {
        let response = self
            .client
            .post(self.collection_url(collection))
            .json(&json!({ "fields": to_firestore_fields(&fields)? }))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let response = check_status(response)?;
        let doc: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Invalid(e.to_string()))?;
        let name = doc
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| StoreError::Invalid("create response without name".to_string()))?;
        Ok(doc_id_from_name(name).to_string())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.doc_url(collection, id))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        check_status(response)?;
        Ok(())
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(StoreError::Unavailable(format!(
            "firestore answered {status}"
        )))
    }
}

/// Last path segment of a document resource name
fn doc_id_from_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Translate a Firestore document resource into a [`Document`]
fn parse_document(doc: &Value) -> Result<Document, StoreError> {
    let name = doc
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::Invalid("document without name".to_string()))?;

    let fields = doc
        .get("fields")
        .and_then(Value::as_object)
        .map(|fields| {
            fields
                .iter()
                .map(|(k, v)| (k.clone(), from_firestore_value(v)))
                .collect::<Map<String, Value>>()
        })
        .unwrap_or_default();

    Ok(Document::new(doc_id_from_name(name), Value::Object(fields)))
}

/// JSON object → Firestore `fields` map
fn to_firestore_fields(fields: &Value) -> Result<Value, StoreError> {
    let obj = fields
        .as_object()
        .ok_or_else(|| StoreError::Invalid("document fields must be an object".to_string()))?;
    Ok(Value::Object(
        obj.iter()
            .map(|(k, v)| (k.clone(), to_firestore_value(v)))
            .collect(),
    ))
}

fn to_firestore_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                // Firestore encodes integers as strings
                json!({ "integerValue": i.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64() })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": {
                "values": items.iter().map(to_firestore_value).collect::<Vec<_>>()
            }
        }),
        Value::Object(map) => json!({
            "mapValue": {
                "fields": map
                    .iter()
                    .map(|(k, v)| (k.clone(), to_firestore_value(v)))
                    .collect::<Map<String, Value>>()
            }
        }),
    }
}

fn from_firestore_value(value: &Value) -> Value {
    let Some(obj) = value.as_object() else {
        return Value::Null;
    };
    if let Some(s) = obj.get("stringValue").and_then(Value::as_str) {
        return Value::String(s.to_string());
    }
    if let Some(s) = obj.get("timestampValue").and_then(Value::as_str) {
        return Value::String(s.to_string());
    }
    if let Some(i) = obj.get("integerValue") {
        // May arrive as a string or a number
        let parsed = match i {
            Value::String(s) => s.parse::<i64>().ok(),
            Value::Number(n) => n.as_i64(),
            _ => None,
        };
        if let Some(i) = parsed {
            return json!(i);
        }
    }
    if let Some(d) = obj.get("doubleValue").and_then(Value::as_f64) {
        return json!(d);
    }
    if let Some(b) = obj.get("booleanValue").and_then(Value::as_bool) {
        return Value::Bool(b);
    }
    if let Some(items) = obj
        .get("arrayValue")
        .and_then(|a| a.get("values"))
        .and_then(Value::as_array)
    {
        return Value::Array(items.iter().map(from_firestore_value).collect());
    }
    if let Some(fields) = obj
        .get("mapValue")
        .and_then(|m| m.get("fields"))
        .and_then(Value::as_object)
    {
        return Value::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), from_firestore_value(v)))
                .collect(),
        );
    }
    Value::Null
}
