// BSON <-> JSON conversion and id parsing for handlers

use futures::TryStreamExt;
use mongodb::{
    bson::{oid::ObjectId, Bson, Document},
    results::InsertOneResult,
    Cursor,
};
use serde_json::{json, Map, Value};

use crate::utils::{ApiError, ApiResult};

/// Parses a path id, answering 400 with `message` when it is not a valid
/// 24-char hex ObjectId.
pub fn parse_object_id(id: &str, message: &str) -> ApiResult<ObjectId> {
    ObjectId::parse_str(id.trim()).map_err(|_| ApiError::BadRequest(message.to_string()))
}

/// Renders a BSON value the way API clients expect it: ObjectIds as hex
/// strings and dates as RFC 3339 strings.
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(date) => match date.try_to_rfc3339_string() {
            Ok(rendered) => Value::String(rendered),
            Err(_) => Bson::DateTime(date).into_relaxed_extjson(),
        },
        Bson::Document(doc) => document_to_json(doc),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

pub fn document_to_json(doc: Document) -> Value {
    let map: Map<String, Value> = doc
        .into_iter()
        .map(|(key, value)| (key, bson_to_json(value)))
        .collect();
    Value::Object(map)
}

/// `null` when absent, like `findOne` results on the wire.
pub fn optional_document_to_json(doc: Option<Document>) -> Value {
    doc.map(document_to_json).unwrap_or(Value::Null)
}

pub fn documents_to_json(docs: Vec<Document>) -> Value {
    Value::Array(docs.into_iter().map(document_to_json).collect())
}

/// `{ insertedId }` as returned by every create endpoint
pub fn inserted_id_json(result: InsertOneResult) -> Value {
    json!({ "insertedId": bson_to_json(result.inserted_id) })
}

/// Converts a JSON request body into a document. Only objects are accepted.
pub fn json_to_document(value: Value) -> ApiResult<Document> {
    match value {
        Value::Object(map) => mongodb::bson::to_document(&map)
            .map_err(|e| ApiError::BadRequest(format!("Invalid document: {e}"))),
        _ => Err(ApiError::BadRequest("Request body must be a JSON object".to_string())),
    }
}

/// Converts a schemaless field from a request body; absent becomes `null`.
pub fn json_to_bson(value: Option<Value>) -> ApiResult<Bson> {
    match value {
        Some(value) => mongodb::bson::to_bson(&value)
            .map_err(|e| ApiError::BadRequest(format!("Invalid value: {e}"))),
        None => Ok(Bson::Null),
    }
}

pub async fn collect_documents(cursor: Cursor<Document>) -> ApiResult<Vec<Document>> {
    let documents: Vec<Document> = cursor.try_collect().await?;
    Ok(documents)
}
