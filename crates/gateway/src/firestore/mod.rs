//! Firebase backend over its public REST APIs.
//!
//! - Documents: Firestore REST v1 (`runQuery`, create, patch, get).
//! - Files: Firebase Storage upload with a download-token URL.
//! - Functions: the callable-function protocol (`{"data": ...}` in,
//!   `{"result": ...}` out).

pub mod value;

use async_trait::async_trait;
use mhc_core::types::DocId;
use reqwest::{RequestBuilder, Response, Url};
use serde_json::{json, Value};

use crate::config::FirebaseConfig;
use crate::error::GatewayError;
use crate::query::{CollectionQuery, Direction, Document, Fields};
use crate::store::{now_timestamp, CloudFunctions, DocumentStore, FileStorage, CREATED_AT, UPDATED_AT};

use self::value::{decode_fields, encode_fields, encode_value, id_from_name};

/// REST client for one Firebase project.
#[derive(Debug, Clone)]
pub struct FirestoreClient {
    client: reqwest::Client,
    config: FirebaseConfig,
}

impl FirestoreClient {
    pub fn new(config: FirebaseConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FirebaseConfig {
        &self.config
    }

    fn document_url(&self, collection: &str, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/{collection}/{id}", self.config.documents_url()),
            None => format!("{}/{collection}", self.config.documents_url()),
        }
    }

    fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.query(&[("key", key.as_str())]),
            None => request,
        }
    }

    fn parse_document(body: &Value) -> Result<Document, GatewayError> {
        let name = body
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::Decode("document without a name".into()))?;
        let data = decode_fields(body.get("fields"))?;
        Ok(Document::new(id_from_name(name), data))
    }

    fn document_body(data: &Fields) -> Value {
        json!({ "fields": encode_fields(data) })
    }
}

/// Turn a non-2xx response into [`GatewayError::Status`], keeping the
/// service's own error message when it sends one.
async fn check(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| {
            let err = v.get("error")?;
            err.get("message")
                .and_then(Value::as_str)
                .or_else(|| err.as_str())
                .map(str::to_string)
        })
        .unwrap_or(body);
    Err(GatewayError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Firestore `structuredQuery` for a collection query.
pub fn structured_query(query: &CollectionQuery) -> Value {
    let mut structured = json!({
        "from": [{ "collectionId": query.collection }],
    });

    let filters: Vec<Value> = query
        .filters
        .iter()
        .map(|(field, value)| {
            json!({
                "fieldFilter": {
                    "field": { "fieldPath": field },
                    "op": "EQUAL",
                    "value": encode_value(value),
                }
            })
        })
        .collect();
    match filters.len() {
        0 => {}
        1 => structured["where"] = filters[0].clone(),
        _ => {
            structured["where"] = json!({
                "compositeFilter": { "op": "AND", "filters": filters }
            })
        }
    }

    if let Some((field, direction)) = &query.order_by {
        let direction = match direction {
            Direction::Ascending => "ASCENDING",
            Direction::Descending => "DESCENDING",
        };
        structured["orderBy"] = json!([{ "field": { "fieldPath": field }, "direction": direction }]);
    }
    if let Some(limit) = query.limit {
        structured["limit"] = json!(limit);
    }
    json!({ "structuredQuery": structured })
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn add_document(&self, collection: &str, mut data: Fields) -> Result<DocId, GatewayError> {
        let now = now_timestamp();
        data.insert(CREATED_AT.into(), now.clone());
        data.insert(UPDATED_AT.into(), now);

        let request = self
            .client
            .post(self.document_url(collection, None))
            .json(&Self::document_body(&data));
        let response = check(self.with_key(request).send().await?).await?;
        let body: Value = response.json().await?;
        let doc = Self::parse_document(&body)?;
        tracing::debug!(collection, id = %doc.id, "Document created");
        Ok(doc.id)
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        mut data: Fields,
    ) -> Result<(), GatewayError> {
        data.insert(UPDATED_AT.into(), now_timestamp());
        let request = self
            .client
            .patch(self.document_url(collection, Some(id)))
            .json(&Self::document_body(&data));
        check(self.with_key(request).send().await?).await?;
        tracing::debug!(collection, id, "Document written");
        Ok(())
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        mut data: Fields,
    ) -> Result<(), GatewayError> {
        data.insert(UPDATED_AT.into(), now_timestamp());

        let mut params: Vec<(&str, &str)> = data
            .keys()
            .map(|field| ("updateMask.fieldPaths", field.as_str()))
            .collect();
        params.push(("currentDocument.exists", "true"));

        let request = self
            .client
            .patch(self.document_url(collection, Some(id)))
            .query(&params)
            .json(&Self::document_body(&data));
        match check(self.with_key(request).send().await?).await {
            Ok(_) => Ok(()),
            Err(GatewayError::Status { status: 404, .. }) => Err(GatewayError::NotFound {
                collection: collection.into(),
                id: id.into(),
            }),
            Err(e) => Err(e),
        }
    }

    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, GatewayError> {
        let request = self.client.get(self.document_url(collection, Some(id)));
        match check(self.with_key(request).send().await?).await {
            Ok(response) => {
                let body: Value = response.json().await?;
                Ok(Some(Self::parse_document(&body)?))
            }
            Err(GatewayError::Status { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn query(&self, query: &CollectionQuery) -> Result<Vec<Document>, GatewayError> {
        let url = format!("{}:runQuery", self.config.documents_url());
        let request = self.client.post(url).json(&structured_query(query));
        let response = check(self.with_key(request).send().await?).await?;
        let rows: Vec<Value> = response.json().await?;

        // Rows without a `document` carry only a read time.
        let docs = rows
            .iter()
            .filter_map(|row| row.get("document"))
            .map(Self::parse_document)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(collection = %query.collection, count = docs.len(), "Query complete");
        Ok(docs)
    }
}

#[async_trait]
impl FileStorage for FirestoreClient {
    async fn upload_file(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, GatewayError> {
        let size = bytes.len();
        let request = self
            .client
            .post(self.config.storage_objects_url())
            .query(&[("name", path)])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);
        let response = check(self.with_key(request).send().await?).await?;
        let body: Value = response.json().await?;

        let name = body.get("name").and_then(Value::as_str).unwrap_or(path);
        let token = body
            .get("downloadTokens")
            .and_then(Value::as_str)
            .and_then(|tokens| tokens.split(',').next())
            .ok_or_else(|| GatewayError::Decode("upload response without a download token".into()))?;

        let url = download_url(&self.config.storage_objects_url(), name, token)?;
        tracing::info!(path, size, "File uploaded");
        Ok(url)
    }
}

/// Public URL for an uploaded object. The object name is a single,
/// percent-encoded path segment.
pub fn download_url(objects_url: &str, name: &str, token: &str) -> Result<String, GatewayError> {
    let mut url = Url::parse(objects_url).map_err(|e| GatewayError::Decode(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| GatewayError::Decode(format!("cannot-be-a-base URL: {objects_url}")))?
        .push(name);
    url.query_pairs_mut()
        .append_pair("alt", "media")
        .append_pair("token", token);
    Ok(url.to_string())
}

#[async_trait]
impl CloudFunctions for FirestoreClient {
    async fn call(&self, name: &str, payload: Value) -> Result<Value, GatewayError> {
        let request = self
            .client
            .post(self.config.function_url(name))
            .json(&json!({ "data": payload }));
        let response = check(request.send().await?).await?;
        let mut body: Value = response.json().await?;
        tracing::debug!(function = name, "Callable function returned");
        Ok(body
            .get_mut("result")
            .map(Value::take)
            .unwrap_or(Value::Null))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
