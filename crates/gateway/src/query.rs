//! Documents and collection queries shared by every store implementation.

use std::cmp::Ordering;

use mhc_core::types::DocId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::GatewayError;

/// Top-level fields of a stored document.
pub type Fields = Map<String, Value>;

/// A document as read back from a store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocId,
    pub data: Fields,
}

impl Document {
    pub fn new(id: impl Into<DocId>, data: Fields) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// Deserialize into a typed model. The document id is exposed to the
    /// model as an `id` field.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, GatewayError> {
        let mut data = self.data;
        data.insert("id".into(), Value::String(self.id));
        Ok(serde_json::from_value(Value::Object(data))?)
    }
}

/// Serialize a model into document fields. The model must serialize to a
/// JSON object; an `id` field, if present, is dropped.
pub fn to_fields<T: Serialize>(value: &T) -> Result<Fields, GatewayError> {
    match serde_json::to_value(value)? {
        Value::Object(mut map) => {
            map.remove("id");
            Ok(map)
        }
        other => Err(GatewayError::Decode(format!(
            "expected an object, got {}",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Equality filters, one ordering and an optional limit over a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionQuery {
    pub collection: String,
    pub filters: Vec<(String, Value)>,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl CollectionQuery {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filters: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Stable textual key, used by the read cache.
    pub fn cache_key(&self) -> String {
        let filters: Vec<String> = self
            .filters
            .iter()
            .map(|(field, value)| format!("{field}={value}"))
            .collect();
        let order = match &self.order_by {
            Some((field, Direction::Ascending)) => format!("{field} asc"),
            Some((field, Direction::Descending)) => format!("{field} desc"),
            None => String::new(),
        };
        let limit = self.limit.map(|n| n.to_string()).unwrap_or_default();
        format!(
            "{}|{}|{}|{}",
            self.collection,
            filters.join("&"),
            order,
            limit
        )
    }

    /// Whether a document passes every equality filter.
    pub fn matches(&self, data: &Fields) -> bool {
        self.filters
            .iter()
            .all(|(field, expected)| data.get(field) == Some(expected))
    }

    /// Apply filters, ordering and limit to an in-memory document list.
    ///
    /// Documents without the ordering field are left out, as the hosted
    /// store does. Ties keep their input order.
    pub fn apply(&self, docs: impl IntoIterator<Item = Document>) -> Vec<Document> {
        let mut out: Vec<Document> = docs.into_iter().filter(|d| self.matches(&d.data)).collect();

        if let Some((field, direction)) = &self.order_by {
            out.retain(|d| d.data.get(field).is_some_and(|v| !v.is_null()));
            out.sort_by(|a, b| {
                let ord = compare_values(&a.data[field.as_str()], &b.data[field.as_str()]);
                match direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            out.truncate(limit);
        }
        out
    }
}

/// Total order over JSON values: booleans, then numbers, then strings.
/// ISO-8601 timestamps compare correctly as strings.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
