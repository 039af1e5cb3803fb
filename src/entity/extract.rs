use crate::source::{ApiDocument, HTTP_METHODS};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// HTTP methods that take part in entity extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Parse a lowercase OpenAPI method key.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(Method::Get),
            "post" => Some(Method::Post),
            "put" => Some(Method::Put),
            "delete" => Some(Method::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One method+path pair of an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub path: String,
    pub method: Method,
    /// The raw operation object
    pub operation: Value,
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub operation_id: Option<String>,
}

impl Endpoint {
    /// Whether the path has no `{param}` segments.
    pub fn is_parameter_free(&self) -> bool {
        !self.path.contains('{')
    }
}

/// A backend resource: every operation under one leading path segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub name: String,
    pub endpoints: Vec<Endpoint>,
    /// Names of schemas referenced by responses (informational)
    pub schemas: BTreeSet<String>,
    /// Any path contains `/detail`
    pub has_detail_endpoint: bool,
    /// Resolved `searchRequest` parameter schema of the `/master` listing
    pub search_schema: Option<Value>,
}

impl Entity {
    /// The entity's own collection path, `/{name}`.
    pub fn own_path(&self) -> String {
        format!("/{}", self.name)
    }

    pub fn endpoints_with(&self, method: Method) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter().filter(move |e| e.method == method)
    }
}

#[derive(Default)]
struct EntityBuilder {
    endpoints: Vec<Endpoint>,
    schemas: BTreeSet<String>,
    has_detail_endpoint: bool,
    search_schema: Option<Value>,
}

/// Group every get/post/put/delete operation by the first path segment.
///
/// Entities come back sorted by name; endpoints keep document path order and,
/// within one path, get/post/put/delete order.
pub fn extract_entities(doc: &ApiDocument) -> Vec<Entity> {
    let mut groups: BTreeMap<String, EntityBuilder> = BTreeMap::new();

    for (path, item) in doc.paths() {
        let Some(name) = path.split('/').find(|s| !s.is_empty()) else {
            continue;
        };

        for key in HTTP_METHODS {
            let Some(operation) = item.get(key) else {
                continue;
            };
            let Some(method) = Method::from_key(key) else {
                continue;
            };

            let group = groups.entry(name.to_string()).or_default();

            if path.contains("/detail") {
                group.has_detail_endpoint = true;
            }

            if method == Method::Get && path.contains("/master") && group.search_schema.is_none() {
                group.search_schema = search_request_schema(doc, operation);
            }

            collect_response_schema_names(operation, &mut group.schemas);

            group.endpoints.push(Endpoint {
                path: path.to_string(),
                method,
                operation: operation.clone(),
                tags: operation
                    .get("tags")
                    .and_then(Value::as_array)
                    .map(|tags| {
                        tags.iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
                summary: string_field(operation, "summary"),
                operation_id: string_field(operation, "operationId"),
            });
        }
    }

    groups
        .into_iter()
        .map(|(name, b)| Entity {
            name,
            endpoints: b.endpoints,
            schemas: b.schemas,
            has_detail_endpoint: b.has_detail_endpoint,
            search_schema: b.search_schema,
        })
        .collect()
}

fn string_field(operation: &Value, key: &str) -> Option<String> {
    operation.get(key).and_then(Value::as_str).map(str::to_string)
}

/// The schema of the `searchRequest` parameter, resolved.
fn search_request_schema(doc: &ApiDocument, operation: &Value) -> Option<Value> {
    let param = operation
        .get("parameters")?
        .as_array()?
        .iter()
        .find(|p| p.get("name").and_then(Value::as_str) == Some("searchRequest"))?;
    let schema = param.get("schema")?;
    doc.resolve_schema(schema).cloned()
}

/// Last segment of every `$ref` found directly under a response content schema.
fn collect_response_schema_names(operation: &Value, out: &mut BTreeSet<String>) {
    let Some(responses) = operation.get("responses").and_then(Value::as_object) else {
        return;
    };
    for response in responses.values() {
        let Some(content) = response.get("content").and_then(Value::as_object) else {
            continue;
        };
        for media in content.values() {
            if let Some(reference) = media
                .get("schema")
                .and_then(|s| s.get("$ref"))
                .and_then(Value::as_str)
            {
                if let Some(name) = reference.rsplit('/').next() {
                    out.insert(name.to_string());
                }
            }
        }
    }
}
