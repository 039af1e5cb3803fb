use super::SourceError;
use serde_json::Value;
use std::path::Path;
use tracing::warn;

/// Methods the extractor considers, in the order endpoints are listed.
pub const HTTP_METHODS: [&str; 4] = ["get", "post", "put", "delete"];

/// Upper bound on chained `$ref` hops, guards against reference cycles.
const MAX_REF_DEPTH: usize = 16;

/// A parsed OpenAPI document. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiDocument {
    root: Value,
}

impl ApiDocument {
    pub fn new(root: Value) -> Self {
        ApiDocument { root }
    }

    /// Parse JSON, falling back to YAML.
    ///
    /// `origin` names the source (URL or path) in error messages.
    pub fn parse(text: &str, origin: &str) -> Result<Self, SourceError> {
        let trimmed = text.trim_start();
        let root: Value = if trimmed.starts_with('{') || trimmed.starts_with('[') {
            serde_json::from_str(text).map_err(|e| SourceError::Decode {
                origin: origin.to_string(),
                message: e.to_string(),
            })?
        } else {
            serde_yaml::from_str(text).map_err(|e| SourceError::Decode {
                origin: origin.to_string(),
                message: e.to_string(),
            })?
        };
        if root.get("paths").is_none() {
            return Err(SourceError::Decode {
                origin: origin.to_string(),
                message: "document has no `paths` section".to_string(),
            });
        }
        Ok(ApiDocument { root })
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// `(path, path item)` pairs in key order.
    pub fn paths(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.root
            .get("paths")
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|paths| paths.iter().map(|(k, v)| (k.as_str(), v)))
    }

    /// Operation object for `method` (lowercase) at `path`.
    pub fn operation(&self, path: &str, method: &str) -> Option<&Value> {
        self.root.get("paths")?.get(path)?.get(method)
    }

    /// Resolve an internal pointer such as `#/components/schemas/Order`.
    ///
    /// Returns `None` and logs a warning when a segment is missing. External
    /// references (not starting with `#/`) are not followed.
    pub fn resolve_ref(&self, reference: &str) -> Option<&Value> {
        let Some(pointer) = reference.strip_prefix("#/") else {
            warn!(reference, "external $ref is not supported");
            return None;
        };
        let mut current = &self.root;
        for segment in pointer.split('/') {
            let segment = segment.replace("~1", "/").replace("~0", "~");
            match current.get(segment.as_str()) {
                Some(next) => current = next,
                None => {
                    warn!(reference, segment = %segment, "unresolved $ref segment");
                    return None;
                }
            }
        }
        Some(current)
    }

    /// Follow `$ref` chains until a concrete schema is reached.
    pub fn resolve_schema<'a>(&'a self, schema: &'a Value) -> Option<&'a Value> {
        let mut current = schema;
        for _ in 0..MAX_REF_DEPTH {
            match current.get("$ref").and_then(Value::as_str) {
                Some(reference) => current = self.resolve_ref(reference)?,
                None => return Some(current),
            }
        }
        warn!("$ref chain too deep, treating schema as unavailable");
        None
    }

    /// The JSON request body schema of an operation, resolved.
    pub fn request_schema<'a>(&'a self, operation: &'a Value) -> Option<&'a Value> {
        let schema = operation
            .get("requestBody")?
            .get("content")?
            .get("application/json")?
            .get("schema")?;
        self.resolve_schema(schema)
    }

    /// The raw (unresolved) response schema for a 200 or 201 answer.
    ///
    /// Prefers `application/json`, then `*/*`.
    pub fn raw_response_schema<'a>(&self, operation: &'a Value) -> Option<&'a Value> {
        let responses = operation.get("responses")?;
        let response = responses.get("200").or_else(|| responses.get("201"))?;
        let content = response.get("content")?;
        content
            .get("application/json")
            .or_else(|| content.get("*/*"))?
            .get("schema")
    }

    /// The record schema of a response, unwrapped from the `CommonResponse`
    /// envelope.
    ///
    /// - `{data: {content: [T]}}` (paginated) yields `T`
    /// - `{data: [T]}` yields `T`
    /// - `{data: T}` yields `T`
    /// - a bare `[T]` yields `T`
    pub fn response_record_schema<'a>(&'a self, operation: &'a Value) -> Option<&'a Value> {
        let root = self.resolve_schema(self.raw_response_schema(operation)?)?;

        if let Some(data) = root.get("properties").and_then(|p| p.get("data")) {
            let data = self.resolve_schema(data)?;
            if let Some(content) = data.get("properties").and_then(|p| p.get("content")) {
                let content = self.resolve_schema(content)?;
                if is_array(content) {
                    return self.resolve_schema(content.get("items")?);
                }
            }
            if is_array(data) {
                return self.resolve_schema(data.get("items")?);
            }
            return Some(data);
        }

        if is_array(root) {
            return self.resolve_schema(root.get("items")?);
        }
        Some(root)
    }
}

fn is_array(schema: &Value) -> bool {
    schema.get("type").and_then(Value::as_str) == Some("array")
}

/// Read an OpenAPI document from disk (`.json`, `.yaml` or `.yml`).
pub fn load_document_file(path: &Path) -> anyhow::Result<ApiDocument> {
    use anyhow::Context;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read API document: {}", path.display()))?;
    let origin = path.display().to_string();
    Ok(ApiDocument::parse(&text, &origin)?)
}
