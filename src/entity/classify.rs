use super::extract::{Endpoint, Entity, Method};
use crate::settings::Heuristics;
use crate::source::ApiDocument;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Structural page layout chosen for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TabPattern {
    /// Read-only list
    #[serde(rename = "single-only")]
    SingleOnly,
    /// List with modal registration
    #[serde(rename = "single-register")]
    SingleWithRegister,
    /// Master/detail list plus a flat list
    #[serde(rename = "master-detail-simple")]
    MasterDetailSimple,
    /// Master/detail with a dedicated registration page
    #[serde(rename = "master-detail-full")]
    MasterDetailFull,
}

impl TabPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            TabPattern::SingleOnly => "single-only",
            TabPattern::SingleWithRegister => "single-register",
            TabPattern::MasterDetailSimple => "master-detail-simple",
            TabPattern::MasterDetailFull => "master-detail-full",
        }
    }

    pub fn is_master_detail(&self) -> bool {
        matches!(self, TabPattern::MasterDetailSimple | TabPattern::MasterDetailFull)
    }
}

impl fmt::Display for TabPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The POST endpoint that creates records: `/master` or the entity's own path.
pub fn create_endpoint(entity: &Entity) -> Option<&Endpoint> {
    let own = entity.own_path();
    entity
        .endpoints_with(Method::Post)
        .find(|e| e.path.contains("/master") || e.path == own)
}

pub fn has_create_endpoint(entity: &Entity) -> bool {
    create_endpoint(entity).is_some()
}

/// A PUT under `/master` or the entity's own path.
pub fn has_update_endpoint(entity: &Entity) -> bool {
    let own = entity.own_path();
    entity
        .endpoints_with(Method::Put)
        .any(|e| e.path.contains("/master") || e.path.contains(&own))
}

/// Whether a request schema needs a full registration page.
///
/// Complex means any of: at least `complex_field_count` properties, an
/// array or object property, or a string longer than `long_text_max_length`.
pub fn is_complex_schema(schema: &Value, heuristics: &Heuristics) -> bool {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return false;
    };

    if properties.len() >= heuristics.complex_field_count {
        return true;
    }

    properties.values().any(|prop| {
        let nested = matches!(
            prop.get("type").and_then(Value::as_str),
            Some("array") | Some("object")
        );
        let long_text = prop
            .get("maxLength")
            .and_then(Value::as_u64)
            .is_some_and(|max| max > heuristics.long_text_max_length);
        nested || long_text
    })
}

/// Pick the page pattern for `entity`. First matching rule wins:
///
/// 1. detail endpoint + create/update endpoint + complex create schema → full master-detail
/// 2. detail endpoint → simple master-detail
/// 3. create or update endpoint → list with registration
/// 4. otherwise → read-only list
pub fn classify(doc: &ApiDocument, entity: &Entity, heuristics: &Heuristics) -> TabPattern {
    let writable = has_create_endpoint(entity) || has_update_endpoint(entity);

    if entity.has_detail_endpoint && writable {
        let complex = create_endpoint(entity)
            .and_then(|e| doc.request_schema(&e.operation))
            .is_some_and(|schema| is_complex_schema(schema, heuristics));
        if complex {
            return TabPattern::MasterDetailFull;
        }
    }

    if entity.has_detail_endpoint {
        return TabPattern::MasterDetailSimple;
    }

    if writable {
        return TabPattern::SingleWithRegister;
    }

    TabPattern::SingleOnly
}
