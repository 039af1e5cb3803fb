use super::types::{ColumnSpec, FormFieldSpec, SearchSlotField, SelectOption};
use crate::naming::capitalize;
use crate::settings::Heuristics;
use crate::source::ApiDocument;
use serde_json::Value;
use tracing::warn;

/// Audit/tenant/paging fields that never appear as columns or form inputs.
pub const SYSTEM_FIELDS: &[&str] = &[
    "createdAt",
    "updatedAt",
    "deletedAt",
    "createdBy",
    "updatedBy",
    "deletedBy",
    "version",
    "revision",
    "tenantId",
    "isDelete",
    "page",
    "size",
    "createdAtStart",
    "createdAtEnd",
    "updatedAtStart",
    "updatedAtEnd",
];

/// Server-assigned fields excluded from registration forms.
pub const READ_ONLY_FIELDS: &[&str] = &["id", "createdAt", "updatedAt"];

pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
pub const PHONE_MASK: &str = "000-0000-0000";
pub const LICENSE_MASK: &str = "000-00-00000";

const LABELS: &[(&str, &str)] = &[
    ("id", "ID"),
    ("code", "코드"),
    ("name", "이름"),
    ("date", "일자"),
    ("vendorName", "업체명"),
    ("vendorNo", "업체번호"),
    ("orderCode", "주문코드"),
    ("orderDate", "주문일자"),
    ("deliveryDate", "납기일자"),
    ("itemName", "품명"),
    ("itemNumber", "품번"),
    ("unitPrice", "단가"),
    ("totalAmount", "총금액"),
];

const PLACEHOLDERS: &[(&str, &str)] = &[
    ("email", "example@company.com"),
    ("phone", "010-0000-0000"),
    ("tel", "02-0000-0000"),
    ("fax", "02-0000-0000"),
    ("licenseno", "000-00-00000"),
    ("businessno", "000-00-00000"),
    ("zipcode", "12345"),
    ("date", "YYYY-MM-DD"),
];

/// Normalized primitive type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl FieldKind {
    /// integer and number collapse to `Number`; anything unknown is a string.
    pub fn from_schema_type(ty: Option<&str>) -> Self {
        match ty {
            Some("integer") | Some("number") => FieldKind::Number,
            Some("boolean") => FieldKind::Boolean,
            Some("array") => FieldKind::Array,
            Some("object") => FieldKind::Object,
            _ => FieldKind::String,
        }
    }
}

/// A schema property, independent of how the schema spelled it.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub max_length: Option<u64>,
    pub min_length: Option<u64>,
    pub format: Option<String>,
    pub enum_values: Option<Vec<String>>,
    pub example: Option<String>,
}

impl FieldInfo {
    pub fn from_property(name: &str, property: &Value, required: bool) -> Self {
        FieldInfo {
            name: name.to_string(),
            kind: FieldKind::from_schema_type(property.get("type").and_then(Value::as_str)),
            required,
            max_length: property.get("maxLength").and_then(Value::as_u64),
            min_length: property.get("minLength").and_then(Value::as_u64),
            format: property
                .get("format")
                .and_then(Value::as_str)
                .map(str::to_string),
            enum_values: property
                .get("enum")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(scalar_to_string).collect()),
            example: property.get("example").and_then(|v| match v {
                Value::Null => None,
                other => Some(scalar_to_string(other)),
            }),
        }
    }

    fn has_format(&self, format: &str) -> bool {
        self.format.as_deref() == Some(format)
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Every property of an object schema as a [`FieldInfo`], in key order.
///
/// Properties given as an unresolvable `$ref` are skipped.
pub fn field_infos(doc: &ApiDocument, schema: &Value) -> Vec<FieldInfo> {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Vec::new();
    };
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|r| r.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    properties
        .iter()
        .filter_map(|(name, property)| match doc.resolve_schema(property) {
            Some(resolved) => Some(FieldInfo::from_property(
                name,
                resolved,
                required.contains(&name.as_str()),
            )),
            None => {
                warn!(field = %name, "skipping field with unresolved schema");
                None
            }
        })
        .collect()
}

pub fn is_system_field(name: &str) -> bool {
    SYSTEM_FIELDS.contains(&name)
}

pub fn is_read_only_field(name: &str) -> bool {
    READ_ONLY_FIELDS.contains(&name)
}

/// Display label: a fixed table, else the capitalized field name.
pub fn field_label(name: &str) -> String {
    LABELS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| capitalize(name))
}

/// Input placeholder: the schema example, a per-name hint, or a generic prompt.
pub fn placeholder(name: &str, example: Option<&str>) -> String {
    if let Some(example) = example.filter(|e| !e.is_empty()) {
        return example.to_string();
    }
    let lower = name.to_lowercase();
    PLACEHOLDERS
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map(|(_, hint)| hint.to_string())
        .unwrap_or_else(|| format!("{}을(를) 입력하세요", field_label(name)))
}

/// Input mask and whether the widget should auto-detect the format.
pub fn mask_for(name: &str) -> Option<(&'static str, bool)> {
    let lower = name.to_lowercase();
    if lower.contains("phone") || lower.contains("tel") || lower.contains("mobile") {
        Some((PHONE_MASK, true))
    } else if lower.contains("license") || lower.contains("businessno") {
        Some((LICENSE_MASK, false))
    } else {
        None
    }
}

/// Column width in pixels.
pub fn column_size(field: &FieldInfo) -> u32 {
    let name = field.name.as_str();
    if name == "id" {
        return 80;
    }
    let lower = name.to_lowercase();
    if lower.contains("date") || lower.contains("time") {
        return 150;
    }
    if name == "status" || name == "type" {
        return 100;
    }
    if name == "code" {
        return 120;
    }
    match field.max_length {
        Some(max) if max > 0 => (max.saturating_mul(8)).clamp(100, 300) as u32,
        _ => 150,
    }
}

/// Registration form input type.
pub fn form_field_type(field: &FieldInfo, heuristics: &Heuristics) -> &'static str {
    if field.enum_values.is_some() {
        return "select";
    }
    if field.has_format("date") {
        return "date";
    }
    if field.has_format("date-time") {
        return "datetime-local";
    }
    if field.has_format("email") {
        return "email";
    }
    if field.kind == FieldKind::Number {
        return "number";
    }
    let lower = field.name.to_lowercase();
    if lower.contains("tel") || lower.contains("phone") {
        return "tel";
    }
    if field
        .max_length
        .is_some_and(|max| max > heuristics.textarea_max_length)
    {
        return "textarea";
    }
    "text"
}

/// Search-slot input type.
pub fn search_field_type(field: &FieldInfo) -> &'static str {
    if field.enum_values.is_some() {
        "select"
    } else if field.has_format("date") || field.has_format("date-time") {
        "date"
    } else {
        "text"
    }
}

/// Whether a list field is offered in quick search.
pub fn is_searchable(field: &FieldInfo) -> bool {
    if is_system_field(&field.name) {
        return false;
    }
    field.kind == FieldKind::String || field.name.contains("name") || field.name.contains("code")
}

fn options_of(field: &FieldInfo) -> Option<Vec<SelectOption>> {
    field.enum_values.as_ref().map(|values| {
        values
            .iter()
            .map(|v| SelectOption {
                label: v.clone(),
                value: v.clone(),
            })
            .collect()
    })
}

/// Data-table columns, without system fields (`id` is kept).
pub fn build_columns(fields: &[FieldInfo]) -> Vec<ColumnSpec> {
    fields
        .iter()
        .filter(|f| f.name == "id" || !is_system_field(&f.name))
        .map(|f| ColumnSpec {
            accessor_key: f.name.clone(),
            header: field_label(&f.name),
            size: column_size(f),
            min_size: (f.name == "id").then_some(60),
        })
        .collect()
}

/// Registration form fields, without system and read-only fields.
pub fn build_form_fields(fields: &[FieldInfo], heuristics: &Heuristics) -> Vec<FormFieldSpec> {
    fields
        .iter()
        .filter(|f| !is_system_field(&f.name) && !is_read_only_field(&f.name))
        .map(|f| {
            let kind = form_field_type(f, heuristics);
            let mask = mask_for(&f.name);
            FormFieldSpec {
                name: f.name.clone(),
                label: field_label(&f.name),
                kind: kind.to_string(),
                placeholder: placeholder(&f.name, f.example.as_deref()),
                required: f.required,
                max_length: f.max_length,
                min_length: f.min_length,
                mask: mask.map(|(m, _)| m.to_string()),
                mask_auto_detect: mask.is_some_and(|(_, auto)| auto),
                pattern: f.has_format("email").then(|| EMAIL_PATTERN.to_string()),
                options: options_of(f),
                rows: (kind == "textarea").then_some(3),
            }
        })
        .collect()
}

/// Search-slot inputs from the entity's search request schema.
pub fn build_search_slot_fields(fields: &[FieldInfo]) -> Vec<SearchSlotField> {
    fields
        .iter()
        .filter(|f| !is_system_field(&f.name))
        .map(|f| SearchSlotField {
            name: f.name.clone(),
            label: field_label(&f.name),
            kind: search_field_type(f).to_string(),
            placeholder: placeholder(&f.name, None),
            options: options_of(f),
        })
        .collect()
}

/// First `search_field_cap` searchable list fields.
pub fn build_search_fields(fields: &[FieldInfo], heuristics: &Heuristics) -> Vec<String> {
    fields
        .iter()
        .filter(|f| is_searchable(f))
        .take(heuristics.search_field_cap)
        .map(|f| f.name.clone())
        .collect()
}
