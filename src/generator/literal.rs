//! TypeScript literals embedded into templates.
//!
//! Column and form definitions are rendered here rather than in the templates
//! so that cell renderers (real arrow functions, not strings) can be spliced in
//! and every literal is valid TS regardless of the text it carries.

use crate::module_config::{ColumnSpec, FormFieldSpec};
use serde_json::{json, Value};

/// InfoGrid shows at most this many master fields.
pub const INFO_GRID_MAX_KEYS: usize = 8;

const DATE_CELL: &str = "({ getValue }: { getValue: () => any }) => { const value = getValue(); return value ? new Date(value).toLocaleDateString('ko-KR') : '-'; }";
const NUMBER_CELL: &str = "({ getValue }: { getValue: () => any }) => { const value = getValue(); return value ? value.toLocaleString() : '-'; }";
const STATUS_CELL: &str =
    "({ getValue }: { getValue: () => any }) => { const value = getValue(); return value || '-'; }";

const DATE_SUFFIXES: &[&str] = &["date", "time", "at"];
const DATE_MARKERS: &[&str] = &["created", "updated", "modified", "deleted", "expired"];
const NUMBER_SUFFIXES: &[&str] = &[
    "id", "no", "number", "count", "amount", "price", "cost", "quantity", "size", "length",
    "width", "height",
];
const STATUS_SUFFIXES: &[&str] = &["status", "state", "type", "category", "level"];

const INFO_GRID_EXCLUDED: &[&str] = &["description", "memo", "content"];

/// A JS string literal (double quoted).
pub fn js_string(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}

/// A JS array of string literals on one line.
pub fn string_array(values: &[String]) -> String {
    let items: Vec<String> = values.iter().map(|v| js_string(v)).collect();
    format!("[{}]", items.join(", "))
}

pub fn is_date_field(name: &str) -> bool {
    let lower = name.to_lowercase();
    DATE_SUFFIXES.iter().any(|s| lower.ends_with(s))
        || DATE_MARKERS.iter().any(|m| lower.contains(m))
}

pub fn is_number_field(name: &str) -> bool {
    let lower = name.to_lowercase();
    NUMBER_SUFFIXES.iter().any(|s| lower.ends_with(s))
}

pub fn is_status_field(name: &str) -> bool {
    let lower = name.to_lowercase();
    STATUS_SUFFIXES.iter().any(|s| lower.ends_with(s))
}

fn cell_renderer(accessor: &str) -> Option<&'static str> {
    if is_date_field(accessor) {
        Some(DATE_CELL)
    } else if is_number_field(accessor) && accessor != "id" {
        Some(NUMBER_CELL)
    } else if is_status_field(accessor) {
        Some(STATUS_CELL)
    } else {
        None
    }
}

/// Columns shown when a module config carries none.
///
/// Never includes system fields.
pub fn default_columns() -> Vec<ColumnSpec> {
    let column = |key: &str, header: &str, size: u32| ColumnSpec {
        accessor_key: key.to_string(),
        header: header.to_string(),
        size,
        min_size: (key == "id").then_some(60),
    };
    vec![
        column("id", "ID", 80),
        column("name", "이름", 150),
        column("code", "코드", 120),
        column("status", "상태", 100),
    ]
}

/// The column array literal of a data table.
///
/// An empty slice renders [`default_columns`]. Date, number and status
/// columns get a cell renderer.
pub fn columns_literal(columns: &[ColumnSpec]) -> String {
    let defaults;
    let columns = if columns.is_empty() {
        defaults = default_columns();
        &defaults
    } else {
        columns
    };

    let rendered: Vec<String> = columns
        .iter()
        .map(|col| {
            let mut lines = vec![
                format!("\t\taccessorKey: {},", js_string(&col.accessor_key)),
                format!("\t\theader: {},", js_string(&col.header)),
                format!("\t\tsize: {},", col.size),
            ];
            if let Some(min) = col.min_size {
                lines.push(format!("\t\tminSize: {min},"));
            }
            if let Some(cell) = cell_renderer(&col.accessor_key) {
                lines.push(format!("\t\tcell: {cell},"));
            }
            format!("\t{{\n{}\n\t}}", lines.join("\n"))
        })
        .collect();

    format!("[\n{}\n]", rendered.join(",\n"))
}

/// Keys of the InfoGrid beside a master table.
///
/// Long-text and collection fields are skipped; `id` and `createdAt` are added
/// when there is room.
pub fn info_grid_keys(columns: &[ColumnSpec]) -> Vec<(String, String)> {
    if columns.is_empty() {
        return [
            ("id", "ID"),
            ("code", "코드"),
            ("name", "이름"),
            ("status", "상태"),
            ("createdAt", "등록일시"),
            ("updatedAt", "수정일시"),
            ("createdBy", "등록자"),
            ("updatedBy", "수정자"),
        ]
        .iter()
        .map(|(k, l)| (k.to_string(), l.to_string()))
        .collect();
    }

    let mut keys: Vec<(String, String)> = columns
        .iter()
        .filter(|c| {
            let key = c.accessor_key.as_str();
            !key.contains("Details")
                && !key.contains("List")
                && !key.contains("Array")
                && !INFO_GRID_EXCLUDED.contains(&key)
        })
        .take(INFO_GRID_MAX_KEYS)
        .map(|c| (c.accessor_key.clone(), c.header.clone()))
        .collect();

    if !keys.iter().any(|(k, _)| k == "id") && keys.len() < INFO_GRID_MAX_KEYS {
        keys.insert(0, ("id".to_string(), "ID".to_string()));
    }
    if !keys.iter().any(|(k, _)| k == "createdAt") && keys.len() < INFO_GRID_MAX_KEYS {
        keys.push(("createdAt".to_string(), "등록일시".to_string()));
    }
    keys
}

pub fn info_grid_literal(columns: &[ColumnSpec]) -> String {
    let value: Vec<Value> = info_grid_keys(columns)
        .into_iter()
        .map(|(key, label)| json!({ "key": key, "label": label }))
        .collect();
    pretty(&Value::Array(value))
}

/// Fields shown when a create action carries none.
pub fn default_form_fields() -> Value {
    json!([
        { "name": "name", "label": "이름", "type": "text", "placeholder": "이름을 입력하세요", "required": true, "maxLength": 100 },
        { "name": "code", "label": "코드", "type": "text", "placeholder": "코드를 입력하세요", "required": true, "maxLength": 50 },
        { "name": "description", "label": "설명", "type": "textarea", "placeholder": "설명을 입력하세요", "required": false, "maxLength": 500, "rows": 3 },
        { "name": "status", "label": "상태", "type": "select", "placeholder": "상태를 선택하세요", "required": true,
          "options": [ { "value": "active", "label": "활성" }, { "value": "inactive", "label": "비활성" } ] }
    ])
}

/// The form schema array literal of a registration page.
///
/// Missing labels and placeholders are filled in, textareas get 3 rows and
/// number inputs a minimum of 0.
pub fn form_schema_literal(fields: &[FormFieldSpec]) -> String {
    if fields.is_empty() {
        return pretty(&default_form_fields());
    }

    let items: Vec<Value> = fields
        .iter()
        .map(|field| {
            let mut value = json!({});
            if let Ok(Value::Object(map)) = serde_json::to_value(field) {
                value = Value::Object(map);
            }
            let Some(obj) = value.as_object_mut() else {
                return value;
            };
            let label = if field.label.is_empty() {
                field.name.clone()
            } else {
                field.label.clone()
            };
            if field.placeholder.is_empty() {
                obj.insert(
                    "placeholder".to_string(),
                    Value::String(format!("{label}을(를) 입력하세요")),
                );
            }
            obj.insert("label".to_string(), Value::String(label));
            if field.kind == "textarea" && field.rows.is_none() {
                obj.insert("rows".to_string(), json!(3));
            }
            if field.kind == "number" && !obj.contains_key("min") {
                obj.insert("min".to_string(), json!(0));
            }
            value
        })
        .collect();
    pretty(&Value::Array(items))
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "[]".to_string())
}
