#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::fields::*;
use super::*;
use crate::entity::extract_entities;
use crate::settings::Heuristics;
use crate::source::ApiDocument;
use serde_json::{json, Value};

fn envelope(item_ref: &str) -> Value {
    json!({
        "200": { "content": { "*/*": { "schema": {
            "type": "object",
            "properties": {
                "status": { "type": "string" },
                "data": { "type": "object", "properties": {
                    "content": { "type": "array", "items": { "$ref": item_ref } }
                } }
            }
        } } } }
    })
}

/// An order service with master/detail listings and a rich create body.
fn order_doc() -> ApiDocument {
    ApiDocument::new(json!({
        "paths": {
            "/order/master": {
                "get": {
                    "parameters": [
                        { "name": "searchRequest", "in": "query", "schema": { "$ref": "#/components/schemas/OrderSearch" } }
                    ],
                    "responses": envelope("#/components/schemas/OrderMaster")
                },
                "post": {
                    "requestBody": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/OrderCreate" } } } },
                    "responses": {}
                }
            },
            "/order/detail": {
                "get": { "responses": envelope("#/components/schemas/OrderDetail") }
            },
            "/order/fields/{name}": { "get": {} }
        },
        "components": { "schemas": {
            "OrderMaster": { "type": "object", "properties": {
                "id": { "type": "integer" },
                "orderCode": { "type": "string", "maxLength": 20 },
                "orderDate": { "type": "string", "format": "date" },
                "status": { "type": "string", "enum": ["OPEN", "CLOSED"] },
                "totalAmount": { "type": "number" },
                "vendorName": { "type": "string", "maxLength": 50 },
                "createdAt": { "type": "string", "format": "date-time" },
                "tenantId": { "type": "integer" },
                "isDelete": { "type": "boolean" }
            } },
            "OrderDetail": { "type": "object", "properties": {
                "id": { "type": "integer" },
                "itemName": { "type": "string" },
                "updatedBy": { "type": "string" }
            } },
            "OrderSearch": { "type": "object", "properties": {
                "orderCode": { "type": "string" },
                "status": { "type": "string", "enum": ["OPEN", "CLOSED"] },
                "createdAtStart": { "type": "string", "format": "date" },
                "orderDate": { "type": "string", "format": "date" }
            } },
            "OrderCreate": { "type": "object", "required": ["orderCode"], "properties": {
                "id": { "type": "integer" },
                "orderCode": { "type": "string", "maxLength": 20 },
                "vendorTel": { "type": "string" },
                "businessNo": { "type": "string" },
                "email": { "type": "string", "format": "email" },
                "memo": { "type": "string", "maxLength": 500 },
                "dueAt": { "type": "string", "format": "date-time" },
                "quantity": { "type": "integer", "example": 10 },
                "lines": { "type": "array", "items": { "type": "object" } },
                "createdAt": { "type": "string" }
            } }
        } }
    }))
}

fn field(name: &str) -> FieldInfo {
    FieldInfo::from_property(name, &json!({ "type": "string" }), false)
}

fn order_module() -> ModuleConfig {
    let doc = order_doc();
    let entities = extract_entities(&doc);
    ModuleConfigBuilder::new(&doc, Heuristics::default()).build(&entities[0], "sales")
}

#[test]
fn test_master_detail_full_module_shape() {
    let module = order_module();
    assert_eq!(module.name, "주문 관리");
    assert_eq!(module.path, "sales/order");
    assert_eq!(module.route, "/sales/order");
    assert_eq!(module.page_type, PageType::MasterDetailPage);

    let ids: Vec<_> = module.tabs.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["related-list", "list"]);

    let related = &module.tabs[0];
    assert!(related.is_default);
    assert_eq!(related.page_name, "SalesOrderMasterDetailPage");
    assert_eq!(related.path, "/sales/order/related-list");
    assert_eq!(related.table_control.title, "주문 관리 상세");
    match &related.layout {
        TabLayout::MasterDetail {
            master_data_hook,
            detail_data_hook,
            detail_columns,
            ..
        } => {
            assert_eq!(master_data_hook, "useOrderMaster");
            assert_eq!(detail_data_hook, "useOrderDetail");
            let keys: Vec<_> = detail_columns.iter().map(|c| c.accessor_key.as_str()).collect();
            assert_eq!(keys, vec!["id", "itemName"]);
        }
        other => panic!("expected master-detail layout, got {other:?}"),
    }

    let list = &module.tabs[1];
    assert_eq!(list.name, "전체 현황");
    assert_eq!(list.page_name, "SalesOrderListPage");
    assert!(matches!(&list.layout, TabLayout::Single { data_hook, .. } if data_hook == "useOrder"));

    let menu = module.menu_options.as_ref().unwrap();
    assert_eq!(menu.icon, "ShoppingCart");
    assert_eq!(menu.name, "menu.sales_order");
    assert_eq!(menu.to, "/sales/order/related-list");
}

#[test]
fn test_analyze_tab_is_opt_in() {
    let doc = order_doc();
    let entities = extract_entities(&doc);
    let heuristics = Heuristics {
        analyze_tab: true,
        ..Heuristics::default()
    };
    let module = ModuleConfigBuilder::new(&doc, heuristics).build(&entities[0], "sales");
    let analyze = module.tabs.iter().find(|t| t.is_analyze()).unwrap();
    assert_eq!(analyze.page_name, "SalesOrderAnalyzePage");
    assert!(!analyze.table_control.use_edit);
    assert!(!analyze.table_control.use_delete);
    assert!(analyze.search_options.fields.is_empty());
    assert!(analyze.search_slot_fields.is_empty());
    assert!(
        matches!(&analyze.layout, TabLayout::Single { columns, data_hook } if columns.is_empty() && data_hook == "useOrderAnalytics")
    );
}

#[test]
fn test_columns_never_include_system_fields() {
    let module = order_module();
    for tab in &module.tabs {
        let columns: Vec<&ColumnSpec> = match &tab.layout {
            TabLayout::Single { columns, .. } => columns.iter().collect(),
            TabLayout::MasterDetail {
                master_columns,
                detail_columns,
                ..
            } => master_columns.iter().chain(detail_columns).collect(),
        };
        assert!(columns.iter().any(|c| c.accessor_key == "id"));
        for column in columns {
            assert!(
                column.accessor_key == "id" || !is_system_field(&column.accessor_key),
                "system field {} leaked into {}",
                column.accessor_key,
                tab.id
            );
        }
    }
}

#[test]
fn test_register_action_for_master_detail_navigates() {
    let module = order_module();
    let action = module.create_action().unwrap();
    assert_eq!(action.action, ActionMode::Navigation);
    assert_eq!(action.page_name, "SalesOrderRegisterPage");
    assert_eq!(action.title, "주문 관리 등록");
    assert_eq!(action.hook_name, "useOrder");
    assert_eq!(action.path.as_deref(), Some("/sales/order/register"));

    let names: Vec<_> = action.form_fields.iter().map(|f| f.name.as_str()).collect();
    assert!(!names.contains(&"id"));
    assert!(!names.contains(&"createdAt"));
    assert!(names.contains(&"orderCode"));

    let by_name = |n: &str| action.form_fields.iter().find(|f| f.name == n).unwrap();
    assert!(by_name("orderCode").required);
    assert_eq!(by_name("orderCode").label, "주문코드");
    assert_eq!(by_name("vendorTel").kind, "tel");
    assert_eq!(by_name("vendorTel").mask.as_deref(), Some(PHONE_MASK));
    assert!(by_name("vendorTel").mask_auto_detect);
    assert_eq!(by_name("businessNo").mask.as_deref(), Some(LICENSE_MASK));
    assert!(!by_name("businessNo").mask_auto_detect);
    assert_eq!(by_name("email").kind, "email");
    assert_eq!(by_name("email").pattern.as_deref(), Some(EMAIL_PATTERN));
    assert_eq!(by_name("memo").kind, "textarea");
    assert_eq!(by_name("memo").rows, Some(3));
    assert_eq!(by_name("dueAt").kind, "datetime-local");
    assert_eq!(by_name("quantity").kind, "number");
    assert_eq!(by_name("quantity").placeholder, "10");
}

#[test]
fn test_register_action_for_single_page_is_modal() {
    let doc = ApiDocument::new(json!({
        "paths": { "/vendor": {
            "get": {},
            "post": { "requestBody": { "content": { "application/json": { "schema": {
                "type": "object", "properties": { "vendorName": { "type": "string" } }
            } } } } }
        } }
    }));
    let entities = extract_entities(&doc);
    let module = ModuleConfigBuilder::new(&doc, Heuristics::default()).build(&entities[0], "sales");
    assert_eq!(module.page_type, PageType::SinglePage);
    assert_eq!(module.tabs.len(), 1);
    assert_eq!(module.tabs[0].name, "현황");
    let action = module.create_action().unwrap();
    assert_eq!(action.action, ActionMode::Modal);
    assert!(action.path.is_none());
    assert_eq!(module.menu_options.unwrap().to, "/sales/vendor/list");
}

#[test]
fn test_read_only_entity_has_no_actions() {
    let doc = ApiDocument::new(json!({ "paths": { "/report/list": { "get": {} } } }));
    let entities = extract_entities(&doc);
    let module = ModuleConfigBuilder::new(&doc, Heuristics::default()).build(&entities[0], "ops");
    assert!(module.actions.is_empty());
    assert_eq!(module.name, "report 관리");
    assert_eq!(module.menu_options.unwrap().icon, "TableProperties");
}

#[test]
fn test_search_fields_are_capped_and_skip_system_fields() {
    let module = order_module();
    let list = &module.tabs[1];
    assert_eq!(
        list.search_options.fields,
        vec!["orderCode", "orderDate", "status"]
    );

    let slots: Vec<_> = list
        .search_slot_fields
        .iter()
        .map(|f| (f.name.as_str(), f.kind.as_str()))
        .collect();
    assert_eq!(
        slots,
        vec![("orderCode", "text"), ("status", "select"), ("orderDate", "date")]
    );
    let status = list.search_slot_fields.iter().find(|f| f.name == "status").unwrap();
    assert_eq!(status.options.as_ref().unwrap().len(), 2);
}

#[test]
fn test_solution_output_is_deterministic() {
    let doc = order_doc();
    let entities = extract_entities(&doc);
    let builder = ModuleConfigBuilder::new(&doc, Heuristics::default());
    let first = serde_json::to_string_pretty(&builder.build_solution("sales", &entities)).unwrap();
    for _ in 0..3 {
        let again =
            serde_json::to_string_pretty(&builder.build_solution("sales", &entities)).unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn test_module_keys_are_camel_case_and_unique() {
    let doc = ApiDocument::new(json!({ "paths": {
        "/tax-invoice": { "get": {} },
        "/tax_invoice": { "get": {} }
    } }));
    let entities = extract_entities(&doc);
    let solution = ModuleConfigBuilder::new(&doc, Heuristics::default()).build_solution("sales", &entities);
    let keys: Vec<_> = solution.modules.keys().cloned().collect();
    assert_eq!(keys, vec!["taxInvoice", "taxInvoice_1"]);
    assert_eq!(solution.modules["taxInvoice"].name, "세금계산서");
}

#[test]
fn test_module_config_serializes_camel_case() {
    let module = order_module();
    let value = serde_json::to_value(&module).unwrap();
    assert_eq!(value["pageType"], "masterDetailPage");
    let tab = &value["tabs"][0];
    assert_eq!(tab["type"], "masterDetailPage");
    assert_eq!(tab["default"], true);
    assert!(tab["masterColumns"].is_array());
    assert_eq!(tab["masterDataHook"], "useOrderMaster");
    assert!(tab.get("columns").is_none());
    assert_eq!(value["actions"][0]["type"], "create");
    assert_eq!(value["actions"][0]["action"], "navigation");
    assert!(value.get("fieldApi").is_none());

    let parsed: ModuleConfig = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, module);
}

#[test]
fn test_column_sizes() {
    assert_eq!(column_size(&field("id")), 80);
    assert_eq!(column_size(&field("orderDate")), 150);
    assert_eq!(column_size(&field("startTime")), 150);
    assert_eq!(column_size(&field("status")), 100);
    assert_eq!(column_size(&field("code")), 120);
    let sized = |max: u64| FieldInfo {
        max_length: Some(max),
        ..field("remark")
    };
    assert_eq!(column_size(&sized(5)), 100);
    assert_eq!(column_size(&sized(20)), 160);
    assert_eq!(column_size(&sized(1000)), 300);
    assert_eq!(column_size(&field("remark")), 150);

    let columns = build_columns(&[field("id")]);
    assert_eq!(columns[0].min_size, Some(60));
}

#[test]
fn test_labels_and_placeholders() {
    assert_eq!(field_label("id"), "ID");
    assert_eq!(field_label("unitPrice"), "단가");
    assert_eq!(field_label("remark"), "Remark");

    assert_eq!(placeholder("contactEmail", None), "example@company.com");
    assert_eq!(placeholder("mobilePhone", None), "010-0000-0000");
    assert_eq!(placeholder("faxNumber", None), "02-0000-0000");
    assert_eq!(placeholder("zipCode", None), "12345");
    assert_eq!(placeholder("orderDate", None), "YYYY-MM-DD");
    assert_eq!(placeholder("remark", Some("비고")), "비고");
    assert_eq!(placeholder("code", None), "코드을(를) 입력하세요");
}

#[test]
fn test_unresolved_property_ref_is_skipped() {
    let doc = ApiDocument::new(json!({ "paths": {}, "components": { "schemas": {} } }));
    let schema = json!({ "properties": {
        "name": { "type": "string" },
        "vendor": { "$ref": "#/components/schemas/Missing" }
    } });
    let infos = field_infos(&doc, &schema);
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[0].name, "name");
}

#[test]
fn test_field_kind_normalization() {
    let info = FieldInfo::from_property(
        "count",
        &json!({ "type": "integer", "enum": [1, 2] }),
        true,
    );
    assert_eq!(info.kind, FieldKind::Number);
    assert_eq!(info.enum_values, Some(vec!["1".to_string(), "2".to_string()]));
    assert!(info.required);
    assert_eq!(FieldKind::from_schema_type(None), FieldKind::String);
}
