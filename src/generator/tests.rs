#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::module_config::{ActionMode, ColumnSpec, FormFieldSpec, SolutionConfig};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn sales_config() -> SolutionConfig {
    serde_json::from_value(json!({
        "modules": {
            "order": {
                "name": "주문 관리",
                "path": "sales/order",
                "route": "/sales/order",
                "pageType": "masterDetailPage",
                "tabs": [
                    {
                        "id": "list", "name": "목록", "type": "singlePage",
                        "path": "/sales/order/list", "pageName": "SalesOrderListPage",
                        "icon": "Table", "default": true,
                        "searchOptions": { "fields": ["orderCode", "status"] },
                        "columns": [
                            { "accessorKey": "orderCode", "header": "주문코드", "size": 120 },
                            { "accessorKey": "orderDate", "header": "주문일", "size": 150 }
                        ],
                        "dataHook": "useOrder"
                    },
                    {
                        "id": "related-list", "name": "상세 목록", "type": "masterDetailPage",
                        "path": "/sales/order/related-list", "pageName": "SalesOrderMasterDetailPage",
                        "icon": "Sparkles",
                        "masterColumns": [ { "accessorKey": "orderCode", "header": "주문코드", "size": 120 } ],
                        "detailColumns": [ { "accessorKey": "itemName", "header": "품목명", "size": 150 } ],
                        "masterDataHook": "useOrderMaster",
                        "detailDataHook": "useOrderDetail"
                    }
                ],
                "actions": [
                    {
                        "type": "create", "action": "navigation",
                        "pageName": "SalesOrderRegisterPage", "title": "주문 등록",
                        "hookName": "useOrder", "path": "/sales/order/register",
                        "formFields": [
                            { "name": "orderCode", "label": "주문코드", "type": "text", "required": true },
                            { "name": "memo", "label": "", "type": "textarea" }
                        ]
                    },
                    { "type": "edit", "action": "navigation", "pageName": "SalesOrderEditPage" }
                ]
            },
            "customer": {
                "name": "고객 관리",
                "path": "sales/customer",
                "route": "/sales/customer",
                "tabs": [
                    {
                        "id": "list", "name": "목록", "type": "singlePage",
                        "path": "/sales/customer/list", "pageName": "SalesCustomerListPage",
                        "dataHook": "useCustomer"
                    }
                ],
                "actions": [
                    { "type": "create", "action": "modal", "pageName": "SalesCustomerRegisterPage" }
                ],
                "fieldApi": true,
                "customSelect": { "placeholder": "고객 선택" }
            }
        }
    }))
    .unwrap()
}

fn relative_paths(project: &Path, emission: &SolutionEmission) -> Vec<String> {
    let mut paths: Vec<String> = emission
        .files
        .iter()
        .map(|f| {
            f.path
                .strip_prefix(project)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    paths.sort();
    paths
}

fn content_of<'a>(emission: &'a SolutionEmission, suffix: &str) -> &'a str {
    &emission
        .files
        .iter()
        .find(|f| f.path.to_string_lossy().replace('\\', "/").ends_with(suffix))
        .unwrap_or_else(|| panic!("no file ending in {suffix}"))
        .content
}

#[test]
fn test_emit_solution_file_set() {
    let project = Path::new("/project");
    let overrides = TemplateOverrides::none();
    let emitter = Emitter::new(project, &overrides, WriteOptions::default());
    let emission = emitter.emit_solution("sales", &sales_config());

    assert!(emission.errors.is_empty(), "{:?}", emission.errors);
    assert_eq!(
        relative_paths(project, &emission),
        vec![
            "src/components/customSelect/CustomerSelectComponent.tsx",
            "src/hooks/sales/customer/useCustomerFieldQuery.ts",
            "src/pages/sales/customer/SalesCustomerListPage.tsx",
            "src/pages/sales/customer/SalesCustomerRegisterPage.tsx",
            "src/pages/sales/order/SalesOrderListPage.tsx",
            "src/pages/sales/order/SalesOrderMasterDetailPage.tsx",
            "src/pages/sales/order/SalesOrderRegisterPage.tsx",
            "src/routes/SalesRoute.tsx",
            "src/tabs/sales/CustomerTabNavigation.tsx",
            "src/tabs/sales/OrderTabNavigation.tsx",
        ]
    );
    assert_eq!(emission.pages, 5);
    assert_eq!(emission.tab_navigations, 2);
    assert_eq!(emission.routes, 1);
    assert_eq!(
        emission.custom_selects,
        vec![CustomSelectEntry {
            component_name: "CustomerSelectComponent".to_string(),
            type_name: "customerSelect".to_string(),
        }]
    );

    assert_eq!(emission.service_snippets.len(), 1);
    let snippet = &emission.service_snippets[0];
    assert_eq!(
        snippet.path,
        project.join("src/services/sales/customerService.ts")
    );
    assert!(snippet.code.contains("getFieldValues"));
    assert!(snippet.code.contains("/sales/customer/fields/${fieldName}"));
}

#[test]
fn test_rendered_pages_carry_identifiers() {
    let overrides = TemplateOverrides::none();
    let emitter = Emitter::new(Path::new("p"), &overrides, WriteOptions::default());
    let emission = emitter.emit_solution("sales", &sales_config());

    let list = content_of(&emission, "SalesOrderListPage.tsx");
    assert!(list.contains("export const SalesOrderListPage"));
    assert!(list.contains("import { useOrder } from '@primes/hooks';"));
    assert!(list.contains(r#"["orderCode", "status"]"#));
    assert!(list.contains("toLocaleDateString('ko-KR')"));

    let master = content_of(&emission, "SalesOrderMasterDetailPage.tsx");
    assert!(master.contains("interface SalesOrderMasterData"));
    assert!(master.contains("SalesOrderDetailData"));
    assert!(master.contains("useOrderDetail"));

    // navigation create actions get the full register page
    let register = content_of(&emission, "SalesOrderRegisterPage.tsx");
    assert!(register.contains("interface SalesOrderRegisterData"));
    assert!(register.contains("\"placeholder\": \"memo을(를) 입력하세요\""));
    assert!(register.contains("\"rows\": 3"));

    let modal = content_of(&emission, "SalesCustomerRegisterPage.tsx");
    assert!(modal.contains("onClose"));
    assert!(modal.contains("고객 관리 등록"));
}

#[test]
fn test_tab_navigation_register_modes() {
    let overrides = TemplateOverrides::none();
    let emitter = Emitter::new(Path::new("p"), &overrides, WriteOptions::default());
    let emission = emitter.emit_solution("sales", &sales_config());

    let order = content_of(&emission, "OrderTabNavigation.tsx");
    assert!(order.contains("navigate('/sales/order/register');"));
    assert!(order.contains("import { Plus, Table, TableProperties } from 'lucide-react';"));
    assert!(!order.contains("Sparkles"));
    assert!(order.contains("activetab ?? 'list'"));

    let customer = content_of(&emission, "CustomerTabNavigation.tsx");
    assert!(customer.contains("<DraggableDialog"));
    assert!(customer
        .contains("import { SalesCustomerListPage, SalesCustomerRegisterPage } from '@primes/pages';"));
}

#[test]
fn test_tab_navigation_imports_follow_register_mode() {
    let mut config = sales_config();
    let mut plain = config.modules["customer"].clone();
    plain.actions.clear();
    plain.field_api = false;
    plain.custom_select = None;
    config.modules.insert("vendor".to_string(), plain);

    let overrides = TemplateOverrides::none();
    let emitter = Emitter::new(Path::new("p"), &overrides, WriteOptions::default());
    let emission = emitter.emit_solution("sales", &config);

    let order = content_of(&emission, "OrderTabNavigation.tsx");
    assert!(order.contains("import { useNavigate } from 'react-router-dom';"));
    assert!(!order.contains("useState"));
    assert!(!order.contains("DraggableDialog"));

    let customer = content_of(&emission, "CustomerTabNavigation.tsx");
    assert!(customer.contains("import { useState } from 'react';"));
    assert!(!customer.contains("useNavigate"));

    let vendor = content_of(&emission, "VendorTabNavigation.tsx");
    for unused in ["useState", "useNavigate", "DraggableDialog", "RadixButton", "Plus"] {
        assert!(!vendor.contains(unused), "{unused} in\n{vendor}");
    }
}

#[test]
fn test_modal_action_picks_modal_register_on_master_detail() {
    let mut config = sales_config();
    let order = config.modules.get_mut("order").unwrap();
    order.actions[0].action = ActionMode::Modal;

    let overrides = TemplateOverrides::none();
    let emitter = Emitter::new(Path::new("p"), &overrides, WriteOptions::default());
    let emission = emitter.emit_solution("sales", &config);

    let register = content_of(&emission, "SalesOrderRegisterPage.tsx");
    assert!(register.contains("onClose"));
    assert!(!register.contains("RegisterFormTemplate"));
}

#[test]
fn test_list_page_without_read_schema_has_no_system_columns() {
    use crate::entity::extract_entities;
    use crate::module_config::ModuleConfigBuilder;
    use crate::settings::Heuristics;
    use crate::source::ApiDocument;

    let doc = ApiDocument::new(json!({
        "paths": {
            "/widget": {
                "post": {
                    "tags": ["widget"],
                    "requestBody": { "content": { "application/json": { "schema": {
                        "type": "object",
                        "properties": { "widgetName": { "type": "string" } }
                    } } } }
                }
            }
        },
        "components": { "schemas": {} }
    }));
    let entities = extract_entities(&doc);
    let config = ModuleConfigBuilder::new(&doc, Heuristics::default()).build_solution("sales", &entities);

    let overrides = TemplateOverrides::none();
    let emitter = Emitter::new(Path::new("p"), &overrides, WriteOptions::default());
    let emission = emitter.emit_solution("sales", &config);

    let list = content_of(&emission, "SalesWidgetListPage.tsx");
    assert!(list.contains("accessorKey: \"name\""));
    assert!(!list.contains("createdAt"));
    assert!(!list.contains("updatedAt"));
}

#[test]
fn test_routes_children_follow_actions() {
    let routes = routes_template("sales", &sales_config());
    assert_eq!(routes.routes_const, "SalesRoutes");
    assert_eq!(
        routes.tab_imports,
        vec!["CustomerTabNavigation", "OrderTabNavigation"]
    );
    assert_eq!(
        routes.page_imports,
        vec!["SalesOrderRegisterPage", "SalesOrderEditPage"]
    );

    let order = routes
        .routes
        .iter()
        .find(|r| r.path == "/sales/order")
        .unwrap();
    let children: Vec<(&str, &str)> = order
        .children
        .iter()
        .map(|c| (c.path.as_str(), c.element.as_str()))
        .collect();
    assert_eq!(
        children,
        vec![
            ("list", "<OrderTabNavigation activetab=\"list\" />"),
            (
                "related-list",
                "<OrderTabNavigation activetab=\"related-list\" />"
            ),
            ("register", "<SalesOrderRegisterPage />"),
            (":id", "<SalesOrderEditPage />"),
        ]
    );

    // modal create actions add no child route
    let customer = routes
        .routes
        .iter()
        .find(|r| r.path == "/sales/customer")
        .unwrap();
    assert_eq!(customer.children.len(), 1);
}

#[test]
fn test_columns_literal_defaults_and_cells() {
    let defaults = columns_literal(&[]);
    for key in ["id", "name", "code", "status"] {
        assert!(defaults.contains(&format!("accessorKey: \"{key}\"")));
    }
    for key in ["createdAt", "updatedAt"] {
        assert!(!defaults.contains(key));
    }

    let columns = vec![
        ColumnSpec {
            accessor_key: "id".to_string(),
            header: "ID".to_string(),
            size: 80,
            min_size: Some(60),
        },
        ColumnSpec {
            accessor_key: "totalAmount".to_string(),
            header: "금액".to_string(),
            size: 120,
            min_size: None,
        },
    ];
    let literal = columns_literal(&columns);
    assert!(literal.contains("minSize: 60,"));
    assert_eq!(literal.matches("toLocaleString()").count(), 1);
}

#[test]
fn test_info_grid_keys() {
    let column = |key: &str| ColumnSpec {
        accessor_key: key.to_string(),
        header: key.to_string(),
        size: 100,
        min_size: None,
    };
    let keys: Vec<String> = info_grid_keys(&[
        column("orderCode"),
        column("description"),
        column("orderDetailsList"),
        column("status"),
    ])
    .into_iter()
    .map(|(k, _)| k)
    .collect();
    assert_eq!(keys, vec!["id", "orderCode", "status", "createdAt"]);

    let many: Vec<ColumnSpec> = (0..10).map(|i| column(&format!("field{i}"))).collect();
    assert_eq!(info_grid_keys(&many).len(), INFO_GRID_MAX_KEYS);
    assert_eq!(info_grid_keys(&[]).len(), INFO_GRID_MAX_KEYS);
}

#[test]
fn test_form_schema_literal_fills_defaults() {
    let field = |name: &str, kind: &str| FormFieldSpec {
        name: name.to_string(),
        label: String::new(),
        kind: kind.to_string(),
        placeholder: String::new(),
        required: false,
        max_length: None,
        min_length: None,
        mask: None,
        mask_auto_detect: false,
        pattern: None,
        options: None,
        rows: None,
    };
    let literal = form_schema_literal(&[field("qty", "number"), field("memo", "textarea")]);
    let parsed: Value = serde_json::from_str(&literal).unwrap();
    assert_eq!(parsed[0]["label"], "qty");
    assert_eq!(parsed[0]["min"], 0);
    assert_eq!(parsed[1]["rows"], 3);
    assert_eq!(parsed[1]["placeholder"], "memo을(를) 입력하세요");

    let defaults: Value = serde_json::from_str(&form_schema_literal(&[])).unwrap();
    assert_eq!(defaults.as_array().unwrap().len(), 4);
}

#[test]
fn test_tab_icon_fallback() {
    assert_eq!(tab_icon("ChartPie"), "ChartPie");
    assert_eq!(tab_icon("Rocket"), FALLBACK_ICON);
}

#[test]
fn test_override_replaces_builtin() {
    let mut overrides = TemplateOverrides::none();
    overrides.insert("single_page.tsx", "// {{ page_name }} via {{ data_hook }}");
    assert!(overrides.is_overridden("single_page.tsx"));

    let emitter = Emitter::new(Path::new("p"), &overrides, WriteOptions::default());
    let emission = emitter.emit_solution("sales", &sales_config());
    assert_eq!(
        content_of(&emission, "SalesCustomerListPage.tsx"),
        "// SalesCustomerListPage via useCustomer"
    );
    // other templates still come from the built-ins
    assert!(content_of(&emission, "SalesRoute.tsx").contains("export const SalesRoutes"));
}

#[test]
fn test_override_with_unknown_placeholder_fails() {
    let mut overrides = TemplateOverrides::none();
    overrides.insert("routes.tsx", "{{ no_such_value }}");
    let emitter = Emitter::new(Path::new("p"), &overrides, WriteOptions::default());
    let emission = emitter.emit_solution("sales", &sales_config());

    assert_eq!(emission.routes, 0);
    assert_eq!(emission.errors.len(), 1);
    assert!(emission.errors[0].starts_with("sales routes"));
}

#[test]
fn test_overrides_load_only_j2_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("single_page.tsx.j2"), "x").unwrap();
    fs::write(dir.path().join("notes.txt"), "y").unwrap();
    let overrides = TemplateOverrides::load(dir.path()).unwrap();
    assert_eq!(overrides.len(), 1);
    assert!(overrides.is_overridden("single_page.tsx"));
}

#[test]
fn test_generate_from_solution_configs() {
    let root = tempdir().unwrap();
    let configs = root.path().join("configs");
    let project = root.path().join("app");
    fs::create_dir_all(&configs).unwrap();
    fs::write(
        configs.join("sales.json"),
        serde_json::to_string(&sales_config()).unwrap(),
    )
    .unwrap();
    fs::write(configs.join("broken.json"), "{ not json").unwrap();
    fs::write(
        root.path().join("config.json"),
        json!({ "analysisPages": { "sales": {} }, "stale": true }).to_string(),
    )
    .unwrap();

    let options = GenerateOptions {
        configs_dir: configs.clone(),
        project_dir: project.clone(),
        write: WriteOptions::default(),
        overrides: TemplateOverrides::none(),
    };
    let stats = generate_from_solution_configs(&options).unwrap();
    assert_eq!(stats.solutions, 1);
    assert_eq!(stats.pages, 5);
    assert_eq!(stats.tab_navigations, 2);
    assert_eq!(stats.routes, 1);
    assert_eq!(stats.errors, 0);

    let index = fs::read_to_string(project.join("src/components/customSelect/index.ts")).unwrap();
    assert!(index.starts_with("export { CustomerSelectComponent }"));

    let merged: Value =
        serde_json::from_str(&fs::read_to_string(root.path().join("config.json")).unwrap())
            .unwrap();
    assert_eq!(merged["solutions"], json!(["sales"]));
    assert_eq!(merged["analysisPages"], json!({ "sales": {} }));
    assert!(merged.get("stale").is_none());
    assert_eq!(merged["templates"]["singlePage"]["type"], "singlePage");
    assert!(merged["sales"]["modules"]["order"].is_object());

    // a second run backs up every page it overwrites
    generate_from_solution_configs(&options).unwrap();
    let backups = walkdir::WalkDir::new(project.join("src/pages"))
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().contains(".backup."))
        .count();
    assert_eq!(backups, 5);
}

#[test]
fn test_merged_config_path() {
    assert_eq!(
        merged_config_path(Path::new("script/configs")),
        Path::new("script/config.json")
    );
    assert_eq!(merged_config_path(Path::new("configs")), Path::new("config.json"));
}

#[test]
fn test_analysis_pages_defaults_and_paths() {
    let root = tempdir().unwrap();
    let config = root.path().join("config.json");
    fs::write(
        &config,
        json!({
            "analysisPages": {
                "sales": {
                    "order": {
                        "path": "sales/analysis/OrderAnalysisPage",
                        "component": "OrderAnalysisPage",
                        "additionalProps": { "showLegend": true, "unit": "KRW" }
                    },
                    "bad": { "component": "MissingPath" }
                }
            }
        })
        .to_string(),
    )
    .unwrap();

    let pages = load_analysis_pages(&config);
    let order = &pages["sales"]["order"];
    assert_eq!(order.chart_type, "line");
    assert_eq!(order.time_range, "weekly");
    assert_eq!(order.chart_title, "");
    assert_eq!(order.domain, "sales");
    assert_eq!(order.data_type, "order");
    assert_eq!(pages["sales"].len(), 1);

    let (files, errors) = emit_analysis_pages(
        root.path(),
        &pages,
        &TemplateOverrides::none(),
        WriteOptions::default(),
    );
    assert_eq!(errors, 0);
    assert_eq!(
        files[0].path,
        root.path().join("src/pages/sales/analysis/OrderAnalysisPage.tsx")
    );
    assert!(files[0].content.contains("showLegend={true}"));
    assert!(files[0].content.contains("unit=\"KRW\""));
    assert!(files[0].content.contains("chartType=\"line\""));
}
