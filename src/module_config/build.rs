use super::fields::{
    build_columns, build_form_fields, build_search_fields, build_search_slot_fields, field_infos,
};
use super::types::{
    ActionConfig, ActionMode, ActionType, MenuOptions, ModuleConfig, PageType, SearchOptions,
    SolutionConfig, TabConfig, TabLayout, TableControl,
};
use crate::entity::{classify, create_endpoint, Endpoint, Entity, Method, TabPattern};
use crate::naming::{hook_name, hook_name_with_suffix, page_base_name, to_camel_case, unique_name};
use crate::settings::Heuristics;
use crate::source::ApiDocument;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Tab kinds a pattern can expand into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TabKind {
    RelatedList,
    List,
    Analyze,
}

struct TabTemplate {
    kind: TabKind,
    id: &'static str,
    name: &'static str,
    page_type: PageType,
    icon: &'static str,
    is_default: bool,
}

const LIST_TAB: TabTemplate = TabTemplate {
    kind: TabKind::List,
    id: "list",
    name: "현황",
    page_type: PageType::SinglePage,
    icon: "TableProperties",
    is_default: true,
};

const RELATED_LIST_TAB: TabTemplate = TabTemplate {
    kind: TabKind::RelatedList,
    id: "related-list",
    name: "상세 목록",
    page_type: PageType::MasterDetailPage,
    icon: "Table",
    is_default: true,
};

const OVERALL_LIST_TAB: TabTemplate = TabTemplate {
    kind: TabKind::List,
    id: "list",
    name: "전체 현황",
    page_type: PageType::SinglePage,
    icon: "FileText",
    is_default: false,
};

const ANALYZE_TAB: TabTemplate = TabTemplate {
    kind: TabKind::Analyze,
    id: "analyze",
    name: "분석",
    page_type: PageType::SinglePage,
    icon: "ChartPie",
    is_default: false,
};

const MODULE_NAMES: &[(&str, &str)] = &[
    ("order", "주문 관리"),
    ("estimate", "견적 관리"),
    ("delivery", "납품 관리"),
    ("shipment", "출하 관리"),
    ("shipping", "출하 관리"),
    ("taxinvoice", "세금계산서"),
    ("statement", "명세서"),
    ("user", "사용자 관리"),
    ("vendor", "거래처 관리"),
    ("item", "품목 관리"),
    ("customer", "고객 관리"),
];

const MODULE_ICONS: &[(&str, &str)] = &[
    ("order", "ShoppingCart"),
    ("estimate", "FileText"),
    ("delivery", "Truck"),
    ("shipment", "Package"),
    ("shipping", "Package"),
    ("taxinvoice", "Receipt"),
    ("statement", "FileText"),
    ("user", "Users"),
    ("vendor", "Building"),
    ("item", "Package"),
    ("customer", "UserCheck"),
];

const DEFAULT_MODULE_ICON: &str = "TableProperties";

const MASTER_PATH_HINTS: &[&str] = &["/master", "/list", "", "/search", "/all"];
const DETAIL_PATH_HINTS: &[&str] = &["/detail", "/{id}", "/by-master-id"];

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    let key = key.to_lowercase().replace(['-', '_'], "");
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Korean display name of a module.
pub fn module_display_name(entity: &str) -> String {
    lookup(MODULE_NAMES, entity)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{entity} 관리"))
}

pub fn module_icon(entity: &str) -> &'static str {
    lookup(MODULE_ICONS, entity).unwrap_or(DEFAULT_MODULE_ICON)
}

/// Expands classified entities into [`ModuleConfig`]s.
///
/// The builder borrows the document so every schema lookup resolves `$ref`s
/// against the same components table the entity came from.
pub struct ModuleConfigBuilder<'a> {
    doc: &'a ApiDocument,
    heuristics: Heuristics,
}

impl<'a> ModuleConfigBuilder<'a> {
    pub fn new(doc: &'a ApiDocument, heuristics: Heuristics) -> Self {
        Self { doc, heuristics }
    }

    /// Build every module of a solution, keyed by camelCase entity name.
    ///
    /// Entity names that collapse to the same key get `_1`, `_2`... suffixes.
    pub fn build_solution(&self, solution: &str, entities: &[Entity]) -> SolutionConfig {
        let mut seen = HashSet::new();
        let mut config = SolutionConfig::default();
        for entity in entities {
            let key = unique_name(&mut seen, &to_camel_case(&entity.name));
            let module = self.build(entity, solution);
            debug!(solution, module = %key, tabs = module.tabs.len(), "module built");
            config.modules.insert(key, module);
        }
        config
    }

    /// Build the module of one entity.
    pub fn build(&self, entity: &Entity, solution: &str) -> ModuleConfig {
        let pattern = classify(self.doc, entity, &self.heuristics);
        let route = format!("/{solution}/{}", entity.name);
        let name = module_display_name(&entity.name);

        let tabs = self
            .tab_templates(pattern)
            .into_iter()
            .map(|template| self.build_tab(template, entity, solution, &name, &route))
            .collect();

        let actions = self
            .build_create_action(entity, solution, &name, pattern)
            .into_iter()
            .collect();

        let landing = if pattern.is_master_detail() {
            "related-list"
        } else {
            "list"
        };

        ModuleConfig {
            name,
            path: format!("{solution}/{}", entity.name),
            page_type: if pattern.is_master_detail() {
                PageType::MasterDetailPage
            } else {
                PageType::SinglePage
            },
            tabs,
            actions,
            menu_options: Some(MenuOptions {
                kind: "single".to_string(),
                icon: module_icon(&entity.name).to_string(),
                name: format!("menu.{solution}_{}", entity.name),
                to: format!("{route}/{landing}"),
            }),
            route,
            field_api: false,
            custom_select: None,
        }
    }

    fn tab_templates(&self, pattern: TabPattern) -> Vec<&'static TabTemplate> {
        match pattern {
            TabPattern::SingleOnly | TabPattern::SingleWithRegister => vec![&LIST_TAB],
            TabPattern::MasterDetailSimple => vec![&RELATED_LIST_TAB, &OVERALL_LIST_TAB],
            TabPattern::MasterDetailFull if self.heuristics.analyze_tab => {
                vec![&RELATED_LIST_TAB, &OVERALL_LIST_TAB, &ANALYZE_TAB]
            }
            TabPattern::MasterDetailFull => vec![&RELATED_LIST_TAB, &OVERALL_LIST_TAB],
        }
    }

    fn build_tab(
        &self,
        template: &TabTemplate,
        entity: &Entity,
        solution: &str,
        module_name: &str,
        route: &str,
    ) -> TabConfig {
        let base = page_base_name(solution, &entity.name);
        let (page_suffix, title) = match template.kind {
            TabKind::List => ("ListPage", format!("{module_name} 목록")),
            TabKind::RelatedList => ("MasterDetailPage", format!("{module_name} 상세")),
            TabKind::Analyze => ("AnalyzePage", format!("{module_name} 분석")),
        };
        let analyze = template.kind == TabKind::Analyze;

        let master_fields = self
            .master_schema(entity)
            .map(|schema| field_infos(self.doc, schema))
            .unwrap_or_default();

        let layout = match template.kind {
            TabKind::RelatedList => {
                let detail_fields = self
                    .detail_schema(entity)
                    .map(|schema| field_infos(self.doc, schema))
                    .unwrap_or_default();
                TabLayout::MasterDetail {
                    master_columns: build_columns(&master_fields),
                    detail_columns: build_columns(&detail_fields),
                    master_data_hook: hook_name_with_suffix(&entity.name, "Master"),
                    detail_data_hook: hook_name_with_suffix(&entity.name, "Detail"),
                }
            }
            TabKind::List => TabLayout::Single {
                columns: build_columns(&master_fields),
                data_hook: hook_name(&entity.name),
            },
            TabKind::Analyze => TabLayout::Single {
                columns: Vec::new(),
                data_hook: hook_name_with_suffix(&entity.name, "Analytics"),
            },
        };

        let (search_fields, slot_fields) = if analyze {
            (Vec::new(), Vec::new())
        } else {
            let slots = entity
                .search_schema
                .as_ref()
                .map(|schema| build_search_slot_fields(&field_infos(self.doc, schema)))
                .unwrap_or_default();
            (build_search_fields(&master_fields, &self.heuristics), slots)
        };

        TabConfig {
            id: template.id.to_string(),
            name: template.name.to_string(),
            kind: template.page_type,
            path: format!("{route}/{}", template.id),
            page_name: format!("{base}{page_suffix}"),
            icon: template.icon.to_string(),
            is_default: template.is_default,
            table_control: TableControl {
                title,
                use_edit: !analyze,
                use_delete: !analyze,
                use_export: true,
            },
            search_options: SearchOptions {
                fields: search_fields,
            },
            search_slot_fields: slot_fields,
            layout,
        }
    }

    fn build_create_action(
        &self,
        entity: &Entity,
        solution: &str,
        module_name: &str,
        pattern: TabPattern,
    ) -> Option<ActionConfig> {
        if pattern == TabPattern::SingleOnly {
            return None;
        }
        let endpoint = create_endpoint(entity)?;

        let form_fields = match self.doc.request_schema(&endpoint.operation) {
            Some(schema) => build_form_fields(&field_infos(self.doc, schema), &self.heuristics),
            None => {
                warn!(entity = %entity.name, path = %endpoint.path, "create request schema not found");
                Vec::new()
            }
        };

        let mode = if pattern.is_master_detail() {
            ActionMode::Navigation
        } else {
            ActionMode::Modal
        };

        Some(ActionConfig {
            kind: ActionType::Create,
            action: mode,
            page_name: format!("{}RegisterPage", page_base_name(solution, &entity.name)),
            title: format!("{module_name} 등록"),
            hook_name: hook_name(&entity.name),
            form_fields,
            path: (mode == ActionMode::Navigation)
                .then(|| format!("/{solution}/{}/register", entity.name)),
        })
    }

    /// Record schema of the entity's list endpoint.
    pub fn master_schema(&self, entity: &Entity) -> Option<&'a Value> {
        let own = entity.own_path();
        let endpoint = MASTER_PATH_HINTS.iter().find_map(|hint| {
            entity.endpoints_with(Method::Get).find(|e| {
                let matches = if hint.is_empty() {
                    e.path == own || e.path.ends_with(&own)
                } else {
                    e.path.contains(hint)
                };
                matches
                    && !e.path.contains("/fields/")
                    && !e.path.contains("/{id}")
                    && !e.path.contains("/detail")
            })
        });
        self.record_schema(entity, endpoint, "master")
    }

    /// Record schema of the entity's detail endpoint.
    pub fn detail_schema(&self, entity: &Entity) -> Option<&'a Value> {
        let endpoint = DETAIL_PATH_HINTS.iter().find_map(|hint| {
            entity
                .endpoints_with(Method::Get)
                .find(|e| e.path.contains(hint) && !e.path.contains("/fields/"))
        });
        self.record_schema(entity, endpoint, "detail")
    }

    fn record_schema(
        &self,
        entity: &Entity,
        endpoint: Option<&Endpoint>,
        role: &str,
    ) -> Option<&'a Value> {
        let Some(endpoint) = endpoint else {
            warn!(entity = %entity.name, role, "no GET endpoint found for schema");
            return None;
        };
        let operation = self.doc.operation(&endpoint.path, &method_key(endpoint.method))?;
        let schema = self.doc.response_record_schema(operation);
        if schema.is_none() {
            warn!(entity = %entity.name, role, path = %endpoint.path, "response schema not found");
        }
        schema
    }
}

fn method_key(method: Method) -> String {
    method.as_str().to_lowercase()
}
