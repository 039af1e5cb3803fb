//! Solution config → rendered files.
//!
//! Everything here is pure: paths are joined onto the project root but nothing
//! touches the filesystem. A template that fails to render is counted and
//! logged, and the rest of the solution is still emitted.

use super::literal::{columns_literal, form_schema_literal, info_grid_literal, string_array};
use super::templates::{
    ChildRoute, CustomSelectEntry, CustomSelectTemplate, FieldApiHookTemplate,
    FieldApiServiceTemplate,
    MasterDetailPageTemplate, NamedTemplate, RegisterFullTemplate, RegisterModalTemplate,
    RouteBlock, RoutesTemplate, SinglePageTemplate, TabItem, TabNavigationTemplate,
    TemplateOverrides,
};
use crate::materialize::{GeneratedFile, WriteOptions};
use crate::module_config::{
    ActionConfig, ActionMode, CustomSelectConfig, ModuleConfig, SolutionConfig,
    TabConfig, TabLayout,
};
use crate::naming::{
    hook_name, routes_const_name, tab_navigation_name, to_camel_case, to_pascal_case,
};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Icons the tab navigation may import from `lucide-react`.
pub const KNOWN_ICONS: &[&str] = &[
    "TableProperties",
    "Table",
    "FileText",
    "ChartPie",
    "Users",
    "Building",
    "ShoppingCart",
    "UserCheck",
    "Package",
    "ShoppingBag",
    "PackageCheck",
    "Calendar",
    "ClipboardList",
    "Wrench",
    "Settings",
    "Activity",
    "History",
];

pub const FALLBACK_ICON: &str = "TableProperties";

/// A tab icon usable in generated code.
pub fn tab_icon(icon: &str) -> &str {
    KNOWN_ICONS
        .iter()
        .find(|known| **known == icon)
        .copied()
        .unwrap_or(FALLBACK_ICON)
}

/// Files and counters for one solution.
#[derive(Debug, Default)]
pub struct SolutionEmission {
    pub files: Vec<GeneratedFile>,
    pub pages: usize,
    pub tab_navigations: usize,
    pub routes: usize,
    /// Render failures, as `"<what>: <error>"`
    pub errors: Vec<String>,
    pub custom_selects: Vec<CustomSelectEntry>,
    pub service_snippets: Vec<ServiceSnippet>,
}

/// Service code the user has to paste by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSnippet {
    /// The service file the snippet belongs in
    pub path: PathBuf,
    pub code: String,
}

impl SolutionEmission {
    fn push(&mut self, path: PathBuf, content: String, options: WriteOptions) {
        self.files
            .push(GeneratedFile::new(path, content).with_options(options));
    }

    fn fail(&mut self, what: String, err: anyhow::Error) {
        error!(item = %what, error = %format!("{err:#}"), "render failed");
        self.errors.push(format!("{what}: {err:#}"));
    }
}

/// Renders one solution's modules against a project root.
pub struct Emitter<'a> {
    project: &'a Path,
    overrides: &'a TemplateOverrides,
    options: WriteOptions,
}

impl<'a> Emitter<'a> {
    pub fn new(project: &'a Path, overrides: &'a TemplateOverrides, options: WriteOptions) -> Self {
        Emitter {
            project,
            overrides,
            options,
        }
    }

    fn render<T: NamedTemplate>(&self, template: &T) -> anyhow::Result<String> {
        self.overrides.render(template)
    }

    /// Pages, register pages, tab navigations, field-API hooks, custom selects
    /// and the route table of `solution`.
    pub fn emit_solution(&self, solution: &str, config: &SolutionConfig) -> SolutionEmission {
        let mut out = SolutionEmission::default();

        for (key, module) in &config.modules {
            for tab in &module.tabs {
                let path = self.page_path(module, &tab.page_name);
                match self.render_page(module, tab) {
                    Ok(content) => {
                        out.push(path, content, self.options);
                        out.pages += 1;
                    }
                    Err(err) => out.fail(format!("{key}/{}", tab.page_name), err),
                }
            }

            if let Some(action) = module.create_action() {
                let path = self.page_path(module, &action.page_name);
                match self.render_register(key, module, action) {
                    Ok(content) => {
                        out.push(path, content, self.options);
                        out.pages += 1;
                    }
                    Err(err) => out.fail(format!("{key}/{}", action.page_name), err),
                }
            }

            if !module.tabs.is_empty() {
                let name = tab_navigation_name(key);
                let path = self
                    .project
                    .join("src/tabs")
                    .join(solution)
                    .join(format!("{name}.tsx"));
                match self.render_tab_navigation(key, module) {
                    Ok(content) => {
                        out.push(path, content, self.options);
                        out.tab_navigations += 1;
                    }
                    Err(err) => out.fail(format!("{key}/{name}"), err),
                }
            }

            if module.field_api {
                match self.render_field_api(solution, key) {
                    Ok((path, content, snippet)) => {
                        out.push(path, content, self.options);
                        out.service_snippets.push(snippet);
                    }
                    Err(err) => out.fail(format!("{key}/fieldApi"), err),
                }
            }

            if let Some(select) = &module.custom_select {
                match self.render_custom_select(key, module, select) {
                    Ok((path, content, entry)) => {
                        out.push(path, content, self.options);
                        out.custom_selects.push(entry);
                    }
                    Err(err) => out.fail(format!("{key}/customSelect"), err),
                }
            }
        }

        let routes_path = self
            .project
            .join("src/routes")
            .join(format!("{}Route.tsx", to_pascal_case(solution)));
        match self.render(&routes_template(solution, config)) {
            Ok(content) => {
                out.push(routes_path, content, self.options);
                out.routes += 1;
            }
            Err(err) => out.fail(format!("{solution} routes"), err),
        }

        debug!(
            solution,
            files = out.files.len(),
            errors = out.errors.len(),
            "solution emitted"
        );
        out
    }

    fn page_path(&self, module: &ModuleConfig, page_name: &str) -> PathBuf {
        self.project
            .join("src/pages")
            .join(&module.path)
            .join(format!("{page_name}.tsx"))
    }

    fn render_page(&self, module: &ModuleConfig, tab: &TabConfig) -> anyhow::Result<String> {
        let title = if tab.table_control.title.is_empty() {
            module.name.clone()
        } else {
            tab.table_control.title.clone()
        };

        match &tab.layout {
            TabLayout::MasterDetail {
                master_columns,
                detail_columns,
                master_data_hook,
                detail_data_hook,
            } => {
                let base = data_type_base(&tab.page_name);
                self.render(&MasterDetailPageTemplate {
                    page_name: tab.page_name.clone(),
                    master_type: format!("{base}MasterData"),
                    detail_type: format!("{base}DetailData"),
                    master_columns: columns_literal(master_columns),
                    detail_columns: columns_literal(detail_columns),
                    info_grid_keys: info_grid_literal(master_columns),
                    master_hook: master_data_hook.clone(),
                    detail_hook: detail_data_hook.clone(),
                    detail_title: format!("{title} 상세"),
                    master_title: title,
                })
            }
            TabLayout::Single { columns, data_hook } => self.render(&SinglePageTemplate {
                page_name: tab.page_name.clone(),
                columns: columns_literal(columns),
                search_fields: string_array(&tab.search_options.fields),
                data_hook: data_hook.clone(),
                table_title: title,
                use_edit: tab.table_control.use_edit,
                use_delete: tab.table_control.use_delete,
                use_export: tab.table_control.use_export,
            }),
        }
    }

    fn render_register(
        &self,
        key: &str,
        module: &ModuleConfig,
        action: &ActionConfig,
    ) -> anyhow::Result<String> {
        let data_type = format!(
            "{}Data",
            action
                .page_name
                .strip_suffix("Page")
                .unwrap_or(&action.page_name)
        );
        let hook = if action.hook_name.is_empty() {
            hook_name(key)
        } else {
            action.hook_name.clone()
        };
        let title = register_title(module, action);
        let form_schema = form_schema_literal(&action.form_fields);

        if action.action == ActionMode::Modal {
            self.render(&RegisterModalTemplate {
                page_name: action.page_name.clone(),
                data_type,
                form_schema,
                hook_name: hook,
                title,
            })
        } else {
            self.render(&RegisterFullTemplate {
                page_name: action.page_name.clone(),
                data_type,
                form_schema,
                hook_name: hook,
                title,
            })
        }
    }

    fn render_tab_navigation(&self, key: &str, module: &ModuleConfig) -> anyhow::Result<String> {
        let items: Vec<TabItem> = module
            .tabs
            .iter()
            .map(|tab| TabItem {
                id: tab.id.clone(),
                icon: tab_icon(&tab.icon).to_string(),
                label: tab.name.clone(),
                to: tab.path.clone(),
                page_name: tab.page_name.clone(),
            })
            .collect();

        let mut icons: Vec<String> = Vec::new();
        for item in &items {
            if !icons.contains(&item.icon) {
                icons.push(item.icon.clone());
            }
        }

        let mut page_imports: Vec<String> = items.iter().map(|i| i.page_name.clone()).collect();
        let create = module.create_action();
        let (register_mode, register_page, register_path) = match create {
            Some(action) if action.action == ActionMode::Modal => {
                page_imports.push(action.page_name.clone());
                ("modal", action.page_name.clone(), String::new())
            }
            Some(action) => (
                "navigation",
                action.page_name.clone(),
                action
                    .path
                    .clone()
                    .unwrap_or_else(|| format!("{}/register", module.route)),
            ),
            None => ("none", String::new(), String::new()),
        };
        page_imports.dedup();

        let template = TabNavigationTemplate {
            component_name: tab_navigation_name(key),
            title: module.name.clone(),
            items,
            icons,
            page_imports,
            default_tab: module
                .default_tab()
                .map(|t| t.id.clone())
                .unwrap_or_default(),
            register_mode: register_mode.to_string(),
            register_title: create
                .map(|a| register_title(module, a))
                .unwrap_or_default(),
            register_page,
            register_path,
        };
        self.render(&template)
    }

    fn render_field_api(
        &self,
        solution: &str,
        key: &str,
    ) -> anyhow::Result<(PathBuf, String, ServiceSnippet)> {
        let solution_dir = to_camel_case(solution);
        let module_dir = to_camel_case(key);
        let hook = format!("use{}FieldQuery", to_pascal_case(key));
        let content = self.render(&FieldApiHookTemplate {
            hook_name: hook.clone(),
            service_name: format!("{module_dir}Service"),
            solution: solution_dir.clone(),
            module: module_dir.clone(),
        })?;
        let path = self
            .project
            .join("src/hooks")
            .join(&solution_dir)
            .join(&module_dir)
            .join(format!("{hook}.ts"));
        let snippet = ServiceSnippet {
            code: self.render(&FieldApiServiceTemplate {
                solution: solution_dir.clone(),
                module: module_dir.clone(),
            })?,
            path: self
                .project
                .join("src/services")
                .join(&solution_dir)
                .join(format!("{module_dir}Service.ts")),
        };
        Ok((path, content, snippet))
    }

    fn render_custom_select(
        &self,
        key: &str,
        module: &ModuleConfig,
        options: &CustomSelectConfig,
    ) -> anyhow::Result<(PathBuf, String, CustomSelectEntry)> {
        let component_name = format!("{}SelectComponent", to_pascal_case(key));
        let type_name = format!("{}Select", to_camel_case(key));
        let data_hook = module
            .tabs
            .iter()
            .find_map(|tab| match &tab.layout {
                TabLayout::Single { data_hook, .. } if !data_hook.is_empty() => {
                    Some(data_hook.clone())
                }
                TabLayout::MasterDetail {
                    master_data_hook, ..
                } => Some(master_data_hook.clone()),
                _ => None,
            })
            .unwrap_or_else(|| hook_name(key));

        let content = self.render(&CustomSelectTemplate {
            component_name: component_name.clone(),
            type_name: type_name.clone(),
            data_hook,
            value_key: options.value_key.clone(),
            label_key: options.label_key.clone(),
            placeholder: options
                .placeholder
                .clone()
                .unwrap_or_else(|| format!("{}을(를) 선택하세요", module.name)),
        })?;
        let path = self
            .project
            .join("src/components/customSelect")
            .join(format!("{component_name}.tsx"));
        Ok((
            path,
            content,
            CustomSelectEntry {
                component_name,
                type_name,
            },
        ))
    }
}

/// `OrderMasterDetailPage` → `Order`, `OrderListPage` → `OrderList`.
fn data_type_base(page_name: &str) -> &str {
    page_name
        .strip_suffix("MasterDetailPage")
        .or_else(|| page_name.strip_suffix("Page"))
        .unwrap_or(page_name)
}

fn register_title(module: &ModuleConfig, action: &ActionConfig) -> String {
    if action.title.is_empty() {
        format!("{} 등록", module.name)
    } else {
        action.title.clone()
    }
}

/// The route table of a solution.
///
/// Each module with tabs gets a block at its route with one child per tab.
/// Navigation create and edit actions add `register` and `:id` children.
pub fn routes_template(solution: &str, config: &SolutionConfig) -> RoutesTemplate {
    let mut tab_imports = Vec::new();
    let mut page_imports: Vec<String> = Vec::new();
    let mut routes = Vec::new();

    for (key, module) in &config.modules {
        if module.route.is_empty() || module.tabs.is_empty() {
            continue;
        }
        let nav = tab_navigation_name(key);
        let mut children: Vec<ChildRoute> = module
            .tabs
            .iter()
            .map(|tab| ChildRoute {
                path: tab.id.clone(),
                element: format!("<{nav} activetab=\"{}\" />", tab.id),
            })
            .collect();

        let navigation = |action: Option<&ActionConfig>| {
            action
                .filter(|a| a.action == ActionMode::Navigation)
                .map(|a| a.page_name.clone())
        };
        if let Some(page) = navigation(module.create_action()) {
            children.push(ChildRoute {
                path: "register".to_string(),
                element: format!("<{page} />"),
            });
            if !page_imports.contains(&page) {
                page_imports.push(page);
            }
        }
        if let Some(page) = navigation(module.edit_action()) {
            children.push(ChildRoute {
                path: ":id".to_string(),
                element: format!("<{page} />"),
            });
            if !page_imports.contains(&page) {
                page_imports.push(page);
            }
        }

        tab_imports.push(nav);
        routes.push(RouteBlock {
            path: module.route.clone(),
            children,
        });
    }

    RoutesTemplate {
        routes_const: routes_const_name(solution),
        tab_imports,
        page_imports,
        routes,
    }
}
