use anyhow::Context;
use askama::Template;
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Extension of override files in a `--templates` directory.
pub const OVERRIDE_EXTENSION: &str = "j2";

/// A built-in template that a `<NAME>.j2` file may replace.
///
/// The override is rendered against the serialized template struct, so it
/// sees exactly the variables the built-in template sees.
pub trait NamedTemplate: Template + Serialize {
    /// File name of the built-in template under `templates/`
    const NAME: &'static str;
}

/// Template data for a single-table list page
#[derive(Template, Serialize)]
#[template(path = "single_page.tsx", escape = "none")]
pub struct SinglePageTemplate {
    pub page_name: String,
    /// TS array literal of column definitions
    pub columns: String,
    /// TS array literal of quick-search field names
    pub search_fields: String,
    pub data_hook: String,
    pub table_title: String,
    pub use_edit: bool,
    pub use_delete: bool,
    pub use_export: bool,
}

impl NamedTemplate for SinglePageTemplate {
    const NAME: &'static str = "single_page.tsx";
}

/// Template data for a master table with a dependent detail table
#[derive(Template, Serialize)]
#[template(path = "master_detail_page.tsx", escape = "none")]
pub struct MasterDetailPageTemplate {
    pub page_name: String,
    pub master_type: String,
    pub detail_type: String,
    pub master_columns: String,
    pub detail_columns: String,
    pub info_grid_keys: String,
    pub master_hook: String,
    pub detail_hook: String,
    pub master_title: String,
    pub detail_title: String,
}

impl NamedTemplate for MasterDetailPageTemplate {
    const NAME: &'static str = "master_detail_page.tsx";
}

#[derive(Debug, Clone, Serialize)]
pub struct TabItem {
    pub id: String,
    pub icon: String,
    pub label: String,
    pub to: String,
    pub page_name: String,
}

/// Template data for a module's tab navigation
///
/// `register_mode` is `modal`, `navigation` or `none`.
#[derive(Template, Serialize)]
#[template(path = "tab_navigation.tsx", escape = "none")]
pub struct TabNavigationTemplate {
    pub component_name: String,
    pub title: String,
    pub items: Vec<TabItem>,
    pub icons: Vec<String>,
    pub page_imports: Vec<String>,
    pub default_tab: String,
    pub register_mode: String,
    pub register_title: String,
    pub register_page: String,
    pub register_path: String,
}

impl NamedTemplate for TabNavigationTemplate {
    const NAME: &'static str = "tab_navigation.tsx";
}

/// Template data for a registration form opened in a dialog
#[derive(Template, Serialize)]
#[template(path = "register_modal.tsx", escape = "none")]
pub struct RegisterModalTemplate {
    pub page_name: String,
    pub data_type: String,
    pub form_schema: String,
    pub hook_name: String,
    pub title: String,
}

impl NamedTemplate for RegisterModalTemplate {
    const NAME: &'static str = "register_modal.tsx";
}

/// Template data for a standalone registration page with a detail table
#[derive(Template, Serialize)]
#[template(path = "register_full.tsx", escape = "none")]
pub struct RegisterFullTemplate {
    pub page_name: String,
    pub data_type: String,
    pub form_schema: String,
    pub hook_name: String,
    pub title: String,
}

impl NamedTemplate for RegisterFullTemplate {
    const NAME: &'static str = "register_full.tsx";
}

/// Template data for a chart analysis page
#[derive(Template, Serialize)]
#[template(path = "analysis_page.tsx", escape = "none")]
pub struct AnalysisPageTemplate {
    pub component_name: String,
    pub domain: String,
    pub data_type: String,
    pub chart_type: String,
    pub time_range: String,
    pub chart_title: String,
    /// Pre-rendered `name={value}` JSX attributes
    pub extra_props: Vec<String>,
}

impl NamedTemplate for AnalysisPageTemplate {
    const NAME: &'static str = "analysis_page.tsx";
}

#[derive(Debug, Clone, Serialize)]
pub struct ChildRoute {
    pub path: String,
    /// JSX element expression
    pub element: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteBlock {
    pub path: String,
    pub children: Vec<ChildRoute>,
}

/// Template data for a solution's route table
#[derive(Template, Serialize)]
#[template(path = "routes.tsx", escape = "none")]
pub struct RoutesTemplate {
    pub routes_const: String,
    pub tab_imports: Vec<String>,
    pub page_imports: Vec<String>,
    pub routes: Vec<RouteBlock>,
}

impl NamedTemplate for RoutesTemplate {
    const NAME: &'static str = "routes.tsx";
}

/// Template data for a `use<X>FieldQuery` hook
#[derive(Template, Serialize)]
#[template(path = "field_api_hook.ts", escape = "none")]
pub struct FieldApiHookTemplate {
    pub hook_name: String,
    pub service_name: String,
    pub solution: String,
    pub module: String,
}

impl NamedTemplate for FieldApiHookTemplate {
    const NAME: &'static str = "field_api_hook.ts";
}

/// Template data for the `getFieldValues` member a field-API hook calls.
///
/// Printed for manual insertion into the module's existing service object.
#[derive(Template, Serialize)]
#[template(path = "field_api_service.ts", escape = "none")]
pub struct FieldApiServiceTemplate {
    pub solution: String,
    pub module: String,
}

impl NamedTemplate for FieldApiServiceTemplate {
    const NAME: &'static str = "field_api_service.ts";
}

/// Template data for a `<X>SelectComponent`
#[derive(Template, Serialize)]
#[template(path = "custom_select.tsx", escape = "none")]
pub struct CustomSelectTemplate {
    pub component_name: String,
    pub type_name: String,
    pub data_hook: String,
    pub value_key: String,
    pub label_key: String,
    pub placeholder: String,
}

impl NamedTemplate for CustomSelectTemplate {
    const NAME: &'static str = "custom_select.tsx";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomSelectEntry {
    pub component_name: String,
    pub type_name: String,
}

/// Template data for `components/customSelect/index.ts`
#[derive(Template, Serialize)]
#[template(path = "custom_select_index.ts", escape = "none")]
pub struct CustomSelectIndexTemplate {
    pub components: Vec<CustomSelectEntry>,
}

impl NamedTemplate for CustomSelectIndexTemplate {
    const NAME: &'static str = "custom_select_index.ts";
}

/// Runtime replacements for built-in templates.
///
/// Sources are kept as text; each render builds a throwaway minijinja
/// environment in strict undefined mode, so a placeholder the context does not
/// provide fails the render instead of producing empty output.
#[derive(Debug, Clone, Default)]
pub struct TemplateOverrides {
    sources: BTreeMap<String, String>,
}

impl TemplateOverrides {
    /// No overrides: every template renders from the compiled askama source.
    pub fn none() -> Self {
        Self::default()
    }

    /// Collect every `<name>.j2` file in `dir`.
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let mut sources = BTreeMap::new();
        let entries = fs::read_dir(dir)
            .with_context(|| format!("failed to read template directory {}", dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(OVERRIDE_EXTENSION) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let source = fs::read_to_string(&path)
                .with_context(|| format!("failed to read template {}", path.display()))?;
            info!(template = name, "using template override");
            sources.insert(name.to_string(), source);
        }
        Ok(TemplateOverrides { sources })
    }

    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.sources.insert(name.into(), source.into());
    }

    pub fn is_overridden(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Render `template`, through its override when one was loaded.
    pub fn render<T: NamedTemplate>(&self, template: &T) -> anyhow::Result<String> {
        let Some(source) = self.sources.get(T::NAME) else {
            return template
                .render()
                .with_context(|| format!("failed to render {}", T::NAME));
        };

        debug!(template = T::NAME, "rendering override");
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template(T::NAME, source)
            .with_context(|| format!("invalid override template {}", T::NAME))?;
        let compiled = env.get_template(T::NAME)?;
        compiled
            .render(minijinja::Value::from_serialize(template))
            .with_context(|| format!("failed to render override {}", T::NAME))
    }
}
