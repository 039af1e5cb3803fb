use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn is_false(value: &bool) -> bool {
    !*value
}

/// Page layout of a tab, and of the module as a whole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageType {
    #[default]
    SinglePage,
    MasterDetailPage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    Create,
    Edit,
}

/// How a registration form opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionMode {
    /// In-place dialog over the list
    Modal,
    /// Dedicated page with its own route
    Navigation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

/// Data-table column render hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    pub accessor_key: String,
    pub header: String,
    pub size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u32>,
}

/// Registration form field render hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFieldSpec {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub mask_auto_detect: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
}

/// Search-slot input rendered above a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSlotField {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableControl {
    pub title: String,
    pub use_edit: bool,
    pub use_delete: bool,
    pub use_export: bool,
}

impl Default for TableControl {
    fn default() -> Self {
        TableControl {
            title: String::new(),
            use_edit: true,
            use_delete: true,
            use_export: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Names of the list fields offered in quick search
    #[serde(default)]
    pub fields: Vec<String>,
}

/// Table data of a tab: one table, or a master table plus its detail table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TabLayout {
    #[serde(rename_all = "camelCase")]
    MasterDetail {
        master_columns: Vec<ColumnSpec>,
        detail_columns: Vec<ColumnSpec>,
        master_data_hook: String,
        detail_data_hook: String,
    },
    #[serde(rename_all = "camelCase")]
    Single {
        #[serde(default)]
        columns: Vec<ColumnSpec>,
        #[serde(default)]
        data_hook: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabConfig {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PageType,
    pub path: String,
    pub page_name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(rename = "default", default)]
    pub is_default: bool,
    #[serde(default)]
    pub table_control: TableControl,
    #[serde(default)]
    pub search_options: SearchOptions,
    #[serde(default)]
    pub search_slot_fields: Vec<SearchSlotField>,
    #[serde(flatten)]
    pub layout: TabLayout,
}

impl TabConfig {
    pub fn is_analyze(&self) -> bool {
        self.id == "analyze"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionConfig {
    #[serde(rename = "type")]
    pub kind: ActionType,
    pub action: ActionMode,
    pub page_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub hook_name: String,
    #[serde(default)]
    pub form_fields: Vec<FormFieldSpec>,
    /// Route of the registration page, only for navigation actions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuOptions {
    #[serde(rename = "type")]
    pub kind: String,
    pub icon: String,
    pub name: String,
    pub to: String,
}

/// Options of a generated `<X>SelectComponent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSelectConfig {
    #[serde(default = "default_value_key")]
    pub value_key: String,
    #[serde(default = "default_label_key")]
    pub label_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

fn default_value_key() -> String {
    "id".to_string()
}

fn default_label_key() -> String {
    "name".to_string()
}

/// The fully expanded UI description of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleConfig {
    pub name: String,
    pub path: String,
    pub route: String,
    #[serde(default)]
    pub page_type: PageType,
    #[serde(default)]
    pub tabs: Vec<TabConfig>,
    #[serde(default)]
    pub actions: Vec<ActionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_options: Option<MenuOptions>,
    /// Emit a `use<X>FieldQuery` hook
    #[serde(default, skip_serializing_if = "is_false")]
    pub field_api: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_select: Option<CustomSelectConfig>,
}

impl ModuleConfig {
    pub fn create_action(&self) -> Option<&ActionConfig> {
        self.actions.iter().find(|a| a.kind == ActionType::Create)
    }

    pub fn edit_action(&self) -> Option<&ActionConfig> {
        self.actions.iter().find(|a| a.kind == ActionType::Edit)
    }

    /// The tab marked default, else the first one.
    pub fn default_tab(&self) -> Option<&TabConfig> {
        self.tabs
            .iter()
            .find(|t| t.is_default)
            .or_else(|| self.tabs.first())
    }

    pub fn has_master_detail_tab(&self) -> bool {
        self.tabs.iter().any(|t| t.kind == PageType::MasterDetailPage)
    }
}

/// Contents of `configs/<solution>.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionConfig {
    /// Keyed by camelCase entity name
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleConfig>,
}
