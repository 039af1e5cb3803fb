//! # Module Configuration
//!
//! Expands a classified [`Entity`](crate::entity::Entity) into a
//! [`ModuleConfig`]: the declarative, serializable description of every page,
//! tab, table column, form field and menu entry generated for it. The JSON
//! written to `configs/<solution>.json` is exactly this structure (camelCase
//! keys), and it is also the input of the [`generator`](crate::generator).
//!
//! ## Field Heuristics
//!
//! Column widths, form input types, masks, placeholders and search fields are
//! derived from schema properties by the functions in [`fields`]. They are
//! best-effort: a generated form is a starting point for hand editing.
//!
//! - System fields (`createdAt`, `tenantId`, paging parameters, ...) never
//!   become columns or inputs; `id` is the only one kept as a column.
//! - `id`, `createdAt` and `updatedAt` never appear in registration forms.
//! - Quick search offers at most `search_field_cap` list fields.
//!
//! ## Example
//!
//! ```rust,ignore
//! let builder = ModuleConfigBuilder::new(&doc, settings.heuristics);
//! let config = builder.build_solution("sales", &extract_entities(&doc));
//! std::fs::write("configs/sales.json", serde_json::to_string_pretty(&config)?)?;
//! ```

mod build;
pub mod fields;
mod types;

#[cfg(test)]
mod tests;

pub use build::{module_display_name, module_icon, ModuleConfigBuilder};
pub use fields::FieldInfo;
pub use types::{
    ActionConfig, ActionMode, ActionType, ColumnSpec, CustomSelectConfig, FormFieldSpec,
    MenuOptions, ModuleConfig, PageType, SearchOptions, SearchSlotField, SelectOption,
    SolutionConfig, TabConfig, TabLayout, TableControl,
};
