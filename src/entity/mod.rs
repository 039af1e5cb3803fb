//! # Entities and Page Patterns
//!
//! An [`Entity`] is a backend resource inferred from the first segment of its
//! paths: `/order`, `/order/master`, `/order/detail/{id}` all belong to
//! `order`. Extraction is a single pass over the document's path table.
//!
//! Each entity is then classified into a [`TabPattern`], which decides the
//! page layout generated for it:
//!
//! | Pattern | Tabs | Register action |
//! |---------|------|-----------------|
//! | `single-only` | list | none |
//! | `single-register` | list | modal |
//! | `master-detail-simple` | related-list, list | navigation |
//! | `master-detail-full` | related-list, list (, analyze) | navigation |
//!
//! Classification is a pure function of the entity, the document it came
//! from and the [`Heuristics`](crate::settings::Heuristics) thresholds.

mod classify;
mod extract;


pub use classify::{
    classify, create_endpoint, has_create_endpoint, has_update_endpoint, is_complex_schema,
    TabPattern,
};
pub use extract::{extract_entities, Endpoint, Entity, Method};
