//! # uiscaffold
//!
//! **uiscaffold** is a scaffolding compiler for back-office UIs: it reads a backend's OpenAPI
//! documents and emits a ready-to-edit React module per resource (list or master-detail pages,
//! a registration form, tab navigation, routes and translation keys).
//!
//! ## Overview
//!
//! The pipeline has two halves joined by a plain JSON file. The first half turns each domain's
//! OpenAPI document into a `configs/<domain>.json` describing every module; the second half
//! turns those configs into source files. Developers review and tweak the JSON between the two,
//! and re-run only the second half.
//!
//! ## Architecture
//!
//! - **[`source`]** - Authenticated document fetching and `$ref` resolution
//! - **[`entity`]** - Grouping operations into entities and classifying their tab pattern
//! - **[`module_config`]** - Expanding an entity into columns, form fields, tabs and actions
//! - **[`generator`]** - Askama templates (with optional `.j2` overrides) and the solution-config flow
//! - **[`materialize`]** - Conflict-aware file writes with timestamped backups
//! - **[`locale`]** - `ko`/`en` catalog synchronization
//! - **[`swagger`]** - The per-domain fetch → build → write loop
//! - **[`settings`]** / **[`logging`]** - `uiscaffold.toml`, environment and tracing setup
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant User
//!     participant CLI as CLI<br/>(uiscaffold-gen)
//!     participant Source as source::SchemaSource
//!     participant Entity as entity
//!     participant Builder as module_config
//!     participant Gen as generator
//!     participant FS as File System
//!
//!     User->>CLI: uiscaffold-gen swagger
//!     CLI->>Source: connect() (login)
//!     CLI->>Source: fetch_document(SWAGGER_URL_SALES)
//!     Source-->>CLI: ApiDocument
//!     CLI->>Entity: extract_entities(&doc)
//!     Entity-->>CLI: Vec<Entity>
//!     CLI->>Builder: build_solution("sales", &entities)
//!     Builder->>Entity: classify(entity) → TabPattern
//!     Builder-->>CLI: SolutionConfig
//!     CLI->>FS: configs/sales.json (backup + overwrite)
//!
//!     User->>CLI: uiscaffold-gen generate
//!     CLI->>Gen: generate_from_solution_configs()
//!     Gen->>FS: read configs/*.json
//!     Gen->>Gen: render pages, tabs, routes
//!     Gen->>FS: materialize_batch per solution
//!     Gen->>FS: config.json (merged)
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export SWAGGER_API_BASE_URL=https://api.example.com
//! export SWAGGER_USERNAME=dev SWAGGER_PASSWORD=...
//! export SWAGGER_URL_SALES=https://api.example.com/sales/v3/api-docs
//!
//! uiscaffold-gen swagger sales
//! uiscaffold-gen generate --project apps/primes
//! uiscaffold-gen locale sync --src apps/primes/src --locales apps/primes/src/locales
//! ```
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use uiscaffold::entity::extract_entities;
//! use uiscaffold::module_config::ModuleConfigBuilder;
//! use uiscaffold::settings::Heuristics;
//! use uiscaffold::source::load_document_file;
//!
//! let doc = load_document_file("sales.yaml".as_ref())?;
//! let entities = extract_entities(&doc);
//! let config = ModuleConfigBuilder::new(&doc, Heuristics::default())
//!     .build_solution("sales", &entities);
//! println!("{}", serde_json::to_string_pretty(&config)?);
//! ```

pub mod cli;
pub mod entity;
pub mod generator;
pub mod locale;
pub mod logging;
pub mod materialize;
pub mod module_config;
pub mod naming;
pub mod settings;
pub mod source;
pub mod swagger;

pub use entity::{classify, extract_entities, Entity, TabPattern};
pub use module_config::{ModuleConfig, ModuleConfigBuilder, SolutionConfig};
pub use source::{load_document_file, ApiDocument, SchemaSource};
