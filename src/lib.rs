//! logsift - streaming log severity viewer
//!
//! Ingests a text log chunk by chunk, classifies every line as Error,
//! Warning or neither, and derives filtered views, incident sections and
//! a windowed layout that answers "which rows are visible" without
//! materialising the whole view.
//!
//! Pure core (`model`, `sections`, `filter`, `view_state`, `viewer`,
//! `export`) with the impure shell (`ingest`, `config`, `logging`, `app`)
//! at the edges.

pub mod app;
pub mod config;
pub mod export;
pub mod filter;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod sections;
pub mod view_state;
pub mod viewer;
