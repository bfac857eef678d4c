//! Frontend Core - Shared library for the `rails-frontend` CLI
//!
//! This library scaffolds and maintains the frontend of a Rails project
//! (pages, Stimulus controllers, layouts, importmap pins) and exports a
//! running development server as a static site.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Name normalization, idempotent file
//!   patching, scaffolding, usage scanning, static export
//! - **Layer 2: Environment** - `ProductConfig` trait, project configuration,
//!   external tool management
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based command
//!   handlers (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based command layer
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use frontend_core::{names, patch, project::ProjectRoot};
//!
//! let project = ProjectRoot::open(".")?;
//! let page = names::normalize("Ürünler");
//! patch::insert_controller_action(&project.home_controller(), &page)?;
//! patch::insert_route(&project.routes_file(), &page, &page, false)?;
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod names;
pub mod patch;
pub mod product;
pub mod project;
pub mod runtime;
pub mod scaffold;
pub mod scanner;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use error::FrontendError;
pub use export::Exporter;
pub use patch::{Fragment, HostFile, PatchOutcome};
pub use product::ProductConfig;
pub use project::ProjectRoot;
pub use runtime::ExternalTool;
pub use scanner::{find_usages, UsageQuery};

#[cfg(feature = "tui")]
pub use tui::run;
