//! Product configuration trait for CLI binaries
//!
//! This trait defines the interface a binary implements so the shared
//! command layer never hardcodes the product identity.

use std::path::Path;

/// Configuration trait for the CLI product
///
/// The binary implements this trait to define:
/// - Product identity (name, display name, version)
/// - Documentation links
/// - Post-creation instructions
/// - The per-project configuration file name
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for the CLI command)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Product version shown by `version`
    fn version(&self) -> &'static str;

    /// URL for product documentation
    fn docs_url(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, project_dir: &Path) -> Vec<String>;

    /// Optional per-project configuration file, relative to the project root
    fn config_file_name(&self) -> &'static str {
        ".rails-frontend.yaml"
    }
}
