//! Storage initialization
//!
//! First-run setup: directories plus a starter set of categories.

use tracing::info;

use crate::config::paths::PlannerPaths;
use crate::error::PlannerError;
use crate::models::default_categories;

use super::categories::CategoryData;
use super::file_io::write_json_atomic;

/// Prepare storage for a fresh installation
///
/// Existing category data is never overwritten.
pub fn initialize_storage(paths: &PlannerPaths) -> Result<(), PlannerError> {
    paths.ensure_directories()?;

    if needs_initialization(paths) {
        let data = CategoryData {
            categories: default_categories(),
        };
        write_json_atomic(paths.categories_file(), &data)?;
        info!(count = data.categories.len(), "Created default categories");
    }

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &PlannerPaths) -> bool {
    !paths.categories_file().exists()
}
