//! Loading of cleaned per-source files.
//!
//! The capability check runs here, once per file: columns referenced by the
//! mapping table but absent from the header are reported a single time and
//! the corresponding canonical attributes stay null for the whole source.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use sleep_model::{SchemaCapabilities, SourceSchema, SourceTable};

use crate::csv_table::read_csv_table;
use crate::error::{IngestError, Result};

/// A loaded source file with its resolved field set.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub path: PathBuf,
    pub table: SourceTable,
    pub capabilities: SchemaCapabilities,
}

impl LoadedSource {
    pub fn schema(&self) -> SourceSchema {
        self.table.schema
    }
}

/// Fails with [`IngestError::FileNotFound`] for the first absent path.
///
/// Called before anything is read so that a missing input halts the run
/// before any harmonization or output.
pub fn ensure_inputs_exist<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Result<()> {
    for path in paths {
        if !path.is_file() {
            return Err(IngestError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Reads `path` as a `schema` source and resolves its capabilities.
pub fn load_source(path: &Path, schema: SourceSchema) -> Result<LoadedSource> {
    let csv = read_csv_table(path)?;
    let duplicates = csv.duplicate_headers();
    if !duplicates.is_empty() {
        warn!(
            source = %schema,
            path = %path.display(),
            columns = ?duplicates,
            "duplicate header names; keeping the first column of each"
        );
    }
    let table = csv.into_source_table(schema);
    let capabilities = SchemaCapabilities::resolve(schema, &table.columns);
    report_capabilities(&capabilities, path);
    debug!(
        source = %schema,
        path = %path.display(),
        rows = table.len(),
        columns = table.columns.len(),
        "source loaded"
    );
    Ok(LoadedSource {
        path: path.to_path_buf(),
        table,
        capabilities,
    })
}

fn report_capabilities(capabilities: &SchemaCapabilities, path: &Path) {
    let schema = capabilities.schema();
    if !capabilities.has_identifier {
        warn!(
            source = %schema,
            path = %path.display(),
            column = capabilities.mapping.id_column,
            "identifier column missing; every row will be dropped"
        );
    }
    if capabilities.gender.is_none() {
        warn!(
            source = %schema,
            column = capabilities.mapping.gender.column(),
            "gender column missing; gender set to Unknown"
        );
    }
    for unresolved in &capabilities.unresolved {
        if unresolved.missing_columns.is_empty() {
            let dependencies: Vec<&str> = unresolved
                .missing_dependencies
                .iter()
                .map(|field| field.name())
                .collect();
            warn!(
                source = %schema,
                field = unresolved.field.name(),
                dependencies = %dependencies.join(", "),
                "derived field inputs unavailable; field set to null"
            );
        } else {
            warn!(
                source = %schema,
                field = unresolved.field.name(),
                columns = %unresolved.missing_columns.join(", "),
                "mapped column missing; field set to null"
            );
        }
    }
}
