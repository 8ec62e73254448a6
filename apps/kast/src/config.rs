//! # Run Configuration
//!
//! A KAST run is described by one TOML file:
//!
//! ```toml
//! [source]
//! kind = "csv"            # csv | jsonl | stdin
//! path = "telemetry.csv"  # relative to this file
//! headers = ["pose"]      # optional low-level names
//!
//! [[kaster]]
//! method = "pose_to_posz"
//! inputs = ["pose"]
//! outputs = ["posz"]
//!
//! [[predicate]]
//! name = "atHome"
//! reference = "posz"
//! operator = "<"
//! expected = 1
//! ```

use kast_core::{
    KastError, KasterSpec, PddlSpellbook, PredicateDefinition, TransformRegistry,
    primitives::MAX_NAME_LENGTH,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// =============================================================================
// FILE LIMITS
// =============================================================================

/// Maximum size of a configuration file (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Validate file size before reading.
pub(crate) fn validate_file_size(path: &Path, max_size: u64) -> Result<(), KastError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| KastError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(KastError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Canonicalize a path and make sure it names a regular file.
pub(crate) fn validate_file_path(path: &Path) -> Result<PathBuf, KastError> {
    let canonical = path.canonicalize().map_err(|e| {
        KastError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(KastError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

// =============================================================================
// CONFIG TYPES
// =============================================================================

/// Where low-level frames come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Replay a CSV file; the header row names the columns.
    Csv,
    /// Replay a file of JSON objects, one per line.
    Jsonl,
    /// Read comma separated rows from standard input until `STOP`.
    Stdin,
}

/// The `[source]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// Data file; required for `csv` and `jsonl`.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Low-level names declared up front.
    #[serde(default)]
    pub headers: Option<Vec<String>>,
}

/// A complete run description.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KastConfig {
    pub source: SourceConfig,
    #[serde(default, rename = "kaster")]
    pub kasters: Vec<KasterSpec>,
    #[serde(default, rename = "predicate")]
    pub predicates: Vec<PredicateDefinition>,
    /// Directory relative data paths resolve against.
    #[serde(skip)]
    base_dir: PathBuf,
}

impl KastConfig {
    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, KastError> {
        let path = validate_file_path(path)?;
        validate_file_size(&path, MAX_CONFIG_FILE_SIZE)?;

        let text = std::fs::read_to_string(&path)
            .map_err(|e| KastError::IoError(format!("Read config: {}", e)))?;

        let mut config = Self::parse(&text)?;
        if let Some(dir) = path.parent() {
            config.base_dir = dir.to_path_buf();
        }
        tracing::info!(
            config = %path.display(),
            kasters = config.kasters.len(),
            predicates = config.predicates.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Parse configuration text; relative paths resolve against the
    /// working directory.
    pub fn parse(text: &str) -> Result<Self, KastError> {
        let config: Self =
            toml::from_str(text).map_err(|e| KastError::Config(format!("{}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), KastError> {
        if self.source.kind != SourceKind::Stdin && self.source.path.is_none() {
            return Err(KastError::Config(
                "source.path is required for csv and jsonl sources".to_string(),
            ));
        }

        let names = self
            .kasters
            .iter()
            .flat_map(|k| k.inputs.iter().chain(&k.outputs))
            .chain(self.source.headers.iter().flatten());
        for name in names {
            if name.is_empty() || name.len() > MAX_NAME_LENGTH {
                return Err(KastError::Config(format!("invalid knowledge name '{}'", name)));
            }
        }
        Ok(())
    }

    /// Absolute location of the data file, if the source has one.
    #[must_use]
    pub fn data_path(&self) -> Option<PathBuf> {
        self.source.path.as_ref().map(|p| self.base_dir.join(p))
    }

    /// Low-level names to declare at initialization.
    ///
    /// Taken from `source.headers` when present, else from the data source,
    /// else from the union of Kaster inputs in declaration order.
    #[must_use]
    pub fn low_level_headers(&self, source_headers: &[String]) -> Vec<String> {
        if let Some(headers) = &self.source.headers {
            return headers.clone();
        }
        if !source_headers.is_empty() {
            return source_headers.to_vec();
        }
        let mut headers: Vec<String> = Vec::new();
        for input in self.kasters.iter().flat_map(|k| &k.inputs) {
            if !headers.contains(input) {
                headers.push(input.clone());
            }
        }
        headers
    }

    /// Resolve Kasters through `registry` and build the engine.
    pub fn build(
        &self,
        registry: &TransformRegistry,
        source_headers: &[String],
    ) -> Result<PddlSpellbook, KastError> {
        let definitions = registry.resolve_all(&self.kasters)?;
        PddlSpellbook::new(
            self.low_level_headers(source_headers),
            definitions,
            &self.predicates,
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
