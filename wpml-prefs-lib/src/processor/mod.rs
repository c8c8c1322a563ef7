use crate::config::{WpmlConfig, DEFAULT_CONFIG_PATH};
use crate::dedup::{remove_duplicates, RemovedLine};
use crate::error::{ProcessingState, ProcessorError};
use crate::injector::{inject, Indent, InjectOptions, InjectedField};
use crate::preferences::{FieldResolver, MappingEntry, PreferenceTable};
use std::path::{Path, PathBuf};

pub const DEFAULT_TARGET_PATH: &str = "includes/acf-field_groups.php";

#[derive(Debug)]
pub struct InjectionReport {
    /// Preference table sorted by pattern.
    pub listing: Vec<MappingEntry>,
    pub state: ProcessingState,
    pub injected: Vec<InjectedField>,
    pub written: bool,
}

impl InjectionReport {
    pub fn modified_count(&self) -> usize {
        self.injected.len()
    }
}

#[derive(Debug)]
pub struct DedupReport {
    pub removed: Vec<RemovedLine>,
    pub written: bool,
}

impl DedupReport {
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }
}

/// Runs the two batch edits against one field-group file.
///
/// Both edits read the whole file, transform it in memory, and overwrite it.
/// A read or parse failure aborts before anything is written.
pub struct Processor {
    config_path: PathBuf,
    target_path: PathBuf,
    options: InjectOptions,
    dry_run: bool,
}

impl Default for Processor {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor {
    pub fn new() -> Self {
        ProcessorBuilder::default().build()
    }

    pub fn builder() -> ProcessorBuilder {
        ProcessorBuilder::default()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    pub async fn load_table(&self) -> Result<(PreferenceTable, ProcessingState), ProcessorError> {
        tracing::info!("Loading WPML config from {}", self.config_path.display());
        let xml = tokio::fs::read_to_string(&self.config_path).await?;
        let config = WpmlConfig::parse(&xml)?;
        let (table, state) = PreferenceTable::from_config(&config);
        for warning in state.get_warnings() {
            tracing::warn!("{}", warning.message);
        }
        Ok((table, state))
    }

    pub async fn add_preferences(&self) -> Result<InjectionReport, ProcessorError> {
        let (table, state) = self.load_table().await?;
        let resolver = FieldResolver::new(&table)?;

        tracing::info!("Reading field groups from {}", self.target_path.display());
        let content = tokio::fs::read_to_string(&self.target_path).await?;
        let injection = inject(&content, &resolver, &self.options)?;

        let written = self.write_target(&injection.content).await?;
        Ok(InjectionReport {
            listing: table.sorted(),
            state,
            injected: injection.injected,
            written,
        })
    }

    pub async fn remove_duplicates(&self) -> Result<DedupReport, ProcessorError> {
        tracing::info!("Reading field groups from {}", self.target_path.display());
        let content = tokio::fs::read_to_string(&self.target_path).await?;
        let deduplication = remove_duplicates(&content);

        let written = self.write_target(&deduplication.content).await?;
        Ok(DedupReport {
            removed: deduplication.removed,
            written,
        })
    }

    async fn write_target(&self, content: &str) -> Result<bool, ProcessorError> {
        if self.dry_run {
            tracing::info!("Dry run, not writing {}", self.target_path.display());
            return Ok(false);
        }
        tokio::fs::write(&self.target_path, content).await?;
        tracing::debug!("Wrote {} bytes to {}", content.len(), self.target_path.display());
        Ok(true)
    }
}

pub struct ProcessorBuilder {
    config_path: PathBuf,
    target_path: PathBuf,
    options: InjectOptions,
    dry_run: bool,
}

impl Default for ProcessorBuilder {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            target_path: PathBuf::from(DEFAULT_TARGET_PATH),
            options: InjectOptions::default(),
            dry_run: false,
        }
    }
}

impl ProcessorBuilder {
    pub fn config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config_path = path.into();
        self
    }

    pub fn target_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.target_path = path.into();
        self
    }

    pub fn indent(mut self, indent: Indent) -> Self {
        self.options.indent = indent;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn build(self) -> Processor {
        Processor {
            config_path: self.config_path,
            target_path: self.target_path,
            options: self.options,
            dry_run: self.dry_run,
        }
    }
}
