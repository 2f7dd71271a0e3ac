use super::Draft;
use crate::imports::*;

/*
    Types:
    * PipelineDocument - Serialized form of a pipeline: ordered filter entries with raw JSON arguments
    * FilterEntry - One binding in the document, keyed by the filter's stable uuid

    Argument values are written as plain JSON (paths and numeric types as strings, dimensions as
    arrays). Loading resolves them against each filter's schema, so a bad document fails at load.
*/
pub const PIPELINE_FILE_VERSION: u32 = 1;

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FilterEntry {
    pub uuid: Uuid,
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub args: JsonMap,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PipelineDocument {
    pub name: String,
    pub version: u32,
    pub filters: Vec<FilterEntry>,
}

fn join_errors(errors: &[FilterError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl<T> Pipeline<T> {
    pub fn to_document(&self) -> Result<PipelineDocument> {
        let mut filters = Vec::with_capacity(self.items.len());
        for (index, item) in self.items.iter().enumerate() {
            let identity = item.filter.identity();
            let args = item
                .arguments
                .to_json()
                .with_context(|| format!("Failed to serialize arguments of filter {} ({})", index, identity.name))?;
            filters.push(FilterEntry {
                uuid: identity.uuid,
                name: identity.name.to_string(),
                enabled: item.enabled,
                args,
            });
        }
        Ok(PipelineDocument {
            name: self.name.clone(),
            version: PIPELINE_FILE_VERSION,
            filters,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        let document = self.to_document()?;
        serde_json::to_string_pretty(&document).context("Failed to encode pipeline document")
    }

    #[tracing::instrument(skip(self), fields(pipeline = %self.name))]
    pub async fn save(&self, path: &Path) -> Result<()> {
        let text = self.to_json()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
        }
        tokio::fs::write(path, text)
            .await
            .with_context(|| format!("Failed to write pipeline file '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), "Saved pipeline");
        Ok(())
    }
}

impl Pipeline<Draft> {
    /// Rebuilds a draft from a document. Every filter must be known to `registry` under the same
    /// uuid and name, and every argument must resolve against that filter's schema.
    #[tracing::instrument(skip_all, fields(pipeline = %document.name, filter_count = document.filters.len()))]
    pub fn from_document(document: &PipelineDocument, registry: &FilterRegistry) -> Result<Self> {
        if document.version > PIPELINE_FILE_VERSION {
            return Err(anyhow::anyhow!(
                "Pipeline file version {} is newer than supported version {}",
                document.version,
                PIPELINE_FILE_VERSION
            ));
        }
        let mut pipeline = Self::new(document.name.clone());
        for (index, entry) in document.filters.iter().enumerate() {
            let identity = registry.identity(&entry.uuid).with_context(|| {
                format!("Filter {} ('{}') has unknown uuid {}", index, entry.name, entry.uuid)
            })?;
            if identity.name != entry.name {
                tracing::warn!(index, uuid = %entry.uuid, expected = identity.name, found = %entry.name, "Filter name mismatch");
                return Err(anyhow::anyhow!(
                    "Filter {} uuid {} belongs to '{}', but the file names it '{}'",
                    index,
                    entry.uuid,
                    identity.name,
                    entry.name
                ));
            }
            let filter = registry
                .create(&entry.uuid)
                .with_context(|| format!("Filter {} ('{}') could not be created", index, entry.name))?;
            let arguments = filter.parameters().resolve_json(&entry.args).map_err(|errors| {
                anyhow::anyhow!(
                    "Filter {} ('{}') has invalid arguments: {}",
                    index,
                    entry.name,
                    join_errors(&errors)
                )
            })?;
            let slot = pipeline.push_boxed(filter, arguments);
            pipeline.items[slot].enabled = entry.enabled;
        }
        Ok(pipeline)
    }

    pub fn from_json(text: &str, registry: &FilterRegistry) -> Result<Self> {
        let document: PipelineDocument =
            serde_json::from_str(text).context("Failed to decode pipeline document")?;
        Self::from_document(&document, registry)
    }

    pub async fn load(path: &Path, registry: &FilterRegistry) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read pipeline file '{}'", path.display()))?;
        Self::from_json(&text, registry)
            .with_context(|| format!("Failed to load pipeline file '{}'", path.display()))
    }
}
