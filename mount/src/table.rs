use crate::MountEntry;
use crate::error::MountError;
use crate::inspect::{CliInspector, Inspector};
use crate::probe::{ChainProbe, ContainerProbe, StaticProbe};
use std::cell::OnceCell;
use std::path::Path;

/// Mounts of the enclosing container, resolved once and then cached.
pub struct MountTable {
    probe: Box<dyn ContainerProbe + Send>,
    inspector: Box<dyn Inspector + Send>,
    container_id: OnceCell<String>,
    entries: OnceCell<Vec<MountEntry>>,
}

impl MountTable {
    pub fn new(
        probe: impl ContainerProbe + Send + 'static,
        inspector: impl Inspector + Send + 'static,
    ) -> Self {
        Self {
            probe: Box::new(probe),
            inspector: Box::new(inspector),
            container_id: OnceCell::new(),
            entries: OnceCell::new(),
        }
    }

    /// Probes `/proc` for the container and inspects it through `cli_path`.
    pub fn from_cli(cli_path: impl AsRef<Path>) -> Self {
        Self::new(ChainProbe::default(), CliInspector::new(cli_path))
    }

    /// A table that is already known, e.g. from a previous inspection.
    pub fn from_entries(container_id: &str, entries: Vec<MountEntry>) -> Self {
        let table = Self::new(
            StaticProbe(Some(container_id.to_string())),
            NoInspector,
        );
        let _ = table.container_id.set(container_id.to_string());
        let _ = table.entries.set(entries);
        table
    }

    pub fn container_id(&self) -> Result<&str, MountError> {
        if let Some(id) = self.container_id.get() {
            return Ok(id.as_str());
        }

        let id = self
            .probe
            .container_id()?
            .ok_or(MountError::ContainerIdentityUnavailable)?;
        tracing::debug!(container_id = %id, "Detected enclosing container");

        Ok(self.container_id.get_or_init(|| id).as_str())
    }

    /// Mount entries in the order the inspection reported them.
    pub fn resolve(&self) -> Result<&[MountEntry], MountError> {
        if let Some(entries) = self.entries.get() {
            return Ok(entries.as_slice());
        }

        let container_id = self.container_id()?;
        let entries = self.inspector.mounts(container_id)?;
        tracing::info!(
            container_id = %container_id,
            mounts = entries.len(),
            "Resolved container mount table"
        );

        Ok(self.entries.get_or_init(|| entries).as_slice())
    }
}

struct NoInspector;

impl Inspector for NoInspector {
    fn mounts(&self, container_id: &str) -> Result<Vec<MountEntry>, MountError> {
        Err(MountError::InspectionFailure(format!(
            "no inspector configured for {}",
            container_id
        )))
    }
}
