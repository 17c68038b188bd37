mod error;
mod inspect;
mod probe;
mod table;
mod virtualize;

pub use error::MountError;
pub use inspect::{CliInspector, Inspector};
pub use probe::{ChainProbe, ContainerProbe, FileProbe, StaticProbe};
pub use table::MountTable;
pub use virtualize::{PathVirtualizer, normalize};

use serde::{Deserialize, Serialize};

/// One mount of the enclosing container, as reported by inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountEntry {
    #[serde(rename = "Type", default)]
    pub mount_type: String,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Destination")]
    pub destination: String,
}

impl MountEntry {
    pub fn new(mount_type: &str, source: &str, destination: &str) -> Self {
        Self {
            mount_type: mount_type.to_string(),
            source: source.to_string(),
            destination: destination.to_string(),
        }
    }

    pub fn bind(source: &str, destination: &str) -> Self {
        Self::new("bind", source, destination)
    }
}
