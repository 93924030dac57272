//! Machine snapshots.
//!
//! A snapshot is a JSON document tagged with [`SNAPSHOT_MAGIC`] and
//! [`SNAPSHOT_VERSION`]. It holds everything the tick loop needs to carry on
//! exactly where it left off. ROM images, the frame sink and the input
//! source are not part of it; monitor halts are dropped on restore.

use crate::devices::cia::Cia;
use crate::devices::vic::VicState;
use crate::error::{Error, Result};
use crate::system::interrupts::InterruptLines;
use lib6510::CpuState;
use serde::{Deserialize, Serialize};

/// Format tag at the head of every snapshot.
pub const SNAPSHOT_MAGIC: &str = "C64S";

/// Bump on any incompatible layout change.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Complete machine state at a tick boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub magic: String,
    pub version: u32,
    pub ticks: u64,
    pub cpu: CpuState,
    pub ram: Vec<u8>,
    pub interrupts: InterruptLines,
    pub vic: VicState,
    pub cia1: Cia,
    pub cia2: Cia,
}

impl Snapshot {
    /// Encodes to opaque bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes bytes produced by [`Snapshot::to_bytes`].
    ///
    /// The magic tag and version are checked before the state is accepted.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_slice(bytes)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn validate(&self) -> Result<()> {
        if self.magic != SNAPSHOT_MAGIC {
            return Err(Error::SnapshotMagic {
                found: self.magic.clone(),
                expected: SNAPSHOT_MAGIC,
            });
        }
        if self.version != SNAPSHOT_VERSION {
            return Err(Error::SnapshotVersion {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(())
    }
}
