//! Machine integration: memory map, interrupt wiring and the tick loop.

pub mod address_bus;
pub mod interrupts;
pub mod keyboard;
pub mod machine;
pub mod monitor;
pub mod patches;
pub mod snapshot;

pub use address_bus::AddressBus;
pub use interrupts::{InterruptLines, Line, Source};
pub use keyboard::{keys, Key, KeyMatrix};
pub use machine::{FrameSink, InputSource, InputState, Machine, CYCLES_PER_FRAME};
pub use monitor::{Monitor, TraceEntry};
pub use patches::{ByteCursor, Patch, PatchTable, SliceCursor};
pub use snapshot::{Snapshot, SNAPSHOT_MAGIC, SNAPSHOT_VERSION};
