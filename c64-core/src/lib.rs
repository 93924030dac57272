//! # Commodore 64 core
//!
//! A cycle-stepped PAL C64 built on the `lib6510` CPU core.
//!
//! ## Architecture
//!
//! - **AddressBus**: 64 KiB RAM, the three ROMs and the 6510 port banking.
//!   Chips are mapped in through read and write range watchers.
//! - **InterruptLines**: per-source IRQ (level) and NMI (edge) producers plus
//!   the bus-steal counter the VIC uses on bad lines.
//! - **VIC-II** (MOS 6569): 504x312 raster, text and bitmap modes, sprites,
//!   raster interrupt.
//! - **CIA** (MOS 6526) x2: timers, time of day, keyboard and VIC bank.
//! - **Machine**: ticks VIC, CPU and CIAs once per cycle; monitor, KERNAL
//!   patches and snapshots.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use c64_core::{Machine, MachineConfig};
//!
//! let mut c64 = Machine::from_rom_dir("roms", MachineConfig::default())?;
//! let frame = c64.run_frame();
//! # Ok::<(), c64_core::Error>(())
//! ```

pub mod config;
pub mod devices;
pub mod error;
pub mod roms;
pub mod system;

pub use config::MachineConfig;
pub use devices::{Cia, CiaKind, Frame, Vic};
pub use error::{Error, Result};
pub use roms::RomSet;
pub use system::{
    keys, AddressBus, ByteCursor, FrameSink, InputSource, InputState, InterruptLines, Key,
    KeyMatrix, Line, Machine, Monitor, Patch, PatchTable, SliceCursor, Snapshot, Source,
    CYCLES_PER_FRAME,
};
