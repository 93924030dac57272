//! The C64 support chips.
//!
//! - [`Vic`]: MOS 6569 video chip (PAL raster, bad lines, sprites)
//! - [`Cia`]: MOS 6526 timers, time of day and keyboard scanning
//!
//! Chips keep only their own register state. The machine maps them into the
//! address space with range watchers.

pub mod cia;
pub mod palette;
pub mod vic;

pub use cia::{Cia, CiaKind, CiaPort, CiaTimer};
pub use palette::PALETTE;
pub use vic::{Frame, GraphicsMode, Vic, VicState, FRAME_HEIGHT, FRAME_WIDTH};
