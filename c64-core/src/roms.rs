//! ROM images.
//!
//! The machine needs three fixed-size images. Sizes are validated once, when
//! the set is built; after that the address bus copies them into fixed arrays.

use crate::error::{Error, Result};
use log::info;
use std::fs;
use std::path::Path;

pub const BASIC_SIZE: usize = 0x2000;
pub const CHARGEN_SIZE: usize = 0x1000;
pub const KERNAL_SIZE: usize = 0x2000;

/// File names looked up by [`RomSet::load_dir`].
pub const BASIC_FILE: &str = "basic.rom";
pub const CHARGEN_FILE: &str = "chargen.rom";
pub const KERNAL_FILE: &str = "kernal.rom";

/// Validated BASIC, character and KERNAL ROM images.
#[derive(Debug, Clone)]
pub struct RomSet {
    pub(crate) basic: Vec<u8>,
    pub(crate) chargen: Vec<u8>,
    pub(crate) kernal: Vec<u8>,
}

impl RomSet {
    /// Builds a ROM set, rejecting images of the wrong size.
    pub fn new(basic: Vec<u8>, chargen: Vec<u8>, kernal: Vec<u8>) -> Result<Self> {
        check_size("BASIC", &basic, BASIC_SIZE)?;
        check_size("character", &chargen, CHARGEN_SIZE)?;
        check_size("KERNAL", &kernal, KERNAL_SIZE)?;
        Ok(Self {
            basic,
            chargen,
            kernal,
        })
    }

    /// Reads `basic.rom`, `chargen.rom` and `kernal.rom` from `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let read = |name: &str| {
            let path = dir.join(name);
            fs::read(&path).map_err(|source| Error::Io { path, source })
        };

        let roms = Self::new(read(BASIC_FILE)?, read(CHARGEN_FILE)?, read(KERNAL_FILE)?)?;
        info!("loaded ROM set from {}", dir.display());
        Ok(roms)
    }

    /// A zero-filled set whose KERNAL reset vector points at `entry`.
    ///
    /// Useful for running bare machine code without the stock firmware.
    pub fn blank(entry: u16) -> Self {
        let mut kernal = vec![0; KERNAL_SIZE];
        kernal[0x1FFC] = entry as u8;
        kernal[0x1FFD] = (entry >> 8) as u8;
        Self {
            basic: vec![0; BASIC_SIZE],
            chargen: vec![0; CHARGEN_SIZE],
            kernal,
        }
    }

    pub fn basic(&self) -> &[u8] {
        &self.basic
    }

    pub fn chargen(&self) -> &[u8] {
        &self.chargen
    }

    pub fn kernal(&self) -> &[u8] {
        &self.kernal
    }

    /// Mutable KERNAL image, for tests and patched firmware.
    pub fn kernal_mut(&mut self) -> &mut [u8] {
        &mut self.kernal
    }

    /// Mutable character ROM image.
    pub fn chargen_mut(&mut self) -> &mut [u8] {
        &mut self.chargen
    }

    /// Mutable BASIC image.
    pub fn basic_mut(&mut self) -> &mut [u8] {
        &mut self.basic
    }
}

fn check_size(rom: &'static str, data: &[u8], expected: usize) -> Result<()> {
    if data.len() != expected {
        return Err(Error::RomSize {
            rom,
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_short_basic() {
        let err = RomSet::new(vec![0; 100], vec![0; CHARGEN_SIZE], vec![0; KERNAL_SIZE])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::RomSize {
                rom: "BASIC",
                expected: BASIC_SIZE,
                actual: 100
            }
        ));
    }

    #[test]
    fn test_rejects_long_chargen() {
        let err = RomSet::new(
            vec![0; BASIC_SIZE],
            vec![0; CHARGEN_SIZE + 1],
            vec![0; KERNAL_SIZE],
        )
        .unwrap_err();
        assert!(err.to_string().contains("character ROM must be 4096 bytes"));
    }

    #[test]
    fn test_blank_sets_reset_vector() {
        let roms = RomSet::blank(0xC000);
        assert_eq!(roms.kernal()[0x1FFC], 0x00);
        assert_eq!(roms.kernal()[0x1FFD], 0xC0);
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let err = RomSet::load_dir("/nonexistent/rom/dir").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
