//! The 16 fixed VIC-II colours.

/// ARGB32 values for colour indices 0-15.
pub const PALETTE: [u32; 16] = [
    0xFF00_0000, // 0: black
    0xFFFF_FFFF, // 1: white
    0xFF88_3932, // 2: red
    0xFF67_B6BD, // 3: cyan
    0xFF8B_3F96, // 4: purple
    0xFF55_A049, // 5: green
    0xFF40_318D, // 6: blue
    0xFFBF_CE72, // 7: yellow
    0xFF8B_5429, // 8: orange
    0xFF57_4200, // 9: brown
    0xFFB8_6962, // 10: light red
    0xFF50_5050, // 11: dark grey
    0xFF78_7878, // 12: medium grey
    0xFF94_E089, // 13: light green
    0xFF78_68C0, // 14: light blue
    0xFF9F_9F9F, // 15: light grey
];

pub const BLACK: u8 = 0;

/// ARGB32 value of a colour index. Only the low nibble is used.
#[inline]
pub fn argb(index: u8) -> u32 {
    PALETTE[(index & 0x0F) as usize]
}
