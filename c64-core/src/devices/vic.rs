//! VIC-II (MOS 6569, PAL) video chip.
//!
//! The beam advances eight pixels per CPU cycle across 504 × 312 raster
//! positions (63 cycles per line). Each step:
//!
//! 1. At the start of a line, latch sprite data for sprites covering it.
//! 2. On a bad line (first display column of a character row) refetch the
//!    40 screen codes and colours and steal 40 cycles from the CPU.
//! 3. Inside the visible area, emit eight pixels: graphics (shifted by the
//!    fine X scroll), then sprites, then the border outside the display
//!    window.
//! 4. Advance the beam. Wrapping the last line hands back the finished frame.
//! 5. On entering a new line, compare it with the raster IRQ line.
//!
//! Pixels are colour indices (0-15) into [`PALETTE`](super::palette::PALETTE).
//! Cell graphics go through precomputed per-byte tables and a small per-cell
//! palette, so the pixel loop has no per-mode branches.

use crate::system::address_bus::AddressBus;
use crate::system::interrupts::{Line, Source};
use log::debug;
use serde::{Deserialize, Serialize};

use super::palette::BLACK;

/// Raster positions per line.
pub const LINE_WIDTH: u16 = 504;
/// Raster lines per frame.
pub const LINES_PER_FRAME: u16 = 312;
/// VIC steps (and CPU cycles) per raster line.
pub const CYCLES_PER_LINE: u32 = LINE_WIDTH as u32 / 8;

/// Width of the emitted frame: 32 px border, 320 px display, 32 px border.
pub const FRAME_WIDTH: usize = 384;
/// Height of the emitted frame.
pub const FRAME_HEIGHT: usize = 272;

/// Register window size; the chip repeats every 64 bytes.
pub const REGISTER_COUNT: usize = 0x40;

/// Interrupt bits in $D019/$D01A.
pub const IRQ_RASTER: u8 = 0x01;
pub const IRQ_SPRITE_BACKGROUND: u8 = 0x02;
pub const IRQ_SPRITE_SPRITE: u8 = 0x04;

/// Cycles stolen from the CPU on a bad line.
pub const BAD_LINE_CYCLES: u32 = 40;

const FIRST_VISIBLE_LINE: u16 = 16;
const FIRST_DMA_LINE: u16 = 0x30;
const LAST_DMA_LINE: u16 = 0xF7;
const DISPLAY_LEFT: u16 = 32;
const DISPLAY_RIGHT: u16 = DISPLAY_LEFT + 320;
const COLUMNS: usize = 40;

/// Sprite X coordinate 24 lines up with the left edge of the display.
const SPRITE_X_OFFSET: i32 = 8;
const SPRITE_HEIGHT: u16 = 21;

/// Pixel (0 = left) to bit value for a hires byte.
static HIRES: [[u8; 8]; 256] = hires_table();
/// Pixel to 2-bit colour selector for a multicolour byte.
static MULTICOLOR: [[u8; 8]; 256] = multicolor_table();
/// Foreground pixels of a multicolour byte (selectors %10 and %11).
static MULTICOLOR_FOREGROUND: [u8; 256] = multicolor_foreground_table();

const fn hires_table() -> [[u8; 8]; 256] {
    let mut table = [[0u8; 8]; 256];
    let mut byte = 0;
    while byte < 256 {
        let mut px = 0;
        while px < 8 {
            table[byte][px] = ((byte >> (7 - px)) & 1) as u8;
            px += 1;
        }
        byte += 1;
    }
    table
}

const fn multicolor_table() -> [[u8; 8]; 256] {
    let mut table = [[0u8; 8]; 256];
    let mut byte = 0;
    while byte < 256 {
        let mut px = 0;
        while px < 8 {
            table[byte][px] = ((byte >> (6 - (px & !1))) & 3) as u8;
            px += 1;
        }
        byte += 1;
    }
    table
}

const fn multicolor_foreground_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut byte = 0;
    while byte < 256 {
        let mut mask = 0u8;
        let mut pair = 0;
        while pair < 4 {
            let shift = 6 - 2 * pair;
            if (byte >> shift) & 2 != 0 {
                mask |= 3 << shift;
            }
            pair += 1;
        }
        table[byte] = mask;
        byte += 1;
    }
    table
}

/// Eight pixels of cell graphics plus which of them count as foreground
/// (bit 7 = leftmost) for sprite priority and collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    colors: [u8; 8],
    foreground: u8,
}

impl Cell {
    fn blank(color: u8) -> Self {
        Self {
            colors: [color; 8],
            foreground: 0,
        }
    }

    fn hires(byte: u8, background: u8, foreground: u8) -> Self {
        let palette = [background, foreground];
        Self {
            colors: HIRES[byte as usize].map(|bit| palette[bit as usize]),
            foreground: byte,
        }
    }

    fn multicolor(byte: u8, palette: [u8; 4]) -> Self {
        Self {
            colors: MULTICOLOR[byte as usize].map(|sel| palette[sel as usize]),
            foreground: MULTICOLOR_FOREGROUND[byte as usize],
        }
    }
}

/// Display mode selected by ECM, BMM and MCM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphicsMode {
    StandardText,
    MulticolorText,
    Bitmap,
    MulticolorBitmap,
    ExtendedColorText,
    /// Any other combination: the chip outputs black.
    Invalid,
}

/// A finished frame of colour indices, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pixels: Vec<u8>,
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    pub fn new() -> Self {
        Self {
            pixels: vec![0; FRAME_WIDTH * FRAME_HEIGHT],
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * FRAME_WIDTH + x]
    }

    pub fn row(&self, y: usize) -> &[u8] {
        &self.pixels[y * FRAME_WIDTH..(y + 1) * FRAME_WIDTH]
    }

    /// Converts to ARGB32 through the fixed palette.
    pub fn to_argb(&self) -> Vec<u32> {
        self.pixels.iter().map(|&c| super::palette::argb(c)).collect()
    }
}

/// Serializable VIC state. The frame in progress is not included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VicState {
    pub registers: Vec<u8>,
    pub raster_x: u16,
    pub raster_y: u16,
    pub irq_status: u8,
    pub sprite_sprite: u8,
    pub sprite_background: u8,
    pub display_latch: bool,
    pub bank: u8,
    pub row: u16,
    pub row_start: u16,
    pub row_valid: bool,
    pub char_line: Vec<u8>,
    pub color_line: Vec<u8>,
    pub sprite_data: [u32; 8],
    pub sprite_active: u8,
}

/// MOS 6569 state.
pub struct Vic {
    /// Registers as last written
    regs: [u8; REGISTER_COUNT],

    // Decoded from `regs`
    border: u8,
    background: [u8; 4],
    sprite_multicolor: [u8; 2],
    sprite_color: [u8; 8],
    sprite_x: [u16; 8],
    screen_base: u16,
    char_base: u16,
    bitmap_base: u16,
    raster_compare: u16,
    ier: u8,

    irr: u8,
    sprite_sprite: u8,
    sprite_background: u8,

    x: u16,
    y: u16,
    /// DEN as sampled for bad-line purposes
    den_latch: bool,
    bank: u8,

    /// Character row of the buffered line
    row: u16,
    /// Raster line of the last bad line
    row_start: u16,
    row_valid: bool,
    char_line: [u8; COLUMNS],
    color_line: [u8; COLUMNS],

    /// 24 bits per sprite, leftmost pixel in bit 23
    sprite_data: [u32; 8],
    sprite_active: u8,

    prev: Cell,
    frame: Frame,
}

impl Default for Vic {
    fn default() -> Self {
        Self::new()
    }
}

impl Vic {
    pub fn new() -> Self {
        let mut vic = Self {
            regs: [0; REGISTER_COUNT],
            border: 0,
            background: [0; 4],
            sprite_multicolor: [0; 2],
            sprite_color: [0; 8],
            sprite_x: [0; 8],
            screen_base: 0,
            char_base: 0,
            bitmap_base: 0,
            raster_compare: 0,
            ier: 0,
            irr: 0,
            sprite_sprite: 0,
            sprite_background: 0,
            x: 0,
            y: 0,
            den_latch: false,
            bank: 0,
            row: 0,
            row_start: 0,
            row_valid: false,
            char_line: [0; COLUMNS],
            color_line: [0; COLUMNS],
            sprite_data: [0; 8],
            sprite_active: 0,
            prev: Cell::blank(0),
            frame: Frame::new(),
        };

        // Power-on values as left by the KERNAL
        vic.write(0x11, 0x1B);
        vic.write(0x16, 0xC8);
        vic.write(0x18, 0x15);
        vic.write(0x20, 0x0E);
        vic.write(0x21, 0x06);
        vic.den_latch = vic.den();
        vic
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advances the beam by one cycle (eight pixels).
    ///
    /// `bank` is the 16 KiB bank selected through CIA2. Returns the finished
    /// frame on the step that completes the last raster line.
    pub fn step(&mut self, bus: &mut AddressBus, bank: u8) -> Option<Frame> {
        let bank = bank & 3;
        if bank != self.bank {
            debug!("VIC bank {} -> {}", self.bank, bank);
            self.bank = bank;
        }

        if self.y == FIRST_DMA_LINE && self.den() {
            self.den_latch = true;
        }
        if self.x == 0 {
            self.fetch_sprites(bus);
        }
        if self.x == DISPLAY_LEFT && self.is_bad_line() {
            self.fetch_row(bus);
            bus.interrupts_mut().request_bus(BAD_LINE_CYCLES);
        }
        if self.is_visible() {
            self.draw(bus);
        }

        let frame = self.advance();
        bus.interrupts_mut()
            .drive(Source::Vic, Line::Irq, self.irq_asserted());
        frame
    }

    /// Register read. Collision registers clear on read.
    pub fn read(&mut self, addr: u16) -> u8 {
        match (addr as usize) & (REGISTER_COUNT - 1) {
            0x1E => std::mem::take(&mut self.sprite_sprite),
            0x1F => std::mem::take(&mut self.sprite_background),
            reg => self.peek(reg),
        }
    }

    /// Register read without side effects.
    pub fn peek(&self, reg: usize) -> u8 {
        let reg = reg & (REGISTER_COUNT - 1);
        match reg {
            0x11 => (self.regs[0x11] & 0x7F) | ((self.y >> 1) & 0x80) as u8,
            0x12 => self.y as u8,
            0x16 => self.regs[0x16] | 0xC0,
            0x18 => self.regs[0x18] | 0x01,
            0x19 => {
                let pending = if self.irq_asserted() { 0x80 } else { 0 };
                self.irr | 0x70 | pending
            }
            0x1A => self.ier | 0xF0,
            0x1E => self.sprite_sprite,
            0x1F => self.sprite_background,
            0x20..=0x2E => self.regs[reg] | 0xF0,
            0x2F..=0x3F => 0xFF,
            _ => self.regs[reg],
        }
    }

    /// Register write.
    pub fn write(&mut self, addr: u16, value: u8) {
        let reg = (addr as usize) & (REGISTER_COUNT - 1);
        match reg {
            0x19 => self.irr &= !(value & 0x0F),
            0x1E | 0x1F | 0x2F..=0x3F => {}
            _ => {
                let compare = self.raster_compare;
                self.regs[reg] = value;
                self.decode(reg);
                if self.raster_compare != compare && self.raster_compare == self.y {
                    self.irr |= IRQ_RASTER;
                }
            }
        }
    }

    fn decode(&mut self, reg: usize) {
        let value = self.regs[reg];
        match reg {
            0x00..=0x0F if reg % 2 == 0 => self.decode_sprite_x(reg / 2),
            0x10 => (0..8).for_each(|n| self.decode_sprite_x(n)),
            0x11 | 0x12 => {
                self.raster_compare =
                    (u16::from(self.regs[0x11] & 0x80) << 1) | u16::from(self.regs[0x12]);
            }
            0x18 => {
                self.screen_base = u16::from(value >> 4) * 0x0400;
                self.char_base = u16::from((value >> 1) & 0x07) * 0x0800;
                self.bitmap_base = u16::from(value & 0x08) * 0x0400;
            }
            0x1A => self.ier = value & 0x0F,
            0x20 => self.border = value & 0x0F,
            0x21..=0x24 => self.background[reg - 0x21] = value & 0x0F,
            0x25 | 0x26 => self.sprite_multicolor[reg - 0x25] = value & 0x0F,
            0x27..=0x2E => self.sprite_color[reg - 0x27] = value & 0x0F,
            _ => {}
        }
    }

    fn decode_sprite_x(&mut self, n: usize) {
        let msb = u16::from((self.regs[0x10] >> n) & 1) << 8;
        self.sprite_x[n] = msb | u16::from(self.regs[n * 2]);
    }

    pub fn irq_asserted(&self) -> bool {
        self.irr & self.ier != 0
    }

    /// Latched interrupt sources ($D019 low nibble).
    pub fn irq_status(&self) -> u8 {
        self.irr
    }

    pub fn raster_x(&self) -> u16 {
        self.x
    }

    pub fn raster_y(&self) -> u16 {
        self.y
    }

    /// Moves the beam. `x` is rounded down to a cycle boundary.
    pub fn set_raster(&mut self, x: u16, y: u16) {
        self.x = (x % LINE_WIDTH) & !7;
        self.y = y % LINES_PER_FRAME;
    }

    pub fn raster_compare(&self) -> u16 {
        self.raster_compare
    }

    pub fn bank(&self) -> u8 {
        self.bank
    }

    pub fn border_color(&self) -> u8 {
        self.border
    }

    pub fn background_color(&self, index: usize) -> u8 {
        self.background[index & 3]
    }

    pub fn screen_base(&self) -> u16 {
        self.screen_base
    }

    pub fn char_base(&self) -> u16 {
        self.char_base
    }

    pub fn bitmap_base(&self) -> u16 {
        self.bitmap_base
    }

    pub fn char_line(&self) -> &[u8; COLUMNS] {
        &self.char_line
    }

    pub fn color_line(&self) -> &[u8; COLUMNS] {
        &self.color_line
    }

    /// The frame being drawn.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn x_scroll(&self) -> u8 {
        self.regs[0x16] & 0x07
    }

    pub fn y_scroll(&self) -> u8 {
        self.regs[0x11] & 0x07
    }

    pub fn den(&self) -> bool {
        self.regs[0x11] & 0x10 != 0
    }

    pub fn mode(&self) -> GraphicsMode {
        let ecm = self.regs[0x11] & 0x40 != 0;
        let bmm = self.regs[0x11] & 0x20 != 0;
        let mcm = self.regs[0x16] & 0x10 != 0;
        match (ecm, bmm, mcm) {
            (false, false, false) => GraphicsMode::StandardText,
            (false, false, true) => GraphicsMode::MulticolorText,
            (false, true, false) => GraphicsMode::Bitmap,
            (false, true, true) => GraphicsMode::MulticolorBitmap,
            (true, false, false) => GraphicsMode::ExtendedColorText,
            _ => GraphicsMode::Invalid,
        }
    }

    /// Returns `true` if the current beam position triggers a character fetch.
    pub fn is_bad_line(&self) -> bool {
        self.den_latch
            && (FIRST_DMA_LINE..=LAST_DMA_LINE).contains(&self.y)
            && (self.y & 7) as u8 == self.y_scroll()
    }

    /// Display window as (left, right, top, bottom), right and bottom exclusive.
    pub fn display_window(&self) -> (u16, u16, u16, u16) {
        let (left, right) = if self.regs[0x16] & 0x08 != 0 {
            (DISPLAY_LEFT, DISPLAY_RIGHT)
        } else {
            (DISPLAY_LEFT + 7, DISPLAY_RIGHT - 9)
        };
        let (top, bottom) = if self.regs[0x11] & 0x08 != 0 {
            (51, 251)
        } else {
            (55, 247)
        };
        (left, right, top, bottom)
    }

    fn is_visible(&self) -> bool {
        let last = FIRST_VISIBLE_LINE + FRAME_HEIGHT as u16;
        (FIRST_VISIBLE_LINE..last).contains(&self.y) && (self.x as usize) < FRAME_WIDTH
    }

    fn fetch_row(&mut self, bus: &AddressBus) {
        self.row = (self.y - FIRST_DMA_LINE - u16::from(self.y_scroll())) / 8;
        self.row_start = self.y;
        self.row_valid = true;

        let base = self.row * COLUMNS as u16;
        for col in 0..COLUMNS {
            let index = base + col as u16;
            self.char_line[col] = bus.vic_read(self.bank, self.screen_base + index);
            self.color_line[col] = bus.color_ram(index);
        }
    }

    fn fetch_sprites(&mut self, bus: &AddressBus) {
        self.sprite_active = 0;
        let enabled = self.regs[0x15];
        let expand_y = self.regs[0x17];

        for n in 0..8 {
            if enabled & (1 << n) == 0 {
                continue;
            }
            let expanded = expand_y & (1 << n) != 0;
            let height = if expanded {
                SPRITE_HEIGHT * 2
            } else {
                SPRITE_HEIGHT
            };
            let top = u16::from(self.regs[n * 2 + 1]) + 1;
            if self.y < top || self.y >= top + height {
                continue;
            }

            let mut line = self.y - top;
            if expanded {
                line /= 2;
            }
            let pointer = bus.vic_read(self.bank, self.screen_base + 0x03F8 + n as u16);
            let addr = u16::from(pointer) * 64 + line * 3;
            self.sprite_data[n] = (0..3).fold(0u32, |data, k| {
                (data << 8) | u32::from(bus.vic_read(self.bank, addr + k))
            });
            self.sprite_active |= 1 << n;
        }
    }

    fn draw(&mut self, bus: &AddressBus) {
        let mut pixels = [self.border; 8];

        if self.den_latch {
            let cell = if (DISPLAY_LEFT..DISPLAY_RIGHT).contains(&self.x) {
                self.cell(bus, ((self.x - DISPLAY_LEFT) / 8) as usize)
            } else {
                Cell::blank(self.background[0])
            };
            let (mut colors, foreground) = self.scroll(cell);
            self.overlay_sprites(&mut colors, foreground);

            let (left, right, top, bottom) = self.display_window();
            if (top..bottom).contains(&self.y) {
                for (i, pixel) in pixels.iter_mut().enumerate() {
                    if (left..right).contains(&(self.x + i as u16)) {
                        *pixel = colors[i];
                    }
                }
            }
        }

        let offset = (self.y - FIRST_VISIBLE_LINE) as usize * FRAME_WIDTH + self.x as usize;
        self.frame.pixels[offset..offset + 8].copy_from_slice(&pixels);
    }

    /// Graphics for display column `col` on the current line.
    fn cell(&self, bus: &AddressBus, col: usize) -> Cell {
        let bg = self.background;
        let line = self.y.wrapping_sub(self.row_start);
        if !self.row_valid || line >= 8 {
            return Cell::blank(bg[0]);
        }

        let code = self.char_line[col];
        let color = self.color_line[col];
        let index = self.row * COLUMNS as u16 + col as u16;
        let char_byte = |code: u8| {
            bus.vic_read(self.bank, self.char_base + u16::from(code) * 8 + line)
        };
        let bitmap_byte = || bus.vic_read(self.bank, self.bitmap_base + index * 8 + line);

        match self.mode() {
            GraphicsMode::StandardText => Cell::hires(char_byte(code), bg[0], color),
            GraphicsMode::MulticolorText if color & 0x08 != 0 => {
                Cell::multicolor(char_byte(code), [bg[0], bg[1], bg[2], color & 0x07])
            }
            GraphicsMode::MulticolorText => Cell::hires(char_byte(code), bg[0], color & 0x07),
            GraphicsMode::Bitmap => Cell::hires(bitmap_byte(), code & 0x0F, code >> 4),
            GraphicsMode::MulticolorBitmap => {
                Cell::multicolor(bitmap_byte(), [bg[0], code >> 4, code & 0x0F, color])
            }
            GraphicsMode::ExtendedColorText => {
                Cell::hires(char_byte(code & 0x3F), bg[(code >> 6) as usize], color)
            }
            GraphicsMode::Invalid => Cell::blank(BLACK),
        }
    }

    /// Delays cell output by the fine X scroll, pulling the tail of the
    /// previous cell into the left of this group.
    fn scroll(&mut self, cell: Cell) -> ([u8; 8], u8) {
        let shift = self.x_scroll() as usize;
        let mut window = [0u8; 16];
        window[..8].copy_from_slice(&self.prev.colors);
        window[8..].copy_from_slice(&cell.colors);

        let mut colors = [0u8; 8];
        colors.copy_from_slice(&window[8 - shift..16 - shift]);
        let foreground =
            (((u16::from(self.prev.foreground) << 8) | u16::from(cell.foreground)) >> shift) as u8;

        self.prev = cell;
        (colors, foreground)
    }

    fn overlay_sprites(&mut self, colors: &mut [u8; 8], foreground: u8) {
        if self.sprite_active == 0 {
            return;
        }
        let priority = self.regs[0x1B];

        for (i, color) in colors.iter_mut().enumerate() {
            let px = self.x + i as u16;
            let mut coverage = 0u8;
            let mut front = None;
            for n in 0..8 {
                if self.sprite_active & (1 << n) == 0 {
                    continue;
                }
                if let Some(sprite_color) = self.sprite_pixel(n, px) {
                    coverage |= 1 << n;
                    front.get_or_insert((n, sprite_color));
                }
            }

            let behind = foreground & (0x80 >> i) != 0;
            if coverage.count_ones() >= 2 {
                if self.sprite_sprite == 0 {
                    self.irr |= IRQ_SPRITE_SPRITE;
                }
                self.sprite_sprite |= coverage;
            }
            if coverage != 0 && behind {
                if self.sprite_background == 0 {
                    self.irr |= IRQ_SPRITE_BACKGROUND;
                }
                self.sprite_background |= coverage;
            }

            if let Some((n, sprite_color)) = front {
                if !(behind && priority & (1 << n) != 0) {
                    *color = sprite_color;
                }
            }
        }
    }

    /// Colour of sprite `n` at frame column `px`, or `None` if transparent.
    fn sprite_pixel(&self, n: usize, px: u16) -> Option<u8> {
        let expanded = self.regs[0x1D] & (1 << n) != 0;
        let width = if expanded { 48 } else { 24 };
        let offset = i32::from(px) - (i32::from(self.sprite_x[n]) + SPRITE_X_OFFSET);
        if !(0..width).contains(&offset) {
            return None;
        }

        let bit = (if expanded { offset / 2 } else { offset }) as u32;
        let data = self.sprite_data[n];
        if self.regs[0x1C] & (1 << n) != 0 {
            match (data >> (22 - (bit & !1))) & 3 {
                0 => None,
                1 => Some(self.sprite_multicolor[0]),
                2 => Some(self.sprite_color[n]),
                _ => Some(self.sprite_multicolor[1]),
            }
        } else if (data >> (23 - bit)) & 1 != 0 {
            Some(self.sprite_color[n])
        } else {
            None
        }
    }

    fn advance(&mut self) -> Option<Frame> {
        self.x += 8;
        if self.x < LINE_WIDTH {
            return None;
        }

        self.x = 0;
        self.y += 1;
        let mut frame = None;
        if self.y == LINES_PER_FRAME {
            self.y = 0;
            self.den_latch = self.den();
            self.row_valid = false;
            frame = Some(std::mem::take(&mut self.frame));
        }
        if self.y == self.raster_compare {
            self.irr |= IRQ_RASTER;
        }
        frame
    }

    pub fn state(&self) -> VicState {
        VicState {
            registers: self.regs.to_vec(),
            raster_x: self.x,
            raster_y: self.y,
            irq_status: self.irr,
            sprite_sprite: self.sprite_sprite,
            sprite_background: self.sprite_background,
            display_latch: self.den_latch,
            bank: self.bank,
            row: self.row,
            row_start: self.row_start,
            row_valid: self.row_valid,
            char_line: self.char_line.to_vec(),
            color_line: self.color_line.to_vec(),
            sprite_data: self.sprite_data,
            sprite_active: self.sprite_active,
        }
    }

    /// Restores a saved state and starts a fresh frame buffer.
    ///
    /// Short vectors leave the remaining registers or buffer bytes zeroed.
    pub fn restore_state(&mut self, state: &VicState) {
        *self = Self::new();
        for (reg, &value) in state.registers.iter().take(REGISTER_COUNT).enumerate() {
            self.regs[reg] = value;
        }
        for reg in 0..REGISTER_COUNT {
            self.decode(reg);
        }

        self.set_raster(state.raster_x, state.raster_y);
        self.irr = state.irq_status & 0x0F;
        self.sprite_sprite = state.sprite_sprite;
        self.sprite_background = state.sprite_background;
        self.den_latch = state.display_latch;
        self.bank = state.bank & 3;
        self.row = state.row.min(24);
        self.row_start = state.row_start;
        self.row_valid = state.row_valid;
        copy_prefix(&mut self.char_line, &state.char_line);
        copy_prefix(&mut self.color_line, &state.color_line);
        self.sprite_data = state.sprite_data;
        self.sprite_active = state.sprite_active;
    }
}

fn copy_prefix(dst: &mut [u8], src: &[u8]) {
    let len = dst.len().min(src.len());
    dst[..len].copy_from_slice(&src[..len]);
}
