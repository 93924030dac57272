//! Keyboard matrix decoding.
//!
//! The keyboard is an 8×8 matrix scanned through CIA1:
//! - Port A ($DC00): column select, active low
//! - Port B ($DC01): row sense, active low
//!
//! ```text
//! Col\Row |  0    1    2    3    4    5    6    7
//! --------|------------------------------------------
//!    0    | DEL  RET   →   F7   F1   F3   F5   ↓
//!    1    |  3    W    A    4    Z    S    E  LSHFT
//!    2    |  5    R    D    6    C    F    T    X
//!    3    |  7    Y    G    8    B    H    U    V
//!    4    |  9    I    J    0    M    K    O    N
//!    5    |  +    P    L    -    .    :    @    ,
//!    6    |  £    *    ;  HOME RSHFT =    ↑    /
//!    7    |  1    ←  CTRL   2  SPACE  C=   Q  STOP
//! ```
//!
//! RESTORE is not part of the matrix; it drives NMI directly.

use serde::{Deserialize, Serialize};

/// An abstract key: one crossing of the matrix.
///
/// Host key codes are translated into these by the input adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    pub row: u8,
    pub col: u8,
}

impl Key {
    pub const fn new(row: u8, col: u8) -> Self {
        Self {
            row: row & 7,
            col: col & 7,
        }
    }

    const fn bit(self) -> u64 {
        1u64 << (self.col * 8 + self.row)
    }
}

/// Set of currently pressed keys, one bit per matrix crossing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMatrix {
    pressed: u64,
}

impl KeyMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a matrix from any collection of pressed keys.
    pub fn from_keys(keys: impl IntoIterator<Item = Key>) -> Self {
        let mut matrix = Self::new();
        for key in keys {
            matrix.press(key);
        }
        matrix
    }

    pub fn press(&mut self, key: Key) {
        self.pressed |= key.bit();
    }

    pub fn release(&mut self, key: Key) {
        self.pressed &= !key.bit();
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed & key.bit() != 0
    }

    pub fn release_all(&mut self) {
        self.pressed = 0;
    }

    /// Row lines seen for an active-low column select.
    ///
    /// Every selected column contributes the rows of its pressed keys; the
    /// combined row mask is returned inverted.
    pub fn scan(&self, col_select: u8) -> u8 {
        let mut rows = 0u8;
        for col in 0..8 {
            if col_select & (1 << col) == 0 {
                rows |= (self.pressed >> (col * 8)) as u8;
            }
        }
        !rows
    }
}

/// Matrix positions of the C64 keys.
pub mod keys {
    use super::Key;

    pub const DEL: Key = Key::new(0, 0);
    pub const RETURN: Key = Key::new(1, 0);
    pub const CRSR_RIGHT: Key = Key::new(2, 0);
    pub const F7: Key = Key::new(3, 0);
    pub const F1: Key = Key::new(4, 0);
    pub const F3: Key = Key::new(5, 0);
    pub const F5: Key = Key::new(6, 0);
    pub const CRSR_DOWN: Key = Key::new(7, 0);

    pub const DIGIT_3: Key = Key::new(0, 1);
    pub const W: Key = Key::new(1, 1);
    pub const A: Key = Key::new(2, 1);
    pub const DIGIT_4: Key = Key::new(3, 1);
    pub const Z: Key = Key::new(4, 1);
    pub const S: Key = Key::new(5, 1);
    pub const E: Key = Key::new(6, 1);
    pub const LEFT_SHIFT: Key = Key::new(7, 1);

    pub const DIGIT_5: Key = Key::new(0, 2);
    pub const R: Key = Key::new(1, 2);
    pub const D: Key = Key::new(2, 2);
    pub const DIGIT_6: Key = Key::new(3, 2);
    pub const C: Key = Key::new(4, 2);
    pub const F: Key = Key::new(5, 2);
    pub const T: Key = Key::new(6, 2);
    pub const X: Key = Key::new(7, 2);

    pub const DIGIT_7: Key = Key::new(0, 3);
    pub const Y: Key = Key::new(1, 3);
    pub const G: Key = Key::new(2, 3);
    pub const DIGIT_8: Key = Key::new(3, 3);
    pub const B: Key = Key::new(4, 3);
    pub const H: Key = Key::new(5, 3);
    pub const U: Key = Key::new(6, 3);
    pub const V: Key = Key::new(7, 3);

    pub const DIGIT_9: Key = Key::new(0, 4);
    pub const I: Key = Key::new(1, 4);
    pub const J: Key = Key::new(2, 4);
    pub const DIGIT_0: Key = Key::new(3, 4);
    pub const M: Key = Key::new(4, 4);
    pub const K: Key = Key::new(5, 4);
    pub const O: Key = Key::new(6, 4);
    pub const N: Key = Key::new(7, 4);

    pub const PLUS: Key = Key::new(0, 5);
    pub const P: Key = Key::new(1, 5);
    pub const L: Key = Key::new(2, 5);
    pub const MINUS: Key = Key::new(3, 5);
    pub const PERIOD: Key = Key::new(4, 5);
    pub const COLON: Key = Key::new(5, 5);
    pub const AT: Key = Key::new(6, 5);
    pub const COMMA: Key = Key::new(7, 5);

    pub const POUND: Key = Key::new(0, 6);
    pub const ASTERISK: Key = Key::new(1, 6);
    pub const SEMICOLON: Key = Key::new(2, 6);
    pub const HOME: Key = Key::new(3, 6);
    pub const RIGHT_SHIFT: Key = Key::new(4, 6);
    pub const EQUALS: Key = Key::new(5, 6);
    pub const UP_ARROW: Key = Key::new(6, 6);
    pub const SLASH: Key = Key::new(7, 6);

    pub const DIGIT_1: Key = Key::new(0, 7);
    pub const LEFT_ARROW: Key = Key::new(1, 7);
    pub const CTRL: Key = Key::new(2, 7);
    pub const DIGIT_2: Key = Key::new(3, 7);
    pub const SPACE: Key = Key::new(4, 7);
    pub const COMMODORE: Key = Key::new(5, 7);
    pub const Q: Key = Key::new(6, 7);
    pub const RUN_STOP: Key = Key::new(7, 7);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_no_keys_pressed() {
        let matrix = KeyMatrix::new();
        assert_eq!(matrix.scan(0x00), 0xFF);
        assert_eq!(matrix.scan(0xFE), 0xFF);
    }

    #[test]
    fn test_scan_single_key() {
        let matrix = KeyMatrix::from_keys([keys::A]);

        assert_eq!(matrix.scan(0xFF), 0xFF);
        assert_eq!(matrix.scan(0xFE), 0xFF);
        // Column 1 selected: row 2 pulled low
        assert_eq!(matrix.scan(0xFD), 0xFB);
        assert_eq!(matrix.scan(0x00), 0xFB);
    }

    #[test]
    fn test_scan_ors_rows_of_selected_columns() {
        // A (col 1, row 2), D (col 2, row 2), RETURN (col 0, row 1)
        let matrix = KeyMatrix::from_keys([keys::A, keys::D, keys::RETURN]);

        assert_eq!(matrix.scan(0xFE), 0xFD);
        assert_eq!(matrix.scan(0xF9), 0xFB);
        assert_eq!(matrix.scan(0xF8), 0xF9);
    }

    #[test]
    fn test_press_release() {
        let mut matrix = KeyMatrix::new();
        matrix.press(keys::RUN_STOP);
        assert!(matrix.is_pressed(keys::RUN_STOP));
        assert_eq!(matrix.scan(0x7F), 0x7F);

        matrix.release(keys::RUN_STOP);
        assert!(!matrix.is_pressed(keys::RUN_STOP));

        matrix.press(keys::SPACE);
        matrix.press(keys::Q);
        matrix.release_all();
        assert_eq!(matrix, KeyMatrix::new());
    }

    #[test]
    fn test_key_positions() {
        assert_eq!(keys::A, Key::new(2, 1));
        assert_eq!(keys::SPACE, Key { row: 4, col: 7 });
        assert_eq!(keys::RIGHT_SHIFT, Key { row: 4, col: 6 });
    }
}
