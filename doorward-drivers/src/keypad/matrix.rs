//! Matrix keypad scanner
//!
//! Rows are push-pull outputs idling HIGH; columns are inputs with
//! pull-ups. Pulling one row LOW makes every pressed key in that row read
//! LOW on its column.
//!
//! Scans are rate-limited to the debounce interval, and a key is reported
//! once when it goes down. Holding a key does not repeat it; the key has
//! to be released (or another key pressed) before it is reported again.
//! When several keys are held, the first one in scan order wins.
//!
//! The row pins must already be HIGH when the keypad is handed over.

use doorward_core::keypad::{Key, COLS, KEYMAP, ROWS};
use doorward_core::traits::{Keypad, KeypadError};
use embedded_hal::digital::{InputPin, OutputPin};

/// Matrix keypad with `R` rows and `C` columns
pub struct MatrixKeypad<RP, CP, const R: usize, const C: usize> {
    rows: [RP; R],
    cols: [CP; C],
    keymap: [[char; C]; R],
    debounce_ms: u32,
    last_scan_ms: Option<u32>,
    /// Key down at the last scan
    held: Option<Key>,
}

impl<RP, CP> MatrixKeypad<RP, CP, ROWS, COLS>
where
    RP: OutputPin,
    CP: InputPin,
{
    /// Standard 4×4 membrane keypad layout
    pub fn new_4x4(rows: [RP; ROWS], cols: [CP; COLS], debounce_ms: u32) -> Self {
        Self::new(rows, cols, KEYMAP, debounce_ms)
    }
}

impl<RP, CP, const R: usize, const C: usize> MatrixKeypad<RP, CP, R, C>
where
    RP: OutputPin,
    CP: InputPin,
{
    /// Create a keypad with a custom layout
    ///
    /// Positions mapped to a character that is not a keypad key are
    /// ignored.
    pub fn new(rows: [RP; R], cols: [CP; C], keymap: [[char; C]; R], debounce_ms: u32) -> Self {
        Self {
            rows,
            cols,
            keymap,
            debounce_ms,
            last_scan_ms: None,
            held: None,
        }
    }

    /// Key down at the last scan
    pub fn held(&self) -> Option<Key> {
        self.held
    }

    /// Scan the whole matrix once
    fn scan(&mut self) -> Result<Option<Key>, KeypadError> {
        for (r, row) in self.rows.iter_mut().enumerate() {
            row.set_low().map_err(|_| KeypadError::Pin)?;

            let mut hit = None;
            for (c, col) in self.cols.iter_mut().enumerate() {
                if col.is_low().map_err(|_| KeypadError::Pin)? {
                    hit = Some(c);
                    break;
                }
            }

            row.set_high().map_err(|_| KeypadError::Pin)?;

            if let Some(c) = hit {
                return Ok(Key::new(self.keymap[r][c]));
            }
        }
        Ok(None)
    }
}

impl<RP, CP, const R: usize, const C: usize> Keypad for MatrixKeypad<RP, CP, R, C>
where
    RP: OutputPin,
    CP: InputPin,
{
    fn poll(&mut self, now_ms: u32) -> Result<Option<Key>, KeypadError> {
        if let Some(last) = self.last_scan_ms {
            if now_ms.wrapping_sub(last) < self.debounce_ms {
                return Ok(None);
            }
        }
        self.last_scan_ms = Some(now_ms);

        let pressed = self.scan()?;
        let fresh = pressed.is_some() && pressed != self.held;
        self.held = pressed;

        Ok(if fresh { pressed } else { None })
    }

    fn reset(&mut self) {
        self.held = None;
        self.last_scan_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Shared wiring state: which row is driven low, which key is held
    struct Matrix {
        driven_row: Cell<Option<usize>>,
        pressed: Cell<Option<(usize, usize)>>,
    }

    impl Matrix {
        fn new() -> Self {
            Self {
                driven_row: Cell::new(None),
                pressed: Cell::new(None),
            }
        }
    }

    struct MockRow<'a> {
        index: usize,
        matrix: &'a Matrix,
    }

    impl ErrorType for MockRow<'_> {
        type Error = Infallible;
    }

    impl OutputPin for MockRow<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.matrix.driven_row.set(Some(self.index));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            if self.matrix.driven_row.get() == Some(self.index) {
                self.matrix.driven_row.set(None);
            }
            Ok(())
        }
    }

    struct MockCol<'a> {
        index: usize,
        matrix: &'a Matrix,
    }

    impl ErrorType for MockCol<'_> {
        type Error = Infallible;
    }

    impl InputPin for MockCol<'_> {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(!self.is_low()?)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(match (self.matrix.driven_row.get(), self.matrix.pressed.get()) {
                (Some(row), Some((r, c))) => row == r && c == self.index,
                _ => false,
            })
        }
    }

    fn keypad(matrix: &Matrix) -> MatrixKeypad<MockRow<'_>, MockCol<'_>, 4, 4> {
        let rows = [0, 1, 2, 3].map(|index| MockRow { index, matrix });
        let cols = [0, 1, 2, 3].map(|index| MockCol { index, matrix });
        MatrixKeypad::new_4x4(rows, cols, 10)
    }

    #[test]
    fn test_idle_keypad_reports_nothing() {
        let matrix = Matrix::new();
        let mut kp = keypad(&matrix);
        assert_eq!(kp.poll(0), Ok(None));
        assert_eq!(kp.poll(10), Ok(None));
    }

    #[test]
    fn test_maps_positions_to_keys() {
        let matrix = Matrix::new();
        let mut kp = keypad(&matrix);

        let cases = [((0, 0), '1'), ((0, 3), 'A'), ((3, 0), '*'), ((3, 2), '#'), ((3, 3), 'D')];
        let mut now = 0;
        for (pos, expected) in cases {
            matrix.pressed.set(Some(pos));
            assert_eq!(kp.poll(now), Ok(Key::new(expected)));
            matrix.pressed.set(None);
            kp.poll(now + 10).unwrap();
            now += 20;
        }
    }

    #[test]
    fn test_held_key_reported_once() {
        let matrix = Matrix::new();
        let mut kp = keypad(&matrix);

        matrix.pressed.set(Some((1, 1)));
        assert_eq!(kp.poll(0), Ok(Key::new('5')));
        assert_eq!(kp.poll(10), Ok(None));
        assert_eq!(kp.poll(20), Ok(None));
        assert_eq!(kp.held(), Key::new('5'));

        matrix.pressed.set(None);
        assert_eq!(kp.poll(30), Ok(None));
        matrix.pressed.set(Some((1, 1)));
        assert_eq!(kp.poll(40), Ok(Key::new('5')));
    }

    #[test]
    fn test_reset_reports_still_held_key_again() {
        let matrix = Matrix::new();
        let mut kp = keypad(&matrix);

        matrix.pressed.set(Some((0, 0)));
        assert_eq!(kp.poll(0), Ok(Key::new('1')));

        // Polling pauses, then resumes much later with the same key down
        kp.reset();
        assert_eq!(kp.held(), None);
        assert_eq!(kp.poll(60_000), Ok(Key::new('1')));
    }

    #[test]
    fn test_scans_rate_limited() {
        let matrix = Matrix::new();
        let mut kp = keypad(&matrix);
        kp.poll(0).unwrap();

        // Press lands inside the debounce window
        matrix.pressed.set(Some((2, 0)));
        assert_eq!(kp.poll(5), Ok(None));
        assert_eq!(kp.poll(10), Ok(Key::new('7')));
    }

    #[test]
    fn test_rows_released_after_scan() {
        let matrix = Matrix::new();
        let mut kp = keypad(&matrix);
        matrix.pressed.set(Some((0, 2)));
        kp.poll(0).unwrap();
        assert_eq!(matrix.driven_row.get(), None);
    }
}
