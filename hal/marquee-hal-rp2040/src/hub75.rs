//! HUB75 panel scan-out
//!
//! Bit-banged driver for a 64x32, 1/16 scan panel. Two rows are shifted
//! at once (upper and lower half). Colour depth comes from binary code
//! modulation: each bit plane is latched and shown for a time
//! proportional to its weight.
//!
//! `present` only packs the frame into bit planes; the panel is lit
//! by calling `scan` continuously from a task.

use embassy_futures::yield_now;
use embassy_time::{block_for, Duration};
use marquee_display::{Color, DisplayBackend, DisplayError, Framebuffer, PANEL_HEIGHT, PANEL_WIDTH};
use marquee_hal::OutputPin;

/// Rows driven per latch (half the panel)
pub const SCAN_ROWS: usize = PANEL_HEIGHT / 2;

/// Bit planes per channel (top bits of each 8-bit component)
pub const PLANES: usize = 4;

/// On-time of the least significant plane
pub const BASE_ON_TIME_US: u64 = 8;

/// Bits of one packed column: r1 g1 b1 r2 g2 b2
const R1: u8 = 1 << 0;
const G1: u8 = 1 << 1;
const B1: u8 = 1 << 2;
const R2: u8 = 1 << 3;
const G2: u8 = 1 << 4;
const B2: u8 = 1 << 5;

type Plane = [[u8; PANEL_WIDTH]; SCAN_ROWS];

/// Pack one column of a row pair for bit `bit` of each component
pub fn pack_column(upper: Color, lower: Color, bit: u8) -> u8 {
    let on = |component: u8, mask: u8| if component >> bit & 1 == 1 { mask } else { 0 };
    on(upper.r(), R1)
        | on(upper.g(), G1)
        | on(upper.b(), B1)
        | on(lower.r(), R2)
        | on(lower.g(), G2)
        | on(lower.b(), B2)
}

/// Pin set for one HUB75 connector
pub struct Hub75Pins<P> {
    /// r1, g1, b1, r2, g2, b2
    pub rgb: [P; 6],
    /// a, b, c, d
    pub addr: [P; 4],
    pub clk: P,
    pub lat: P,
    /// Output enable, active low
    pub oe: P,
}

/// HUB75 panel driver
pub struct Hub75<P> {
    pins: Hub75Pins<P>,
    planes: [Plane; PLANES],
    lit: bool,
}

impl<P: OutputPin> Hub75<P> {
    /// Take the pins and blank the panel
    pub fn new(mut pins: Hub75Pins<P>) -> Self {
        pins.oe.set_high();
        pins.lat.set_low();
        pins.clk.set_low();
        Self {
            pins,
            planes: [[[0; PANEL_WIDTH]; SCAN_ROWS]; PLANES],
            lit: false,
        }
    }

    /// Drive every row once through all bit planes
    ///
    /// Yields to the executor between rows so other tasks keep running.
    pub async fn scan(&mut self) {
        if !self.lit {
            self.pins.oe.set_high();
            yield_now().await;
            return;
        }

        for row in 0..SCAN_ROWS {
            for plane in 0..PLANES {
                self.shift_row(plane, row);
                // Hold OE high while switching rows and latching
                self.pins.oe.set_high();
                self.select_row(row);
                self.pins.lat.set_high();
                self.pins.lat.set_low();
                self.pins.oe.set_low();
                block_for(Duration::from_micros(BASE_ON_TIME_US << plane));
            }
            self.pins.oe.set_high();
            yield_now().await;
        }
    }

    fn shift_row(&mut self, plane: usize, row: usize) {
        for &bits in self.planes[plane][row].iter() {
            for (i, pin) in self.pins.rgb.iter_mut().enumerate() {
                if bits >> i & 1 == 1 {
                    pin.set_high();
                } else {
                    pin.set_low();
                }
            }
            self.pins.clk.set_high();
            self.pins.clk.set_low();
        }
    }

    fn select_row(&mut self, row: usize) {
        for (i, pin) in self.pins.addr.iter_mut().enumerate() {
            if row >> i & 1 == 1 {
                pin.set_high();
            } else {
                pin.set_low();
            }
        }
    }
}

impl<P: OutputPin> DisplayBackend for Hub75<P> {
    fn present(&mut self, frame: &Framebuffer) -> Result<(), DisplayError> {
        let mut lit = false;
        for (plane, planes) in self.planes.iter_mut().enumerate() {
            let bit = (8 - PLANES + plane) as u8;
            for (row, packed) in planes.iter_mut().enumerate() {
                let upper = frame.row(row);
                let lower = frame.row(row + SCAN_ROWS);
                for (x, column) in packed.iter_mut().enumerate() {
                    *column = pack_column(upper[x], lower[x], bit);
                    lit |= *column != 0;
                }
            }
        }
        self.lit = lit;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.planes = [[[0; PANEL_WIDTH]; SCAN_ROWS]; PLANES];
        self.lit = false;
        self.pins.oe.set_high();
        Ok(())
    }

    fn dimensions(&self) -> (u16, u16) {
        (PANEL_WIDTH as u16, PANEL_HEIGHT as u16)
    }

    fn is_ready(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_column_halves() {
        let bits = pack_column(Color::RED, Color::BLUE, 7);
        assert_eq!(bits, R1 | B2);
    }

    #[test]
    fn test_pack_column_dim_bit_off() {
        // 0x40 has bit 6 set only
        let dim = Color::rgb(0x40, 0, 0);
        assert_eq!(pack_column(dim, Color::BLACK, 7), 0);
        assert_eq!(pack_column(dim, Color::BLACK, 6), R1);
    }

    #[test]
    fn test_pack_column_white() {
        assert_eq!(
            pack_column(Color::WHITE, Color::WHITE, 4),
            R1 | G1 | B1 | R2 | G2 | B2
        );
    }
}
