//! Panel refresh task
//!
//! Scans the HUB75 panel continuously, picking up a new frame whenever
//! the app task publishes one.

use defmt::*;

use marquee_display::DisplayBackend;
use marquee_hal_rp2040::gpio::Line;
use marquee_hal_rp2040::hub75::Hub75;

use crate::channels::{FRAME, FRAME_READY};

/// Display task
#[embassy_executor::task]
pub async fn display_task(mut panel: Hub75<Line<'static>>) -> ! {
    info!("Display task started");

    loop {
        if FRAME_READY.try_take().is_some() {
            let result = FRAME.lock(|frame| panel.present(&frame.borrow()));
            if let Err(e) = result {
                warn!("present failed: {:?}", e);
            }
        }
        panel.scan().await;
    }
}
