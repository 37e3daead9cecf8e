//! Diagnostic UART transmit task
//!
//! Writes one text line per notice from the access loop.

use core::fmt::Write as _;

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;
use heapless::String;

use crate::channels::DIAG_CHANNEL;

/// Longest diagnostic line (a full input echo plus line ending fits)
const LINE_LEN: usize = 64;

/// Diagnostic TX task - drains the diagnostic channel onto UART0
#[embassy_executor::task]
pub async fn diag_tx_task(mut tx: BufferedUartTx) {
    info!("Diagnostic TX task started");

    loop {
        let notice = DIAG_CHANNEL.receive().await;

        let mut line: String<LINE_LEN> = String::new();
        if write!(line, "{}\r\n", notice).is_err() {
            warn!("Diagnostic line too long, dropped");
            continue;
        }

        if let Err(e) = tx.write_all(line.as_bytes()).await {
            warn!("Failed to send diagnostic line: {:?}", e);
        }
    }
}
