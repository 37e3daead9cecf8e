//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use doorward_core::access::Notice;

/// Channel capacity for diagnostic notices
const DIAG_CHANNEL_SIZE: usize = 16;

/// Notices from the access loop to the diagnostic UART.
///
/// The access task only ever `try_send`s, so a slow UART drops lines
/// instead of stalling the loop.
pub static DIAG_CHANNEL: Channel<CriticalSectionRawMutex, Notice, DIAG_CHANNEL_SIZE> =
    Channel::new();
