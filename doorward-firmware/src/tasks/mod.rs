//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels.

pub mod access;
pub mod diag_tx;

pub use access::access_task;
pub use diag_tx::diag_tx_task;
