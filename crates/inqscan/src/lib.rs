//! inqscan - read and write a Bluetooth controller's inquiry scan activity
//!
//! This library talks to a local controller over a raw Linux HCI socket and
//! exchanges the Read/Write Inquiry Scan Activity commands with it. Each
//! command runs under a scoped socket filter that is restored afterwards.

pub mod activity;
pub mod config;
pub mod error;
pub mod hci;

// Re-export common types for convenience
pub use activity::{
    read_inquiry_scan_activity, write_inquiry_scan_activity, InquiryScanActivity,
    InquiryScanClient,
};
pub use config::ClientConfig;
pub use error::{Error, HciError};
pub use hci::{HciCommand, HciEvent, HciSocket, HciTransport};
