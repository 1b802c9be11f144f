//! Error types for the inqscan library
//!
//! This module defines the error types used throughout the library.

use crate::hci::packet::{opcode_unpack, status_description};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to a controller over an HCI socket
#[derive(Error, Debug)]
pub enum HciError {
    #[error("Failed to open HCI device: {0}")]
    DeviceOpen(std::io::Error),

    #[error("Failed to send HCI command: {0}")]
    Send(std::io::Error),

    #[error("Failed to receive HCI event: {0}")]
    Receive(std::io::Error),

    #[error("Failed to access HCI socket filter: {0}")]
    SocketOption(std::io::Error),

    #[error("Timed out after {0:?} waiting for HCI event")]
    Timeout(Duration),

    #[error("Malformed HCI response: {0}")]
    Protocol(String),

    #[error(
        "Command {} failed with status 0x{status:02x} ({})",
        opcode_label(.opcode),
        describe_status(.status)
    )]
    CommandStatus { opcode: u16, status: u8 },

    #[error("Invalid parameter length: {0}")]
    InvalidParamLength(usize),
}

fn opcode_label(opcode: &u16) -> String {
    let (ogf, ocf) = opcode_unpack(*opcode);
    format!("0x{opcode:04x} (OGF 0x{ogf:02x}, OCF 0x{ocf:04x})")
}

fn describe_status(status: &u8) -> &'static str {
    status_description(*status)
}

impl HciError {
    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        HciError::Protocol(message.into())
    }
}

/// Top-level error type
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Hci(#[from] HciError),

    #[error("Invalid value {value:?} for {key}")]
    Config { key: &'static str, value: String },
}
