//! HCI packet structures and parsing
//!
//! This module contains structures and methods for handling HCI command and
//! event packets.

use crate::error::HciError;
use crate::hci::constants::*;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

/// Packs an OGF/OCF pair into a 16-bit opcode
pub const fn opcode_pack(ogf: u8, ocf: u16) -> u16 {
    ((ogf as u16) << 10) | (ocf & 0x03FF)
}

/// Splits an opcode into its OGF and OCF parts
pub const fn opcode_unpack(opcode: u16) -> (u8, u16) {
    ((opcode >> 10) as u8, opcode & 0x03FF)
}

/// HCI commands understood by this library
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HciCommand {
    // Host Controller Commands (OGF: 0x03)
    ReadInquiryScanActivity,
    WriteInquiryScanActivity { interval: u16, window: u16 },

    /// Any other command, sent as-is
    Raw {
        ogf: u8,
        ocf: u16,
        parameters: Vec<u8>,
    },
}

impl HciCommand {
    /// Creates a raw command from its opcode parts and parameters
    pub fn new(ogf: u8, ocf: u16, parameters: Vec<u8>) -> Self {
        Self::Raw {
            ogf,
            ocf,
            parameters,
        }
    }

    /// Get the OGF and OCF for this command
    pub fn opcode_parts(&self) -> (u8, u16) {
        match self {
            Self::ReadInquiryScanActivity => (OGF_HOST_CTL, OCF_READ_INQ_ACTIVITY),
            Self::WriteInquiryScanActivity { .. } => (OGF_HOST_CTL, OCF_WRITE_INQ_ACTIVITY),
            Self::Raw { ogf, ocf, .. } => (*ogf, *ocf),
        }
    }

    pub fn opcode(&self) -> u16 {
        let (ogf, ocf) = self.opcode_parts();
        opcode_pack(ogf, ocf)
    }

    /// Convert the command to its raw parameter bytes
    pub fn parameters(&self) -> Vec<u8> {
        match self {
            Self::ReadInquiryScanActivity => vec![],

            Self::WriteInquiryScanActivity { interval, window } => {
                let mut params = Vec::with_capacity(4);
                params.extend_from_slice(&interval.to_le_bytes());
                params.extend_from_slice(&window.to_le_bytes());
                params
            }

            Self::Raw { parameters, .. } => parameters.clone(),
        }
    }

    /// Convert the command to a raw HCI packet
    pub fn to_packet(&self) -> Result<Vec<u8>, HciError> {
        let params = self.parameters();
        if params.len() > HCI_MAX_PARAM_LEN {
            return Err(HciError::InvalidParamLength(params.len()));
        }

        let mut packet = Vec::with_capacity(4 + params.len());
        packet.push(HCI_COMMAND_PKT);
        packet.extend_from_slice(&self.opcode().to_le_bytes());
        packet.push(params.len() as u8);
        packet.extend_from_slice(&params);
        Ok(packet)
    }
}

/// HCI Event packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HciEvent {
    pub event_code: u8,
    pub parameters: Vec<u8>,
}

impl HciEvent {
    /// Parse an HCI event from a packet as read off the socket, starting
    /// with the packet type indicator
    pub fn from_packet(packet: &[u8]) -> Result<Self, HciError> {
        match packet.first() {
            Some(&HCI_EVENT_PKT) => Self::parse(&packet[1..]),
            Some(other) => Err(HciError::protocol(format!(
                "expected event packet, got packet type 0x{other:02x}"
            ))),
            None => Err(HciError::protocol("empty packet")),
        }
    }

    /// Parse an HCI event from raw bytes following the packet type
    pub fn parse(data: &[u8]) -> Result<Self, HciError> {
        if data.len() < HCI_EVENT_HDR_SIZE {
            return Err(HciError::protocol(format!(
                "event header truncated ({} bytes)",
                data.len()
            )));
        }

        let event_code = data[0];
        let parameter_total_length = data[1] as usize;
        let parameters = data
            .get(HCI_EVENT_HDR_SIZE..HCI_EVENT_HDR_SIZE + parameter_total_length)
            .ok_or_else(|| {
                HciError::protocol(format!(
                    "event 0x{event_code:02x} announces {parameter_total_length} parameter bytes, got {}",
                    data.len() - HCI_EVENT_HDR_SIZE
                ))
            })?;

        Ok(HciEvent {
            event_code,
            parameters: parameters.to_vec(),
        })
    }
}

/// Command Complete event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandComplete {
    pub num_packets: u8,
    pub opcode: u16,
    pub status: u8,
    /// Return parameters following the status byte
    pub return_parameters: Vec<u8>,
}

impl CommandComplete {
    pub fn from_event(event: &HciEvent) -> Result<Self, HciError> {
        if event.event_code != EVT_CMD_COMPLETE {
            return Err(HciError::protocol(format!(
                "expected Command Complete event, got event 0x{:02x}",
                event.event_code
            )));
        }

        if event.parameters.len() < EVT_CMD_COMPLETE_SIZE + 1 {
            return Err(HciError::protocol(format!(
                "Command Complete event too short ({} bytes)",
                event.parameters.len()
            )));
        }

        let mut cursor = Cursor::new(&event.parameters[..]);
        let num_packets = cursor.read_u8().map_err(truncated)?;
        let opcode = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
        let status = cursor.read_u8().map_err(truncated)?;
        let return_parameters = event.parameters[cursor.position() as usize..].to_vec();

        Ok(CommandComplete {
            num_packets,
            opcode,
            status,
            return_parameters,
        })
    }

    pub fn from_packet(packet: &[u8]) -> Result<Self, HciError> {
        Self::from_event(&HciEvent::from_packet(packet)?)
    }

    /// Convert the event back to a raw packet, as a controller would send it
    pub fn to_packet(&self) -> Vec<u8> {
        let plen = EVT_CMD_COMPLETE_SIZE + 1 + self.return_parameters.len();
        let mut packet = Vec::with_capacity(1 + HCI_EVENT_HDR_SIZE + plen);
        packet.push(HCI_EVENT_PKT);
        packet.push(EVT_CMD_COMPLETE);
        packet.push(plen as u8);
        packet.push(self.num_packets);
        packet.extend_from_slice(&self.opcode.to_le_bytes());
        packet.push(self.status);
        packet.extend_from_slice(&self.return_parameters);
        packet
    }
}

fn truncated(err: std::io::Error) -> HciError {
    HciError::protocol(format!("Command Complete event truncated: {err}"))
}

/// Short description of an HCI status code, as listed in the Core
/// Specification error code table
pub fn status_description(status: u8) -> &'static str {
    match status {
        0x00 => "Success",
        0x01 => "Unknown HCI Command",
        0x02 => "Unknown Connection Identifier",
        0x03 => "Hardware Failure",
        0x04 => "Page Timeout",
        0x05 => "Authentication Failure",
        0x07 => "Memory Capacity Exceeded",
        0x0C => "Command Disallowed",
        0x0D => "Connection Rejected due to Limited Resources",
        0x11 => "Unsupported Feature or Parameter Value",
        0x12 => "Invalid HCI Command Parameters",
        0x1F => "Unspecified Error",
        0x20 => "Unsupported LMP Parameter Value",
        0x21 => "Role Change Not Allowed",
        0x30 => "Parameter Out Of Mandatory Range",
        0x3A => "Controller Busy",
        _ => "Unknown status",
    }
}
