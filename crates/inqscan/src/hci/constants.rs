//! HCI protocol constants
//!
//! This module contains constants used in the Bluetooth HCI protocol and
//! the Linux HCI socket interface.

// Bluetooth socket constants
pub const AF_BLUETOOTH: i32 = 31;
pub const BTPROTO_HCI: i32 = 1;
pub const HCI_CHANNEL_RAW: u16 = 0;

// Socket option level and name for the event filter
pub const SOL_HCI: i32 = 0;
pub const HCI_FILTER: i32 = 2;

// struct hci_filter: type mask, event mask[2], opcode
pub const HCI_FILTER_SIZE: usize = 14;

// HCI packet types
pub const HCI_COMMAND_PKT: u8 = 0x01;
pub const HCI_ACL_PKT: u8 = 0x02;
pub const HCI_SCO_PKT: u8 = 0x03;
pub const HCI_EVENT_PKT: u8 = 0x04;
pub const HCI_VENDOR_PKT: u8 = 0xFF;

pub const HCI_FLT_TYPE_BITS: u8 = 31;
pub const HCI_FLT_EVENT_BITS: u8 = 63;

// Maximum size of HCI command parameters
pub const HCI_MAX_PARAM_LEN: usize = 255;

// Packet type + event header + 255 parameter bytes, rounded up
pub const HCI_MAX_EVENT_SIZE: usize = 260;

// Host Controller & Baseband commands
pub const OGF_HOST_CTL: u8 = 0x03;

pub const OCF_READ_INQ_ACTIVITY: u16 = 0x001D;
pub const OCF_WRITE_INQ_ACTIVITY: u16 = 0x001E;

// HCI Events
pub const EVT_CMD_COMPLETE: u8 = 0x0E;
pub const EVT_CMD_STATUS: u8 = 0x0F;

// Sizes of the fixed parts of a Command Complete event
pub const EVT_CMD_COMPLETE_SIZE: usize = 3;
pub const HCI_EVENT_HDR_SIZE: usize = 2;
