//! HCI socket event filter
//!
//! The kernel only delivers packets to a raw HCI socket that pass its
//! filter: a packet type mask, an event mask and an optional command
//! opcode that Command Complete/Command Status events must carry.

use crate::error::HciError;
use crate::hci::constants::*;
use crate::hci::transport::HciTransport;
use bitflags::bitflags;
use byteorder::{ByteOrder, LittleEndian, NativeEndian};
use log::{debug, warn};

bitflags! {
    /// Packet types accepted by a filter
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PacketTypes: u32 {
        const VENDOR = 1 << 0;
        const COMMAND = 1 << HCI_COMMAND_PKT;
        const ACL = 1 << HCI_ACL_PKT;
        const SCO = 1 << HCI_SCO_PKT;
        const EVENT = 1 << HCI_EVENT_PKT;
    }
}

impl PacketTypes {
    /// Mask bit for a packet type indicator
    pub fn from_packet_type(packet_type: u8) -> Self {
        let bit = if packet_type == HCI_VENDOR_PKT {
            0
        } else {
            packet_type & HCI_FLT_TYPE_BITS
        };
        Self::from_bits_retain(1 << bit)
    }
}

/// The 14-byte filter value exactly as the kernel stores it.
///
/// Saved filters are kept in this form and written back untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RawFilter(pub [u8; HCI_FILTER_SIZE]);

impl RawFilter {
    pub fn as_bytes(&self) -> &[u8; HCI_FILTER_SIZE] {
        &self.0
    }
}

/// Decoded form of `struct hci_filter`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HciFilter {
    pub packet_types: PacketTypes,
    pub event_mask: [u32; 2],
    pub opcode: u16,
}

impl Default for PacketTypes {
    fn default() -> Self {
        PacketTypes::empty()
    }
}

impl HciFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter that only passes the Command Complete event for `opcode`
    pub fn command_complete(opcode: u16) -> Self {
        let mut filter = Self::new();
        filter.set_ptype(HCI_EVENT_PKT);
        filter.set_event(EVT_CMD_COMPLETE);
        filter.set_opcode(opcode);
        filter
    }

    pub fn set_ptype(&mut self, packet_type: u8) {
        self.packet_types |= PacketTypes::from_packet_type(packet_type);
    }

    pub fn set_event(&mut self, event: u8) {
        let bit = event & HCI_FLT_EVENT_BITS;
        self.event_mask[(bit >> 5) as usize] |= 1 << (bit & 31);
    }

    pub fn set_opcode(&mut self, opcode: u16) {
        self.opcode = opcode;
    }

    pub fn passes_event(&self, event: u8) -> bool {
        let bit = event & HCI_FLT_EVENT_BITS;
        self.event_mask[(bit >> 5) as usize] & (1 << (bit & 31)) != 0
    }

    pub fn to_raw(&self) -> RawFilter {
        let mut bytes = [0u8; HCI_FILTER_SIZE];
        NativeEndian::write_u32(&mut bytes[0..4], self.packet_types.bits());
        NativeEndian::write_u32(&mut bytes[4..8], self.event_mask[0]);
        NativeEndian::write_u32(&mut bytes[8..12], self.event_mask[1]);
        LittleEndian::write_u16(&mut bytes[12..14], self.opcode);
        RawFilter(bytes)
    }

    pub fn from_raw(raw: &RawFilter) -> Self {
        let bytes = &raw.0;
        HciFilter {
            packet_types: PacketTypes::from_bits_retain(NativeEndian::read_u32(&bytes[0..4])),
            event_mask: [
                NativeEndian::read_u32(&bytes[4..8]),
                NativeEndian::read_u32(&bytes[8..12]),
            ],
            opcode: LittleEndian::read_u16(&bytes[12..14]),
        }
    }
}

/// Keeps a scoped filter installed on a transport.
///
/// The filter found on the transport when the guard is created is written
/// back by `restore`, or by `Drop` if the guard is dropped first.
pub struct FilterGuard<T: HciTransport> {
    transport: T,
    saved: Option<RawFilter>,
}

impl<T: HciTransport> FilterGuard<T> {
    /// Saves the current filter and installs `scoped`
    pub fn install(transport: T, scoped: &HciFilter) -> Result<Self, HciError> {
        let saved = transport.filter()?;
        debug!("saved HCI filter {}", hex::encode(saved.as_bytes()));

        let mut guard = FilterGuard {
            transport,
            saved: Some(saved),
        };

        let scoped = scoped.to_raw();
        debug!("installing HCI filter {}", hex::encode(scoped.as_bytes()));
        // On failure the guard is dropped here and puts the saved filter back
        guard.transport.set_filter(&scoped)?;

        Ok(guard)
    }

    pub fn transport(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn saved(&self) -> Option<&RawFilter> {
        self.saved.as_ref()
    }

    /// Writes the saved filter back, reporting failure to the caller
    pub fn restore(mut self) -> Result<(), HciError> {
        match self.saved.take() {
            Some(saved) => {
                debug!("restoring HCI filter {}", hex::encode(saved.as_bytes()));
                self.transport.set_filter(&saved)
            }
            None => Ok(()),
        }
    }
}

impl<T: HciTransport> Drop for FilterGuard<T> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            debug!("restoring HCI filter {}", hex::encode(saved.as_bytes()));
            if let Err(e) = self.transport.set_filter(&saved) {
                warn!("Failed to restore HCI filter: {}", e);
            }
        }
    }
}
