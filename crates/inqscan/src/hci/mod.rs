//! Bluetooth HCI (Host Controller Interface) implementation
//!
//! This module provides the socket, packet codec and event filter needed to
//! exchange commands with a local controller.

pub mod constants;
pub mod filter;
pub mod packet;
pub mod socket;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;
#[cfg(test)]
mod tests;

pub use filter::{FilterGuard, HciFilter, PacketTypes, RawFilter};
pub use packet::{opcode_pack, opcode_unpack, CommandComplete, HciCommand, HciEvent};
pub use socket::HciSocket;
pub use transport::HciTransport;
