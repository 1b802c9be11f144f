//! Transport abstraction over an HCI control channel
//!
//! The inquiry scan operations only need four primitives from a channel:
//! reading and replacing its event filter, sending a command and receiving
//! one packet. `HciSocket` provides them against a real controller; tests
//! provide them with an in-memory controller.

use crate::error::HciError;
use crate::hci::filter::RawFilter;
use crate::hci::packet::HciCommand;
use std::time::Duration;

pub trait HciTransport {
    /// Returns the event filter currently installed on the channel
    fn filter(&self) -> Result<RawFilter, HciError>;

    /// Replaces the event filter installed on the channel
    fn set_filter(&mut self, filter: &RawFilter) -> Result<(), HciError>;

    fn send_command(&mut self, command: &HciCommand) -> Result<(), HciError>;

    /// Blocks for one inbound packet, packet type byte included.
    ///
    /// `None` waits forever; otherwise `HciError::Timeout` is returned once
    /// the timeout elapses.
    fn read_packet(&mut self, timeout: Option<Duration>) -> Result<Vec<u8>, HciError>;
}

impl<T: HciTransport + ?Sized> HciTransport for &mut T {
    fn filter(&self) -> Result<RawFilter, HciError> {
        (**self).filter()
    }

    fn set_filter(&mut self, filter: &RawFilter) -> Result<(), HciError> {
        (**self).set_filter(filter)
    }

    fn send_command(&mut self, command: &HciCommand) -> Result<(), HciError> {
        (**self).send_command(command)
    }

    fn read_packet(&mut self, timeout: Option<Duration>) -> Result<Vec<u8>, HciError> {
        (**self).read_packet(timeout)
    }
}
