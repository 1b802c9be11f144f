//! Explicit handle over one controller channel

use super::{read_inquiry_scan_activity, write_inquiry_scan_activity, InquiryScanActivity};
use crate::config::ClientConfig;
use crate::error::HciError;
use crate::hci::{HciSocket, HciTransport};
use std::time::Duration;

/// Handle to one local controller.
///
/// Operations borrow the client mutably, so a channel never has more than
/// one command in flight.
#[derive(Debug)]
pub struct InquiryScanClient<T: HciTransport = HciSocket> {
    transport: T,
    timeout: Option<Duration>,
}

impl InquiryScanClient<HciSocket> {
    /// Opens the controller named by `config`
    pub fn open(config: &ClientConfig) -> Result<Self, HciError> {
        let socket = HciSocket::open(config.device_id)?;
        Ok(Self::new(socket, config.timeout))
    }
}

impl<T: HciTransport> InquiryScanClient<T> {
    pub fn new(transport: T, timeout: Option<Duration>) -> Self {
        Self { transport, timeout }
    }

    pub fn read(&mut self) -> Result<InquiryScanActivity, HciError> {
        read_inquiry_scan_activity(&mut self.transport, self.timeout)
    }

    pub fn write(&mut self, activity: InquiryScanActivity) -> Result<(), HciError> {
        write_inquiry_scan_activity(&mut self.transport, activity, self.timeout)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }
}
