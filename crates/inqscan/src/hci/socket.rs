//! HCI Socket implementation for Bluetooth communication
//!
//! This module provides a wrapper around the raw HCI socket interface,
//! allowing for communication with Bluetooth controllers.

use crate::error::HciError;
use crate::hci::constants::*;
use crate::hci::filter::RawFilter;
use crate::hci::packet::{HciCommand, HciEvent};
use crate::hci::transport::HciTransport;
use log::{debug, trace};
use std::os::unix::io::{AsRawFd, RawFd};
use std::time::{Duration, Instant};

/// Represents an HCI socket bound to one local controller
#[derive(Debug)]
pub struct HciSocket {
    fd: RawFd,
    dev_id: u16,
}

// Define the sockaddr_hci structure
#[repr(C)]
struct SockaddrHci {
    hci_family: libc::sa_family_t,
    hci_dev: u16,
    hci_channel: u16,
}

impl HciSocket {
    /// Opens a new HCI socket
    ///
    /// # Arguments
    ///
    /// * `dev_id` - The device ID to open (0 for the first device)
    ///
    /// # Returns
    ///
    /// A new `HciSocket` instance or `HciError::DeviceOpen` if the socket
    /// could not be opened or bound
    pub fn open(dev_id: u16) -> Result<Self, HciError> {
        // Open a raw HCI socket
        let fd = unsafe {
            libc::socket(
                AF_BLUETOOTH,
                libc::SOCK_RAW | libc::SOCK_CLOEXEC,
                BTPROTO_HCI,
            )
        };

        if fd < 0 {
            return Err(HciError::DeviceOpen(std::io::Error::last_os_error()));
        }

        // Bind to the specified device
        let addr = SockaddrHci {
            hci_family: AF_BLUETOOTH as libc::sa_family_t,
            hci_dev: dev_id,
            hci_channel: HCI_CHANNEL_RAW,
        };

        let result = unsafe {
            libc::bind(
                fd,
                &addr as *const _ as *const libc::sockaddr,
                std::mem::size_of::<SockaddrHci>() as libc::socklen_t,
            )
        };

        if result < 0 {
            let err = std::io::Error::last_os_error();
            unsafe { libc::close(fd) };
            return Err(HciError::DeviceOpen(err));
        }

        debug!("opened hci{} on fd {}", dev_id, fd);
        Ok(HciSocket { fd, dev_id })
    }

    /// Gets the raw file descriptor for the socket
    pub fn as_raw_fd(&self) -> RawFd {
        self.fd
    }

    pub fn dev_id(&self) -> u16 {
        self.dev_id
    }

    /// Read an HCI event from the socket with an optional timeout
    pub fn read_event(&self, timeout: Option<Duration>) -> Result<HciEvent, HciError> {
        let packet = self.recv(timeout)?;
        HciEvent::from_packet(&packet)
    }

    /// Waits until the socket is readable, or fails with `Timeout`
    fn wait_readable(&self, timeout: Duration) -> Result<(), HciError> {
        let deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            // Round up so a sub-millisecond remainder still waits
            let millis = remaining
                .as_micros()
                .div_ceil(1000)
                .min(libc::c_int::MAX as u128) as libc::c_int;

            let mut pollfd = libc::pollfd {
                fd: self.fd,
                events: libc::POLLIN,
                revents: 0,
            };

            let result = unsafe { libc::poll(&mut pollfd, 1, millis) };

            match result {
                r if r < 0 => {
                    let err = std::io::Error::last_os_error();
                    if err.kind() == std::io::ErrorKind::Interrupted {
                        continue;
                    }
                    return Err(HciError::Receive(err));
                }
                0 => return Err(HciError::Timeout(timeout)),
                _ => return Ok(()),
            }
        }
    }

    fn recv(&self, timeout: Option<Duration>) -> Result<Vec<u8>, HciError> {
        if let Some(timeout) = timeout {
            self.wait_readable(timeout)?;
        }

        let mut buffer = [0u8; HCI_MAX_EVENT_SIZE];
        let bytes_read = unsafe {
            libc::read(
                self.fd,
                buffer.as_mut_ptr() as *mut libc::c_void,
                buffer.len(),
            )
        };

        if bytes_read < 0 {
            return Err(HciError::Receive(std::io::Error::last_os_error()));
        }

        let packet = buffer[..bytes_read as usize].to_vec();
        trace!("hci{} < {}", self.dev_id, hex::encode(&packet));
        Ok(packet)
    }
}

impl HciTransport for HciSocket {
    fn filter(&self) -> Result<RawFilter, HciError> {
        let mut raw = RawFilter::default();
        let mut len = HCI_FILTER_SIZE as libc::socklen_t;

        let result = unsafe {
            libc::getsockopt(
                self.fd,
                SOL_HCI,
                HCI_FILTER,
                raw.0.as_mut_ptr() as *mut libc::c_void,
                &mut len,
            )
        };

        if result < 0 {
            return Err(HciError::SocketOption(std::io::Error::last_os_error()));
        }

        Ok(raw)
    }

    fn set_filter(&mut self, filter: &RawFilter) -> Result<(), HciError> {
        let result = unsafe {
            libc::setsockopt(
                self.fd,
                SOL_HCI,
                HCI_FILTER,
                filter.0.as_ptr() as *const libc::c_void,
                HCI_FILTER_SIZE as libc::socklen_t,
            )
        };

        if result < 0 {
            return Err(HciError::SocketOption(std::io::Error::last_os_error()));
        }

        Ok(())
    }

    /// Sends an HCI command to the controller
    fn send_command(&mut self, command: &HciCommand) -> Result<(), HciError> {
        let packet = command.to_packet()?;
        trace!("hci{} > {}", self.dev_id, hex::encode(&packet));

        match unsafe {
            libc::write(
                self.fd,
                packet.as_ptr() as *const libc::c_void,
                packet.len(),
            )
        } {
            -1 => Err(HciError::Send(std::io::Error::last_os_error())),
            _ => Ok(()),
        }
    }

    fn read_packet(&mut self, timeout: Option<Duration>) -> Result<Vec<u8>, HciError> {
        self.recv(timeout)
    }
}

impl AsRawFd for HciSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl Drop for HciSocket {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.fd);
        }
    }
}
