//! In-memory transport for unit tests
//!
//! Records every filter installed and every packet sent. Responses come
//! from a queue first; once it is empty the simulated controller answers
//! the inquiry scan activity commands itself.

use crate::activity::InquiryScanActivity;
use crate::error::HciError;
use crate::hci::filter::RawFilter;
use crate::hci::packet::{CommandComplete, HciCommand};
use crate::hci::transport::HciTransport;
use std::collections::VecDeque;
use std::time::Duration;

pub(crate) struct MockTransport {
    pub filter: RawFilter,
    pub filter_sets: Vec<RawFilter>,
    pub sent: Vec<HciCommand>,
    pub responses: VecDeque<Result<Vec<u8>, HciError>>,
    pub controller: Option<InquiryScanActivity>,
    pub last_timeout: Option<Option<Duration>>,
    pub fail_filter_read: bool,
    /// Zero-based index of the `set_filter` call that fails
    pub fail_filter_set: Option<usize>,
    pub fail_send: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        let mut filter = [0u8; 14];
        for (i, byte) in filter.iter_mut().enumerate() {
            *byte = 0xA0 + i as u8;
        }

        MockTransport {
            filter: RawFilter(filter),
            filter_sets: Vec::new(),
            sent: Vec::new(),
            responses: VecDeque::new(),
            controller: None,
            last_timeout: None,
            fail_filter_read: false,
            fail_filter_set: None,
            fail_send: false,
        }
    }

    pub fn with_controller(activity: InquiryScanActivity) -> Self {
        let mut mock = Self::new();
        mock.controller = Some(activity);
        mock
    }

    pub fn respond(&mut self, packet: Vec<u8>) {
        self.responses.push_back(Ok(packet));
    }

    pub fn respond_err(&mut self, err: HciError) {
        self.responses.push_back(Err(err));
    }

    fn answer(&mut self) -> Option<Vec<u8>> {
        let command = self.sent.last()?.clone();
        let current = self.controller.as_mut()?;

        let return_parameters = match command {
            HciCommand::ReadInquiryScanActivity => current.encode().to_vec(),
            HciCommand::WriteInquiryScanActivity { interval, window } => {
                *current = InquiryScanActivity::new(interval, window);
                Vec::new()
            }
            _ => return None,
        };

        Some(
            CommandComplete {
                num_packets: 1,
                opcode: command.opcode(),
                status: 0,
                return_parameters,
            }
            .to_packet(),
        )
    }
}

fn injected() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, "injected failure")
}

impl HciTransport for MockTransport {
    fn filter(&self) -> Result<RawFilter, HciError> {
        if self.fail_filter_read {
            return Err(HciError::SocketOption(injected()));
        }
        Ok(self.filter)
    }

    fn set_filter(&mut self, filter: &RawFilter) -> Result<(), HciError> {
        let call = self.filter_sets.len();
        self.filter_sets.push(*filter);

        if self.fail_filter_set == Some(call) {
            return Err(HciError::SocketOption(injected()));
        }

        self.filter = *filter;
        Ok(())
    }

    fn send_command(&mut self, command: &HciCommand) -> Result<(), HciError> {
        if self.fail_send {
            return Err(HciError::Send(injected()));
        }
        command.to_packet()?;
        self.sent.push(command.clone());
        Ok(())
    }

    fn read_packet(&mut self, timeout: Option<Duration>) -> Result<Vec<u8>, HciError> {
        self.last_timeout = Some(timeout);

        if let Some(response) = self.responses.pop_front() {
            return response;
        }

        self.answer().ok_or(HciError::Timeout(timeout.unwrap_or_default()))
    }
}
