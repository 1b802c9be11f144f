//! Inquiry Scan Activity
//!
//! Reads and writes the interval/window pair that controls how often, and
//! for how long, a controller listens for inquiries from other devices.
//!
//! Every operation installs a filter passing only the Command Complete
//! event of its own command, sends the command, waits for that one event
//! and puts the previous filter back, on success and on failure alike.

mod client;
mod types;


pub use client::InquiryScanClient;
pub use types::{InquiryScanActivity, RangeError, SLOT};

use crate::error::HciError;
use crate::hci::{CommandComplete, FilterGuard, HciCommand, HciFilter, HciTransport};
use log::{debug, warn};
use std::time::Duration;

/// Reads the controller's current inquiry scan interval and window
pub fn read_inquiry_scan_activity<T: HciTransport>(
    transport: T,
    timeout: Option<Duration>,
) -> Result<InquiryScanActivity, HciError> {
    let complete = execute(transport, &HciCommand::ReadInquiryScanActivity, timeout)?;
    let activity = InquiryScanActivity::decode(&complete.return_parameters)?;
    debug!("read inquiry scan activity: {}", activity);
    Ok(activity)
}

/// Writes a new inquiry scan interval and window.
///
/// The values are sent as given; the controller rejects invalid ones with a
/// non-zero status, surfaced as `HciError::CommandStatus`.
pub fn write_inquiry_scan_activity<T: HciTransport>(
    transport: T,
    activity: InquiryScanActivity,
    timeout: Option<Duration>,
) -> Result<(), HciError> {
    execute(transport, &activity.to_command(), timeout)?;
    debug!("wrote inquiry scan activity: {}", activity);
    Ok(())
}

/// Runs one command under a scoped filter and returns its successful
/// Command Complete event
fn execute<T: HciTransport>(
    transport: T,
    command: &HciCommand,
    timeout: Option<Duration>,
) -> Result<CommandComplete, HciError> {
    let opcode = command.opcode();
    let mut guard = FilterGuard::install(transport, &HciFilter::command_complete(opcode))?;

    let response = exchange(guard.transport(), command, timeout);
    let restored = guard.restore();

    let complete = match (response, restored) {
        (Ok(complete), Ok(())) => complete,
        (Ok(_), Err(e)) => return Err(e),
        (Err(e), Ok(())) => return Err(e),
        (Err(e), Err(restore_err)) => {
            warn!("Failed to restore HCI filter: {}", restore_err);
            return Err(e);
        }
    };

    if complete.status != 0 {
        return Err(HciError::CommandStatus {
            opcode,
            status: complete.status,
        });
    }

    Ok(complete)
}

fn exchange<T: HciTransport>(
    transport: &mut T,
    command: &HciCommand,
    timeout: Option<Duration>,
) -> Result<CommandComplete, HciError> {
    let opcode = command.opcode();
    debug!("sending command 0x{:04x}", opcode);
    transport.send_command(command)?;

    let packet = transport.read_packet(timeout)?;
    let complete = CommandComplete::from_packet(&packet)?;

    if complete.opcode != opcode {
        return Err(HciError::protocol(format!(
            "Command Complete for opcode 0x{:04x}, expected 0x{:04x}",
            complete.opcode, opcode
        )));
    }

    Ok(complete)
}
