//! Reads, and optionally writes, the inquiry scan activity of a local
//! Bluetooth controller.
//!
//! ```text
//! inqscan                      print the current interval and window
//! inqscan <interval> <window>  write new values, then print them back
//! ```
//!
//! Values are in 625 µs slots, decimal or `0x`-prefixed hex. The controller
//! index and response timeout come from `HCI_DEVICE` and `HCI_TIMEOUT_MS`.

use inqscan::{ClientConfig, HciTransport, InquiryScanActivity, InquiryScanClient};
use log::{info, warn};
use std::num::ParseIntError;
use std::process::ExitCode;

fn main() -> ExitCode {
    pretty_env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let target = match parse_target(&args) {
        Ok(target) => target,
        Err(e) => {
            eprintln!("Invalid argument: {}", e);
            eprintln!("usage: inqscan [<interval> <window>]");
            return ExitCode::FAILURE;
        }
    };

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut client = match connect(&config) {
        Ok(client) => client,
        Err(code) => return code,
    };

    run(&mut client, target)
}

fn connect(config: &ClientConfig) -> Result<InquiryScanClient, ExitCode> {
    match InquiryScanClient::open(config) {
        Ok(client) => {
            info!("opened hci{}", config.device_id);
            Ok(client)
        }
        Err(e) => {
            eprintln!("Error accessing bluetooth device hci{}: {}", config.device_id, e);
            Err(ExitCode::FAILURE)
        }
    }
}

/// Prints the current values and, given a target, writes it and prints the
/// values again
fn run<T: HciTransport>(
    client: &mut InquiryScanClient<T>,
    target: Option<InquiryScanActivity>,
) -> ExitCode {
    if !print_current(client) {
        return ExitCode::FAILURE;
    }

    let Some(target) = target else {
        return ExitCode::SUCCESS;
    };

    println!("Target {}", target);
    if let Err(e) = target.check_range() {
        warn!("controller will likely reject the target: {}", e);
    }

    // A rejected write still leaves the current values worth showing
    if let Err(e) = client.write(target) {
        eprintln!("Error writing inquiry scan activity: {}", e);
    }

    if !print_current(client) {
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn print_current<T: HciTransport>(client: &mut InquiryScanClient<T>) -> bool {
    match client.read() {
        Ok(activity) => {
            println!("Current inquiry scan {}", activity);
            true
        }
        Err(e) => {
            eprintln!("Error reading inquiry scan activity: {}", e);
            false
        }
    }
}

/// Exactly two arguments select a write; any other count only reads
fn parse_target(args: &[String]) -> Result<Option<InquiryScanActivity>, ParseIntError> {
    match args {
        [interval, window] => Ok(Some(InquiryScanActivity::new(
            parse_slots(interval)?,
            parse_slots(window)?,
        ))),
        _ => Ok(None),
    }
}

fn parse_slots(value: &str) -> Result<u16, ParseIntError> {
    let value = value.trim();
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => value.parse(),
    }
}
