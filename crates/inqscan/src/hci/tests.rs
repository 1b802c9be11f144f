//! Unit tests for HCI packet parsing and the socket filter

use super::constants::*;
use super::filter::*;
use super::mock::MockTransport;
use super::packet::*;
use super::transport::HciTransport;
use crate::error::HciError;

#[test]
fn test_opcode_packing() {
    assert_eq!(opcode_pack(OGF_HOST_CTL, OCF_READ_INQ_ACTIVITY), 0x0C1D);
    assert_eq!(opcode_pack(OGF_HOST_CTL, OCF_WRITE_INQ_ACTIVITY), 0x0C1E);
    assert_eq!(opcode_unpack(0x0C1E), (OGF_HOST_CTL, OCF_WRITE_INQ_ACTIVITY));
}

#[test]
fn test_hci_command_serialization() {
    // Read Inquiry Scan Activity has no parameters
    let packet = HciCommand::ReadInquiryScanActivity.to_packet().unwrap();
    assert_eq!(packet, vec![HCI_COMMAND_PKT, 0x1D, 0x0C, 0]);

    // Write Inquiry Scan Activity: interval then window, little-endian
    let packet = HciCommand::WriteInquiryScanActivity {
        interval: 0x1234,
        window: 0x0012,
    }
    .to_packet()
    .unwrap();

    assert_eq!(packet[0], HCI_COMMAND_PKT);
    assert_eq!(u16::from_le_bytes([packet[1], packet[2]]), 0x0C1E);
    assert_eq!(packet[3], 4);
    assert_eq!(&packet[4..], &[0x34, 0x12, 0x12, 0x00]);

    // Test Raw command
    let command = HciCommand::new(OGF_HOST_CTL, 0x0003, vec![0x01, 0x02, 0x03]);
    let packet = command.to_packet().unwrap();
    assert_eq!(u16::from_le_bytes([packet[1], packet[2]]), 0x0C03);
    assert_eq!(packet[3], 3);
    assert_eq!(&packet[4..], &[0x01, 0x02, 0x03]);

    let oversized = HciCommand::new(OGF_HOST_CTL, 0x0003, vec![0; 256]);
    assert!(matches!(
        oversized.to_packet(),
        Err(HciError::InvalidParamLength(256))
    ));
}

#[test]
fn test_hci_event_parsing() {
    let packet = [
        HCI_EVENT_PKT,
        EVT_CMD_COMPLETE, // Event code
        8,                // Parameter length
        1,                // Num_HCI_Command_Packets
        0x1D,             // Command_Opcode (low byte)
        0x0C,             // Command_Opcode (high byte)
        0x00,             // Status
        0x00,
        0x08, // Inquiry_Scan_Interval
        0x12,
        0x00, // Inquiry_Scan_Window
    ];

    let event = HciEvent::from_packet(&packet).unwrap();
    assert_eq!(event.event_code, EVT_CMD_COMPLETE);
    assert_eq!(event.parameters.len(), 8);

    let complete = CommandComplete::from_event(&event).unwrap();
    assert_eq!(complete.num_packets, 1);
    assert_eq!(complete.opcode, 0x0C1D);
    assert_eq!(complete.status, 0);
    assert_eq!(complete.return_parameters, vec![0x00, 0x08, 0x12, 0x00]);
    assert_eq!(complete.to_packet(), packet.to_vec());

    // Trailing bytes beyond the announced length are ignored
    let mut padded = packet.to_vec();
    padded.push(0xFF);
    assert_eq!(HciEvent::from_packet(&padded).unwrap(), event);
}

#[test]
fn test_malformed_events() {
    assert!(matches!(
        HciEvent::from_packet(&[]),
        Err(HciError::Protocol(_))
    ));
    // Not an event packet
    assert!(matches!(
        HciEvent::from_packet(&[HCI_COMMAND_PKT, 0x1D, 0x0C, 0]),
        Err(HciError::Protocol(_))
    ));
    // Header only partly present
    assert!(matches!(
        HciEvent::from_packet(&[HCI_EVENT_PKT, EVT_CMD_COMPLETE]),
        Err(HciError::Protocol(_))
    ));
    // Too short for parameter length
    assert!(matches!(
        HciEvent::from_packet(&[HCI_EVENT_PKT, EVT_CMD_COMPLETE, 10, 1, 2]),
        Err(HciError::Protocol(_))
    ));
    // Command Status is not Command Complete
    assert!(matches!(
        CommandComplete::from_packet(&[HCI_EVENT_PKT, EVT_CMD_STATUS, 4, 0x00, 1, 0x1D, 0x0C]),
        Err(HciError::Protocol(_))
    ));
    // Command Complete without a status byte
    assert!(matches!(
        CommandComplete::from_packet(&[HCI_EVENT_PKT, EVT_CMD_COMPLETE, 3, 1, 0x1D, 0x0C]),
        Err(HciError::Protocol(_))
    ));
}

#[test]
fn test_filter_layout() {
    let filter = HciFilter::command_complete(0x0C1D);

    assert_eq!(filter.packet_types, PacketTypes::EVENT);
    assert_eq!(filter.event_mask, [1 << EVT_CMD_COMPLETE, 0]);
    assert!(filter.passes_event(EVT_CMD_COMPLETE));
    assert!(!filter.passes_event(EVT_CMD_STATUS));

    let raw = filter.to_raw();
    assert_eq!(raw.as_bytes().len(), HCI_FILTER_SIZE);
    assert_eq!(&raw.as_bytes()[0..4], &(1u32 << 4).to_ne_bytes());
    assert_eq!(&raw.as_bytes()[4..8], &(1u32 << 14).to_ne_bytes());
    assert_eq!(&raw.as_bytes()[8..12], &[0, 0, 0, 0]);
    assert_eq!(&raw.as_bytes()[12..14], &[0x1D, 0x0C]);

    assert_eq!(HciFilter::from_raw(&raw), filter);
}

#[test]
fn test_filter_bits() {
    let mut filter = HciFilter::new();
    filter.set_ptype(HCI_VENDOR_PKT);
    filter.set_ptype(HCI_ACL_PKT);
    assert_eq!(filter.packet_types, PacketTypes::VENDOR | PacketTypes::ACL);

    // Events above 31 land in the second mask word
    filter.set_event(0x3E);
    assert_eq!(filter.event_mask, [0, 1 << (0x3E - 32)]);
    assert!(filter.passes_event(0x3E));
}

#[test]
fn test_filter_guard_restores_on_restore() {
    let mut mock = MockTransport::new();
    let original = mock.filter;
    let scoped = HciFilter::command_complete(0x0C1D);

    let mut guard = FilterGuard::install(&mut mock, &scoped).unwrap();
    assert_eq!(guard.saved(), Some(&original));
    assert_eq!(guard.transport().filter().unwrap(), scoped.to_raw());
    guard.restore().unwrap();

    assert_eq!(mock.filter, original);
    assert_eq!(mock.filter_sets, vec![scoped.to_raw(), original]);
}

#[test]
fn test_filter_guard_restores_on_drop() {
    let mut mock = MockTransport::new();
    let original = mock.filter;

    {
        let _guard = FilterGuard::install(&mut mock, &HciFilter::command_complete(0x0C1E)).unwrap();
    }

    assert_eq!(mock.filter, original);
    assert_eq!(mock.filter_sets.len(), 2);
}

#[test]
fn test_filter_guard_restores_when_install_fails() {
    let mut mock = MockTransport::new();
    let original = mock.filter;
    mock.fail_filter_set = Some(0);

    assert!(matches!(
        FilterGuard::install(&mut mock, &HciFilter::command_complete(0x0C1D)),
        Err(HciError::SocketOption(_))
    ));

    assert_eq!(mock.filter, original);
    assert_eq!(mock.filter_sets.last(), Some(&original));
}

#[test]
fn test_filter_guard_reports_restore_failure() {
    let mut mock = MockTransport::new();
    mock.fail_filter_set = Some(1);

    let guard = FilterGuard::install(&mut mock, &HciFilter::command_complete(0x0C1D)).unwrap();
    assert!(matches!(guard.restore(), Err(HciError::SocketOption(_))));
    // No second attempt from Drop
    assert_eq!(mock.filter_sets.len(), 2);
}

#[test]
fn test_status_display() {
    let err = HciError::CommandStatus {
        opcode: 0x0C1E,
        status: 0x12,
    };
    let message = err.to_string();
    assert!(message.contains("0x0c1e"));
    assert!(message.contains("0x12"));
    assert!(message.contains("Invalid HCI Command Parameters"));
}
