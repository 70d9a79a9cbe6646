use bacwire_core::apdu::{Apdu, ConfirmedRequestHeader, UnconfirmedRequestHeader};
use bacwire_core::bvlc::{Bvlc, BvlcFunction, BvlcPayload};
use bacwire_core::constructed::{ConstructedData, Element, PriorityValue, PropertyValue, Selector};
use bacwire_core::encoding::application::ApplicationValue;
use bacwire_core::frame::{NetworkPdu, NpduBody};
use bacwire_core::npdu::{Npdu, NpduAddress, CONTROL_DESTINATION, CONTROL_EXPECTING_REPLY};
use bacwire_core::services::{
    ComplexAckService, ConfirmedService, ReadPropertyRequest, ReadResult, UnconfirmedService,
    WhoIsRequest, WritePropertyRequest, SERVICE_READ_PROPERTY, SERVICE_WHO_IS,
    SERVICE_WRITE_PROPERTY,
};
use bacwire_core::types::{ObjectId, ObjectType, PropertyId};
use bacwire_core::{DecodeError, Frame};

fn confirmed_npdu() -> Npdu {
    Npdu::new(CONTROL_EXPECTING_REPLY)
}

fn complex_ack<'a>(frame: &Frame<'a>) -> ComplexAckService<'a> {
    match frame.apdu() {
        Some(Apdu::ComplexAck { service, .. }) => service.clone(),
        other => panic!("expected a complex ack, got {other:?}"),
    }
}

#[test]
fn who_is_global_frame_matches_fixture() {
    let frame = Frame {
        bvlc: Some(Bvlc {
            function: BvlcFunction::OriginalBroadcastNpdu,
            length: 12,
            origin: None,
            payload: BvlcPayload::Npdu,
        }),
        network: Some(NetworkPdu {
            header: Npdu {
                destination: Some(NpduAddress::new(0xFFFF, &[]).unwrap()),
                hop_count: Some(255),
                ..Npdu::new(CONTROL_DESTINATION)
            },
            body: NpduBody::Application(Apdu::UnconfirmedRequest {
                header: UnconfirmedRequestHeader {
                    service_choice: SERVICE_WHO_IS,
                },
                service: UnconfirmedService::WhoIs(WhoIsRequest::global()),
            }),
        }),
    };

    assert_eq!(
        frame.encode_to_vec().unwrap(),
        [0x81, 0x0B, 0x00, 0x0C, 0x01, 0x20, 0xFF, 0xFF, 0x00, 0xFF, 0x10, 0x08]
    );
}

#[test]
fn read_property_frame_matches_fixture() {
    let frame = Frame {
        bvlc: None,
        network: Some(NetworkPdu {
            header: confirmed_npdu(),
            body: NpduBody::Application(Apdu::ConfirmedRequest {
                header: ConfirmedRequestHeader::new(1, SERVICE_READ_PROPERTY),
                service: ConfirmedService::ReadProperty(ReadPropertyRequest {
                    object_id: ObjectId::new(ObjectType::Device, 123),
                    property_id: PropertyId::ObjectName,
                    array_index: None,
                }),
            }),
        }),
    };

    let bytes = frame.encode_to_vec().unwrap();
    assert_eq!(
        bytes,
        [0x01, 0x04, 0x02, 0x05, 0x01, 0x0C, 0x0C, 0x02, 0x00, 0x00, 0x7B, 0x19, 0x4D]
    );
    assert_eq!(Frame::decode_npdu(&bytes).unwrap(), frame);
}

#[test]
fn write_property_frame_matches_fixture() {
    let object_id = ObjectId::new(ObjectType::AnalogValue, 2);
    let frame = Frame {
        bvlc: None,
        network: Some(NetworkPdu {
            header: confirmed_npdu(),
            body: NpduBody::Application(Apdu::ConfirmedRequest {
                header: ConfirmedRequestHeader::new(7, SERVICE_WRITE_PROPERTY),
                service: ConfirmedService::WriteProperty(WritePropertyRequest {
                    object_id,
                    property_id: PropertyId::PresentValue,
                    array_index: None,
                    value: ConstructedData {
                        tag_number: 3,
                        selector: Selector::new(
                            object_id.object_type(),
                            PropertyId::PresentValue,
                            None,
                        ),
                        value: PropertyValue::Single(Element::Application(
                            ApplicationValue::Real(72.5),
                        )),
                    },
                    priority: Some(8),
                }),
            }),
        }),
    };

    assert_eq!(
        frame.encode_to_vec().unwrap(),
        [
            0x01, 0x04, 0x02, 0x05, 0x07, 0x0F, 0x0C, 0x00, 0x80, 0x00, 0x02, 0x19, 0x55, 0x3E,
            0x44, 0x42, 0x91, 0x00, 0x00, 0x3F, 0x49, 0x08,
        ]
    );
}

#[test]
fn priority_array_slots_resolve_to_priority_values() {
    let bytes = [
        0x81, 0x0A, 0x00, 0x26, 0x01, 0x00, 0x30, 0x02, 0x0C, 0x0C, 0x00, 0x40, 0x00, 0x01, 0x19,
        0x57, 0x3E, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x44, 0x42, 0xC8, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x3F,
    ];
    let frame = Frame::decode(&bytes).unwrap();
    let ComplexAckService::ReadProperty(ack) = complex_ack(&frame) else {
        panic!("expected a ReadProperty-ACK");
    };
    let PropertyValue::List(slots) = &ack.value.value else {
        panic!("expected all priority slots, got {:?}", ack.value.value);
    };
    assert_eq!(slots.len(), 16);
    assert_eq!(
        slots[8],
        Element::PriorityValue(PriorityValue::Value(ApplicationValue::Real(100.0)))
    );
    assert!(slots
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 8)
        .all(|(_, slot)| slot.as_application() == Some(&ApplicationValue::Null)));
}

#[test]
fn proprietary_property_is_kept_raw() {
    let bytes = [
        0x81, 0x0A, 0x00, 0x15, 0x01, 0x00, 0x30, 0x04, 0x0C, 0x0C, 0x02, 0x00, 0x00, 0x7B, 0x1A,
        0x02, 0x00, 0x3E, 0x21, 0x05, 0x3F,
    ];
    let frame = Frame::decode(&bytes).unwrap();
    let ComplexAckService::ReadProperty(ack) = complex_ack(&frame) else {
        panic!("expected a ReadProperty-ACK");
    };
    assert_eq!(ack.property_id, PropertyId::Proprietary(512));
    assert_eq!(ack.value.value, PropertyValue::Unknown(&[0x21, 0x05]));
    assert_eq!(ack.value.actual_value(), None);
    assert_eq!(frame.encode_to_vec().unwrap(), bytes);
}

#[test]
fn padded_vendor_identifier_reencodes_unchanged() {
    let bytes = [
        0x81, 0x0A, 0x00, 0x15, 0x01, 0x00, 0x30, 0x01, 0x0C, 0x0C, 0x02, 0x00, 0x00, 0x7B, 0x19,
        0x78, 0x3E, 0x22, 0x00, 0x05, 0x3F,
    ];
    let frame = Frame::decode(&bytes).unwrap();
    let ComplexAckService::ReadProperty(ack) = complex_ack(&frame) else {
        panic!("expected a ReadProperty-ACK");
    };
    assert_eq!(ack.property_id, PropertyId::VendorIdentifier);
    assert_eq!(ack.value.value, PropertyValue::Unknown(&[0x22, 0x00, 0x05]));
    assert_eq!(frame.encode_to_vec().unwrap(), bytes);
}

#[test]
fn read_property_multiple_ack_mixes_values_and_errors() {
    let bytes = [
        0x81, 0x0A, 0x00, 0x21, 0x01, 0x00, 0x30, 0x05, 0x0E, 0x0C, 0x00, 0x00, 0x00, 0x01, 0x1E,
        0x29, 0x4D, 0x4E, 0x74, 0x00, 0x4F, 0x41, 0x54, 0x4F, 0x29, 0x1C, 0x5E, 0x91, 0x02, 0x91,
        0x20, 0x5F, 0x1F,
    ];
    let frame = Frame::decode(&bytes).unwrap();
    let ComplexAckService::ReadPropertyMultiple(ack) = complex_ack(&frame) else {
        panic!("expected a ReadPropertyMultiple-ACK");
    };
    let results = &ack.results[0].results;
    assert_eq!(results[0].property_id, PropertyId::ObjectName);
    assert!(matches!(results[0].result, ReadResult::Value(_)));
    assert_eq!(results[1].property_id, PropertyId::Description);
    assert!(matches!(results[1].result, ReadResult::Error(_)));
}

#[test]
fn mismatched_value_bracket_is_located() {
    // the object-name value region is closed with [5] instead of [4]
    let bytes = [
        0x81, 0x0A, 0x00, 0x21, 0x01, 0x00, 0x30, 0x05, 0x0E, 0x0C, 0x00, 0x00, 0x00, 0x01, 0x1E,
        0x29, 0x4D, 0x4E, 0x74, 0x00, 0x4F, 0x41, 0x54, 0x5F, 0x29, 0x1C, 0x5E, 0x91, 0x02, 0x91,
        0x20, 0x5F, 0x1F,
    ];
    let err = Frame::decode(&bytes).unwrap_err();
    assert_eq!(
        err.error,
        DecodeError::BracketMismatch {
            opened: 4,
            closed: 5
        }
    );
    assert_eq!(err.offset, 23);
    assert_eq!(
        err.to_string(),
        "closing tag 5 does not match opening tag 4 at byte 23 in \
         Frame/Npdu/Apdu/ReadPropertyMultipleAck/ReadAccessResult/ListOfResults/PropertyValue"
    );
}
