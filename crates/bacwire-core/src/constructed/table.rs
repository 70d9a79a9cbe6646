//! Static dispatch table from (property, object type) to leaf codec.
//!
//! Lookup is a first-match scan. Entries refined by object type come before
//! the catch-all entry for the same property.

use super::leaf::{self, DecodeElement};
use crate::types::{ObjectType, PropertyId};

/// How a property's elements are laid out inside its bracketed region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Exactly one element.
    Scalar,
    /// A BACnetARRAY: index 0 is the element count, other indexes select one
    /// element, no index means every element.
    Array,
    /// A BACnetLIST: zero or more elements, never indexed.
    List,
    /// A selector such as `all` that never carries a value.
    Sentinel,
}

pub(crate) struct TableEntry {
    pub property: PropertyId,
    pub applies_to: fn(ObjectType) -> bool,
    pub shape: Shape,
    pub element: DecodeElement,
}

const fn any_object(_: ObjectType) -> bool {
    true
}

const fn entry(property: PropertyId, shape: Shape, element: DecodeElement) -> TableEntry {
    TableEntry {
        property,
        applies_to: any_object,
        shape,
        element,
    }
}

const fn refined(
    property: PropertyId,
    applies_to: fn(ObjectType) -> bool,
    element: DecodeElement,
) -> TableEntry {
    TableEntry {
        property,
        applies_to,
        shape: Shape::Scalar,
        element,
    }
}

const fn sentinel(property: PropertyId) -> TableEntry {
    entry(property, Shape::Sentinel, leaf::any_application)
}

use PropertyId as P;
use Shape::{Array, List, Scalar};

pub(crate) static TABLE: &[TableEntry] = &[
    sentinel(P::All),
    sentinel(P::Required),
    sentinel(P::Optional),
    // object-type refined
    refined(P::PresentValue, ObjectType::is_analog, leaf::commandable_real),
    refined(P::PresentValue, ObjectType::is_binary, leaf::commandable_enumerated),
    refined(P::PresentValue, ObjectType::is_multi_state, leaf::commandable_unsigned),
    entry(P::PresentValue, Scalar, leaf::any_application),
    refined(P::RelinquishDefault, ObjectType::is_analog, leaf::commandable_real),
    refined(P::RelinquishDefault, ObjectType::is_binary, leaf::commandable_enumerated),
    refined(P::RelinquishDefault, ObjectType::is_multi_state, leaf::commandable_unsigned),
    entry(P::RelinquishDefault, Scalar, leaf::any_application),
    // scalars
    entry(P::ObjectIdentifier, Scalar, leaf::object_id),
    entry(P::ObjectName, Scalar, leaf::character_string),
    entry(P::ObjectType, Scalar, leaf::enumerated),
    entry(P::Description, Scalar, leaf::character_string),
    entry(P::Location, Scalar, leaf::character_string),
    entry(P::ProfileName, Scalar, leaf::character_string),
    entry(P::SerialNumber, Scalar, leaf::character_string),
    entry(P::StatusFlags, Scalar, leaf::bit_string),
    entry(P::EventState, Scalar, leaf::enumerated),
    entry(P::Reliability, Scalar, leaf::enumerated),
    entry(P::OutOfService, Scalar, leaf::boolean),
    entry(P::Units, Scalar, leaf::enumerated),
    entry(P::VendorName, Scalar, leaf::character_string),
    entry(P::VendorIdentifier, Scalar, leaf::unsigned),
    entry(P::ModelName, Scalar, leaf::character_string),
    entry(P::FirmwareRevision, Scalar, leaf::character_string),
    entry(P::ApplicationSoftwareVersion, Scalar, leaf::character_string),
    entry(P::ProtocolVersion, Scalar, leaf::unsigned),
    entry(P::ProtocolRevision, Scalar, leaf::unsigned),
    entry(P::ProtocolServicesSupported, Scalar, leaf::bit_string),
    entry(P::ProtocolObjectTypesSupported, Scalar, leaf::bit_string),
    entry(P::SystemStatus, Scalar, leaf::enumerated),
    entry(P::MaxApduLengthAccepted, Scalar, leaf::unsigned),
    entry(P::SegmentationSupported, Scalar, leaf::enumerated),
    entry(P::ApduTimeout, Scalar, leaf::unsigned),
    entry(P::NumberOfApduRetries, Scalar, leaf::unsigned),
    entry(P::MaxMaster, Scalar, leaf::unsigned),
    entry(P::MaxInfoFrames, Scalar, leaf::unsigned),
    entry(P::DatabaseRevision, Scalar, leaf::unsigned),
    entry(P::ActiveText, Scalar, leaf::character_string),
    entry(P::InactiveText, Scalar, leaf::character_string),
    entry(P::NumberOfStates, Scalar, leaf::unsigned),
    entry(P::CovIncrement, Scalar, leaf::real),
    entry(P::Deadband, Scalar, leaf::real),
    entry(P::HighLimit, Scalar, leaf::real),
    entry(P::LowLimit, Scalar, leaf::real),
    entry(P::Resolution, Scalar, leaf::real),
    entry(P::MinPresValue, Scalar, leaf::real),
    entry(P::MaxPresValue, Scalar, leaf::real),
    entry(P::LocalDate, Scalar, leaf::date),
    entry(P::LocalTime, Scalar, leaf::time),
    entry(P::UtcOffset, Scalar, leaf::signed),
    entry(P::DaylightSavingsStatus, Scalar, leaf::boolean),
    entry(P::AckedTransitions, Scalar, leaf::bit_string),
    entry(P::EventEnable, Scalar, leaf::bit_string),
    entry(P::LimitEnable, Scalar, leaf::bit_string),
    entry(P::NotificationClass, Scalar, leaf::unsigned),
    entry(P::NotifyType, Scalar, leaf::enumerated),
    entry(P::EventType, Scalar, leaf::enumerated),
    entry(P::TimeDelay, Scalar, leaf::unsigned),
    entry(P::Polarity, Scalar, leaf::enumerated),
    entry(P::FeedbackValue, Scalar, leaf::enumerated),
    entry(P::ChangeOfStateCount, Scalar, leaf::unsigned),
    entry(P::ElapsedActiveTime, Scalar, leaf::unsigned),
    entry(P::UpdateInterval, Scalar, leaf::unsigned),
    entry(P::DeviceType, Scalar, leaf::character_string),
    // composite scalars
    entry(P::ChangeOfStateTime, Scalar, leaf::date_time),
    entry(P::TimeOfActiveTimeReset, Scalar, leaf::date_time),
    entry(P::TimeOfStateCountReset, Scalar, leaf::date_time),
    entry(P::EffectivePeriod, Scalar, leaf::date_range),
    // arrays
    entry(P::ObjectList, Array, leaf::object_id),
    entry(P::StructuredObjectList, Array, leaf::object_id),
    entry(P::PropertyList, Array, leaf::enumerated),
    entry(P::StateText, Array, leaf::character_string),
    entry(P::Priority, Array, leaf::unsigned),
    entry(P::PriorityArray, Array, leaf::priority_value),
    entry(P::EventTimeStamps, Array, leaf::time_stamp),
    entry(P::WeeklySchedule, Array, leaf::daily_schedule),
    // lists
    entry(P::DeviceAddressBinding, List, leaf::address_binding),
];

/// Finds the entry for `property` on `object_type`.
pub(crate) fn lookup(object_type: ObjectType, property: PropertyId) -> Option<&'static TableEntry> {
    TABLE
        .iter()
        .find(|e| e.property == property && (e.applies_to)(object_type))
}
