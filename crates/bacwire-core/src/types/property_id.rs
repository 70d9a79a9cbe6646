macro_rules! property_ids {
    ($($name:ident = $value:literal,)+) => {
        /// BACnet property identifiers.
        ///
        /// Standard properties are named variants; vendor-specific or
        /// unrecognised identifiers use [`Proprietary`](Self::Proprietary).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize))]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub enum PropertyId {
            $($name,)+
            Proprietary(u32),
        }

        impl PropertyId {
            pub const fn to_u32(self) -> u32 {
                match self {
                    $(Self::$name => $value,)+
                    Self::Proprietary(v) => v,
                }
            }

            pub const fn from_u32(value: u32) -> Self {
                match value {
                    $($value => Self::$name,)+
                    v => Self::Proprietary(v),
                }
            }
        }
    };
}

property_ids! {
    AckedTransitions = 0,
    AckRequired = 1,
    ActiveText = 4,
    All = 8,
    ApduTimeout = 11,
    ApplicationSoftwareVersion = 12,
    ChangeOfStateCount = 15,
    ChangeOfStateTime = 16,
    NotificationClass = 17,
    CovIncrement = 22,
    DaylightSavingsStatus = 24,
    Deadband = 25,
    Description = 28,
    DeviceAddressBinding = 30,
    DeviceType = 31,
    EffectivePeriod = 32,
    ElapsedActiveTime = 33,
    EventEnable = 35,
    EventState = 36,
    EventType = 37,
    ExceptionSchedule = 38,
    FeedbackValue = 40,
    FirmwareRevision = 44,
    HighLimit = 45,
    InactiveText = 46,
    LimitEnable = 52,
    LocalDate = 56,
    LocalTime = 57,
    Location = 58,
    LowLimit = 59,
    MaxApduLengthAccepted = 62,
    MaxInfoFrames = 63,
    MaxMaster = 64,
    MaxPresValue = 65,
    MinPresValue = 69,
    ModelName = 70,
    NotifyType = 72,
    NumberOfApduRetries = 73,
    NumberOfStates = 74,
    ObjectIdentifier = 75,
    ObjectList = 76,
    ObjectName = 77,
    ObjectType = 79,
    Optional = 80,
    OutOfService = 81,
    Polarity = 84,
    PresentValue = 85,
    Priority = 86,
    PriorityArray = 87,
    ProtocolObjectTypesSupported = 96,
    ProtocolServicesSupported = 97,
    ProtocolVersion = 98,
    Reliability = 103,
    RelinquishDefault = 104,
    Required = 105,
    Resolution = 106,
    SegmentationSupported = 107,
    StateText = 110,
    StatusFlags = 111,
    SystemStatus = 112,
    TimeDelay = 113,
    TimeOfActiveTimeReset = 114,
    TimeOfStateCountReset = 115,
    Units = 117,
    UpdateInterval = 118,
    UtcOffset = 119,
    VendorIdentifier = 120,
    VendorName = 121,
    WeeklySchedule = 123,
    EventTimeStamps = 130,
    LogBuffer = 131,
    ProtocolRevision = 139,
    DatabaseRevision = 155,
    ProfileName = 168,
    StructuredObjectList = 209,
    PropertyList = 371,
    SerialNumber = 372,
}

impl PropertyId {
    /// Identifiers that only select groups of properties in requests.
    pub const fn is_selector_only(self) -> bool {
        matches!(self, Self::All | Self::Required | Self::Optional)
    }
}

#[cfg(test)]
mod tests {
    use super::PropertyId;

    #[test]
    fn known_identifiers_roundtrip() {
        for id in [
            PropertyId::ObjectName,
            PropertyId::PresentValue,
            PropertyId::PriorityArray,
            PropertyId::PropertyList,
        ] {
            assert_eq!(PropertyId::from_u32(id.to_u32()), id);
        }
        assert_eq!(PropertyId::ObjectName.to_u32(), 77);
    }

    #[test]
    fn vendor_identifiers_are_proprietary() {
        assert_eq!(PropertyId::from_u32(5123), PropertyId::Proprietary(5123));
        assert!(PropertyId::All.is_selector_only());
        assert!(!PropertyId::ObjectList.is_selector_only());
    }
}
