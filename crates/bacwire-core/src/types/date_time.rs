/// A BACnet date. `0xFF` in any field means "unspecified".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Date {
    pub year_since_1900: u8,
    pub month: u8,
    pub day: u8,
    pub weekday: u8,
}

/// A BACnet time of day. `0xFF` in any field means "unspecified".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub hundredths: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DateTime {
    pub date: Date,
    pub time: Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl Date {
    pub const UNSPECIFIED: u8 = 0xFF;

    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self {
            year_since_1900: b[0],
            month: b[1],
            day: b[2],
            weekday: b[3],
        }
    }

    pub const fn to_bytes(self) -> [u8; 4] {
        [self.year_since_1900, self.month, self.day, self.weekday]
    }

    /// Calendar year, if specified.
    pub const fn year(self) -> Option<u16> {
        if self.year_since_1900 == Self::UNSPECIFIED {
            None
        } else {
            Some(1900 + self.year_since_1900 as u16)
        }
    }
}

impl Time {
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self {
            hour: b[0],
            minute: b[1],
            second: b[2],
            hundredths: b[3],
        }
    }

    pub const fn to_bytes(self) -> [u8; 4] {
        [self.hour, self.minute, self.second, self.hundredths]
    }
}

#[cfg(test)]
mod tests {
    use super::Date;

    #[test]
    fn unspecified_year() {
        let d = Date::from_bytes([0xFF, 1, 2, 3]);
        assert_eq!(d.year(), None);
        assert_eq!(Date::from_bytes([124, 1, 1, 1]).year(), Some(2024));
        assert_eq!(d.to_bytes(), [0xFF, 1, 2, 3]);
    }
}
