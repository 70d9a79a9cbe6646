pub mod bit_string;
pub mod character_string;
pub mod date_time;
pub mod object_id;
pub mod object_type;
pub mod property_id;
pub mod spec;

pub use bit_string::BitString;
pub use character_string::{CharacterString, CharacterSet};
pub use date_time::{Date, DateRange, DateTime, Time};
pub use object_id::ObjectId;
pub use object_type::ObjectType;
pub use property_id::PropertyId;
pub use spec::{ErrorClass, ErrorCode, MaxApdu, Segmentation};
