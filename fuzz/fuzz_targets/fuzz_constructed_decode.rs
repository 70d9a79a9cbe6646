#![no_main]

use bacwire_core::constructed::ConstructedData;
use bacwire_core::encoding::reader::Reader;
use bacwire_core::encoding::traits::BitLength;
use bacwire_core::types::{ObjectType, PropertyId};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((selector, region)) = data.split_first_chunk::<4>() else {
        return;
    };
    let object_type = ObjectType::from_u16(u16::from(selector[0]) & 0x3F);
    let property_id = PropertyId::from_u32(u32::from(selector[1]));
    let array_index = (selector[2] & 0x80 != 0).then_some(u32::from(selector[3]));

    let mut r = Reader::new(region);
    if let Ok(value) = ConstructedData::decode(&mut r, 3, object_type, property_id, array_index) {
        assert_eq!(value.length_in_bits() as usize, r.position() * 8);
    }
});
