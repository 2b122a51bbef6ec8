#![no_main]

use libfuzzer_sys::fuzz_target;
use ritescope::{BinaryImage, ParseConfig};

fuzz_target!(|data: &[u8]| {
    let _ = BinaryImage::from_mem(data.to_vec());
    let _ = BinaryImage::parse_with(data, &ParseConfig::strict());
});
