//! Fuzz target: `PersistedImage::decode`
//!
//! Feeds arbitrary flash contents to the image decoder.  Anything it
//! accepts must be in range and must survive a re-encode.
//!
//! cargo fuzz run fuzz_image_decode

#![no_main]

use hsvlight::storage::image::IMAGE_MAX_LEN;
use hsvlight::storage::PersistedImage;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some(image) = PersistedImage::decode(data) else {
        return;
    };

    if let Some(c) = image.last_color {
        assert!(c.hue < 360 && c.saturation <= 100 && c.value <= 100);
    }

    let mut buf = [0xFFu8; IMAGE_MAX_LEN];
    let encoded = image.encode(&mut buf).expect("decoded image must re-encode");
    assert_eq!(PersistedImage::decode(encoded).as_ref(), Some(&image));
});
