#![no_main]
use libfuzzer_sys::fuzz_target;
use securetime_proto::{MIN_REQUEST_LENGTH, RtMessage, RtMessageBuilder, RtTag};

fuzz_target!(|data: &[u8]| {
    // Nonce values of any 4-byte-aligned size must build into a padded
    // request that decodes back to the same message.
    let len = data.len() & !3;
    if len == 0 {
        return;
    }

    let message = RtMessageBuilder::new()
        .add(RtTag::Nonc, &data[..len])
        .add_padding(true)
        .build()
        .unwrap();

    let wire = message.to_wire();
    assert!(wire.len() >= MIN_REQUEST_LENGTH);
    assert_eq!(RtMessage::from_bytes(&wire).unwrap(), message);
});
