#![no_main]
use libfuzzer_sys::fuzz_target;
use securetime_proto::{RtMessage, RtTag};

fuzz_target!(|data: &[u8]| {
    // Decode arbitrary bytes — must not panic or cause UB.
    if let Ok(message) = RtMessage::from_bytes(data) {
        // Exercise accessor methods on successfully decoded messages.
        let _ = message.num_tags();
        let _ = message.get(RtTag::Cert);
        let _ = message.get(RtTag::Sig);
        let _ = message.get_message(RtTag::Srep);
        let _ = message.get_u64(RtTag::Midp);
        let _ = message.get_u32(RtTag::Radi);

        // Anything the decoder accepts is already canonical, so
        // re-encoding must reproduce the input bit-exactly.
        assert_eq!(message.to_wire(), data);
    }
});
