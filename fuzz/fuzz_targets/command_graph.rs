#![no_main]

use buffer::ByteReader;
use codec::graph::FlatGraph;
use codec::{Codec, CommandGraphCodec};
use libfuzzer_sys::fuzz_target;
use protocol::{builtin_argument_registry, CommandStubs, NodeStub};

fuzz_target!(|data: &[u8]| {
    let Ok(registry) = builtin_argument_registry() else {
        return;
    };
    let codec = CommandGraphCodec::new(CommandStubs::new(&registry), 256);

    let Ok(flat) = Codec::<FlatGraph<NodeStub>>::decode(&codec, &mut ByteReader::new(data)) else {
        return;
    };
    // Validation and resolution must agree: a graph that validates resolves.
    let valid = flat.validate().is_ok();
    match flat.resolve() {
        Ok(tree) => {
            assert!(valid, "resolved a graph that failed validation");
            let _ = codec::encode_to_vec(&codec, &tree);
        }
        Err(_) => assert!(!valid, "validated graph failed to resolve"),
    }
});
