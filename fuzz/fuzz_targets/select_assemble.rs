#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use redpoll_reply::{
    CompositeDecoder, DecodeContext, FieldCycle, ListCollector, MapCollector, SequenceDecoder,
    UnitCollector, Verbatim,
};
use redpoll_types::ReplyValue;

#[derive(Debug, Arbitrary)]
enum FuzzCall {
    Select { position: u8 },
    Assemble { parts: u8 },
    Duplicate,
}

// Fuzz target: raw call sequences against a sequential chain.
//
// The driver normally enforces the call discipline — positions derived
// from group offsets, assembly only at group closures. Arbitrary
// interleavings must still never panic: misuse surfaces as errors
// (restart loops, chain mismatches, unpaired groups), never as a crash.
fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(calls) = Vec::<FuzzCall>::arbitrary(&mut u) else {
        return;
    };

    let chain = SequenceDecoder::new(vec![
        Box::new(FieldCycle::new(vec![Box::new(Verbatim), Box::new(Verbatim)])),
        Box::new(MapCollector::verbatim()),
        Box::new(UnitCollector::new(3)),
        Box::new(ListCollector::verbatim()),
    ]);
    let mut ctx = DecodeContext::new();

    for call in calls.into_iter().take(128) {
        match call {
            FuzzCall::Select { position } => {
                let _ = chain.select_decoder(usize::from(position), &mut ctx);
            }
            FuzzCall::Assemble { parts } => {
                let mut group: Vec<ReplyValue> = (0..parts % 8)
                    .map(|n| ReplyValue::Int(i64::from(n)))
                    .collect();
                let _ = chain.assemble(&mut group, &mut ctx);
            }
            FuzzCall::Duplicate => {
                ctx = ctx.duplicate();
            }
        }
    }
});
