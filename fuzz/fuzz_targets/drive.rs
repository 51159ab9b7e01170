#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use redpoll_driver::{DriverConfig, Progress, ReplyDriver};
use redpoll_reply::{ListCollector, MapCollector, SequenceDecoder, UnitCollector};
use redpoll_types::Element;

#[derive(Debug, Arbitrary)]
enum FuzzElement {
    Bulk(Vec<u8>),
    Aggregate(u16),
    Nil,
}

#[derive(Debug, Arbitrary)]
struct FuzzScript {
    elements: Vec<FuzzElement>,
}

// Fuzz target: arbitrary element scripts through the reply driver.
//
// Whatever order of bulks, nils, and aggregate headers arrives, the
// driver must never panic. Errors are expected — shape mismatches and
// guard violations abandon the reply, and the script stops there. A
// completed reply must leave the driver rearmable.
fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(script) = FuzzScript::arbitrary(&mut u) else {
        return;
    };

    let chain = SequenceDecoder::new(vec![
        Box::new(ListCollector::verbatim()),
        Box::new(MapCollector::verbatim()),
        Box::new(UnitCollector::new(2)),
        Box::new(ListCollector::verbatim()),
    ]);
    let config = DriverConfig {
        max_depth: 8,
        max_group_len: 64,
    };
    let mut driver = ReplyDriver::with_config(&chain, config);

    for element in script.elements.into_iter().take(256) {
        let element = match element {
            FuzzElement::Bulk(payload) => Element::bulk(&payload),
            FuzzElement::Aggregate(len) => Element::Aggregate {
                len: usize::from(len),
            },
            FuzzElement::Nil => Element::Nil,
        };
        match driver.feed(element) {
            Ok(Progress::Complete(_)) => {
                assert!(driver.is_complete());
                driver
                    .begin_next()
                    .expect("no group can be open after completion");
            }
            Ok(Progress::Incomplete) => {}
            Err(_) => return,
        }
    }
});
