#![no_main]

use iwtrace::{TraceError, TraceOptions, Tracer};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Any stream traces to the end or stops at a bad number list, never panics
    let mut out: Vec<u8> = Vec::new();
    match Tracer::new(data, &mut out, TraceOptions::default()).run() {
        Ok(summary) => assert_eq!(summary.bytes, data.len() as u64),
        Err(TraceError::BadListSeparator { .. }) => {}
        Err(e) => panic!("unexpected error: {e}"),
    }
});
