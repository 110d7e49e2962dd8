#![no_main]
use graycode_arithmetic::{Decoder, Encoder, FrequencyTable, Precision};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let input: Vec<u16> = data.iter().copied().map(u16::from).collect();
    let Ok(table) = FrequencyTable::from_symbols(input.iter().copied(), 256) else {
        return;
    };
    let precision = Precision::for_table(&table);

    let value = Encoder::new(table.clone(), precision)
        .and_then(|mut encoder| encoder.encode_all(&input))
        .expect("failed to encode data!");
    let output = Decoder::new(table, precision, value)
        .and_then(|mut decoder| decoder.decode_all(input.len()))
        .expect("failed to decode data!");

    assert_eq!(input, output);
});
