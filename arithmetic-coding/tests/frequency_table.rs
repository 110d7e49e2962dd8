use graycode_arithmetic::{Encoder, Error, FrequencyTable, Interval, Precision};
use test_case::test_case;

mod common;

#[test_case(&[0, 1, 2, 3], 4, 20, "0.107421875" ; "equal frequencies")]
#[test_case(&[5, 5, 5], 256, 10, "0.5" ; "single repeated symbol")]
#[test_case(&[0, 0, 1], 2, 10, "0.3703703704" ; "rounded bounds")]
#[test_case(&[3, 1, 4, 1, 5, 9, 2, 6], 10, 20, "0.39134752750396728516" ; "sparse alphabet")]
#[test_case(&[1, 0, 1, 0, 1], 2, 3, "0.5365" ; "three digits")]
fn encodes_to(input: &[u16], alphabet_size: usize, digits: u32, expected: &str) {
    let table = FrequencyTable::from_symbols(input.iter().copied(), alphabet_size).unwrap();
    let precision = Precision::new(digits);

    let value = common::encode(table.clone(), precision, input).unwrap();
    assert_eq!(value.to_string(), expected);

    let output = common::decode(table, precision, value, input.len()).unwrap();
    assert_eq!(output, input);
}

#[test]
fn single_symbol_keeps_the_unit_interval() {
    let input = [5u16; 3];
    let table = FrequencyTable::from_symbols(input, 256).unwrap();
    let mut encoder = Encoder::new(table, Precision::new(10)).unwrap();

    for symbol in &input {
        encoder.encode(symbol).unwrap();
        assert_eq!(encoder.interval(), &Interval::new(Precision::new(10)));
    }
}

#[test]
fn precision_threshold() {
    let input = [1u16, 0].repeat(40);
    let table = FrequencyTable::from_symbols(input.iter().copied(), 2).unwrap();

    let mut starved = Encoder::new(table.clone(), Precision::new(4)).unwrap();
    assert!(matches!(
        starved.encode_all(&input),
        Err(Error::DegenerateInterval { .. })
    ));
    assert!(starved.precision_warning().is_some());

    let precision = Precision::for_table(&table);
    assert_eq!(precision, Precision::for_symbols(&table, &input));
    common::round_trip(table, precision, &input);
}

#[test]
fn the_default_precision_is_plenty() {
    let input: Vec<u16> = (0..=255).rev().collect();
    let table = FrequencyTable::from_symbols(input.iter().copied(), 256).unwrap();

    common::round_trip(table, Precision::default(), &input);
}

#[test]
fn the_default_precision_covers_its_conservative_bound() {
    let input: Vec<u16> = (0..413u16).map(|i| i * 97 % 256).collect();
    assert!(Precision::conservative(input.len() as u64, 256) <= Precision::default());

    let table = FrequencyTable::from_symbols(input.iter().copied(), 256).unwrap();
    assert!(Precision::for_table(&table) <= Precision::default());
    common::round_trip(table, Precision::default(), &input);
}

#[test]
fn zero_frequency_symbol_is_rejected() {
    let table = FrequencyTable::from_symbols([0, 0, 2], 3).unwrap();

    assert!(matches!(
        common::encode(table, Precision::new(10), &[0, 2, 1]),
        Err(Error::BoundaryMismatch { position: 2 })
    ));
}

#[test]
fn symbol_outside_the_alphabet_is_rejected() {
    let table = FrequencyTable::from_symbols([0, 1], 2).unwrap();

    let error = common::encode(table, Precision::new(10), &[0, 1, 2]).unwrap_err();
    assert!(matches!(error, Error::InvalidSymbol { position: 2, .. }));
    assert_eq!(
        std::error::Error::source(&error).map(ToString::to_string),
        Some("symbol 2 is outside the alphabet of 2 symbols".to_owned())
    );
}
