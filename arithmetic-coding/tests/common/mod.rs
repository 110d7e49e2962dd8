use graycode_arithmetic::{Decoder, EncodedValue, Encoder, Error, Model, Precision};

pub fn round_trip<M>(model: M, precision: Precision, input: &[M::Symbol])
where
    M: Model + Clone,
    M::Symbol: PartialEq + std::fmt::Debug,
{
    let value = encode(model.clone(), precision, input).unwrap();
    let output = decode(model, precision, value, input.len()).unwrap();

    assert_eq!(input, output.as_slice());
}

pub fn encode<M>(model: M, precision: Precision, input: &[M::Symbol]) -> Result<EncodedValue, Error>
where
    M: Model,
{
    Encoder::new(model, precision)?.encode_all(input)
}

pub fn decode<M>(
    model: M,
    precision: Precision,
    value: EncodedValue,
    symbol_count: usize,
) -> Result<Vec<M::Symbol>, Error>
where
    M: Model,
{
    Decoder::new(model, precision, value)?.decode_all(symbol_count)
}
