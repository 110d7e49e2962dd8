use graycode_arithmetic::{Decoder, Encoder, Model, Precision};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    A,
    B,
    C,
}

#[derive(Debug, thiserror::Error)]
#[error("unreachable")]
pub struct Never;

#[derive(Clone)]
pub struct MyModel;

impl Model for MyModel {
    type Symbol = Symbol;
    type ValueError = Never;

    fn index(&self, symbol: &Symbol) -> Result<usize, Never> {
        Ok(match symbol {
            Symbol::A => 0,
            Symbol::B => 1,
            Symbol::C => 2,
        })
    }

    fn symbol(&self, index: usize) -> Symbol {
        match index {
            0 => Symbol::A,
            1 => Symbol::B,
            2 => Symbol::C,
            _ => unreachable!(),
        }
    }

    fn cut_points(&self) -> &[u64] {
        // B is twice as likely as A or C
        &[0, 1, 3, 4]
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let input = [Symbol::A, Symbol::B, Symbol::C, Symbol::B, Symbol::B, Symbol::A, Symbol::C];
    let precision = Precision::for_symbols(&MyModel, &input);

    let value = Encoder::new(MyModel, precision)?.encode_all(&input)?;
    println!("{input:?} -> {value} ({precision})");

    let output = Decoder::new(MyModel, precision, value)?.decode_all(input.len())?;
    assert_eq!(output, input);

    Ok(())
}
