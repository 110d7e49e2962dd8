//! The [`Decoder`] half of the arithmetic coding library.

use crate::{
    validate_cut_points, EncodedValue, Error, Interval, Model, Precision, PrecisionWarning,
};

/// An arithmetic decoder
///
/// An arithmetic decoder converts an [`EncodedValue`] back into the
/// sequence of symbols it was made from, using the same static [`Model`]
/// and [`Precision`] as the encoder.
#[derive(Debug)]
pub struct Decoder<M>
where
    M: Model,
{
    model: M,
    interval: Interval,
    value: EncodedValue,
    position: usize,
    warning: Option<PrecisionWarning>,
}

impl<M> Decoder<M>
where
    M: Model,
{
    /// Construct a new [`Decoder`] for `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoundaryMismatch`] if the model's cut points do not
    /// start at zero, decrease somewhere or add up to zero.
    pub fn new(model: M, precision: Precision, value: EncodedValue) -> Result<Self, Error> {
        if !validate_cut_points(model.cut_points()) {
            return Err(Error::BoundaryMismatch { position: 0 });
        }

        Ok(Self {
            model,
            interval: Interval::new(precision),
            value,
            position: 0,
            warning: None,
        })
    }

    /// Return an iterator over the next `symbol_count` decoded symbols.
    ///
    /// The iterator stops after the first error.
    pub fn decode_iter(&mut self, symbol_count: usize) -> DecodeIter<'_, M> {
        DecodeIter {
            decoder: self,
            remaining: symbol_count,
        }
    }

    /// Decode exactly `symbol_count` symbols.
    ///
    /// Afterwards the working precision is compared with what the decoded
    /// sequence needs. A decoder working below that bound cannot have
    /// replayed the encoder's intervals reliably, so the shortfall is logged
    /// and kept as [`Decoder::precision_warning`].
    ///
    /// # Errors
    ///
    /// Returns the first error of [`Decoder::decode`]; no partial output is
    /// returned.
    pub fn decode_all(&mut self, symbol_count: usize) -> Result<Vec<M::Symbol>, Error> {
        let symbols = self
            .decode_iter(symbol_count)
            .collect::<Result<Vec<_>, _>>()?;

        let required = Precision::for_symbols(&self.model, &symbols);
        if let Err(warning) = self.precision().check(required) {
            log::warn!("{warning}");
            self.warning = Some(warning);
        }
        log::debug!("decoded {} symbols at {}", symbols.len(), self.precision());
        Ok(symbols)
    }

    /// Decode the next symbol.
    ///
    /// The decoder's interval never collapses: the located share always has
    /// a nonzero rounded width, since it contains the value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoundaryMismatch`] if the value lies outside the
    /// current interval, so that no symbol's share contains it.
    pub fn decode(&mut self) -> Result<M::Symbol, Error> {
        let position = self.position;
        let cut_points = self.model.cut_points();
        let index = self
            .interval
            .locate(self.value.as_decimal(), cut_points)
            .ok_or(Error::BoundaryMismatch { position })?;
        let p = cut_points[index]..cut_points[index + 1];

        self.interval.narrow(&p, self.model.denominator());
        log::trace!("symbol {position} took share {p:?}");

        self.position += 1;
        Ok(self.model.symbol(index))
    }

    /// The current interval
    #[must_use]
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// The working precision
    #[must_use]
    pub fn precision(&self) -> Precision {
        self.interval.precision()
    }

    /// The number of symbols decoded so far
    #[must_use]
    pub fn symbols_decoded(&self) -> usize {
        self.position
    }

    /// The warning raised by the last [`Decoder::decode_all`], if the
    /// precision fell short.
    #[must_use]
    pub fn precision_warning(&self) -> Option<PrecisionWarning> {
        self.warning
    }

    /// The model used to decode
    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Consume the decoder, returning the model and the current interval.
    pub fn into_inner(self) -> (M, Interval) {
        (self.model, self.interval)
    }
}

/// The iterator returned by the [`Decoder::decode_iter`] method
#[allow(missing_debug_implementations)]
pub struct DecodeIter<'a, M>
where
    M: Model,
{
    decoder: &'a mut Decoder<M>,
    remaining: usize,
}

impl<M> Iterator for DecodeIter<'_, M>
where
    M: Model,
{
    type Item = Result<M::Symbol, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let result = self.decoder.decode();
        self.remaining = if result.is_ok() { self.remaining - 1 } else { 0 };
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FrequencyTable;

    #[test]
    fn decodes_a_hand_computed_value() {
        let table = FrequencyTable::from_symbols([0, 1, 2, 3], 4).unwrap();
        let value = "0.107421875".parse().unwrap();
        let mut decoder = Decoder::new(table, Precision::new(20), value).unwrap();
        assert_eq!(decoder.decode_all(4).unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(decoder.symbols_decoded(), 4);
    }

    #[test]
    fn zero_symbols() {
        let table = FrequencyTable::from_symbols([0], 1).unwrap();
        let value = "0.5".parse().unwrap();
        let mut decoder = Decoder::new(table, Precision::new(5), value).unwrap();
        assert_eq!(decoder.decode_all(0).unwrap(), Vec::<u16>::new());
    }

    #[test]
    fn iterator_yields_the_requested_count() {
        let table = FrequencyTable::from_symbols([0, 1], 2).unwrap();
        let value = "0.5".parse().unwrap();
        let mut decoder = Decoder::new(table, Precision::new(1), value).unwrap();
        let mut iter = decoder.decode_iter(6);
        assert_eq!(iter.size_hint(), (0, Some(6)));
        assert_eq!(iter.next().unwrap().unwrap(), 1);
        assert_eq!(iter.count(), 5);
        assert_eq!(decoder.symbols_decoded(), 6);
    }

    #[test]
    fn precision_must_match_the_encoder() {
        let input = [2u16, 0, 1, 1, 2, 0, 0, 2, 1, 0, 2, 2];
        let table = FrequencyTable::from_symbols(input, 3).unwrap();
        let value = crate::Encoder::new(table.clone(), Precision::new(30))
            .unwrap()
            .encode_all(&input)
            .unwrap();

        let mut matching = Decoder::new(table.clone(), Precision::new(30), value.clone()).unwrap();
        assert_eq!(matching.decode_all(input.len()).unwrap(), input);
        assert_eq!(matching.precision_warning(), None);

        let mut coarse = Decoder::new(table, Precision::new(2), value).unwrap();
        assert_ne!(coarse.decode_all(input.len()).unwrap(), input);
        assert!(matches!(
            coarse.precision_warning(),
            Some(PrecisionWarning { available: 2, .. })
        ));
    }

    #[test]
    fn half_the_precision_is_reported() {
        let input: Vec<u16> = (0..200u16).map(|i| (i * 7 + i / 3) % 16).collect();
        let table = FrequencyTable::from_symbols(input.iter().copied(), 16).unwrap();
        let required = Precision::for_table(&table);
        let value = crate::Encoder::new(table.clone(), required)
            .unwrap()
            .encode_all(&input)
            .unwrap();

        let half = Precision::new(required.digits() / 2);
        let mut decoder = Decoder::new(table, half, value).unwrap();
        let output = decoder.decode_all(input.len()).unwrap();
        assert_ne!(output, input);

        let warning = decoder.precision_warning().unwrap();
        assert_eq!(warning.available, half.digits());
        assert!(warning.required > half.digits());
    }

    #[test]
    fn malformed_model() {
        #[derive(Debug, thiserror::Error)]
        #[error("never")]
        struct Never;

        struct Backwards;

        impl Model for Backwards {
            type Symbol = usize;
            type ValueError = Never;

            fn index(&self, symbol: &usize) -> Result<usize, Never> {
                Ok(*symbol)
            }

            fn symbol(&self, index: usize) -> usize {
                index
            }

            fn cut_points(&self) -> &[u64] {
                &[0, 3, 2, 4]
            }
        }

        let value = "0.5".parse().unwrap();
        assert!(matches!(
            Decoder::new(Backwards, Precision::new(10), value),
            Err(Error::BoundaryMismatch { position: 0 })
        ));
    }
}
