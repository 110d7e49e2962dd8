//! The [`Encoder`] half of the arithmetic coding library.

use crate::{
    validate_cut_points, EncodedValue, Error, Interval, Model, Precision, PrecisionWarning,
};

/// An arithmetic encoder
///
/// An arithmetic encoder converts a sequence of symbols into a single
/// [`EncodedValue`], using a static [`Model`].
#[derive(Debug)]
pub struct Encoder<M>
where
    M: Model,
{
    model: M,
    interval: Interval,
    position: usize,
    warning: Option<PrecisionWarning>,
}

impl<M> Encoder<M>
where
    M: Model,
{
    /// Construct a new [`Encoder`] working at `precision`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoundaryMismatch`] if the model's cut points do not
    /// start at zero, decrease somewhere or add up to zero.
    pub fn new(model: M, precision: Precision) -> Result<Self, Error> {
        if !validate_cut_points(model.cut_points()) {
            return Err(Error::BoundaryMismatch { position: 0 });
        }

        Ok(Self {
            model,
            interval: Interval::new(precision),
            position: 0,
            warning: None,
        })
    }

    /// Construct a new [`Encoder`] with just enough precision for `symbols`.
    ///
    /// # Errors
    ///
    /// See [`Encoder::new`].
    pub fn for_symbols(model: M, symbols: &[M::Symbol]) -> Result<Self, Error> {
        let precision = Precision::for_symbols(&model, symbols);
        Self::new(model, precision)
    }

    /// Encode every symbol of `symbols` and return the representative value.
    ///
    /// Before encoding, the working precision is compared with what the
    /// sequence needs; a shortfall is logged and kept as
    /// [`Encoder::precision_warning`] but does not stop the encoder.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptySequence`] if nothing has been encoded
    /// - any error of [`Encoder::encode`]
    pub fn encode_all(&mut self, symbols: &[M::Symbol]) -> Result<EncodedValue, Error> {
        let required = Precision::for_symbols(&self.model, symbols);
        if let Err(warning) = self.precision().check(required) {
            log::warn!("{warning}");
            self.warning = Some(warning);
        }

        for symbol in symbols {
            self.encode(symbol)?;
        }
        let value = self.finish()?;

        log::debug!(
            "encoded {} symbols at {} into a value of {} digits",
            self.position,
            self.precision(),
            value.fraction_digits()
        );
        Ok(value)
    }

    /// Narrow the interval to the share of `symbol`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSymbol`] if the model rejects `symbol`
    /// - [`Error::BoundaryMismatch`] if `symbol` owns no share of the
    ///   interval, i.e. its frequency is zero
    /// - [`Error::DegenerateInterval`] if the share is too small for the
    ///   working precision
    pub fn encode(&mut self, symbol: &M::Symbol) -> Result<(), Error> {
        let position = self.position;
        let p = self
            .model
            .probability(symbol)
            .map_err(|e| Error::InvalidSymbol {
                position,
                source: Box::new(e),
            })?;
        if p.start >= p.end {
            return Err(Error::BoundaryMismatch { position });
        }

        self.interval.narrow(&p, self.model.denominator());
        if self.interval.is_degenerate() {
            return Err(Error::DegenerateInterval {
                position,
                precision: self.precision(),
            });
        }
        log::trace!("symbol {position} took share {p:?}");

        self.position += 1;
        Ok(())
    }

    /// The representative value of everything encoded so far: the midpoint
    /// of the current interval.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptySequence`] if nothing has been encoded
    /// - [`Error::DegenerateInterval`] if an earlier step collapsed the
    ///   interval
    pub fn finish(&self) -> Result<EncodedValue, Error> {
        if self.interval.is_degenerate() {
            return Err(Error::DegenerateInterval {
                position: self.position,
                precision: self.precision(),
            });
        }
        if self.position == 0 {
            return Err(Error::EmptySequence);
        }
        Ok(self.interval.midpoint())
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

    /// The number of symbols encoded so far
    #[must_use]
    pub fn symbols_encoded(&self) -> usize {
        self.position
    }

    /// The warning raised by the last [`Encoder::encode_all`], if the
    /// precision fell short.
    #[must_use]
    pub fn precision_warning(&self) -> Option<PrecisionWarning> {
        self.warning
    }

    /// The model used for the encoder
    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Consume the encoder, returning the model and the current interval.
    pub fn into_inner(self) -> (M, Interval) {
        (self.model, self.interval)
    }
}
