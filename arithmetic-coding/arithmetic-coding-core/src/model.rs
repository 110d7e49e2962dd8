use std::{error::Error, ops::Range};

/// A [`Model`] describes how the unit interval is split between the symbols
/// of a fixed alphabet. The same [`Model`] must be used for encoding and
/// decoding.
///
/// Symbols are laid out in a fixed order given by [`Model::index`]. Symbol
/// `i` owns the sub-interval `cut_points[i]..cut_points[i + 1]` over the
/// denominator `cut_points[alphabet_size]`.
///
/// # Example
///
/// ```
/// # use graycode_arithmetic_core::Model;
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// pub enum Symbol {
///     A,
///     B,
///     C,
/// }
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("unreachable")]
/// pub struct Never;
///
/// pub struct MyModel;
///
/// impl Model for MyModel {
///     type Symbol = Symbol;
///     type ValueError = Never;
///
///     fn index(&self, symbol: &Symbol) -> Result<usize, Never> {
///         Ok(match symbol {
///             Symbol::A => 0,
///             Symbol::B => 1,
///             Symbol::C => 2,
///         })
///     }
///
///     fn symbol(&self, index: usize) -> Symbol {
///         [Symbol::A, Symbol::B, Symbol::C][index]
///     }
///
///     fn cut_points(&self) -> &[u64] {
///         &[0, 1, 3, 4]
///     }
/// }
///
/// assert_eq!(MyModel.probability(&Symbol::B).unwrap(), 1..3);
/// assert_eq!(MyModel.denominator(), 4);
/// ```
pub trait Model {
    /// The type of symbol this [`Model`] describes
    type Symbol;

    /// Invalid symbol error
    type ValueError: Error + Send + Sync + 'static;

    /// The position of `symbol` in the model's fixed, ascending order.
    ///
    /// This is the inverse of the [`Model::symbol`] method
    ///
    /// # Errors
    ///
    /// This returns a custom error if the given symbol is not part of the
    /// alphabet
    fn index(&self, symbol: &Self::Symbol) -> Result<usize, Self::ValueError>;

    /// The symbol at position `index`.
    ///
    /// `index` is always smaller than [`Model::alphabet_size`].
    fn symbol(&self, index: usize) -> Self::Symbol;

    /// Cumulative boundaries, one more than the number of symbols.
    ///
    /// The first entry is zero, the sequence never decreases and the last
    /// entry is the [`Model::denominator`].
    fn cut_points(&self) -> &[u64];

    /// The number of symbols in the alphabet.
    fn alphabet_size(&self) -> usize {
        self.cut_points().len().saturating_sub(1)
    }

    /// The denominator for probability ranges. See [`Model::probability`].
    fn denominator(&self) -> u64 {
        self.cut_points().last().copied().unwrap_or(0)
    }

    /// Given a symbol, return the interval it owns over
    /// [`Model::denominator`].
    ///
    /// A symbol that never occurs owns an empty range.
    ///
    /// # Errors
    ///
    /// Propagates the error of [`Model::index`]
    fn probability(&self, symbol: &Self::Symbol) -> Result<Range<u64>, Self::ValueError> {
        let index = self.index(symbol)?;
        let cut_points = self.cut_points();
        Ok(cut_points[index]..cut_points[index + 1])
    }
}

/// Check that `cut_points` can drive an encoder or a decoder: at least one
/// symbol, starting at zero, never decreasing, with a positive total.
#[must_use]
pub fn validate_cut_points(cut_points: &[u64]) -> bool {
    match (cut_points.first(), cut_points.last()) {
        (Some(0), Some(&total)) if cut_points.len() >= 2 && total > 0 => {
            cut_points.windows(2).all(|pair| pair[0] <= pair[1])
        }
        _ => false,
    }
}
