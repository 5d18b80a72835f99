//! Numeric reductions over finite sequences of numbers.
//!
//! A [`Reducer`] computes max, min, mean, median, quantiles, standard
//! deviation, and sorted copies of a `&[Number]`. Three interchangeable
//! backends implement it:
//!
//! - [`BasicReducer`]: plain iterator arithmetic, always available
//! - `NdarrayReducer`: array-library backend (feature `ndarray`)
//! - `NalgebraReducer`: tensor-library backend (feature `nalgebra`)
//!
//! All backends agree within floating-point tolerance. [`auto_reducer`]
//! returns the preferred backend among those compiled in, probing in the
//! order tensor, array, plain. The choice is made once per process.
//!
//! # Examples
//!
//! ```
//! use actrec_stats::{
//!     number::{Number, numbers},
//!     reducer::{BasicReducer, Reducer as _},
//! };
//!
//! let reducer = BasicReducer;
//! let values = numbers([1, 2, 3, 4]);
//! assert_eq!(reducer.median(&values).unwrap(), Number::Int(2));
//! assert_eq!(reducer.mean(&values).unwrap(), 2.5);
//! assert!(reducer.max(&[]).is_err());
//! ```

use std::{fmt, sync::OnceLock};

#[cfg(feature = "ndarray")]
pub use self::array::NdarrayReducer;
pub use self::basic::BasicReducer;
#[cfg(feature = "nalgebra")]
pub use self::tensor::NalgebraReducer;
use crate::{
    error::{EmptySequenceError, Statistic},
    number::Number,
};

#[cfg(feature = "ndarray")]
mod array;
mod basic;
#[cfg(feature = "nalgebra")]
mod tensor;

/// Backend-independent numeric reduction primitives.
///
/// Every method except [`Reducer::sort`] fails with [`EmptySequenceError`]
/// on an empty input.
pub trait Reducer: fmt::Debug + Send + Sync {
    /// The backend implementing this reducer.
    fn backend(&self) -> Backend;

    /// Largest value; integer if every input is an integer.
    fn max(&self, values: &[Number]) -> Result<Number, EmptySequenceError>;

    /// Smallest value; integer if every input is an integer.
    fn min(&self, values: &[Number]) -> Result<Number, EmptySequenceError>;

    /// Arithmetic mean.
    fn mean(&self, values: &[Number]) -> Result<f64, EmptySequenceError>;

    /// Lower median: for an even number of values, the smaller of the two
    /// middle values is returned rather than their average.
    fn median(&self, values: &[Number]) -> Result<Number, EmptySequenceError>;

    /// Quantiles at the given probability points.
    ///
    /// Uses linear interpolation between the order statistics surrounding
    /// position `p * (n - 1)` of the sorted values.
    ///
    /// # Arguments
    ///
    /// * `values` - Sample to summarize, in any order
    /// * `points` - Probabilities in `[0, 1]`; values outside are clamped
    ///
    /// # Returns
    ///
    /// One quantile per point, in the order of `points`.
    fn quantile(&self, values: &[Number], points: &[f64]) -> Result<Vec<f64>, EmptySequenceError>;

    /// Stable sorted copy. Never fails; empty input gives empty output.
    fn sort(&self, values: &[Number], descending: bool) -> Vec<Number>;

    /// Sample standard deviation (divides by `n - 1`). `NaN` for one value.
    fn std(&self, values: &[Number]) -> Result<f64, EmptySequenceError>;
}

/// Available numeric backends.
///
/// [`Backend::ALL`] lists them in preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::FromStr)]
pub enum Backend {
    #[display("nalgebra")]
    Nalgebra,
    #[display("ndarray")]
    Ndarray,
    #[display("basic")]
    Basic,
}

static DETECTED: OnceLock<Backend> = OnceLock::new();

impl Backend {
    /// All backends in preference order: tensor, array, plain.
    pub const ALL: [Self; 3] = [Self::Nalgebra, Self::Ndarray, Self::Basic];

    /// The kind of numeric library behind the backend.
    #[must_use]
    pub const fn category(self) -> &'static str {
        match self {
            Self::Nalgebra => "tensor",
            Self::Ndarray => "array",
            Self::Basic => "plain",
        }
    }

    /// Whether the backend was compiled into this build.
    #[must_use]
    pub const fn is_available(self) -> bool {
        match self {
            Self::Nalgebra => cfg!(feature = "nalgebra"),
            Self::Ndarray => cfg!(feature = "ndarray"),
            Self::Basic => true,
        }
    }

    /// The reducer for this backend, or `None` if it is not compiled in.
    #[must_use]
    pub fn reducer(self) -> Option<&'static dyn Reducer> {
        match self {
            #[cfg(feature = "nalgebra")]
            Self::Nalgebra => Some(&NalgebraReducer),
            #[cfg(feature = "ndarray")]
            Self::Ndarray => Some(&NdarrayReducer),
            Self::Basic => Some(&BasicReducer),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    /// The preferred available backend.
    ///
    /// Computed on first call and cached for the rest of the process.
    #[must_use]
    pub fn detect() -> Self {
        *DETECTED.get_or_init(|| {
            let backend = Self::ALL
                .into_iter()
                .find(|b| b.is_available())
                .unwrap_or(Self::Basic);
            tracing::debug!(%backend, category = backend.category(), "selected numeric backend");
            backend
        })
    }
}

/// Returns the reducer of the preferred available backend.
#[must_use]
pub fn auto_reducer() -> &'static dyn Reducer {
    Backend::detect().reducer().unwrap_or(&BasicReducer)
}

/// Backends compiled into this build, in preference order.
#[must_use]
pub fn available_backends() -> Vec<Backend> {
    Backend::ALL.into_iter().filter(|b| b.is_available()).collect()
}

/// Whether a backend with the given name (case-insensitive) is available.
///
/// ```
/// use actrec_stats::reducer::has_backend;
///
/// assert!(has_backend("basic"));
/// assert!(!has_backend("cuda"));
/// ```
#[must_use]
pub fn has_backend(name: &str) -> bool {
    name.parse::<Backend>().is_ok_and(Backend::is_available)
}

fn ensure_non_empty(values: &[Number], statistic: Statistic) -> Result<(), EmptySequenceError> {
    if values.is_empty() {
        return Err(EmptySequenceError::new(statistic));
    }
    Ok(())
}

/// Keeps the picked element as-is when every input is an integer, otherwise
/// converts it to a float.
fn preserve_kind(values: &[Number], picked: Number) -> Number {
    if values.iter().all(Number::is_int) {
        picked
    } else {
        picked.to_float()
    }
}

const fn lower_median_index(len: usize) -> usize {
    (len - 1) / 2
}

/// Linear interpolation at position `point * (len - 1)` of a sorted sequence
/// accessed through `at`.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn linear_quantile(len: usize, point: f64, at: impl Fn(usize) -> f64) -> f64 {
    debug_assert!(len > 0);
    let pos = point.clamp(0.0, 1.0) * (len - 1) as f64;
    let lo = (pos.floor() as usize).min(len - 1);
    let hi = (pos.ceil() as usize).min(len - 1);
    let frac = pos - lo as f64;
    let lower = at(lo);
    if lo == hi {
        return lower;
    }
    lower + (at(hi) - lower) * frac
}

/// Indices that stably sort a sequence of `len` elements compared by `cmp`.
fn argsort(
    len: usize,
    descending: bool,
    cmp: impl Fn(usize, usize) -> std::cmp::Ordering,
) -> Vec<usize> {
    let mut indices = (0..len).collect::<Vec<_>>();
    if descending {
        indices.sort_by(|&a, &b| cmp(b, a));
    } else {
        indices.sort_by(|&a, &b| cmp(a, b));
    }
    indices
}
