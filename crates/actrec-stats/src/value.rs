//! Dynamically-typed data accepted by trackers.
//!
//! A [`Value`] is either a scalar (`bool`, integer, float, string), a generic
//! sequence of values, or an [`ArrayValue`]: a dense, shaped array whose
//! elements all share one [`ElementKind`].
//!
//! Values deserialize from plain JSON:
//!
//! ```
//! use actrec_stats::value::{ElementKind, Value};
//!
//! let value: Value = serde_json::from_str(r#"[1, 2.5, "a", true]"#).unwrap();
//! assert_eq!(
//!     value,
//!     Value::Seq(vec![
//!         Value::Int(1),
//!         Value::Float(2.5),
//!         Value::Str("a".into()),
//!         Value::Bool(true),
//!     ])
//! );
//!
//! let array: Value =
//!     serde_json::from_str(r#"{"shape": [2, 2], "data": {"float": [1.0, 2.0, 3.0, 4.0]}}"#)
//!         .unwrap();
//! let Value::Array(array) = array else { panic!() };
//! assert_eq!(array.element_kind(), ElementKind::Float);
//! assert_eq!(array.shape(), &[2, 2]);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<Value>),
    Array(ArrayValue),
}

impl Value {
    /// Returns the number of elements after full flattening.
    ///
    /// Scalars count as one element.
    #[must_use]
    pub fn num_elements(&self) -> usize {
        match self {
            Self::Bool(_) | Self::Int(_) | Self::Float(_) | Self::Str(_) => 1,
            Self::Seq(items) => items.iter().map(Self::num_elements).sum(),
            Self::Array(array) => array.len(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Str(v) => write!(f, "{v:?}"),
            Self::Seq(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Array(array) => write!(
                f,
                "array(shape={:?}, kind={})",
                array.shape,
                array.element_kind()
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<ArrayValue> for Value {
    fn from(value: ArrayValue) -> Self {
        Self::Array(value)
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Value>,
{
    fn from(values: Vec<T>) -> Self {
        Self::Seq(values.into_iter().map(Into::into).collect())
    }
}

impl<T, const N: usize> From<[T; N]> for Value
where
    T: Into<Value>,
{
    fn from(values: [T; N]) -> Self {
        Self::Seq(values.into_iter().map(Into::into).collect())
    }
}

/// Element type of an [`ArrayValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ElementKind {
    #[display("bool")]
    Bool,
    #[display("int")]
    Int,
    #[display("float")]
    Float,
    #[display("str")]
    Str,
}

impl ElementKind {
    /// Integer and floating element kinds; booleans are not numeric here.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }
}

/// Flat, row-major storage of an [`ArrayValue`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::From)]
#[serde(rename_all = "lowercase")]
pub enum ArrayData {
    Bool(Vec<bool>),
    Int(Vec<i64>),
    Float(Vec<f64>),
    Str(Vec<String>),
}

impl ArrayData {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Bool(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Str(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub const fn element_kind(&self) -> ElementKind {
        match self {
            Self::Bool(_) => ElementKind::Bool,
            Self::Int(_) => ElementKind::Int,
            Self::Float(_) => ElementKind::Float,
            Self::Str(_) => ElementKind::Str,
        }
    }
}

/// Raised when an array's shape does not describe its data.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ArrayShapeError {
    #[display("array shape {shape:?} holds {expected} elements but data has {actual}")]
    Mismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },
    #[display("array shape {shape:?} holds more elements than can be addressed")]
    Overflow {
        #[error(not(source))]
        shape: Vec<usize>,
    },
}

/// A dense array (or tensor) with a shape and a single element kind.
///
/// A zero-dimensional array (`shape == []`) holds exactly one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawArrayValue")]
pub struct ArrayValue {
    shape: Vec<usize>,
    data: ArrayData,
}

#[derive(Deserialize)]
struct RawArrayValue {
    shape: Vec<usize>,
    data: ArrayData,
}

impl TryFrom<RawArrayValue> for ArrayValue {
    type Error = ArrayShapeError;

    fn try_from(raw: RawArrayValue) -> Result<Self, Self::Error> {
        Self::new(raw.shape, raw.data)
    }
}

impl ArrayValue {
    /// Creates an array, checking that the shape matches the data length.
    ///
    /// # Arguments
    ///
    /// * `shape` - Size of each axis; empty for a zero-dimensional array
    /// * `data` - Elements in row-major order
    ///
    /// # Returns
    ///
    /// The array, or [`ArrayShapeError`] if the product of `shape` overflows
    /// `usize` or differs from the number of elements in `data`.
    ///
    /// # Examples
    ///
    /// ```
    /// use actrec_stats::value::ArrayValue;
    ///
    /// let array = ArrayValue::new(vec![2, 3], vec![1_i64, 2, 3, 4, 5, 6]).unwrap();
    /// assert_eq!(array.len(), 6);
    /// assert!(ArrayValue::new(vec![2, 2], vec![1.0, 2.0]).is_err());
    /// ```
    pub fn new<D>(shape: Vec<usize>, data: D) -> Result<Self, ArrayShapeError>
    where
        D: Into<ArrayData>,
    {
        let data = data.into();
        // a zero axis empties the array whatever the other axes hold
        let expected = if shape.contains(&0) {
            Some(0)
        } else {
            shape
                .iter()
                .try_fold(1_usize, |acc, &dim| acc.checked_mul(dim))
        };
        let Some(expected) = expected else {
            return Err(ArrayShapeError::Overflow { shape });
        };
        if expected != data.len() {
            return Err(ArrayShapeError::Mismatch {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Creates a one-dimensional array.
    #[must_use]
    pub fn vector<D>(data: D) -> Self
    where
        D: Into<ArrayData>,
    {
        let data = data.into();
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[must_use]
    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub const fn element_kind(&self) -> ElementKind {
        self.data.element_kind()
    }

    /// Returns the flattened elements as scalar values.
    #[must_use]
    pub fn to_values(&self) -> Vec<Value> {
        match &self.data {
            ArrayData::Bool(v) => v.iter().copied().map(Value::Bool).collect(),
            ArrayData::Int(v) => v.iter().copied().map(Value::Int).collect(),
            ArrayData::Float(v) => v.iter().copied().map(Value::Float).collect(),
            ArrayData::Str(v) => v.iter().cloned().map(Value::Str).collect(),
        }
    }
}
