use ndarray::{Array1, Axis};

use super::{
    Backend, Reducer, argsort, ensure_non_empty, linear_quantile, lower_median_index,
    preserve_kind,
};
use crate::{
    error::{EmptySequenceError, Statistic},
    number::Number,
};

/// Reducer backed by `ndarray` one-dimensional arrays.
#[derive(Debug, Clone, Copy, Default)]
pub struct NdarrayReducer;

fn to_array(values: &[Number]) -> Array1<f64> {
    values.iter().map(|v| v.as_f64()).collect()
}

fn sorted_indices(array: &Array1<f64>, descending: bool) -> Vec<usize> {
    argsort(array.len(), descending, |a, b| array[a].total_cmp(&array[b]))
}

impl Reducer for NdarrayReducer {
    fn backend(&self) -> Backend {
        Backend::Ndarray
    }

    fn max(&self, values: &[Number]) -> Result<Number, EmptySequenceError> {
        let array = to_array(values);
        let (index, _) = array
            .indexed_iter()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .ok_or(EmptySequenceError::new(Statistic::Maximum))?;
        Ok(preserve_kind(values, values[index]))
    }

    fn min(&self, values: &[Number]) -> Result<Number, EmptySequenceError> {
        let array = to_array(values);
        let (index, _) = array
            .indexed_iter()
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .ok_or(EmptySequenceError::new(Statistic::Minimum))?;
        Ok(preserve_kind(values, values[index]))
    }

    fn mean(&self, values: &[Number]) -> Result<f64, EmptySequenceError> {
        to_array(values)
            .mean()
            .ok_or(EmptySequenceError::new(Statistic::Mean))
    }

    fn median(&self, values: &[Number]) -> Result<Number, EmptySequenceError> {
        ensure_non_empty(values, Statistic::Median)?;
        let indices = sorted_indices(&to_array(values), false);
        let index = indices[lower_median_index(indices.len())];
        Ok(preserve_kind(values, values[index]))
    }

    fn quantile(
        &self,
        values: &[Number],
        points: &[f64],
    ) -> Result<Vec<f64>, EmptySequenceError> {
        ensure_non_empty(values, Statistic::Quantiles)?;
        let array = to_array(values);
        let sorted = array.select(Axis(0), &sorted_indices(&array, false));
        Ok(points
            .iter()
            .map(|&p| linear_quantile(sorted.len(), p, |i| sorted[i]))
            .collect())
    }

    fn sort(&self, values: &[Number], descending: bool) -> Vec<Number> {
        sorted_indices(&to_array(values), descending)
            .into_iter()
            .map(|i| values[i])
            .collect()
    }

    fn std(&self, values: &[Number]) -> Result<f64, EmptySequenceError> {
        ensure_non_empty(values, Statistic::StdDev)?;
        if values.len() == 1 {
            return Ok(f64::NAN);
        }
        Ok(to_array(values).std(1.0))
    }
}
