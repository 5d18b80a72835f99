use nalgebra::DVector;

use super::{
    Backend, Reducer, argsort, ensure_non_empty, linear_quantile, lower_median_index,
    preserve_kind,
};
use crate::{
    error::{EmptySequenceError, Statistic},
    number::Number,
};

/// Reducer backed by `nalgebra` dynamically-sized vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct NalgebraReducer;

fn to_vector(values: &[Number]) -> DVector<f64> {
    DVector::from_iterator(values.len(), values.iter().map(|v| v.as_f64()))
}

fn sorted_indices(vector: &DVector<f64>, descending: bool) -> Vec<usize> {
    argsort(vector.len(), descending, |a, b| vector[a].total_cmp(&vector[b]))
}

impl Reducer for NalgebraReducer {
    fn backend(&self) -> Backend {
        Backend::Nalgebra
    }

    // `argmax`/`argmin` skip NaN, so order by `total_cmp` instead
    fn max(&self, values: &[Number]) -> Result<Number, EmptySequenceError> {
        let vector = to_vector(values);
        let (index, _) = vector
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .ok_or(EmptySequenceError::new(Statistic::Maximum))?;
        Ok(preserve_kind(values, values[index]))
    }

    fn min(&self, values: &[Number]) -> Result<Number, EmptySequenceError> {
        let vector = to_vector(values);
        let (index, _) = vector
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .ok_or(EmptySequenceError::new(Statistic::Minimum))?;
        Ok(preserve_kind(values, values[index]))
    }

    fn mean(&self, values: &[Number]) -> Result<f64, EmptySequenceError> {
        ensure_non_empty(values, Statistic::Mean)?;
        Ok(to_vector(values).mean())
    }

    fn median(&self, values: &[Number]) -> Result<Number, EmptySequenceError> {
        ensure_non_empty(values, Statistic::Median)?;
        let indices = sorted_indices(&to_vector(values), false);
        let index = indices[lower_median_index(indices.len())];
        Ok(preserve_kind(values, values[index]))
    }

    fn quantile(
        &self,
        values: &[Number],
        points: &[f64],
    ) -> Result<Vec<f64>, EmptySequenceError> {
        ensure_non_empty(values, Statistic::Quantiles)?;
        let mut sorted = to_vector(values);
        sorted.as_mut_slice().sort_by(f64::total_cmp);
        Ok(points
            .iter()
            .map(|&p| linear_quantile(sorted.len(), p, |i| sorted[i]))
            .collect())
    }

    fn sort(&self, values: &[Number], descending: bool) -> Vec<Number> {
        sorted_indices(&to_vector(values), descending)
            .into_iter()
            .map(|i| values[i])
            .collect()
    }

    #[expect(clippy::cast_precision_loss)]
    fn std(&self, values: &[Number]) -> Result<f64, EmptySequenceError> {
        ensure_non_empty(values, Statistic::StdDev)?;
        if values.len() == 1 {
            return Ok(f64::NAN);
        }
        let vector = to_vector(values);
        // `variance` divides by n; rescale to the sample variance
        let n = vector.len() as f64;
        Ok((vector.variance() * n / (n - 1.0)).sqrt())
    }
}
