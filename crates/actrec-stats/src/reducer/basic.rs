use super::{
    Backend, Reducer, argsort, ensure_non_empty, linear_quantile, lower_median_index,
    preserve_kind,
};
use crate::{
    error::{EmptySequenceError, Statistic},
    number::Number,
};

/// Reducer implemented with plain iterator arithmetic.
///
/// Always available; it is the fallback when no numeric library backend is
/// compiled in.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicReducer;

impl Reducer for BasicReducer {
    fn backend(&self) -> Backend {
        Backend::Basic
    }

    fn max(&self, values: &[Number]) -> Result<Number, EmptySequenceError> {
        let max = values
            .iter()
            .copied()
            .max_by(Number::total_cmp)
            .ok_or(EmptySequenceError::new(Statistic::Maximum))?;
        Ok(preserve_kind(values, max))
    }

    fn min(&self, values: &[Number]) -> Result<Number, EmptySequenceError> {
        let min = values
            .iter()
            .copied()
            .min_by(Number::total_cmp)
            .ok_or(EmptySequenceError::new(Statistic::Minimum))?;
        Ok(preserve_kind(values, min))
    }

    #[expect(clippy::cast_precision_loss)]
    fn mean(&self, values: &[Number]) -> Result<f64, EmptySequenceError> {
        ensure_non_empty(values, Statistic::Mean)?;
        let sum = values.iter().map(|v| v.as_f64()).sum::<f64>();
        Ok(sum / values.len() as f64)
    }

    fn median(&self, values: &[Number]) -> Result<Number, EmptySequenceError> {
        ensure_non_empty(values, Statistic::Median)?;
        let sorted = self.sort(values, false);
        Ok(preserve_kind(values, sorted[lower_median_index(sorted.len())]))
    }

    fn quantile(
        &self,
        values: &[Number],
        points: &[f64],
    ) -> Result<Vec<f64>, EmptySequenceError> {
        ensure_non_empty(values, Statistic::Quantiles)?;
        let mut sorted = values.iter().map(|v| v.as_f64()).collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Ok(points
            .iter()
            .map(|&p| linear_quantile(sorted.len(), p, |i| sorted[i]))
            .collect())
    }

    fn sort(&self, values: &[Number], descending: bool) -> Vec<Number> {
        argsort(values.len(), descending, |a, b| {
            values[a].total_cmp(&values[b])
        })
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
        let mean = self.mean(values)?;
        let sum_sq = values
            .iter()
            .map(|v| (v.as_f64() - mean).powi(2))
            .sum::<f64>();
        Ok((sum_sq / (values.len() - 1) as f64).sqrt())
    }
}
