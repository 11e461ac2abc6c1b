use std::collections::HashMap;

use ahash::AHashMap;
use ndarray::{Array1, Array2, ArrayView1, s};

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeightType { I64, F64 }

/// Node weights stored as type-separated matrices.
///
/// Integer series (population counts, vote counts) live in `i64` so that sums
/// over any subset of nodes are exact regardless of summation order.
#[derive(Clone, Debug)]
pub struct WeightMatrix {
    series: AHashMap<String, (WeightType, usize)>, // len = k_i + k_f
    i64: Array2<i64>, // (n, k_i)
    f64: Array2<f64>, // (n, k_f)
}

impl WeightMatrix {
    /// Build a weight matrix with `num_rows` rows from named integer and real series.
    /// Columns are laid out in sorted name order.
    pub fn new(num_rows: usize,
        weights_i64: HashMap<String, Vec<i64>>,
        weights_f64: HashMap<String, Vec<f64>>,
    ) -> Result<Self> {
        if let Some(name) = weights_i64.keys().find(|&name| weights_f64.contains_key(name)) {
            return Err(Error::InvalidGraph(format!("series '{name}' is declared as both integer and real")))
        }

        let mut names_i64 = weights_i64.keys().cloned().collect::<Vec<_>>();
        let mut names_f64 = weights_f64.keys().cloned().collect::<Vec<_>>();
        names_i64.sort_unstable();
        names_f64.sort_unstable();

        let mut ints = Array2::<i64>::zeros((num_rows, names_i64.len()));
        let mut reals = Array2::<f64>::zeros((num_rows, names_f64.len()));
        let mut series = AHashMap::with_capacity(names_i64.len() + names_f64.len());

        for (i, name) in names_i64.into_iter().enumerate() {
            let values = &weights_i64[&name];
            if values.len() != num_rows {
                return Err(Error::InvalidGraph(format!("series '{name}' has {} values, expected {num_rows}", values.len())))
            }
            ints.slice_mut(s![.., i]).assign(&Array1::from(values.clone()));
            series.insert(name, (WeightType::I64, i));
        }

        for (i, name) in names_f64.into_iter().enumerate() {
            let values = &weights_f64[&name];
            if values.len() != num_rows {
                return Err(Error::InvalidGraph(format!("series '{name}' has {} values, expected {num_rows}", values.len())))
            }
            reals.slice_mut(s![.., i]).assign(&Array1::from(values.clone()));
            series.insert(name, (WeightType::F64, i));
        }

        Ok(Self { series, i64: ints, f64: reals })
    }

    /// Build a weight matrix with `num_rows` rows and no series.
    pub fn empty(num_rows: usize) -> Self {
        Self {
            series: AHashMap::new(),
            i64: Array2::zeros((num_rows, 0)),
            f64: Array2::zeros((num_rows, 0)),
        }
    }

    /// Number of rows (nodes).
    #[inline] pub fn num_rows(&self) -> usize { self.i64.nrows() }

    /// Check whether a series exists.
    #[inline] pub fn contains(&self, series: &str) -> bool { self.series.contains_key(series) }

    /// Storage type of a series, if present.
    #[inline]
    pub fn series_type(&self, series: &str) -> Option<WeightType> {
        self.series.get(series).map(|&(kind, _)| kind)
    }

    /// Sorted list of series names.
    pub fn series_names(&self) -> Vec<String> {
        let mut names = self.series.keys().cloned().collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    /// Column view of an integer series.
    pub fn column_i64(&self, series: &str) -> Option<ArrayView1<'_, i64>> {
        match self.series.get(series)? {
            &(WeightType::I64, col) => Some(self.i64.column(col)),
            _ => None,
        }
    }

    /// Column view of a real series.
    pub fn column_f64(&self, series: &str) -> Option<ArrayView1<'_, f64>> {
        match self.series.get(series)? {
            &(WeightType::F64, col) => Some(self.f64.column(col)),
            _ => None,
        }
    }

    /// Integer value of `series` at `row`, or None if the series is missing or real-valued.
    #[inline]
    pub fn get_i64(&self, series: &str, row: usize) -> Option<i64> {
        self.column_i64(series).map(|col| col[row])
    }

    /// Value of `series` at `row` widened to f64, regardless of storage type.
    pub fn get_as_f64(&self, series: &str, row: usize) -> Option<f64> {
        match self.series.get(series)? {
            &(WeightType::I64, col) => Some(self.i64[[row, col]] as f64),
            &(WeightType::F64, col) => Some(self.f64[[row, col]]),
        }
    }

    /// Sum of a series over all rows, widened to f64.
    pub fn total_as_f64(&self, series: &str) -> Option<f64> {
        match self.series.get(series)? {
            &(WeightType::I64, col) => Some(self.i64.column(col).sum() as f64),
            &(WeightType::F64, col) => Some(self.f64.column(col).sum()),
        }
    }
}
