use crate::error::TapeError;
use crate::rng::NormalSampler;
use serde::{Deserialize, Serialize};

/// A dense, row-major 2-D matrix of `f64` values paired with a gradient buffer of the
/// same shape.
///
/// `w` holds the values and `dw` the accumulated gradient (the adjoint). Both always
/// have exactly `rows * cols` elements; the buffers are exposed as slices so callers
/// can read and write elements but never resize them.
///
/// Gradients only grow through `+=` during a backward replay. They return to zero when
/// a parameter update consumes them ([`Matrix::update`], or the RMSprop solver) or when
/// [`Matrix::zero_grad`] is called.
#[derive(Debug, Clone)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    w: Vec<f64>,
    dw: Vec<f64>,
}

/// Serialized form of a [`Matrix`]: shape plus row-major values. Gradients are never
/// part of the record.
///
/// `n` and `d` are accepted as legacy aliases of `rows` and `cols` when reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRecord {
    #[serde(alias = "n")]
    pub rows: usize,
    #[serde(alias = "d")]
    pub cols: usize,
    pub w: Vec<f64>,
}

impl Matrix {
    /// Creates a zero-filled matrix with zero gradients.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        let len = rows * cols;
        Matrix {
            rows,
            cols,
            w: vec![0.0; len],
            dw: vec![0.0; len],
        }
    }

    /// Creates a matrix from row-major values.
    ///
    /// # Errors
    /// `MatrixCreationError` if `w.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, w: Vec<f64>) -> Result<Self, TapeError> {
        if w.len() != rows * cols {
            return Err(TapeError::MatrixCreationError {
                data_len: w.len(),
                shape: (rows, cols),
            });
        }
        let dw = vec![0.0; w.len()];
        Ok(Matrix { rows, cols, w, dw })
    }

    /// Creates a matrix whose values are independent `N(mu, std^2)` samples.
    pub fn random(rows: usize, cols: usize, mu: f64, std: f64, sampler: &mut NormalSampler) -> Self {
        let mut m = Matrix::zeros(rows, cols);
        sampler.fill(&mut m.w, mu, std);
        m
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of elements, `rows * cols`.
    pub fn len(&self) -> usize {
        self.w.len()
    }

    pub fn is_empty(&self) -> bool {
        self.w.is_empty()
    }

    pub fn w(&self) -> &[f64] {
        &self.w
    }

    pub fn w_mut(&mut self) -> &mut [f64] {
        &mut self.w
    }

    pub fn dw(&self) -> &[f64] {
        &self.dw
    }

    pub fn dw_mut(&mut self) -> &mut [f64] {
        &mut self.dw
    }

    /// Mutable access to the value and gradient buffers at the same time.
    pub fn buffers_mut(&mut self) -> (&mut [f64], &mut [f64]) {
        (&mut self.w, &mut self.dw)
    }

    fn index_of(&self, row: usize, col: usize) -> Result<usize, TapeError> {
        let out_of_bounds = TapeError::IndexOutOfBounds {
            index: (row, col),
            shape: self.shape(),
        };
        if row >= self.rows || col >= self.cols {
            return Err(out_of_bounds);
        }
        row.checked_mul(self.cols)
            .and_then(|r| r.checked_add(col))
            .ok_or(out_of_bounds)
    }

    /// Returns the value at `(row, col)`.
    ///
    /// # Errors
    /// `IndexOutOfBounds` if the position lies outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> Result<f64, TapeError> {
        let ix = self.index_of(row, col)?;
        Ok(self.w[ix])
    }

    /// Sets the value at `(row, col)`. Gradients are untouched.
    ///
    /// # Errors
    /// `IndexOutOfBounds` if the position lies outside the matrix.
    pub fn set(&mut self, row: usize, col: usize, v: f64) -> Result<(), TapeError> {
        let ix = self.index_of(row, col)?;
        self.w[ix] = v;
        Ok(())
    }

    /// Overwrites the values left to right with `values`. A shorter slice only
    /// overwrites the leading elements; gradients are untouched.
    ///
    /// # Errors
    /// `IndexOutOfBounds` if `values` has more elements than the matrix. Nothing is
    /// written in that case.
    pub fn set_from(&mut self, values: &[f64]) -> Result<(), TapeError> {
        if values.len() > self.w.len() {
            // Report the first position that would have been written out of range.
            let first = self.w.len();
            return Err(TapeError::IndexOutOfBounds {
                index: (first / self.cols.max(1), first % self.cols.max(1)),
                shape: self.shape(),
            });
        }
        self.w[..values.len()].copy_from_slice(values);
        Ok(())
    }

    /// Copies the values of the column vector `m` into column `col`.
    ///
    /// # Errors
    /// * `ShapeMismatch` if `m` does not have exactly `rows` elements.
    /// * `IndexOutOfBounds` if `col >= cols`.
    pub fn set_column(&mut self, m: &Matrix, col: usize) -> Result<(), TapeError> {
        if m.len() != self.rows {
            return Err(TapeError::ShapeMismatch {
                operation: "set_column".to_string(),
                left: self.shape(),
                right: m.shape(),
            });
        }
        if col >= self.cols {
            return Err(TapeError::IndexOutOfBounds {
                index: (0, col),
                shape: self.shape(),
            });
        }
        for (i, &v) in m.w.iter().enumerate() {
            self.w[i * self.cols + col] = v;
        }
        Ok(())
    }

    /// True if both matrices have the same shape and identical values.
    /// Gradients are not compared.
    pub fn equals(&self, other: &Matrix) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.w == other.w
    }

    /// Plain gradient-descent step: `w[i] -= alpha * dw[i]`, then `dw[i] = 0`.
    ///
    /// Elements whose gradient is exactly zero are skipped, so parameters untouched by
    /// the last backward pass stay as they are.
    pub fn update(&mut self, alpha: f64) {
        for (w, dw) in self.w.iter_mut().zip(self.dw.iter_mut()) {
            if *dw != 0.0 {
                *w -= alpha * *dw;
                *dw = 0.0;
            }
        }
    }

    /// Resets every gradient element to zero.
    pub fn zero_grad(&mut self) {
        self.dw.fill(0.0);
    }

    /// Adds `values` element-wise into the gradient buffer starting at `offset`.
    pub(crate) fn accumulate_grad(&mut self, offset: usize, values: &[f64]) {
        for (dw, v) in self.dw[offset..offset + values.len()].iter_mut().zip(values) {
            *dw += *v;
        }
    }

    pub fn to_record(&self) -> MatrixRecord {
        MatrixRecord {
            rows: self.rows,
            cols: self.cols,
            w: self.w.clone(),
        }
    }

    /// Rebuilds a matrix from its record; gradients start at zero.
    ///
    /// # Errors
    /// `MatrixCreationError` if the record's value count does not match its shape.
    pub fn from_record(record: MatrixRecord) -> Result<Self, TapeError> {
        Matrix::from_vec(record.rows, record.cols, record.w)
    }

    /// Serializes the matrix record as a JSON object `{"rows", "cols", "w"}`.
    pub fn to_json(&self) -> Result<String, TapeError> {
        Ok(serde_json::to_string(&self.to_record())?)
    }

    pub fn from_json(json: &str) -> Result<Self, TapeError> {
        let record: MatrixRecord = serde_json::from_str(json)?;
        Matrix::from_record(record)
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl From<&Matrix> for MatrixRecord {
    fn from(m: &Matrix) -> Self {
        m.to_record()
    }
}

impl TryFrom<MatrixRecord> for Matrix {
    type Error = TapeError;

    fn try_from(record: MatrixRecord) -> Result<Self, Self::Error> {
        Matrix::from_record(record)
    }
}

#[cfg(test)]
#[path = "matrix_test.rs"]
mod tests;
