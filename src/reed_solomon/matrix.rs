//! Dense matrices over GF(2^8)
//!
//! Shard counts are only known at runtime, so dimensions live in the value
//! rather than in const generics. Storage is row-major.

use super::error::{CodingError, CodingResult};
use super::galois::Galois8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Galois8>,
}

impl Matrix {
    /// Create a new zero matrix
    pub fn zero(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![Galois8::ZERO; rows * cols],
        }
    }

    pub fn identity(size: usize) -> Self {
        let mut matrix = Self::zero(size, size);
        for i in 0..size {
            matrix.set(i, i, Galois8::ONE);
        }
        matrix
    }

    /// Vandermonde matrix: element (r, c) is `r^c`
    ///
    /// Rows are evaluation points 0..rows, so any `cols` rows are linearly
    /// independent as long as `rows <= 256`.
    pub fn vandermonde(rows: usize, cols: usize) -> Self {
        let mut matrix = Self::zero(rows, cols);
        for r in 0..rows {
            let point = Galois8::new(r as u8);
            for c in 0..cols {
                matrix.set(r, c, point.pow(c));
            }
        }
        matrix
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Galois8 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: Galois8) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[Galois8] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Matrix product `self * rhs`
    pub fn multiply(&self, rhs: &Matrix) -> CodingResult<Matrix> {
        if self.cols != rhs.rows {
            return Err(CodingError::DimensionMismatch {
                left: (self.rows, self.cols),
                right: (rhs.rows, rhs.cols),
            });
        }

        let mut result = Matrix::zero(self.rows, rhs.cols);
        for r in 0..self.rows {
            for c in 0..rhs.cols {
                let mut acc = Galois8::ZERO;
                for i in 0..self.cols {
                    acc += self.get(r, i) * rhs.get(i, c);
                }
                result.set(r, c, acc);
            }
        }
        Ok(result)
    }

    /// Copy rows `start..end` into a new matrix
    pub fn sub_rows(&self, start: usize, end: usize) -> Matrix {
        Matrix {
            rows: end - start,
            cols: self.cols,
            data: self.data[start * self.cols..end * self.cols].to_vec(),
        }
    }

    /// Gather the listed rows, in order, into a new matrix
    pub fn select_rows(&self, rows: &[usize]) -> Matrix {
        let mut data = Vec::with_capacity(rows.len() * self.cols);
        for &row in rows {
            data.extend_from_slice(self.row(row));
        }
        Matrix {
            rows: rows.len(),
            cols: self.cols,
            data,
        }
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for col in 0..self.cols {
            self.data.swap(a * self.cols + col, b * self.cols + col);
        }
    }

    /// Invert a square matrix with Gauss-Jordan elimination
    ///
    /// Returns `SingularMatrix` if no inverse exists.
    pub fn invert(&self) -> CodingResult<Matrix> {
        if self.rows != self.cols {
            return Err(CodingError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }

        let size = self.rows;
        let mut work = self.clone();
        let mut inverse = Matrix::identity(size);

        for pivot_row in 0..size {
            // Find a row with a non-zero entry in the pivot column
            let found = (pivot_row..size).find(|&r| !work.get(r, pivot_row).is_zero());
            let Some(source_row) = found else {
                return Err(CodingError::SingularMatrix);
            };
            work.swap_rows(pivot_row, source_row);
            inverse.swap_rows(pivot_row, source_row);

            // Scale pivot row so the pivot becomes 1
            let pivot_inv = work
                .get(pivot_row, pivot_row)
                .inverse()
                .ok_or(CodingError::SingularMatrix)?;
            if pivot_inv != Galois8::ONE {
                for col in 0..size {
                    work.set(pivot_row, col, work.get(pivot_row, col) * pivot_inv);
                    inverse.set(pivot_row, col, inverse.get(pivot_row, col) * pivot_inv);
                }
            }

            // Eliminate the pivot column from every other row
            for row in 0..size {
                if row == pivot_row {
                    continue;
                }
                let factor = work.get(row, pivot_row);
                if factor.is_zero() {
                    continue;
                }
                for col in 0..size {
                    let w = work.get(row, col) - factor * work.get(pivot_row, col);
                    work.set(row, col, w);
                    let v = inverse.get(row, col) - factor * inverse.get(pivot_row, col);
                    inverse.set(row, col, v);
                }
            }
        }

        Ok(inverse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_rows(rows: &[&[u8]]) -> Matrix {
        let mut matrix = Matrix::zero(rows.len(), rows[0].len());
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                matrix.set(r, c, Galois8::new(v));
            }
        }
        matrix
    }

    #[test]
    fn test_identity_multiply() {
        let m = from_rows(&[&[1, 2, 3], &[4, 5, 6]]);
        let product = m.multiply(&Matrix::identity(3)).unwrap();
        assert_eq!(product, m);
    }

    #[test]
    fn test_multiply_dimension_mismatch() {
        let a = Matrix::zero(2, 3);
        let b = Matrix::zero(2, 3);
        assert!(matches!(
            a.multiply(&b),
            Err(CodingError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_invert_round_trip() {
        let m = from_rows(&[&[56, 23, 98], &[3, 100, 200], &[45, 201, 123]]);
        let inv = m.invert().unwrap();
        assert_eq!(m.multiply(&inv).unwrap(), Matrix::identity(3));
        assert_eq!(inv.multiply(&m).unwrap(), Matrix::identity(3));
    }

    #[test]
    fn test_invert_needs_row_swap() {
        // Zero in the first pivot position
        let m = from_rows(&[&[0, 1], &[1, 0]]);
        let inv = m.invert().unwrap();
        assert_eq!(m.multiply(&inv).unwrap(), Matrix::identity(2));
    }

    #[test]
    fn test_invert_singular() {
        let m = from_rows(&[&[1, 2], &[1, 2]]);
        assert!(matches!(m.invert(), Err(CodingError::SingularMatrix)));
    }

    #[test]
    fn test_invert_not_square() {
        assert!(matches!(
            Matrix::zero(2, 3).invert(),
            Err(CodingError::NotSquare { rows: 2, cols: 3 })
        ));
    }

    #[test]
    fn test_vandermonde_rows() {
        let v = Matrix::vandermonde(4, 3);
        // Row 0 is 0^c: 1, 0, 0
        assert_eq!(v.row(0), &[Galois8::ONE, Galois8::ZERO, Galois8::ZERO]);
        // Row 1 is all ones
        assert!(v.row(1).iter().all(|&g| g == Galois8::ONE));
        assert_eq!(v.get(2, 2), Galois8::new(4));
    }

    #[test]
    fn test_any_square_vandermonde_selection_inverts() {
        let v = Matrix::vandermonde(6, 3);
        for a in 0..6 {
            for b in (a + 1)..6 {
                for c in (b + 1)..6 {
                    assert!(v.select_rows(&[a, b, c]).invert().is_ok(), "rows {a},{b},{c}");
                }
            }
        }
    }

    #[test]
    fn test_sub_rows() {
        let m = from_rows(&[&[1, 2], &[3, 4], &[5, 6]]);
        let tail = m.sub_rows(1, 3);
        assert_eq!(tail, from_rows(&[&[3, 4], &[5, 6]]));
    }
}
