//! Read-only row/column views into a dataset.

use ndarray::ArrayView2;

/// Read-only view of a row and column subset of a dataset.
///
/// The underlying array is borrowed and never mutated; restricting rows or
/// columns produces a new slice over the same borrow. Row and column indices
/// are absolute positions in the original dataset, so overlapping slices can
/// coexist cheaply.
///
/// A slice is always two-dimensional, even when restricted to one column.
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use sumproduct::data::DataSlice;
///
/// let data = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
/// let slice = DataSlice::from_view(data.view());
/// assert_eq!((slice.n_rows(), slice.n_cols()), (2, 3));
///
/// let one_col = slice.slice_cols(&[1]);
/// assert_eq!((one_col.n_rows(), one_col.n_cols()), (2, 1));
/// assert_eq!(one_col.value(1, 0), 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct DataSlice<'a> {
    /// Full dataset, `[n_rows, n_cols]`.
    data: ArrayView2<'a, f64>,
    /// Absolute row indices covered by this slice.
    rows: Vec<usize>,
    /// Absolute column indices covered by this slice.
    cols: Vec<usize>,
}

impl<'a> DataSlice<'a> {
    /// Create a slice covering the whole dataset.
    pub fn from_view(data: ArrayView2<'a, f64>) -> Self {
        let rows = (0..data.nrows()).collect();
        let cols = (0..data.ncols()).collect();
        Self { data, rows, cols }
    }

    /// Number of rows in this slice.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in this slice.
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.cols.len()
    }

    /// Value at slice-relative `(row, col)`.
    #[inline]
    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.data[[self.rows[row], self.cols[col]]]
    }

    /// Iterate over the values of a slice-relative column.
    pub fn column(&self, col: usize) -> impl Iterator<Item = f64> + use<'_, 'a> {
        let abs_col = self.cols[col];
        self.rows.iter().map(move |&r| self.data[[r, abs_col]])
    }

    /// Absolute row indices covered by this slice.
    pub fn row_indices(&self) -> &[usize] {
        &self.rows
    }

    /// Restrict to a subset of columns, given as slice-relative positions.
    ///
    /// The result keeps the current rows and stays two-dimensional even for
    /// a single column.
    pub fn slice_cols(&self, positions: &[usize]) -> DataSlice<'a> {
        let cols = positions.iter().map(|&p| self.cols[p]).collect();
        DataSlice {
            data: self.data,
            rows: self.rows.clone(),
            cols,
        }
    }

    /// Restrict to a subset of rows, given as slice-relative positions.
    pub fn with_rows(&self, positions: &[usize]) -> DataSlice<'a> {
        let rows = positions.iter().map(|&p| self.rows[p]).collect();
        DataSlice {
            data: self.data,
            rows,
            cols: self.cols.clone(),
        }
    }

    /// Positions (slice-relative, ascending) of zero-variance columns among
    /// the first `limit` columns.
    ///
    /// A column has zero variance when it holds a single repeated value
    /// across all rows of this slice. Empty and single-row slices report
    /// every column as zero-variance.
    pub fn zero_variance_cols(&self, limit: usize) -> Vec<usize> {
        let limit = limit.min(self.n_cols());
        (0..limit)
            .filter(|&c| {
                let mut values = self.column(c);
                match values.next() {
                    Some(first) => values.all(|v| v == first),
                    None => true,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn full_view_covers_everything() {
        let data = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let slice = DataSlice::from_view(data.view());

        assert_eq!(slice.n_rows(), 3);
        assert_eq!(slice.n_cols(), 2);
        assert_eq!(slice.value(2, 1), 6.0);
    }

    #[test]
    fn slice_cols_preserves_2d_shape_for_one_column() {
        let data = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let slice = DataSlice::from_view(data.view());

        let one = slice.slice_cols(&[2]);
        assert_eq!(one.n_rows(), 2);
        assert_eq!(one.n_cols(), 1);
        assert_eq!(one.column(0).collect::<Vec<_>>(), vec![3.0, 6.0]);
    }

    #[test]
    fn nested_slicing_tracks_absolute_positions() {
        let data = array![[0.0, 1.0, 2.0, 3.0], [4.0, 5.0, 6.0, 7.0], [8.0, 9.0, 10.0, 11.0]];
        let slice = DataSlice::from_view(data.view());

        // Keep columns 1 and 3, then rows 0 and 2, then column 1 of the rest.
        let narrowed = slice.slice_cols(&[1, 3]).with_rows(&[0, 2]);
        let last = narrowed.slice_cols(&[1]);

        assert_eq!(narrowed.row_indices(), &[0, 2]);
        assert_eq!(last.column(0).collect::<Vec<_>>(), vec![3.0, 11.0]);
    }

    #[test]
    fn zero_variance_detection() {
        let data = array![[1.0, 2.0, 5.0], [1.0, 3.0, 5.0], [1.0, 2.0, 5.0]];
        let slice = DataSlice::from_view(data.view());

        assert_eq!(slice.zero_variance_cols(3), vec![0, 2]);
        assert_eq!(slice.zero_variance_cols(2), vec![0]);
    }

    #[test]
    fn single_row_is_all_zero_variance() {
        let data = array![[1.0, 2.0, 3.0]];
        let slice = DataSlice::from_view(data.view());

        assert_eq!(slice.zero_variance_cols(3), vec![0, 1, 2]);
    }

    #[test]
    fn row_subset_changes_variance() {
        let data = array![[1.0, 9.0], [1.0, 9.0], [2.0, 9.0]];
        let slice = DataSlice::from_view(data.view());
        assert_eq!(slice.zero_variance_cols(2), vec![1]);

        // Restricted to the first two rows, column 0 becomes constant too.
        let top = slice.with_rows(&[0, 1]);
        assert_eq!(top.zero_variance_cols(2), vec![0, 1]);
    }
}
