//! Single-band raster grid.
//!
//! Cells are stored row-major (row 0 is the northernmost row). Code that
//! needs a different traversal order goes through an explicit index function
//! such as [`column_major_index`](crate::entity::exposures::gpw::column_major_index)
//! rather than reinterpreting `data`.

use crate::risk_error::RiskError;

/// Rows x cols grid of `f32` values, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterBand {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl RasterBand {
    /// Wraps `data`, which must hold exactly `rows * cols` values.
    pub fn try_new(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, RiskError> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(RiskError::InvalidRaster(format!(
                "{rows} x {cols} band cannot hold {} values",
                data.len()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Zero-filled band.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[f32] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Replaces every value below zero (no-data markers) with zero.
    pub fn clamp_negative(&mut self) {
        for v in &mut self.data {
            if *v < 0.0 {
                *v = 0.0;
            }
        }
    }

    /// Sub-grid `rows` x `cols` (half-open ranges, clamped to the band).
    pub fn window(&self, rows: std::ops::Range<usize>, cols: std::ops::Range<usize>) -> Self {
        let r0 = rows.start.min(self.rows);
        let r1 = rows.end.clamp(r0, self.rows);
        let c0 = cols.start.min(self.cols);
        let c1 = cols.end.clamp(c0, self.cols);
        let mut data = Vec::with_capacity((r1 - r0) * (c1 - c0));
        for r in r0..r1 {
            data.extend_from_slice(&self.row(r)[c0..c1]);
        }
        Self {
            rows: r1 - r0,
            cols: c1 - c0,
            data,
        }
    }

    /// Stacks `top`, `self` and `bottom` zero rows around the band.
    pub fn pad_rows(&self, top: usize, bottom: usize) -> Self {
        let mut data = Vec::with_capacity((top + self.rows + bottom) * self.cols);
        data.resize(top * self.cols, 0.0);
        data.extend_from_slice(&self.data);
        data.resize(data.len() + bottom * self.cols, 0.0);
        Self {
            rows: top + self.rows + bottom,
            cols: self.cols,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band() -> RasterBand {
        // 3 x 4, value = 10 * row + col
        let data = (0..3)
            .flat_map(|r| (0..4).map(move |c| (10 * r + c) as f32))
            .collect();
        RasterBand::try_new(3, 4, data).unwrap()
    }

    #[test]
    fn shape_must_match_data() {
        assert!(matches!(
            RasterBand::try_new(2, 2, vec![0.0; 3]),
            Err(RiskError::InvalidRaster(_))
        ));
    }

    #[test]
    fn window_clamps() {
        let w = band().window(1..10, 2..4);
        assert_eq!(w.shape(), (2, 2));
        assert_eq!(w.data(), &[12.0, 13.0, 22.0, 23.0]);
    }

    #[test]
    fn pad_rows_adds_zero_rows() {
        let p = band().window(0..1, 0..2).pad_rows(1, 2);
        assert_eq!(p.shape(), (4, 2));
        assert_eq!(p.data(), &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn clamp_negative_values() {
        let mut b = RasterBand::try_new(1, 3, vec![-3.4e38, 2.0, -1.0]).unwrap();
        b.clamp_negative();
        assert_eq!(b.data(), &[0.0, 2.0, 0.0]);
    }
}
