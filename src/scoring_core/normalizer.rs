//! Column-wise min-max scaling
//!
//! Statistics are fitted per call and returned as a value; nothing is cached
//! between scoring runs.

/// Observed range of one column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnRange {
    pub min: f64,
    pub max: f64,
}

impl ColumnRange {
    pub fn fit(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |range, v| {
            Some(match range {
                None => ColumnRange { min: v, max: v },
                Some(r) => ColumnRange {
                    min: r.min.min(v),
                    max: r.max.max(v),
                },
            })
        })
    }

    /// Map `value` into [0, 1]. A constant column (max == min) maps to 0,
    /// as does anything that cannot produce a finite ratio.
    pub fn scale(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span > 0.0 && span.is_finite() && value.is_finite() {
            ((value - self.min) / span).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Fitted min-max scaler over fixed-width rows
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxScaler<const N: usize> {
    ranges: [ColumnRange; N],
}

impl<const N: usize> MinMaxScaler<N> {
    /// Fit every column independently. Returns `None` for zero rows.
    pub fn fit(rows: &[[f64; N]]) -> Option<Self> {
        let first = rows.first()?;
        let mut ranges = [ColumnRange { min: 0.0, max: 0.0 }; N];
        for (col, range) in ranges.iter_mut().enumerate() {
            *range = ColumnRange {
                min: first[col],
                max: first[col],
            };
        }

        for row in &rows[1..] {
            for (col, range) in ranges.iter_mut().enumerate() {
                range.min = range.min.min(row[col]);
                range.max = range.max.max(row[col]);
            }
        }

        Some(Self { ranges })
    }

    pub fn transform(&self, row: &[f64; N]) -> [f64; N] {
        let mut scaled = [0.0; N];
        for (col, value) in scaled.iter_mut().enumerate() {
            *value = self.ranges[col].scale(row[col]);
        }
        scaled
    }
}

/// One-dimensional min-max rescale onto `[0, upper]`.
///
/// When every value is identical the result is all zeros.
pub fn min_max_rescale(values: &[f64], upper: f64) -> Vec<f64> {
    match ColumnRange::fit(values.iter().copied()) {
        Some(range) => values.iter().map(|v| range.scale(*v) * upper).collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_and_transform() {
        let rows = [[0.0, 10.0, 5.0], [5.0, 20.0, 5.0], [10.0, 15.0, 5.0]];
        let scaler = MinMaxScaler::fit(&rows).unwrap();

        assert_eq!(scaler.transform(&rows[0]), [0.0, 0.0, 0.0]);
        assert_eq!(scaler.transform(&rows[1]), [0.5, 1.0, 0.0]);
        assert_eq!(scaler.transform(&rows[2]), [1.0, 0.5, 0.0]);
        assert_eq!(scaler.ranges[2], ColumnRange { min: 5.0, max: 5.0 });
        assert_eq!(scaler.ranges[0], ColumnRange { min: 0.0, max: 10.0 });
    }

    #[test]
    fn test_fit_empty() {
        let rows: [[f64; 2]; 0] = [];
        assert!(MinMaxScaler::fit(&rows).is_none());
    }

    #[test]
    fn test_constant_column_is_zero_not_nan() {
        let rows = [[3.0], [3.0]];
        let scaler = MinMaxScaler::fit(&rows).unwrap();
        let scaled = scaler.transform(&rows[0]);
        assert_eq!(scaled[0], 0.0);
        assert!(!scaled[0].is_nan());
    }

    #[test]
    fn test_unbounded_range_never_yields_nan() {
        let range = ColumnRange {
            min: 0.0,
            max: f64::INFINITY,
        };
        assert_eq!(range.scale(f64::INFINITY), 0.0);
        assert_eq!(range.scale(1.0), 0.0);

        let range = ColumnRange { min: 0.0, max: 4.0 };
        assert_eq!(range.scale(f64::NAN), 0.0);
        assert_eq!(range.scale(2.0), 0.5);
    }

    #[test]
    fn test_rescale() {
        let out = min_max_rescale(&[2.0, 4.0, 3.0], 1000.0);
        assert_eq!(out, vec![0.0, 1000.0, 500.0]);

        let flat = min_max_rescale(&[7.0, 7.0, 7.0], 1000.0);
        assert_eq!(flat, vec![0.0, 0.0, 0.0]);

        assert!(min_max_rescale(&[], 1000.0).is_empty());
    }

    #[test]
    fn test_refit_does_not_reuse_previous_range() {
        let wide = MinMaxScaler::fit(&[[0.0], [100.0]]).unwrap();
        let narrow = MinMaxScaler::fit(&[[40.0], [60.0]]).unwrap();

        assert_eq!(wide.transform(&[50.0]), [0.5]);
        assert_eq!(narrow.transform(&[50.0]), [0.5]);
        assert_eq!(narrow.ranges[0], ColumnRange { min: 40.0, max: 60.0 });
    }
}
