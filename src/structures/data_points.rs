use std::path::Path;

use crate::error::SearchError;

/// A point cloud with uniform dimensionality.
#[derive(Clone, Debug, Default)]
pub struct DataPoints {
    n_points: usize,
    dimensionality: usize,
    points: Vec<Vec<f64>>,
}

impl DataPoints {
    #[must_use]
    pub fn new(points: Vec<Vec<f64>>) -> Self {
        let n_points = points.len();
        let dimensionality = points.first().map_or(0, Vec::len);
        Self {
            n_points,
            dimensionality,
            points,
        }
    }

    /// Reads a point cloud.
    ///
    /// Every non-empty line not starting with `%` is one point as whitespace
    /// separated decimal numbers; all points must share a dimensionality.
    pub fn from_path(path: &Path) -> Result<Self, SearchError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| SearchError::UnreadableFile {
                path: path.to_path_buf(),
                source,
            })?;

        let mut points: Vec<Vec<f64>> = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('%') {
                continue;
            }

            let mut point = Vec::new();
            for field in line.split_whitespace() {
                let value: f64 = field.parse().map_err(|_| SearchError::MalformedLine {
                    path: path.to_path_buf(),
                    line: line_no + 1,
                    reason: format!("'{field}' is not a number"),
                })?;
                point.push(value);
            }
            points.push(point);
        }

        if points.is_empty() {
            return Err(SearchError::EmptyInput {
                path: path.to_path_buf(),
            });
        }

        let dimensionality = points[0].len();
        for (index, point) in points.iter().enumerate() {
            if point.len() != dimensionality {
                return Err(SearchError::DimensionalityMismatch {
                    index,
                    found: point.len(),
                    expected: dimensionality,
                });
            }
        }

        Ok(Self::new(points))
    }

    #[inline]
    #[must_use]
    pub fn n(&self) -> usize {
        self.n_points
    }

    #[inline]
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.dimensionality
    }

    #[inline]
    #[must_use]
    pub fn point(&self, i: usize) -> &[f64] {
        &self.points[i]
    }

    #[must_use]
    pub fn euclidean_distance(&self, i: usize, j: usize) -> f64 {
        self.points[i]
            .iter()
            .zip(&self.points[j])
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }

    /// The `%`-commented form the parser accepts.
    #[must_use]
    pub fn to_point_list_string(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        let _ = writeln!(out, "%{} {}", self.n_points, self.dimensionality);
        for point in &self.points {
            for (i, v) in point.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                let _ = write!(out, "{v}");
            }
            out.push('\n');
        }
        out
    }

    pub fn write_to_file(&self, path: &Path) -> Result<(), SearchError> {
        std::fs::write(path, self.to_point_list_string()).map_err(|source| {
            SearchError::UnwritableOutput {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances() {
        let dp = DataPoints::new(vec![vec![0.0, 0.0], vec![3.0, 4.0]]);
        assert_eq!(dp.euclidean_distance(0, 1), 5.0);
        assert_eq!(dp.euclidean_distance(0, 0), 0.0);
    }

    #[test]
    fn parse_skips_comments() {
        let p = std::env::temp_dir().join("submax_points_ok.txt");
        std::fs::write(&p, "% a header\n0.0 1.0\n\n2.5 -3.5\n").unwrap();
        let dp = DataPoints::from_path(&p).unwrap();
        assert_eq!(dp.n(), 2);
        assert_eq!(dp.dimensionality(), 2);
        assert_eq!(dp.point(1), &[2.5, -3.5]);
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        let p = std::env::temp_dir().join("submax_points_ragged.txt");
        std::fs::write(&p, "0.0 1.0\n2.0\n").unwrap();
        assert!(matches!(
            DataPoints::from_path(&p),
            Err(SearchError::DimensionalityMismatch { index: 1, .. })
        ));
    }
}
