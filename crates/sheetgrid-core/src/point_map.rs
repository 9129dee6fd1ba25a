//! Sparse point-keyed containers.
//!
//! [`PointMap`] backs the copy buffer; [`PointSet`] answers selection
//! membership questions. Both iterate in row-major order.

use std::collections::{BTreeMap, BTreeSet};

use crate::matrix::Matrix;
use crate::point::Point;
use crate::point_range::PointRange;

#[derive(Clone, Debug, PartialEq)]
pub struct PointMap<T> {
    entries: BTreeMap<Point, T>,
}

impl<T> Default for PointMap<T> {
    fn default() -> Self {
        PointMap {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> PointMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, point: Point, value: T) -> Option<T> {
        self.entries.insert(point, value)
    }

    pub fn get(&self, point: Point) -> Option<&T> {
        self.entries.get(&point)
    }

    pub fn has(&self, point: Point) -> bool {
        self.entries.contains_key(&point)
    }

    pub fn unset(&mut self, point: Point) -> Option<T> {
        self.entries.remove(&point)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = Point> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Point, &T)> {
        self.entries.iter().map(|(p, v)| (*p, v))
    }

    /// Smallest range covering every key.
    pub fn bounds(&self) -> Option<PointRange> {
        bounding_range(self.keys())
    }

    /// Copy the entries into a dense matrix whose origin is the top-left key.
    /// Gaps are filled with default values.
    pub fn to_matrix(&self) -> Matrix<T>
    where
        T: Clone + Default,
    {
        let Some(range) = self.bounds() else {
            return Matrix::new();
        };
        let rows = (range.end.row - range.start.row + 1) as usize;
        let columns = (range.end.column - range.start.column + 1) as usize;
        let mut grid = vec![vec![T::default(); columns]; rows];
        for (point, value) in self.iter() {
            let row = (point.row - range.start.row) as usize;
            let column = (point.column - range.start.column) as usize;
            grid[row][column] = value.clone();
        }
        Matrix::from_rows(grid)
    }
}

impl<T> FromIterator<(Point, T)> for PointMap<T> {
    fn from_iter<I: IntoIterator<Item = (Point, T)>>(iter: I) -> Self {
        PointMap {
            entries: iter.into_iter().collect(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PointSet {
    points: BTreeSet<Point>,
}

impl PointSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_range(range: &PointRange) -> Self {
        range.iter().collect()
    }

    pub fn add(&mut self, point: Point) -> bool {
        self.points.insert(point)
    }

    pub fn remove(&mut self, point: Point) -> bool {
        self.points.remove(&point)
    }

    pub fn has(&self, point: Point) -> bool {
        self.points.contains(&point)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().copied()
    }

    pub fn min(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn max(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Smallest range covering every point.
    pub fn bounds(&self) -> Option<PointRange> {
        bounding_range(self.iter())
    }

    /// Points whose row is in the set, used to collect touched rows.
    pub fn rows(&self) -> BTreeSet<i64> {
        self.points.iter().map(|p| p.row).collect()
    }
}

impl FromIterator<Point> for PointSet {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        PointSet {
            points: iter.into_iter().collect(),
        }
    }
}

fn bounding_range(points: impl Iterator<Item = Point>) -> Option<PointRange> {
    let mut bounds: Option<(Point, Point)> = None;
    for p in points {
        bounds = Some(match bounds {
            None => (p, p),
            Some((lo, hi)) => (
                Point::new(lo.row.min(p.row), lo.column.min(p.column)),
                Point::new(hi.row.max(p.row), hi.column.max(p.column)),
            ),
        });
    }
    bounds.map(|(lo, hi)| PointRange::new(lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_map_basics() {
        let mut map = PointMap::new();
        assert!(map.is_empty());
        map.set(Point::new(2, 3), "x");
        map.set(Point::new(1, 1), "y");
        assert!(map.has(Point::new(2, 3)));
        assert_eq!(map.get(Point::new(1, 1)), Some(&"y"));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec![Point::new(1, 1), Point::new(2, 3)]);
        assert_eq!(map.unset(Point::new(1, 1)), Some("y"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_point_map_to_matrix_normalizes_origin() {
        let map: PointMap<String> = [
            (Point::new(3, 4), "a".to_string()),
            (Point::new(4, 5), "b".to_string()),
        ]
        .into_iter()
        .collect();
        let m = map.to_matrix();
        assert_eq!(m.to_text(), "a\t\n\tb");
    }

    #[test]
    fn test_point_set_bounds() {
        let set: PointSet = [Point::new(5, 1), Point::new(2, 7), Point::new(3, 3)]
            .into_iter()
            .collect();
        let range = set.bounds().unwrap();
        assert_eq!(range.start, Point::new(2, 1));
        assert_eq!(range.end, Point::new(5, 7));
        assert_eq!(set.min(), Some(Point::new(2, 7)));
        assert_eq!(set.max(), Some(Point::new(5, 1)));
    }

    #[test]
    fn test_point_set_from_range() {
        let set = PointSet::from_range(&PointRange::new(Point::new(0, 0), Point::new(1, 1)));
        assert_eq!(set.len(), 4);
        assert!(set.has(Point::new(1, 0)));
        assert_eq!(set.rows().into_iter().collect::<Vec<_>>(), vec![0, 1]);
    }
}
