use crate::simulation::grid::{wrap, Coord, ToroidalGrid};

/// Moore neighborhood offsets, starting east and turning counter-clockwise
/// in screen space (y grows downward). The order fixes the order in which
/// the next queue is assembled.
pub const MOORE_OFFSETS: [(i64, i64); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// The 8 wrapped neighbor coordinates of `(x, y)` on a `width` x `height` torus.
pub fn neighbors(x: i64, y: i64, width: usize, height: usize) -> [Coord; 8] {
    MOORE_OFFSETS.map(|(dx, dy)| {
        Coord::new(
            wrap(x.wrapping_add(dx), width),
            wrap(y.wrapping_add(dy), height),
        )
    })
}

/// Neighbors of an already-normalized coordinate.
pub fn neighbors_of(coord: Coord, width: usize, height: usize) -> [Coord; 8] {
    neighbors(coord.x() as i64, coord.y() as i64, width, height)
}

/// Live cells among the 8 neighbors of `(x, y)`, in `0..=8`.
pub fn live_neighbor_count(x: i64, y: i64, grid: &ToroidalGrid) -> u8 {
    neighbors(x, y, grid.width(), grid.height())
        .into_iter()
        .filter(|&coord| grid.get_at(coord))
        .count() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_offset_order() {
        let result = neighbors(2, 2, 5, 5);
        let expected = [
            (3, 2),
            (3, 3),
            (2, 3),
            (1, 3),
            (1, 2),
            (1, 1),
            (2, 1),
            (3, 1),
        ]
        .map(|(x, y)| Coord::new(x, y));
        assert_eq!(result, expected);
    }

    #[test]
    fn test_corner_wraps() {
        let result: HashSet<_> = neighbors(0, 0, 4, 3).into_iter().collect();
        let expected: HashSet<_> = [
            (1, 0),
            (1, 1),
            (0, 1),
            (3, 1),
            (3, 0),
            (3, 2),
            (0, 2),
            (1, 2),
        ]
        .into_iter()
        .map(|(x, y)| Coord::new(x, y))
        .collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_eight_distinct_neighbors() {
        for (width, height) in [(3, 3), (3, 7), (8, 5), (50, 50)] {
            for x in -3i64..(width as i64 + 3) {
                for y in -3i64..(height as i64 + 3) {
                    let set: HashSet<_> = neighbors(x, y, width, height).into_iter().collect();
                    assert_eq!(set.len(), 8, "({}, {}) on {}x{}", x, y, width, height);
                    assert!(!set.contains(&Coord::new(wrap(x, width), wrap(y, height))));
                }
            }
        }
    }

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        let result = neighbors(i64::MAX, i64::MIN, 5, 5);
        assert!(result.iter().all(|c| c.x() < 5 && c.y() < 5));
    }

    #[test]
    fn test_live_neighbor_count() {
        let mut grid = ToroidalGrid::new(5, 5).unwrap();
        assert_eq!(live_neighbor_count(2, 2, &grid), 0);

        grid.set(1, 2, true);
        grid.set(2, 2, true);
        grid.set(3, 2, true);
        assert_eq!(live_neighbor_count(2, 2, &grid), 2);
        assert_eq!(live_neighbor_count(2, 1, &grid), 3);
        assert_eq!(live_neighbor_count(0, 2, &grid), 1);
        assert_eq!(live_neighbor_count(4, 2, &grid), 1);

        // Diagonal across both edges
        grid.set(4, 4, true);
        assert_eq!(live_neighbor_count(0, 0, &grid), 1);
    }

    #[test]
    fn test_full_neighborhood() {
        let mut grid = ToroidalGrid::new(3, 3).unwrap();
        for coord in grid.coords().collect::<Vec<_>>() {
            grid.set_at(coord, true);
        }
        assert_eq!(live_neighbor_count(1, 1, &grid), 8);
        assert_eq!(live_neighbor_count(0, 0, &grid), 8);
    }
}
