use crate::error::ConfigError;

/// Wrap a coordinate onto `[0, dim)`. Always non-negative, for any input.
#[inline]
pub fn wrap(value: i64, dim: usize) -> usize {
    value.rem_euclid(dim as i64) as usize
}

/// Validate grid dimensions and return the cell count.
///
/// Both dimensions must be positive and representable as signed coordinates,
/// and the cell count must fit in memory addressing.
pub fn check_dimensions(width: usize, height: usize) -> Result<usize, ConfigError> {
    if width == 0 || height == 0 {
        return Err(ConfigError::ZeroDimension { width, height });
    }
    let too_large = ConfigError::GridTooLarge { width, height };
    if i64::try_from(width).is_err() || i64::try_from(height).is_err() {
        return Err(too_large);
    }
    width.checked_mul(height).ok_or(too_large)
}

/// A normalized cell position on a [`ToroidalGrid`].
///
/// Only obtainable from [`ToroidalGrid::normalize`], the grid iterators and
/// the neighbor functions, so two coordinates naming the same cell always
/// compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    x: usize,
    y: usize,
}

impl Coord {
    /// Callers must pass values already wrapped onto the grid.
    pub(crate) const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> usize {
        self.x
    }

    pub fn y(self) -> usize {
        self.y
    }
}

/// Fixed-size boolean cell grid whose edges wrap around (a torus).
///
/// Every read and write normalizes its coordinates first, so callers may pass
/// any integer. Normalization is idempotent, which keeps already-wrapped
/// coordinates stable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToroidalGrid {
    width: usize,
    height: usize,
    /// Row-major, `cells[y * width + x]`
    cells: Vec<bool>,
}

impl ToroidalGrid {
    /// Create an all-dead grid.
    pub fn new(width: usize, height: usize) -> Result<Self, ConfigError> {
        let cell_count = check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![false; cell_count],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Map arbitrary integer coordinates onto the grid.
    #[inline]
    pub fn normalize(&self, x: i64, y: i64) -> Coord {
        Coord::new(wrap(x, self.width), wrap(y, self.height))
    }

    /// Row-major offset of a cell, `y * width + x`.
    #[inline]
    pub fn index_of(&self, coord: Coord) -> usize {
        (coord.y % self.height) * self.width + (coord.x % self.width)
    }

    pub fn get(&self, x: i64, y: i64) -> bool {
        self.get_at(self.normalize(x, y))
    }

    pub fn set(&mut self, x: i64, y: i64, state: bool) {
        let coord = self.normalize(x, y);
        self.set_at(coord, state);
    }

    /// Flip a cell and return its new state.
    pub fn toggle(&mut self, x: i64, y: i64) -> bool {
        let coord = self.normalize(x, y);
        let state = !self.get_at(coord);
        self.set_at(coord, state);
        state
    }

    #[inline]
    pub fn get_at(&self, coord: Coord) -> bool {
        self.cells[self.index_of(coord)]
    }

    #[inline]
    pub fn set_at(&mut self, coord: Coord, state: bool) {
        let index = self.index_of(coord);
        self.cells[index] = state;
    }

    /// Kill every cell.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Every coordinate of the grid in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Coord::new(x, y)))
    }

    /// Coordinates of live cells in row-major order.
    pub fn alive(&self) -> impl Iterator<Item = Coord> + '_ {
        self.coords().filter(move |&coord| self.get_at(coord))
    }
}
