//! Occupancy grid scene representation
//!
//! Cells are stored row-major: cell (i, j) has index `j * width + i` and
//! covers `[i * res, (i + 1) * res) x [j * res, (j + 1) * res)` in the grid
//! frame. The grid frame is placed in the world by `origin`.

use nalgebra::Point2;
use rand::Rng;

use crate::common::{PlannerError, PlannerResult, Point2D, Pose2D};

#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    resolution: f64,
    origin: Pose2D,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    pub fn new(
        width: usize,
        height: usize,
        resolution: f64,
        origin: Pose2D,
        cells: Vec<bool>,
    ) -> PlannerResult<Self> {
        let grid = Self { width, height, resolution, origin, cells };
        grid.validate()?;
        Ok(grid)
    }

    /// Grid with every cell free
    pub fn empty(width: usize, height: usize, resolution: f64, origin: Pose2D) -> PlannerResult<Self> {
        Self::new(width, height, resolution, origin, vec![false; width * height])
    }

    /// Build from ROS-style occupancy values: 0 is free, anything else
    /// (including -1 for unknown) is treated as occupied.
    pub fn from_occupancy_values(
        width: usize,
        height: usize,
        resolution: f64,
        origin: Pose2D,
        values: &[i8],
    ) -> PlannerResult<Self> {
        let cells = values.iter().map(|&v| v != 0).collect();
        Self::new(width, height, resolution, origin, cells)
    }

    /// Build from text rows, '#' occupied and anything else free.
    ///
    /// Rows are listed top to bottom as drawn, so the first row is `j = height - 1`.
    pub fn from_rows(rows: &[&str], resolution: f64, origin: Pose2D) -> PlannerResult<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if rows.iter().any(|r| r.chars().count() != width) {
            return Err(PlannerError::InvalidGrid("rows have different lengths".to_string()));
        }
        let mut cells = vec![false; width * height];
        for (row_from_top, row) in rows.iter().enumerate() {
            let j = height - 1 - row_from_top;
            for (i, c) in row.chars().enumerate() {
                cells[j * width + i] = c == '#';
            }
        }
        Self::new(width, height, resolution, origin, cells)
    }

    /// Random clutter with each cell occupied with probability `density`
    pub fn random_clutter<R: Rng>(
        width: usize,
        height: usize,
        resolution: f64,
        origin: Pose2D,
        density: f64,
        rng: &mut R,
    ) -> PlannerResult<Self> {
        if !(0.0..=1.0).contains(&density) {
            return Err(PlannerError::InvalidParameter(format!(
                "clutter density must be in [0, 1], got {}",
                density
            )));
        }
        let cells = (0..width * height).map(|_| rng.gen_bool(density)).collect();
        Self::new(width, height, resolution, origin, cells)
    }

    pub fn validate(&self) -> PlannerResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PlannerError::InvalidGrid(format!(
                "dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(PlannerError::InvalidGrid(format!(
                "resolution must be positive, got {}",
                self.resolution
            )));
        }
        if self.cells.len() != self.width * self.height {
            return Err(PlannerError::InvalidGrid(format!(
                "expected {} cells, got {}",
                self.width * self.height,
                self.cells.len()
            )));
        }
        if !(self.origin.x.is_finite() && self.origin.y.is_finite() && self.origin.yaw.is_finite()) {
            return Err(PlannerError::InvalidGrid("origin must be finite".to_string()));
        }
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn origin(&self) -> Pose2D {
        self.origin
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn index(&self, i: usize, j: usize) -> usize {
        j * self.width + i
    }

    pub fn is_occupied(&self, i: usize, j: usize) -> bool {
        self.cells[self.index(i, j)]
    }

    pub fn set_occupied(&mut self, i: usize, j: usize, occupied: bool) {
        let idx = self.index(i, j);
        self.cells[idx] = occupied;
    }

    /// Cell containing a world point, or None outside the grid
    pub fn world_to_cell(&self, point: &Point2<f64>) -> Option<(usize, usize)> {
        let local = self.origin.to_isometry().inverse_transform_point(point);
        let fi = (local.x / self.resolution).floor();
        let fj = (local.y / self.resolution).floor();
        if fi < 0.0 || fj < 0.0 || fi >= self.width as f64 || fj >= self.height as f64 {
            return None;
        }
        Some((fi as usize, fj as usize))
    }

    /// World position of the centre of cell (i, j)
    pub fn cell_center(&self, i: usize, j: usize) -> Point2D {
        let local = Point2::new(
            (i as f64 + 0.5) * self.resolution,
            (j as f64 + 0.5) * self.resolution,
        );
        (self.origin.to_isometry() * local).into()
    }

    pub fn occupied_cell_centers(&self) -> Vec<Point2D> {
        (0..self.height)
            .flat_map(|j| (0..self.width).map(move |i| (i, j)))
            .filter(|&(i, j)| self.is_occupied(i, j))
            .map(|(i, j)| self.cell_center(i, j))
            .collect()
    }
}
