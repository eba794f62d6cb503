//! Plotting for planner scenes and paths
//!
//! Thin wrapper over gnuplot used by the demo binary.

use std::f64::consts::TAU;

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use crate::common::{Point2D, Pose2D};
use crate::path_planning::lattice::{Footprint, State};
use crate::utils::OccupancyGrid;

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const GREEN: &str = "#00FF00";
    pub const BLUE: &str = "#0000FF";
    pub const CYAN: &str = "#00FFFF";
    pub const GRAY: &str = "#808080";

    // Semantic colors
    pub const OBSTACLE: &str = BLACK;
    pub const START: &str = GREEN;
    pub const GOAL: &str = BLUE;
    pub const PATH: &str = RED;
    pub const FOOTPRINT: &str = GRAY;
    pub const ROBOT: &str = CYAN;
}

const CIRCLE_SEGMENTS: usize = 24;

/// Style for path rendering
#[derive(Debug, Clone)]
pub struct PathStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: String,
}

impl PathStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            line_width: 2.0,
            caption: caption.to_string(),
        }
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::new(colors::PATH, "Path")
    }
}

/// Style for point rendering
#[derive(Debug, Clone)]
pub struct PointStyle {
    pub color: String,
    pub size: f64,
    pub symbol: char,
    pub caption: String,
}

impl PointStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            size: 1.0,
            symbol: 'O',
            caption: caption.to_string(),
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_symbol(mut self, symbol: char) -> Self {
        self.symbol = symbol;
        self
    }
}

pub struct Visualizer {
    figure: Figure,
    title: String,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
}

impl Visualizer {
    pub fn new() -> Self {
        Self {
            figure: Figure::new(),
            title: String::new(),
            x_range: None,
            y_range: None,
        }
    }

    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    pub fn set_x_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.x_range = Some((min, max));
        self
    }

    pub fn set_y_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.y_range = Some((min, max));
        self
    }

    /// Fit the axes to the grid extent (axis-aligned origins only)
    pub fn fit_grid(&mut self, grid: &OccupancyGrid) -> &mut Self {
        let origin = grid.origin();
        let w = grid.width() as f64 * grid.resolution();
        let h = grid.height() as f64 * grid.resolution();
        self.set_x_range(origin.x, origin.x + w);
        self.set_y_range(origin.y, origin.y + h)
    }

    /// Occupied cells as square markers at their centres
    pub fn plot_grid(&mut self, grid: &OccupancyGrid) -> &mut Self {
        let centres = grid.occupied_cell_centers();
        let x: Vec<f64> = centres.iter().map(|p| p.x).collect();
        let y: Vec<f64> = centres.iter().map(|p| p.y).collect();

        self.figure.axes2d().points(&x, &y, &[
            Caption("Obstacles"),
            Color(colors::OBSTACLE),
            PointSymbol('S'),
            PointSize(1.5),
        ]);
        self
    }

    pub fn plot_poses(&mut self, poses: &[Pose2D], style: &PathStyle) -> &mut Self {
        let x: Vec<f64> = poses.iter().map(|p| p.x).collect();
        let y: Vec<f64> = poses.iter().map(|p| p.y).collect();

        self.figure.axes2d().lines(&x, &y, &[
            Caption(&style.caption),
            Color(&style.color),
            LineWidth(style.line_width),
        ]);
        self
    }

    /// Outline of every footprint circle placed at `pose`
    pub fn plot_footprint(&mut self, footprint: &Footprint, pose: &Pose2D) -> &mut Self {
        let state = State::from_pose(pose);
        for (centre, radius) in footprint.placed_at(&state) {
            let (x, y): (Vec<f64>, Vec<f64>) = (0..=CIRCLE_SEGMENTS)
                .map(|k| {
                    let a = TAU * k as f64 / CIRCLE_SEGMENTS as f64;
                    (centre.x + radius * a.cos(), centre.y + radius * a.sin())
                })
                .unzip();
            self.figure.axes2d().lines(&x, &y, &[Color(colors::FOOTPRINT), LineWidth(1.0)]);
        }
        self
    }

    /// Pose marker with a heading tick
    pub fn plot_robot(&mut self, pose: &Pose2D, size: f64) -> &mut Self {
        let end_x = pose.x + size * 0.5 * pose.yaw.cos();
        let end_y = pose.y + size * 0.5 * pose.yaw.sin();

        let axes = self.figure.axes2d();
        axes.points(&[pose.x], &[pose.y], &[Color(colors::ROBOT), PointSymbol('O'), PointSize(size)]);
        axes.lines(&[pose.x, end_x], &[pose.y, end_y], &[Color(colors::ROBOT), LineWidth(2.0)]);
        self
    }

    pub fn plot_point(&mut self, point: Point2D, style: &PointStyle) -> &mut Self {
        self.figure.axes2d().points(&[point.x], &[point.y], &[
            Caption(&style.caption),
            Color(&style.color),
            PointSymbol(style.symbol),
            PointSize(style.size),
        ]);
        self
    }

    pub fn plot_start(&mut self, pose: &Pose2D) -> &mut Self {
        self.plot_point(pose.position(), &PointStyle::new(colors::START, "Start").with_size(2.0))
    }

    pub fn plot_goal(&mut self, pose: &Pose2D) -> &mut Self {
        self.plot_point(pose.position(), &PointStyle::new(colors::GOAL, "Goal").with_size(2.0))
    }

    pub fn show(&mut self) -> Result<(), String> {
        self.apply_settings();
        self.figure.show().map_err(|e| e.to_string()).map(|_| ())
    }

    pub fn save_png(&mut self, path: &str, width: u32, height: u32) -> Result<(), String> {
        self.apply_settings();
        self.figure.save_to_png(path, width, height).map_err(|e| e.to_string())
    }

    fn apply_settings(&mut self) {
        let axes = self.figure.axes2d();

        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_label("X [m]", &[]);
        axes.set_y_label("Y [m]", &[]);

        if let Some((min, max)) = self.x_range {
            axes.set_x_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some((min, max)) = self.y_range {
            axes.set_y_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        axes.set_aspect_ratio(AutoOption::Fix(1.0));
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}
