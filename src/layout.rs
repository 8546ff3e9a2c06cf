use serde::{Deserialize, Serialize};

/// A point in viewport coordinates (pixels, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned box in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }
}

/// Geometry of the page chrome, as measured by the host on the current frame.
///
/// Never cache one of these across frames; the host re-measures after every
/// resize or scroll and hands a fresh value in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    pub viewport_height: f64,
    pub header_height: f64,
    /// Bounds of the search bar (input + button)
    pub search_bar: Rect,
    /// Top edge of the footer
    pub footer_top: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            viewport_height: 800.0,
            header_height: 80.0,
            search_bar: Rect::new(0.0, 80.0, 1024.0, 48.0),
            footer_top: 740.0,
        }
    }
}

impl LayoutMetrics {
    /// Vertical offset of the sticky search container
    pub fn sticky_top(&self) -> f64 {
        self.header_height.max(0.0)
    }

    /// Space between the search bar's bottom edge and the footer, minus `margin`
    pub fn available_results_height(&self, margin: f64) -> f64 {
        (self.footer_top - self.search_bar.bottom() - margin).max(0.0)
    }

    /// Height the results panel should animate to for content of `natural` height
    pub fn clamp_results_height(&self, natural: f64, margin: f64) -> f64 {
        natural.max(0.0).min(self.available_results_height(margin))
    }

    /// Region covering the search bar and a results panel of `panel_height`
    /// directly beneath it. Clicks outside it dismiss the panel.
    pub fn search_region(&self, panel_height: f64) -> Rect {
        Rect::new(
            self.search_bar.left,
            self.search_bar.top,
            self.search_bar.width,
            self.search_bar.height + panel_height.max(0.0),
        )
    }
}
