//! Scratch-card reveal engine.
//!
//! A square canvas of side `diameter` carries an opaque layer inside its
//! inscribed circle. Pointer strokes erase that layer; progress is the exact
//! share of in-circle cells already erased. Once progress reaches the reveal
//! threshold the session becomes [`RevealState::Revealed`] for good.

pub mod progress;

pub use progress::{progress_message, EnergyPhase};

/// Canvas coordinate, in cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Geometry and threshold of a scratch session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScratchConfig {
    /// Side of the square canvas.
    pub diameter: u32,
    /// Shrinks the mask radius to keep the rim clear of edge artifacts.
    pub inset: f64,
    /// Width of the round-capped line drawn between samples.
    pub line_width: f64,
    /// Radius of the disc stamped at each new sample.
    pub cap_radius: f64,
    /// Percentage of erased area that reveals the card.
    pub reveal_threshold: f64,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            diameter: 280,
            inset: 2.0,
            line_width: 50.0,
            cap_radius: 25.0,
            reveal_threshold: 50.0,
        }
    }
}

impl ScratchConfig {
    pub fn with_threshold(mut self, reveal_threshold: f64) -> Self {
        self.reveal_threshold = reveal_threshold;
        self
    }

    pub fn with_brush(mut self, line_width: f64, cap_radius: f64) -> Self {
        self.line_width = line_width;
        self.cap_radius = cap_radius;
        self
    }

    fn mask_radius(&self) -> f64 {
        (f64::from(self.diameter) / 2.0 - self.inset).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Active,
    Revealed,
}

/// Result of one stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeOutcome {
    pub progress: f64,
    /// True only for the stroke that crossed the reveal threshold.
    pub revealed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Outside,
    Covered,
    Erased,
}

#[derive(Debug, Clone)]
pub struct ScratchSession {
    config: ScratchConfig,
    cells: Vec<Cell>,
    total: u32,
    erased: u32,
    state: RevealState,
    pen: Option<Point>,
}

impl ScratchSession {
    pub fn new(config: ScratchConfig) -> Self {
        let side = config.diameter as usize;
        let centre = f64::from(config.diameter) / 2.0;
        let radius_sq = config.mask_radius().powi(2);

        let mut cells = Vec::with_capacity(side * side);
        let mut total = 0;
        for y in 0..side {
            for x in 0..side {
                let dx = x as f64 + 0.5 - centre;
                let dy = y as f64 + 0.5 - centre;
                if dx * dx + dy * dy <= radius_sq {
                    cells.push(Cell::Covered);
                    total += 1;
                } else {
                    cells.push(Cell::Outside);
                }
            }
        }

        Self {
            config,
            cells,
            total,
            erased: 0,
            state: RevealState::Active,
            pen: None,
        }
    }

    pub fn config(&self) -> &ScratchConfig {
        &self.config
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn is_revealed(&self) -> bool {
        self.state == RevealState::Revealed
    }

    /// Cells inside the circular mask.
    pub fn total_cells(&self) -> u32 {
        self.total
    }

    pub fn erased_cells(&self) -> u32 {
        self.erased
    }

    pub fn progress(&self) -> f64 {
        percentage(self.erased, self.total)
    }

    /// Erases the capsule between `from` and `to` plus the cap disc at `to`.
    /// Cells outside the circle are never touched. No-op once revealed.
    pub fn apply_stroke(&mut self, from: Point, to: Point) -> StrokeOutcome {
        if self.is_revealed() {
            return StrokeOutcome {
                progress: self.progress(),
                revealed: false,
            };
        }

        let half_width = self.config.line_width / 2.0;
        let cap = self.config.cap_radius;
        let half_width_sq = half_width * half_width;
        let cap_sq = cap * cap;
        let reach = half_width.max(cap);

        let side = self.config.diameter as i64;
        let x0 = ((from.x.min(to.x) - reach).floor() as i64).max(0);
        let x1 = ((from.x.max(to.x) + reach).ceil() as i64).min(side - 1);
        let y0 = ((from.y.min(to.y) - reach).floor() as i64).max(0);
        let y1 = ((from.y.max(to.y) + reach).ceil() as i64).min(side - 1);

        if x0 <= x1 && y0 <= y1 {
            for y in y0..=y1 {
                for x in x0..=x1 {
                    let idx = (y * side + x) as usize;
                    if self.cells[idx] != Cell::Covered {
                        continue;
                    }
                    let c = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                    if segment_distance_sq(c, from, to) <= half_width_sq
                        || distance_sq(c, to) <= cap_sq
                    {
                        self.cells[idx] = Cell::Erased;
                        self.erased += 1;
                    }
                }
            }
        }

        let progress = self.progress();
        let revealed = meets_threshold(progress, self.config.reveal_threshold);
        if revealed {
            self.state = RevealState::Revealed;
        }
        StrokeOutcome { progress, revealed }
    }

    /// Pointer (or touch) went down at `at`.
    pub fn press(&mut self, at: Point) {
        self.pen = Some(at);
    }

    /// Pointer moved while pressed. Returns `None` when not pressed.
    pub fn drag(&mut self, to: Point) -> Option<StrokeOutcome> {
        let from = self.pen?;
        self.pen = Some(to);
        Some(self.apply_stroke(from, to))
    }

    /// Pointer released or left the surface; erasure so far is kept.
    pub fn release(&mut self) {
        self.pen = None;
    }

    #[cfg(test)]
    fn recount_progress(&self) -> f64 {
        let erased = self.cells.iter().filter(|c| **c == Cell::Erased).count() as u32;
        let total = self.cells.iter().filter(|c| **c != Cell::Outside).count() as u32;
        percentage(erased, total)
    }
}

fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    f64::from(part) / f64::from(whole) * 100.0
}

pub(crate) fn meets_threshold(progress: f64, threshold: f64) -> bool {
    progress >= threshold
}

fn distance_sq(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

fn segment_distance_sq(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return distance_sq(p, a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    distance_sq(p, Point::new(a.x + t * dx, a.y + t * dy))
}
