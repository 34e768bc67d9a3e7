/// A closed range of f64 values.
///
/// Bounds accepted ray distances and the extent of planar faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `[center - half_extent, center + half_extent]`
    pub fn centered(center: f64, half_extent: f64) -> Self {
        Self::new(center - half_extent, center + half_extent)
    }

    /// Inclusive on both ends. NaN is never contained.
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }
}
