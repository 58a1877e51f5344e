use crate::{BoundingRegion, Bounds, Coordinate};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitOutcome {
    Fitted(Bounds),
    /// The region was empty, so the viewport kept its previous extent.
    Unchanged,
}

/// The visible extent of a map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    extent: Bounds,
    padding: f64,
}

impl Viewport {
    /// Whole-world extent.
    pub const WORLD: Bounds = Bounds {
        min_lat: -90.0,
        max_lat: 90.0,
        min_lon: -180.0,
        max_lon: 180.0,
    };

    pub fn new(extent: Bounds) -> Self {
        Self {
            extent,
            padding: 0.0,
        }
    }

    /// Padding added around fitted regions, as a ratio of their extent.
    pub fn with_padding(mut self, ratio: f64) -> Self {
        self.padding = ratio.max(0.0);
        self
    }

    pub fn extent(&self) -> Bounds {
        self.extent
    }

    pub fn center(&self) -> Coordinate {
        self.extent.center()
    }

    pub fn fit(&mut self, region: &BoundingRegion) -> FitOutcome {
        match region.bounds() {
            Some(bounds) => {
                self.extent = bounds.pad(self.padding);
                FitOutcome::Fitted(self.extent)
            }
            None => FitOutcome::Unchanged,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Self::WORLD)
    }
}
