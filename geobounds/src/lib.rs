//! Geometry model, GeoJSON reading and writing, and the bounds traversal
//! used to fit a map view to loaded features.

pub mod geometry;
pub use geometry::*;

pub mod region;
pub use region::*;

pub mod accumulate;
pub use accumulate::*;

pub mod feature;
pub use feature::*;

pub mod viewport;
pub use viewport::*;

pub mod inspect;
pub use inspect::*;

pub mod source;
pub use source::*;

pub mod session;
pub use session::*;
