//! Region selection for repainting.
//!
//! This module provides the selection pipeline:
//! - **Seeds**: tap locations with per-seed color tolerance
//! - **Flood fill**: multi-seed threshold region growth, unioned
//! - **Exclusion**: shared masks of pixels that are never painted
//! - **Contour rect**: bounding rectangle and coverage of a mask

pub mod contour;
pub mod exclusion;
pub mod flood_fill;
pub mod seed;

pub use contour::{find_contour_rect, find_mask_rect, mask_coverage, Rect};
pub use exclusion::{exclusion_mask_from_image, ExclusionMask};
pub use flood_fill::{compute_mask, compute_mask_cancellable, Connectivity, FillConfig};
pub use seed::{SeedCollection, SeedPoint};
