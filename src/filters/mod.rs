//! Pixel-level helpers shared by selection and compositing.
//!
//! ## Supported Formats
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | Mask8 | (H, W, 1) | u8 | Single alpha/mask channel, 0-255 |
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//! | RGBA8 | (H, W, 4) | u8 | RGB + alpha, 0-255 |
//!
//! Channel count is inferred from input array dimensions. Hue analysis
//! needs color and rejects single-channel buffers; alpha helpers accept
//! RGBA and single-channel masks.
//!
//! ## Filter Categories
//!
//! - **Alpha**: invert, foreground masks, "over" blending
//! - **Hue**: HSV conversion, hue histograms, dominant hue detection

pub mod alpha;
pub mod hue;

pub use alpha::{foreground_mask, invert_alpha};
pub use hue::{find_hues, find_hues_with, HueOptions};
