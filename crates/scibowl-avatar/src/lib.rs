//! Deterministic SVG avatars for SciBowl Arena.
//!
//! Every user gets a circular avatar derived only from their identity, so
//! no image is ever stored. The pipeline:
//!
//! 1. [`hash`] -- cyrb53 seed hash and the mulberry32 stream
//! 2. [`palette`] -- five fixed three-color palettes
//! 3. [`field`] -- value-noise scalar field normalized to `[0, 1]`
//! 4. [`contour`] -- marching-squares contour tracing
//! 5. [`render`] -- banding, SVG output, and `data:` URIs
//! 6. [`cache`] -- bounded memo of rendered documents

pub mod cache;
pub mod contour;
pub mod field;
pub mod hash;
pub mod palette;
pub mod render;

pub use cache::{AvatarCache, DEFAULT_CAPACITY};
pub use palette::{PALETTES, Palette};
pub use render::{
    AVATAR_VERSION, Avatar, Band, DEFAULT_SIZE, GLOBAL_SALT, MAX_SIZE, MIN_SIZE, Thresholds,
    clamp_size, data_url, generate_svg, normalize_identity, svg_data_url,
};
