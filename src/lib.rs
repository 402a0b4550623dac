//! Dominant color extraction.
//!
//! An encoded image is decoded and sampled, its pixels are clustered with
//! k-means in RGB space, and every cluster centroid is labelled with the
//! nearest entry of a named-color table (CSS3 by default):
//!
//! ```no_run
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! for color in dominant_colors::extract_palette(&bytes, 5).unwrap() {
//!     println!("{} {} {:.1}%", color.hex, color.name, color.weight * 100.0);
//! }
//! ```

pub mod assembler;
pub mod cluster;
pub mod error;
pub mod namer;
pub mod response;
pub mod sampler;
pub mod wasm;

pub use assembler::{
    ColorEntry, DEFAULT_NUM_COLORS, DEFAULT_SEED, PaletteOptions, assemble, extract_palette,
    extract_palette_with, to_hex,
};
pub use cluster::{
    ClusterResult, KmeansConfig, MAX_CLUSTERS, MIN_CLUSTERS, cluster_pixels, entropy_seed,
};
pub use error::{ExtractError, ReferenceTableError};
pub use namer::{ColorTable, NamedColor};
pub use response::{ErrorDetail, ErrorResponse, PaletteResponse};
pub use sampler::{DEFAULT_MAX_DIMENSION, Rgb8, decode_image, sample_bytes, sample_image};
