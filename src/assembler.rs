use serde::Serialize;

use crate::cluster::{ClusterResult, KmeansConfig, check_cluster_count, cluster_pixels};
use crate::sampler::{DEFAULT_MAX_DIMENSION, sample_bytes};
use crate::{ColorTable, ExtractError, Rgb8};

/// Number of colors callers get when they do not ask for a specific count.
pub const DEFAULT_NUM_COLORS: usize = 5;

/// Clustering seed used unless the caller supplies one.
pub const DEFAULT_SEED: u64 = 42;

/// One dominant color of an image.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColorEntry {
    pub rgb: Rgb8,
    /// `#rrggbb`, lowercase.
    pub hex: String,
    pub name: String,
    /// Fraction of sampled pixels belonging to this color.
    pub weight: f32,
}

impl ColorEntry {
    pub fn from_cluster(cluster: &ClusterResult, table: &ColorTable) -> Self {
        let rgb = cluster.rgb();
        Self {
            rgb,
            hex: to_hex(rgb),
            name: table.nearest(rgb).display_name(),
            weight: cluster.weight(),
        }
    }
}

/// Everything besides the image and color count that shapes the result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaletteOptions {
    /// Longest side images are reduced to before sampling; `None` samples
    /// every pixel.
    pub max_dimension: Option<u32>,
    pub seed: u64,
    pub kmeans: KmeansConfig,
}

impl Default for PaletteOptions {
    fn default() -> Self {
        Self {
            max_dimension: Some(DEFAULT_MAX_DIMENSION),
            seed: DEFAULT_SEED,
            kmeans: KmeansConfig::default(),
        }
    }
}

/// Extract the `num_colors` dominant colors of an encoded image, most
/// prevalent first, named against the CSS3 table.
///
/// `num_colors` must be within `1..=10`; it is never clamped.
pub fn extract_palette(input: &[u8], num_colors: usize) -> Result<Vec<ColorEntry>, ExtractError> {
    extract_palette_with(input, num_colors, &PaletteOptions::default(), ColorTable::css3())
}

/// [`extract_palette`] with explicit options and naming table.
pub fn extract_palette_with(
    input: &[u8],
    num_colors: usize,
    options: &PaletteOptions,
    table: &ColorTable,
) -> Result<Vec<ColorEntry>, ExtractError> {
    check_cluster_count(num_colors)?;

    let samples = sample_bytes(input, options.max_dimension)?;
    tracing::debug!(samples = samples.len(), num_colors, seed = options.seed, "clustering samples");

    let clusters = cluster_pixels(&samples, num_colors, options.seed, &options.kmeans)?;
    Ok(assemble(clusters, table))
}

/// Rank clusters by pixel count (ties by RGB, ascending) and name them.
pub fn assemble(mut clusters: Vec<ClusterResult>, table: &ColorTable) -> Vec<ColorEntry> {
    clusters.sort_by(|a, b| b.count().cmp(&a.count()).then_with(|| a.rgb().cmp(&b.rgb())));
    clusters
        .iter()
        .map(|cluster| ColorEntry::from_cluster(cluster, table))
        .collect()
}

pub fn to_hex([r, g, b]: Rgb8) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}
