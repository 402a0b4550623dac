use std::collections::HashMap;

use kmeans_colors::{Kmeans, get_kmeans};
use palette::Srgb;

use crate::{ExtractError, Rgb8};

/// Smallest number of clusters a caller may request.
pub const MIN_CLUSTERS: usize = 1;
/// Largest number of clusters a caller may request.
pub const MAX_CLUSTERS: usize = 10;

/// Tuning knobs for the k-means runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KmeansConfig {
    /// Iteration cap for a single run.
    pub max_iter: usize,
    /// Convergence threshold on centroid movement, in 0..1 sRGB units.
    pub converge: f32,
    /// Number of independently seeded runs; the one with the lowest inertia wins.
    pub runs: usize,
}

impl Default for KmeansConfig {
    fn default() -> Self {
        Self {
            max_iter: 20,
            converge: 0.0025,
            runs: 10,
        }
    }
}

/// One cluster of pixel samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClusterResult {
    centroid: [f32; 3],
    count: usize,
    weight: f32,
}

impl ClusterResult {
    fn new(centroid: [f32; 3], count: usize, total: usize) -> Self {
        Self {
            centroid,
            count,
            weight: count as f32 / total as f32,
        }
    }

    /// Mean color of the cluster, channels in 0..=255 before rounding.
    pub fn centroid(&self) -> [f32; 3] {
        self.centroid
    }

    /// Number of samples assigned to the cluster.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Fraction of all samples assigned to the cluster.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Centroid rounded half away from zero and clamped to a valid channel.
    pub fn rgb(&self) -> Rgb8 {
        self.centroid.map(|c| c.round().clamp(0.0, 255.0) as u8)
    }
}

pub(crate) fn check_cluster_count(k: usize) -> Result<(), ExtractError> {
    if (MIN_CLUSTERS..=MAX_CLUSTERS).contains(&k) {
        Ok(())
    } else {
        Err(ExtractError::InvalidParameter {
            name: "num_colors",
            value: k,
            min: MIN_CLUSTERS,
            max: MAX_CLUSTERS,
        })
    }
}

/// Group `samples` into exactly `k` clusters.
///
/// When the samples hold no more than `k` distinct colors every color becomes
/// its own exact cluster and the remaining slots are filled with zero-weight
/// copies of the heaviest one. Otherwise k-means (squared Euclidean distance
/// in RGB) is run `config.runs` times with seeds `seed, seed + 1, ...` and the
/// run with the lowest inertia is kept.
pub fn cluster_pixels(
    samples: &[Rgb8],
    k: usize,
    seed: u64,
    config: &KmeansConfig,
) -> Result<Vec<ClusterResult>, ExtractError> {
    check_cluster_count(k)?;
    if samples.is_empty() {
        return Err(ExtractError::InsufficientData("no pixels were sampled".to_string()));
    }

    let mut histogram: HashMap<Rgb8, usize> = HashMap::new();
    for &pixel in samples {
        *histogram.entry(pixel).or_insert(0) += 1;
    }

    if histogram.len() <= k {
        tracing::debug!(distinct = histogram.len(), k, "few distinct colors, skipping k-means");
        return Ok(exact_clusters(histogram, k, samples.len()));
    }

    Ok(kmeans_clusters(samples, k, seed, config))
}

fn exact_clusters(histogram: HashMap<Rgb8, usize>, k: usize, total: usize) -> Vec<ClusterResult> {
    let mut clusters: Vec<ClusterResult> = histogram
        .into_iter()
        .map(|(rgb, count)| ClusterResult::new(rgb.map(f32::from), count, total))
        .collect();
    clusters.sort_unstable_by(|a, b| b.count.cmp(&a.count).then(a.rgb().cmp(&b.rgb())));

    if let Some(filler) = degenerate_filler(&clusters) {
        clusters.resize(k, filler);
    }
    clusters
}

/// Zero-weight copy of the dominant cluster (most samples, ties by lowest
/// RGB), used for every slot that ends up with nothing assigned.
fn degenerate_filler(clusters: &[ClusterResult]) -> Option<ClusterResult> {
    let dominant = clusters
        .iter()
        .filter(|c| c.count > 0)
        .min_by(|a, b| b.count.cmp(&a.count).then(a.rgb().cmp(&b.rgb())))?;
    Some(ClusterResult {
        count: 0,
        weight: 0.0,
        ..*dominant
    })
}

#[derive(Debug)]
struct Run {
    seed: u64,
    inertia: f64,
    clusters: Vec<ClusterResult>,
}

fn kmeans_clusters(
    samples: &[Rgb8],
    k: usize,
    seed: u64,
    config: &KmeansConfig,
) -> Vec<ClusterResult> {
    let buf: Vec<Srgb> = samples
        .iter()
        .map(|&[r, g, b]| Srgb::new(r, g, b).into_format())
        .collect();

    let runs = (0..config.runs.max(1)).map(|i| {
        let run_seed = seed.wrapping_add(i as u64);
        let kmeans = get_kmeans(k, config.max_iter, config.converge, false, &buf, run_seed);
        let scored = summarize(samples, &kmeans, k, run_seed);
        tracing::trace!(seed = run_seed, inertia = scored.inertia, "k-means run finished");
        scored
    });

    match select_best(runs) {
        Some(best) => {
            tracing::debug!(k, seed = best.seed, inertia = best.inertia, "selected k-means run");
            best.clusters
        }
        None => Vec::new(),
    }
}

/// Lowest inertia wins; on equal inertia the earlier run is kept.
fn select_best(runs: impl IntoIterator<Item = Run>) -> Option<Run> {
    runs.into_iter().fold(None, |best, candidate| match best {
        Some(best) if best.inertia <= candidate.inertia => Some(best),
        _ => Some(candidate),
    })
}

/// Recompute exact centroids from the assignments and score the run.
fn summarize(samples: &[Rgb8], kmeans: &Kmeans<Srgb>, k: usize, seed: u64) -> Run {
    let mut sums = vec![[0u64; 3]; k];
    let mut counts = vec![0usize; k];
    for (pixel, &idx) in samples.iter().zip(&kmeans.indices) {
        let idx = idx as usize;
        counts[idx] += 1;
        for (sum, &channel) in sums[idx].iter_mut().zip(pixel) {
            *sum += u64::from(channel);
        }
    }

    let total = samples.len();
    let mut clusters: Vec<ClusterResult> = sums
        .iter()
        .zip(&counts)
        .map(|(sum, &count)| {
            let centroid = match count {
                0 => [0.0; 3],
                n => sum.map(|s| (s as f64 / n as f64) as f32),
            };
            ClusterResult::new(centroid, count, total)
        })
        .collect();

    let inertia = samples
        .iter()
        .zip(&kmeans.indices)
        .map(|(pixel, &idx)| {
            let c = clusters[idx as usize].centroid;
            pixel
                .iter()
                .zip(c)
                .map(|(&p, c)| {
                    let d = f64::from(p) - f64::from(c);
                    d * d
                })
                .sum::<f64>()
        })
        .sum();

    // The library reseeds empty clusters at random colors; repeat the
    // dominant cluster instead, as the exact path does.
    if let Some(filler) = degenerate_filler(&clusters) {
        for cluster in clusters.iter_mut().filter(|c| c.count == 0) {
            *cluster = filler;
        }
    }

    Run {
        seed,
        inertia,
        clusters,
    }
}

/// Seed drawn from the operating system, for runs that should not be
/// reproducible.
pub fn entropy_seed() -> Result<u64, getrandom::Error> {
    let mut bytes = [0u8; 8];
    getrandom::fill(&mut bytes)?;
    Ok(u64::from_le_bytes(bytes))
}
