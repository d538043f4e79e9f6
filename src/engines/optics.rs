// optics.rs - OPTICS ordering and xi cluster extraction on a precomputed matrix

use rayon::prelude::*;

use super::traits::{DensityClusteringLibrary, DensityLabels};
use crate::core::matrix::DistanceMatrix;
use crate::core::parallel::thread_pool;
use crate::error::{ClusterError, ClusterResult};

/// Reachability ordering produced by the OPTICS walk
#[derive(Debug, Clone)]
pub struct OpticsGraph {
    /// Point indices in visiting order
    pub ordering: Vec<usize>,
    /// Reachability of each point, indexed by point
    pub reachability: Vec<f64>,
    /// Point that last lowered each point's reachability
    pub predecessor: Vec<Option<usize>>,
    pub core_distances: Vec<f64>,
}

/// OPTICS with unbounded eps and xi-steep cluster extraction
#[derive(Debug, Clone)]
pub struct NativeOptics {
    pub xi: f64,
    pub predecessor_correction: bool,
}

impl Default for NativeOptics {
    fn default() -> Self {
        Self {
            xi: 0.05,
            predecessor_correction: true,
        }
    }
}

/// Steep down area of the reachability plot
#[derive(Debug, Clone, Copy)]
struct SteepDownArea {
    start: usize,
    end: usize,
    mib: f64,
}

/// Distance to the `min_samples`-th nearest point, the point itself included
fn core_distance(row: &[f64], min_samples: usize) -> f64 {
    let mut sorted = row.to_vec();
    let k = min_samples.saturating_sub(1).min(sorted.len().saturating_sub(1));
    let (_, kth, _) = sorted.select_nth_unstable_by(k, |a, b| a.total_cmp(b));
    *kth
}

/// Walk the points in reachability order
pub fn optics_graph(distances: &DistanceMatrix, min_samples: usize, core_distances: Vec<f64>) -> OpticsGraph {
    let n = distances.len();
    let mut reachability = vec![f64::INFINITY; n];
    let mut predecessor = vec![None; n];
    let mut processed = vec![false; n];
    let mut ordering = Vec::with_capacity(n);
    debug_assert!(min_samples >= 1);

    for _ in 0..n {
        // First unprocessed point with the smallest reachability
        let point = match (0..n)
            .filter(|&i| !processed[i])
            .min_by(|&a, &b| reachability[a].total_cmp(&reachability[b]))
        {
            Some(p) => p,
            None => break,
        };
        processed[point] = true;
        ordering.push(point);

        let core = core_distances[point];
        if !core.is_finite() {
            continue;
        }
        let row = distances.row(point);
        for j in 0..n {
            if processed[j] {
                continue;
            }
            let reach = row[j].max(core);
            if reach < reachability[j] {
                reachability[j] = reach;
                predecessor[j] = Some(point);
            }
        }
    }

    OpticsGraph {
        ordering,
        reachability,
        predecessor,
        core_distances,
    }
}

/// Grow a steep area from `start`, tolerating up to `min_samples`
/// consecutive points that are neither steep nor reversing direction.
fn extend_region(steep: &[bool], reversing: &[bool], start: usize, min_samples: usize) -> usize {
    let mut non_reversing = 0;
    let mut end = start;
    for index in start..steep.len() {
        if steep[index] {
            non_reversing = 0;
            end = index;
        } else if !reversing[index] {
            non_reversing += 1;
            if non_reversing > min_samples {
                break;
            }
        } else {
            return end;
        }
    }
    end
}

fn update_filter_sdas(sdas: &mut Vec<SteepDownArea>, mib: f64, xi_complement: f64, plot: &[f64]) {
    if mib.is_infinite() {
        sdas.clear();
        return;
    }
    sdas.retain(|sda| mib <= plot[sda.start] * xi_complement);
    for sda in sdas.iter_mut() {
        sda.mib = sda.mib.max(mib);
    }
}

/// Shrink `end` until the cluster is anchored by a predecessor inside it
fn correct_predecessor(
    plot: &[f64],
    predecessors: &[Option<usize>],
    ordering: &[usize],
    start: usize,
    mut end: usize,
) -> Option<(usize, usize)> {
    while start < end {
        if plot[start] > plot[end] {
            return Some((start, end));
        }
        let p_end = predecessors[end];
        if ordering[start..end].iter().any(|&o| Some(o) == p_end) {
            return Some((start, end));
        }
        end -= 1;
    }
    None
}

impl NativeOptics {
    /// Clusters as inclusive `(start, end)` ranges over the ordering,
    /// smaller nested clusters before the clusters that contain them
    pub fn xi_clusters(&self, graph: &OpticsGraph, min_samples: usize, min_cluster_size: usize) -> Vec<(usize, usize)> {
        let n = graph.ordering.len();
        let mut plot: Vec<f64> = graph.ordering.iter().map(|&p| graph.reachability[p]).collect();
        plot.push(f64::INFINITY);
        let predecessors: Vec<Option<usize>> = graph.ordering.iter().map(|&p| graph.predecessor[p]).collect();

        let xi_complement = 1.0 - self.xi;
        // Ties between reachabilities give 0/0; NaN ratios are neither steep nor directional
        let ratio: Vec<f64> = (0..n).map(|i| plot[i] / plot[i + 1]).collect();
        let steep_upward: Vec<bool> = ratio.iter().map(|&r| r <= xi_complement).collect();
        let steep_downward: Vec<bool> = ratio.iter().map(|&r| r >= 1.0 / xi_complement).collect();
        let downward: Vec<bool> = ratio.iter().map(|&r| r > 1.0).collect();
        let upward: Vec<bool> = ratio.iter().map(|&r| r < 1.0).collect();

        let mut sdas: Vec<SteepDownArea> = Vec::new();
        let mut clusters = Vec::new();
        let mut index = 0usize;
        let mut mib = 0.0f64;

        for steep_index in (0..n).filter(|&i| steep_upward[i] || steep_downward[i]) {
            if steep_index < index {
                continue;
            }
            mib = plot[index..=steep_index].iter().copied().fold(mib, f64::max);

            if steep_downward[steep_index] {
                update_filter_sdas(&mut sdas, mib, xi_complement, &plot);
                let end = extend_region(&steep_downward, &upward, steep_index, min_samples);
                sdas.push(SteepDownArea {
                    start: steep_index,
                    end,
                    mib: 0.0,
                });
                index = end + 1;
                mib = plot[index];
                continue;
            }

            update_filter_sdas(&mut sdas, mib, xi_complement, &plot);
            let u_start = steep_index;
            let u_end = extend_region(&steep_upward, &downward, u_start, min_samples);
            index = u_end + 1;
            mib = plot[index];

            let mut found = Vec::new();
            for sda in &sdas {
                let mut c_start = sda.start;
                let mut c_end = u_end;

                if plot[c_end + 1] * xi_complement < sda.mib {
                    continue;
                }

                let d_max = plot[sda.start];
                if d_max * xi_complement >= plot[c_end + 1] {
                    while c_start < sda.end && plot[c_start + 1] > plot[c_end + 1] {
                        c_start += 1;
                    }
                } else if plot[c_end + 1] * xi_complement >= d_max {
                    while c_end > u_start && plot[c_end - 1] > d_max {
                        c_end -= 1;
                    }
                }

                if self.predecessor_correction {
                    match correct_predecessor(&plot, &predecessors, &graph.ordering, c_start, c_end) {
                        Some((s, e)) => {
                            c_start = s;
                            c_end = e;
                        }
                        None => continue,
                    }
                }

                if c_end + 1 < c_start + min_cluster_size {
                    continue;
                }
                if c_start > sda.end || c_end < u_start {
                    continue;
                }
                found.push((c_start, c_end));
            }

            found.reverse();
            clusters.extend(found);
        }

        clusters
    }
}

/// Label ranges in order, skipping any range that overlaps an earlier one
fn extract_labels(ordering: &[usize], clusters: &[(usize, usize)]) -> Vec<i32> {
    let mut ordered = vec![-1i32; ordering.len()];
    let mut label = 0;
    for &(start, end) in clusters {
        if ordered[start..=end].iter().all(|&l| l == -1) {
            ordered[start..=end].iter_mut().for_each(|l| *l = label);
            label += 1;
        }
    }
    let mut labels = vec![-1i32; ordering.len()];
    for (position, &point) in ordering.iter().enumerate() {
        labels[point] = ordered[position];
    }
    labels
}

impl DensityClusteringLibrary for NativeOptics {
    fn cluster(
        &self,
        distances: &DistanceMatrix,
        min_samples: usize,
        min_cluster_size: usize,
        threads: i32,
    ) -> ClusterResult<DensityLabels> {
        let n = distances.len();
        if min_samples == 0 || min_samples > n {
            return Err(ClusterError::InvalidConfiguration(format!(
                "min_samples {} must be between 1 and the number of points ({})",
                min_samples, n
            )));
        }
        if !(0.0..1.0).contains(&self.xi) {
            return Err(ClusterError::InvalidConfiguration(format!("xi {} must be in [0, 1)", self.xi)));
        }

        let pool = thread_pool(threads)?;
        let core_distances: Vec<f64> = pool.install(|| {
            (0..n)
                .into_par_iter()
                .map(|i| core_distance(distances.row(i), min_samples))
                .collect()
        });

        let graph = optics_graph(distances, min_samples, core_distances);
        let clusters = self.xi_clusters(&graph, min_samples, min_cluster_size.max(2));
        let labels = extract_labels(&graph.ordering, &clusters);

        Ok(DensityLabels {
            labels,
            reachability: graph.reachability,
        })
    }

    fn name(&self) -> &'static str {
        "optics"
    }
}
