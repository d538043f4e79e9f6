// representatives.rs - One representative per cluster plus every noise point

use crate::engines::DensityLabels;

/// Clustering outcome for one sequence
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAssignment {
    pub index: usize,
    pub label: i32,
    pub reachability: f64,
    pub name: String,
}

impl ClusterAssignment {
    pub fn is_noise(&self) -> bool {
        self.label < 0
    }
}

/// Zip labels, reachabilities and names into per-sequence assignments
pub fn assignments(result: &DensityLabels, names: &[String]) -> Vec<ClusterAssignment> {
    result
        .labels
        .iter()
        .zip(&result.reachability)
        .enumerate()
        .map(|(index, (&label, &reachability))| ClusterAssignment {
            index,
            label,
            reachability,
            name: names.get(index).cloned().unwrap_or_else(|| format!("seq{}", index)),
        })
        .collect()
}

/// Indices of the chosen sequences: noise points in ascending index order,
/// then one sequence per cluster in ascending label order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepresentativeSet(pub Vec<usize>);

impl RepresentativeSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

/// Keep every noise point and, per cluster, the member with the smallest
/// reachability. Ties keep the member listed first, and a NaN reachability
/// ranks with infinity.
pub fn select_representatives(assignments: &[ClusterAssignment]) -> RepresentativeSet {
    let mut ordered: Vec<&ClusterAssignment> = assignments.iter().collect();
    ordered.sort_by_key(|a| a.index);

    let mut chosen: Vec<usize> = ordered.iter().filter(|a| a.is_noise()).map(|a| a.index).collect();

    let mut clustered: Vec<&ClusterAssignment> = ordered.into_iter().filter(|a| !a.is_noise()).collect();
    // Stable: equal (label, reachability) keep index order
    clustered.sort_by(|a, b| {
        a.label
            .cmp(&b.label)
            .then_with(|| reachability_key(a).total_cmp(&reachability_key(b)))
    });

    let mut last_label = None;
    for a in clustered {
        if last_label != Some(a.label) {
            chosen.push(a.index);
            last_label = Some(a.label);
        }
    }

    RepresentativeSet(chosen)
}

fn reachability_key(a: &ClusterAssignment) -> f64 {
    if a.reachability.is_nan() {
        f64::INFINITY
    } else {
        a.reachability
    }
}
