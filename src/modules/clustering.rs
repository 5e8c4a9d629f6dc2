use tracing::debug;

use crate::config::config::ClusteringConfig;
use crate::utils::coordinate::{Coordinate2D, PixelCandidate};
use crate::utils::geometry::distance;

/// A spatial grouping of candidate marker pixels reduced to one centroid.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub centroid: Coordinate2D,
    pub member_count: usize,
}

/// Groups marker pixel candidates into clusters by proximity.
#[derive(Debug, Clone, Default)]
pub struct SpatialClusterer {
    config: ClusteringConfig,
}

impl SpatialClusterer {
    pub fn new(config: ClusteringConfig) -> Self {
        SpatialClusterer { config }
    }

    /// cluster partitions the candidates with a single greedy pass and keeps
    /// only groups strictly larger than `min_cluster_size`, emitting the
    /// arithmetic-mean centroid of each surviving group.
    ///
    /// Grouping is one-hop only: a cluster seed absorbs every unvisited
    /// candidate strictly within `neighbor_radius` of the seed itself, not of
    /// other members. Output therefore depends on the insertion order of the
    /// candidate set, which makes the pass deterministic for a given scan.
    ///
    /// # Arguments
    /// * `candidates` - marker pixels in extraction scan order
    ///
    /// # Returns
    /// * `Vec<Cluster>`
    pub fn cluster(&self, candidates: &[PixelCandidate]) -> Vec<Cluster> {
        let groups = self.group_one_hop(candidates);
        let clusters: Vec<Cluster> = groups
            .into_iter()
            .filter(|members| members.len() > self.config.min_cluster_size)
            .map(|members| Cluster {
                centroid: centroid_of(&members),
                member_count: members.len(),
            })
            .collect();

        debug!(count = clusters.len(), "pixel clustering complete");
        clusters
    }

    fn group_one_hop(&self, candidates: &[PixelCandidate]) -> Vec<Vec<PixelCandidate>> {
        let mut visited = vec![false; candidates.len()];
        let mut groups: Vec<Vec<PixelCandidate>> = Vec::new();

        for i in 0..candidates.len() {
            if visited[i] {
                continue;
            }
            visited[i] = true;
            let seed = candidates[i].as_coordinate();
            let mut members = vec![candidates[i]];

            for j in (i + 1)..candidates.len() {
                if visited[j] {
                    continue;
                }
                if distance(&seed, &candidates[j].as_coordinate()) < self.config.neighbor_radius {
                    visited[j] = true;
                    members.push(candidates[j]);
                }
            }
            groups.push(members);
        }
        groups
    }
}

fn centroid_of(members: &[PixelCandidate]) -> Coordinate2D {
    let n = members.len() as f32;
    let sum_x: f32 = members.iter().map(|p| p.x as f32).sum();
    let sum_y: f32 = members.iter().map(|p| p.y as f32).sum();
    Coordinate2D::new(sum_x / n, sum_y / n)
}
