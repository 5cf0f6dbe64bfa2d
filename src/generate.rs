//! Synthetic Euclidean instances.
//!
//! Four point families exercise different weaknesses of the heuristic:
//! uniform scatter, tight Gaussian clusters, clusters with far outliers
//! (greedy traps) and a noisy ring (many near-equal neighbor distances).
//! [`suite_case`] reproduces a fixed 100-case benchmark suite.

use crate::distance::DistanceMatrix;
use crate::instance::Instance;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::f64::consts::TAU;

/// Smallest weight written between two distinct points.
pub const MIN_WEIGHT: f64 = 1e-9;

/// Number of cases in the benchmark suite.
pub const SUITE_SIZE: usize = 100;

/// Base seed of the benchmark suite; case `idx` uses `SUITE_SEED + idx`.
pub const SUITE_SEED: u64 = 412;

/// Point distribution of a generated instance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstanceFamily {
    /// Uniform in the unit square.
    Uniform,
    /// Gaussian noise around `clusters` uniform centers, clamped to the
    /// unit square. Points are assigned to centers round-robin.
    Clustered { clusters: usize, sigma: f64 },
    /// As `Clustered`, with the last `outliers` points spread evenly on a
    /// circle of radius 3 around the origin.
    Outliers {
        clusters: usize,
        sigma: f64,
        outliers: usize,
    },
    /// Evenly spaced angles on the unit circle, radius jittered uniformly
    /// in `[1 - jitter, 1 + jitter)`.
    Ring { jitter: f64 },
}

impl InstanceFamily {
    /// Validates the family parameters.
    pub fn validate(&self) -> Result<(), String> {
        match *self {
            Self::Uniform => Ok(()),
            Self::Clustered { clusters, sigma } | Self::Outliers { clusters, sigma, .. } => {
                if clusters == 0 {
                    return Err("clusters must be at least 1".into());
                }
                if !sigma.is_finite() || sigma < 0.0 {
                    return Err(format!("sigma must be finite and non-negative, got {sigma}"));
                }
                Ok(())
            }
            Self::Ring { jitter } => {
                if !jitter.is_finite() || jitter < 0.0 {
                    return Err(format!("jitter must be finite and non-negative, got {jitter}"));
                }
                Ok(())
            }
        }
    }

    /// Family used by benchmark case `idx` (1-based) with `n` vertices.
    pub fn for_suite_case(idx: usize, n: usize) -> Self {
        match idx {
            0..=30 => Self::Uniform,
            31..=60 => Self::Clustered {
                clusters: 3 + idx / 10,
                sigma: 0.03 + 0.002 * (idx - 30) as f64,
            },
            61..=80 => Self::Outliers {
                clusters: 4,
                sigma: 0.02 + 0.002 * (idx - 60) as f64,
                outliers: (n / 12).max(2),
            },
            _ => Self::Ring {
                jitter: 0.02 + 0.0005 * (idx - 80) as f64,
            },
        }
    }
}

/// Draws `n` points from `family`.
///
/// # Panics
/// Panics if the family parameters are invalid.
pub fn generate_points<R: Rng + ?Sized>(
    n: usize,
    family: InstanceFamily,
    rng: &mut R,
) -> Vec<(f64, f64)> {
    family.validate().expect("invalid InstanceFamily");

    match family {
        InstanceFamily::Uniform => (0..n).map(|_| (rng.random(), rng.random())).collect(),
        InstanceFamily::Clustered { clusters, sigma } => clustered(n, clusters, sigma, rng),
        InstanceFamily::Outliers {
            clusters,
            sigma,
            outliers,
        } => {
            let outliers = outliers.min(n);
            let mut points = clustered(n - outliers, clusters, sigma, rng);
            points.extend((0..outliers).map(|j| {
                let angle = TAU * j as f64 / outliers as f64;
                (3.0 * angle.cos(), 3.0 * angle.sin())
            }));
            points
        }
        InstanceFamily::Ring { jitter } => (0..n)
            .map(|i| {
                let angle = TAU * i as f64 / n as f64;
                let r = if jitter > 0.0 {
                    1.0 + rng.random_range(-jitter..jitter)
                } else {
                    1.0
                };
                (r * angle.cos(), r * angle.sin())
            })
            .collect(),
    }
}

fn clustered<R: Rng + ?Sized>(
    n: usize,
    clusters: usize,
    sigma: f64,
    rng: &mut R,
) -> Vec<(f64, f64)> {
    let centers: Vec<(f64, f64)> = (0..clusters)
        .map(|_| (rng.random(), rng.random()))
        .collect();
    let noise = Normal::new(0.0, sigma).expect("sigma validated");
    (0..n)
        .map(|i| {
            let (cx, cy) = centers[i % clusters];
            let x = (cx + noise.sample(&mut *rng)).clamp(0.0, 1.0);
            let y = (cy + noise.sample(&mut *rng)).clamp(0.0, 1.0);
            (x, y)
        })
        .collect()
}

/// Builds a complete instance over `points`, labeled `v1..vn`.
///
/// Coincident points get weight [`MIN_WEIGHT`] instead of zero.
pub fn euclidean_instance(points: &[(f64, f64)]) -> Instance {
    let n = points.len();
    let mut matrix = DistanceMatrix::zeroed(n);
    for i in 0..n {
        for j in (i + 1)..n {
            let (dx, dy) = (points[i].0 - points[j].0, points[i].1 - points[j].1);
            matrix.set_symmetric(i, j, dx.hypot(dy).max(MIN_WEIGHT));
        }
    }
    let labels = (1..=n).map(|i| format!("v{i}")).collect();
    Instance::new(labels, matrix).expect("generated labels are distinct")
}

/// Benchmark case `idx` (1-based): `idx + 4` vertices seeded with
/// `SUITE_SEED + idx`.
///
/// # Examples
///
/// ```
/// use u_tsp::generate::{suite_case, suite_file_name};
///
/// let inst = suite_case(7);
/// assert_eq!(inst.size(), 11);
/// assert_eq!(suite_file_name(7, inst.size()), "auto_007_n11.txt");
/// ```
pub fn suite_case(idx: usize) -> Instance {
    let n = idx + 4;
    let mut rng = StdRng::seed_from_u64(SUITE_SEED + idx as u64);
    let family = InstanceFamily::for_suite_case(idx, n);
    euclidean_instance(&generate_points(n, family, &mut rng))
}

/// File name of benchmark case `idx`.
pub fn suite_file_name(idx: usize, n: usize) -> String {
    format!("auto_{idx:03}_n{n}.txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suite_case_reproducible() {
        for idx in [1, 45, 70, 95] {
            assert_eq!(suite_case(idx), suite_case(idx), "case {idx} differs");
        }
    }

    #[test]
    fn test_suite_case_sizes_and_labels() {
        let inst = suite_case(1);
        assert_eq!(inst.size(), 5);
        assert_eq!(inst.labels(), ["v1", "v2", "v3", "v4", "v5"]);

        let last = suite_case(SUITE_SIZE);
        assert_eq!(last.size(), 104);
        assert_eq!(last.labels()[103], "v104");
    }

    #[test]
    fn test_family_bands() {
        assert_eq!(InstanceFamily::for_suite_case(30, 34), InstanceFamily::Uniform);
        assert!(matches!(
            InstanceFamily::for_suite_case(31, 35),
            InstanceFamily::Clustered { clusters: 6, .. }
        ));
        assert!(matches!(
            InstanceFamily::for_suite_case(61, 65),
            InstanceFamily::Outliers {
                clusters: 4,
                outliers: 5,
                ..
            }
        ));
        assert!(matches!(
            InstanceFamily::for_suite_case(81, 85),
            InstanceFamily::Ring { .. }
        ));
    }

    #[test]
    fn test_uniform_in_unit_square() {
        let mut rng = StdRng::seed_from_u64(1);
        let points = generate_points(200, InstanceFamily::Uniform, &mut rng);
        assert_eq!(points.len(), 200);
        assert!(points
            .iter()
            .all(|&(x, y)| (0.0..1.0).contains(&x) && (0.0..1.0).contains(&y)));
    }

    #[test]
    fn test_clustered_clamped() {
        let mut rng = StdRng::seed_from_u64(2);
        let family = InstanceFamily::Clustered {
            clusters: 3,
            sigma: 0.5,
        };
        let points = generate_points(300, family, &mut rng);
        assert!(points
            .iter()
            .all(|&(x, y)| (0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y)));
    }

    #[test]
    fn test_outliers_on_far_ring() {
        let mut rng = StdRng::seed_from_u64(3);
        let family = InstanceFamily::Outliers {
            clusters: 4,
            sigma: 0.02,
            outliers: 4,
        };
        let points = generate_points(20, family, &mut rng);
        for &(x, y) in &points[16..] {
            assert!((x.hypot(y) - 3.0).abs() < 1e-9);
        }
        assert!((points[16].0 - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_ring_radius_within_jitter() {
        let mut rng = StdRng::seed_from_u64(4);
        let points = generate_points(50, InstanceFamily::Ring { jitter: 0.05 }, &mut rng);
        for &(x, y) in &points {
            let r = x.hypot(y);
            assert!((0.95..=1.05).contains(&r), "radius {r}");
        }
    }

    #[test]
    fn test_coincident_points_get_min_weight() {
        let inst = euclidean_instance(&[(0.5, 0.5), (0.5, 0.5), (1.5, 0.5)]);
        assert_eq!(inst.matrix().get(0, 1), MIN_WEIGHT);
        assert_eq!(inst.matrix().get(0, 0), 0.0);
        assert!((inst.matrix().get(0, 2) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_edge_list_parses_back() {
        let inst = suite_case(12);
        let parsed = Instance::parse(&inst.to_edge_list()).expect("round trip");
        assert_eq!(parsed.labels(), inst.labels());
        assert!((parsed.matrix().get(3, 9) - inst.matrix().get(3, 9)).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_family() {
        let bad = InstanceFamily::Clustered {
            clusters: 0,
            sigma: 0.1,
        };
        assert!(bad.validate().is_err());
        assert!(InstanceFamily::Ring { jitter: -1.0 }.validate().is_err());
        assert!(InstanceFamily::Uniform.validate().is_ok());
    }

    #[test]
    fn test_file_name() {
        assert_eq!(suite_file_name(100, 104), "auto_100_n104.txt");
    }
}
