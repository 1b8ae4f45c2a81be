use rand::Rng;

const MAX_ITERATIONS: usize = 300;

#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// Cluster index per input row
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    /// Within-cluster sum of squared distances
    pub inertia: f64,
}

/// Z-score each column. Columns with zero variance become all zeros.
pub fn standardize(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    let n = rows.len() as f64;
    let dims = first.len();

    let mut means = vec![0.0; dims];
    for row in rows {
        for (m, v) in means.iter_mut().zip(row) {
            *m += v / n;
        }
    }
    let mut stds = vec![0.0; dims];
    for row in rows {
        for ((s, v), m) in stds.iter_mut().zip(row).zip(&means) {
            *s += (v - m).powi(2) / n;
        }
    }
    for s in stds.iter_mut() {
        *s = s.sqrt();
    }

    rows.iter()
        .map(|row| {
            row.iter()
                .zip(&means)
                .zip(&stds)
                .map(|((v, m), s)| if *s > 0.0 { (v - m) / s } else { 0.0 })
                .collect()
        })
        .collect()
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (idx, centroid) in centroids.iter().enumerate() {
        let d = squared_distance(point, centroid);
        if d < best.1 {
            best = (idx, d);
        }
    }
    best
}

/// k-means++ seeding: each further centroid is drawn with probability
/// proportional to its squared distance from the nearest chosen one.
fn seed_centroids<R: Rng>(data: &[Vec<f64>], k: usize, rng: &mut R) -> Vec<Vec<f64>> {
    let mut centroids = vec![data[rng.gen_range(0..data.len())].clone()];
    while centroids.len() < k {
        let weights: Vec<f64> = data.iter().map(|p| nearest(p, &centroids).1).collect();
        let sum: f64 = weights.iter().sum();
        let idx = if sum > 0.0 {
            let mut target = rng.gen::<f64>() * sum;
            let mut chosen = data.len() - 1;
            for (i, w) in weights.iter().enumerate() {
                if target < *w {
                    chosen = i;
                    break;
                }
                target -= w;
            }
            chosen
        } else {
            rng.gen_range(0..data.len())
        };
        centroids.push(data[idx].clone());
    }
    centroids
}

fn fit_once<R: Rng>(data: &[Vec<f64>], k: usize, rng: &mut R) -> KMeansFit {
    let dims = data[0].len();
    let mut centroids = seed_centroids(data, k, rng);
    let mut labels = vec![usize::MAX; data.len()];

    for _ in 0..MAX_ITERATIONS {
        let mut changed = false;
        for (label, point) in labels.iter_mut().zip(data) {
            let (idx, _) = nearest(point, &centroids);
            if *label != idx {
                *label = idx;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        let mut sums = vec![vec![0.0; dims]; k];
        let mut counts = vec![0usize; k];
        for (label, point) in labels.iter().zip(data) {
            counts[*label] += 1;
            for (s, v) in sums[*label].iter_mut().zip(point) {
                *s += v;
            }
        }
        for ((centroid, sum), count) in centroids.iter_mut().zip(sums).zip(counts) {
            // An emptied cluster keeps its previous centroid
            if count > 0 {
                *centroid = sum.into_iter().map(|s| s / count as f64).collect();
            }
        }
    }

    let inertia = labels
        .iter()
        .zip(data)
        .map(|(label, point)| squared_distance(point, &centroids[*label]))
        .sum();

    KMeansFit {
        labels,
        centroids,
        inertia,
    }
}

/// Best of `restarts` k-means runs by inertia. `data` must be non-empty
/// and `1 <= k <= data.len()`.
pub fn fit<R: Rng>(data: &[Vec<f64>], k: usize, restarts: usize, rng: &mut R) -> KMeansFit {
    let mut best = fit_once(data, k, rng);
    for _ in 1..restarts.max(1) {
        let candidate = fit_once(data, k, rng);
        if candidate.inertia < best.inertia {
            best = candidate;
        }
    }
    best
}

/// Elbow rule over inertias for k = `min_k`, `min_k + 1`, ...: pick the k
/// just after the steepest drop.
pub fn choose_k(inertias: &[f64], min_k: usize) -> usize {
    if inertias.len() < 2 {
        return min_k;
    }
    let mut best = (0, f64::INFINITY);
    for (i, pair) in inertias.windows(2).enumerate() {
        let diff = pair[1] - pair[0];
        if diff < best.1 {
            best = (i, diff);
        }
    }
    let max_k = min_k + inertias.len() - 1;
    (best.0 + min_k + 1).min(max_k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn blobs() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.1, 0.2],
            vec![0.2, 0.1],
            vec![10.0, 10.0],
            vec![10.1, 9.9],
            vec![9.8, 10.2],
        ]
    }

    #[test]
    fn test_standardize_columns() {
        let scaled = standardize(&[vec![1.0, 5.0], vec![3.0, 5.0]]);
        assert_eq!(scaled, vec![vec![-1.0, 0.0], vec![1.0, 0.0]]);
        assert!(standardize(&[]).is_empty());
    }

    #[test]
    fn test_fit_separates_blobs() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let result = fit(&blobs(), 2, 5, &mut rng);
        assert_eq!(result.labels[0], result.labels[1]);
        assert_eq!(result.labels[1], result.labels[2]);
        assert_eq!(result.labels[3], result.labels[4]);
        assert_ne!(result.labels[0], result.labels[3]);
        assert!(result.inertia < 1.0);
    }

    #[test]
    fn test_fit_is_reproducible_with_seed() {
        let a = fit(&blobs(), 3, 4, &mut ChaCha8Rng::seed_from_u64(7));
        let b = fit(&blobs(), 3, 4, &mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_fit_identical_points() {
        let data = vec![vec![1.0, 1.0]; 4];
        let result = fit(&data, 2, 2, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(result.inertia, 0.0);
        assert_eq!(result.labels.len(), 4);
    }

    #[test]
    fn test_choose_k_elbow() {
        // k=3,4,5: drops of -50 and -5 -> steepest first drop -> k=4
        assert_eq!(choose_k(&[100.0, 50.0, 45.0], 3), 4);
        // steepest drop second -> k=5
        assert_eq!(choose_k(&[100.0, 95.0, 10.0], 3), 5);
        assert_eq!(choose_k(&[12.0], 3), 3);
    }
}
