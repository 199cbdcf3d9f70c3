//! # Connectivity versus energy
//!
//! Data preparation for the "connectivity vs energy" charts and the degree histograms. Nothing
//! is drawn here: renderers get the points, the labels worth printing and the histogram counts.
use crate::ReactionNetwork::energy_ordering::EnergyTable;
use crate::ReactionNetwork::network_errors::NetworkWarning;
use log::warn;
use nalgebra::DVector;

/// one species on the chart
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectivityPoint {
    pub species: String,
    pub energy: f64,
    pub connectivity: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectivityEnergySeries {
    pub points: Vec<ConnectivityPoint>,
    /// species given without an energy value
    pub missing: Vec<NetworkWarning>,
}

impl ConnectivityEnergySeries {
    /// pairs `connectivity[i]` with the energy of `species[i]`; species without energy are
    /// left out and reported
    pub fn build(table: &EnergyTable, connectivity: &DVector<f64>, species: &[String]) -> Self {
        let mut series = ConnectivityEnergySeries::default();
        for (name, &value) in species.iter().zip(connectivity.iter()) {
            match table.get(name) {
                Some(energy) => series.points.push(ConnectivityPoint {
                    species: name.clone(),
                    energy,
                    connectivity: value,
                }),
                None => {
                    warn!("'{}' not found in energy data", name);
                    series.missing.push(NetworkWarning::Coverage {
                        species: name.clone(),
                    });
                }
            }
        }
        series
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// point of largest connectivity (first one on ties)
    pub fn peak(&self) -> Option<&ConnectivityPoint> {
        self.points.iter().fold(None, |best: Option<&ConnectivityPoint>, p| match best {
            Some(b) if b.connectivity >= p.connectivity => Some(b),
            _ => Some(p),
        })
    }

    /// species whose label is printed: connectivity above the 95th percentile, or lying at
    /// the lowest or highest energy
    pub fn highlighted_labels(&self) -> Vec<String> {
        if self.points.is_empty() {
            return Vec::new();
        }
        let values: Vec<f64> = self.points.iter().map(|p| p.connectivity).collect();
        let p95 = percentile(&values, 95.0);
        let (e_min, e_max) = self.energy_range();
        self.points
            .iter()
            .filter(|p| p.connectivity > p95 || p.energy == e_min || p.energy == e_max)
            .map(|p| p.species.clone())
            .collect()
    }

    /// evenly spaced x positions over the energy range, one per point, for charts where
    /// species should not pile up at close energies
    pub fn evenly_spaced_axis(&self) -> Vec<f64> {
        let n = self.points.len();
        let (lo, hi) = self.energy_range();
        match n {
            0 => Vec::new(),
            1 => vec![lo],
            _ => (0..n)
                .map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64)
                .collect(),
        }
    }

    fn energy_range(&self) -> (f64, f64) {
        self.points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.energy), hi.max(p.energy))
        })
    }
}

/// q-th percentile with linear interpolation between closest ranks
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let rank = q.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// bins + 1 edges
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// equal-width histogram over `range`; the last bin includes its right edge, values outside
/// the range and non-finite values are not counted
pub fn degree_histogram(values: &[f64], bins: usize, range: (f64, f64)) -> Histogram {
    let (lo, hi) = range;
    let bins = bins.max(1);
    let width = (hi - lo) / bins as f64;
    let edges = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0; bins];
    if width > 0.0 {
        for &v in values {
            if !v.is_finite() || v < lo || v > hi {
                continue;
            }
            let bin = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[bin] += 1;
        }
    }
    Histogram { edges, counts }
}
