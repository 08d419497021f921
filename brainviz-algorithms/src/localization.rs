//! Weighted-centroid source localization
//!
//! Each source owns a seed location on the head sphere. Its position is
//! estimated as the centroid of the electrode positions weighted by channel
//! power and by a Gaussian falloff around the seed, pulled towards the head
//! center by a fixed depth factor. This is a coarse dipole approximation,
//! good enough to drive the live view.

use brainviz_core::{
    Error, ElectrodeLayout, LocalizationEngine, Point3f, Result, Sample, Vector3f, HEAD_RADIUS,
};
use std::sync::Arc;

/// Parameters of the centroid localizer
#[derive(Debug, Clone)]
pub struct CentroidConfig {
    /// Number of sources to estimate
    pub source_count: usize,
    /// Width of the Gaussian falloff around each seed, in scene units
    pub spread: f32,
    /// Fraction of the way from the scalp centroid to the head center
    pub depth: f32,
}

impl Default for CentroidConfig {
    fn default() -> Self {
        Self {
            source_count: 3,
            spread: 0.6,
            depth: 0.35,
        }
    }
}

/// Localization engine computing power-weighted electrode centroids
pub struct CentroidLocalizer {
    layout: Arc<ElectrodeLayout>,
    seeds: Vec<Point3f>,
    config: CentroidConfig,
    data: Option<Sample>,
}

impl CentroidLocalizer {
    /// Create a localizer with `config.source_count` seeds spread over the
    /// upper hemisphere of the head.
    pub fn new(layout: Arc<ElectrodeLayout>, config: CentroidConfig) -> Self {
        let seeds = hemisphere_seeds(config.source_count, HEAD_RADIUS);
        Self::with_seeds(layout, seeds, config)
    }

    /// Create a localizer with explicit seed locations, one per source
    pub fn with_seeds(layout: Arc<ElectrodeLayout>, seeds: Vec<Point3f>, config: CentroidConfig) -> Self {
        let config = CentroidConfig {
            source_count: seeds.len(),
            ..config
        };
        Self {
            layout,
            seeds,
            config,
            data: None,
        }
    }

    pub fn seeds(&self) -> &[Point3f] {
        &self.seeds
    }

    pub fn config(&self) -> &CentroidConfig {
        &self.config
    }
}

impl LocalizationEngine for CentroidLocalizer {
    fn source_count(&self) -> usize {
        self.seeds.len()
    }

    fn set_data(&mut self, sample: &Sample) {
        self.data = Some(sample.clone());
    }

    fn localize(&mut self, index: usize) -> Result<Point3f> {
        let seed = *self.seeds.get(index).ok_or_else(|| {
            Error::localization(index, format!("only {} sources configured", self.seeds.len()))
        })?;
        let sample = self
            .data
            .as_ref()
            .ok_or_else(|| Error::localization(index, "no sample set"))?;
        self.layout
            .check_sample(sample)
            .map_err(|e| Error::localization(index, e.to_string()))?;

        let two_sigma_sq = 2.0 * self.config.spread * self.config.spread;
        let mut total = 0.0f64;
        let mut weighted = Vector3f::zeros();
        for (electrode, value) in self.layout.iter().zip(&sample.values) {
            let distance_sq = (electrode.position - seed).norm_squared();
            let falloff = (-distance_sq / two_sigma_sq).exp() as f64;
            let weight = value * value * falloff;
            total += weight;
            weighted += electrode.position.coords * weight as f32;
        }

        if !(total.is_finite() && total > f64::EPSILON) {
            return Err(Error::localization(
                index,
                format!("no signal power near seed (total weight {})", total),
            ));
        }

        let centroid = weighted / total as f32;
        Ok(Point3f::from(centroid * (1.0 - self.config.depth.clamp(0.0, 1.0))))
    }
}

/// `count` points on the upper hemisphere of a sphere of `radius`, laid out
/// along a Fibonacci spiral so neighbouring sources are roughly equidistant.
pub fn hemisphere_seeds(count: usize, radius: f32) -> Vec<Point3f> {
    let golden_angle = std::f32::consts::PI * (3.0 - 5.0f32.sqrt());
    (0..count)
        .map(|i| {
            let z = 1.0 - (i as f32 + 0.5) / count as f32;
            let r = (1.0 - z * z).sqrt();
            let phi = golden_angle * i as f32;
            Point3f::new(r * phi.cos() * radius, r * phi.sin() * radius, z * radius)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use brainviz_io::epoc_layout;

    fn localizer(seeds: Vec<Point3f>) -> CentroidLocalizer {
        CentroidLocalizer::with_seeds(Arc::new(epoc_layout()), seeds, CentroidConfig::default())
    }

    #[test]
    fn test_hemisphere_seeds_on_sphere() {
        let seeds = hemisphere_seeds(5, 2.0);
        assert_eq!(seeds.len(), 5);
        for seed in &seeds {
            assert_relative_eq!(seed.coords.norm(), 2.0, epsilon = 1e-5);
            assert!(seed.z > 0.0);
        }
    }

    #[test]
    fn test_single_active_channel_pulls_estimate() {
        let layout = epoc_layout();
        let o1 = layout.position_of("O1").unwrap();
        let o1_position = layout.as_slice()[o1].position;

        let mut engine = localizer(vec![o1_position]);
        let mut values = vec![0.0; layout.len()];
        values[o1] = 50.0;
        engine.set_data(&Sample::new(1, values));

        let estimate = engine.localize(0).unwrap();
        let expected = o1_position.coords * (1.0 - engine.config().depth);
        assert_relative_eq!(estimate.coords, expected, epsilon = 1e-4);
    }

    #[test]
    fn test_estimate_stays_inside_head() {
        let layout = epoc_layout();
        let mut engine = CentroidLocalizer::new(Arc::new(layout.clone()), CentroidConfig::default());
        let values = (0..layout.len()).map(|i| (i as f64 * 1.7).sin() * 20.0 + 3.0).collect();
        engine.set_data(&Sample::new(7, values));

        for index in 0..engine.source_count() {
            let p = engine.localize(index).unwrap();
            assert!(p.coords.norm() < HEAD_RADIUS);
        }
    }

    #[test]
    fn test_failures_are_per_index_errors() {
        let layout = epoc_layout();
        let mut engine = localizer(hemisphere_seeds(2, HEAD_RADIUS));

        assert!(matches!(engine.localize(0), Err(Error::Localization { index: 0, .. })));

        engine.set_data(&Sample::zeros(layout.len()));
        assert!(matches!(engine.localize(1), Err(Error::Localization { index: 1, .. })));

        engine.set_data(&Sample::zeros(layout.len() + 1));
        assert!(engine.localize(0).is_err());

        assert!(matches!(engine.localize(5), Err(Error::Localization { index: 5, .. })));
    }
}
