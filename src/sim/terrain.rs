//! Procedural hill profile
//!
//! The ground is a 1D height field sampled at a fixed horizontal spacing and
//! linearly interpolated between samples. It is generated once per match and
//! never deformed.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Finer spacings are widened so a profile never holds more than this many segments
pub const MAX_SEGMENTS: usize = 4096;

/// Inputs for [`Terrain::generate`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainParams {
    pub width: f32,
    pub segment_spacing: f32,
    pub baseline: f32,
    /// Integer offset range `[-variance, variance]` applied to the baseline
    pub variance: i32,
    /// Allowed ground band `(min, max)` in screen y
    pub elevation_bounds: (f32, f32),
}

impl TerrainParams {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            width: tuning.arena_width,
            segment_spacing: tuning.segment_spacing,
            baseline: tuning.terrain_baseline,
            variance: tuning.terrain_variance,
            elevation_bounds: (tuning.elevation_min, tuning.elevation_max),
        }
    }
}

/// Ground profile: sample points with strictly increasing x, starting at 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terrain {
    points: Vec<Vec2>,
    width: f32,
}

impl Terrain {
    /// Generate a random profile covering `[0, width]`.
    ///
    /// Samples sit at every multiple of the spacing up to and including the
    /// first one at or past `width`, so the far edge is always bracketed.
    /// A spacing that is not positive (or a degenerate width) yields just the
    /// two endpoints; a negative variance is treated as zero.
    pub fn generate<R: Rng + ?Sized>(params: &TerrainParams, rng: &mut R) -> Self {
        let (lo, hi) = params.elevation_bounds;
        let width = if params.width.is_finite() { params.width.max(0.0) } else { 0.0 };
        let variance = params.variance.max(0);
        let spacing = if params.segment_spacing.is_finite() && params.segment_spacing > 0.0 {
            params.segment_spacing.max(width / MAX_SEGMENTS as f32)
        } else {
            width.max(1.0)
        };
        let count = (width / spacing).ceil() as usize + 1;

        let points = (0..count.max(2))
            .map(|i| {
                let x = i as f32 * spacing;
                let offset = rng.random_range(-variance..=variance);
                let y = (params.baseline + offset as f32).clamp(lo, hi);
                Vec2::new(x, y)
            })
            .collect();

        Self { points, width }
    }

    /// Build from explicit samples (tests, replays)
    pub fn from_points(points: Vec<Vec2>, width: f32) -> Self {
        debug_assert!(!points.is_empty());
        debug_assert!(points.windows(2).all(|w| w[0].x < w[1].x));
        Self { points, width }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Ground y at `x`, interpolated between the bracketing samples.
    ///
    /// Outside `[0, width)` the nearest endpoint height is returned.
    pub fn height_at(&self, x: f32) -> f32 {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return 0.0;
        };
        if x.is_nan() || x < first.x {
            return first.y;
        }
        if x >= self.width {
            return last.y;
        }

        // First sample strictly right of x; x lies in [points[i-1], points[i])
        let i = self.points.partition_point(|p| p.x <= x);
        if i >= self.points.len() {
            return last.y;
        }
        let a = self.points[i - 1];
        let b = self.points[i];
        let span = b.x - a.x;
        if span <= f32::EPSILON {
            return a.y;
        }
        let t = (x - a.x) / span;
        a.y + t * (b.y - a.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn classic() -> TerrainParams {
        TerrainParams::from_tuning(&Tuning::default())
    }

    #[test]
    fn test_generate_survives_bad_params() {
        let mut rng = Pcg32::seed_from_u64(7);

        let flat = TerrainParams {
            variance: -20,
            ..classic()
        };
        let terrain = Terrain::generate(&flat, &mut rng);
        assert!(terrain.points().iter().all(|p| p.y == flat.baseline));

        for spacing in [0.0, -50.0, f32::NAN] {
            let params = TerrainParams {
                segment_spacing: spacing,
                ..classic()
            };
            let terrain = Terrain::generate(&params, &mut rng);
            let xs: Vec<f32> = terrain.points().iter().map(|p| p.x).collect();
            assert_eq!(xs, vec![0.0, 1200.0]);
            assert!(terrain.height_at(600.0).is_finite());
        }

        let fine = TerrainParams {
            segment_spacing: 1e-6,
            ..classic()
        };
        assert!(Terrain::generate(&fine, &mut rng).points().len() <= MAX_SEGMENTS + 2);
    }

    #[test]
    fn test_generate_layout() {
        let mut rng = Pcg32::seed_from_u64(7);
        let terrain = Terrain::generate(&classic(), &mut rng);
        let pts = terrain.points();

        // 0, 50, ..., 1200
        assert_eq!(pts.len(), 25);
        assert_eq!(pts[0].x, 0.0);
        assert_eq!(pts[24].x, 1200.0);
        assert!(pts.windows(2).all(|w| w[0].x < w[1].x));
        assert!(pts.iter().all(|p| (400.0..=650.0).contains(&p.y)));
    }

    #[test]
    fn test_generate_deterministic() {
        let a = Terrain::generate(&classic(), &mut Pcg32::seed_from_u64(42));
        let b = Terrain::generate(&classic(), &mut Pcg32::seed_from_u64(42));
        assert_eq!(a.points(), b.points());
    }

    #[test]
    fn test_height_interpolation() {
        let terrain = Terrain::from_points(
            vec![Vec2::new(0.0, 500.0), Vec2::new(50.0, 600.0), Vec2::new(100.0, 400.0)],
            100.0,
        );
        assert_eq!(terrain.height_at(0.0), 500.0);
        assert_eq!(terrain.height_at(25.0), 550.0);
        // Exactly on a sample
        assert_eq!(terrain.height_at(50.0), 600.0);
        assert_eq!(terrain.height_at(75.0), 500.0);
    }

    #[test]
    fn test_height_clamps_outside() {
        let terrain = Terrain::from_points(
            vec![Vec2::new(0.0, 500.0), Vec2::new(50.0, 600.0), Vec2::new(100.0, 400.0)],
            100.0,
        );
        assert_eq!(terrain.height_at(-30.0), 500.0);
        assert_eq!(terrain.height_at(100.0), 400.0);
        assert_eq!(terrain.height_at(5000.0), 400.0);
        assert_eq!(terrain.height_at(f32::NAN), 500.0);
    }

    #[test]
    fn test_flat_band() {
        let params = TerrainParams {
            variance: 0,
            ..classic()
        };
        let terrain = Terrain::generate(&params, &mut Pcg32::seed_from_u64(1));
        assert!(terrain.points().iter().all(|p| p.y == 550.0));
        assert_eq!(terrain.height_at(333.3), 550.0);
    }

    proptest! {
        #[test]
        fn prop_height_within_band(seed in any::<u64>(), x in 0.0f32..1200.0) {
            let terrain = Terrain::generate(&classic(), &mut Pcg32::seed_from_u64(seed));
            let h = terrain.height_at(x);
            prop_assert!((400.0..=650.0).contains(&h), "height {} out of band", h);
        }

        #[test]
        fn prop_height_between_neighbours(seed in any::<u64>(), seg in 0usize..24, t in 0.0f32..1.0) {
            let terrain = Terrain::generate(&classic(), &mut Pcg32::seed_from_u64(seed));
            let a = terrain.points()[seg];
            let b = terrain.points()[seg + 1];
            let h = terrain.height_at(a.x + t * (b.x - a.x));
            let (lo, hi) = if a.y <= b.y { (a.y, b.y) } else { (b.y, a.y) };
            prop_assert!(h >= lo - 1e-3 && h <= hi + 1e-3);
        }
    }
}
