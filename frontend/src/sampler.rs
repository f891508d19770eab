//! Thins a route leg down to a handful of display points per step.
//!
//! Each step is sampled at a stride of `ceil(len / SAMPLES_PER_STEP)`,
//! starting at its first point, so a step never contributes more than
//! [`SAMPLES_PER_STEP`] points however long its path is. Sampling is by
//! index, not by distance. Points are emitted in step order and there is no
//! deduplication where consecutive steps meet.

use shared::{GeoPoint, RouteLeg};

pub const SAMPLES_PER_STEP: usize = 5;

/// Index stride used for a path of `len` points; `0` for an empty path.
pub fn stride(len: usize) -> usize {
    len.div_ceil(SAMPLES_PER_STEP)
}

pub fn sample_step(path: &[GeoPoint]) -> impl Iterator<Item = GeoPoint> + '_ {
    path.iter().step_by(stride(path.len()).max(1)).copied()
}

pub fn sample_leg(leg: &RouteLeg) -> Vec<GeoPoint> {
    leg.steps
        .iter()
        .flat_map(|step| sample_step(&step.path))
        .collect()
}

#[cfg(test)]
mod tests {
    use shared::RouteStep;

    use super::*;

    fn path(n: usize) -> Vec<GeoPoint> {
        (0..n).map(|i| GeoPoint::new(i as f64, -(i as f64))).collect()
    }

    #[test]
    fn empty_step_yields_nothing() {
        assert_eq!(stride(0), 0);
        assert_eq!(sample_step(&[]).count(), 0);
    }

    #[test]
    fn single_point_step_yields_it() {
        let p = path(1);
        assert_eq!(sample_step(&p).collect::<Vec<_>>(), p);
    }

    #[test]
    fn eleven_points_sample_every_third() {
        let p = path(11);
        let sampled: Vec<_> = sample_step(&p).collect();
        assert_eq!(sampled, vec![p[0], p[3], p[6], p[9]]);
    }

    #[test]
    fn leg_concatenates_steps_in_order() {
        let leg = RouteLeg {
            steps: vec![
                RouteStep {
                    path: path(3),
                    ..Default::default()
                },
                RouteStep::default(),
                RouteStep {
                    path: path(11),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let sampled = sample_leg(&leg);
        assert_eq!(sampled.len(), 3 + 4);
        // step boundary: last of step 1 is followed by first of step 3
        assert_eq!(sampled[2], GeoPoint::new(2.0, -2.0));
        assert_eq!(sampled[3], GeoPoint::new(0.0, 0.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_sample_count_matches_stride(n in 0usize..500) {
                let p = path(n);
                let count = sample_step(&p).count();
                let expected = if n == 0 { 0 } else { n.div_ceil(stride(n)) };
                prop_assert_eq!(count, expected);
                prop_assert!(count <= SAMPLES_PER_STEP);
            }

            #[test]
            fn prop_samples_preserve_order(n in 1usize..500) {
                let p = path(n);
                let sampled: Vec<_> = sample_step(&p).collect();
                prop_assert_eq!(sampled[0], p[0]);
                prop_assert!(sampled.windows(2).all(|w| w[0].lat < w[1].lat));
            }
        }
    }
}
