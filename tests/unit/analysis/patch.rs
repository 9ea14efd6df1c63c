//! Tests for dense patch sampling on segmentation masks

#[cfg(test)]
mod tests {
    use ndarray::{Array2, s};
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use spotprep::DatasetError;
    use spotprep::analysis::patch::{PatchSample, count_foreground, find_high_density_patch};

    // Tests returned corners keep the patch inside the mask
    // Verified by sampling rows over the full mask height
    #[test]
    fn test_corner_within_bounds() {
        let mask = Array2::<u16>::ones((50, 40));

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let sample = find_high_density_patch(&mask.view(), (10, 8), 20, &mut rng)
                .unwrap()
                .unwrap();

            assert!(sample.row + 10 <= 50);
            assert!(sample.col + 8 <= 40);
            assert_eq!(sample.foreground_pixels, 80);
        }
    }

    // Tests zero attempts yield no patch
    // Verified by initializing the best patch at the origin
    #[test]
    fn test_zero_attempts() {
        let mask = Array2::<u8>::ones((20, 20));
        let mut rng = StdRng::seed_from_u64(1);

        let result = find_high_density_patch(&mask.view(), (5, 5), 0, &mut rng).unwrap();

        assert_eq!(result, None);
    }

    // Tests a single attempt reports the count of its own window
    // Verified by counting the whole mask instead of the window
    #[test]
    fn test_single_attempt_count_matches_window() {
        let mut mask = Array2::<u8>::zeros((30, 30));
        mask.slice_mut(s![5..25, 10..20]).fill(1);

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            if let Some(sample) =
                find_high_density_patch(&mask.view(), (10, 10), 1, &mut rng).unwrap()
            {
                assert_eq!(
                    sample.foreground_pixels,
                    count_foreground(&mask.view(), sample.row, sample.col, (10, 10))
                );
            }
        }
    }

    // Tests the result is the first strict maximum of the same draws
    // Verified by replacing the best patch on ties
    #[test]
    fn test_keeps_first_densest_draw() {
        let mut mask = Array2::<u8>::zeros((40, 40));
        mask.slice_mut(s![0..20, 0..20]).fill(1);
        mask.slice_mut(s![30..40, 30..40]).fill(3);
        let patch_size = (8, 8);

        for seed in 0..20 {
            let mut replay = StdRng::seed_from_u64(seed);
            let mut expected: Option<PatchSample> = None;
            for _ in 0..15 {
                let row = replay.random_range(0..32);
                let col = replay.random_range(0..32);
                let count = count_foreground(&mask.view(), row, col, patch_size);
                if count > expected.map_or(0, |best| best.foreground_pixels) {
                    expected = Some(PatchSample {
                        row,
                        col,
                        foreground_pixels: count,
                    });
                }
            }

            let mut rng = StdRng::seed_from_u64(seed);
            let result = find_high_density_patch(&mask.view(), patch_size, 15, &mut rng).unwrap();
            assert_eq!(result, expected);
        }
    }

    // Tests the same seed reproduces the same corner
    // Verified by reseeding from entropy inside the finder
    #[test]
    fn test_seeded_sampling_is_deterministic() {
        let mask = Array2::from_shape_fn((64, 64), |(r, c)| u8::from((r * c) % 7 == 0));

        let mut first = StdRng::seed_from_u64(42);
        let mut second = StdRng::seed_from_u64(42);

        assert_eq!(
            find_high_density_patch(&mask.view(), (16, 16), 20, &mut first).unwrap(),
            find_high_density_patch(&mask.view(), (16, 16), 20, &mut second).unwrap()
        );
    }

    // Tests an all-background mask yields no patch
    // Verified by accepting windows with equal counts
    #[test]
    fn test_background_only_mask() {
        let mask = Array2::<f32>::zeros((25, 25));
        let mut rng = StdRng::seed_from_u64(3);

        let result = find_high_density_patch(&mask.view(), (5, 5), 20, &mut rng).unwrap();

        assert!(result.is_none());
    }

    // Tests negative values count as background
    // Verified by counting non-zero instead of positive values
    #[test]
    fn test_negative_values_are_background() {
        let mask = Array2::<i32>::from_elem((10, 10), -1);

        assert_eq!(count_foreground(&mask.view(), 0, 0, (10, 10)), 0);
    }

    // Tests oversized patches are rejected
    // Verified by removing the size check
    #[test]
    fn test_patch_larger_than_mask() {
        let mask = Array2::<u8>::ones((10, 10));
        let mut rng = StdRng::seed_from_u64(0);

        let result = find_high_density_patch(&mask.view(), (11, 5), 5, &mut rng);

        assert!(matches!(result, Err(DatasetError::InvalidParameter { .. })));
    }

    // Tests a patch spanning the whole mask sits at the origin
    // Verified by sampling from an empty range
    #[test]
    fn test_patch_equal_to_mask() {
        let mut mask = Array2::<u8>::zeros((6, 9));
        mask[[2, 3]] = 1;
        mask[[5, 8]] = 4;
        let mut rng = StdRng::seed_from_u64(0);

        let sample = find_high_density_patch(&mask.view(), (6, 9), 3, &mut rng)
            .unwrap()
            .unwrap();

        assert_eq!(
            sample,
            PatchSample {
                row: 0,
                col: 0,
                foreground_pixels: 2
            }
        );
    }

    // Tests windows are cut at the mask edge
    // Verified by removing the edge clamping
    #[test]
    fn test_count_foreground_clips_at_edge() {
        let mask = Array2::<u8>::ones((4, 4));

        assert_eq!(count_foreground(&mask.view(), 0, 0, (2, 3)), 6);
        assert_eq!(count_foreground(&mask.view(), 3, 3, (5, 5)), 1);
        assert_eq!(count_foreground(&mask.view(), 10, 10, (2, 2)), 0);
    }
}
