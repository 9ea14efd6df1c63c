//! Tests for dataset conventions and default parameters

#[cfg(test)]
mod tests {
    use regex::Regex;
    use spotprep::io::configuration::{
        DEFAULT_ADJUSTMENT_BOTTOM, DEFAULT_ADJUSTMENT_TOP, DEFAULT_PATCH_ATTEMPTS,
        DEFAULT_PATCH_SIZE, DEFAULT_SEED, DENSE_FOLDER, DOWNLOAD_BLOCK_SIZE, MASK_FOLDER,
        REPLICATE_PAD_WIDTH, REPORT_SEPARATOR_WIDTH, REQUIRED_PATTERNS, SPOT_FOLDER,
        TEMP_ARCHIVE_NAME,
    };

    // Tests companion folder names
    // Verified by renaming the dense folder
    #[test]
    fn test_companion_folders() {
        assert_eq!(MASK_FOLDER, "Masks");
        assert_eq!(SPOT_FOLDER, "Spots");
        assert_eq!(DENSE_FOLDER, "Spots decomposition");
    }

    // Tests required patterns compile and keep their checking order
    // Verified by reordering the pattern list
    #[test]
    fn test_required_patterns() {
        assert_eq!(
            REQUIRED_PATTERNS,
            [r"CY\d", "cell_mask", "nuclear_mask", "DAPI", "DIC"]
        );
        for pattern in REQUIRED_PATTERNS {
            assert!(Regex::new(pattern).is_ok(), "{pattern} should compile");
        }
    }

    // Tests numeric defaults
    // Verified by changing default values
    #[test]
    fn test_numeric_defaults() {
        assert_eq!(DEFAULT_PATCH_SIZE, (200, 200));
        assert_eq!(DEFAULT_PATCH_ATTEMPTS, 20);
        assert_eq!(DEFAULT_ADJUSTMENT_BOTTOM, 5);
        assert_eq!(DEFAULT_ADJUSTMENT_TOP, 10);
        assert_eq!(DEFAULT_SEED, 42);
    }

    // Tests naming and transfer settings
    // Verified by changing the archive name
    #[test]
    fn test_io_settings() {
        assert_eq!(REPLICATE_PAD_WIDTH, 2);
        assert_eq!(TEMP_ARCHIVE_NAME, "temp.zip");
        assert_eq!(REPORT_SEPARATOR_WIDTH, 50);
        assert!(DOWNLOAD_BLOCK_SIZE > 0);
    }
}
