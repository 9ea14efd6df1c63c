//! Dataset conventions and runtime configuration defaults

// Sibling folders searched for companion files
/// Folder holding nuclear and cell segmentation masks
pub const MASK_FOLDER: &str = "Masks";
/// Folder holding spot detection outputs
pub const SPOT_FOLDER: &str = "Spots";
/// Folder holding dense-region spot decompositions
pub const DENSE_FOLDER: &str = "Spots decomposition";

/// Role patterns every replicate must cover to be processed
pub const REQUIRED_PATTERNS: [&str; 5] = [r"CY\d", "cell_mask", "nuclear_mask", "DAPI", "DIC"];

/// Width of the zero-padded replicate number in companion and output names
pub const REPLICATE_PAD_WIDTH: usize = 2;

// Dense patch sampling
/// Default patch size as (height, width)
pub const DEFAULT_PATCH_SIZE: (usize, usize) = (200, 200);
/// Default number of sampled patches
pub const DEFAULT_PATCH_ATTEMPTS: usize = 20;

// Focus range padding
/// Default padding below the lower inflection point
pub const DEFAULT_ADJUSTMENT_BOTTOM: isize = 5;
/// Default padding above the upper inflection point
pub const DEFAULT_ADJUSTMENT_TOP: isize = 10;

/// Fixed seed for reproducible patch sampling
pub const DEFAULT_SEED: u64 = 42;

// Sample data retrieval
/// Name of the temporary archive written into the target directory
pub const TEMP_ARCHIVE_NAME: &str = "temp.zip";
/// Bytes read per progress callback
pub const DOWNLOAD_BLOCK_SIZE: usize = 8192;

// Report display settings
/// Number of dashes closing each replicate block of the completeness report
pub const REPORT_SEPARATOR_WIDTH: usize = 50;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
