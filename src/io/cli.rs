//! Command-line interface for grouping, checking and preparing datasets

use crate::analysis::focus::{find_in_focus_indices, max_intensity_profile};
use crate::analysis::patch::find_high_density_patch;
use crate::dataset::completeness::ensure_files_exist;
use crate::dataset::grouping::group_experiments;
use crate::io::configuration::{
    DEFAULT_ADJUSTMENT_BOTTOM, DEFAULT_ADJUSTMENT_TOP, DEFAULT_PATCH_ATTEMPTS,
    DEFAULT_PATCH_SIZE, DEFAULT_SEED,
};
use crate::io::error::{Result, file_system, invalid_array_data, invalid_parameter};
use crate::io::fetch::download_sample_data;
use crate::io::loader::{ArrayFormat, load_array};
use crate::io::progress::DownloadProgress;
use clap::{Parser, Subcommand};
use log::warn;
use ndarray::{ArrayD, Ix1, Ix2, Ix3};
use rand::{SeedableRng, rngs::StdRng};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "spotprep")]
#[command(
    author,
    version,
    about = "Group, check and prepare smFISH microscopy datasets"
)]
/// Command-line arguments for the dataset tool
pub struct Cli {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available operations
#[derive(Subcommand)]
pub enum Command {
    /// List raw images and companions grouped by identifier and replicate
    Group {
        /// Dataset root directory
        #[arg(value_name = "ROOT")]
        root: PathBuf,
    },

    /// Report replicates missing required channels or masks
    Check {
        /// Dataset root directory
        #[arg(value_name = "ROOT")]
        root: PathBuf,
    },

    /// Download and unpack a sample dataset
    Fetch {
        /// Directory the archive is unpacked into
        #[arg(value_name = "TARGET_DIR")]
        target_dir: PathBuf,

        /// Archive URL
        #[arg(short, long)]
        url: String,
    },

    /// Find the densest patch of a segmentation mask
    Patch {
        /// Mask file (.npy, .tif or .png)
        #[arg(value_name = "MASK")]
        mask: PathBuf,

        /// Patch height in pixels
        #[arg(short = 'H', long, default_value_t = DEFAULT_PATCH_SIZE.0)]
        height: usize,

        /// Patch width in pixels
        #[arg(short, long, default_value_t = DEFAULT_PATCH_SIZE.1)]
        width: usize,

        /// Number of random patches to sample
        #[arg(short, long, default_value_t = DEFAULT_PATCH_ATTEMPTS)]
        attempts: usize,

        /// Random seed for reproducible sampling
        #[arg(short, long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },

    /// Find the in-focus z-range of a focus curve or image stack
    Focus {
        /// 1D focus curve or (z, h, w) stack
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Padding below the lower inflection point
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_ADJUSTMENT_BOTTOM,
            allow_negative_numbers = true
        )]
        bottom: isize,

        /// Padding above the upper inflection point
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_ADJUSTMENT_TOP,
            allow_negative_numbers = true
        )]
        top: isize,
    },
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Runs a parsed command and writes its text output
pub struct CommandRunner {
    cli: Cli,
}

impl CommandRunner {
    /// Create a runner for the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the command, writing human-readable results to `out`
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails or `out` can't be written
    pub fn run<W: Write>(&self, out: &mut W) -> Result<()> {
        match &self.cli.command {
            Command::Group { root } => Self::group(root, out),
            Command::Check { root } => Self::check(root, out),
            Command::Fetch { target_dir, url } => self.fetch(target_dir, url, out),
            Command::Patch {
                mask,
                height,
                width,
                attempts,
                seed,
            } => Self::patch(mask, (*height, *width), *attempts, *seed, out),
            Command::Focus { file, bottom, top } => Self::focus(file, *bottom, *top, out),
        }
    }

    fn group<W: Write>(root: &Path, out: &mut W) -> Result<()> {
        let grouping = group_experiments(root)?;
        for (identifier, replicate, record) in grouping.iter() {
            writeln!(out, "{identifier} {replicate}").map_err(output_error)?;
            for (key, value) in record.entries() {
                writeln!(out, "  {key}: {value}").map_err(output_error)?;
            }
        }
        Ok(())
    }

    fn check<W: Write>(root: &Path, out: &mut W) -> Result<()> {
        let report = ensure_files_exist(root)?;
        write!(out, "{report}").map_err(output_error)?;

        let incomplete = report.incomplete().count();
        if incomplete > 0 {
            warn!(
                "{incomplete} of {} replicates are incomplete",
                report.statuses.len()
            );
        }
        Ok(())
    }

    fn fetch<W: Write>(&self, target_dir: &Path, url: &str, out: &mut W) -> Result<()> {
        let mut progress = if self.cli.should_show_progress() {
            DownloadProgress::new("Downloading")
        } else {
            DownloadProgress::hidden()
        };

        download_sample_data(target_dir, url, |downloaded, total| {
            progress.update(downloaded, total);
        })?;
        progress.finish();

        writeln!(out, "Sample data unpacked into {}", target_dir.display())
            .map_err(output_error)
    }

    fn patch<W: Write>(
        mask_path: &Path,
        patch_size: (usize, usize),
        attempts: usize,
        seed: u64,
        out: &mut W,
    ) -> Result<()> {
        let mask = load_known_format(mask_path)?
            .into_dimensionality::<Ix2>()
            .map_err(|e| invalid_array_data(mask_path, &format!("expected a 2D mask: {e}")))?;

        let mut rng = StdRng::seed_from_u64(seed);
        let written = match find_high_density_patch(&mask.view(), patch_size, attempts, &mut rng)? {
            Some(sample) => writeln!(
                out,
                "densest patch at row {}, col {} ({} foreground pixels)",
                sample.row, sample.col, sample.foreground_pixels
            ),
            None => writeln!(out, "no foreground found in {attempts} sampled patches"),
        };
        written.map_err(output_error)
    }

    fn focus<W: Write>(path: &Path, bottom: isize, top: isize, out: &mut W) -> Result<()> {
        let data = load_known_format(path)?;
        let curve = match data.ndim() {
            1 => data
                .into_dimensionality::<Ix1>()
                .map_err(|e| invalid_array_data(path, &e.to_string()))?,
            3 => {
                let stack = data
                    .into_dimensionality::<Ix3>()
                    .map_err(|e| invalid_array_data(path, &e.to_string()))?;
                max_intensity_profile(&stack.view())
            }
            ndim => {
                return Err(invalid_array_data(
                    path,
                    &format!("expected a 1D focus curve or a 3D stack, found {ndim} dimensions"),
                ));
            }
        };

        let range = find_in_focus_indices(&curve.view(), bottom, top)?;
        let clamped = range.clamp(curve.len());
        writeln!(
            out,
            "in-focus range {}..{} (slices {}..{} of {})",
            range.low,
            range.high,
            clamped.start,
            clamped.end,
            curve.len()
        )
        .map_err(output_error)
    }
}

fn load_known_format(path: &Path) -> Result<ArrayD<f64>> {
    let format = ArrayFormat::from_path(path).ok_or_else(|| {
        invalid_parameter(
            "path",
            &path.display(),
            &"expected a .npy, .tif, .tiff or .png file",
        )
    })?;
    load_array(path, format)
}

fn output_error(e: std::io::Error) -> crate::io::error::DatasetError {
    file_system("<output>", "write output")(e)
}
