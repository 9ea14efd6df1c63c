//! Filename convention for raw channel images: `<identifier>_<channel>_<replicate>.tif`

use crate::io::configuration::REPLICATE_PAD_WIDTH;
use crate::io::error::{DatasetError, Result};
use regex::Regex;
use std::fmt;
use std::path::Path;

const RAW_IMAGE_PATTERN: &str = r"^(.+)_(CY\d+|DAPI|DIC)_(\d+)\.(?:tif|tiff)$";

/// Imaging channel or modality encoded in a filename
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChannelTag {
    /// Fluorescence channel; holds the digits exactly as written (`CY3`, `CY5`, `CY03`)
    Cy(String),
    /// Nuclear stain
    Dapi,
    /// Differential interference contrast
    Dic,
}

impl ChannelTag {
    /// Parse a channel tag as it appears in a filename
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "DAPI" => Some(Self::Dapi),
            "DIC" => Some(Self::Dic),
            _ => {
                let digits = tag.strip_prefix("CY")?;
                (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
                    .then(|| Self::Cy(digits.to_string()))
            }
        }
    }

    /// Whether this is a fluorescence (`CY`) channel
    pub const fn is_fluorescence(&self) -> bool {
        matches!(self, Self::Cy(_))
    }
}

impl fmt::Display for ChannelTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cy(digits) => write!(f, "CY{digits}"),
            Self::Dapi => f.write_str("DAPI"),
            Self::Dic => f.write_str("DIC"),
        }
    }
}

/// Parsed components of a raw channel image filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImageName {
    /// Sample or condition label
    pub identifier: String,
    /// Imaging channel
    pub channel: ChannelTag,
    /// Acquisition number within the identifier
    pub replicate: u32,
}

impl RawImageName {
    /// Name under which processed outputs for this channel are written
    pub fn output_name(&self) -> String {
        format!(
            "{}_{}_{}",
            self.identifier,
            self.channel,
            format_replicate(self.replicate)
        )
    }
}

/// Zero-padded replicate number as used in companion and output filenames
pub fn format_replicate(replicate: u32) -> String {
    format!("{replicate:0width$}", width = REPLICATE_PAD_WIDTH)
}

/// Compiled matcher for raw channel image filenames
#[derive(Debug, Clone)]
pub struct FileNameParser {
    pattern: Regex,
}

impl FileNameParser {
    /// Compile the raw image filename pattern
    ///
    /// # Errors
    ///
    /// Returns an error if the regular expression fails to compile
    pub fn new() -> Result<Self> {
        let pattern =
            Regex::new(RAW_IMAGE_PATTERN).map_err(|e| DatasetError::InvalidPattern {
                pattern: RAW_IMAGE_PATTERN.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { pattern })
    }

    /// Parse a bare filename
    ///
    /// Returns `None` for names outside the convention, including replicate
    /// numbers too large for `u32`.
    pub fn parse(&self, file_name: &str) -> Option<RawImageName> {
        let caps = self.pattern.captures(file_name)?;
        let identifier = caps.get(1)?.as_str().to_string();
        let channel = ChannelTag::parse(caps.get(2)?.as_str())?;
        let replicate = caps.get(3)?.as_str().parse().ok()?;

        Some(RawImageName {
            identifier,
            channel,
            replicate,
        })
    }

    /// Parse the final component of a path
    pub fn parse_path(&self, path: &Path) -> Option<RawImageName> {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| self.parse(name))
    }
}
