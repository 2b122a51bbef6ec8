use std::path::Path;

use anyhow::Context;
use ritescope::{BinaryImage, ParseConfig};

use crate::app::GlobalOptions;

/// Load an image, honoring `--strict`.
pub fn load_image(path: &Path, opts: &GlobalOptions) -> anyhow::Result<BinaryImage> {
    let config = if opts.strict {
        ParseConfig::strict()
    } else {
        ParseConfig::default()
    };

    BinaryImage::from_file_with(path, &config)
        .with_context(|| format!("failed to load image: {}", path.display()))
}

/// Extract a display-friendly filename from a path.
pub fn file_display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    )
}

/// Format an image offset the way every command prints them.
pub fn hex_offset(offset: usize) -> String {
    format!("0x{offset:06X}")
}
