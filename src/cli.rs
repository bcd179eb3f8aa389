use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "scan-cropper")]
#[command(
    version,
    about = "Find, straighten and crop photos out of flatbed scanner images"
)]
pub struct Cli {
    /// Directory containing the scanned images to process
    #[arg(short = 'd', long = "dir")]
    pub input_dir: PathBuf,

    /// Directory to write the cropped photos to
    #[arg(short = 'o', long = "odir")]
    pub output_dir: PathBuf,

    /// Threshold for detecting photo edges; higher for brighter scans, lower for tighter cropping
    #[arg(short = 't', long = "thresh", default_value_t = 230)]
    pub thresh: u8,

    /// Median blur kernel size; must be an odd number greater than 1
    #[arg(short = 'b', long = "blur", default_value_t = 9, value_parser = parse_blur)]
    pub blur: u8,

    /// Number of photos expected per scan (advisory; detection is not capped to it)
    #[arg(short = 'i', long = "photos-per-scan", default_value_t = 1)]
    pub photos_per_scan: usize,

    /// Prefix prepended to output file names
    #[arg(short = 'p', long = "prefix", default_value = "")]
    pub prefix: String,

    /// Show detection and deskew details
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    /// Output file name for the `index`-th photo cropped out of `source`.
    /// Keeps the source extension so crops are encoded in the same format.
    pub fn output_name(&self, source: &Path, index: usize) -> String {
        let stem = source.file_stem().unwrap_or_default().to_string_lossy();
        let ext = source.extension().unwrap_or_default().to_string_lossy();
        if self.prefix.is_empty() {
            format!("{stem}_{index}.{ext}")
        } else {
            format!("{}_{stem}_{index}.{ext}", self.prefix)
        }
    }
}

fn parse_blur(s: &str) -> Result<u8, String> {
    let value: u8 = s
        .parse()
        .map_err(|_| format!("Invalid blur kernel size: {s}"))?;
    if value <= 1 || value % 2 == 0 {
        return Err("Blur kernel size must be an odd number greater than 1".to_string());
    }
    Ok(value)
}
