use anyhow::{Context, Result};
use clap::Parser;
use image::ImageReader;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use scan_cropper::{process_scan, Cli, PipelineConfig, RunTotals};

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

fn main() -> Result<()> {
    let cli = Cli::parse();

    fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", cli.output_dir))?;

    let config = PipelineConfig {
        blur_kernel: cli.blur,
        threshold: cli.thresh,
        photos_per_scan: cli.photos_per_scan,
        verbose: cli.verbose,
    };

    let files = list_scan_files(&cli.input_dir)?;
    let mut totals = RunTotals::default();

    for path in &files {
        eprintln!("{}", path.file_name().unwrap_or_default().to_string_lossy());

        let decoded = ImageReader::open(path)
            .map_err(anyhow::Error::from)
            .and_then(|reader| reader.decode().map_err(anyhow::Error::from));
        let img = match decoded {
            Ok(img) => img.to_rgb8(),
            Err(err) => {
                eprintln!(
                    "Error: Failed to open image at path {}: {err}",
                    path.display()
                );
                totals.record_error();
                continue;
            }
        };

        let outcome = process_scan(&img, &config);

        for (index, crop) in outcome.crops.iter().enumerate() {
            let out_path = cli.output_dir.join(cli.output_name(path, index));
            match crop.save(&out_path) {
                Ok(()) => eprintln!("Wrote image to: {}", out_path.display()),
                Err(err) => {
                    eprintln!(
                        "Error: Failed to write image {}: {err}",
                        out_path.display()
                    );
                    totals.record_error();
                }
            }
        }

        totals.absorb(&outcome);
    }

    eprintln!();
    eprintln!("-----------------------------------------------------");
    if totals.errors > 0 {
        eprintln!(
            "Encountered {} errors and warnings while cropping the scan files.",
            totals.errors
        );
    } else {
        eprintln!("Successfully cropped all the images from the scan files.");
    }
    eprintln!(
        "Cropped {} pictures from {} scan files.",
        totals.scans, totals.images
    );

    Ok(())
}

/// List the image files in the input directory, sorted for a deterministic
/// processing order.
fn list_scan_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read input directory: {:?}", dir))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(OsStr::to_str)
                .is_some_and(|ext| {
                    IMAGE_EXTENSIONS
                        .iter()
                        .any(|known| ext.eq_ignore_ascii_case(known))
                })
        })
        .collect();
    files.sort();

    Ok(files)
}
