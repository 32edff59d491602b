use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use pdf_images::{
    ExportCoordinator, ExportError, ExportOptions, ImageCollection, ImageEntry, ImageId, Rotation,
};
use std::path::PathBuf;

mod logger;

use logger::AppLogger;

#[derive(Parser)]
#[command(name = "pdfi", about = "Combine images into a PDF, one page per image", version)]
struct Cli {
    /// Log every page and skipped file
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a PDF from images, each page sized to its image
    Convert {
        /// Input image files, in page order
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Rotate an image clockwise, as POSITION=DEGREES (1-based, e.g. 2=90)
        #[arg(short, long = "rotate", value_parser = parse_rotation)]
        rotations: Vec<(usize, Rotation)>,

        /// New page order as 1-based positions (e.g. 3,1,2); positions left out are dropped
        #[arg(long, value_delimiter = ',')]
        order: Option<Vec<usize>>,

        /// Output file name without extension (default: document)
        #[arg(short, long)]
        name: Option<String>,

        /// Output directory
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Document title
        #[arg(long)]
        title: Option<String>,

        /// Load export options from a JSON file; flags take precedence
        #[arg(long)]
        config: Option<PathBuf>,

        /// Save the effective export options to a JSON file
        #[arg(long)]
        save_config: Option<PathBuf>,
    },

    /// Show the page sizes of a PDF in pixels
    Inspect {
        /// PDF file to inspect
        input: PathBuf,
    },
}

fn parse_rotation(arg: &str) -> std::result::Result<(usize, Rotation), String> {
    let (position, degrees) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected POSITION=DEGREES, got '{arg}'"))?;
    let position: usize = position
        .trim()
        .parse()
        .map_err(|e| format!("invalid position '{position}': {e}"))?;
    if position == 0 {
        return Err("positions start at 1".to_string());
    }
    let degrees: u32 = degrees
        .trim()
        .parse()
        .map_err(|e| format!("invalid degrees '{degrees}': {e}"))?;
    let rotation = Rotation::from_degrees(degrees).map_err(|e| e.to_string())?;
    Ok((position, rotation))
}

/// Id of the image decoded from the 1-based input `position`
fn input_id(input_ids: &[Option<ImageId>], position: usize) -> std::result::Result<ImageId, String> {
    match position.checked_sub(1).and_then(|i| input_ids.get(i)) {
        Some(Some(id)) => Ok(*id),
        Some(None) => Err(format!("Input {position} was skipped")),
        None => Err(format!("No input at position {position}")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let logger = AppLogger::new(500, level);
    logger.clone().init()?;

    match cli.command {
        Commands::Convert {
            inputs,
            rotations,
            order,
            name,
            out_dir,
            title,
            config,
            save_config,
        } => {
            let mut options = match &config {
                Some(path) => ExportOptions::load(path).await?,
                None => ExportOptions::default(),
            };
            if let Some(name) = name {
                options.file_name = name;
            }
            if let Some(out_dir) = out_dir {
                options.output_dir = out_dir;
            }
            if let Some(title) = title {
                options.title = title;
            }
            options.validate()?;
            if let Some(path) = &save_config {
                options.save(path).await?;
            }

            let slots = pdf_images::decode_inputs(&inputs).await;
            for (i, (path, slot)) in inputs.iter().zip(&slots).enumerate() {
                match slot {
                    Some(entry) => println!(
                        "  {}. {} ({}x{})",
                        i + 1,
                        entry.name(),
                        entry.source().width,
                        entry.source().height
                    ),
                    None => println!("  {}. {} (skipped)", i + 1, path.display()),
                }
            }

            // Positions refer to the inputs as given, skipped ones included
            let input_ids: Vec<Option<ImageId>> = slots
                .iter()
                .map(|slot| slot.as_ref().map(ImageEntry::id))
                .collect();
            let mut collection = ImageCollection::new();
            collection.append(slots.into_iter().flatten());

            for (position, rotation) in rotations {
                match input_id(&input_ids, position) {
                    Ok(id) => {
                        for _ in 0..rotation.degrees() / 90 {
                            collection.rotate(id);
                        }
                    }
                    Err(reason) => log::warn!("{reason}, rotation ignored"),
                }
            }

            if let Some(order) = order {
                let new_order: Vec<_> = order
                    .iter()
                    .filter_map(|&position| match input_id(&input_ids, position) {
                        Ok(id) => Some(id),
                        Err(reason) => {
                            log::warn!("{reason}, ignored in --order");
                            None
                        }
                    })
                    .collect();
                collection.reorder(&new_order);
            }

            let coordinator = ExportCoordinator::new();
            let outcome = match coordinator
                .export(&collection, &options, |done, total| {
                    log::debug!("Processing... {done}/{total}");
                })
                .await
            {
                Ok(outcome) => outcome,
                Err(ExportError::NothingToExport) => bail!("No images uploaded."),
                Err(e) => return Err(e.into()),
            };

            println!(
                "Generated {} pages → {}",
                outcome.page_count,
                outcome.path.display()
            );

            let warnings = logger.warning_count();
            if warnings > 0 {
                println!("  {warnings} warning(s), see log above");
            }
        }

        Commands::Inspect { input } => {
            let pages = pdf_images::inspect_pdf(&input).await?;
            println!("{}: {} pages", input.display(), pages.len());
            for (i, page) in pages.iter().enumerate() {
                println!(
                    "  Page {}: {} x {} px ({})",
                    i + 1,
                    page.width,
                    page.height,
                    page.orientation.name()
                );
            }
        }
    }

    Ok(())
}
