//! Command-line front end: move the content of one deck into another deck's
//! template.
//!
//! # Usage
//!
//! ```sh
//! slidegraft content.pptx template.pptx
//! slidegraft content.pptx template.pptx -o out.pptx --keep-groups -v
//! ```
//!
//! Logging goes to stderr. The default filter is `warn`; `-v` raises it to
//! `info`, `-vv` to `debug`, and `RUST_LOG` overrides both.

use clap::Parser;
use slidegraft::transfer::{RecenterOutcome, TransferReport};
use slidegraft::{TransferOptions, transfer_files};
use std::path::PathBuf;

/// Transplant slide content into a PowerPoint template
#[derive(Parser, Debug)]
#[command(
    name = "slidegraft",
    about = "Move the shapes and pictures of a presentation onto another presentation's template",
    long_about = "Copies every slide of CONTENT onto the slide layout of TEMPLATE.\n\
                  Groups are flattened, pictures are re-embedded, and the content of each\n\
                  slide is centered on the template canvas. TEMPLATE's own slides are dropped.",
    version
)]
struct Args {
    /// Presentation whose slides are copied
    #[arg(value_name = "CONTENT")]
    content: PathBuf,

    /// Presentation providing the layout, theme and slide size
    #[arg(value_name = "TEMPLATE")]
    template: PathBuf,

    /// Output file
    #[arg(
        short,
        long,
        value_name = "OUTPUT",
        default_value = "Processed_Presentation.pptx"
    )]
    output: PathBuf,

    /// Copy group shapes as they are instead of flattening them
    #[arg(long)]
    keep_groups: bool,

    /// Leave shapes at their original positions
    #[arg(long)]
    no_recenter: bool,

    /// Keep source shape ids even if they collide on the target slide
    #[arg(long)]
    keep_shape_ids: bool,

    /// Copy the layout's placeholders onto each new slide
    #[arg(long)]
    clone_placeholders: bool,

    /// More log output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let options = TransferOptions::new()
        .with_ungroup(!args.keep_groups)
        .with_recenter(!args.no_recenter)
        .with_renumber_shape_ids(!args.keep_shape_ids)
        .with_clone_layout_placeholders(args.clone_placeholders);

    match transfer_files(&args.content, &args.template, &args.output, &options) {
        Ok(report) => print_summary(&report, &args),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        },
    }
}

fn print_summary(report: &TransferReport, args: &Args) {
    for slide in &report.slides {
        let centered = match slide.recenter {
            Some(RecenterOutcome::Centered { grouped, .. }) => format!(", {} centered", grouped),
            _ => String::new(),
        };
        let dissolved = slide.ungroup.as_ref().map_or(0, |u| u.dissolved);
        println!(
            "Slide {}: {} shapes ({} pictures), {} groups dissolved{}",
            slide.index + 1,
            slide.transplant.copied,
            slide.transplant.pictures,
            dissolved,
            centered
        );
    }

    println!("\n=== Transfer Summary ===");
    println!("Slides:  {}", report.slides.len());
    println!("Shapes:  {}", report.copied());
    println!("Skipped: {}", report.skipped());
    if report.unresolved_references() > 0 {
        println!("Unresolved references: {}", report.unresolved_references());
    }
    println!(
        "{} + {} -> {}",
        args.content.display(),
        args.template.display(),
        args.output.display()
    );
}
