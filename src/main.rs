// ABOUTME: Main entry point for the markdeck program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use clap::{Args, Parser, Subcommand};
use markdeck::{Config, Presentation};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the slide fragment for embedding
    Render(RenderArgs),

    /// Write a self-contained static copy of the deck
    Export(ExportArgs),

    /// Print the deck to a PDF file
    Pdf(PdfArgs),

    /// List the source documents in compile order
    Files(PresentationArg),
}

#[derive(Args)]
struct PresentationArg {
    /// Presentation directory
    #[arg(default_value = ".")]
    dir: PathBuf,
}

#[derive(Args)]
struct RenderArgs {
    #[command(flatten)]
    presentation: PresentationArg,

    /// Write the fragment to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    presentation: PresentationArg,

    /// Output directory (defaults to the presentation's static directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Distribution directory containing js/ and css/
    #[arg(long)]
    assets: Option<PathBuf>,
}

#[derive(Args)]
struct PdfArgs {
    #[command(flatten)]
    presentation: PresentationArg,

    /// Output PDF path (defaults to <name>.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Page width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Page height in pixels
    #[arg(long)]
    height: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Some(Commands::Render(args)) => {
            let presentation =
                Presentation::open(&args.presentation.dir, config.compiler_options())?;
            let html = presentation.render()?;
            match args.output {
                Some(path) => markdeck::html::write_html_to_file(&html, &path)?,
                None => print!("{}", html),
            }
        }
        Some(Commands::Export(args)) => {
            let mut options = config.compiler_options();
            if args.assets.is_some() {
                options.assets_dir = args.assets;
            }
            let presentation = Presentation::open(&args.presentation.dir, options)?;
            let summary = presentation.export(args.output.as_deref())?;
            println!(
                "Exported {} slides to {:?}",
                summary.slide_count, summary.output_dir
            );
        }
        Some(Commands::Pdf(args)) => {
            let presentation =
                Presentation::open(&args.presentation.dir, config.compiler_options())?;
            let renderer = markdeck::pdf::default_renderer(config.pdf_config(args.width, args.height))?;
            let output = args
                .output
                .unwrap_or_else(|| PathBuf::from(presentation.pdf_file_name()));
            let written = presentation.pdf(renderer.as_ref(), &output)?;
            println!("PDF generated successfully: {:?}", written);
        }
        Some(Commands::Files(args)) => {
            let presentation = Presentation::open(&args.dir, config.compiler_options())?;
            let manifest = presentation.manifest()?;
            if !manifest.is_configured() {
                eprintln!("No manifest found in {:?}", presentation.root());
            }
            for file in presentation.source_files()? {
                let relative = file.strip_prefix(presentation.root()).unwrap_or(&file);
                println!("{}", relative.display());
            }
        }
        None => {
            println!("No command specified. Use --help for usage information.");
        }
    }

    Ok(())
}
