//! twocol CLI - two-column document conversion tool

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use twocol::{
    ChromiumRenderer, ColumnLayout, ConvertOptions, ConvertReport, Converter, LayoutOptions,
    OutputFormat, PageStyle,
};

#[derive(Parser)]
#[command(name = "twocol")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Reflow Word documents into a two-column layout", long_about = None)]
struct Cli {
    /// Input document
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a document to a two-column layout
    Convert {
        /// Input document (.docx, .html)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to <name>-2columns.<ext> next to the input)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format (inferred from --output when omitted)
        #[arg(short, long, value_enum)]
        format: Option<Format>,

        /// Number of columns
        #[arg(long, default_value = "2")]
        columns: u32,

        /// Gap between columns in twips (1/1440 inch), for every output format
        #[arg(long, default_value = "720")]
        gap: u32,

        /// Page size for HTML and PDF output (CSS @page size)
        #[arg(long, default_value = "A4")]
        page_size: String,

        /// Hide the rule between columns in HTML and PDF output
        #[arg(long)]
        no_rule: bool,

        /// Chrome or Chromium executable used for PDF output
        #[arg(long, env = "TWOCOL_CHROME", default_value = "chromium")]
        chrome: PathBuf,

        /// Seconds to wait for the PDF renderer
        #[arg(long, default_value = "60")]
        timeout: u64,

        /// Print the conversion report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the sections of a .docx document and their column settings
    Inspect {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Rewritten Word document
    Docx,
    /// Standalone HTML page
    Html,
    /// PDF rendered with a headless browser
    Pdf,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Docx => OutputFormat::Docx,
            Format::Html => OutputFormat::Html,
            Format::Pdf => OutputFormat::Pdf,
        }
    }
}

struct ConvertArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    format: Option<Format>,
    columns: u32,
    gap: u32,
    page_size: String,
    no_rule: bool,
    chrome: PathBuf,
    timeout: u64,
    json: bool,
}

impl ConvertArgs {
    fn simple(input: PathBuf, output: Option<PathBuf>) -> Self {
        Self {
            input,
            output,
            format: None,
            columns: 2,
            gap: 720,
            page_size: "A4".to_string(),
            no_rule: false,
            chrome: std::env::var_os("TWOCOL_CHROME")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("chromium")),
            timeout: 60,
            json: false,
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            format,
            columns,
            gap,
            page_size,
            no_rule,
            chrome,
            timeout,
            json,
        }) => {
            cmd_convert(ConvertArgs {
                input,
                output,
                format,
                columns,
                gap,
                page_size,
                no_rule,
                chrome,
                timeout,
                json,
            })
            .await
        }
        Some(Commands::Inspect { input }) => cmd_inspect(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(ConvertArgs::simple(input, cli.output)).await
            } else {
                println!("{}", "Usage: twocol <FILE> [OUTPUT]".yellow());
                println!("       twocol --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        report_error(&e);
        std::process::exit(1);
    }
}

fn report_error(err: &twocol::Error) {
    eprintln!(
        "\n{} {}",
        "Error during conversion:".red().bold(),
        err.category().red()
    );
    eprintln!("   {}", err);

    eprintln!("\n{}", "Possible solutions:".yellow().bold());
    for (i, step) in err.remediation().iter().enumerate() {
        eprintln!("   {}. {}", i + 1, step);
    }
}

fn page_width(page_size: &str) -> &'static str {
    match page_size.to_ascii_lowercase().as_str() {
        "letter" => "8.5in",
        "legal" => "8.5in",
        "a5" => "148mm",
        "a3" => "297mm",
        _ => "210mm",
    }
}

async fn cmd_convert(args: ConvertArgs) -> twocol::Result<()> {
    let format = args
        .format
        .map(OutputFormat::from)
        .or_else(|| args.output.as_deref().and_then(OutputFormat::from_path))
        .unwrap_or_default();

    let layout = LayoutOptions::new()
        .with_columns(ColumnLayout::new().with_count(args.columns).with_gap(args.gap))
        .with_page(
            PageStyle::new()
                .with_page_size(args.page_size.clone(), page_width(&args.page_size))
                .with_column_gap_twips(args.gap)
                .with_column_rule(!args.no_rule),
        );

    let mut options = ConvertOptions::new().with_layout(layout).with_format(format);
    if let Some(output) = args.output {
        options = options.with_output(output);
    }

    let renderer = ChromiumRenderer::new()
        .with_binary(args.chrome)
        .with_timeout(Duration::from_secs(args.timeout));
    let converter = Converter::new(options).with_pdf_renderer(Arc::new(renderer));

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Converting {} to {}...", args.input.display(), format));

    let result = converter.convert(&args.input).await;
    pb.finish_and_clear();
    let report = result?;

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => log::warn!("Could not serialize report: {}", e),
        }
    } else {
        print_summary(&report);
    }

    Ok(())
}

fn print_summary(report: &ConvertReport) {
    let line = "═".repeat(40);
    println!("\n{}", "Conversion completed successfully!".green().bold());
    println!("{}", line.dimmed());
    println!("{}: {}", "Original file".bold(), report.input.display());
    println!("{}: {}", "Converted file".bold(), report.output.display());
    println!(
        "{}: {:.2} KB",
        "Original size".bold(),
        report.input_size as f64 / 1024.0
    );
    println!(
        "{}: {:.2} KB",
        "New size".bold(),
        report.output_size as f64 / 1024.0
    );
    if let Some(ref sections) = report.sections {
        println!("{}: {}", "Sections modified".bold(), sections.sections);
        if sections.implicit_section {
            println!(
                "  {} no section properties found; added one for the whole body",
                "└─".dimmed()
            );
        }
    }
    println!("{}: {}", "Format".bold(), report.format.to_string().to_uppercase());
    println!("{}", line.dimmed());
}

fn cmd_inspect(input: &Path) -> twocol::Result<()> {
    let sections = twocol::inspect_file(input)?;

    println!("{}", "Section Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Sections".bold(), sections.len());
    println!();

    for section in &sections {
        println!(
            "  {} #{} bytes {}..{}: {} column(s){}",
            "├─".dimmed(),
            section.index,
            section.start,
            section.end,
            section.columns,
            if section.column_elements > 1 {
                format!(" ({} w:cols elements)", section.column_elements)
                    .yellow()
                    .to_string()
            } else {
                String::new()
            }
        );
    }

    if sections.is_empty() {
        println!(
            "  {} no section properties; one will be added on conversion",
            "└─".dimmed()
        );
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "twocol".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Two-column document conversion tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/twocol".dimmed());
    println!("License: MIT");
}
