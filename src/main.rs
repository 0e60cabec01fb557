//! # Lucero CLI
//!
//! Command-line interface for QR code generation.
//!
//! ## Usage
//!
//! ```bash
//! # Render a QR code to a PNG file
//! lucero generate "https://example.com" --output qr.png
//!
//! # Print the symbol to the terminal
//! lucero generate "https://example.com" --format utf8
//!
//! # Embed a centered logo (forces error correction to H)
//! lucero generate "https://example.com" --logo logo.png --output qr.png
//!
//! # Run the browser form
//! lucero serve --listen 0.0.0.0:8080
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use lucero::{
    LuceroError, OutputFormat, Preview, QrForm,
    export::Export,
    logo::LogoImage,
    server::{ServerConfig, serve},
};

/// Lucero - QR code generator
#[derive(Parser, Debug)]
#[command(name = "lucero")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a QR code once and write it to a file
    Generate {
        /// Text or URL to encode
        text: String,

        /// Output file (defaults to qr-code-<timestamp>.<ext>;
        /// utf8 output without a file goes to stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Output format: png, svg or utf8
        #[arg(long, default_value = "png")]
        format: String,

        /// Pixels per module
        #[arg(long, default_value = "8")]
        scale: String,

        /// Quiet-zone width in modules (0-10)
        #[arg(long, default_value = "0")]
        margin: String,

        /// Error correction level: L, M, Q or H
        #[arg(long, default_value = "M")]
        ec: String,

        /// Symbol version 1-40 (omit for automatic)
        #[arg(long)]
        qr_version: Option<String>,

        /// Preferred mask pattern 0-7 (omit for automatic)
        #[arg(long)]
        mask: Option<String>,

        /// Module color as #RRGGBB
        #[arg(long, default_value = "#000000")]
        dark: String,

        /// Background color as #RRGGBB
        #[arg(long, default_value = "#FFFFFF")]
        light: String,

        /// Render the background fully transparent
        #[arg(long)]
        light_transparent: bool,

        /// Render the modules fully transparent
        #[arg(long)]
        dark_transparent: bool,

        /// PNG or JPEG logo to embed at the center
        #[arg(long)]
        logo: Option<PathBuf>,
    },

    /// Serve the browser form over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8080")]
        listen: String,

        /// Directory generated files are written into
        #[arg(long, default_value = "generated")]
        output_dir: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[tokio::main]
async fn run() -> Result<(), LuceroError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            text,
            output,
            format,
            scale,
            margin,
            ec,
            qr_version,
            mask,
            dark,
            light,
            light_transparent,
            dark_transparent,
            logo,
        } => {
            let format = OutputFormat::parse(&format).ok_or_else(|| {
                LuceroError::InvalidCommand(format!(
                    "Unknown output format '{}'. Use png, svg or utf8.",
                    format
                ))
            })?;

            let logo = match logo {
                Some(path) => Some(LogoImage::new(tokio::fs::read(path).await?)),
                None => None,
            };

            // Same normalization path as the form boundary, so CLI values
            // get the same bounds checks and logo policy.
            let form = QrForm {
                input: text,
                version: qr_version,
                error_correction: Some(ec),
                mask,
                output_type: None,
                light_transparent: light_transparent.then(|| "on".to_string()),
                dark_transparent: dark_transparent.then(|| "on".to_string()),
                scale: Some(scale),
                margin: Some(margin),
                light_color: Some(light),
                dark_color: Some(dark),
            };
            let request = form.normalize(logo)?;

            let preview = Preview::new();
            preview.request_render(&request).await?;
            let export = preview.export(format)?;

            match (output, export) {
                (None, Export::Text(text)) if format == OutputFormat::Utf8 => {
                    println!("{}", text);
                }
                (output, export) => {
                    let path = output.unwrap_or_else(|| {
                        PathBuf::from(format!(
                            "qr-code-{}.{}",
                            chrono::Utc::now().timestamp_millis(),
                            format.extension()
                        ))
                    });
                    tokio::fs::write(&path, export.into_bytes()).await?;
                    println!("Saved to {}", path.display());
                }
            }
        }

        Commands::Serve { listen, output_dir } => {
            serve(ServerConfig {
                listen_addr: listen,
                output_dir,
            })
            .await?;
        }
    }

    Ok(())
}
