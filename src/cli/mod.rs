use anyhow::Context;
use clap::{Parser, Subcommand};
use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::PathBuf,
};

use crate::config::{self, OutputFormat};
use crate::domain::info::Info;
use crate::scan::{html::HtmlTokenSource, parse_head};

#[derive(Parser)]
#[command(name = "headmeta")]
#[command(version = "0.1")]
#[command(about = "Read artwork and catalog links from the <head> of a music page")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan an html page for artwork, album and artist links
    Scan {
        /// Html file to read, stdin when omitted or "-"
        path: Option<PathBuf>,

        /// Output format, overrides the config file
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
}

/// Entrypoint for CLI
pub fn run() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => config::Config::load(path)?,
        None => config::Config::default(),
    };

    match cli.command {
        Commands::Scan { path, format } => {
            let input: Box<dyn Read> = match path {
                Some(path) if path.as_os_str() != "-" => Box::new(BufReader::new(
                    File::open(&path)
                        .with_context(|| format!("Failed to open {}", path.display()))?,
                )),
                _ => Box::new(io::stdin().lock()),
            };

            let mut source = HtmlTokenSource::with_chunk_size(input, cfg.scan.chunk_size);
            let info = parse_head(&mut source).context("Failed to scan html head")?;

            println!("{}", render(&info, format.unwrap_or(cfg.output.format))?);
        }
    }

    Ok(())
}

pub fn render(info: &Info, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(info).with_context(|| "Failed to serialize info")
        }
        OutputFormat::Text => {
            let artwork = &info.artwork;
            Ok([
                format!("Artwork (http):  {}", artwork.http_url),
                format!("Artwork (https): {}", artwork.https_url),
                format!("Artwork type:    {}", artwork.mime_type),
                format!("Artwork size:    {}x{}", artwork.width, artwork.height),
                format!("Album:           {}", info.album_url),
                format!("Artist:          {}", info.artist_url),
            ]
            .join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        cli::render,
        config::OutputFormat,
        domain::info::{Artwork, Info},
    };

    fn sample() -> Info {
        Info {
            artwork: Artwork {
                http_url: "https://x/img.jpg".to_string(),
                https_url: "https://x/img.jpg".to_string(),
                mime_type: "image/jpg".to_string(),
                width: 1200,
                height: 630,
            },
            album_url: "https://x/album/651871544".to_string(),
            artist_url: "https://x/artist/158038".to_string(),
        }
    }

    #[test]
    fn renders_json() -> anyhow::Result<()> {
        let json: serde_json::Value = serde_json::from_str(&render(&sample(), OutputFormat::Json)?)?;

        assert_eq!(json["artwork"]["type"], "image/jpg");
        assert_eq!(json["artwork"]["width"], 1200);
        assert_eq!(json["album_url"], "https://x/album/651871544");
        assert_eq!(json["artist_url"], "https://x/artist/158038");
        Ok(())
    }

    #[test]
    fn renders_text() -> anyhow::Result<()> {
        let text = render(&sample(), OutputFormat::Text)?;

        assert!(text.contains("Artwork size:    1200x630"));
        assert!(text.contains("Album:           https://x/album/651871544"));
        assert_eq!(text.lines().count(), 6);
        Ok(())
    }
}
