use crate::config::Config;
use crate::error::{ImageGenError, Result};
use crate::gallery::{self, GalleryStore};
use crate::generation::{BatchRequester, GenerationRequest};
use crate::models::{AspectRatio, DateFilter, ImageStyle};
use crate::provider::GeminiClient;
use crate::session::Session;
use crate::storage::FileStore;
use crate::utils::{create_spinner, load_reference_image, print_records, read_prompts};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "imagegen", version, about = "Generate images from prompts and keep a local gallery")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate images for one prompt.
    Single {
        prompt: String,
        #[command(flatten)]
        options: GenerateOptions,
    },
    /// Generate images for every line of a prompt file (`-` reads stdin).
    Bulk {
        source: String,
        #[command(flatten)]
        options: GenerateOptions,
    },
    /// List gallery images.
    List {
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(short, long, value_enum, default_value_t = DateFilter::All)]
        date: DateFilter,
    },
    /// Delete a gallery image.
    Delete { id: String },
    /// Write a gallery image to disk.
    Download {
        id: String,
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
    /// Show the available styles and aspect ratios.
    Styles,
}

#[derive(Debug, Args)]
pub struct GenerateOptions {
    /// Images per prompt (1-4); ignored with a reference image.
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: u8,
    #[arg(short, long, value_enum, default_value_t = AspectRatio::Square)]
    pub aspect_ratio: AspectRatio,
    #[arg(short, long, value_enum, default_value_t = ImageStyle::None)]
    pub style: ImageStyle,
    /// Reference image to edit instead of generating from text alone.
    #[arg(short, long)]
    pub reference: Option<PathBuf>,
}

impl GenerateOptions {
    async fn apply(&self, request: GenerationRequest) -> Result<GenerationRequest> {
        let reference = match &self.reference {
            Some(path) => Some(load_reference_image(path).await?),
            None => None,
        };
        Ok(request
            .with_images_per_prompt(self.count)
            .with_aspect_ratio(self.aspect_ratio)
            .with_style(self.style)
            .with_reference_image(reference))
    }
}

pub async fn build_session(config: &Config) -> Result<Session> {
    let provider = GeminiClient::new(config)?;
    let requester = BatchRequester::new(Arc::new(provider));
    let mut gallery = GalleryStore::new(Arc::new(FileStore::new(&config.gallery_dir)));
    gallery.load().await;
    Ok(Session::new(requester, gallery))
}

pub async fn process_command(session: &Session, command: Command) -> Result<()> {
    match command {
        Command::Single { prompt, options } => {
            let request = options.apply(GenerationRequest::single(prompt)).await?;
            generate(session, &request).await
        }
        Command::Bulk { source, options } => {
            let prompts = read_prompts(&source).await?;
            let request = options.apply(GenerationRequest::bulk(prompts)).await?;
            generate(session, &request).await
        }
        Command::List { search, date } => {
            let gallery = session.gallery().await;
            if gallery.is_empty() {
                println!("{}", "Your gallery is empty.".yellow());
                return Ok(());
            }
            let records = gallery.filter(&search, date);
            println!("{}", format!("Gallery ({})", gallery.len()).bold());
            if records.is_empty() {
                println!("{}", "No images found. Try adjusting your search or date filter.".yellow());
            } else {
                print_records(&records);
            }
            Ok(())
        }
        Command::Delete { id } => {
            if session.gallery().await.delete(&id).await {
                println!("Deleted {}", id.cyan());
            } else {
                println!("{}", format!("No image with id {}", id).yellow());
            }
            Ok(())
        }
        Command::Download { id, dir } => {
            let store = session.gallery().await;
            let record = store
                .get(&id)
                .ok_or_else(|| ImageGenError::NotFound(id.clone()))?;
            let path = gallery::download(record, &dir).await?;
            println!("Saved {}", path.display().to_string().green());
            Ok(())
        }
        Command::Styles => {
            println!("{}", "Styles:".bold());
            for style in ImageStyle::ALL {
                println!("  {}", style.label());
            }
            println!("{}", "Aspect ratios:".bold());
            for ratio in AspectRatio::ALL {
                println!("  {}", ratio);
            }
            Ok(())
        }
    }
}

async fn generate(session: &Session, request: &GenerationRequest) -> Result<()> {
    let spinner = create_spinner(
        if request.is_edit() { "magenta" } else { "green" },
        format!("Generating {} image(s)...", request.total_images()),
    );
    let outcome = session.submit(request).await;
    spinner.finish_and_clear();

    let records = outcome?;
    println!(
        "{}",
        format!("Generated {} image(s)", records.len()).bold().green()
    );
    print_records(&records.iter().collect::<Vec<_>>());
    Ok(())
}
