use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use pitchdeck_api::ApiClient;
use pitchdeck_common::{Industry, Persona, UseCase};
use pitchdeck_core::{Config, ConnectionState, DeckController, Logo};

#[derive(Parser)]
#[command(name = "pitchdeck")]
#[command(about = "Generate AI-personalized sales decks from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Override the backend origin (default: the hosted service)
    #[arg(long)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive form in the terminal
    Interactive,
    /// Check whether the backend is reachable
    Health,
    /// Generate a deck and download it
    Generate {
        /// Company name
        #[arg(long)]
        company: String,
        /// Industry (e.g. "Healthcare", "Technology/Software")
        #[arg(long)]
        industry: Industry,
        /// Target buyer persona; repeat for multiple
        #[arg(long = "persona", required = true)]
        personas: Vec<Persona>,
        /// Main pain point to address (a sensible default is used if omitted)
        #[arg(long)]
        pain_point: Option<String>,
        /// Use case (e.g. "Product Demo", "Fundraising Presentation")
        #[arg(long)]
        use_case: UseCase,
        /// Path to a logo image (PNG/JPG, max 5MB)
        #[arg(long)]
        logo: Option<PathBuf>,
        /// Directory to save the deck into (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the handle but skip the download
        #[arg(long)]
        no_download: bool,
    },
    /// Download a previously generated deck by file id
    Download {
        /// File id from a generate response
        file_id: String,
        /// Filename to save as
        #[arg(long, default_value = "deck.pptx")]
        filename: String,
        /// Directory to save into (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        std::env::set_var("RUST_LOG", "debug");
    }

    if let Some(url) = &cli.api_url {
        std::env::set_var("PITCHDECK_API_URL", url);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    let api = ApiClient::new(config.api_url);

    match cli.command {
        Some(Commands::Interactive) | None => {
            pitchdeck_tui::run_interactive(api).await?;
        }
        Some(Commands::Health) => {
            health(&api).await;
        }
        Some(Commands::Generate {
            company,
            industry,
            personas,
            pain_point,
            use_case,
            logo,
            output,
            no_download,
        }) => {
            generate(
                &api, company, industry, personas, pain_point, use_case, logo, output,
                no_download,
            )
            .await?;
        }
        Some(Commands::Download {
            file_id,
            filename,
            output,
        }) => {
            download(&api, &file_id, &filename, output).await?;
        }
    }

    Ok(())
}

async fn health(api: &ApiClient) {
    match ConnectionState::check(api).await {
        ConnectionState::Connected { last_checked } => {
            println!("Backend connected ({})", api.base_url());
            println!("Last checked: {}", last_checked.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        _ => {
            println!("Unable to reach backend at: {}", api.base_url());
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn generate(
    api: &ApiClient,
    company: String,
    industry: Industry,
    personas: Vec<Persona>,
    pain_point: Option<String>,
    use_case: UseCase,
    logo: Option<PathBuf>,
    output: Option<PathBuf>,
    no_download: bool,
) -> Result<()> {
    let mut controller = DeckController::new();
    controller.form.company_name = company;
    controller.form.industry = Some(industry);
    controller.form.use_case = Some(use_case);
    controller.form.pain_point = pain_point.unwrap_or_default();
    for persona in personas {
        if !controller.form.has_persona(persona) {
            controller.form.toggle_persona(persona);
        }
    }
    if let Some(path) = logo {
        controller.form.logo = Some(Logo::from_path(&path).await?);
    }

    println!("Generating deck for {}...", controller.form.company_name);
    controller.submit(api).await?;
    let handle = controller
        .handle()
        .context("submit succeeded but no handle was recorded")?;

    println!("Deck ready: {} ({} slides)", handle.filename, handle.slides_generated);
    println!("File id: {}", handle.file_id);
    println!("Download link expires: {}", handle.expires_at.format("%Y-%m-%d %H:%M:%S UTC"));

    if no_download {
        return Ok(());
    }

    let dir = match output {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let path = controller.download(api, &dir).await?;
    println!("Saved to: {}", path.display());
    Ok(())
}

async fn download(
    api: &ApiClient,
    file_id: &str,
    filename: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let bytes = api.download_deck(file_id).await?;
    let dir = match output {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let path = dir.join(filename);
    tokio::fs::write(&path, &bytes).await?;
    println!("Saved to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_args_parse_vocab_labels() -> Result<()> {
        let cli = Cli::try_parse_from([
            "pitchdeck",
            "generate",
            "--company",
            "Acme Corp",
            "--industry",
            "Healthcare",
            "--persona",
            "CEO/Founder",
            "--persona",
            "CFO",
            "--use-case",
            "Product Demo",
            "--no-download",
        ])?;

        match cli.command {
            Some(Commands::Generate {
                company,
                industry,
                personas,
                use_case,
                no_download,
                ..
            }) => {
                assert_eq!(company, "Acme Corp");
                assert_eq!(industry, Industry::Healthcare);
                assert_eq!(personas, vec![Persona::CeoFounder, Persona::Cfo]);
                assert_eq!(use_case, UseCase::ProductDemo);
                assert!(no_download);
            }
            _ => anyhow::bail!("expected generate subcommand"),
        }
        Ok(())
    }

    #[test]
    fn generate_requires_at_least_one_persona() {
        let result = Cli::try_parse_from([
            "pitchdeck",
            "generate",
            "--company",
            "Acme",
            "--industry",
            "Healthcare",
            "--use-case",
            "Product Demo",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_industry_is_rejected_at_parse_time() {
        let result = Cli::try_parse_from([
            "pitchdeck",
            "generate",
            "--company",
            "Acme",
            "--industry",
            "Astrology",
            "--persona",
            "CFO",
            "--use-case",
            "Product Demo",
        ]);
        assert!(result.is_err());
    }
}
