use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use paperlens_core::{Config, OpenAiClient, Orchestrator, config_file};
use paperlens_pdf_mupdf::MupdfBackend;

mod output;

use output::ColorMode;

/// PaperLens - Segment, summarise and translate research papers with an LLM
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Write the JSON result to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download a PDF and split it into titled sections
    Paper {
        /// URL of the PDF
        url: String,

        /// Target language (accepted, but sections are never translated)
        #[arg(long)]
        language: Option<String>,
    },

    /// Print the raw text extracted from a PDF
    Text {
        /// URL of the PDF
        url: String,
    },

    /// Summarise a whole paper from a text file ("-" reads stdin)
    Summary {
        file: PathBuf,

        /// Translate the result into this language
        #[arg(long)]
        language: Option<String>,
    },

    /// Analyze one section from a text file ("-" reads stdin)
    Section {
        file: PathBuf,

        /// "summary" or "references"
        #[arg(long, default_value = "summary")]
        analysis_type: String,

        /// Translate the result into this language
        #[arg(long)]
        language: Option<String>,
    },

    /// Check whether a model API key is configured
    CheckKey,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paperlens_core=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let color = ColorMode(!cli.no_color);
    let config = Arc::new(config_file::resolve(&config_file::load_config(), |key| {
        std::env::var(key).ok()
    }));

    let mut stderr = std::io::stderr();
    match run(cli, config, color).await {
        Ok(()) => Ok(()),
        Err(e) => {
            output::print_error(&mut stderr, &format!("{e:#}"), color)?;
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli, config: Arc<Config>, color: ColorMode) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let out = cli.output.as_deref();

    let http = reqwest::Client::new();
    let model = Arc::new(OpenAiClient::from_config(&config).with_http_client(http.clone()));
    let orchestrator =
        Orchestrator::new(config, model, Arc::new(MupdfBackend::new())).with_http_client(http);

    let result = match cli.command {
        Command::Paper { url, language } => {
            output::print_status(&mut stderr, &format!("Analyzing {url}..."), color)?;
            serde_json::to_value(orchestrator.analyze_paper(&url, language.as_deref()).await?)?
        }
        Command::Text { url } => {
            let text = orchestrator.fetch_full_text(&url).await?;
            match out {
                Some(path) => std::fs::write(path, text)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => print!("{text}"),
            }
            return Ok(());
        }
        Command::Summary { file, language } => {
            let text = read_input(&file)?;
            output::print_status(&mut stderr, "Summarising paper...", color)?;
            serde_json::to_value(
                orchestrator
                    .overall_summary(&text, language.as_deref())
                    .await?,
            )?
        }
        Command::Section {
            file,
            analysis_type,
            language,
        } => {
            let text = read_input(&file)?;
            output::print_status(
                &mut stderr,
                &format!("Running {analysis_type} analysis..."),
                color,
            )?;
            serde_json::to_value(
                orchestrator
                    .analyze_section(&text, &analysis_type, language.as_deref())
                    .await?,
            )?
        }
        Command::CheckKey => {
            let Some(key) = orchestrator.config().api_key.as_deref() else {
                anyhow::bail!("No API key found (set OPENAI_API_KEY)");
            };
            let prefix: String = key.chars().take(6).collect();
            output::print_success(&mut stdout, &format!("API key found: {prefix}..."), color)?;
            return Ok(());
        }
    };

    output::write_json(&mut stdout, &result, out)?;
    if let Some(path) = out {
        output::print_success(&mut stderr, &format!("Wrote {}", path.display()), color)?;
    }
    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}
