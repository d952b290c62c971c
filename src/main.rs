//! Mermaid Companion CLI
//!
//! Terminal front end for the companion core: scans files for diagram
//! references, generates insertion comments, and talks to the Mermaid Chart
//! API with the same session handling the editor integration uses. The
//! access token comes from `MERMAID_CHART_TOKEN`, standing in for the host
//! identity system.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use mermaid_companion::{
    error::{CompanionError, Result},
    host::HostIdentity,
    scanner, CompanionContext, DiagramTheme, DocumentId, Settings,
};

/// Token environment variable consulted by the terminal identity provider
const TOKEN_ENV: &str = "MERMAID_CHART_TOKEN";

#[derive(Parser)]
#[command(name = "mermaid-companion", version)]
#[command(about = "Editor companion core for the Mermaid Chart diagramming service")]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a file for embedded diagram references
    Scan {
        /// File to scan
        file: PathBuf,
    },

    /// Print the comment line that references a diagram
    Insert {
        /// Diagram document UUID
        uuid: Uuid,

        /// Declared language of the target document
        #[arg(long, default_value = "plaintext")]
        language: String,
    },

    /// List projects visible to the authenticated user
    Projects,

    /// List diagram documents in a project
    Documents {
        /// Project ID
        project_id: String,
    },

    /// Fetch the rendered SVG of a diagram to stdout
    Render {
        /// Diagram document UUID
        uuid: Uuid,

        /// Render theme (dark or light)
        #[arg(long, default_value = "dark")]
        theme: String,
    },

    /// Print the hosted-editor URL for a diagram
    EditUrl {
        /// Diagram document UUID
        uuid: Uuid,
    },
}

/// Host identity for a terminal host: the "session" is an env-var token.
/// There is no silent cache to bypass, so forced acquisition reads the same
/// variable.
struct EnvIdentity;

#[async_trait]
impl HostIdentity for EnvIdentity {
    async fn acquire_session(&self, _force_new: bool) -> Result<String> {
        std::env::var(TOKEN_ENV).map_err(|_| {
            CompanionError::Validation(format!(
                "{} is not set; export an API token to use remote commands",
                TOKEN_ENV
            ))
        })
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mermaid_companion={}", cli.log_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("mermaid-companion v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli.command).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Scan { file } => {
            let text = std::fs::read_to_string(&file)?;
            let references = scanner::scan(&text);
            if references.is_empty() {
                println!("no diagram references found");
                return Ok(());
            }
            for reference in references {
                println!(
                    "{}:{}-{}  {}",
                    reference.line + 1,
                    reference.start_col,
                    reference.end_col,
                    reference.id
                );
            }
            Ok(())
        }
        Commands::Insert { uuid, language } => {
            println!("{}", scanner::comment_line_for(&language, &uuid));
            Ok(())
        }
        Commands::Projects => {
            let ctx = context()?;
            for project in ctx.client.list_projects().await? {
                println!("{}  {}", project.id, project.title);
            }
            Ok(())
        }
        Commands::Documents { project_id } => {
            let ctx = context()?;
            for diagram in ctx.client.list_documents(&project_id).await? {
                println!(
                    "{}  {}  {}",
                    diagram.document_id,
                    diagram.version(),
                    diagram.title
                );
            }
            Ok(())
        }
        Commands::Render { uuid, theme } => {
            let theme: DiagramTheme = theme.parse()?;
            let ctx = context()?;
            let diagram = ctx.client.get_document(&DocumentId(uuid)).await?;
            let svg = ctx.client.get_rendered_output(&diagram, theme).await?;
            println!("{}", svg);
            Ok(())
        }
        Commands::EditUrl { uuid } => {
            let ctx = context()?;
            let diagram = ctx.client.get_document(&DocumentId(uuid)).await?;
            println!("{}", ctx.client.get_edit_url(&diagram).await?);
            Ok(())
        }
    }
}

fn context() -> Result<CompanionContext> {
    let settings = Settings::load()?;
    CompanionContext::with_http(settings, Arc::new(EnvIdentity))
}
