//! Ledgerflat CLI - Flatten multi-line ledger CSV exports
//!
//! # Main Commands
//!
//! ```bash
//! ledgerflat serve                        # Start HTTP server (port 3000)
//! ledgerflat format ledger.csv            # Write <timestamp>formatted.csv
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! ledgerflat columns ledger.csv           # Show interpreted columns
//! ledgerflat expand ledger.csv            # Show flat records as JSON
//! ledgerflat fields                       # Show field classification
//! ```

use clap::{Parser, Subcommand};
use ledgerflat::{
    interpret_header, parse_csv_file, models, DropResult, ServerConfig, Session,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ledgerflat")]
#[command(about = "Flatten multi-line ledger CSV exports into one row per leg", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the interpreted header columns as JSON
    Columns {
        /// Input CSV file
        input: PathBuf,
    },

    /// Expand multi-line rows and output the flat records as JSON
    Expand {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Expand and write the cleaned CSV (UTF-8 with BOM)
    Format {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: <timestamp>formatted.csv in --out-dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for the generated filename
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Show how each known field is treated
    Fields,

    /// Start HTTP server
    Serve {
        /// Port to listen on (default: LEDGERFLAT_PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Columns { input } => cmd_columns(&input),
        Commands::Expand { input, output } => cmd_expand(&input, output.as_deref()),
        Commands::Format {
            input,
            output,
            out_dir,
        } => cmd_format(&input, output.as_deref(), &out_dir),
        Commands::Fields => cmd_fields(),
        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn load(input: &Path) -> Result<DropResult, Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    let parsed = parse_csv_file(input)?;
    eprintln!("   Encoding: {}", parsed.encoding);
    eprintln!("   Rows: {}", parsed.data_row_count());
    eprintln!("   Columns: {}", parsed.headers().join(", "));

    let mut result = Session::default().on_drop(&parsed.rows);
    result.encoding = Some(parsed.encoding);

    eprintln!("\n⚙️  Expanded into {} records", result.session.records.len());
    if !result.warnings.is_empty() {
        eprintln!("   ⚠️  {} warnings:", result.warnings.len());
        for warning in result.warnings.iter().take(10) {
            eprintln!("     - {}", warning);
        }
    }

    Ok(result)
}

fn cmd_columns(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = parse_csv_file(input)?;
    let columns = interpret_header(parsed.headers());
    let json = serde_json::to_string_pretty(&columns)?;
    println!("{}", json);
    Ok(())
}

fn cmd_expand(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let result = load(input)?;
    let json = serde_json::to_string_pretty(&result.session.records)?;
    write_output(&json, output)?;
    Ok(())
}

fn cmd_format(
    input: &Path,
    output: Option<&Path>,
    out_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = load(input)?;
    let file = result.session.export(chrono::Local::now().naive_local())?;

    let path = match output {
        Some(p) => {
            fs::write(p, &file.bytes)?;
            p.to_path_buf()
        }
        None => file.write_to_dir(out_dir)?,
    };

    eprintln!("💾 Output written to: {}", path.display());
    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_fields() -> Result<(), Box<dyn std::error::Error>> {
    let mut fields: Vec<&str> = vec![models::DATE_FIELD, models::TX_HASH_FIELD];
    fields.extend(models::SPLITTABLE_FIELDS);
    fields.extend(models::UNDUPLICATABLE_FIELDS);
    fields.extend(models::LINKABLE_FIELDS);

    println!("{:<22} {:<42} {}", "FIELD", "RULE", "RENDER");
    for field in fields {
        let rule = models::FieldRule::for_field(field);
        let render = models::CellRender::for_field(field);
        println!("{:<22} {:<42} {:?}", field, rule.label(), render);
    }
    println!("\nAny other field is copied unchanged on every expanded line.");
    Ok(())
}

async fn cmd_serve(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env().with_port(port);
    ledgerflat::server::start_server(config).await?;
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
