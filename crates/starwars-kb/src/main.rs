//! Star Wars character catalog CLI
//!
//! Loads the sample dataset into Stardog, lists characters and applies edits.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use starwars_kb::{
    init_tracing, CatalogView, CharacterCatalog, CharacterDraft, CharacterField, DatasetLoader,
    EditIntent, StardogHttpClient, StatementBuilder, StoreConfig, TableDataAvailability,
    TraceContext, WriteOutcome, COLUMNS,
};

const BUNDLED_DATASET: &str = include_str!("../data/starwars.ttl");

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recreate the database from a Turtle file (defaults to the bundled dataset)
    Load {
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Print the character table
    List,
    /// Add a character
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        kind: String,
        #[arg(long)]
        id: String,
        #[arg(long)]
        home_planet: Option<String>,
        /// Comma-separated movie names
        #[arg(long, default_value = "")]
        movies: String,
    },
    /// Remove the character with the given id
    Remove {
        #[arg(long)]
        id: i64,
    },
    /// Change one field (id, name, kind, homePlanet) of a character
    Edit {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        field: CharacterField,
        #[arg(long)]
        value: String,
    },
    /// Replace the movie list of a character
    Movies {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = StoreConfig::load().context("Failed to load store configuration")?;
    init_tracing(&config.log_level);

    let client = Arc::new(StardogHttpClient::new(&config).context("Failed to create Stardog client")?);
    let builder = StatementBuilder::new(config.vocabulary()?);
    let catalog = CharacterCatalog::new(client.clone(), config.database.clone(), builder);
    let trace_ctx = TraceContext::new_root();

    info!(trace_id = %trace_ctx.trace_id, command = ?args.command, "Running command");

    match args.command {
        Command::Load { data } => {
            let turtle = match data {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read dataset {}", path.display()))?,
                None => BUNDLED_DATASET.to_string(),
            };

            DatasetLoader::new(client.clone(), client)
                .load(&trace_ctx, &config.database, &turtle)
                .await
                .context("Failed to load dataset")?;
            println!("Created {}.\n", config.database);

            catalog.refresh(&trace_ctx.new_child()).await.context("Failed to read characters")?;
        }
        Command::List => {
            catalog.refresh(&trace_ctx).await.context("Failed to read characters")?;
        }
        Command::Add { name, kind, id, home_planet, movies } => {
            let intent = EditIntent::Create(CharacterDraft { name, kind, id, home_planet, movies });
            apply(&catalog, &trace_ctx, &intent).await?;
        }
        Command::Remove { id } => {
            apply(&catalog, &trace_ctx, &EditIntent::Delete { id }).await?;
        }
        Command::Edit { id, field, value } => {
            catalog.refresh(&trace_ctx).await.context("Failed to read characters")?;
            let intent = catalog
                .field_edit(id, field, value)
                .ok_or_else(|| anyhow!("No character with id {}", id))?;
            apply(&catalog, &trace_ctx.new_child(), &intent).await?;
        }
        Command::Movies { id, value } => {
            catalog.refresh(&trace_ctx).await.context("Failed to read characters")?;
            let intent = catalog
                .movies_edit(id, value)
                .ok_or_else(|| anyhow!("No character with id {}", id))?;
            apply(&catalog, &trace_ctx.new_child(), &intent).await?;
        }
    }

    print_table(&catalog.snapshot());
    Ok(())
}

async fn apply(catalog: &CharacterCatalog, trace_ctx: &TraceContext, intent: &EditIntent) -> Result<()> {
    let outcome = catalog
        .apply_and_refresh(trace_ctx, intent)
        .await
        .with_context(|| format!("Failed to {}", intent.label().replace('_', " ")))?;

    match outcome {
        WriteOutcome::Applied { statement } => println!("Applied:\n{}", statement),
        WriteOutcome::Unchanged => {
            println!("Nothing to change.\n");
            // Unchanged edits skip the refresh; make sure there is a table to show.
            if catalog.status() != TableDataAvailability::Loaded {
                catalog.refresh(&trace_ctx.new_child()).await.context("Failed to read characters")?;
            }
        }
    }
    Ok(())
}

fn print_table(view: &CatalogView) {
    match view.status {
        TableDataAvailability::Loaded => {}
        TableDataAvailability::Failed => {
            println!("Characters could not be loaded: {}", view.failure.as_deref().unwrap_or("unknown error"));
            return;
        }
        TableDataAvailability::NotRequested | TableDataAvailability::Loading => {
            println!("Characters not loaded.");
            return;
        }
    }

    let rows: Vec<Vec<String>> = view
        .records
        .iter()
        .map(|record| {
            COLUMNS
                .iter()
                .map(|column| record.cell_text(column.selector).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = COLUMNS
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.label.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = COLUMNS
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{:<width$}", column.label, width = width))
        .collect();
    println!("{}", header.join(" | "));
    println!("{}", widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-"));

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        println!("{}", cells.join(" | "));
    }
}
