//! Diary CLI - Command-line interface for keeping a diary
//!
//! Write, browse, edit and delete entries with attached pictures.

mod cli;
mod commands;
mod error;

#[cfg(test)]
mod tests;

use clap::{CommandFactory, Parser};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::common::{open_editor, resolve_config};
use crate::commands::delete::run_delete;
use crate::commands::edit::{run_edit, EditRequest};
use crate::commands::list::run_list;
use crate::commands::show::run_show;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let directive = "diary=info"
        .parse::<Directive>()
        .map_err(|error| CliError::Logging(error.to_string()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = resolve_config(cli.config.as_deref(), cli.db_path, cli.images_dir)?;
    let editor = open_editor(&config).await?;

    match command {
        Commands::Add {
            title,
            content,
            images,
        } => run_add(&title, content, &images, &editor).await?,
        Commands::List { limit, json } => run_list(limit, json, &editor).await?,
        Commands::Show { id, json } => run_show(&id, json, &editor).await?,
        Commands::Edit {
            id,
            title,
            content,
            add_images,
            remove_images,
        } => {
            let request = EditRequest {
                title,
                content,
                add_images,
                remove_images,
            };
            run_edit(&id, request, &editor).await?;
        }
        Commands::Delete { id } => run_delete(&id, &editor).await?,
    }

    Ok(())
}
