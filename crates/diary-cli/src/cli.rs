use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "diary")]
#[command(about = "Keep a diary with pictures from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Directory that receives copied images
    #[arg(long, global = true, value_name = "DIR")]
    pub images_dir: Option<PathBuf>,

    /// JSON config file (defaults to the data directory's config.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a new entry
    #[command(alias = "new")]
    Add {
        /// Entry title
        #[arg(short, long)]
        title: String,
        /// Entry text (read from piped stdin when omitted)
        #[arg(short, long)]
        content: Option<String>,
        /// Image to attach; repeat for more
        #[arg(short, long = "image", value_name = "PATH")]
        images: Vec<String>,
    },
    /// List entries, newest first
    List {
        /// Number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one entry with its images
    Show {
        /// Entry ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an existing entry
    Edit {
        /// Entry ID
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New text
        #[arg(short, long)]
        content: Option<String>,
        /// Image to attach; repeat for more
        #[arg(long = "add-image", value_name = "PATH")]
        add_images: Vec<String>,
        /// Attached image to drop, by locator or file name; repeat for more
        #[arg(long = "remove-image", value_name = "LOCATOR")]
        remove_images: Vec<String>,
    },
    /// Delete an entry and its images
    Delete {
        /// Entry ID
        id: String,
    },
}
