use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "faceid", about = "Face identity registration and recognition")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Listen address (defaults to FACEID_LISTEN or 0.0.0.0:8000)
        #[arg(long)]
        listen: Option<String>,
    },
    /// Register a person from one or more face images
    Register {
        /// Unique person name
        name: String,
        /// Image files; each should show exactly one face
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Recognize the person in an image
    Recognize {
        image: PathBuf,
    },
    /// Delete a registered person
    Delete {
        name: String,
    },
    /// Check whether a person is registered
    Exists {
        name: String,
    },
}
