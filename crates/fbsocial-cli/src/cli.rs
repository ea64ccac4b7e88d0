use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fbsocial")]
#[command(
    author,
    version,
    about = "Classify Facebook Graph API responses into error categories"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a captured response read from disk
    Classify {
        /// HTTP status the response came with
        #[clap(short = 's', long = "status", default_value_t = 200)]
        status: u16,

        /// File holding the response body
        #[clap(short = 'b', long = "body")]
        body: PathBuf,

        /// Treat the request as having carried an access token
        #[clap(short = 't', long = "token-supplied")]
        token_supplied: bool,
    },

    /// GET a Graph path using FACEBOOK_* environment configuration
    Get {
        /// Object id or path, e.g. `me` or `me/friendlists`
        path: String,

        /// Do not send the configured access token
        #[clap(short = 'a', long = "anonymous")]
        anonymous: bool,
    },
}
