//! Command-line surface for `postdesk`.
#![deny(clippy::all, clippy::pedantic)]

use std::fmt;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use postdesk::config::ConfigArgs;
use postdesk::domain::posts::PostStatus;

#[derive(Parser, Debug)]
#[command(
    name = "postdesk",
    version,
    about = "Admin console for marketplace listings",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Account email used to sign in
    #[arg(long, env = "POSTDESK_EMAIL", global = true)]
    pub email: Option<String>,

    /// Path to file containing the account password (takes precedence over env)
    #[arg(long, env = "POSTDESK_PASSWORD_FILE", global = true)]
    pub password_file: Option<PathBuf>,

    /// Password from env (CLI flag intentionally disabled to avoid shell history leaks)
    #[arg(long = "password-env", hide = true, env = "POSTDESK_PASSWORD", global = true)]
    pub password_env: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive dashboard (default)
    Shell,
    /// Listing management
    Posts(PostsArgs),
    /// Check that the backend is reachable
    Health,
}

#[derive(Parser, Debug)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub action: PostsCmd,
}

#[derive(Subcommand, Debug)]
pub enum PostsCmd {
    /// Show every post as a table
    List {
        /// Print raw JSON instead of the table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show counts by status
    Stats,
    /// Create a post
    Create {
        #[command(flatten)]
        fields: PostFieldArgs,
    },
    /// Update a post; omitted fields keep their current values
    Update {
        id: i64,
        #[command(flatten)]
        fields: PostFieldArgs,
    },
    /// Delete a post
    Delete {
        id: i64,
        /// Confirm the deletion
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}

/// Editable fields shared by create, update and the shell's `save`.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFieldArgs {
    #[arg(long = "post-id")]
    pub post_id: Option<String>,
    #[arg(long)]
    pub platform: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub status: Option<PostStatusArg>,
    /// Image file (png, jpg, jpeg, gif, webp)
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PostStatusArg {
    Available,
    OnHold,
    Sold,
}

impl fmt::Display for PostStatusArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            PostStatusArg::Available => "available",
            PostStatusArg::OnHold => "on-hold",
            PostStatusArg::Sold => "sold",
        };
        f.write_str(value)
    }
}

impl From<PostStatusArg> for PostStatus {
    fn from(value: PostStatusArg) -> Self {
        match value {
            PostStatusArg::Available => PostStatus::Available,
            PostStatusArg::OnHold => PostStatus::OnHold,
            PostStatusArg::Sold => PostStatus::Sold,
        }
    }
}
