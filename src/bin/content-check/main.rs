use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use spdlog::warn;

use content_schema::config::open_config;
use content_schema::logger::configure_logger;

use crate::check::{check_cmd, list_cmd, nav_cmd};
use crate::new_post::new_cmd;

mod check;
mod new_post;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
enum Args {
    /// Validate the front matter of every post
    Check(CheckArgs),
    /// Print the valid posts as JSON, newest first
    List(ListArgs),
    /// Print the site navigation as JSON
    Nav(NavArgs),
    /// Create a new post
    New(NewArgs),
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Content directory or single file. Defaults to the configured content_dir
    path: Option<PathBuf>,

    /// Config path
    #[arg(short, long = "config")]
    config_path: Option<PathBuf>,

    #[arg(short, long, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Also fail when drafts are present
    #[arg(long)]
    strict: bool,
}

#[derive(Parser, Debug)]
struct ListArgs {
    /// Content directory. Defaults to the configured content_dir
    path: Option<PathBuf>,

    /// Config path
    #[arg(short, long = "config")]
    config_path: Option<PathBuf>,

    /// Include drafts
    #[arg(long)]
    drafts: bool,

    /// Only posts carrying this tag
    #[arg(short, long)]
    tag: Option<String>,
}

#[derive(Parser, Debug)]
struct NavArgs {
    /// Config path
    #[arg(short, long = "config")]
    config_path: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct NewArgs {
    /// Title of the post
    #[arg(short, long)]
    title: String,

    /// Name of the author. If empty, OS user real name is being used
    #[arg(short, long, alias = "name")]
    author: Option<String>,

    /// Post generation options
    #[arg(short, long, default_value_t = PostOutput::Stdout)]
    output: PostOutput,

    /// Directory for file output. Defaults to the configured content_dir
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Config path
    #[arg(short, long = "config")]
    config_path: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    /// One line per violation
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PostOutput {
    /// Writes the new post content to the stdout
    Stdout,
    /// Writes the new post content to a file in the content directory
    File,
}

impl Display for ReportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

impl Display for PostOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PostOutput::Stdout => write!(f, "stdout"),
            PostOutput::File => write!(f, "file"),
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let config_path = match &args {
        Args::Check(a) => a.config_path.clone(),
        Args::List(a) => a.config_path.clone(),
        Args::Nav(a) => a.config_path.clone(),
        Args::New(a) => a.config_path.clone(),
    };
    let config = open_config(config_path)?;

    if let Err(err) = configure_logger(config.log.as_ref()) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    match args {
        Args::Check(args) => check_cmd(&config, args),
        Args::List(args) => list_cmd(&config, args),
        Args::Nav(_) => nav_cmd(&config),
        Args::New(args) => new_cmd(&config, args),
    }
}
