use std::{fmt, path::PathBuf, str::FromStr};

use clap::{ArgAction, Args, Parser, Subcommand};
use url::Url;

use crate::loader::DEFAULT_SOURCE;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the publication list into a page
    Render {
        #[command(flatten)]
        input: Input,

        /// Write the page here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Only emit the error area and the publications container
        #[arg(long)]
        fragment: bool,

        /// Page title
        #[arg(long, default_value = "Publications")]
        title: String,

        /// Build the page without an error area
        #[arg(long)]
        no_error_area: bool,

        /// Exit with an error status when the list can't be loaded
        #[arg(long)]
        strict: bool,
    },
    /// Print the year groups and how many publications each holds
    Summary {
        #[command(flatten)]
        input: Input,
    },
}

#[derive(Args, Debug)]
pub struct Input {
    /// Publications JSON: an http(s) URL or a file path
    #[arg(value_name = "SRC", default_value = DEFAULT_SOURCE)]
    pub from: Source,

    /// Resolve a relative SRC against this URL and fetch it over HTTP
    #[arg(long, value_name = "URL")]
    pub base: Option<Url>,

    /// Give up on the request after this many seconds (at least 1)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

impl Input {
    pub fn source(&self) -> anyhow::Result<Source> {
        self.from.resolve(self.base.as_ref())
    }

    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.timeout.map(std::time::Duration::from_secs)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Where the publications payload comes from, which can either be
///
/// - an http(s) URL, or
/// - a file on disk.
pub enum Source {
    Url(Url),
    File(PathBuf),
}

impl Source {
    /// Turn a relative file path into a URL under `base`. Anything else is returned as is.
    pub fn resolve(&self, base: Option<&Url>) -> anyhow::Result<Source> {
        match (self, base) {
            (Source::File(path), Some(base)) if path.is_relative() => {
                let rel = path.to_str().ok_or_else(|| {
                    anyhow::anyhow!("source path is not valid UTF-8: {}", path.display())
                })?;
                Ok(Source::Url(base.join(rel)?))
            }
            _ => Ok(self.clone()),
        }
    }
}

impl FromStr for Source {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Only treat it as a URL when it really is one we can fetch; a Windows path like `C:\x`
        // parses as a URL with scheme `c`.
        match Url::parse(s) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Source::Url(url)),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(Source::File)
                .map_err(|_| format!("not a usable file URL: {s}")),
            _ => Ok(Source::File(PathBuf::from(s))),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{url}"),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}
