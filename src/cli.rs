use std::io::{self, Write};
use std::path::PathBuf;

use clap::{CommandFactory, Parser};

const AFTER_HELP: &str = "\
Examples:
  ghdl https://github.com/username/repo/blob/main/path/to/file.ext ./output_dir
  ghdl https://github.com/username/repo/tree/main/path/to/dir ./output_dir
  ghdl ./file.ext https://raw.githubusercontent.com/username/repo/main/path/to/file.ext";

/// Download files and directories from GitHub
#[derive(Parser, Debug)]
#[command(name = "ghdl", version, after_help = AFTER_HELP)]
pub struct Cli {
    /// GitHub browser URL, or the output filename when the second argument is a raw URL
    pub first: Option<String>,

    /// Output directory, or a raw.githubusercontent.com URL
    pub second: Option<String>,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "GHDL_API_URL", default_value = ghdl::config::DEFAULT_API_BASE)]
    pub api_url: String,

    /// Log every request and written file
    #[arg(short, long)]
    pub verbose: bool,
}

/// What the positional arguments ask for
#[derive(Debug, PartialEq, Eq)]
pub enum Invocation {
    Help,
    /// `ghdl <github_url> <output_directory>`
    Tree { url: String, output_dir: PathBuf },
    /// `ghdl <output_filename> <raw_github_url>`
    Raw { output_file: PathBuf, url: String },
}

impl Cli {
    pub fn invocation(&self) -> Invocation {
        match (self.first.as_deref(), self.second.as_deref()) {
            (Some("help"), _) | (None, _) | (_, None) => Invocation::Help,
            (Some(first), Some(second)) if looks_like_url(second) => Invocation::Raw {
                output_file: PathBuf::from(first),
                url: second.to_string(),
            },
            (Some(first), Some(second)) => Invocation::Tree {
                url: first.to_string(),
                output_dir: PathBuf::from(second),
            },
        }
    }
}

/// Write the usage text, reporting write failures to the caller
pub fn write_help(out: &mut impl Write) -> io::Result<()> {
    write!(out, "{}", Cli::command().render_help())?;
    out.flush()
}

fn looks_like_url(arg: &str) -> bool {
    arg.starts_with("https://") || arg.starts_with("http://")
}
