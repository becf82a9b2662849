use clap::Parser;
use std::path::PathBuf;

use crate::ignore::IgnoreMatcher;
use crate::render::{OutputMode, RenderConfig};
use crate::size::{parse_size, SizeFormat, SizeMode};
use crate::tree::select::SelectConfig;
use crate::tree::ScanConfig;

const AFTER_HELP: &str = "\
Examples:
  dirsize                       flat listing of the current directory
  dirsize -t -m 10Mi ~/src      tree of everything of 10 MiB or more
  dirsize -b -p 5 -d 1 /var     tree and listing, 5% threshold, top level always shown
  dirsize -i .git -i '*.cache'  skip .git and any *.cache directory";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "dirsize",
    version,
    about = "Show the size of a tree of directories",
    after_help = AFTER_HELP
)]
pub struct Args {
    /// Directories to report on, one after the other (default: current directory)
    #[arg(default_value = ".")]
    pub dirs: Vec<PathBuf>,

    /// Ignore directories matching NAME, PATH or glob (repeatable)
    #[arg(short = 'i', long = "ignore", value_name = "PATTERN", action = clap::ArgAction::Append)]
    pub ignore: Vec<String>,

    /// Only show directories of at least SIZE (42, 42K = 42000, 42Ki = 43008)
    #[arg(short = 'm', long = "min-size", value_name = "SIZE", value_parser = parse_size, default_value = "0")]
    pub min_size: u64,

    /// Only show directories of at least PERCENT of the total
    #[arg(
        short = 'p',
        long = "min-percent",
        value_name = "PERCENT",
        value_parser = clap::value_parser!(u8).range(0..=100),
        default_value = "0"
    )]
    pub min_percent: u8,

    /// Always show this many levels, whatever their size
    #[arg(short = 'd', long = "min-depth", value_name = "DEPTH", default_value = "0")]
    pub min_depth: usize,

    /// Show the tree instead of the flat listing
    #[arg(short = 't', long = "tree")]
    pub tree: bool,

    /// Show the tree followed by the flat listing (overrides --tree)
    #[arg(short = 'b', long = "both")]
    pub both: bool,

    /// Count byte length instead of allocated blocks
    #[arg(short = 'l', long = "logical")]
    pub logical: bool,

    /// Print sizes as KiB, MiB, ...
    #[arg(short = 'H', long = "human-readable")]
    pub human_readable: bool,

    /// Don't show progress
    #[arg(short = 's', long = "silent")]
    pub silent: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Enforce invariants after parsing.
    pub fn validated(mut self) -> Self {
        if self.dirs.is_empty() {
            self.dirs.push(PathBuf::from("."));
        }
        if self.verbose > 2 {
            self.verbose = 2;
        }
        self
    }

    pub fn output_mode(&self) -> OutputMode {
        if self.both {
            OutputMode::Both
        } else if self.tree {
            OutputMode::Tree
        } else {
            OutputMode::Flat
        }
    }

    pub fn size_format(&self) -> SizeFormat {
        if self.human_readable {
            SizeFormat::Human
        } else {
            SizeFormat::Raw
        }
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            size_mode: if self.logical {
                SizeMode::Logical
            } else {
                SizeMode::Physical
            },
            label_format: self.size_format(),
            ignore: IgnoreMatcher::from_patterns(&self.ignore),
            cancel: Default::default(),
        }
    }

    pub fn select_config(&self) -> SelectConfig {
        SelectConfig {
            min_size: self.min_size,
            min_percent: self.min_percent,
            min_depth: self.min_depth,
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            format: self.size_format(),
            mode: self.output_mode(),
        }
    }

    /// Default tracing filter for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}
