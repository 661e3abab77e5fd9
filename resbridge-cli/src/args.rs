//! Command-line arguments.
//!
//! The three `--import-*` flags may be repeated and mixed freely; the run
//! applies them in the order they appear on the command line, which clap's
//! derive API alone does not preserve.

use std::{ffi::OsString, path::PathBuf};

use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser};
use resbridge::ImportSource;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Android `res` directory to import (repeatable)
    #[arg(long, value_name = "RES_DIR")]
    pub import_android: Vec<PathBuf>,

    /// Directory of `<locale>.lproj` folders to import (repeatable)
    #[arg(long, value_name = "DIR")]
    pub import_apple: Vec<PathBuf>,

    /// CSV report to import (repeatable)
    #[arg(long, value_name = "FILE")]
    pub import_csv: Vec<PathBuf>,

    /// Write `<locale>.lproj` folders into this directory
    #[arg(long, value_name = "DIR")]
    pub export_apple: Option<PathBuf>,

    /// Write the multi-locale CSV report to this file
    #[arg(long, value_name = "FILE")]
    pub export_csv: Option<PathBuf>,

    /// Write accessors: Swift for a `.swift` file, JSON otherwise
    #[arg(long, value_name = "FILE")]
    pub export_accessors: Option<PathBuf>,

    /// Synthesize this locale as a copy of Base before exporting
    #[arg(long, value_name = "LOCALE")]
    pub copy_base_to: Option<String>,

    /// TOML file whose `[overrides]` table extends the Android locale mapping
    #[arg(long, value_name = "FILE")]
    pub locale_map: Option<PathBuf>,

    /// Report plural entries missing categories their language needs
    #[arg(long)]
    pub check_plurals: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Parsed arguments plus the import steps in command-line order.
#[derive(Debug)]
pub struct Invocation {
    pub args: Args,
    pub imports: Vec<ImportSource>,
}

impl Invocation {
    /// Parses `std::env::args_os`, exiting with usage on error.
    pub fn parse() -> Self {
        Self::try_parse_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Args::command().try_get_matches_from(itr)?;
        let args = Args::from_arg_matches(&matches)?;
        let imports = ordered_imports(&matches);
        Ok(Self { args, imports })
    }
}

fn ordered_imports(matches: &ArgMatches) -> Vec<ImportSource> {
    let kinds: [(&str, fn(PathBuf) -> ImportSource); 3] = [
        ("import_android", ImportSource::Android),
        ("import_apple", ImportSource::Apple),
        ("import_csv", ImportSource::Csv),
    ];

    let mut indexed = Vec::new();
    for (id, make) in kinds {
        if let (Some(values), Some(indices)) =
            (matches.get_many::<PathBuf>(id), matches.indices_of(id))
        {
            indexed.extend(indices.zip(values.cloned().map(make)));
        }
    }
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, source)| source).collect()
}
