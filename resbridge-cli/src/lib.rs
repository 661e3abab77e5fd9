//! resbridge command-line front end.
//!
//! Split from `main.rs` so the argument handling and the run itself can be
//! tested without spawning a process.

pub mod args;
pub mod locale_map;

use resbridge::{Codec, Error, LocaleMapping, codec, plural_report};
use tracing_subscriber::EnvFilter;

pub use crate::args::{Args, Invocation};

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise each `-v` raises the level from
/// `warn` to `info` to `debug`.
pub fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Runs every import in order, then every requested export.
pub fn run(invocation: &Invocation) -> Result<(), Error> {
    let args = &invocation.args;
    if invocation.imports.is_empty() {
        return Err(Error::config(
            "no import source given; use --import-android, --import-apple or --import-csv",
        ));
    }

    let mapping = match &args.locale_map {
        Some(path) => locale_map::load_locale_mapping(path)?,
        None => LocaleMapping::default(),
    };

    let mut importer = Codec::with_locale_mapping(mapping);
    for source in &invocation.imports {
        importer.import(source)?;
        println!("✅ Imported {}", source.path().display());
    }
    if let Some(locale) = &args.copy_base_to {
        importer.copy_base_to(locale)?;
        println!("✅ Copied Base to {}", locale);
    }
    let catalog = importer.finish_import()?;

    if let Some(dir) = &args.export_apple {
        codec::write_apple_dir(&catalog, dir)?;
        println!("✅ Apple resources written to {}", dir.display());
    }
    if let Some(path) = &args.export_csv {
        codec::write_csv(&catalog, path)?;
        println!("✅ CSV report written to {}", path.display());
    }
    if let Some(path) = &args.export_accessors {
        codec::write_accessors(&catalog, path)?;
        println!("✅ Accessors written to {}", path.display());
    }

    if args.check_plurals {
        let gaps = plural_report(&catalog);
        if gaps.is_empty() {
            println!("✅ Plural categories complete");
        }
        for gap in &gaps {
            let missing: Vec<&str> = gap.missing.iter().map(|class| class.as_str()).collect();
            eprintln!(
                "⚠️  {} `{}` is missing plural categories: {}",
                gap.locale,
                gap.key,
                missing.join(", ")
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{ffi::OsString, fs};
    use tempfile::TempDir;

    #[test]
    fn test_run_without_imports_is_config_error() {
        let invocation = Invocation::try_parse_from(["resbridge", "--export-csv", "out.csv"]).unwrap();
        assert!(matches!(run(&invocation), Err(Error::Config(_))));
    }

    #[test]
    fn test_run_csv_to_apple() {
        let tmp = TempDir::new().unwrap();
        let csv = tmp.path().join("in.csv");
        fs::write(&csv, "ID,Base,de\n\"hello\",\"Hello\",\"Hallo\"\n").unwrap();
        let out = tmp.path().join("ios");

        let argv: Vec<OsString> = vec![
            "resbridge".into(),
            "--import-csv".into(),
            csv.into_os_string(),
            "--export-apple".into(),
            out.clone().into_os_string(),
        ];
        let invocation = Invocation::try_parse_from(argv).unwrap();
        run(&invocation).unwrap();

        let german = fs::read_to_string(out.join("de.lproj/Localizable.strings")).unwrap();
        assert_eq!(german, "\u{feff}\"hello\" = \"Hallo\";\n");
    }
}
