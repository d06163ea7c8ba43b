//! # gridgen
//!
//! Nested grid layout generator
//!

use clap::Parser;
use layout21grid::{self as grid, Level, SerializationFormat};
use std::error::Error;

// => The doc-comment on `ProgramOptions` here is displayed by the `clap`-generated help docs =>

/// Nested Grid Layout Generator
#[derive(Parser)]
struct ProgramOptions {
    /// Configuration Override File (JSON, YAML, or TOML)
    #[clap(short, long)]
    config: Option<String>,
    /// GDSII Output File
    #[clap(short = 'o', long, default_value = "output.gds")]
    gds: String,
    /// SVG Preview Output File
    #[clap(short = 'p', long, default_value = "output.svg")]
    svg: String,
    /// Verbose Output Mode
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let options = ProgramOptions::parse();
    _main(&options)
}

fn _main(options: &ProgramOptions) -> Result<(), Box<dyn Error>> {
    // Load any overrides
    let overrides = match &options.config {
        Some(fname) => Some(grid::ConfigOverride::open(fname)?),
        None => None,
    };
    let builder = grid::HierarchyBuilder::from_overrides(overrides.as_ref())?;

    if options.verbose {
        println!("{}", SerializationFormat::Yaml.to_string(builder.config())?);
    }

    // Build and export
    let mut lib = builder.library();
    let hier = builder.build(&mut lib)?;
    grid::export(&lib, &hier, &options.gds, &options.svg)?;

    if options.verbose {
        for built in hier.levels() {
            println!(
                "{:<14} {:>4} placements, extent {} x {}",
                built.level.name(),
                built.placements,
                built.extent.width,
                built.extent.height
            );
        }
        println!(
            "{} elements in `{}`",
            lib.flat_count(hier.level(Level::Top).cell)?,
            Level::Top
        );
        println!("{:?}", lib.stats());
        println!("wrote {:?} and {:?}", &options.gds, &options.svg);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let options = ProgramOptions {
            config: None,
            gds: path(&dir, "defaults.gds"),
            svg: path(&dir, "defaults.svg"),
            verbose: true,
        };
        assert!(_main(&options).is_ok());

        // The GDS written is exactly that of the default library
        let (lib, _) = grid::generate(None, path(&dir, "ref.gds"), path(&dir, "ref.svg")).unwrap();
        let mut expected = Vec::new();
        lib.to_gds().unwrap().write(&mut expected).unwrap();
        assert_eq!(std::fs::read(&options.gds).unwrap(), expected);
        let svg = std::fs::read_to_string(&options.svg).unwrap();
        assert!(svg.contains(r#"<g id="top">"#));
    }

    #[test]
    fn generates_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let options = ProgramOptions {
            config: Some(resource("custom.yaml")),
            gds: path(&dir, "custom.gds"),
            svg: path(&dir, "custom.svg"),
            verbose: false,
        };
        assert!(_main(&options).is_ok());

        let ov = grid::ConfigOverride::open(resource("custom.yaml")).unwrap();
        let (lib, hier) = grid::generate(Some(&ov), path(&dir, "ref.gds"), path(&dir, "ref.svg")).unwrap();
        assert_eq!(hier.top().extent.as_tuple(), (650.0, 460.0));
        assert_eq!(lib.flat_count(hier.top().cell).unwrap(), 216);
        assert_eq!(
            std::fs::read(&options.gds).unwrap(),
            std::fs::read(path(&dir, "ref.gds")).unwrap()
        );
    }

    #[test]
    fn rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let options = ProgramOptions {
            config: Some(resource("invalid.yaml")),
            gds: path(&dir, "invalid.gds"),
            svg: path(&dir, "invalid.svg"),
            verbose: false,
        };
        assert!(_main(&options).is_err());
        // Nothing is written
        assert!(!std::path::Path::new(&options.gds).exists());
    }

    fn path(dir: &tempfile::TempDir, fname: &str) -> String {
        dir.path().join(fname).to_string_lossy().into_owned()
    }
    /// Grab the full path of resource-file `fname`
    fn resource(rname: &str) -> String {
        format!("{}/resources/{}", env!("CARGO_MANIFEST_DIR"), rname)
    }
}
