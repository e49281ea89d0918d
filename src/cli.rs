// File: ./src/cli.rs
//! Command-line argument handling and help text.
use anyhow::{Result, bail};
use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "university_data.json";
pub const DEFAULT_FORMAT_FILE: &str = "format.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub data_file: PathBuf,
    pub format_file: PathBuf,
    pub config: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub verbose: bool,
    pub help: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            format_file: PathBuf::from(DEFAULT_FORMAT_FILE),
            config: None,
            output_dir: None,
            verbose: false,
            help: false,
        }
    }
}

impl CliArgs {
    /// Parses arguments, excluding the binary name.
    pub fn parse_from<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = Self::default();
        let mut positional = Vec::new();
        let mut args = args.into_iter().map(Into::<String>::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--help" | "-h" => parsed.help = true,
                "--verbose" | "-v" => parsed.verbose = true,
                "--config" | "-c" => match args.next() {
                    Some(path) => parsed.config = Some(path.into()),
                    None => bail!("{} needs a path", arg),
                },
                "--output" | "-o" => match args.next() {
                    Some(path) => parsed.output_dir = Some(path.into()),
                    None => bail!("{} needs a directory", arg),
                },
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    bail!("Unknown option '{}' (see --help)", flag)
                }
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        if let Some(data) = positional.next() {
            parsed.data_file = data.into();
        }
        if let Some(format) = positional.next() {
            parsed.format_file = format.into();
        }
        if let Some(extra) = positional.next() {
            bail!("Unexpected argument '{}' (see --help)", extra);
        }

        Ok(parsed)
    }
}

pub fn print_help(binary_name: &str) {
    println!(
        "Examcal v{} - Admissions schedules to iCalendar files",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS] [DATA_FILE] [FORMAT_FILE]", binary_name);
    println!();
    println!("ARGUMENTS:");
    println!(
        "    DATA_FILE             Institution records (default: {})",
        DEFAULT_DATA_FILE
    );
    println!(
        "    FORMAT_FILE           Title/description templates (default: {})",
        DEFAULT_FORMAT_FILE
    );
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <path>   Read settings from a TOML file.");
    println!("    -o, --output <dir>    Write the .ics files into <dir>.");
    println!("    -v, --verbose         Log debug messages.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("TIME VALUES:");
    println!("    #20250601             All day (until the next day)");
    println!("    #20250601T0900        One hour from 09:00");
    println!("    #20250601T0900-1030   09:00 to 10:30 the same day");
    println!("    #20250601-20250603    From one day to another");
    println!("    #0601                 Month and day only (current year)");
    println!();
    println!("TEMPLATE PLACEHOLDERS:");
    println!("    {{key}}                 Value of key");
    println!("    {{TID[key]}}            Minutes in the hhmm-hhmm pair under key");
    println!("    {{FOR[key][<0> <1>]}}   One line per entry of the list under key");
    println!("    {{FOR[key#][...]}}      Same, skipping entries marked #ignore");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::parse_from(Vec::<String>::new()).unwrap();
        assert_eq!(args, CliArgs::default());
        assert_eq!(args.data_file, PathBuf::from("university_data.json"));
        assert_eq!(args.format_file, PathBuf::from("format.json"));
    }

    #[test]
    fn test_positional_and_flags() {
        let args =
            CliArgs::parse_from(["-v", "data.json", "--output", "out", "fmt.json", "-c", "x.toml"])
                .unwrap();
        assert_eq!(args.data_file, PathBuf::from("data.json"));
        assert_eq!(args.format_file, PathBuf::from("fmt.json"));
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert_eq!(args.config, Some(PathBuf::from("x.toml")));
        assert!(args.verbose);
        assert!(!args.help);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(CliArgs::parse_from(["--bogus"]).is_err());
        assert!(CliArgs::parse_from(["a", "b", "c"]).is_err());
        assert!(CliArgs::parse_from(["--config"]).is_err());
    }
}
