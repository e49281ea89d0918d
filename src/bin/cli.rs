// Binary entry point: generates one .ics file per institution.
use anyhow::{Result, bail};
use examcal::cli::{CliArgs, print_help};
use examcal::storage::Storage;
use examcal::{Config, Generator};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::env;

fn main() -> Result<()> {
    let args = CliArgs::parse_from(env::args().skip(1))?;

    if args.help {
        print_help("examcal");
        return Ok(());
    }

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    // Diagnostics go to stdout alongside the progress messages.
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stdout,
        ColorChoice::Auto,
    )?;

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }

    // Both inputs must load before anything is written.
    let formats = Storage::load_format_spec(&args.format_file)?;
    let institutions = Storage::load_institutions(&args.data_file)?;

    let report = Generator::new(&formats, &config).run(&institutions);
    log::info!(
        "{} calendar(s) written, {} institution(s) failed",
        report.written.len(),
        report.failed.len()
    );

    if !report.is_success() {
        let names: Vec<&str> = report.failed.iter().map(|(name, _)| name.as_str()).collect();
        bail!("Could not generate calendars for: {}", names.join(", "));
    }
    Ok(())
}
