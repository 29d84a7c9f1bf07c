// #![forbid(unsafe_code)]
// #![deny(non_upper_case_globals)]
// #![deny(non_camel_case_types)]
// #![deny(non_snake_case)]
// #![deny(unused_mut)]
// #![deny(unused_variables)]
// #![deny(dead_code)]
// #![deny(unused_imports)]
//#![deny(missing_docs)]
//#![deny(warnings)]

extern crate chrono;
extern crate derivative;
extern crate lazy_static;
extern crate serde_derive;

#[macro_use]
extern crate log;

#[macro_use]
extern crate derive_builder;

mod app;
mod configuration;
mod error;
mod forms;
mod release;
mod report;
mod store;
mod time;

use log::LevelFilter;
use std::io::Write;
use std::{fs, io, path::PathBuf, process::exit};
use structopt::StructOpt;

use self::app::App;
use self::error::Error;
use self::{
    configuration::command_line::{LogLevel, Opt},
    configuration::manifest::Manifest,
};

fn main() {
    let options = Opt::from_args();

    if let Err(e) = init_logging(
        options.logging.unwrap_or(LogLevel::Info).into(),
        &options.log_output_file,
    ) {
        eprintln!("Failed to initialize logging: {}", e);
        exit(2);
    }

    if let Err(e) = run(options) {
        error!("Failed to render report: {}", e);
        exit(1);
    }
}

fn run(options: Opt) -> Result<(), Error> {
    let mut manifest = Manifest::from(options.file)?;
    if let Some(report) = options.report {
        manifest.report = report;
    }
    debug!("Initiated configuration {:#?}", manifest);

    let app = App::new(manifest)?;
    let html = app.run(&options.query)?;
    match options.output {
        Some(path) => {
            fs::write(&path, html)?;
            info!("Report written to {}", path.display());
        }
        None => io::stdout().write_all(html.as_bytes())?,
    }
    Ok(())
}

/// Logs go to stderr so that stdout only carries the rendered page.
fn init_logging(level: LevelFilter, output: &Option<PathBuf>) -> Result<(), fern::InitError> {
    let mut dispatcher = fern::Dispatch::new()
        // Perform allocation-free log formatting
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}:{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record
                    .line()
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "".to_owned()),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr());

    if let Some(log_file) = output {
        dispatcher = dispatcher.chain(fern::log_file(log_file)?)
    }
    dispatcher.apply()?;
    info!("Logging level {} enabled", level);
    Ok(())
}
