use crate::configuration::constants::cargo_env::CARGO_PKG_NAME;
use crate::configuration::manifest::ReportKind;
use clap::arg_enum;
use log::LevelFilter;
use std::path::PathBuf;
use structopt::StructOpt;

arg_enum! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum LogLevel {
        Off, Error, Warn, Info, Debug, Trace,
    }
}

#[derive(StructOpt, Debug)]
#[structopt(name = CARGO_PKG_NAME)]
pub struct Opt {
    /// Report manifest. Supported: YAML, JSON, TOML, HJSON
    #[structopt(parse(from_os_str))]
    pub file: PathBuf,

    /// Sets a logging level
    #[structopt(case_insensitive = true, long, short = "L", possible_values = &LogLevel::variants(), env = "LOG_LEVEL")]
    pub logging: Option<LogLevel>,

    /// File to which application will write logs
    #[structopt(long, short = "O", env = "LOG_OUTPUT_FILE")]
    pub log_output_file: Option<PathBuf>,

    /// Request parameters, e.g. "sort=priority&filter=login.*"
    #[structopt(long, short = "q", default_value = "")]
    pub query: String,

    /// File the rendered HTML is written to, stdout when omitted
    #[structopt(long, short = "o", parse(from_os_str))]
    pub output: Option<PathBuf>,

    /// Render this report instead of the one named by the manifest
    #[structopt(long, short = "r", case_insensitive = true, possible_values = &ReportKind::variants())]
    pub report: Option<ReportKind>,
}

impl Into<LevelFilter> for LogLevel {
    fn into(self) -> LevelFilter {
        match self {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
