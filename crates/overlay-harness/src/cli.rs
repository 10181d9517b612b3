use clap::Parser;

/// Drive overlay surfaces from a JSON-lines script against a headless host.
#[derive(Parser, Debug)]
#[command(name = "overlay-harness", version, about)]
pub struct Args {
    /// Script file to run. Reads standard input when omitted.
    #[arg(short = 's', long)]
    pub script: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
