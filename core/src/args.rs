use clap::Parser;

/// Activity signup service
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CmdArgs {
    /// Path to the TOML config file; a missing file means built-in defaults
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}
