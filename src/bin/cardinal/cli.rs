use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(about, version)]
pub struct Cli {
    #[arg(value_name = "TECHNOLOGY FILE",
	  help = "JSON file describing the layer stack and the vias between layers")]
    pub technology: PathBuf,
    #[arg(short, long, value_name = "COMMAND FILE",
	  help = "JSON command history to replay, as written by the router")]
    pub commands: PathBuf,
    #[arg(long, value_name = "CONFIG FILE",
	  help = "JSON router configuration. Defaults are used when omitted")]
    pub config: Option<PathBuf>,
}
