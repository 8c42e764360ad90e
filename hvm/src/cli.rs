use clap::Parser;
use hvm::constants::DEFAULT_STEP_BUDGET;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "hvm",
    about = "Hack Virtual Machine - Run generated Hack assembly",
    version
)]
pub struct Cli {
    /// Assembly file to execute
    pub program: PathBuf,

    /// Maximum number of instructions to execute
    #[arg(short, long, default_value_t = DEFAULT_STEP_BUDGET)]
    pub steps: u64,

    /// Print the final machine state as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}
