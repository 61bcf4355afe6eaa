//! Command-line interface definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};

use role_scan::scan::types::AttachmentFilter;

#[derive(Parser, Debug)]
#[command(
    name = "role-scan",
    version,
    about = "Scan chat submissions and assign a role to valid submitters"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output the report as machine-readable JSON")]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a text channel
    Channel(ScanArgs),
    /// Scan a thread (unarchived first if needed)
    Thread(ScanArgs),
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    #[arg(long, help = "Guild (server) id")]
    pub guild: String,
    #[arg(long, help = "Channel or thread id to scan")]
    pub channel: String,
    #[arg(long, help = "Role id to assign")]
    pub role: String,
    #[arg(
        long,
        value_enum,
        default_value_t = FilterArg::None,
        help = "Give the role only to: image senders, link senders, or everyone"
    )]
    pub attachment_filter: FilterArg,
    #[arg(long, help = "Message link (or id) to start from; scans from the beginning if not set")]
    pub start_message: Option<String>,
    #[arg(long, help = "Message link (or id) to end at; scans to the latest message if not set")]
    pub end_message: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum FilterArg {
    None,
    Image,
    Link,
}

impl From<FilterArg> for AttachmentFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::None => AttachmentFilter::None,
            FilterArg::Image => AttachmentFilter::Image,
            FilterArg::Link => AttachmentFilter::Link,
        }
    }
}
