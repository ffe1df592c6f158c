use clap::{Args, Subcommand};
use std::path::PathBuf;

use pipecall_frame::{FrameConfig, DEFAULT_RETRY_BUDGET};
use pipecall_transport::{ConnectionConfig, DEFAULT_CHUNK_SIZE};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod call;
pub mod path;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Invoke a remote function on a daemon service.
    Call(CallArgs),
    /// Send one raw request and print the response.
    Send(SendArgs),
    /// Print the full pipe path for a pipe name.
    Path(PathArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Call(args) => call::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Path(args) => path::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Connection tuning shared by commands that talk to a pipe.
#[derive(Args, Debug)]
pub struct PipeArgs {
    /// Pipe name (e.g. `seafile`) or full path (`\\.\pipe\seafile`).
    pub pipe: String,
    /// Read buffer size in bytes.
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,
    /// Consecutive failed reads tolerated before giving up.
    #[arg(long, default_value_t = DEFAULT_RETRY_BUDGET)]
    pub retries: u32,
}

impl PipeArgs {
    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            chunk_size: self.chunk_size,
        }
    }

    pub fn frame_config(&self) -> FrameConfig {
        FrameConfig {
            retry_budget: self.retries,
        }
    }
}

#[derive(Args, Debug)]
pub struct CallArgs {
    #[command(flatten)]
    pub pipe: PipeArgs,
    /// Service name placed in the request envelope.
    #[arg(long, short = 's')]
    pub service: String,
    /// Encoded function call, e.g. `["seafile_get_config","key"]`.
    #[arg(long, short = 'r', conflicts_with = "file", required_unless_present = "file")]
    pub request: Option<String>,
    /// Read the encoded function call from a file.
    #[arg(long, conflicts_with = "request")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub pipe: PipeArgs,
    /// JSON request, validated before sending.
    #[arg(long, conflicts_with_all = ["data", "file"])]
    pub json: Option<String>,
    /// Raw string request.
    #[arg(long, conflicts_with_all = ["json", "file"])]
    pub data: Option<String>,
    /// Read the request from a file.
    #[arg(long, conflicts_with_all = ["json", "data"])]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct PathArgs {
    /// Logical pipe name.
    pub name: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Read a request body from `path`. Requests travel as UTF-8 text.
pub fn read_request_file(path: &std::path::Path) -> CliResult<String> {
    std::fs::read_to_string(path)
        .map_err(|err| crate::exit::io_error(&format!("failed reading {}", path.display()), err))
}
