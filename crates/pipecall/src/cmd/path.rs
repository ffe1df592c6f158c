use pipecall_transport::pipe_path;

use crate::cmd::PathArgs;
use crate::exit::{CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_record, OutputFormat};

pub fn run(args: PathArgs, format: OutputFormat) -> CliResult<i32> {
    if args.name.is_empty() {
        return Err(CliError::new(USAGE, "pipe name must not be empty"));
    }
    let path = pipe_path(&args.name);
    print_record(&[("name", args.name.as_str()), ("path", path.as_str())], format);
    Ok(SUCCESS)
}
