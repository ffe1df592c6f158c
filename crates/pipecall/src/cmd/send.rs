use pipecall_frame::transact;
use tracing::debug;

use crate::cmd::{read_request_file, SendArgs};
use crate::exit::{frame_error, transport_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_exchange, Exchange, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let request = resolve_payload(&args)?;

    let mut conn = pipecall_transport::connect(&args.pipe.pipe, args.pipe.connection_config())
        .map_err(|err| transport_error("connect failed", err))?;
    debug!(pipe = %conn.name(), len = request.len(), "sending raw request");

    let response = transact(&mut conn, &request, &args.pipe.frame_config())
        .map_err(|err| frame_error("send failed", err))?;
    conn.close();

    let exchange = Exchange::new(&args.pipe.pipe, None, &request, &response);
    print_exchange(&exchange, &response, format);
    Ok(SUCCESS)
}

fn resolve_payload(args: &SendArgs) -> CliResult<String> {
    if let Some(json) = &args.json {
        serde_json::from_str::<serde_json::Value>(json)
            .map_err(|err| CliError::new(USAGE, format!("--json is not valid JSON: {err}")))?;
        return Ok(json.clone());
    }
    if let Some(data) = &args.data {
        return Ok(data.clone());
    }
    if let Some(path) = &args.file {
        return read_request_file(path);
    }
    Ok(String::new())
}
