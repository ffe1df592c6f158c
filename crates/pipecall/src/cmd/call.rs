use pipecall_client::{NamedPipeConnector, RpcClient};
use tracing::debug;

use crate::cmd::{read_request_file, CallArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_exchange, Exchange, OutputFormat};

pub fn run(args: CallArgs, format: OutputFormat) -> CliResult<i32> {
    let fcall = resolve_request(&args)?;
    let connector = NamedPipeConnector::with_config(&args.pipe.pipe, args.pipe.connection_config());
    let mut client =
        RpcClient::new(connector, &args.service).with_frame_config(args.pipe.frame_config());

    debug!(pipe = %args.pipe.pipe, service = %args.service, "calling remote function");
    let response = client
        .call_remote_func_sync(&fcall)
        .map_err(|err| client_error("call failed", err))?;

    let exchange = Exchange::new(&args.pipe.pipe, Some(args.service.as_str()), &fcall, &response);
    print_exchange(&exchange, &response, format);
    Ok(SUCCESS)
}

fn resolve_request(args: &CallArgs) -> CliResult<String> {
    match (&args.request, &args.file) {
        (Some(request), _) => Ok(request.clone()),
        (None, Some(path)) => Ok(read_request_file(path)?.trim_end().to_string()),
        (None, None) => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::PipeArgs;

    fn args(request: Option<&str>, file: Option<std::path::PathBuf>) -> CallArgs {
        CallArgs {
            pipe: PipeArgs {
                pipe: "seafile".to_string(),
                chunk_size: 4096,
                retries: 10,
            },
            service: "seafile-rpcserver".to_string(),
            request: request.map(str::to_string),
            file,
        }
    }

    #[test]
    fn inline_request_is_used_verbatim() {
        let resolved = resolve_request(&args(Some(r#"["seafile_get_config","k"]"#), None)).unwrap();
        assert_eq!(resolved, r#"["seafile_get_config","k"]"#);
    }

    #[test]
    fn file_request_drops_trailing_newline() {
        let path = std::env::temp_dir().join(format!("pipecall-call-{}.json", std::process::id()));
        std::fs::write(&path, "[\"seafile_shutdown\"]\n").unwrap();

        let resolved = resolve_request(&args(None, Some(path.clone()))).unwrap();

        assert_eq!(resolved, r#"["seafile_shutdown"]"#);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_usage_error() {
        let path = std::env::temp_dir().join("pipecall-call-does-not-exist.json");

        let err = resolve_request(&args(None, Some(path))).unwrap_err();

        assert_eq!(err.code, crate::exit::USAGE);
    }
}
