//! Named pipe path construction.

/// Namespace prefix for pipes on the local machine.
pub const LOCAL_PIPE_PREFIX: &str = r"\\.\pipe\";

/// Build the full pipe path for a logical pipe name.
///
/// Names that already start with `\\` are taken to be full paths and are
/// returned unchanged.
pub fn pipe_path(name: &str) -> String {
    if name.starts_with(r"\\") {
        name.to_string()
    } else {
        format!("{LOCAL_PIPE_PREFIX}{name}")
    }
}

/// Extract the logical name from a local pipe path.
pub fn pipe_name(path: &str) -> Option<&str> {
    path.strip_prefix(LOCAL_PIPE_PREFIX)
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipe_path_prefixes_name() {
        assert_eq!(pipe_path("seafile"), r"\\.\pipe\seafile");
    }

    #[test]
    fn test_pipe_path_keeps_full_path() {
        assert_eq!(pipe_path(r"\\.\pipe\already"), r"\\.\pipe\already");
        assert_eq!(pipe_path(r"\\host\pipe\remote"), r"\\host\pipe\remote");
    }

    #[test]
    fn test_pipe_name_inverts_pipe_path() {
        assert_eq!(pipe_name(&pipe_path("rpc-server")), Some("rpc-server"));
        assert_eq!(pipe_name(r"\\host\pipe\remote"), None);
        assert_eq!(pipe_name(LOCAL_PIPE_PREFIX), None);
    }
}
