use pipecall_transport::{Connection, ConnectionConfig, NamedPipe, RawPipe};

use crate::error::Result;

/// Opens fresh connections for an [`RpcClient`](crate::RpcClient).
pub trait Connector {
    /// Pipe type of the connections produced.
    type Pipe: RawPipe;

    /// Open a new connection.
    fn connect(&self) -> Result<Connection<Self::Pipe>>;
}

/// Connects to an OS named pipe.
#[derive(Debug, Clone)]
pub struct NamedPipeConnector {
    name: String,
    config: ConnectionConfig,
}

impl NamedPipeConnector {
    /// Connector for the pipe `name` with default configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, ConnectionConfig::default())
    }

    /// Connector for the pipe `name` with explicit configuration.
    pub fn with_config(name: impl Into<String>, config: ConnectionConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    /// Logical pipe name or full path.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Connector for NamedPipeConnector {
    type Pipe = NamedPipe;

    fn connect(&self) -> Result<Connection<NamedPipe>> {
        Ok(pipecall_transport::connect(&self.name, self.config.clone())?)
    }
}

impl<P, F> Connector for F
where
    P: RawPipe,
    F: Fn() -> pipecall_transport::Result<Connection<P>>,
{
    type Pipe = P;

    fn connect(&self) -> Result<Connection<P>> {
        Ok(self()?)
    }
}
