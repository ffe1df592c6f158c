use pipecall_frame::{transact, FrameConfig};
use pipecall_transport::Connection;
use tracing::{debug, info, warn};

use crate::connector::{Connector, NamedPipeConnector};
use crate::envelope::Envelope;
use crate::error::Result;

/// Client for one service of a local daemon.
///
/// The connection is opened lazily on the first call and reused for the
/// following ones. A call that leaves the connection unusable drops it, and
/// the next call reconnects. Failed calls are never retried automatically.
///
/// Calls take `&mut self`, so one client never interleaves transactions. For
/// concurrent calls use one client per thread or wrap it in a mutex.
pub struct RpcClient<C: Connector> {
    connector: C,
    service: String,
    frame_config: FrameConfig,
    conn: Option<Connection<C::Pipe>>,
}

impl RpcClient<NamedPipeConnector> {
    /// Client for `service` behind the named pipe `pipe_name`.
    pub fn named_pipe(pipe_name: impl Into<String>, service: impl Into<String>) -> Self {
        Self::new(NamedPipeConnector::new(pipe_name), service)
    }
}

impl<C: Connector> RpcClient<C> {
    /// Create a client. No connection is made until the first call.
    pub fn new(connector: C, service: impl Into<String>) -> Self {
        Self {
            connector,
            service: service.into(),
            frame_config: FrameConfig::default(),
            conn: None,
        }
    }

    /// Replace the read engine configuration.
    pub fn with_frame_config(mut self, frame_config: FrameConfig) -> Self {
        self.frame_config = frame_config;
        self
    }

    /// Service name placed in every envelope.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Whether an active connection is currently held.
    pub fn is_connected(&self) -> bool {
        self.conn.as_ref().is_some_and(Connection::is_active)
    }

    /// Open the connection now instead of on the first call.
    pub fn connect(&mut self) -> Result<()> {
        self.connection().map(|_| ())
    }

    /// Close and drop the current connection, if any.
    pub fn disconnect(&mut self) {
        if let Some(mut conn) = self.conn.take() {
            conn.close();
        }
    }

    /// Invoke a remote function: wrap the encoded call in an envelope for
    /// this client's service and return the daemon's response text.
    pub fn call_remote_func_sync(&mut self, fcall: &str) -> Result<String> {
        let request = Envelope::new(self.service.as_str(), fcall).encode()?;
        self.transact_raw(&request)
    }

    /// Send `request` as-is, without an envelope.
    pub fn transact_raw(&mut self, request: &str) -> Result<String> {
        let frame_config = self.frame_config.clone();
        let conn = self.connection()?;
        match transact(conn, request, &frame_config) {
            Ok(response) => Ok(response),
            Err(err) => {
                if err.requires_reconnect() {
                    warn!(service = %self.service, error = %err, "call failed; dropping connection");
                    self.disconnect();
                }
                Err(err.into())
            }
        }
    }

    fn connection(&mut self) -> Result<&mut Connection<C::Pipe>> {
        let conn = match self.conn.take() {
            Some(conn) if conn.is_active() => conn,
            _ => {
                let conn = self.connector.connect()?;
                info!(pipe = %conn.name(), service = %self.service, "connected");
                conn
            }
        };
        Ok(self.conn.insert(conn))
    }
}

impl<C: Connector> Drop for RpcClient<C> {
    fn drop(&mut self) {
        if self.conn.is_some() {
            debug!(service = %self.service, "dropping client connection");
        }
        self.disconnect();
    }
}

impl<C: Connector> std::fmt::Debug for RpcClient<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("service", &self.service)
            .field("connected", &self.is_connected())
            .finish()
    }
}
