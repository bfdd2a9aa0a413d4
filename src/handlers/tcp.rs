//! TCP handler for remote logging
//!
//! Writes each rendered event as a single frame on a connected stream. There
//! is no length prefix; receivers split on the configured newline.

use super::{render_message, MAX_DATAGRAM_SIZE};
use crate::core::{
    Application, Event, Handler, HandlerKind, LoggerError, Result, SocketConfiguration,
};
use std::collections::HashMap;
use std::io::Write;
use std::net::{IpAddr, TcpStream};
use std::time::Duration;

const SOCKET_TIMEOUT: Duration = Duration::from_secs(5);

/// Streams keyed by `host:port`
#[derive(Default)]
pub struct TcpHandler {
    streams: HashMap<String, TcpStream>,
}

impl TcpHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn connect(address: &str) -> Result<TcpStream> {
        let stream = TcpStream::connect(address)
            .map_err(|e| LoggerError::io_operation("connecting", address, e))?;

        // Set timeouts to prevent hanging
        stream.set_write_timeout(Some(SOCKET_TIMEOUT))?;
        stream.set_read_timeout(Some(SOCKET_TIMEOUT))?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}

/// Host must be an IP literal and the port non-zero
pub(crate) fn valid_endpoint(config: &SocketConfiguration) -> bool {
    let host = config.host.trim_start_matches('[').trim_end_matches(']');
    host.parse::<IpAddr>().is_ok() && config.port != 0
}

impl Handler for TcpHandler {
    fn name(&self) -> &str {
        "tcp"
    }

    fn kind(&self) -> HandlerKind {
        HandlerKind::Tcp
    }

    fn is_available(&mut self, application: &Application) -> bool {
        let config = &application.tcp;
        if !valid_endpoint(config) {
            return false;
        }

        let address = config.address();
        if self.streams.contains_key(&address) {
            return true;
        }
        match Self::connect(&address) {
            Ok(stream) => {
                self.streams.insert(address, stream);
                true
            }
            Err(_) => false,
        }
    }

    fn deliver(&mut self, application: &Application, event: &Event) -> Result<()> {
        let config = &application.tcp;
        let message = render_message(
            config.log_format,
            &config.timestamp_format,
            config.trace_format,
            config.append_newline,
            event,
        );
        if message.len() > MAX_DATAGRAM_SIZE {
            return Ok(());
        }

        let address = config.address();
        let first = match self.streams.get_mut(&address) {
            Some(stream) => stream.write_all(message.as_bytes()),
            None => return Err(LoggerError::unavailable(self.name())),
        };

        match first {
            Ok(()) => Ok(()),
            Err(e) => {
                // Connection lost; reconnect and resend once
                self.streams.remove(&address);
                let mut stream = Self::connect(&address).map_err(|reconnect| {
                    LoggerError::transport(
                        "tcp",
                        format!(
                            "Failed to send log and reconnect: {} (reconnect: {})",
                            e, reconnect
                        ),
                    )
                })?;
                stream.write_all(message.as_bytes())?;
                self.streams.insert(address, stream);
                Ok(())
            }
        }
    }
}
