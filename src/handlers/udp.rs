//! UDP handler: one datagram per event

use super::{render_message, tcp::valid_endpoint, MAX_DATAGRAM_SIZE};
use crate::core::{Application, Event, Handler, HandlerKind, LoggerError, Result};
use std::collections::HashMap;
use std::net::UdpSocket;

/// Sockets keyed by `host:port`
#[derive(Default)]
pub struct UdpHandler {
    sockets: HashMap<String, UdpSocket>,
}

impl UdpHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn open(address: &str) -> Result<UdpSocket> {
        let local = if address.starts_with('[') {
            "[::]:0"
        } else {
            "0.0.0.0:0"
        };
        let socket = UdpSocket::bind(local)
            .map_err(|e| LoggerError::io_operation("binding", local, e))?;
        socket
            .connect(address)
            .map_err(|e| LoggerError::io_operation("connecting", address, e))?;
        Ok(socket)
    }
}

impl Handler for UdpHandler {
    fn name(&self) -> &str {
        "udp"
    }

    fn kind(&self) -> HandlerKind {
        HandlerKind::Udp
    }

    fn is_available(&mut self, application: &Application) -> bool {
        let config = &application.udp;
        if !valid_endpoint(config) {
            return false;
        }

        let address = config.address();
        if !self.sockets.contains_key(&address) {
            if let Ok(socket) = Self::open(&address) {
                self.sockets.insert(address.clone(), socket);
            }
        }
        self.sockets.contains_key(&address)
    }

    fn deliver(&mut self, application: &Application, event: &Event) -> Result<()> {
        let config = &application.udp;
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
        let first = match self.sockets.get(&address) {
            Some(socket) => socket.send(message.as_bytes()),
            None => return Err(LoggerError::unavailable(self.name())),
        };
        if first.is_ok() {
            return Ok(());
        }

        self.sockets.remove(&address);
        let socket = Self::open(&address)?;
        let retried = socket.send(message.as_bytes());
        self.sockets.insert(address.clone(), socket);
        retried
            .map(|_| ())
            .map_err(|e| LoggerError::transport("udp", format!("{}: {}", address, e)))
    }
}
