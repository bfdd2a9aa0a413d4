//! HTTP handler: POSTs each rendered event to the configured endpoint

use super::render_message;
use crate::core::{Application, Event, Handler, HandlerKind, Result};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Fire-and-forget delivery; responses are ignored and failures are not retried
#[derive(Default)]
pub struct HttpHandler {
    client: Option<Client>,
}

impl HttpHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&mut self) -> Result<&Client> {
        let client = match self.client.take() {
            Some(client) => client,
            None => Client::builder().timeout(REQUEST_TIMEOUT).build()?,
        };
        Ok(self.client.insert(client))
    }
}

/// Absolute `http` or `https` URL with a host
pub(crate) fn valid_endpoint(endpoint: &str) -> bool {
    match url::Url::parse(endpoint) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}

impl Handler for HttpHandler {
    fn name(&self) -> &str {
        "http"
    }

    fn kind(&self) -> HandlerKind {
        HandlerKind::Http
    }

    fn is_available(&mut self, application: &Application) -> bool {
        valid_endpoint(&application.http.endpoint) && self.client().is_ok()
    }

    fn deliver(&mut self, application: &Application, event: &Event) -> Result<()> {
        let config = &application.http;
        let message = render_message(
            config.log_format,
            &config.timestamp_format,
            config.trace_format,
            config.append_newline,
            event,
        );

        self.client()?
            .post(&config.endpoint)
            .header(CONTENT_TYPE, config.log_format.content_type())
            .body(message)
            .send()?;
        Ok(())
    }
}
