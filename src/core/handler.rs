//! Handler trait for log output destinations

use super::{config::Application, error::Result, event::Event};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which sink a handler is; the built-in kinds map onto an [`Application`]
/// sub-configuration and its enabled flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandlerKind {
    Console,
    Descriptor,
    File,
    Http,
    Tcp,
    Udp,
    /// User supplied handler, always enabled
    Custom,
}

impl HandlerKind {
    /// Built-in kinds in dispatch order
    pub const BUILT_IN: [HandlerKind; 6] = [
        HandlerKind::Console,
        HandlerKind::Descriptor,
        HandlerKind::File,
        HandlerKind::Http,
        HandlerKind::Tcp,
        HandlerKind::Udp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerKind::Console => "console",
            HandlerKind::Descriptor => "descriptor",
            HandlerKind::File => "file",
            HandlerKind::Http => "http",
            HandlerKind::Tcp => "tcp",
            HandlerKind::Udp => "udp",
            HandlerKind::Custom => "custom",
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A destination for events.
///
/// `is_available` is a readiness check that may open and cache resources;
/// `deliver` is only called after it returned `true`. Errors from `deliver`
/// stay with the dispatcher and never reach the code that logged the event.
pub trait Handler: Send {
    fn name(&self) -> &str;

    fn kind(&self) -> HandlerKind {
        HandlerKind::Custom
    }

    fn is_available(&mut self, application: &Application) -> bool;

    fn deliver(&mut self, application: &Application, event: &Event) -> Result<()>;
}
