use http::StatusCode;

use super::types::{Error, Kind, Phase};

impl Error {
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.inner.kind
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.inner.phase
    }

    /// Returns true if the request was aborted through its cancel token.
    #[must_use]
    pub fn is_cancel(&self) -> bool {
        matches!(self.inner.kind, Kind::Cancel)
    }

    /// Returns true if the request deadline elapsed.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self.inner.kind, Kind::Timeout)
    }

    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self.inner.kind, Kind::Network)
    }

    /// Returns true if the error was generated by the status validator.
    #[must_use]
    pub fn is_response(&self) -> bool {
        matches!(self.inner.kind, Kind::Response(_))
    }

    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self.inner.kind, Kind::Decode)
    }

    /// Returns the status code, if the error was generated from a response.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self.inner.kind {
            Kind::Response(code) => Some(code),
            _ => None,
        }
    }
}
