/// Runtime environment features that drive transport selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportCapabilities {
    /// Browser-like host: requests go through XHR or fetch, never native
    pub browser_like: bool,
    /// The host exposes a fetch primitive
    pub fetch: bool,
    /// The host exposes an abortable fetch
    pub abort_controller: bool,
}

impl TransportCapabilities {
    /// Server-side host with a native HTTP stack.
    #[must_use]
    pub const fn host() -> Self {
        TransportCapabilities {
            browser_like: false,
            fetch: false,
            abort_controller: false,
        }
    }

    /// Modern browser: fetch with abort support.
    #[must_use]
    pub const fn browser() -> Self {
        TransportCapabilities {
            browser_like: true,
            fetch: true,
            abort_controller: true,
        }
    }

    /// Browser with XHR only.
    #[must_use]
    pub const fn legacy_browser() -> Self {
        TransportCapabilities {
            browser_like: true,
            fetch: false,
            abort_controller: false,
        }
    }
}

impl Default for TransportCapabilities {
    fn default() -> Self {
        TransportCapabilities::host()
    }
}
