/// Classification of a fetch failure.
///
/// Used for logging and warnings. The fetch layer treats every class the
/// same way: try the stale cache entry, otherwise hand the error to the caller.
///
/// | Class | Cause | Clears without a redeploy? |
/// |-------|-------|----------------------------|
/// | `Configuration` | missing credential | No |
/// | `Upstream` | provider-reported failure or malformed payload | Usually |
/// | `Transport` | network error or timeout | Usually |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureKind {
    /// A credential the source needs is not configured.
    /// Permanent until the process is restarted with the right environment.
    Configuration,

    /// The provider answered, but reported its own failure or returned
    /// data we could not use.
    Upstream,

    /// The request never produced a usable response (connect error, timeout).
    Transport,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Upstream => write!(f, "upstream"),
            Self::Transport => write!(f, "transport"),
        }
    }
}
