/// Errors reported while canonicalizing, resolving or replacing URLs.
///
/// A failing operation still leaves a complete, displayable URL in the output
/// buffer. The error only tells the caller that the result is not valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum CanonError {
    /// The input has no `scheme:` prefix
    #[error("input has no scheme")]
    MissingScheme,
    /// The scheme contains characters outside `[a-zA-Z0-9+.-]` or is empty
    #[error("invalid scheme")]
    InvalidScheme,
    /// The scheme requires a host and none was given
    #[error("URL requires a non-empty host")]
    MissingHost,
    /// The scheme requires an authority section and none was given
    #[error("URL requires an authority")]
    MissingAuthority,
    /// A filesystem URL whose inner URL or type segment is unusable
    #[error("invalid filesystem URL")]
    InvalidFilesystemUrl,
    /// The base URL cannot have a relative reference resolved against it
    #[error("base URL is not hierarchical")]
    NotHierarchical,
    /// The host could not be canonicalized
    #[error("invalid host")]
    InvalidHost,
    /// Percent-escapes in the host decode to malformed UTF-8
    #[error("invalid percent encoding")]
    InvalidPercentEncoding,
    /// The input contained unpaired surrogates or malformed UTF-8
    #[error("malformed Unicode in input")]
    InvalidUnicode,
    /// UTS #46 processing rejected the host
    #[error("IDNA processing failed")]
    Idna,
    /// The host ends in a number but is not a valid IPv4 address
    #[error("invalid IPv4 address")]
    InvalidIpv4,
    /// A bracketed host is not a valid IPv6 address
    #[error("invalid IPv6 address")]
    InvalidIpv6,
    /// The port is not a decimal number in `0..=65535`
    #[error("invalid port")]
    InvalidPort,
    /// The host contains a code point that is never allowed there
    #[error("forbidden code point in host")]
    ForbiddenHostCodePoint,
    /// The process-wide scheme registry was already installed
    #[error("scheme registry is already locked")]
    RegistryLocked,
}

/// Coarse classification of [`CanonError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A component required by the scheme's shape is missing.
    Structural,
    /// A component is present but malformed.
    Encoding,
    /// A component is well formed but not allowed.
    Policy,
}

impl CanonError {
    pub fn kind(self) -> ErrorKind {
        match self {
            Self::MissingScheme
            | Self::MissingHost
            | Self::MissingAuthority
            | Self::InvalidFilesystemUrl
            | Self::NotHierarchical => ErrorKind::Structural,
            Self::InvalidScheme
            | Self::InvalidHost
            | Self::InvalidPercentEncoding
            | Self::InvalidUnicode
            | Self::Idna
            | Self::InvalidIpv4
            | Self::InvalidIpv6
            | Self::InvalidPort => ErrorKind::Encoding,
            Self::ForbiddenHostCodePoint | Self::RegistryLocked => ErrorKind::Policy,
        }
    }
}

/// Result type for URL operations
pub type Result<T> = core::result::Result<T, CanonError>;

/// Remembers the first failure of a multi-step canonicalization.
///
/// Every component is written even after a failure, so callers keep going and
/// only the first error is reported.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Validity {
    first: Option<CanonError>,
}

impl Validity {
    pub(crate) fn record(&mut self, result: Result<()>) {
        if let Err(error) = result {
            self.fail(error);
        }
    }

    pub(crate) fn fail(&mut self, error: CanonError) {
        if self.first.is_none() {
            self.first = Some(error);
        }
    }

    pub(crate) fn error(self) -> Option<CanonError> {
        self.first
    }
}
