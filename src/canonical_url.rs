use crate::canon::{HostInfo, canonicalize_ip_address};
use crate::code_unit::CodeUnit;
use crate::compat::{Box, String};
use crate::component::Component;
use crate::error::CanonError;
use crate::output::CanonOutput;
use crate::parsed::Parsed;
use crate::parser::{extract_file_name, parse_port};
use crate::query_pairs::QueryPairs;
use crate::replacements::Replacements;
use crate::scheme::{SchemeRegistry, compare_scheme_component, default_port_for_scheme, default_registry};
use crate::types::ComponentType;
use crate::url_util::{canonicalize_with, domain_is, replace_components_with, resolve_relative_with};
use core::fmt;

/// An owned canonical URL and its component spans.
///
/// Parsing never fails outright: an invalid URL keeps whatever was written
/// while canonicalizing it, together with the first error, so it can still be
/// displayed. Use [`CanonicalUrl::is_valid`] before trusting the components.
///
/// ```
/// use urlcanon::CanonicalUrl;
///
/// let url = CanonicalUrl::parse("HTTP://Example.com:80/a/./b/../c?q#f");
/// assert!(url.is_valid());
/// assert_eq!(url.as_str(), "http://example.com/a/c?q#f");
/// assert_eq!(url.host(), "example.com");
/// assert_eq!(url.effective_int_port(), Some(80));
///
/// let next = url.join("../d");
/// assert_eq!(next.as_str(), "http://example.com/d");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanonicalUrl {
    spec: String,
    parsed: Parsed,
    error: Option<CanonError>,
    inner: Option<Box<CanonicalUrl>>,
    // Classified against the registry the URL was built with.
    standard: bool,
}

impl CanonicalUrl {
    /// Canonicalize `input` with the default scheme registry.
    pub fn parse(input: &str) -> Self {
        Self::parse_with(input, default_registry())
    }

    pub fn parse_with(input: &str, registry: &SchemeRegistry) -> Self {
        Self::from_units(input.as_bytes(), registry)
    }

    /// Canonicalize UTF-16 input. Unpaired surrogates become U+FFFD and make
    /// the URL invalid.
    pub fn parse_utf16(input: &[u16]) -> Self {
        Self::from_units(input, default_registry())
    }

    fn from_units<C: CodeUnit>(input: &[C], registry: &SchemeRegistry) -> Self {
        let mut output = CanonOutput::with_capacity(input.len() + 32);
        let canonical = canonicalize_with(input, registry, None, &mut output);
        Self::from_output(output, canonical.parsed, canonical.error, registry)
    }

    fn from_output(
        output: CanonOutput,
        parsed: Parsed,
        error: Option<CanonError>,
        registry: &SchemeRegistry,
    ) -> Self {
        let spec = output.into_string();
        let inner = parsed.inner_parsed().and_then(|inner| {
            let text = spec.get(inner.scheme.begin..inner.length())?;
            Some(Box::new(Self::parse_with(text, registry)))
        });
        let standard = parsed
            .scheme
            .as_str_on(&spec)
            .is_some_and(|scheme| registry.is_standard(scheme));
        Self {
            spec,
            parsed,
            error,
            inner,
            standard,
        }
    }

    /// An empty, invalid URL carrying `error`.
    fn invalid(error: Option<CanonError>) -> Self {
        Self {
            error: error.or(Some(CanonError::MissingScheme)),
            ..Self::default()
        }
    }

    /// Resolve `relative` against this URL.
    ///
    /// Joining onto an invalid URL gives an empty invalid URL.
    pub fn join(&self, relative: &str) -> Self {
        self.join_with(relative, default_registry())
    }

    pub fn join_with(&self, relative: &str, registry: &SchemeRegistry) -> Self {
        if !self.is_valid() {
            return Self::invalid(self.error);
        }
        let mut output = CanonOutput::with_capacity(self.spec.len() + relative.len());
        let canonical = resolve_relative_with(
            &self.spec,
            &self.parsed,
            relative.as_bytes(),
            registry,
            None,
            &mut output,
        );
        Self::from_output(output, canonical.parsed, canonical.error, registry)
    }

    /// A copy of this URL with `replacements` applied. Every component is
    /// canonicalized again under the rules of the resulting scheme.
    pub fn with_replacements<C: CodeUnit>(&self, replacements: &Replacements<'_, C>) -> Self {
        self.with_replacements_in(replacements, default_registry())
    }

    pub fn with_replacements_in<C: CodeUnit>(
        &self,
        replacements: &Replacements<'_, C>,
        registry: &SchemeRegistry,
    ) -> Self {
        if !self.is_valid() {
            return Self::invalid(self.error);
        }
        let mut output = CanonOutput::with_capacity(self.spec.len());
        let canonical = replace_components_with(
            &self.spec,
            &self.parsed,
            replacements,
            registry,
            None,
            &mut output,
        );
        Self::from_output(output, canonical.parsed, canonical.error, registry)
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    pub fn error(&self) -> Option<CanonError> {
        self.error
    }

    pub fn is_empty(&self) -> bool {
        self.spec.is_empty()
    }

    /// The canonical text, also when the URL is invalid.
    pub fn as_str(&self) -> &str {
        &self.spec
    }

    pub fn into_string(self) -> String {
        self.spec
    }

    pub fn parsed(&self) -> &Parsed {
        &self.parsed
    }

    /// The inner URL of a valid `filesystem:` URL.
    pub fn inner_url(&self) -> Option<&CanonicalUrl> {
        self.inner.as_deref()
    }

    /// The text of a component, `None` when it is absent.
    pub fn component(&self, ty: ComponentType) -> Option<&str> {
        self.parsed.component(ty).as_str_on(&self.spec)
    }

    fn component_or_empty(&self, ty: ComponentType) -> &str {
        self.component(ty).unwrap_or_default()
    }

    /// The scheme without its `:`.
    pub fn scheme(&self) -> &str {
        self.component_or_empty(ComponentType::Scheme)
    }

    pub fn username(&self) -> &str {
        self.component_or_empty(ComponentType::Username)
    }

    pub fn password(&self) -> &str {
        self.component_or_empty(ComponentType::Password)
    }

    /// The host, with brackets around IPv6 literals.
    pub fn host(&self) -> &str {
        self.component_or_empty(ComponentType::Host)
    }

    /// The port as written, without the `:`. Empty for default ports.
    pub fn port(&self) -> &str {
        self.component_or_empty(ComponentType::Port)
    }

    pub fn path(&self) -> &str {
        self.component_or_empty(ComponentType::Path)
    }

    /// The query without its `?`.
    pub fn query(&self) -> &str {
        self.component_or_empty(ComponentType::Query)
    }

    /// The fragment without its `#`.
    pub fn fragment(&self) -> &str {
        self.component_or_empty(ComponentType::Fragment)
    }

    pub fn has_scheme(&self) -> bool {
        self.parsed.scheme.is_valid()
    }

    pub fn has_credentials(&self) -> bool {
        self.parsed.username.is_nonempty() || self.parsed.password.is_nonempty()
    }

    pub fn has_username(&self) -> bool {
        self.parsed.username.is_nonempty()
    }

    pub fn has_password(&self) -> bool {
        self.parsed.password.is_nonempty()
    }

    pub fn has_host(&self) -> bool {
        self.parsed.host.is_nonempty()
    }

    pub fn has_port(&self) -> bool {
        self.parsed.port.is_valid()
    }

    pub fn has_query(&self) -> bool {
        self.parsed.query.is_valid()
    }

    pub fn has_fragment(&self) -> bool {
        self.parsed.fragment.is_valid()
    }

    pub fn has_opaque_path(&self) -> bool {
        self.parsed.has_opaque_path
    }

    /// The explicit port as a number.
    pub fn int_port(&self) -> Option<u16> {
        parse_port(self.spec.as_bytes(), self.parsed.port).ok().flatten()
    }

    /// The explicit port, or the scheme's default port.
    pub fn effective_int_port(&self) -> Option<u16> {
        self.int_port().or_else(|| default_port_for_scheme(self.scheme()))
    }

    /// Case-insensitive scheme check against a lower-case name.
    pub fn scheme_is(&self, scheme: &str) -> bool {
        compare_scheme_component(self.scheme().as_bytes(), scheme)
    }

    pub fn scheme_is_http_or_https(&self) -> bool {
        self.scheme_is("http") || self.scheme_is("https")
    }

    pub fn scheme_is_ws_or_wss(&self) -> bool {
        self.scheme_is("ws") || self.scheme_is("wss")
    }

    pub fn scheme_is_file(&self) -> bool {
        self.scheme_is("file")
    }

    pub fn scheme_is_filesystem(&self) -> bool {
        self.scheme_is("filesystem")
    }

    /// Whether the scheme is standard in the registry this URL was parsed,
    /// joined or rewritten with.
    pub fn is_standard(&self) -> bool {
        self.standard
    }

    /// What the host is, with its address bytes when it is an IP literal.
    pub fn host_info(&self) -> HostInfo {
        let mut info = HostInfo::default();
        let mut scratch = CanonOutput::new();
        let host = self.parsed.host;
        if host.is_nonempty() && self.is_standard() {
            // The host is canonical already; this only classifies it.
            let _ = canonicalize_ip_address(self.spec.as_bytes(), host, &mut scratch, &mut info);
        }
        info
    }

    pub fn host_is_ip_address(&self) -> bool {
        self.host_info().is_ip_address()
    }

    /// The host with the brackets of an IPv6 literal removed.
    pub fn host_no_brackets(&self) -> &str {
        let host = self.host();
        host.strip_prefix('[')
            .and_then(|inner| inner.strip_suffix(']'))
            .unwrap_or(host)
    }

    /// Whether the host is `domain` or a subdomain of it.
    pub fn domain_is(&self, domain: &str) -> bool {
        self.is_valid() && domain_is(self.host(), domain)
    }

    /// The path and query, as sent in an HTTP request line.
    pub fn path_for_request(&self) -> &str {
        let path = self.parsed.path;
        if !path.is_valid() {
            return "";
        }
        let end = if self.parsed.query.is_valid() {
            self.parsed.query.end()
        } else {
            path.end()
        };
        self.spec.get(path.begin..end).unwrap_or_default()
    }

    /// The last path segment, up to any `;` parameter.
    pub fn extract_file_name(&self) -> &str {
        extract_file_name(self.spec.as_bytes(), self.parsed.path)
            .as_str_on(&self.spec)
            .unwrap_or_default()
    }

    /// Key/value pairs of the query.
    pub fn query_pairs(&self) -> QueryPairs<'_, u8> {
        let query = if self.parsed.query.is_valid() {
            self.parsed.query
        } else {
            Component::ABSENT
        };
        QueryPairs::new(self.spec.as_bytes(), query)
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec)
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        &self.spec
    }
}

impl From<CanonicalUrl> for String {
    fn from(url: CanonicalUrl) -> Self {
        url.spec
    }
}
