use crate::code_unit::CodeUnit;
use crate::compat::{Cow, String};
use crate::component::Component;
use crate::types::SchemeType;

/// A standard scheme and its authority shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeWithType {
    pub scheme: Cow<'static, str>,
    pub ty: SchemeType,
}

impl SchemeWithType {
    const fn borrowed(scheme: &'static str, ty: SchemeType) -> Self {
        Self {
            scheme: Cow::Borrowed(scheme),
            ty,
        }
    }
}

type SchemeList = Cow<'static, [Cow<'static, str>]>;

const STANDARD_SCHEMES: &[SchemeWithType] = &[
    SchemeWithType::borrowed("https", SchemeType::WithHostPortAndUserInfo),
    SchemeWithType::borrowed("http", SchemeType::WithHostPortAndUserInfo),
    // `file` has a host but no userinfo or port.
    SchemeWithType::borrowed("file", SchemeType::WithHost),
    SchemeWithType::borrowed("ftp", SchemeType::WithHostPortAndUserInfo),
    SchemeWithType::borrowed("wss", SchemeType::WithHostPortAndUserInfo),
    SchemeWithType::borrowed("ws", SchemeType::WithHostPortAndUserInfo),
    SchemeWithType::borrowed("filesystem", SchemeType::WithoutAuthority),
];

const REFERRER_SCHEMES: &[Cow<'static, str>] = &[Cow::Borrowed("https"), Cow::Borrowed("http")];

const SECURE_SCHEMES: &[Cow<'static, str>] = &[
    Cow::Borrowed("https"),
    Cow::Borrowed("about"),
    Cow::Borrowed("data"),
    Cow::Borrowed("wss"),
];

const LOCAL_SCHEMES: &[Cow<'static, str>] = &[Cow::Borrowed("file")];

const NO_ACCESS_SCHEMES: &[Cow<'static, str>] = &[
    Cow::Borrowed("about"),
    Cow::Borrowed("javascript"),
    Cow::Borrowed("data"),
];

const CORS_ENABLED_SCHEMES: &[Cow<'static, str>] = &[
    Cow::Borrowed("http"),
    Cow::Borrowed("https"),
    Cow::Borrowed("data"),
];

const WEB_STORAGE_SCHEMES: &[Cow<'static, str>] = &[
    Cow::Borrowed("http"),
    Cow::Borrowed("https"),
    Cow::Borrowed("file"),
    Cow::Borrowed("ftp"),
    Cow::Borrowed("wss"),
    Cow::Borrowed("ws"),
];

const EMPTY_DOCUMENT_SCHEMES: &[Cow<'static, str>] = &[Cow::Borrowed("about")];

/// Immutable scheme classification tables.
///
/// Build one with [`SchemeRegistryBuilder`] during startup and share it by
/// reference afterwards. The built-in tables are available without any
/// allocation through [`SchemeRegistry::builtin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeRegistry {
    standard: Cow<'static, [SchemeWithType]>,
    referrer: SchemeList,
    secure: SchemeList,
    local: SchemeList,
    no_access: SchemeList,
    cors_enabled: SchemeList,
    web_storage: SchemeList,
    csp_bypassing: SchemeList,
    empty_document: SchemeList,
}

static BUILTIN: SchemeRegistry = SchemeRegistry::builtin();

#[cfg(feature = "std")]
static GLOBAL: std::sync::OnceLock<SchemeRegistry> = std::sync::OnceLock::new();

/// The registry installed by [`SchemeRegistryBuilder::lock_global`], or the
/// built-in one when nothing was installed.
pub fn default_registry() -> &'static SchemeRegistry {
    #[cfg(feature = "std")]
    {
        if let Some(registry) = GLOBAL.get() {
            return registry;
        }
    }
    &BUILTIN
}

impl Default for SchemeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SchemeRegistry {
    pub const fn builtin() -> Self {
        Self {
            standard: Cow::Borrowed(STANDARD_SCHEMES),
            referrer: Cow::Borrowed(REFERRER_SCHEMES),
            secure: Cow::Borrowed(SECURE_SCHEMES),
            local: Cow::Borrowed(LOCAL_SCHEMES),
            no_access: Cow::Borrowed(NO_ACCESS_SCHEMES),
            cors_enabled: Cow::Borrowed(CORS_ENABLED_SCHEMES),
            web_storage: Cow::Borrowed(WEB_STORAGE_SCHEMES),
            csp_bypassing: Cow::Borrowed(&[]),
            empty_document: Cow::Borrowed(EMPTY_DOCUMENT_SCHEMES),
        }
    }

    /// Look up the scheme named by `scheme` in `spec`, case-insensitively.
    /// The first registration of a name wins.
    pub fn classify<C: CodeUnit>(&self, spec: &[C], scheme: Component) -> Option<SchemeType> {
        if scheme.is_empty() {
            return None;
        }
        let name = scheme.slice(spec);
        self.standard
            .iter()
            .find(|entry| compare_scheme_component(name, &entry.scheme))
            .map(|entry| entry.ty)
    }

    /// Classification of an already extracted scheme name.
    pub fn scheme_type(&self, scheme: &str) -> Option<SchemeType> {
        self.classify(scheme.as_bytes(), Component::new(0, scheme.len()))
    }

    /// Registered standard schemes are the "special" ones.
    pub fn is_standard(&self, scheme: &str) -> bool {
        self.scheme_type(scheme).is_some()
    }

    pub fn is_referrer(&self, scheme: &str) -> bool {
        contains(&self.referrer, scheme)
    }

    pub fn is_secure(&self, scheme: &str) -> bool {
        contains(&self.secure, scheme)
    }

    pub fn is_local(&self, scheme: &str) -> bool {
        contains(&self.local, scheme)
    }

    pub fn is_no_access(&self, scheme: &str) -> bool {
        contains(&self.no_access, scheme)
    }

    pub fn is_cors_enabled(&self, scheme: &str) -> bool {
        contains(&self.cors_enabled, scheme)
    }

    pub fn is_web_storage(&self, scheme: &str) -> bool {
        contains(&self.web_storage, scheme)
    }

    pub fn is_csp_bypassing(&self, scheme: &str) -> bool {
        contains(&self.csp_bypassing, scheme)
    }

    pub fn is_empty_document(&self, scheme: &str) -> bool {
        contains(&self.empty_document, scheme)
    }

    pub fn standard_schemes(&self) -> impl Iterator<Item = &SchemeWithType> {
        self.standard.iter()
    }
}

fn contains(list: &[Cow<'static, str>], scheme: &str) -> bool {
    list.iter().any(|entry| entry.eq_ignore_ascii_case(scheme))
}

/// Case-insensitive comparison of a scheme in the input against a lower-case
/// name.
pub fn compare_scheme_component<C: CodeUnit>(spec: &[C], name: &str) -> bool {
    spec.len() == name.len()
        && spec
            .iter()
            .zip(name.bytes())
            .all(|(&unit, expected)| unit.ascii().map(|b| b.to_ascii_lowercase()) == Some(expected))
}

/// Default port of a scheme, `None` when it has none.
/// Matches on length and first byte before comparing the whole name.
pub fn default_port_for_scheme(scheme: &str) -> Option<u16> {
    let bytes = scheme.as_bytes();

    match (bytes.len(), bytes.first()) {
        (2, Some(b'w')) if bytes == b"ws" => Some(80),
        (3, Some(b'w')) if bytes == b"wss" => Some(443),
        (3, Some(b'f')) if bytes == b"ftp" => Some(21),
        (4, Some(b'h')) if bytes == b"http" => Some(80),
        (5, Some(b'h')) if bytes == b"https" => Some(443),
        _ => None,
    }
}

/// Startup-time mutable form of a [`SchemeRegistry`].
///
/// ```
/// use urlcanon::{SchemeRegistryBuilder, SchemeType};
///
/// let registry = SchemeRegistryBuilder::new()
///     .add_standard_scheme("chrome", SchemeType::WithHost)
///     .add_secure_scheme("chrome")
///     .lock();
/// assert!(registry.is_standard("chrome"));
/// ```
#[derive(Debug, Clone)]
pub struct SchemeRegistryBuilder {
    registry: SchemeRegistry,
}

impl Default for SchemeRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemeRegistryBuilder {
    /// Start from the built-in tables.
    pub fn new() -> Self {
        Self {
            registry: SchemeRegistry::builtin(),
        }
    }

    /// Start from empty tables, with no standard schemes at all.
    pub fn empty() -> Self {
        Self {
            registry: SchemeRegistry {
                standard: Cow::Borrowed(&[]),
                referrer: Cow::Borrowed(&[]),
                secure: Cow::Borrowed(&[]),
                local: Cow::Borrowed(&[]),
                no_access: Cow::Borrowed(&[]),
                cors_enabled: Cow::Borrowed(&[]),
                web_storage: Cow::Borrowed(&[]),
                csp_bypassing: Cow::Borrowed(&[]),
                empty_document: Cow::Borrowed(&[]),
            },
        }
    }

    /// Register a standard ("special") scheme. Registering a name twice adds
    /// a second entry that never matches.
    pub fn add_standard_scheme(mut self, scheme: &str, ty: SchemeType) -> Self {
        let scheme = normalize(scheme);
        tracing::debug!(scheme = %scheme, ?ty, "registering standard scheme");
        self.registry.standard.to_mut().push(SchemeWithType {
            scheme: Cow::Owned(scheme),
            ty,
        });
        self
    }

    pub fn add_referrer_scheme(mut self, scheme: &str) -> Self {
        push(&mut self.registry.referrer, "referrer", scheme);
        self
    }

    pub fn add_secure_scheme(mut self, scheme: &str) -> Self {
        push(&mut self.registry.secure, "secure", scheme);
        self
    }

    pub fn add_local_scheme(mut self, scheme: &str) -> Self {
        push(&mut self.registry.local, "local", scheme);
        self
    }

    pub fn add_no_access_scheme(mut self, scheme: &str) -> Self {
        push(&mut self.registry.no_access, "no-access", scheme);
        self
    }

    pub fn add_cors_enabled_scheme(mut self, scheme: &str) -> Self {
        push(&mut self.registry.cors_enabled, "cors-enabled", scheme);
        self
    }

    pub fn add_web_storage_scheme(mut self, scheme: &str) -> Self {
        push(&mut self.registry.web_storage, "web-storage", scheme);
        self
    }

    pub fn add_csp_bypassing_scheme(mut self, scheme: &str) -> Self {
        push(&mut self.registry.csp_bypassing, "csp-bypassing", scheme);
        self
    }

    pub fn add_empty_document_scheme(mut self, scheme: &str) -> Self {
        push(&mut self.registry.empty_document, "empty-document", scheme);
        self
    }

    /// Freeze the tables.
    pub fn lock(self) -> SchemeRegistry {
        tracing::debug!(
            standard = self.registry.standard.len(),
            "scheme registry locked"
        );
        self.registry
    }

    /// Freeze the tables and install them as the process-wide default
    /// returned by [`default_registry`]. Only the first call succeeds.
    #[cfg(feature = "std")]
    pub fn lock_global(self) -> crate::Result<&'static SchemeRegistry> {
        let mut installed = false;
        let registry = GLOBAL.get_or_init(|| {
            installed = true;
            self.lock()
        });
        if installed {
            Ok(registry)
        } else {
            tracing::debug!("global scheme registry already locked");
            Err(crate::CanonError::RegistryLocked)
        }
    }
}

fn normalize(scheme: &str) -> String {
    scheme.to_ascii_lowercase()
}

fn push(list: &mut SchemeList, set: &'static str, scheme: &str) {
    let scheme = normalize(scheme);
    tracing::debug!(scheme = %scheme, set, "registering scheme");
    list.to_mut().push(Cow::Owned(scheme));
}
