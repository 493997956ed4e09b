//! Requests to change parts of an existing canonical URL.
//!
//! A request never owns its strings: every replacement borrows the buffer it
//! reads from for the duration of the call.

use crate::code_unit::CodeUnit;
use crate::compat::{Cow, Vec};
use crate::component::Component;
use crate::types::ComponentType;

/// The components a [`ComponentReplacements`] can touch. The scheme is
/// handled separately by [`Replacements`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    Username,
    Password,
    Host,
    Port,
    Path,
    Query,
    Fragment,
}

impl Part {
    pub const ALL: [Part; 7] = [
        Part::Username,
        Part::Password,
        Part::Host,
        Part::Port,
        Part::Path,
        Part::Query,
        Part::Fragment,
    ];

    pub const fn component_type(self) -> ComponentType {
        match self {
            Part::Username => ComponentType::Username,
            Part::Password => ComponentType::Password,
            Part::Host => ComponentType::Host,
            Part::Port => ComponentType::Port,
            Part::Path => ComponentType::Path,
            Part::Query => ComponentType::Query,
            Part::Fragment => ComponentType::Fragment,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// What happens to one component.
#[derive(Debug, PartialEq, Eq)]
pub enum Replacement<'a, C> {
    /// Keep the base URL's component.
    Keep,
    /// Use `span` of `source` instead.
    Set { source: &'a [C], span: Component },
    /// Remove the component.
    Clear,
}

impl<C> Clone for Replacement<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Replacement<'_, C> {}

impl<C> Default for Replacement<'_, C> {
    fn default() -> Self {
        Self::Keep
    }
}

/// Replacements for every component except the scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentReplacements<'a, C> {
    parts: [Replacement<'a, C>; 7],
}

impl<C> Default for ComponentReplacements<'_, C> {
    fn default() -> Self {
        Self {
            parts: [Replacement::Keep; 7],
        }
    }
}

impl<'a, C> ComponentReplacements<'a, C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `part` with `span` of `source`. An absent span clears the
    /// component; an empty one keeps it present but empty.
    pub fn set(&mut self, part: Part, source: &'a [C], span: Component) -> &mut Self {
        self.parts[part.index()] = if span.is_valid() {
            Replacement::Set { source, span }
        } else {
            Replacement::Clear
        };
        self
    }

    pub fn clear(&mut self, part: Part) -> &mut Self {
        self.parts[part.index()] = Replacement::Clear;
        self
    }

    pub fn keep(&mut self, part: Part) -> &mut Self {
        self.parts[part.index()] = Replacement::Keep;
        self
    }

    pub fn get(&self, part: Part) -> Replacement<'a, C> {
        self.parts[part.index()]
    }

    /// True when nothing would change.
    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(|part| matches!(part, Replacement::Keep))
    }
}

impl<'a> ComponentReplacements<'a, u8> {
    /// Replace `part` with all of `text`.
    pub fn set_str(&mut self, part: Part, text: &'a str) -> &mut Self {
        self.set(part, text.as_bytes(), Component::new(0, text.len()))
    }
}

/// A full replacement request: an optional new scheme plus the component
/// replacements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replacements<'a, C> {
    scheme: Option<(&'a [C], Component)>,
    pub components: ComponentReplacements<'a, C>,
}

impl<C> Default for Replacements<'_, C> {
    fn default() -> Self {
        Self {
            scheme: None,
            components: ComponentReplacements::default(),
        }
    }
}

impl<'a, C> Replacements<'a, C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the scheme to `span` of `source`. The URL is re-parsed under
    /// the new scheme's rules.
    pub fn set_scheme(&mut self, source: &'a [C], span: Component) -> &mut Self {
        self.scheme = Some((source, span));
        self
    }

    pub fn scheme(&self) -> Option<(&'a [C], Component)> {
        self.scheme
    }

    pub fn set(&mut self, part: Part, source: &'a [C], span: Component) -> &mut Self {
        self.components.set(part, source, span);
        self
    }

    pub fn clear(&mut self, part: Part) -> &mut Self {
        self.components.clear(part);
        self
    }
}

impl<'a> Replacements<'a, u8> {
    pub fn set_scheme_str(&mut self, scheme: &'a str) -> &mut Self {
        self.set_scheme(scheme.as_bytes(), Component::new(0, scheme.len()))
    }

    pub fn set_str(&mut self, part: Part, text: &'a str) -> &mut Self {
        self.components.set_str(part, text);
        self
    }
}

/// One replacement converted to UTF-8.
#[derive(Debug, Clone)]
pub(crate) enum Narrowed<'a> {
    Keep,
    Set(Cow<'a, [u8]>),
    Clear,
}

/// UTF-8 copies of the replacement strings, borrowed when the input already
/// is UTF-8.
#[derive(Debug, Clone)]
pub(crate) struct NarrowedReplacements<'a> {
    pub(crate) scheme: Option<Cow<'a, [u8]>>,
    parts: Vec<Narrowed<'a>>,
}

impl<'a> NarrowedReplacements<'a> {
    pub(crate) fn new<C: CodeUnit>(replacements: &Replacements<'a, C>) -> Self {
        let scheme = replacements
            .scheme
            .map(|(source, span)| C::narrow(span.slice(source)));
        let parts = Part::ALL
            .iter()
            .map(|&part| match replacements.components.get(part) {
                Replacement::Keep => Narrowed::Keep,
                Replacement::Set { source, span } => Narrowed::Set(C::narrow(span.slice(source))),
                Replacement::Clear => Narrowed::Clear,
            })
            .collect();
        Self { scheme, parts }
    }

    /// The component replacements, reading from the narrowed copies.
    pub(crate) fn components(&self) -> ComponentReplacements<'_, u8> {
        let mut components = ComponentReplacements::new();
        for (&part, narrowed) in Part::ALL.iter().zip(&self.parts) {
            match narrowed {
                Narrowed::Keep => {}
                Narrowed::Set(text) => {
                    components.set(part, &text[..], Component::new(0, text.len()));
                }
                Narrowed::Clear => {
                    components.clear(part);
                }
            }
        }
        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_span_clears() {
        let mut components = ComponentReplacements::<u8>::new();
        assert!(components.is_empty());
        components.set(Part::Query, b"x", Component::ABSENT);
        assert_eq!(components.get(Part::Query), Replacement::Clear);
        components.set(Part::Query, b"x", Component::new(0, 0));
        assert!(matches!(components.get(Part::Query), Replacement::Set { span, .. } if span.len() == 0));
        components.keep(Part::Query);
        assert!(components.is_empty());
    }

    #[test]
    fn test_set_str() {
        let mut replacements = Replacements::new();
        replacements.set_scheme_str("https").set_str(Part::Host, "example.com");
        assert_eq!(
            replacements.scheme(),
            Some((&b"https"[..], Component::new(0, 5)))
        );
        assert_eq!(
            replacements.components.get(Part::Host),
            Replacement::Set {
                source: &b"example.com"[..],
                span: Component::new(0, 11)
            }
        );
        assert_eq!(replacements.components.get(Part::Path), Replacement::Keep);
    }

    #[test]
    fn test_narrow_utf16() {
        let host: Vec<u16> = "b\u{fc}cher".encode_utf16().collect();
        let path: Vec<u16> = "/x".encode_utf16().collect();
        let mut replacements = Replacements::new();
        replacements
            .set(Part::Host, &host[..], Component::new(0, host.len()))
            .set(Part::Path, &path[..], Component::new(1, 1))
            .clear(Part::Fragment);

        let narrowed = NarrowedReplacements::new(&replacements);
        let components = narrowed.components();
        assert_eq!(
            components.get(Part::Host),
            Replacement::Set {
                source: "b\u{fc}cher".as_bytes(),
                span: Component::new(0, 7)
            }
        );
        assert_eq!(
            components.get(Part::Path),
            Replacement::Set {
                source: &b"x"[..],
                span: Component::new(0, 1)
            }
        );
        assert_eq!(components.get(Part::Fragment), Replacement::Clear);
        assert_eq!(components.get(Part::Query), Replacement::Keep);
        assert!(narrowed.scheme.is_none());
    }
}
