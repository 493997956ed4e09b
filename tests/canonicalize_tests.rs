#![allow(clippy::unwrap_used, clippy::panic, clippy::expect_used)]

//! Whole-URL canonicalization through the public entry points

use urlcanon::canon::{canonicalize_host_verbose, canonicalize_path, canonicalize_query};
use urlcanon::url_util::canonicalize;
use urlcanon::{CanonError, CanonMode, CanonOutput, CanonicalUrl, Component, HostFamily, HostInfo};

fn canon(input: &str) -> (String, Option<CanonError>) {
    let mut output = CanonOutput::new();
    let canonical = canonicalize(input.as_bytes(), None, &mut output);
    (output.into_string(), canonical.error)
}

fn valid(input: &str) -> String {
    let (text, error) = canon(input);
    assert_eq!(error, None, "{input} should be valid, got {text}");
    text
}

#[test]
fn test_scheme_and_host_case() {
    assert_eq!(valid("HTTP://WWW.Example.COM/"), "http://www.example.com/");
    assert_eq!(valid("Https://example.com"), "https://example.com/");
}

#[test]
fn test_default_ports_are_dropped() {
    assert_eq!(valid("http://h:80/"), "http://h/");
    assert_eq!(valid("https://h:443/"), "https://h/");
    assert_eq!(valid("ws://h:80/"), "ws://h/");
    assert_eq!(valid("http://h:443/"), "http://h:443/");
    assert_eq!(valid("http://h:0080/"), "http://h/");
}

#[test]
fn test_invalid_port() {
    let (text, error) = canon("http://h:99999/");
    assert_eq!(error, Some(CanonError::InvalidPort));
    assert!(text.starts_with("http://h:"));
}

#[test]
fn test_path_dot_segments() {
    assert_eq!(valid("http://h/a/b/c/./../../g"), "http://h/a/g");
    assert_eq!(valid("http://h/../../../x"), "http://h/x");
    assert_eq!(valid("http://h/a/%2E%2e/b"), "http://h/b");
    assert_eq!(valid("http://h\\a\\..\\b"), "http://h/b");
}

#[test]
fn test_path_escaping() {
    assert_eq!(valid("http://h/a b"), "http://h/a%20b");
    assert_eq!(valid("http://h/\u{e9}"), "http://h/%C3%A9");
    assert_eq!(valid("http://h/%41"), "http://h/%41");
}

#[test]
fn test_query_and_fragment() {
    assert_eq!(valid("http://h/?a b'c"), "http://h/?a%20b%27c");
    assert_eq!(valid("http://h/?"), "http://h/?");
    assert_eq!(valid("http://h/#"), "http://h/#");
    assert_eq!(valid("http://h/#a b"), "http://h/#a%20b");
}

#[test]
fn test_userinfo() {
    assert_eq!(valid("http://u:p@h/"), "http://u:p@h/");
    assert_eq!(valid("http://u:@h/"), "http://u:@h/");
    assert_eq!(valid("http://@h/"), "http://h/");
    assert_eq!(valid("http://a b:c@h/"), "http://a%20b:c@h/");
}

#[test]
fn test_ip_literals() {
    assert_eq!(valid("http://192.168.0.1/"), "http://192.168.0.1/");
    assert_eq!(valid("http://0xC0A80001/"), "http://192.168.0.1/");
    assert_eq!(valid("http://[2001:DB8:0:0:0:0:0:1]/"), "http://[2001:db8::1]/");
    assert_eq!(valid("http://[::127.0.0.1]/"), "http://[::7f00:1]/");
    assert_eq!(canon("http://256.0.0.1/").1, Some(CanonError::InvalidIpv4));
    assert_eq!(canon("http://[1:2]/").1, Some(CanonError::InvalidIpv6));
}

#[test]
fn test_ipv6_leftmost_longest_run() {
    assert_eq!(valid("http://[0:0:0:1:0:0:0:1]/"), "http://[::1:0:0:0:1]/");
}

#[test]
fn test_idn_hosts() {
    assert_eq!(valid("http://b\u{fc}cher.de/"), "http://xn--bcher-kva.de/");
    assert_eq!(valid("http://B%C3%BCcher.de/"), "http://xn--bcher-kva.de/");
}

#[test]
fn test_file_urls() {
    assert_eq!(valid("file:///c|/foo"), "file:///C:/foo");
    assert_eq!(valid("file://localhost/c:/x"), "file:///C:/x");
    assert_eq!(valid("file://server/share"), "file://server/share");
    assert_eq!(valid("FILE:foo"), "file:///foo");
}

#[test]
fn test_non_special_urls() {
    assert_eq!(valid("git://User@Host:22/x"), "git://User@Host:22/x");
    assert_eq!(valid("git:/x"), "git:/x");
    assert_eq!(valid("git:///x"), "git:///x");
    assert_eq!(valid("javascript:alert(1)"), "javascript:alert(1)");
    assert_eq!(valid("data:text/plain,a b"), "data:text/plain,a b");
}

#[test]
fn test_mailto() {
    assert_eq!(
        valid("mailto:Addr1@Foo.com?Subject=Hi There"),
        "mailto:Addr1@Foo.com?Subject=Hi%20There"
    );
}

#[test]
fn test_filesystem() {
    assert_eq!(
        valid("filesystem:http://u@host/Temporary/b?q#f"),
        "filesystem:http://host/Temporary/b?q#f"
    );
    assert_eq!(canon("filesystem:").1, Some(CanonError::InvalidFilesystemUrl));
}

#[test]
fn test_whitespace_and_controls() {
    assert_eq!(valid("  http://h/a\t\nb  "), "http://h/ab");
    assert_eq!(canon("no scheme here").1, Some(CanonError::MissingScheme));
}

#[test]
fn test_utf16_matches_utf8() {
    let input = "HTTP://b\u{fc}cher.de/\u{e9}?\u{e9}#\u{e9}";
    let wide: Vec<u16> = input.encode_utf16().collect();
    let mut output = CanonOutput::new();
    let canonical = canonicalize(&wide[..], None, &mut output);
    assert!(canonical.is_valid());
    assert_eq!(output.as_str(), valid(input));
}

#[test]
fn test_canonical_output_is_stable() {
    let inputs = [
        "http://h/a/../b?c d#e",
        "file:///c|/x",
        "git://h/a/./b",
        "mailto:a b@c",
        "https://[::1]:8443/",
    ];
    for input in inputs {
        let once = valid(input);
        assert_eq!(valid(&once), once);
    }
}

#[test]
fn test_canonical_input_is_unchanged() {
    let inputs = [
        "http://www.example.com/",
        "https://user:pw@example.com:8443/p/a.txt?x=1#frag",
        "http://[2001:db8::1]/",
        "http://xn--bcher-kva.de/",
        "file:///C:/foo",
        "file://server/share",
        "git://User@Host:22/x",
        "git:/.//x",
        "git://h",
        "mailto:%22a%20b%22@d",
        "filesystem:http://host/Temporary/b?q#f",
        "data:text/plain,a b",
    ];
    for input in inputs {
        assert_eq!(valid(input), input);
    }
}

#[test]
fn test_component_entry_points() {
    let mut output = CanonOutput::new();
    let mut info = HostInfo::default();
    let host = b"EXAMPLE.com";
    let result = canonicalize_host_verbose(&host[..], Component::new(0, host.len()), &mut output, &mut info);
    assert_eq!(result, Ok(()));
    assert_eq!(output.as_str(), "example.com");
    assert_eq!(info.family, HostFamily::Neutral);

    let mut output = CanonOutput::new();
    let mut out_path = Component::ABSENT;
    let path = b"/a/./b/../c";
    canonicalize_path(&path[..], Component::new(0, path.len()), CanonMode::Special, &mut output, &mut out_path)
        .unwrap();
    assert_eq!(output.as_str(), "/a/c");

    let mut output = CanonOutput::new();
    let mut out_query = Component::ABSENT;
    let query = b"a'b";
    canonicalize_query(&query[..], Component::new(0, query.len()), None, false, &mut output, &mut out_query);
    assert_eq!(output.as_str(), "?a'b");
    assert_eq!(out_query, Component::new(1, 3));
}

#[test]
fn test_canonical_url_roundtrip_of_components() {
    let url = CanonicalUrl::parse("https://user:pw@Example.com:8443/p/a.txt?x=1#frag");
    assert!(url.is_valid());
    assert_eq!(url.scheme(), "https");
    assert_eq!(url.host(), "example.com");
    assert_eq!(url.port(), "8443");
    assert_eq!(url.path(), "/p/a.txt");
    assert_eq!(url.query(), "x=1");
    assert_eq!(url.fragment(), "frag");
    assert_eq!(url.extract_file_name(), "a.txt");
    assert_eq!(url.to_string(), "https://user:pw@example.com:8443/p/a.txt?x=1#frag");
}
