use super::loader::{CaseFailure, CaseResults, TestCase, load_cases};
/// Case runner
///
/// Parses every input, resolving against its base when it has one, and
/// compares the canonical text and components with the table.
use urlcanon::CanonicalUrl;

fn parse_case(input: &str, base: Option<&str>) -> CanonicalUrl {
    match base {
        Some(base) => CanonicalUrl::parse(base).join(input),
        None => CanonicalUrl::parse(input),
    }
}

fn check(
    results: &mut CaseResults,
    failed: &mut bool,
    case: (usize, &str, Option<&str>),
    field: &'static str,
    expected: Option<&String>,
    actual: &str,
) {
    let Some(expected) = expected else {
        return;
    };
    if expected != actual {
        *failed = true;
        results.failures.push(CaseFailure {
            case_num: case.0,
            input: case.1.to_string(),
            base: case.2.map(str::to_string),
            field,
            expected: expected.clone(),
            actual: actual.to_string(),
        });
    }
}

pub fn run_cases(cases: Vec<TestCase>) -> CaseResults {
    let mut results = CaseResults::default();
    let mut case_num = 0;

    for case in cases {
        let TestCase::UrlTest {
            input,
            base,
            href,
            scheme,
            username,
            password,
            host,
            port,
            path,
            query,
            fragment,
            failure,
        } = case
        else {
            continue;
        };
        case_num += 1;

        let url = parse_case(&input, base.as_deref());
        let expect_failure = failure == Some(true);
        if url.is_valid() == expect_failure {
            results.failed += 1;
            results.failures.push(CaseFailure {
                case_num,
                input: input.clone(),
                base: base.clone(),
                field: "validity",
                expected: if expect_failure { "invalid" } else { "valid" }.to_string(),
                actual: format!("{:?} {}", url.error(), url.as_str()),
            });
            continue;
        }

        let mut failed = false;
        let id = (case_num, input.as_str(), base.as_deref());
        check(&mut results, &mut failed, id, "href", href.as_ref(), url.as_str());
        check(&mut results, &mut failed, id, "scheme", scheme.as_ref(), url.scheme());
        check(&mut results, &mut failed, id, "username", username.as_ref(), url.username());
        check(&mut results, &mut failed, id, "password", password.as_ref(), url.password());
        check(&mut results, &mut failed, id, "host", host.as_ref(), url.host());
        check(&mut results, &mut failed, id, "port", port.as_ref(), url.port());
        check(&mut results, &mut failed, id, "path", path.as_ref(), url.path());
        check(&mut results, &mut failed, id, "query", query.as_ref(), url.query());
        check(&mut results, &mut failed, id, "fragment", fragment.as_ref(), url.fragment());

        // Canonical output parses back to itself.
        if !expect_failure {
            let again = CanonicalUrl::parse(url.as_str());
            let expected = url.as_str().to_string();
            check(&mut results, &mut failed, id, "reparse", Some(&expected), again.as_str());
            if !again.is_valid() {
                check(&mut results, &mut failed, id, "reparse validity", Some(&"valid".to_string()), "invalid");
            }
        }

        if failed {
            results.failed += 1;
        } else {
            results.passed += 1;
        }
    }

    results
}

#[test]
fn test_conformance_cases() {
    let results = run_cases(load_cases());
    for failure in &results.failures {
        eprintln!(
            "case {} {:?} (base {:?}): {} expected {:?}, got {:?}",
            failure.case_num, failure.input, failure.base, failure.field, failure.expected, failure.actual
        );
    }
    assert!(results.passed > 0);
    assert!(results.failures.is_empty(), "{}", results.summary());
}
