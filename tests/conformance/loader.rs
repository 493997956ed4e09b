/// Loader for the JSON case table
///
/// Each entry is either a comment string or an object with an `input`, an
/// optional `base` and the expected canonical `href` and components. An
/// entry with `"failure": true` must come out invalid.
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
#[allow(dead_code)]
pub enum TestCase {
    UrlTest {
        input: String,
        #[serde(default)]
        base: Option<String>,
        #[serde(default)]
        href: Option<String>,
        #[serde(default)]
        scheme: Option<String>,
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        password: Option<String>,
        #[serde(default)]
        host: Option<String>,
        #[serde(default)]
        port: Option<String>,
        #[serde(default)]
        path: Option<String>,
        #[serde(default)]
        query: Option<String>,
        #[serde(default)]
        fragment: Option<String>,
        #[serde(default)]
        failure: Option<bool>,
    },
    Comment(String),
}

#[derive(Debug, Clone)]
pub struct CaseFailure {
    pub case_num: usize,
    pub input: String,
    pub base: Option<String>,
    pub field: &'static str,
    pub expected: String,
    pub actual: String,
}

#[derive(Debug, Clone, Default)]
pub struct CaseResults {
    pub passed: usize,
    pub failed: usize,
    pub failures: Vec<CaseFailure>,
}

impl CaseResults {
    pub fn summary(&self) -> String {
        format!("Passed: {}, Failed: {}", self.passed, self.failed)
    }
}

pub fn load_cases() -> Vec<TestCase> {
    let data = include_str!("cases.json");
    serde_json::from_str(data).expect("cases.json should be valid JSON")
}
