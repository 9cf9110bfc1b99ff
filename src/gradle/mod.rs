//! Gradle build file reading
//! Extracts the SDK requirements a React Native style project declares in
//! `android/build.gradle`:
//!
//! ```groovy
//! buildscript {
//!     ext {
//!         buildToolsVersion = "28.0.3"
//!         minSdkVersion = 16
//!     }
//! }
//! ```

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Build file location relative to the project root
pub const BUILD_FILE: &str = "android/build.gradle";

pub fn build_file_path(project_root: &Path) -> PathBuf {
    project_root.join(BUILD_FILE)
}

/// Value on the right-hand side of an `ext` assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradleValue {
    Str(String),
    Int(i64),
    /// Anything else, kept verbatim (`rootProject.ext.foo`, `findProperty(...)`)
    Expr(String),
}

impl GradleValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            GradleValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view, accepting quoted numbers (`"28"`)
    pub fn as_int(&self) -> Option<i64> {
        match self {
            GradleValue::Int(i) => Some(*i),
            GradleValue::Str(s) => s.trim().parse().ok(),
            GradleValue::Expr(_) => None,
        }
    }
}

/// SDK requirements declared by the project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRequirement {
    pub min_sdk_version: Option<u32>,
    pub target_sdk_version: Option<u32>,
    pub compile_sdk_version: Option<u32>,
    pub build_tools_version: Option<String>,
}

impl BuildRequirement {
    pub fn parse(content: &str) -> Self {
        let ext = parse_ext_block(content);
        let level = |key: &str| {
            ext.get(key)
                .and_then(GradleValue::as_int)
                .and_then(|v| u32::try_from(v).ok())
        };

        Self {
            min_sdk_version: level("minSdkVersion"),
            target_sdk_version: level("targetSdkVersion"),
            compile_sdk_version: level("compileSdkVersion"),
            build_tools_version: ext
                .get("buildToolsVersion")
                .and_then(GradleValue::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }

    /// Read the build file under `project_root`, `Ok(None)` when it is absent
    pub fn load(project_root: &Path) -> Result<Option<Self>> {
        let path = build_file_path(project_root);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(Self::parse(&content))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn load_async(project_root: &Path) -> Result<Option<Self>> {
        let path = build_file_path(project_root);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(Self::parse(&content))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Collect assignments from `buildscript { ext { } }`, falling back to a
/// top-level `ext { }` block
pub fn parse_ext_block(content: &str) -> HashMap<String, GradleValue> {
    let content = strip_comments(content);

    let ext_body = find_block(&content, "buildscript")
        .and_then(|buildscript| find_block(buildscript, "ext"))
        .or_else(|| find_block(&content, "ext"));

    match ext_body {
        Some(body) => parse_assignments(body),
        None => HashMap::new(),
    }
}

fn parse_assignments(body: &str) -> HashMap<String, GradleValue> {
    let mut values = HashMap::new();
    let mut depth = 0usize;

    for line in body.lines() {
        let line = line.trim();
        let (opens, closes) = brace_counts(line);
        let at_top = depth == 0;
        depth = (depth + opens).saturating_sub(closes);

        // Nested closures inside ext are not requirement declarations
        if !at_top || opens > 0 {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            continue;
        }

        let value = value.trim().trim_end_matches(';').trim();
        values.insert(key.to_string(), parse_value(value));
    }

    values
}

fn parse_value(raw: &str) -> GradleValue {
    for quote in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return GradleValue::Str(raw[1..raw.len() - 1].to_string());
        }
    }

    match raw.parse::<i64>() {
        Ok(i) => GradleValue::Int(i),
        Err(_) => GradleValue::Expr(raw.to_string()),
    }
}

/// String literal tracking shared by the scanners below
#[derive(Debug, Default)]
struct Quotes {
    open: Option<char>,
    escaped: bool,
}

impl Quotes {
    /// Feed the next character; true when it is code rather than string content
    fn is_code(&mut self, c: char) -> bool {
        if let Some(q) = self.open {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == q {
                self.open = None;
            }
            return false;
        }

        if c == '"' || c == '\'' {
            self.open = Some(c);
            return false;
        }
        true
    }
}

/// `{` and `}` counts on one line, ignoring braces inside strings
fn brace_counts(line: &str) -> (usize, usize) {
    let mut quotes = Quotes::default();
    line.chars()
        .filter(|&c| quotes.is_code(c))
        .fold((0, 0), |(opens, closes), c| match c {
            '{' => (opens + 1, closes),
            '}' => (opens, closes + 1),
            _ => (opens, closes),
        })
}

/// Body (without braces) of the first `name { ... }` block directly in
/// `content`; blocks nested inside other blocks are skipped
fn find_block<'a>(content: &'a str, name: &str) -> Option<&'a str> {
    let bytes = content.as_bytes();
    let mut depth = 0usize;
    let mut quotes = Quotes::default();

    for (start, c) in content.char_indices() {
        if !quotes.is_code(c) {
            continue;
        }

        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 && content[start..].starts_with(name) => {
                let end = start + name.len();
                let preceded_ok = start == 0 || !is_ident_byte(bytes[start - 1]);
                let followed_ok = end == bytes.len() || !is_ident_byte(bytes[end]);
                if !preceded_ok || !followed_ok {
                    continue;
                }

                let rest = &content[end..];
                let trimmed = rest.trim_start();
                if !trimmed.starts_with('{') {
                    continue;
                }

                let open = end + (rest.len() - trimmed.len());
                return matching_brace(content, open).map(|close| &content[open + 1..close]);
            }
            _ => {}
        }
    }

    None
}

fn matching_brace(content: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quotes = Quotes::default();

    for (i, c) in content[open..].char_indices() {
        if !quotes.is_code(c) {
            continue;
        }
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }

    None
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'.'
}

/// Remove `//` and `/* */` comments outside string literals
fn strip_comments(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut quotes = Quotes::default();

    while let Some(c) = chars.next() {
        if !quotes.is_code(c) {
            out.push(c);
            continue;
        }

        match c {
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => out.push(c),
        }
    }

    out
}
