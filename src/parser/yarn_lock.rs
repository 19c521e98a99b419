//! yarn.lock parser (classic v1 and berry formats)

use std::sync::LazyLock;

use regex::Regex;

use crate::parser::traits::{LockfileParser, ParseError};
use crate::parser::types::LockedVersions;

/// Matches `  version "1.2.3"` (v1) and `  version: 1.2.3` (berry)
static VERSION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s+version:?\s+"?([^"\s]+)"?\s*$"#).expect("valid version line regex")
});

/// Parser for yarn.lock files
pub struct YarnLockParser;

impl LockfileParser for YarnLockParser {
    fn file_name(&self) -> &'static str {
        "yarn.lock"
    }

    fn parse(&self, content: &str) -> Result<LockedVersions, ParseError> {
        let mut versions = LockedVersions::new();
        // Descriptors (name, range) of the entry currently being read
        let mut descriptors: Vec<(String, String)> = Vec::new();

        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }

            if !line.starts_with(char::is_whitespace) {
                let header = line.trim_end().strip_suffix(':').ok_or_else(|| {
                    ParseError::InvalidSyntax {
                        line: index + 1,
                        message: format!("expected entry header, found {:?}", line),
                    }
                })?;
                descriptors = header.split(',').filter_map(split_descriptor).collect();
                continue;
            }

            if let Some(captures) = VERSION_LINE.captures(line) {
                let version = &captures[1];
                for (name, range) in descriptors.drain(..) {
                    versions.pin_descriptor(&name, &range, version);
                }
            }
        }

        Ok(versions)
    }
}

/// Split a descriptor like `"@scope/pkg@npm:^1.0.0"` into name and range
fn split_descriptor(descriptor: &str) -> Option<(String, String)> {
    let descriptor = descriptor.trim().trim_matches('"');
    let search_from = usize::from(descriptor.starts_with('@'));
    let at_pos = descriptor[search_from..].find('@')? + search_from;
    let (name, range) = (&descriptor[..at_pos], &descriptor[at_pos + 1..]);
    (!name.is_empty()).then(|| (name.to_string(), range.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parse_reads_classic_lockfile() {
        let content = r#"# THIS IS AN AUTOGENERATED FILE. DO NOT EDIT THIS FILE DIRECTLY.
# yarn lockfile v1


"@babel/code-frame@^7.0.0", "@babel/code-frame@^7.10.4":
  version "7.12.13"
  resolved "https://registry.yarnpkg.com/@babel/code-frame/-/code-frame-7.12.13.tgz"
  dependencies:
    "@babel/highlight" "^7.12.13"

lodash@^4.17.21:
  version "4.17.21"
  resolved "https://registry.yarnpkg.com/lodash/-/lodash-4.17.21.tgz"
"#;

        let versions = YarnLockParser.parse(content).unwrap();

        assert_eq!(versions.len(), 2);
        assert_eq!(
            versions.resolve("@babel/code-frame", "^7.10.4"),
            Some("7.12.13")
        );
        assert_eq!(versions.get("lodash"), Some("4.17.21"));
    }

    #[test]
    fn parse_reads_berry_lockfile() {
        let content = r#"# This file is generated by running "yarn install" inside your project.

__metadata:
  version: 6
  cacheKey: 8

"react@npm:^17.0.2":
  version: 17.0.2
  resolution: "react@npm:17.0.2"
  dependencies:
    loose-envify: ^1.1.0
"#;

        let versions = YarnLockParser.parse(content).unwrap();

        assert_eq!(versions.len(), 1);
        assert_eq!(versions.resolve("react", "^17.0.2"), Some("17.0.2"));
    }

    #[test]
    fn parse_pins_each_range_of_repeated_package() {
        let content = r#"lodash@^3.0.0:
  version "3.10.1"

lodash@^4.17.0, lodash@^4.17.21:
  version "4.17.21"
"#;

        let versions = YarnLockParser.parse(content).unwrap();

        assert_eq!(versions.resolve("lodash", "^3.0.0"), Some("3.10.1"));
        assert_eq!(versions.resolve("lodash", "^4.17.21"), Some("4.17.21"));
        assert_eq!(versions.resolve("lodash", "^4.17.0"), Some("4.17.21"));
        assert_eq!(versions.get("lodash"), None);
    }

    #[test]
    fn parse_pins_aliased_descriptor() {
        let content = r#""my-lodash@npm:lodash@^4.17.0":
  version "4.17.21"
"#;

        let versions = YarnLockParser.parse(content).unwrap();

        assert_eq!(
            versions.resolve("my-lodash", "npm:lodash@^4.17.0"),
            Some("4.17.21")
        );
    }

    #[test]
    fn parse_rejects_malformed_header() {
        let result = YarnLockParser.parse("lodash@^4.17.21\n  version \"4.17.21\"\n");

        assert!(matches!(
            result,
            Err(ParseError::InvalidSyntax { line: 1, .. })
        ));
    }

    #[rstest]
    #[case("lodash@^4.17.21", Some(("lodash", "^4.17.21")))]
    #[case(" \"@types/node@^20.0.0\"", Some(("@types/node", "^20.0.0")))]
    #[case("\"react@npm:^17.0.2\"", Some(("react", "npm:^17.0.2")))]
    #[case("my-lodash@npm:lodash@^4.17.0", Some(("my-lodash", "npm:lodash@^4.17.0")))]
    #[case("__metadata", None)]
    fn split_descriptor_separates_name_and_range(
        #[case] descriptor: &str,
        #[case] expected: Option<(&str, &str)>,
    ) {
        assert_eq!(
            split_descriptor(descriptor),
            expected.map(|(name, range)| (name.to_string(), range.to_string()))
        );
    }
}
