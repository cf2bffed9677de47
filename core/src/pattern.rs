//! Route path patterns.
//!
//! A pattern is a `/`-separated list of segments. A segment starting with
//! `:` is a named parameter that matches any single non-empty path segment;
//! every other segment is a literal compared byte-for-byte. Request paths
//! arrive percent-encoded, so each segment is decoded on its own before it
//! is compared or bound; an encoded `%2F` stays inside its segment. There are no
//! wildcards spanning several segments and no regex, so a match is a single
//! left-to-right walk over equal-length segment lists.

use std::collections::BTreeMap;
use std::fmt;

use percent_encoding::percent_decode_str;

use crate::error::PatternError;

/// Values bound by parameter segments, keyed by parameter name.
pub type PathParams = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Parameter(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a route string such as `things/:id/colors`.
    ///
    /// Leading and trailing slashes are ignored, so `/thing1` and `thing1`
    /// are the same pattern. `/` alone is the root route with no segments.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        if let Some(character) = pattern.chars().find(|c| matches!(c, '?' | '#')) {
            return Err(PatternError::ReservedCharacter {
                pattern: pattern.to_string(),
                character,
            });
        }

        let trimmed = pattern.trim_matches('/');
        let mut segments = Vec::new();
        if !trimmed.is_empty() {
            for (position, raw) in trimmed.split('/').enumerate() {
                segments.push(parse_segment(pattern, position, raw)?);
            }
        }

        let mut seen = Vec::new();
        for segment in &segments {
            if let Segment::Parameter(name) = segment {
                if seen.contains(&name) {
                    return Err(PatternError::DuplicateParameter {
                        pattern: pattern.to_string(),
                        name: name.clone(),
                    });
                }
                seen.push(name);
            }
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Test `path` against this pattern, binding parameter values on match.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let candidate = split_path(path);
        if candidate.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::new();
        for (segment, raw) in self.segments.iter().zip(candidate) {
            let value = percent_decode_str(raw).decode_utf8_lossy();
            match segment {
                Segment::Literal(text) if *text == *value => {}
                Segment::Parameter(name) if !value.is_empty() => {
                    params.insert(name.clone(), value.into_owned());
                }
                _ => return None,
            }
        }
        Some(params)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_segment(pattern: &str, position: usize, raw: &str) -> Result<Segment, PatternError> {
    if raw.is_empty() {
        return Err(PatternError::EmptySegment {
            pattern: pattern.to_string(),
            position,
        });
    }
    match raw.strip_prefix(':') {
        Some(name) if is_identifier(name) => Ok(Segment::Parameter(name.to_string())),
        Some(name) => Err(PatternError::InvalidParameterName {
            pattern: pattern.to_string(),
            name: name.to_string(),
        }),
        None => Ok(Segment::Literal(raw.to_string())),
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Split a request path into segments. One leading and one trailing slash
/// are dropped; inner empty segments are kept so `a//b` never matches `a/:x/b`
/// with an empty binding.
fn split_path(path: &str) -> Vec<&str> {
    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);
    if path.is_empty() {
        return Vec::new();
    }
    path.split('/').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_literal_and_parameter_segments() {
        let pattern = PathPattern::parse("people/:id/roles/:role").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal("people".to_string()),
                Segment::Parameter("id".to_string()),
                Segment::Literal("roles".to_string()),
                Segment::Parameter("role".to_string()),
            ]
        );
    }

    #[test]
    fn leading_slash_is_optional() {
        let with = PathPattern::parse("/thing1").unwrap();
        let without = PathPattern::parse("thing1").unwrap();
        assert_eq!(with.segments(), without.segments());
    }

    #[test]
    fn root_pattern_matches_root_path_only() {
        let root = PathPattern::parse("/").unwrap();
        assert!(root.segments().is_empty());
        assert!(root.matches("/").is_some());
        assert!(root.matches("").is_some());
        assert!(root.matches("/thing1").is_none());
    }

    #[test]
    fn rejects_malformed_patterns() {
        assert_eq!(PathPattern::parse(""), Err(PatternError::Empty));
        assert!(matches!(
            PathPattern::parse("things//colors"),
            Err(PatternError::EmptySegment { position: 1, .. })
        ));
        assert!(matches!(
            PathPattern::parse("things/:"),
            Err(PatternError::InvalidParameterName { .. })
        ));
        assert!(matches!(
            PathPattern::parse("things/:9lives"),
            Err(PatternError::InvalidParameterName { .. })
        ));
        assert!(matches!(
            PathPattern::parse("a/:id/b/:id"),
            Err(PatternError::DuplicateParameter { .. })
        ));
        assert!(matches!(
            PathPattern::parse("search?q=1"),
            Err(PatternError::ReservedCharacter { character: '?', .. })
        ));
    }

    #[test]
    fn binds_parameter_values_verbatim() {
        let pattern = PathPattern::parse("people/:id/roles/:role").unwrap();
        let params = pattern.matches("/people/10/roles/walletinspector").unwrap();
        assert_eq!(params["id"], "10");
        assert_eq!(params["role"], "walletinspector");

        let params = pattern.matches("/people/007x/roles/a").unwrap();
        assert_eq!(params["id"], "007x");
        assert_eq!(params["role"], "a");
    }

    #[test]
    fn segment_count_must_be_equal() {
        let pattern = PathPattern::parse("things/:id/colors").unwrap();
        assert!(pattern.matches("/things/100").is_none());
        assert!(pattern.matches("/things/100/colors/red").is_none());
        assert!(pattern.matches("/things/100/colors").is_some());
    }

    #[test]
    fn literals_are_case_sensitive() {
        let pattern = PathPattern::parse("thing1").unwrap();
        assert!(pattern.matches("/Thing1").is_none());
        assert!(pattern.matches("/thing1/").is_some());
    }

    #[test]
    fn encoded_segments_are_decoded_before_matching() {
        let literal = PathPattern::parse("café").unwrap();
        assert!(literal.matches("/caf%C3%A9").is_some());

        let pattern = PathPattern::parse("people/:name").unwrap();
        let params = pattern.matches("/people/John%20Doe").unwrap();
        assert_eq!(params["name"], "John Doe");

        let params = pattern.matches("/people/a%2Fb").unwrap();
        assert_eq!(params["name"], "a/b");
    }

    #[test]
    fn parameters_never_bind_empty_segments() {
        let pattern = PathPattern::parse("a/:x/b").unwrap();
        assert!(pattern.matches("/a//b").is_none());
    }
}
