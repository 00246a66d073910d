// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! YAML frontmatter at the top of each content source.
//!
//! ```markdown
//! ---
//! title: "Heart rate zones explained"
//! description: "What the numbers on your watch mean"
//! date: 2024-05-01
//! targetKeywords: ["heart rate", "zones"]
//! ---
//!
//! # Body starts here
//! ```

use serde::Deserialize;

/// Metadata block parsed from a source file. Every field is optional in the
/// source; the repository applies defaults when assembling a `ContentItem`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frontmatter {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub target_keywords: Option<Vec<String>>,
    #[serde(default)]
    pub idea_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Frontmatter {
    /// Parse the YAML between the `---` fences. An empty block is all defaults.
    pub fn parse(yaml: &str) -> Result<Self, serde_yaml_ng::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(yaml)
    }
}

/// Split a source into (frontmatter yaml, body). Sources without a leading
/// `---` fence, or with an unterminated one, are all body. A leading byte
/// order mark is dropped.
pub fn split_frontmatter(content: &str) -> (String, String) {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let trimmed = content.trim_start();
    if !trimmed.starts_with("---") {
        return (String::new(), content.to_string());
    }
    let after = &trimmed[3..];
    if let Some(end) = after.find("\n---") {
        let rest = &after[end + 4..];
        // Drop the remainder of the closing fence line.
        let body = match rest.find('\n') {
            Some(nl) => &rest[nl + 1..],
            None => "",
        };
        (after[..end].trim().to_string(), body.to_string())
    } else {
        (String::new(), content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_frontmatter() {
        let (fm, body) = split_frontmatter("---\ntitle: Hi\n---\n\n# Body");
        assert_eq!(fm, "title: Hi");
        assert_eq!(body, "\n# Body");
    }

    #[test]
    fn test_split_frontmatter_none() {
        let (fm, body) = split_frontmatter("# Just markdown");
        assert!(fm.is_empty());
        assert_eq!(body, "# Just markdown");
    }

    #[test]
    fn test_split_frontmatter_unterminated() {
        let (fm, body) = split_frontmatter("---\ntitle: Hi\n# Body");
        assert!(fm.is_empty());
        assert_eq!(body, "---\ntitle: Hi\n# Body");
    }

    #[test]
    fn test_split_frontmatter_after_bom() {
        let (fm, body) = split_frontmatter("\u{feff}---\ntitle: T\ndate: 2024-05-01\n---\n# Hi");
        assert_eq!(fm, "title: T\ndate: 2024-05-01");
        assert_eq!(body, "# Hi");

        let (fm, body) = split_frontmatter("\u{feff}# Only body");
        assert!(fm.is_empty());
        assert_eq!(body, "# Only body");
    }

    #[test]
    fn test_parse_camel_case_fields() {
        let fm = Frontmatter::parse(
            "title: T\ndate: 2024-05-01\ntargetKeywords:\n  - a\n  - b\nideaName: cardio\n",
        )
        .expect("parse");
        assert_eq!(fm.title.as_deref(), Some("T"));
        assert_eq!(fm.date.as_deref(), Some("2024-05-01"));
        assert_eq!(fm.target_keywords, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(fm.idea_name.as_deref(), Some("cardio"));
        assert!(fm.description.is_none());
    }

    #[test]
    fn test_parse_empty_block() {
        let fm = Frontmatter::parse("  \n").expect("parse");
        assert!(fm.title.is_none());
    }

    #[test]
    fn test_parse_malformed_yaml() {
        assert!(Frontmatter::parse("title: [unclosed").is_err());
    }
}
