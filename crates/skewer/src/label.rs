//! Label extraction from the `<root>/<category>/<label>/<filename>` path
//! convention.

use crate::constant::LABEL_ROOT;
use crate::error::{Error, Result};

/// Position of the label among the `/`-delimited segments of a sample path.
const LABEL_SEGMENT: usize = 2;

/// A sample path parsed against the `<root>/<category>/<label>/<filename>`
/// convention.
///
/// Segments past the label are folded into `file`, so nested file layouts
/// below the label directory are tolerated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SamplePath {
    pub root: String,
    pub category: String,
    pub label: String,
    pub file: Option<String>,
}

impl SamplePath {
    /// Parse `path`, ignoring trailing empty segments.
    ///
    /// Interior empty segments are kept, so `data//circle/x.png` has an empty
    /// category and the label `circle`.
    pub fn parse(path: &str) -> Result<Self> {
        let mut segments: Vec<&str> = path.split('/').collect();
        while segments.last().is_some_and(|s| s.is_empty()) {
            segments.pop();
        }

        if segments.len() <= LABEL_SEGMENT {
            return Err(Error::MalformedPath {
                path: path.to_string(),
                segments: segments.len(),
            });
        }

        let file = match &segments[LABEL_SEGMENT + 1..] {
            [] => None,
            rest => Some(rest.join("/")),
        };

        Ok(Self {
            root: segments[0].to_string(),
            category: segments[1].to_string(),
            label: segments[LABEL_SEGMENT].to_string(),
            file,
        })
    }
}

/// Derive the class label of a sample from its path.
pub fn extract_label(path: &str) -> Result<String> {
    SamplePath::parse(path).map(|parsed| parsed.label)
}

/// Derive the label of a manifest line, read as `data/<line>`.
///
/// Independent of where the assets are stored: a line `shapes/circle/1.png`
/// is always labeled `circle`.
pub fn label_for_line(line: &str) -> Result<String> {
    extract_label(&format!("{LABEL_ROOT}/{line}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_is_third_segment() {
        assert_eq!(extract_label("data/shapes/circle/0042.png").unwrap(), "circle");
    }

    #[test]
    fn test_parse_exposes_all_parts() {
        let parsed = SamplePath::parse("data/cifar/truck/7.png").unwrap();
        assert_eq!(
            parsed,
            SamplePath {
                root: "data".into(),
                category: "cifar".into(),
                label: "truck".into(),
                file: Some("7.png".into()),
            }
        );
    }

    #[test]
    fn test_trailing_delimiters_ignored() {
        assert_eq!(extract_label("data/shapes/square//").unwrap(), "square");
        assert_eq!(SamplePath::parse("data/shapes/square/").unwrap().file, None);
    }

    #[test]
    fn test_interior_empty_segment_kept() {
        assert_eq!(extract_label("data//circle/x.png").unwrap(), "circle");
    }

    #[test]
    fn test_nested_file_kept_whole() {
        let parsed = SamplePath::parse("data/shapes/circle/a/b.png").unwrap();
        assert_eq!(parsed.label, "circle");
        assert_eq!(parsed.file.as_deref(), Some("a/b.png"));
    }

    #[test]
    fn test_too_few_segments() {
        match extract_label("data/circle.png") {
            Err(Error::MalformedPath { path, segments }) => {
                assert_eq!(path, "data/circle.png");
                assert_eq!(segments, 2);
            }
            other => panic!("expected malformed path, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_delimiters_do_not_count() {
        assert!(matches!(
            extract_label("data/shapes///"),
            Err(Error::MalformedPath { segments: 2, .. })
        ));
    }

    #[test]
    fn test_manifest_line_label() {
        assert_eq!(label_for_line("shapes/circle/0042.png").unwrap(), "circle");
        assert!(matches!(
            label_for_line("circle.png"),
            Err(Error::MalformedPath { ref path, segments: 2 }) if path == "data/circle.png"
        ));
    }

    #[test]
    fn test_empty_path() {
        assert!(matches!(
            extract_label(""),
            Err(Error::MalformedPath { segments: 0, .. })
        ));
    }
}
