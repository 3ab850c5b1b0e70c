//! Label validation.
//! A label namespaces generated paths under the temp root (`root/label/...`),
//! so it must be safe to splice into a path: one relative segment, nothing
//! that climbs or escapes. Pure check; runs before any filesystem mutation.

use std::path::{Component, Path};

use crate::errors::{Error, Result};

/// Validate a caller-supplied label.
///
/// Valid labels are the empty label (no namespacing beyond the root) or a
/// single normal path segment. Everything else is rejected: separators,
/// absolute paths, `.`, `..`, and strings that only *normalize* to one
/// segment (`a/.`, `a/`); the textual form itself must be the segment.
pub fn validate_label(label: impl AsRef<Path>) -> Result<()> {
    let label = label.as_ref();
    if label.as_os_str().is_empty() {
        return Ok(());
    }

    let mut components = label.components();
    let (first, rest) = (components.next(), components.next());

    let reason = match (first, rest) {
        (Some(Component::Normal(segment)), None) => {
            // Component iteration normalizes away trailing separators and
            // interior `.`, so compare against the raw text as well.
            if segment == label.as_os_str() {
                return Ok(());
            }
            "contains a path separator"
        }
        (Some(Component::RootDir), _) | (Some(Component::Prefix(_)), _) => "is an absolute path",
        (Some(Component::CurDir), None) => "is '.'",
        (Some(Component::ParentDir), None) => "is '..'",
        _ => "contains more than one path segment",
    };

    Err(Error::InvalidLabel {
        label: label.to_path_buf(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason_for(label: &str) -> &'static str {
        match validate_label(label).unwrap_err() {
            Error::InvalidLabel { reason, .. } => reason,
            other => panic!("expected InvalidLabel, got {other:?}"),
        }
    }

    #[test]
    fn empty_label_is_valid() {
        validate_label("").unwrap();
    }

    #[test]
    fn single_segment_is_valid() {
        validate_label("org.example").unwrap();
        validate_label("app-7").unwrap();
        validate_label(".hidden").unwrap();
    }

    #[test]
    fn separators_are_rejected() {
        assert_eq!(reason_for("a/b"), "contains more than one path segment");
        assert_eq!(reason_for("a/"), "contains a path separator");
        assert_eq!(reason_for("a/."), "contains a path separator");
    }

    #[test]
    fn absolute_paths_are_rejected() {
        assert_eq!(reason_for("/a"), "is an absolute path");
    }

    #[test]
    fn dot_and_dotdot_are_rejected() {
        assert_eq!(reason_for("."), "is '.'");
        assert_eq!(reason_for(".."), "is '..'");
        assert_eq!(reason_for("../x"), "contains more than one path segment");
    }
}
