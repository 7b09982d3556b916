//! Declarative resource references.
//!
//! A [`AssetRef`] names a catalog entry without owning it: either a numeric
//! identifier assigned at registration time, or a path-like string resolved
//! against the catalog's path index. References are immutable descriptors;
//! all lifecycle tracking lives in the subscription ledger.

use std::fmt;

/// Numeric identity of a catalog entry.
///
/// Ids are assigned by whoever registers the entry (an editor, a manifest,
/// a test) and are stable for the lifetime of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub u64);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for AssetId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// An immutable resource descriptor: a catalog id or a path-like string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRef {
    /// Direct reference by catalog id.
    Id(AssetId),
    /// Reference by path, possibly relative to the referencing asset's
    /// location.
    Path(String),
}

impl AssetRef {
    /// True when this reference is path-like and therefore eligible for
    /// deferred resolution against late-registered entries.
    #[must_use]
    pub fn is_path(&self) -> bool {
        matches!(self, Self::Path(_))
    }

    /// Resolves a path-like reference against a base location (the directory
    /// of the referencing asset's catalog path). Id references are returned
    /// untouched by the caller; this method only normalizes paths.
    ///
    /// `"./"` and `"../"` segments are folded; absolute paths (leading `/`)
    /// ignore the base.
    #[must_use]
    pub fn resolve_path(path: &str, base: Option<&str>) -> String {
        let joined = match base {
            Some(base) if !path.starts_with('/') => {
                let dir = match base.rfind('/') {
                    Some(pos) => &base[..pos],
                    None => "",
                };
                if dir.is_empty() {
                    path.to_string()
                } else {
                    format!("{dir}/{path}")
                }
            }
            _ => path.to_string(),
        };

        let mut segments: Vec<&str> = Vec::new();
        let absolute = joined.starts_with('/');
        for segment in joined.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.last().is_some_and(|s| *s != "..") {
                        segments.pop();
                    } else if !absolute {
                        segments.push("..");
                    }
                }
                other => segments.push(other),
            }
        }

        let body = segments.join("/");
        if absolute { format!("/{body}") } else { body }
    }
}

impl From<AssetId> for AssetRef {
    fn from(id: AssetId) -> Self {
        Self::Id(id)
    }
}

impl From<u64> for AssetRef {
    fn from(raw: u64) -> Self {
        Self::Id(AssetId(raw))
    }
}

impl From<&str> for AssetRef {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_relative_against_base() {
        let resolved = AssetRef::resolve_path("red.mat", Some("models/robot.model"));
        assert_eq!(resolved, "models/red.mat");
    }

    #[test]
    fn resolve_parent_segments() {
        let resolved = AssetRef::resolve_path("../materials/red.mat", Some("models/robot.model"));
        assert_eq!(resolved, "materials/red.mat");
    }

    #[test]
    fn resolve_absolute_ignores_base() {
        let resolved = AssetRef::resolve_path("/shared/red.mat", Some("models/robot.model"));
        assert_eq!(resolved, "/shared/red.mat");
    }

    #[test]
    fn resolve_without_base() {
        assert_eq!(AssetRef::resolve_path("./red.mat", None), "red.mat");
    }
}
