//! Stream location derivation and the stream catalog seam.

use std::collections::{BTreeSet, HashSet};

use crate::error::DefinitionError;

/// Lookup into the version-control server's stream list.
pub trait StreamCatalog {
    /// Whether a stream with this exact path (e.g. `//depot/Main`) exists.
    fn has(&self, stream: &str) -> bool;
}

impl StreamCatalog for HashSet<String> {
    fn has(&self, stream: &str) -> bool {
        self.contains(stream)
    }
}

impl StreamCatalog for BTreeSet<String> {
    fn has(&self, stream: &str) -> bool {
        self.contains(stream)
    }
}

impl StreamCatalog for [&str] {
    fn has(&self, stream: &str) -> bool {
        self.iter().any(|s| *s == stream)
    }
}

impl StreamCatalog for Vec<String> {
    fn has(&self, stream: &str) -> bool {
        self.iter().any(|s| s == stream)
    }
}

impl<C: StreamCatalog + ?Sized> StreamCatalog for &C {
    fn has(&self, stream: &str) -> bool {
        (**self).has(stream)
    }
}

/// Adapts a closure into a [`StreamCatalog`].
pub struct FnCatalog<F>(pub F);

impl<F: Fn(&str) -> bool> StreamCatalog for FnCatalog<F> {
    fn has(&self, stream: &str) -> bool {
        (self.0)(stream)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamResult {
    pub depot: String,
    /// Only set when the stream was synthesized from depot and name.
    pub stream: Option<String>,
    pub root_path: Option<String>,
}

/// Work out where a branch lives.
///
/// Either `root_path` is given, in which case only its depot is extracted, or
/// a depot is, and the stream is composed as `//<depot>/<name>` with
/// `subpath` (default `/...`) appended for the root path.
pub fn resolve_stream(
    name: &str,
    root_path: Option<&str>,
    depot: Option<&str>,
    subpath: Option<&str>,
) -> Result<StreamResult, DefinitionError> {
    let root_path = root_path.filter(|p| !p.is_empty());
    let Some(root_path) = root_path else {
        let depot = depot
            .filter(|d| !d.is_empty())
            .ok_or_else(|| DefinitionError::MissingStreamDepot(name.to_string()))?;
        let stream = format!("//{}/{}", depot, name);
        let subpath = subpath.filter(|s| !s.is_empty()).unwrap_or("/...");
        return Ok(StreamResult {
            depot: depot.to_string(),
            root_path: Some(format!("{}{}", stream, subpath)),
            stream: Some(stream),
        });
    };

    if !root_path.starts_with("//") || !root_path.ends_with("/...") {
        return Err(DefinitionError::MalformedRootPath(root_path.to_string()));
    }

    let depot = depot_segment(root_path)
        .ok_or_else(|| DefinitionError::MissingDepotName(root_path.to_string()))?;
    Ok(StreamResult {
        depot: depot.to_string(),
        stream: None,
        root_path: None,
    })
}

/// The first path segment after the leading `//`, if it is followed by `/`.
fn depot_segment(root_path: &str) -> Option<&str> {
    let rest = root_path.strip_prefix("//")?;
    let (depot, _) = rest.split_once('/')?;
    (!depot.is_empty()).then_some(depot)
}
