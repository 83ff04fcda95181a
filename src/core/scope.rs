//! Immutable scope chain for grouped and bound attributes
//!
//! Every `with_group` / `with_attrs` call produces a new leaf that points
//! at its parent. Nodes are never modified after creation, so a chain can
//! be shared across threads and branched freely: two children of the same
//! ancestor never see each other's bindings.

use super::value::Attr;
use std::sync::Arc;

#[derive(Debug)]
enum Binding {
    Group(String),
    Attrs(Vec<Attr>),
}

#[derive(Debug)]
struct ScopeNode {
    parent: Option<Arc<ScopeNode>>,
    binding: Binding,
}

/// Attributes bound at one group level, in binding order.
pub(crate) struct Segment<'a> {
    pub(crate) group: Option<&'a str>,
    pub(crate) attrs: Vec<&'a Attr>,
}

/// Accumulated groups and attributes of a handler.
///
/// # Example
///
/// ```
/// use gcp_logger_system::{Attr, ScopeChain};
///
/// let base = ScopeChain::root().with_group("request");
/// let a = base.with_attrs([Attr::new("id", 1)]);
/// let b = base.with_attrs([Attr::new("id", 2)]);
///
/// assert_eq!(a.groups(), vec!["request".to_string()]);
/// assert_eq!(b.groups(), a.groups());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScopeChain {
    leaf: Option<Arc<ScopeNode>>,
}

impl ScopeChain {
    /// The empty chain: no groups, no attributes.
    pub fn root() -> Self {
        Self { leaf: None }
    }

    pub fn is_root(&self) -> bool {
        self.leaf.is_none()
    }

    /// Open a group; attributes bound afterwards nest under `name`.
    ///
    /// An empty name returns the chain unchanged.
    #[must_use]
    pub fn with_group(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            return self.clone();
        }
        self.push(Binding::Group(name))
    }

    /// Bind attributes at the innermost open group.
    #[must_use]
    pub fn with_attrs<I>(&self, attrs: I) -> Self
    where
        I: IntoIterator<Item = Attr>,
    {
        let attrs: Vec<Attr> = attrs.into_iter().collect();
        if attrs.is_empty() {
            return self.clone();
        }
        self.push(Binding::Attrs(attrs))
    }

    /// Open group names, outermost first.
    pub fn groups(&self) -> Vec<String> {
        self.segments()
            .into_iter()
            .filter_map(|segment| segment.group.map(str::to_owned))
            .collect()
    }

    fn push(&self, binding: Binding) -> Self {
        Self {
            leaf: Some(Arc::new(ScopeNode {
                parent: self.leaf.clone(),
                binding,
            })),
        }
    }

    /// Split the chain into one segment per group level, root first.
    ///
    /// The first segment is always the root level.
    pub(crate) fn segments(&self) -> Vec<Segment<'_>> {
        let mut nodes = Vec::new();
        let mut current = self.leaf.as_deref();
        while let Some(node) = current {
            nodes.push(node);
            current = node.parent.as_deref();
        }

        let mut segments = vec![Segment {
            group: None,
            attrs: Vec::new(),
        }];
        for node in nodes.into_iter().rev() {
            match &node.binding {
                Binding::Group(name) => segments.push(Segment {
                    group: Some(name.as_str()),
                    attrs: Vec::new(),
                }),
                Binding::Attrs(attrs) => {
                    if let Some(segment) = segments.last_mut() {
                        segment.attrs.extend(attrs.iter());
                    }
                }
            }
        }
        segments
    }
}
