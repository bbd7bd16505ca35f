//! Device discovery — locating instances of a device type in the node graph.

use ladsim_domain::address_space::{AddressSpace, NodeClass};
use ladsim_domain::id::NodeId;

/// Outcome of inspecting one candidate below the discovery root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovered {
    /// The candidate's type definition is exactly the requested type.
    Matched { node: NodeId, browse_name: String },
    /// Any other object; `type_name` is `None` when the object has no type.
    Unmatched {
        node: NodeId,
        browse_name: String,
        type_name: Option<String>,
    },
}

impl Discovered {
    #[must_use]
    pub fn node(&self) -> NodeId {
        match self {
            Self::Matched { node, .. } | Self::Unmatched { node, .. } => *node,
        }
    }

    #[must_use]
    pub fn browse_name(&self) -> &str {
        match self {
            Self::Matched { browse_name, .. } | Self::Unmatched { browse_name, .. } => browse_name,
        }
    }

    /// The node, if it matched.
    #[must_use]
    pub fn matched(&self) -> Option<NodeId> {
        match self {
            Self::Matched { node, .. } => Some(*node),
            Self::Unmatched { .. } => None,
        }
    }
}

/// Inspect every object child of `root` and classify it against `type_name`.
///
/// The comparison is on the browse name of the direct type definition:
/// subtypes of `type_name` are *not* matched. Every candidate is logged.
/// Results keep the order of the children of `root`.
pub fn find_instances_of_type(
    space: &AddressSpace,
    root: NodeId,
    type_name: &str,
) -> Vec<Discovered> {
    space
        .children(root)
        .filter(|child| child.node_class() == NodeClass::Object)
        .map(|child| {
            let type_definition = child.type_definition.and_then(|ty| space.node(ty));
            let type_label = type_definition
                .map_or_else(|| "<untyped>".to_string(), |ty| ty.browse_name.to_string());
            tracing::info!("Found device {} of type {}", child.browse_name, type_label);
            let browse_name = child.browse_name.name.clone();
            match type_definition {
                Some(ty) if ty.browse_name.name == type_name => Discovered::Matched {
                    node: child.id,
                    browse_name,
                },
                _ => Discovered::Unmatched {
                    node: child.id,
                    browse_name,
                    type_name: type_definition.map(|ty| ty.browse_name.name.clone()),
                },
            }
        })
        .collect()
}
