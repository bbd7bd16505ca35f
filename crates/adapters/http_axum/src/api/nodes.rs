//! JSON handlers for browsing the node graph.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use ladsim_app::ports::{AddressSpaceHost, HistoryRepository};
use ladsim_domain::address_space::{AddressSpace, NodeClass, QualifiedName};
use ladsim_domain::error::NotFoundError;
use ladsim_domain::id::NodeId;
use ladsim_domain::variant::{DataType, DataValue, ValueRank};

use crate::error::ApiError;
use crate::state::AppState;

/// Reference to a child node.
#[derive(Debug, Serialize)]
pub struct ChildRef {
    pub node_id: NodeId,
    pub browse_name: QualifiedName,
    pub node_class: NodeClass,
}

/// Variable-only part of a node.
#[derive(Debug, Serialize)]
pub struct VariableView {
    pub data_type: DataType,
    pub value_rank: ValueRank,
    pub array_length: Option<usize>,
    pub historizing: bool,
    pub value: DataValue,
}

/// One node with its attributes and children.
#[derive(Debug, Serialize)]
pub struct NodeView {
    pub node_id: NodeId,
    pub browse_name: QualifiedName,
    pub display_name: String,
    pub node_class: NodeClass,
    pub type_definition: Option<String>,
    pub parent: Option<NodeId>,
    pub variable: Option<VariableView>,
    pub children: Vec<ChildRef>,
}

fn read_node(space: &AddressSpace, id: NodeId) -> Option<NodeView> {
    let node = space.node(id)?;
    Some(NodeView {
        node_id: node.id,
        browse_name: node.browse_name.clone(),
        display_name: node.display_name.clone(),
        node_class: node.node_class(),
        type_definition: space.type_definition_name(id).map(str::to_owned),
        parent: node.parent,
        variable: node.as_variable().map(|attrs| VariableView {
            data_type: attrs.data_type,
            value_rank: attrs.value_rank,
            array_length: attrs.array_length,
            historizing: attrs.historizing,
            value: attrs.value.clone(),
        }),
        children: space
            .children(id)
            .map(|child| ChildRef {
                node_id: child.id,
                browse_name: child.browse_name.clone(),
                node_class: child.node_class(),
            })
            .collect(),
    })
}

/// `GET /api/nodes` — the `Objects` folder.
pub async fn root<H, R>(State(state): State<AppState<H, R>>) -> Result<Json<NodeView>, ApiError>
where
    H: AddressSpaceHost + 'static,
    R: HistoryRepository + 'static,
{
    let view = state
        .host
        .browse(|space| read_node(space, space.objects_folder()))
        .ok_or_else(|| NotFoundError {
            entity: "Node",
            id: "Objects".to_string(),
        })?;
    Ok(Json(view))
}

/// `GET /api/nodes/{id}`
pub async fn get<H, R>(
    State(state): State<AppState<H, R>>,
    Path(id): Path<String>,
) -> Result<Json<NodeView>, ApiError>
where
    H: AddressSpaceHost + 'static,
    R: HistoryRepository + 'static,
{
    let node = super::parse_node_id(&id)?;
    let view = state
        .host
        .browse(|space| read_node(space, node))
        .ok_or_else(|| NotFoundError {
            entity: "Node",
            id: node.to_string(),
        })?;
    Ok(Json(view))
}
