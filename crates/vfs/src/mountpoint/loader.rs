//! Building mounts from a declarative JSON tree.
//!
//! Node shapes:
//!
//! ```json
//! { "expression": { "tag": "photos" }, "group_by_tags": true, "group_by_meta_keys": ["camera"] }
//! { "blob_id": "D1" }
//! { "archive": { ... }, "live": { ... } }
//! ```
//!
//! A node with `expression` is a query mount, a node with `blob_id` (or a
//! string `id`) is a blob mount, and any other object is a union of its
//! values. Parsing checks the whole tree before any mount is built.

use std::collections::BTreeMap;
use std::sync::Arc;

use blobmount_model::Expression;
use blobmount_storage::BlobStore;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::blob::BlobMount;
use super::query::QueryMount;
use super::virtual_mount::VirtualMount;
use super::MountPoint;
use crate::options::MountOptions;
use crate::VfsError;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawQueryNode {
    expression: Value,
    #[serde(default)]
    group_by_tags: bool,
    #[serde(default, alias = "group_by_attribute_keys")]
    group_by_meta_keys: Vec<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBlobNode {
    #[serde(alias = "id")]
    blob_id: String,
}

/// Parsed mount tree, before any mount is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountNode {
    Query {
        expression: Expression,
        group_by_tags: bool,
        group_by_meta_keys: Vec<String>,
    },
    Blob {
        blob_id: String,
    },
    Virtual(BTreeMap<String, MountNode>),
}

impl MountNode {
    /// Parse a mount tree.
    ///
    /// # Returns
    /// `VfsError::Configuration` naming the offending node for any shape
    /// that is not understood, including invalid expressions and unknown
    /// fields.
    pub fn parse(value: &Value) -> Result<Self, VfsError> {
        parse_node(value, "")
    }

    /// Materialize the tree bottom-up.
    ///
    /// # Arguments
    /// * `store` - Blob store client shared by every leaf mount
    /// * `options` - Paging and lookup sizes for every leaf mount
    pub fn build(&self, store: &Arc<dyn BlobStore>, options: MountOptions) -> Arc<dyn MountPoint> {
        match self {
            MountNode::Query {
                expression,
                group_by_tags,
                group_by_meta_keys,
            } => Arc::new(
                QueryMount::new(expression.clone(), store.clone(), options)
                    .with_group_by_tags(*group_by_tags)
                    .with_group_by_meta_keys(group_by_meta_keys.clone()),
            ),
            MountNode::Blob { blob_id } => {
                Arc::new(BlobMount::new(blob_id.clone(), store.clone(), options))
            }
            MountNode::Virtual(children) => {
                let mounts: BTreeMap<String, Arc<dyn MountPoint>> = children
                    .iter()
                    .map(|(name, child)| (name.clone(), child.build(store, options)))
                    .collect();
                Arc::new(VirtualMount::new(mounts))
            }
        }
    }
}

/// Parse and build a mount tree in one step.
///
/// # Arguments
/// * `value` - Mount tree in JSON form
/// * `store` - Blob store client
/// * `options` - Paging and lookup sizes
pub fn load_mount(
    value: &Value,
    store: Arc<dyn BlobStore>,
    options: MountOptions,
) -> Result<Arc<dyn MountPoint>, VfsError> {
    let node: MountNode = MountNode::parse(value)?;
    Ok(node.build(&store, options))
}

fn parse_node(value: &Value, location: &str) -> Result<MountNode, VfsError> {
    let object: &Map<String, Value> = value.as_object().ok_or_else(|| {
        VfsError::configuration(format!("mount node '{}' is not an object", display(location)))
    })?;

    if object.contains_key("expression") {
        let raw: RawQueryNode = serde_json::from_value(value.clone()).map_err(|err| {
            VfsError::configuration(format!("query mount '{}': {}", display(location), err))
        })?;
        let expression: Expression = Expression::parse(&raw.expression).map_err(|err| {
            VfsError::configuration(format!("query mount '{}': {}", display(location), err))
        })?;
        return Ok(MountNode::Query {
            expression,
            group_by_tags: raw.group_by_tags,
            group_by_meta_keys: raw.group_by_meta_keys,
        });
    }

    if object.contains_key("blob_id") || object.get("id").is_some_and(Value::is_string) {
        let raw: RawBlobNode = serde_json::from_value(value.clone()).map_err(|err| {
            VfsError::configuration(format!("blob mount '{}': {}", display(location), err))
        })?;
        return Ok(MountNode::Blob {
            blob_id: raw.blob_id,
        });
    }

    let mut children: BTreeMap<String, MountNode> = BTreeMap::new();
    for (name, child) in object {
        let child_location: String = crate::path::join(location, name);
        children.insert(name.clone(), parse_node(child, &child_location)?);
    }
    Ok(MountNode::Virtual(children))
}

fn display(location: &str) -> &str {
    if location.is_empty() {
        "/"
    } else {
        location
    }
}
