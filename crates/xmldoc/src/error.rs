//! Error types for tree operations.
//!
//! Simple, flat error hierarchy.

use crate::node::NodeId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, XmlError>;

#[derive(Debug, Error)]
pub enum XmlError {
    /// A name was blank after trimming.
    #[error("name cannot be blank")]
    BlankName,

    /// A text value was blank after trimming.
    #[error("text value cannot be blank")]
    BlankValue,

    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("node {0} is not an entity")]
    NotAnEntity(NodeId),

    #[error("node {0} is not a text node")]
    NotAText(NodeId),

    /// Appending would make a node its own ancestor.
    #[error("appending {child} under {parent} would create a cycle")]
    WouldCycle { parent: NodeId, child: NodeId },

    /// The generator could not resolve a name for a type or field.
    #[error("no name could be resolved for the {what}")]
    Unnamed { what: &'static str },

    /// An attribute-marked field held a value with no string rendering.
    #[error("attribute field \"{field}\" needs a string-rendered value")]
    AttributeNotScalar { field: String },
}
