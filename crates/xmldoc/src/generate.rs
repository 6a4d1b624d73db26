//! Value→XML marshalling.
//!
//! The generator maps a structured value onto an entity tree. There is no
//! runtime reflection here: every marshallable type describes itself
//! through [`Marshal`], giving its declared name, an optional rename, and
//! a [`Shape`] that tells the generator how to walk it. Record fields
//! carry their configuration in [`Field`] descriptors (rename, render as
//! attribute, ignore).
//!
//! Naming falls back from the explicit argument, to the per-type rename,
//! to the declared type name; when all three are absent the call fails
//! with [`XmlError::Unnamed`] and no partial document escapes.

use crate::document::XmlDocument;
use crate::error::{Result, XmlError};
use crate::node::NodeId;
use crate::tree::XmlTree;
use std::collections::{BTreeMap, HashMap};

/// Entity name wrapped around each key/value pair of a marshalled map.
const PAIR: &str = "Pair";

/// A value the generator can turn into an entity tree.
pub trait Marshal {
    /// The type's declared name, used when nothing renames it.
    fn type_name(&self) -> Option<&str>;

    /// Per-type rename; wins over [`type_name`](Self::type_name).
    fn name_override(&self) -> Option<&str> {
        None
    }

    /// How the generator should walk this value.
    fn shape(&self) -> Shape<'_>;
}

/// How a value presents itself to the generator.
pub enum Shape<'a> {
    /// A canonical string rendering. Primitives are scalar; any other
    /// type may opt in ("string-rendered") by returning this.
    Scalar(String),
    /// An ordered sequence; each element becomes a child entity named by
    /// its own name resolution.
    Seq(Vec<&'a dyn Marshal>),
    /// Key/value entries; each becomes a `Pair` entity wrapping a
    /// key-named and a value-named child.
    Map(Vec<(&'a dyn Marshal, &'a dyn Marshal)>),
    /// A record with declared fields.
    Record(Vec<Field<'a>>),
}

/// A declared record field and its generator configuration.
pub struct Field<'a> {
    name: Option<&'a str>,
    rename: Option<&'a str>,
    attribute: bool,
    ignore: bool,
    value: Option<&'a dyn Marshal>,
}

impl<'a> Field<'a> {
    /// A field with its declared name and value.
    pub fn new<T: Marshal>(name: &'a str, value: &'a T) -> Self {
        Self {
            name: Some(name),
            rename: None,
            attribute: false,
            ignore: false,
            value: Some(value),
        }
    }

    /// A field whose value may be absent; absent fields are skipped.
    pub fn optional<T: Marshal>(name: &'a str, value: Option<&'a T>) -> Self {
        Self {
            name: Some(name),
            rename: None,
            attribute: false,
            ignore: false,
            value: value.map(|value| value as &dyn Marshal),
        }
    }

    /// Use this name instead of the declared one.
    pub fn rename(mut self, name: &'a str) -> Self {
        self.rename = Some(name);
        self
    }

    /// Render as an XML attribute on the enclosing entity instead of a
    /// child entity. The value must be string-rendered.
    pub fn attribute(mut self) -> Self {
        self.attribute = true;
        self
    }

    /// Leave this field out of the XML model entirely.
    pub fn ignore(mut self) -> Self {
        self.ignore = true;
        self
    }
}

fn resolved_name(value: &dyn Marshal) -> Result<&str> {
    value
        .name_override()
        .or_else(|| value.type_name())
        .ok_or(XmlError::Unnamed { what: "type" })
}

/// Generate the XML representation of `value`.
///
/// The root entity is named by `name` when given, otherwise by the
/// value's own name resolution.
pub fn generate(value: &dyn Marshal, name: Option<&str>) -> Result<XmlDocument> {
    let mut tree = XmlTree::new();
    let root = match name {
        Some(name) => tree.new_entity(name)?,
        None => tree.new_entity(resolved_name(value)?)?,
    };
    process(&mut tree, value, root)?;
    XmlDocument::new(tree, root)
}

fn process(tree: &mut XmlTree, value: &dyn Marshal, parent: NodeId) -> Result<()> {
    match value.shape() {
        Shape::Scalar(rendered) => {
            let text = tree.new_text(&rendered)?;
            tree.append_child(parent, text)?;
        }
        Shape::Seq(items) => {
            for item in items {
                let entity = tree.new_entity(resolved_name(item)?)?;
                process(tree, item, entity)?;
                tree.append_child(parent, entity)?;
            }
        }
        Shape::Map(entries) => {
            for (key, entry_value) in entries {
                let key_entity = tree.new_entity(resolved_name(key)?)?;
                process(tree, key, key_entity)?;
                let value_entity = tree.new_entity(resolved_name(entry_value)?)?;
                process(tree, entry_value, value_entity)?;
                let pair = tree.new_entity(PAIR)?;
                tree.append_child(pair, key_entity)?;
                tree.append_child(pair, value_entity)?;
                tree.append_child(parent, pair)?;
            }
        }
        Shape::Record(fields) => {
            for field in fields {
                if field.ignore {
                    continue;
                }
                let Some(field_value) = field.value else {
                    continue;
                };
                let name = field
                    .rename
                    .or(field.name)
                    .ok_or(XmlError::Unnamed { what: "field" })?;
                if field.attribute {
                    let Shape::Scalar(rendered) = field_value.shape() else {
                        return Err(XmlError::AttributeNotScalar {
                            field: name.to_string(),
                        });
                    };
                    tree.append_attribute(parent, name, &rendered)?;
                } else {
                    let entity = tree.new_entity(name)?;
                    process(tree, field_value, entity)?;
                    tree.append_child(parent, entity)?;
                }
            }
        }
    }
    Ok(())
}

macro_rules! marshal_scalar {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Marshal for $ty {
                fn type_name(&self) -> Option<&str> {
                    Some($name)
                }

                fn shape(&self) -> Shape<'_> {
                    Shape::Scalar(self.to_string())
                }
            }
        )*
    };
}

marshal_scalar! {
    i8 => "i8", i16 => "i16", i32 => "i32", i64 => "i64",
    u8 => "u8", u16 => "u16", u32 => "u32", u64 => "u64",
    f32 => "f32", f64 => "f64",
    bool => "bool", char => "char",
    String => "String", &str => "str",
}

impl<T: Marshal> Marshal for Vec<T> {
    /// Sequences are named by context (the enclosing field or an explicit
    /// argument), never by themselves.
    fn type_name(&self) -> Option<&str> {
        None
    }

    fn shape(&self) -> Shape<'_> {
        Shape::Seq(self.iter().map(|item| item as &dyn Marshal).collect())
    }
}

impl<K: Marshal, V: Marshal> Marshal for BTreeMap<K, V> {
    fn type_name(&self) -> Option<&str> {
        None
    }

    fn shape(&self) -> Shape<'_> {
        Shape::Map(
            self.iter()
                .map(|(key, value)| (key as &dyn Marshal, value as &dyn Marshal))
                .collect(),
        )
    }
}

/// Entry order follows the map's iteration order, which for `HashMap` is
/// unspecified; prefer [`BTreeMap`] when the output must be stable.
impl<K: Marshal, V: Marshal> Marshal for HashMap<K, V> {
    fn type_name(&self) -> Option<&str> {
        None
    }

    fn shape(&self) -> Shape<'_> {
        Shape::Map(
            self.iter()
                .map(|(key, value)| (key as &dyn Marshal, value as &dyn Marshal))
                .collect(),
        )
    }
}

impl<T: Marshal + ?Sized> Marshal for Box<T> {
    fn type_name(&self) -> Option<&str> {
        (**self).type_name()
    }

    fn name_override(&self) -> Option<&str> {
        (**self).name_override()
    }

    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }
}
