//! Vertex and edge documents.

use graphwalk_common::types::{
    DocumentHandle, PropertyKey, PropertyMap, Value, is_system_attribute,
};
use graphwalk_common::utils::error::{Error, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A vertex: a handle plus an ordered property map.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// `Collection/key` of this vertex.
    pub handle: DocumentHandle,
    /// Properties in insertion order.
    pub properties: PropertyMap,
}

impl Vertex {
    /// Creates a vertex with no properties.
    #[must_use]
    pub fn new(handle: DocumentHandle) -> Self {
        Self {
            handle,
            properties: PropertyMap::new(),
        }
    }

    /// Creates a vertex with the given properties.
    pub fn with_properties(
        handle: DocumentHandle,
        properties: impl IntoIterator<Item = (impl Into<PropertyKey>, impl Into<Value>)>,
    ) -> Self {
        Self {
            handle,
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Adds or replaces one property.
    pub fn with_property(mut self, key: impl Into<PropertyKey>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Returns the vertex collection name.
    #[must_use]
    pub fn collection(&self) -> &str {
        self.handle.collection()
    }

    /// Returns the key within the collection.
    #[must_use]
    pub fn key(&self) -> &str {
        self.handle.key()
    }

    /// Gets a property value.
    #[must_use]
    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Rejects properties that shadow store-owned attributes.
    pub fn validate(&self) -> Result<()> {
        check_properties(&self.properties)
    }
}

/// A directed edge between two vertices.
///
/// The edge type is the collection part of its handle.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// `Collection/key` of this edge.
    pub handle: DocumentHandle,
    /// Source vertex.
    pub from: DocumentHandle,
    /// Target vertex.
    pub to: DocumentHandle,
    /// Properties in insertion order.
    pub properties: PropertyMap,
}

impl Edge {
    /// Creates an edge with no properties.
    #[must_use]
    pub fn new(handle: DocumentHandle, from: DocumentHandle, to: DocumentHandle) -> Self {
        Self {
            handle,
            from,
            to,
            properties: PropertyMap::new(),
        }
    }

    /// Adds or replaces one property.
    pub fn with_property(mut self, key: impl Into<PropertyKey>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Returns the edge collection name (the edge type).
    #[must_use]
    pub fn collection(&self) -> &str {
        self.handle.collection()
    }

    /// Returns the key within the collection.
    #[must_use]
    pub fn key(&self) -> &str {
        self.handle.key()
    }

    /// Gets a property value.
    #[must_use]
    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Returns the endpoint on the other side of `vertex`.
    ///
    /// For a self-loop this is `vertex` itself; `None` if the edge does not
    /// touch `vertex`.
    #[must_use]
    pub fn opposite(&self, vertex: &DocumentHandle) -> Option<&DocumentHandle> {
        if &self.from == vertex {
            Some(&self.to)
        } else if &self.to == vertex {
            Some(&self.from)
        } else {
            None
        }
    }

    /// Rejects properties that shadow store-owned attributes.
    pub fn validate(&self) -> Result<()> {
        check_properties(&self.properties)
    }
}

fn check_properties(properties: &PropertyMap) -> Result<()> {
    match properties.keys().find(|k| is_system_attribute(k.as_str())) {
        Some(key) => Err(Error::ReservedAttribute(key.to_string())),
        None => Ok(()),
    }
}

impl Serialize for Vertex {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.properties.len() + 2))?;
        map.serialize_entry("_id", &self.handle)?;
        map.serialize_entry("_key", self.key())?;
        for (key, value) in &self.properties {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for Edge {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.properties.len() + 4))?;
        map.serialize_entry("_id", &self.handle)?;
        map.serialize_entry("_key", self.key())?;
        map.serialize_entry("_from", &self.from)?;
        map.serialize_entry("_to", &self.to)?;
        for (key, value) in &self.properties {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(s: &str) -> DocumentHandle {
        DocumentHandle::parse(s).unwrap()
    }

    #[test]
    fn test_vertex_properties() {
        let v = Vertex::with_properties(h("Person/matteo"), [("firstName", "Matteo")])
            .with_property("age", 30i64);

        assert_eq!(v.collection(), "Person");
        assert_eq!(v.key(), "matteo");
        assert_eq!(v.get_property("firstName").and_then(|x| x.as_str()), Some("Matteo"));
        assert_eq!(v.get_property("age").and_then(|x| x.as_int()), Some(30));
        assert!(v.get_property("missing").is_none());
    }

    #[test]
    fn test_reserved_attributes_rejected() {
        let v = Vertex::new(h("Person/a")).with_property("_key", "b");
        assert_eq!(v.validate(), Err(Error::ReservedAttribute("_key".into())));

        let e = Edge::new(h("Friend/x"), h("Person/a"), h("Person/b")).with_property("_to", "c");
        assert_eq!(e.validate(), Err(Error::ReservedAttribute("_to".into())));
    }

    #[test]
    fn test_opposite() {
        let e = Edge::new(h("Friend/x"), h("Person/a"), h("Person/b"));
        assert_eq!(e.opposite(&h("Person/a")), Some(&h("Person/b")));
        assert_eq!(e.opposite(&h("Person/b")), Some(&h("Person/a")));
        assert_eq!(e.opposite(&h("Person/c")), None);

        let lp = Edge::new(h("Friend/l"), h("Person/a"), h("Person/a"));
        assert_eq!(lp.opposite(&h("Person/a")), Some(&h("Person/a")));
    }

    #[test]
    fn test_serialize_documents() {
        let v = Vertex::new(h("Person/a")).with_property("firstName", "A");
        assert_eq!(
            serde_json::to_string(&v).unwrap(),
            r#"{"_id":"Person/a","_key":"a","firstName":"A"}"#
        );

        let e = Edge::new(h("Friend/x"), h("Person/a"), h("Person/b")).with_property("type", 1i64);
        assert_eq!(
            serde_json::to_string(&e).unwrap(),
            r#"{"_id":"Friend/x","_key":"x","_from":"Person/a","_to":"Person/b","type":1}"#
        );
    }
}
