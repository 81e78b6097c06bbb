//! Element attribute storage.
//!
//! [§ 4.9.2 Interface Attr](https://dom.spec.whatwg.org/#interface-attr)

use crate::Namespace;

/// [§ 4.9.2 Interface Attr](https://dom.spec.whatwg.org/#interface-attr)
///
/// "Attr nodes are simply known as attributes. They are sometimes referred to
/// as content attributes to avoid confusion with IDL attributes."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomAttribute {
    /// "An attribute has a namespace (null or a non-empty string)"
    pub namespace: Option<Namespace>,
    /// "namespace prefix (null or a non-empty string)"
    pub prefix: Option<String>,
    /// "local name"
    pub local_name: String,
    /// "value"
    pub value: String,
}

impl DomAttribute {
    /// An attribute with no namespace.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            namespace: None,
            prefix: None,
            local_name: name.into(),
            value: value.into(),
        }
    }

    /// "An attribute's qualified name is its local name if its namespace prefix
    /// is null, and its namespace prefix, followed by ":", followed by its local
    /// name, otherwise."
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{}", self.local_name),
            None => self.local_name.clone(),
        }
    }
}

/// Ordered attribute list of an element.
///
/// Insertion order is kept so serialization is stable. Lookups go by
/// qualified name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    list: Vec<DomAttribute>,
}

impl Attributes {
    /// An empty attribute list.
    #[must_use]
    pub const fn new() -> Self {
        Self { list: Vec::new() }
    }

    /// Value of the attribute with the given qualified name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.find(name).map(|attr| attr.value.as_str())
    }

    /// Whether an attribute with the given qualified name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// [§ 4.9 set an attribute value](https://dom.spec.whatwg.org/#concept-element-attributes-set-value)
    ///
    /// Replace the value of an existing un-namespaced attribute, or append one.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(existing) = self.list.iter_mut().find(|a| a.qualified_name() == name) {
            existing.value = value;
        } else {
            self.list.push(DomAttribute::new(name, value));
        }
    }

    /// Append a fully formed attribute, keeping the first one on a name clash.
    ///
    /// Returns `false` when an attribute of the same qualified name was
    /// already present.
    pub fn insert(&mut self, attribute: DomAttribute) -> bool {
        if self.contains(&attribute.qualified_name()) {
            return false;
        }
        self.list.push(attribute);
        true
    }

    /// Remove an attribute by qualified name, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.list.iter().position(|a| a.qualified_name() == name)?;
        Some(self.list.remove(index).value)
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, DomAttribute> {
        self.list.iter()
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Whether the element has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    fn find(&self, name: &str) -> Option<&DomAttribute> {
        self.list.iter().find(|a| match &a.prefix {
            None => a.local_name == name,
            Some(_) => a.qualified_name() == name,
        })
    }
}

impl FromIterator<DomAttribute> for Attributes {
    fn from_iter<I: IntoIterator<Item = DomAttribute>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for attribute in iter {
            let _ = attrs.insert(attribute);
        }
        attrs
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a DomAttribute;
    type IntoIter = std::slice::Iter<'a, DomAttribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}
