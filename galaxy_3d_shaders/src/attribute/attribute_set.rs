/// AttributeSet - the visual requirements of one material or environment.
///
/// Pure value object: no GPU resources are owned here. The mask is always
/// the union of the contained tags.

use std::collections::BTreeMap;
use super::attribute::{Attribute, AttributeType, AttributeValue};
use super::mask::AttributeMask;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeSet {
    mask: AttributeMask,
    entries: BTreeMap<AttributeType, Attribute>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a list of attributes (later entries win)
    pub fn from_attributes(attributes: impl IntoIterator<Item = Attribute>) -> Self {
        let mut set = Self::new();
        for attribute in attributes {
            set.set(attribute);
        }
        set
    }

    /// Union of `first` and `second`, `second` wins on conflicting tags
    pub fn combined(first: &AttributeSet, second: &AttributeSet) -> Self {
        let mut set = first.clone();
        set.combine(second);
        set
    }

    /// Insert an attribute, replacing any attribute of the same type
    pub fn set(&mut self, attribute: Attribute) {
        let ty = attribute.ty();
        self.mask.insert(ty);
        self.entries.insert(ty, attribute);
    }

    pub fn get(&self, ty: AttributeType) -> Option<&Attribute> {
        self.entries.get(&ty)
    }

    /// Payload of the attribute with tag `ty`
    pub fn value(&self, ty: AttributeType) -> Option<&AttributeValue> {
        self.entries.get(&ty).map(Attribute::value)
    }

    pub fn has(&self, ty: AttributeType) -> bool {
        self.mask.has(ty)
    }

    pub fn remove(&mut self, ty: AttributeType) -> Option<Attribute> {
        self.mask.remove(ty);
        self.entries.remove(&ty)
    }

    pub fn clear(&mut self) {
        self.mask = AttributeMask::EMPTY;
        self.entries.clear();
    }

    /// Merge `other` into this set; `other` wins on conflicting tags
    pub fn combine(&mut self, other: &AttributeSet) {
        for attribute in other.entries.values() {
            self.set(attribute.clone());
        }
    }

    pub fn mask(&self) -> AttributeMask {
        self.mask
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attributes in ascending tag order
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.entries.values()
    }
}

impl FromIterator<Attribute> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        Self::from_attributes(iter)
    }
}

#[cfg(test)]
#[path = "attribute_set_tests.rs"]
mod tests;
