//! DOM Element - Element node implementation

use alloc::string::String;
use alloc::vec::Vec;

use crate::node::Attribute;

/// Element-specific data.
///
/// `id` and `classes` cache the `id` and `class` attributes and are kept in
/// sync by every mutator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub tag_name: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<Attribute>,
}

impl ElementData {
    /// Create element data for a tag. Tag names are stored lowercase.
    pub fn new(tag_name: &str) -> Self {
        ElementData {
            tag_name: tag_name.to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Get attribute value.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set attribute value.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        // Update cached id/classes
        if name == "id" {
            self.id = Some(value.into());
        } else if name == "class" {
            self.classes = Vec::new();
            for class in value.split_whitespace() {
                if !self.has_class(class) {
                    self.classes.push(class.into());
                }
            }
        }

        // Update or add attribute
        if let Some(attr) = self.attributes.iter_mut().find(|a| a.name == name) {
            attr.value = value.into();
        } else {
            self.attributes.push(Attribute::new(name, value));
        }
    }

    /// Remove attribute.
    pub fn remove_attribute(&mut self, name: &str) {
        if name == "id" {
            self.id = None;
        } else if name == "class" {
            self.classes.clear();
        }
        self.attributes.retain(|a| a.name != name);
    }

    /// Check if has attribute.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    /// Get local tag name.
    pub fn local_name(&self) -> &str {
        &self.tag_name
    }

    /// Check if element matches a tag name.
    pub fn matches_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    /// Check if element has a class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a class.
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.into());
            self.update_class_attribute();
        }
    }

    /// Remove a class.
    pub fn remove_class(&mut self, class: &str) {
        if self.has_class(class) {
            self.classes.retain(|c| c != class);
            self.update_class_attribute();
        }
    }

    /// Toggle a class, or force it on/off. Returns whether it is now set.
    pub fn toggle_class(&mut self, class: &str, force: Option<bool>) -> bool {
        let want = force.unwrap_or(!self.has_class(class));
        if want {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
        want
    }

    fn update_class_attribute(&mut self) {
        let class_str = self.classes.join(" ");
        if class_str.is_empty() {
            self.attributes.retain(|a| a.name != "class");
        } else if let Some(attr) = self.attributes.iter_mut().find(|a| a.name == "class") {
            attr.value = class_str;
        } else {
            self.attributes.push(Attribute::new("class", &class_str));
        }
    }
}
