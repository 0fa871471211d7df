//! Inline style declarations
//!
//! Property/value pairs set through `element.style`. No cascade: the
//! "computed" value of a property is its inline value or the initial value.

/// Inline style of one element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleDeclaration {
    properties: Vec<(String, String)>,
}

impl StyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an inline property value
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Set a property; an empty value removes it
    pub fn set(&mut self, property: &str, value: &str) {
        if value.is_empty() {
            self.remove(property);
            return;
        }
        match self.properties.iter_mut().find(|(name, _)| name == property) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.properties.push((property.to_string(), value.to_string())),
        }
    }

    pub fn remove(&mut self, property: &str) {
        self.properties.retain(|(name, _)| name != property);
    }

    /// Value after falling back to the CSS initial value
    pub fn computed(&self, property: &str) -> &str {
        self.get(property).unwrap_or_else(|| initial_value(property))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

fn initial_value(property: &str) -> &'static str {
    match property {
        "position" => "static",
        "display" => "inline",
        "opacity" => "1",
        "transform" => "none",
        _ => "",
    }
}
