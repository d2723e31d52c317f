//! Inline style declarations (`element.style`)

/// Ordered inline style properties
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDeclaration {
    properties: Vec<(String, String)>,
}

impl StyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `style` attribute value
    pub fn parse(text: &str) -> Self {
        let mut style = Self::new();
        for decl in text.split(';') {
            if let Some((name, value)) = decl.split_once(':') {
                style.set(name.trim(), value.trim());
            }
        }
        style
    }

    /// Get a property value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set a property. An empty value removes it, like assigning `''`
    /// from script.
    pub fn set(&mut self, name: &str, value: &str) {
        if value.is_empty() {
            self.remove(name);
            return;
        }
        match self.properties.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.properties.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.properties.iter().position(|(n, _)| n == name)?;
        Some(self.properties.remove(pos).1)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Serialized `style` attribute text
    pub fn css_text(&self) -> String {
        self.properties
            .iter()
            .map(|(n, v)| format!("{}: {};", n, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
