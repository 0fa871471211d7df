//! Dataset key mapping
//!
//! `element.dataset` keys are camelCase; the backing attributes are
//! `data-*` in kebab-case.

/// Attribute name for a camelCase dataset key (`hasListener` -> `data-has-listener`)
pub fn data_attribute_name(key: &str) -> String {
    let mut result = String::with_capacity(key.len() + 8);
    result.push_str("data-");
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            result.push('-');
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_name() {
        assert_eq!(data_attribute_name("src"), "data-src");
        assert_eq!(data_attribute_name("hasListener"), "data-has-listener");
        assert_eq!(data_attribute_name("copy"), "data-copy");
    }
}
