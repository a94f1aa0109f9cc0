//! Reflection eligibility.

use crate::ast::Declaration;

/// The attribute name that opts a declaration into reflection by default.
pub const DEFAULT_MARKER: &str = "refl";

/// Decides which declarations get reflection code.
///
/// A declaration is eligible iff one of its attributes is exactly the marker
/// token. There is no prefix or wildcard matching, and the kind of the
/// declaration or its nesting depth play no part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeFilter {
    marker: String,
}

impl AttributeFilter {
    /// Filter accepting declarations annotated with exactly `marker`.
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// The attribute text declarations must carry.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn is_eligible(&self, declaration: &impl Declaration) -> bool {
        declaration
            .attributes()
            .iter()
            .any(|attribute| *attribute == self.marker)
    }
}

impl Default for AttributeFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::FieldDecl;

    #[test]
    fn test_exact_marker_is_eligible() {
        let filter = AttributeFilter::default();
        let field = FieldDecl::new("a", "int").with_attribute("refl");
        assert!(filter.is_eligible(&field));
    }

    #[test]
    fn test_marker_among_other_attributes() {
        let filter = AttributeFilter::default();
        let field = FieldDecl::new("a", "int")
            .with_attribute("nodiscard")
            .with_attribute("refl");
        assert!(filter.is_eligible(&field));
    }

    #[test]
    fn test_no_prefix_or_suffix_matching() {
        let filter = AttributeFilter::default();
        for attribute in ["reflect", "ref", "obs::refl", "REFL", ""] {
            let field = FieldDecl::new("a", "int").with_attribute(attribute);
            assert!(!filter.is_eligible(&field), "{attribute:?} must not match");
        }
    }

    #[test]
    fn test_no_attributes() {
        let filter = AttributeFilter::default();
        assert!(!filter.is_eligible(&FieldDecl::new("a", "int")));
    }

    #[test]
    fn test_custom_marker() {
        let filter = AttributeFilter::new("obs::refl");
        let field = FieldDecl::new("a", "int").with_attribute("obs::refl");
        assert!(filter.is_eligible(&field));
        assert!(!filter.is_eligible(&FieldDecl::new("b", "int").with_attribute("refl")));
    }
}
