//! Stitches fragments and includes into the final header.

use std::collections::HashSet;

use log::debug;

use crate::emit::{ClassFragment, EnumFragment, Fragment, Record};
use crate::includes::include_block;
use crate::template::{HeaderSlot, Template};

/// Indentation of registry entries inside the collection initializer.
const ENTRY_INDENT: &str = "        ";

/// Keep the first fragment for every fully-qualified name.
pub fn unique_fragments<R: Record>(fragments: &[Fragment<R>]) -> Vec<&Fragment<R>> {
    let mut seen = HashSet::new();
    fragments
        .iter()
        .filter(|fragment| {
            let first = seen.insert(fragment.full_name());
            if !first {
                debug!("`{}` was already emitted, skipping", fragment.full_name());
            }
            first
        })
        .collect()
}

/// Brace initializer for a registry vector, `{}` when empty.
fn collection<R: Record>(fragments: &[&Fragment<R>]) -> String {
    if fragments.is_empty() {
        return "{}".to_string();
    }
    let entries: Vec<_> = fragments
        .iter()
        .map(|fragment| format!("{ENTRY_INDENT}{}", fragment.record().to_cpp()))
        .collect();
    format!("{{\n{}\n    }}", entries.join(",\n"))
}

fn specialisations<R: Record>(fragments: &[&Fragment<R>]) -> String {
    fragments
        .iter()
        .map(|fragment| fragment.code())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render the top-level template.
///
/// `includes` must already be normalised and deduplicated.
pub fn assemble(
    template: &Template<HeaderSlot>,
    enums: &[EnumFragment],
    classes: &[ClassFragment],
    includes: &[String],
) -> String {
    let enums = unique_fragments(enums);
    let classes = unique_fragments(classes);

    template.render(|slot| match slot {
        HeaderSlot::Includes => include_block(includes),
        HeaderSlot::Enums => specialisations(&enums),
        HeaderSlot::Classes => specialisations(&classes),
        HeaderSlot::EnumCollection => collection(&enums),
        HeaderSlot::ClassCollection => collection(&classes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Ast, ClassDecl, EnumDecl, EnumItem, FieldDecl};
    use crate::attributes::AttributeFilter;
    use crate::template::TemplateSet;
    use crate::walker::ScopeWalker;

    fn render(ast: &Ast, includes: &[String]) -> String {
        let templates = TemplateSet::default().compile().unwrap();
        let filter = AttributeFilter::default();
        let output = ScopeWalker::new(ast, &filter, &templates).walk().unwrap();
        assemble(&templates.header, &output.enums, &output.classes, includes)
    }

    #[test]
    fn test_empty_registries() {
        let code = render(&Ast::new(), &[]);
        assert!(code.contains("s_entries = {};"));
        assert!(!code.contains("__refl_"));
        assert!(!code.contains("#include \""));
    }

    #[test]
    fn test_full_header() {
        let mut ast = Ast::new();
        let ns = ast.add_namespace(ast.root(), "Game");
        ast.add_enum(
            ns,
            EnumDecl::new("State")
                .with_attribute("refl")
                .with_item(EnumItem::new("Idle", 0))
                .with_item(EnumItem::new("Run", 1)),
        );
        let class = ast.add_class(ns, ClassDecl::new("Player").with_attribute("refl"));
        ast.add_field(class, FieldDecl::new("hp", "int").with_attribute("refl").with_layout(0, 4));

        let code = render(&ast, &["game/state.h".to_string()]);
        assert!(code.contains("#include \"game/state.h\""));
        assert!(code.contains("struct Enum<Game::State>"));
        assert!(code.contains("struct Class<Game::Player>"));
        assert!(code.contains(
            "s_entries = {\n        {\"State\", \"Game::State\", \"\", 4, {{\"Idle\", \"\", 0}, {\"Run\", \"\", 1}}}\n    };"
        ));
        assert!(code.contains(
            "{\"Player\", \"Game\", \"Game::Player\", \"\", {{\"hp\", \"\", \"int\", Obs::TypeCategory::Plain, 0, 4}}}"
        ));
    }

    #[test]
    fn test_duplicate_full_names_are_emitted_once() {
        let mut ast = Ast::new();
        for _ in 0..2 {
            let ns = ast.add_namespace(ast.root(), "Shared");
            ast.add_enum(
                ns,
                EnumDecl::new("Kind").with_attribute("refl").with_item(EnumItem::new("A", 0)),
            );
        }
        let code = render(&ast, &[]);
        assert_eq!(code.matches("struct Enum<Shared::Kind>").count(), 1);
        assert_eq!(code.matches("{\"Kind\", \"Shared::Kind\"").count(), 1);
    }

    #[test]
    fn test_collection_separates_entries() {
        let mut ast = Ast::new();
        for name in ["A", "B"] {
            ast.add_enum(
                ast.root(),
                EnumDecl::new(name).with_attribute("refl").with_item(EnumItem::new("X", 0)),
            );
        }
        let code = render(&ast, &[]);
        assert!(code.contains("{\"A\", \"A\", \"\", 4, {{\"X\", \"\", 0}}},\n        {\"B\""));
    }
}
