//! Enum conversion code and registry records.

use std::collections::HashSet;

use log::debug;
use serde::Serialize;

use super::{EnumFragment, Fragment, Record};
use crate::ast::{Ast, Declaration, EnumNode, NodeId};
use crate::description::{item_descriptions, normalize_comment};
use crate::error::{Error, Result};
use crate::template::{EnumSlot, Template};
use crate::types::{escape_c_string, value_in_range, value_literal};

/// Metadata of one enumerator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRecord {
    pub name: String,
    /// Empty when the comment repeats the previous enumerator's.
    pub description: String,
    pub value: i128,
}

/// Metadata of a reflected enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumRecord {
    pub name: String,
    pub scope: String,
    pub full_name: String,
    pub description: String,
    pub underlying_size: u32,
    #[serde(skip)]
    pub scoped: bool,
    pub items: Vec<ItemRecord>,
}

impl EnumRecord {
    /// Name of the first enumerator declared with `value`.
    pub fn name_of(&self, value: i128) -> Option<&str> {
        self.items
            .iter()
            .find(|item| item.value == value)
            .map(|item| item.name.as_str())
    }

    /// Value of the first enumerator called `name`.
    pub fn value_of(&self, name: &str) -> Option<i128> {
        self.items
            .iter()
            .find(|item| item.name == name)
            .map(|item| item.value)
    }

    /// Description of the first enumerator declared with `value`.
    pub fn description_of(&self, value: i128) -> Option<&str> {
        self.items
            .iter()
            .find(|item| item.value == value)
            .map(|item| item.description.as_str())
    }

    /// Spelling of an enumerator usable from outside the enum.
    fn qualified(&self, item: &str) -> String {
        if self.scoped {
            format!("{}::{}", self.full_name, item)
        } else if !self.scope.is_empty() {
            format!("{}::{}", self.scope, item)
        } else {
            item.to_string()
        }
    }

    /// Items whose value has not been seen earlier in the enum.
    fn distinct_items(&self) -> impl Iterator<Item = &ItemRecord> {
        let mut seen = HashSet::new();
        self.items.iter().filter(move |item| seen.insert(item.value))
    }

    fn value_to_name_switch(&self) -> String {
        self.distinct_items()
            .map(|item| {
                format!(
                    "            case {}: return \"{}\";",
                    self.qualified(&item.name),
                    item.name
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn value_to_description_switch(&self) -> String {
        self.distinct_items()
            .map(|item| {
                format!(
                    "            case {}: return \"{}\";",
                    self.qualified(&item.name),
                    escape_c_string(&item.description)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn name_to_value_chain(&self) -> String {
        self.items
            .iter()
            .map(|item| {
                format!(
                    "        if (strcmp(name, \"{}\") == 0) return {};",
                    item.name,
                    self.qualified(&item.name)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Record for EnumRecord {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn to_cpp(&self) -> String {
        let items: Vec<_> = self
            .items
            .iter()
            .map(|item| {
                format!(
                    "{{\"{}\", \"{}\", {}}}",
                    item.name,
                    escape_c_string(&item.description),
                    value_literal(item.value)
                )
            })
            .collect();
        format!(
            "{{\"{}\", \"{}\", \"{}\", {}, {{{}}}}}",
            self.name,
            self.full_name,
            escape_c_string(&self.description),
            self.underlying_size,
            items.join(", ")
        )
    }
}

/// Produces the specialisation and registry record of an enum.
#[derive(Debug, Clone, Copy)]
pub struct EnumEmitter<'a> {
    ast: &'a Ast,
    template: &'a Template<EnumSlot>,
}

impl<'a> EnumEmitter<'a> {
    pub fn new(ast: &'a Ast, template: &'a Template<EnumSlot>) -> Self {
        Self { ast, template }
    }

    /// Build the record for `id` without rendering any code.
    pub fn record(&self, id: NodeId, data: &EnumNode) -> Result<EnumRecord> {
        let node = self.ast.node(id);
        let full_name = self.ast.full_name(id);
        if data.items.is_empty() {
            return Err(Error::EmptyEnum { name: full_name });
        }
        if let Some(item) = data.items.iter().find(|item| !value_in_range(item.value)) {
            return Err(Error::EnumValueOutOfRange {
                name: full_name,
                item: item.name.clone(),
                value: item.value,
            });
        }

        let items = data
            .items
            .iter()
            .zip(item_descriptions(&data.items))
            .map(|(item, description)| ItemRecord {
                name: item.name.clone(),
                description,
                value: item.value,
            })
            .collect();

        Ok(EnumRecord {
            name: node.name().to_string(),
            scope: self.ast.scope(id),
            full_name,
            // The enum itself has no predecessor: its comment is always kept.
            description: node.comment().and_then(normalize_comment).unwrap_or_default(),
            underlying_size: data.underlying_size,
            scoped: data.scoped,
            items,
        })
    }

    /// Emit the fragment for the enum `id`.
    ///
    /// Fails with [`Error::EmptyEnum`] when the enum has no items and with
    /// [`Error::EnumValueOutOfRange`] when a value does not fit 64 bits.
    ///
    /// `k_end` is one past the largest value, so it never aliases a declared
    /// enumerator unless that value is the maximum of the underlying type.
    pub fn emit(&self, id: NodeId, data: &EnumNode) -> Result<EnumFragment> {
        let record = self.record(id, data)?;
        let max = record
            .items
            .iter()
            .rev()
            .max_by_key(|item| item.value)
            .map(|item| record.qualified(&item.name))
            .unwrap_or_default();

        let code = self.template.render(|slot| match slot {
            EnumSlot::Name => record.name.clone(),
            EnumSlot::Scope => record.scope.clone(),
            EnumSlot::FullName => record.full_name.clone(),
            EnumSlot::Description => escape_c_string(&record.description),
            EnumSlot::MaxEntry => max.clone(),
            EnumSlot::ValueToName => record.value_to_name_switch(),
            EnumSlot::ValueToDescription => record.value_to_description_switch(),
            EnumSlot::NameToValue => record.name_to_value_chain(),
        });

        debug!(
            "emitted enum `{}` ({} items)",
            record.full_name,
            record.items.len()
        );
        let dependencies = vec![self.ast.node(id).source_file().to_string()];
        Ok(Fragment::new(record, code, dependencies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ClassDecl, EnumDecl, EnumItem};
    use crate::template::TemplateSet;

    fn emit(ast: &Ast, id: NodeId) -> Result<EnumFragment> {
        let templates = TemplateSet::default().compile().unwrap();
        EnumEmitter::new(ast, &templates.enumeration).emit(id, ast.enumeration(id).unwrap())
    }

    fn color_ast() -> (Ast, NodeId) {
        let mut ast = Ast::new();
        let ns = ast.add_namespace(ast.root(), "Paint");
        let id = ast.add_enum(
            ns,
            EnumDecl::new("Color")
                .with_attribute("refl")
                .with_source_file("include/paint.h")
                .with_comment("/// Colors of the palette.")
                .with_item(EnumItem::new("Red", 0).with_comment("primary"))
                .with_item(EnumItem::new("Green", 1).with_comment("primary"))
                .with_item(EnumItem::new("Blue", 2).with_comment("cool tone")),
        );
        (ast, id)
    }

    #[test]
    fn test_emit_color_record() {
        let (ast, id) = color_ast();
        let fragment = emit(&ast, id).unwrap();
        let record = fragment.record();

        assert_eq!(record.name, "Color");
        assert_eq!(record.full_name, "Paint::Color");
        assert_eq!(record.description, "Colors of the palette.");
        let descriptions: Vec<_> = record.items.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(descriptions, vec!["primary", "", "cool tone"]);
        assert_eq!(record.value_of("Green"), Some(1));
        assert_eq!(fragment.dependencies(), ["include/paint.h".to_string()]);
    }

    #[test]
    fn test_emit_color_code() {
        let (ast, id) = color_ast();
        let code = emit(&ast, id).unwrap().code().to_string();

        assert!(code.contains("struct Enum<Paint::Color>"));
        assert!(code.contains("static const char* GetName() { return \"Color\"; }"));
        assert!(code.contains("static const char* GetScope() { return \"Paint\"; }"));
        assert!(code.contains("case Paint::Color::Green: return \"Green\";"));
        assert!(code.contains("case Paint::Color::Green: return \"\";"));
        assert!(code.contains("case Paint::Color::Blue: return \"cool tone\";"));
        assert!(code.contains("if (strcmp(name, \"Green\") == 0) return Paint::Color::Green;"));
        assert!(code.contains("static_cast<UnderlyingType>(Paint::Color::Blue) + 1"));
        assert!(!code.contains("default:"));
        assert!(!code.contains("__enum_"));
    }

    #[test]
    fn test_registry_record() {
        let (ast, id) = color_ast();
        let fragment = emit(&ast, id).unwrap();
        assert_eq!(
            fragment.record().to_cpp(),
            "{\"Color\", \"Paint::Color\", \"Colors of the palette.\", 4, \
             {{\"Red\", \"primary\", 0}, {\"Green\", \"\", 1}, {\"Blue\", \"cool tone\", 2}}}"
        );
    }

    #[test]
    fn test_empty_enum_is_an_error() {
        let mut ast = Ast::new();
        let id = ast.add_enum(ast.root(), EnumDecl::new("Nothing").with_attribute("refl"));
        match emit(&ast, id) {
            Err(Error::EmptyEnum { name }) => assert_eq!(name, "Nothing"),
            other => panic!("expected EmptyEnum, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_values_keep_first_name() {
        let mut ast = Ast::new();
        let id = ast.add_enum(
            ast.root(),
            EnumDecl::new("Level")
                .with_item(EnumItem::new("Low", 0))
                .with_item(EnumItem::new("Default", 0))
                .with_item(EnumItem::new("High", 1)),
        );
        let fragment = emit(&ast, id).unwrap();
        let record = fragment.record();

        assert_eq!(record.name_of(0), Some("Low"));
        assert_eq!(record.value_of("Default"), Some(0));
        let code = fragment.code();
        assert!(code.contains("case Level::Low: return \"Low\";"));
        assert!(!code.contains("case Level::Default:"));
        assert!(code.contains("if (strcmp(name, \"Default\") == 0) return Level::Default;"));
    }

    #[test]
    fn test_unscoped_enum_constants() {
        let mut ast = Ast::new();
        let ns = ast.add_namespace(ast.root(), "Cal");
        let id = ast.add_enum(
            ns,
            EnumDecl::new("DayOfWeek")
                .unscoped()
                .with_item(EnumItem::new("Monday", 0))
                .with_item(EnumItem::new("Sunday", 6)),
        );
        let code = emit(&ast, id).unwrap().code().to_string();
        assert!(code.contains("case Cal::Monday: return \"Monday\";"));

        let global = ast.add_enum(
            ast.root(),
            EnumDecl::new("Flag").unscoped().with_item(EnumItem::new("On", 1)),
        );
        let code = emit(&ast, global).unwrap().code().to_string();
        assert!(code.contains("case On: return \"On\";"));
    }

    #[test]
    fn test_enum_nested_in_class() {
        let mut ast = Ast::new();
        let class = ast.add_class(ast.root(), ClassDecl::new("Data"));
        let id = ast.add_enum(
            class,
            EnumDecl::new("DataType")
                .with_underlying_size(2)
                .with_item(EnumItem::new("A", 0)),
        );
        let record = emit(&ast, id).unwrap().record().clone();
        assert_eq!(record.full_name, "Data::DataType");
        assert_eq!(record.scope, "Data");
        assert_eq!(record.underlying_size, 2);
    }

    #[test]
    fn test_negative_values_and_escaping() {
        let mut ast = Ast::new();
        let id = ast.add_enum(
            ast.root(),
            EnumDecl::new("Vegetable")
                .with_underlying_size(1)
                .with_item(EnumItem::new("Carrot", -10).with_comment("/** Say \"carrot\". */")),
        );
        let fragment = emit(&ast, id).unwrap();
        let record = fragment.record().to_cpp();
        assert!(record.contains("{\"Carrot\", \"Say \\\"carrot\\\".\", static_cast<uint64_t>(-10LL)}"));
        assert!(fragment.code().contains("return \"Say \\\"carrot\\\".\";"));
    }

    #[test]
    fn test_end_sentinel_follows_largest_value() {
        let mut ast = Ast::new();
        let id = ast.add_enum(
            ast.root(),
            EnumDecl::new("Order")
                .with_item(EnumItem::new("High", 5))
                .with_item(EnumItem::new("Top", 5))
                .with_item(EnumItem::new("Low", 0)),
        );
        let code = emit(&ast, id).unwrap().code().to_string();
        assert!(code.contains("static_cast<UnderlyingType>(Order::High) + 1"));
        assert!(!code.contains("static_cast<UnderlyingType>(Order::Low) + 1"));
    }

    #[test]
    fn test_value_outside_64_bits_is_an_error() {
        for value in [u64::MAX as i128 + 1, i64::MIN as i128 - 1] {
            let mut ast = Ast::new();
            let ns = ast.add_namespace(ast.root(), "Big");
            let id = ast.add_enum(
                ns,
                EnumDecl::new("Wide")
                    .with_item(EnumItem::new("Ok", 0))
                    .with_item(EnumItem::new("Huge", value)),
            );
            match emit(&ast, id) {
                Err(Error::EnumValueOutOfRange { name, item, value: found }) => {
                    assert_eq!(name, "Big::Wide");
                    assert_eq!(item, "Huge");
                    assert_eq!(found, value);
                }
                other => panic!("expected EnumValueOutOfRange, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_64_bit_bounds_are_accepted() {
        let mut ast = Ast::new();
        let id = ast.add_enum(
            ast.root(),
            EnumDecl::new("Edge")
                .with_underlying_size(8)
                .with_item(EnumItem::new("Min", i64::MIN as i128))
                .with_item(EnumItem::new("Max", u64::MAX as i128)),
        );
        let record = emit(&ast, id).unwrap().record().to_cpp();
        assert!(record.contains("static_cast<uint64_t>(INT64_MIN)"));
        assert!(record.contains("18446744073709551615ULL"));
    }
}
