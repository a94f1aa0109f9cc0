//! Class accessors and field registry records.

use log::{debug, trace};
use serde::Serialize;

use super::{ClassFragment, Fragment, Record};
use crate::ast::{Ast, ClassNode, Declaration, FieldDecl, NodeId};
use crate::attributes::AttributeFilter;
use crate::description::normalize_comment;
use crate::template::{ClassSlot, Template};
use crate::types::{TypeCategory, escape_c_string};

/// Metadata of one reflected data member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRecord {
    pub name: String,
    pub description: String,
    pub type_name: String,
    #[serde(serialize_with = "serialize_category")]
    pub category: TypeCategory,
    pub offset: u64,
    pub size: u64,
}

fn serialize_category<S: serde::Serializer>(
    category: &TypeCategory,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(match category {
        TypeCategory::Text => "text",
        TypeCategory::Pointer => "pointer",
        TypeCategory::Plain => "plain",
    })
}

impl FieldRecord {
    fn from_decl(field: &FieldDecl) -> Self {
        Self {
            name: field.name.clone(),
            description: field
                .comment()
                .and_then(normalize_comment)
                .unwrap_or_default(),
            type_name: field.type_name.clone(),
            category: TypeCategory::classify(&field.type_name),
            offset: field.offset,
            size: field.size,
        }
    }

    fn to_cpp(&self) -> String {
        format!(
            "{{\"{}\", \"{}\", \"{}\", {}, {}, {}}}",
            self.name,
            escape_c_string(&self.description),
            escape_c_string(&self.type_name),
            self.category.as_cpp(),
            self.offset,
            self.size
        )
    }

    fn read_line(&self) -> String {
        format!(
            "        if (strcmp(field_name, \"{0}\") == 0) {{ *static_cast<decltype(ClassType::{0})*>(out_value) = object.{0}; return true; }}",
            self.name
        )
    }

    fn write_line(&self) -> String {
        format!(
            "        if (strcmp(field_name, \"{0}\") == 0) {{ object.{0} = *static_cast<const decltype(ClassType::{0})*>(in_value); return true; }}",
            self.name
        )
    }
}

/// Metadata of a reflected class or struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassRecord {
    pub name: String,
    pub scope: String,
    pub full_name: String,
    pub description: String,
    pub fields: Vec<FieldRecord>,
}

impl ClassRecord {
    pub fn field(&self, name: &str) -> Option<&FieldRecord> {
        self.fields.iter().find(|field| field.name == name)
    }
}

impl Record for ClassRecord {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn to_cpp(&self) -> String {
        let fields: Vec<_> = self.fields.iter().map(FieldRecord::to_cpp).collect();
        format!(
            "{{\"{}\", \"{}\", \"{}\", \"{}\", {{{}}}}}",
            self.name,
            self.scope,
            self.full_name,
            escape_c_string(&self.description),
            fields.join(", ")
        )
    }
}

/// Produces the accessor specialisation and registry record of a class.
///
/// Only fields that carry the marker are reflected. Nested classes are left
/// to the walker.
#[derive(Debug, Clone, Copy)]
pub struct ClassEmitter<'a> {
    ast: &'a Ast,
    filter: &'a AttributeFilter,
    template: &'a Template<ClassSlot>,
}

impl<'a> ClassEmitter<'a> {
    pub fn new(ast: &'a Ast, filter: &'a AttributeFilter, template: &'a Template<ClassSlot>) -> Self {
        Self {
            ast,
            filter,
            template,
        }
    }

    pub fn record(&self, id: NodeId, data: &ClassNode) -> ClassRecord {
        let node = self.ast.node(id);
        let fields = data
            .fields
            .iter()
            .filter(|field| {
                let eligible = self.filter.is_eligible(*field);
                if !eligible {
                    trace!("skipping field `{}` of `{}`", field.name, node.name());
                }
                eligible
            })
            .map(FieldRecord::from_decl)
            .collect();

        ClassRecord {
            name: node.name().to_string(),
            scope: self.ast.scope(id),
            full_name: self.ast.full_name(id),
            description: node.comment().and_then(normalize_comment).unwrap_or_default(),
            fields,
        }
    }

    pub fn emit(&self, id: NodeId, data: &ClassNode) -> ClassFragment {
        let record = self.record(id, data);
        let code = self.template.render(|slot| match slot {
            ClassSlot::Name => record.name.clone(),
            ClassSlot::Scope => record.scope.clone(),
            ClassSlot::FullName => record.full_name.clone(),
            ClassSlot::Description => escape_c_string(&record.description),
            ClassSlot::ReadFields => join_lines(record.fields.iter().map(FieldRecord::read_line)),
            ClassSlot::WriteFields => join_lines(record.fields.iter().map(FieldRecord::write_line)),
        });

        debug!(
            "emitted class `{}` ({} fields)",
            record.full_name,
            record.fields.len()
        );
        let dependencies = vec![self.ast.node(id).source_file().to_string()];
        Fragment::new(record, code, dependencies)
    }
}

fn join_lines(lines: impl Iterator<Item = String>) -> String {
    lines.collect::<Vec<_>>().join("\n")
}
