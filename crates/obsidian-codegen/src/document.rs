//! JSON hand-off format of the header parser.
//!
//! The parser writes one document per translation unit. Each document
//! describes the global namespace and is lowered into the generator's
//! [`Ast`], so several documents can be merged into one run.

use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;
use walkdir::WalkDir;

use crate::ast::{Ast, ClassDecl, EnumDecl, EnumItem, FieldDecl, NodeId};
use crate::error::{Error, Result};
use crate::generator::CodeGenerator;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamespaceDoc {
    /// Ignored on the document root.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespaces: Vec<NamespaceDoc>,
    #[serde(default)]
    pub classes: Vec<ClassDoc>,
    #[serde(default)]
    pub enums: Vec<EnumDoc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassDoc {
    pub name: String,
    #[serde(default)]
    pub source_file: String,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDoc>,
    #[serde(default)]
    pub classes: Vec<ClassDoc>,
    #[serde(default)]
    pub enums: Vec<EnumDoc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldDoc {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnumDoc {
    pub name: String,
    #[serde(default)]
    pub source_file: String,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default = "default_underlying_size")]
    pub underlying_size: u32,
    #[serde(default = "default_scoped")]
    pub scoped: bool,
    #[serde(default)]
    pub items: Vec<ItemDoc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemDoc {
    pub name: String,
    pub value: i128,
    #[serde(default)]
    pub comment: Option<String>,
}

fn default_underlying_size() -> u32 {
    4
}

fn default_scoped() -> bool {
    true
}

impl NamespaceDoc {
    pub fn from_json(source_name: &str, text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|source| Error::Document {
            source_name: source_name.to_string(),
            source,
        })
    }

    /// Add everything this document declares under the root of `ast`.
    pub fn lower_into(&self, ast: &mut Ast) {
        enum Pending<'d> {
            Namespace(NodeId, &'d NamespaceDoc),
            Class(NodeId, &'d ClassDoc),
        }

        let mut stack = vec![Pending::Namespace(ast.root(), self)];
        while let Some(pending) = stack.pop() {
            match pending {
                Pending::Namespace(id, doc) => {
                    for child in &doc.namespaces {
                        let child_id = ast.add_namespace(id, child.name.as_str());
                        stack.push(Pending::Namespace(child_id, child));
                    }
                    for class in &doc.classes {
                        let class_id = ast.add_class(id, class.to_decl());
                        stack.push(Pending::Class(class_id, class));
                    }
                    for e in &doc.enums {
                        ast.add_enum(id, e.to_decl());
                    }
                }
                Pending::Class(id, doc) => {
                    for field in &doc.fields {
                        ast.add_field(id, field.to_decl());
                    }
                    for class in &doc.classes {
                        let class_id = ast.add_class(id, class.to_decl());
                        stack.push(Pending::Class(class_id, class));
                    }
                    for e in &doc.enums {
                        ast.add_enum(id, e.to_decl());
                    }
                }
            }
        }
    }
}

impl ClassDoc {
    fn to_decl(&self) -> ClassDecl {
        let mut decl = ClassDecl::new(self.name.as_str()).with_source_file(self.source_file.as_str());
        decl.info.attributes = self.attributes.clone();
        decl.info.comment = self.comment.clone();
        decl
    }
}

impl FieldDoc {
    fn to_decl(&self) -> FieldDecl {
        FieldDecl {
            name: self.name.clone(),
            type_name: self.type_name.clone(),
            offset: self.offset,
            size: self.size,
            attributes: self.attributes.clone(),
            comment: self.comment.clone(),
        }
    }
}

impl EnumDoc {
    fn to_decl(&self) -> EnumDecl {
        let mut decl = EnumDecl::new(self.name.as_str())
            .with_source_file(self.source_file.as_str())
            .with_underlying_size(self.underlying_size);
        decl.scoped = self.scoped;
        decl.info.attributes = self.attributes.clone();
        decl.info.comment = self.comment.clone();
        decl.items = self
            .items
            .iter()
            .map(|item| EnumItem {
                name: item.name.clone(),
                value: item.value,
                comment: item.comment.clone(),
            })
            .collect();
        decl
    }
}

impl CodeGenerator {
    /// Merge an AST document given as JSON text.
    ///
    /// `source_name` is only used in error messages.
    pub fn add_ast_str(&mut self, source_name: &str, text: &str) -> Result<&mut Self> {
        let doc = NamespaceDoc::from_json(source_name, text)?;
        let before = self.ast().len();
        doc.lower_into(self.ast_mut());
        debug!(
            "loaded `{source_name}` ({} declarations)",
            self.ast().len() - before
        );
        Ok(self)
    }

    pub fn add_ast_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        self.add_ast_str(&path.display().to_string(), &text)
    }

    /// Recursively load every `.json` document below `path`, sorted by path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # fn main() -> obsidian_codegen::Result<()> {
    /// use obsidian_codegen::CodeGenerator;
    ///
    /// let mut generator = CodeGenerator::new();
    /// generator.add_ast_dir("build/ast/")?;
    /// generator.write_to_dir("generated/")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn add_ast_dir(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let root = path.as_ref();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                Error::io(path, e.into())
            })?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
                self.add_ast_file(path)?;
            }
        }
        Ok(self)
    }
}
