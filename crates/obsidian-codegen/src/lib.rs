//! # obsidian-codegen
//!
//! Reflection metadata compiler for C++. The crate reads the AST of a set of
//! annotated headers and generates a single header with compile-time and
//! run-time reflection for the declarations that opted in.
//!
//! ## Features
//!
//! - Attribute-driven opt-in: only enums, classes and fields carrying the
//!   marker attribute (`refl` by default) are reflected
//! - Breadth-first traversal of nested namespaces and classes
//! - Enum name/value/description conversions, including enums nested in classes
//! - Class field records with layout, type category and name-keyed accessors
//! - Deduplicated, normalised `#include` list of the annotated headers
//! - Typed templates: a template missing a placeholder is rejected up front
//!
//! ## Quick Start
//!
//! ### Building the AST directly
//!
//! ```rust
//! use obsidian_codegen::{CodeGenerator, EnumDecl, EnumItem};
//!
//! let mut generator = CodeGenerator::new();
//! let ast = generator.ast_mut();
//! let paint = ast.add_namespace(ast.root(), "Paint");
//! ast.add_enum(
//!     paint,
//!     EnumDecl::new("Color")
//!         .with_attribute("refl")
//!         .with_source_file("include/paint.h")
//!         .with_item(EnumItem::new("Red", 0).with_comment("primary"))
//!         .with_item(EnumItem::new("Green", 1).with_comment("primary"))
//!         .with_item(EnumItem::new("Blue", 2).with_comment("cool tone")),
//! );
//!
//! let code = generator.generate().unwrap();
//! assert!(code.contains("struct Enum<Paint::Color>"));
//! assert!(code.contains("#include \"include/paint.h\""));
//! ```
//!
//! ### From parser output in `build.rs`
//!
//! ```no_run
//! use obsidian_codegen::CodeGenerator;
//!
//! fn main() {
//!     let out_dir = std::env::var("OUT_DIR").unwrap();
//!     CodeGenerator::new()
//!         .add_ast_dir("ast/").unwrap()
//!         .write_to_dir(&out_dir).unwrap();
//!
//!     println!("cargo:rerun-if-changed=ast/");
//! }
//! ```
//!
//! ## Type Categories
//!
//! | Field type | Category |
//! |------------|----------|
//! | `const char *` | `Obs::TypeCategory::Text` |
//! | any other type ending in `*` | `Obs::TypeCategory::Pointer` |
//! | everything else | `Obs::TypeCategory::Plain` |

mod assembler;
pub mod ast;
mod attributes;
mod config;
mod description;
mod document;
mod emit;
mod error;
mod generator;
mod includes;
pub mod template;
mod types;
mod walker;

pub use assembler::assemble;
pub use ast::{Ast, ClassDecl, Declaration, EnumDecl, EnumItem, FieldDecl, NodeId};
pub use attributes::{AttributeFilter, DEFAULT_MARKER};
pub use config::{DEFAULT_MARKER_HEADER, DEFAULT_OUTPUT_FILE, GeneratorConfig};
pub use description::{describe, normalize_comment};
pub use document::{ClassDoc, EnumDoc, FieldDoc, ItemDoc, NamespaceDoc};
pub use emit::{
    ClassEmitter, ClassFragment, ClassRecord, EnumEmitter, EnumFragment, EnumRecord, FieldRecord,
    Fragment, ItemRecord, Record,
};
pub use error::{Error, Result};
pub use generator::{Artifact, CodeGenerator};
pub use includes::{IncludeDeduplicator, normalize_path};
pub use template::TemplateSet;
pub use types::TypeCategory;
pub use walker::{ScopeWalker, WalkOutput};
