//! Per-declaration code and metadata emission.

mod class;
mod enumeration;

pub use class::{ClassEmitter, ClassRecord, FieldRecord};
pub use enumeration::{EnumEmitter, EnumRecord, ItemRecord};

/// A metadata record that becomes one entry of a registry array.
pub trait Record {
    /// Fully-qualified name of the reflected declaration.
    fn full_name(&self) -> &str;

    /// Brace-initializer placed in the registry array.
    fn to_cpp(&self) -> String;
}

/// Everything generated for one eligible declaration.
///
/// Built once by an emitter and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment<R> {
    record: R,
    code: String,
    dependencies: Vec<String>,
}

pub type EnumFragment = Fragment<EnumRecord>;
pub type ClassFragment = Fragment<ClassRecord>;

impl<R: Record> Fragment<R> {
    pub(crate) fn new(record: R, code: String, dependencies: Vec<String>) -> Self {
        Self {
            record,
            code,
            dependencies,
        }
    }

    pub fn record(&self) -> &R {
        &self.record
    }

    /// Rendered specialisation for the declaration.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Source headers the generated code needs.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn full_name(&self) -> &str {
        self.record.full_name()
    }
}
