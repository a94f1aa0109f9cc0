//! Templates with a closed set of named slots.
//!
//! Every template kind declares the slots it must contain. Parsing rejects a
//! template that lacks one of them, and rendering asks for a value for every
//! slot of the kind, so neither a forgotten placeholder nor a forgotten value
//! can slip through as unchanged text.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// A closed set of placeholders belonging to one template kind.
pub trait SlotSet: Copy + PartialEq + 'static {
    /// Every slot of the kind. Each must appear in a template of this kind.
    const ALL: &'static [Self];

    /// The literal token replaced in the template text.
    fn token(self) -> &'static str;
}

/// Slots of the top-level reflection header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSlot {
    /// `#include` directives, one per source header.
    Includes,
    /// Per-enum specialisations.
    Enums,
    /// Per-class specialisations.
    Classes,
    /// Registry array of enum records.
    EnumCollection,
    /// Registry array of class records.
    ClassCollection,
}

impl SlotSet for HeaderSlot {
    const ALL: &'static [Self] = &[
        HeaderSlot::Includes,
        HeaderSlot::Enums,
        HeaderSlot::Classes,
        HeaderSlot::EnumCollection,
        HeaderSlot::ClassCollection,
    ];

    fn token(self) -> &'static str {
        match self {
            HeaderSlot::Includes => "__refl_includes__",
            HeaderSlot::Enums => "__refl_enum__",
            HeaderSlot::Classes => "__refl_class__",
            HeaderSlot::EnumCollection => "__refl_enum_collection__",
            HeaderSlot::ClassCollection => "__refl_class_collection__",
        }
    }
}

/// Slots of the per-enum template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumSlot {
    Name,
    Scope,
    FullName,
    Description,
    /// Enumerator with the largest value; `k_end` sits one past it.
    MaxEntry,
    ValueToName,
    ValueToDescription,
    NameToValue,
}

impl SlotSet for EnumSlot {
    const ALL: &'static [Self] = &[
        EnumSlot::Name,
        EnumSlot::Scope,
        EnumSlot::FullName,
        EnumSlot::Description,
        EnumSlot::MaxEntry,
        EnumSlot::ValueToName,
        EnumSlot::ValueToDescription,
        EnumSlot::NameToValue,
    ];

    fn token(self) -> &'static str {
        match self {
            EnumSlot::Name => "__enum_name__",
            EnumSlot::Scope => "__enum_scope__",
            EnumSlot::FullName => "__enum_full_name__",
            EnumSlot::Description => "__enum_description__",
            EnumSlot::MaxEntry => "__enum_max_entry__",
            EnumSlot::ValueToName => "__enum_value_to_name_switch__",
            EnumSlot::ValueToDescription => "__enum_value_to_description_switch__",
            EnumSlot::NameToValue => "__enum_name_to_value_chain__",
        }
    }
}

/// Slots of the per-class template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassSlot {
    Name,
    Scope,
    FullName,
    Description,
    ReadFields,
    WriteFields,
}

impl SlotSet for ClassSlot {
    const ALL: &'static [Self] = &[
        ClassSlot::Name,
        ClassSlot::Scope,
        ClassSlot::FullName,
        ClassSlot::Description,
        ClassSlot::ReadFields,
        ClassSlot::WriteFields,
    ];

    fn token(self) -> &'static str {
        match self {
            ClassSlot::Name => "__class_name__",
            ClassSlot::Scope => "__class_scope__",
            ClassSlot::FullName => "__class_full_name__",
            ClassSlot::Description => "__class_description__",
            ClassSlot::ReadFields => "__class_read_fields__",
            ClassSlot::WriteFields => "__class_write_fields__",
        }
    }
}

#[derive(Debug, Clone)]
enum Piece<S> {
    Text(String),
    Slot(S),
}

/// A parsed template of kind `S`.
#[derive(Debug, Clone)]
pub struct Template<S: SlotSet> {
    name: String,
    pieces: Vec<Piece<S>>,
}

impl<S: SlotSet> Template<S> {
    /// Split `source` into literal text and slots.
    ///
    /// Fails with [`Error::MissingPlaceholder`] if any slot of the kind does
    /// not occur at least once.
    pub fn parse(name: impl Into<String>, source: &str) -> Result<Self> {
        let name = name.into();
        let mut pieces = Vec::new();
        let mut seen: Vec<S> = Vec::new();
        let mut rest = source;

        loop {
            let next = S::ALL
                .iter()
                .filter_map(|&slot| rest.find(slot.token()).map(|pos| (pos, slot)))
                .min_by_key(|(pos, _)| *pos);
            let Some((pos, slot)) = next else {
                break;
            };
            if pos > 0 {
                pieces.push(Piece::Text(rest[..pos].to_string()));
            }
            pieces.push(Piece::Slot(slot));
            if !seen.contains(&slot) {
                seen.push(slot);
            }
            rest = &rest[pos + slot.token().len()..];
        }
        if !rest.is_empty() {
            pieces.push(Piece::Text(rest.to_string()));
        }

        if let Some(missing) = S::ALL.iter().find(|slot| !seen.contains(slot)) {
            return Err(Error::MissingPlaceholder {
                template: name,
                placeholder: missing.token(),
            });
        }
        Ok(Self { name, pieces })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fill every occurrence of every slot.
    ///
    /// `fill` is asked once per slot of the kind; repeated occurrences reuse
    /// the same text.
    pub fn render(&self, fill: impl Fn(S) -> String) -> String {
        let values: Vec<(S, String)> = S::ALL.iter().map(|&slot| (slot, fill(slot))).collect();
        let mut output = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Text(text) => output.push_str(text),
                Piece::Slot(slot) => {
                    if let Some((_, value)) = values.iter().find(|(s, _)| s == slot) {
                        output.push_str(value);
                    }
                }
            }
        }
        output
    }
}

pub const HEADER_TEMPLATE_FILE: &str = "reflection-header.template";
pub const ENUM_TEMPLATE_FILE: &str = "enum.template";
pub const CLASS_TEMPLATE_FILE: &str = "class.template";

const BUILTIN_HEADER: &str = include_str!("../templates/reflection-header.template");
const BUILTIN_ENUM: &str = include_str!("../templates/enum.template");
const BUILTIN_CLASS: &str = include_str!("../templates/class.template");

/// Source text of the three templates used for one run.
///
/// Defaults to the templates shipped with the crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    pub header: String,
    pub enumeration: String,
    pub class: String,
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self {
            header: BUILTIN_HEADER.to_string(),
            enumeration: BUILTIN_ENUM.to_string(),
            class: BUILTIN_CLASS.to_string(),
        }
    }
}

/// Parsed form of a [`TemplateSet`].
#[derive(Debug, Clone)]
pub struct CompiledTemplates {
    pub header: Template<HeaderSlot>,
    pub enumeration: Template<EnumSlot>,
    pub class: Template<ClassSlot>,
}

impl TemplateSet {
    /// Load overrides from `dir`; files that do not exist keep the built-in text.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut set = Self::default();
        for (file, slot) in [
            (HEADER_TEMPLATE_FILE, &mut set.header),
            (ENUM_TEMPLATE_FILE, &mut set.enumeration),
            (CLASS_TEMPLATE_FILE, &mut set.class),
        ] {
            let path = dir.join(file);
            if path.is_file() {
                log::debug!("using template override {}", path.display());
                *slot = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
            }
        }
        Ok(set)
    }

    pub fn compile(&self) -> Result<CompiledTemplates> {
        Ok(CompiledTemplates {
            header: Template::parse(HEADER_TEMPLATE_FILE, &self.header)?,
            enumeration: Template::parse(ENUM_TEMPLATE_FILE, &self.enumeration)?,
            class: Template::parse(CLASS_TEMPLATE_FILE, &self.class)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_templates_compile() {
        TemplateSet::default().compile().unwrap();
    }

    #[test]
    fn test_render_replaces_every_occurrence() {
        let source = "__class_name__ __class_scope__ __class_full_name__ __class_description__ \
                      __class_read_fields__ __class_write_fields__ / __class_name__";
        let template = Template::<ClassSlot>::parse("t", source).unwrap();
        let out = template.render(|slot| match slot {
            ClassSlot::Name => "N".into(),
            ClassSlot::Scope => "S".into(),
            ClassSlot::FullName => "S::N".into(),
            ClassSlot::Description => "D".into(),
            ClassSlot::ReadFields => "R".into(),
            ClassSlot::WriteFields => "W".into(),
        });
        assert_eq!(out, "N S S::N D R W / N");
    }

    #[test]
    fn test_missing_placeholder_is_an_error() {
        let source = "__class_name__ __class_scope__ __class_full_name__ __class_description__ \
                      __class_read_fields__";
        let err = Template::<ClassSlot>::parse("class.template", source).unwrap_err();
        match err {
            Error::MissingPlaceholder {
                template,
                placeholder,
            } => {
                assert_eq!(template, "class.template");
                assert_eq!(placeholder, "__class_write_fields__");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_similar_tokens_do_not_collide() {
        let source = "[__refl_enum__][__refl_enum_collection__][__refl_class__]\
                      [__refl_class_collection__][__refl_includes__]";
        let template = Template::<HeaderSlot>::parse("h", source).unwrap();
        let out = template.render(|slot| match slot {
            HeaderSlot::Includes => "i".into(),
            HeaderSlot::Enums => "e".into(),
            HeaderSlot::Classes => "c".into(),
            HeaderSlot::EnumCollection => "ec".into(),
            HeaderSlot::ClassCollection => "cc".into(),
        });
        assert_eq!(out, "[e][ec][c][cc][i]");
    }

    #[test]
    fn test_load_dir_overrides_only_present_files() {
        let dir = tempfile::tempdir().unwrap();
        let custom = "// custom\n__refl_includes__ __refl_enum__ __refl_class__ \
                      __refl_enum_collection__ __refl_class_collection__\n";
        fs::write(dir.path().join(HEADER_TEMPLATE_FILE), custom).unwrap();

        let set = TemplateSet::load_dir(dir.path()).unwrap();
        assert_eq!(set.header, custom);
        assert_eq!(set.enumeration, TemplateSet::default().enumeration);
        set.compile().unwrap();
    }

    #[test]
    fn test_load_dir_rejects_incomplete_override_on_compile() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(ENUM_TEMPLATE_FILE), "__enum_name__").unwrap();
        let set = TemplateSet::load_dir(dir.path()).unwrap();
        assert!(matches!(
            set.compile(),
            Err(Error::MissingPlaceholder { .. })
        ));
    }
}
