//! The top-level generation driver.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Serialize;

use crate::assembler::{assemble, unique_fragments};
use crate::ast::Ast;
use crate::attributes::AttributeFilter;
use crate::config::GeneratorConfig;
use crate::emit::{ClassRecord, EnumRecord};
use crate::error::{Error, Result};
use crate::includes::IncludeDeduplicator;
use crate::template::{CompiledTemplates, TemplateSet};
use crate::walker::{ScopeWalker, WalkOutput};

/// A file produced by a run, named relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub contents: String,
}

/// Summary of everything a run reflects, for tools that do not read C++.
#[derive(Debug, Serialize)]
struct Metadata<'a> {
    includes: &'a [String],
    enums: Vec<&'a EnumRecord>,
    classes: Vec<&'a ClassRecord>,
}

/// Generates C++ reflection code from a parsed header set.
///
/// Declarations are added through [`CodeGenerator::add_ast_file`] and
/// friends, or by building the [`Ast`] directly via
/// [`CodeGenerator::ast_mut`].
#[derive(Debug, Clone, Default)]
pub struct CodeGenerator {
    ast: Ast,
    config: GeneratorConfig,
    templates: TemplateSet,
}

/// Walk results plus the include list derived from them.
struct Run {
    templates: CompiledTemplates,
    output: WalkOutput,
    includes: Vec<String>,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn ast_mut(&mut self) -> &mut Ast {
        &mut self.ast
    }

    /// Change the attribute that opts declarations in.
    pub fn set_marker(&mut self, marker: impl Into<String>) -> &mut Self {
        self.config.marker = marker.into();
        self
    }

    /// Set a banner comment for the top of the generated header.
    pub fn set_header(&mut self, header: impl Into<String>) -> &mut Self {
        self.config.header_comment = Some(header.into());
        self
    }

    pub fn set_output_file(&mut self, file_name: impl Into<String>) -> &mut Self {
        self.config.output_file = file_name.into();
        self
    }

    /// Name of the marker header, or `None` to stop writing it.
    pub fn set_marker_header(&mut self, file_name: Option<String>) -> &mut Self {
        self.config.marker_header = file_name;
        self
    }

    /// Also write a JSON summary of the reflected declarations.
    pub fn set_metadata_file(&mut self, file_name: impl Into<String>) -> &mut Self {
        self.config.metadata_file = Some(file_name.into());
        self
    }

    /// Emit include paths below `root` relative to it.
    pub fn add_include_root(&mut self, root: impl Into<String>) -> &mut Self {
        self.config.include_roots.push(root.into());
        self
    }

    /// Replace the built-in templates.
    pub fn set_templates(&mut self, templates: TemplateSet) -> &mut Self {
        self.templates = templates;
        self
    }

    /// Load template overrides from `dir`; files it lacks keep the built-ins.
    pub fn load_templates(&mut self, dir: impl AsRef<Path>) -> Result<&mut Self> {
        self.templates = TemplateSet::load_dir(dir)?;
        Ok(self)
    }

    fn run(&self) -> Result<Run> {
        let templates = self.templates.compile()?;
        let filter = AttributeFilter::new(self.config.marker.as_str());
        let output = ScopeWalker::new(&self.ast, &filter, &templates).walk()?;
        let includes = IncludeDeduplicator::new()
            .with_roots(&self.config.include_roots)
            .normalize(&output.dependencies);
        Ok(Run {
            templates,
            output,
            includes,
        })
    }

    /// Generate the reflection header.
    pub fn generate(&self) -> Result<String> {
        let run = self.run()?;
        let code = assemble(
            &run.templates.header,
            &run.output.enums,
            &run.output.classes,
            &run.includes,
        );
        info!(
            "reflected {} enums and {} classes from {} headers",
            unique_fragments(&run.output.enums).len(),
            unique_fragments(&run.output.classes).len(),
            run.includes.len()
        );

        Ok(match &self.config.header_comment {
            Some(comment) => format!("{}\n\n{}", banner(comment), code),
            None => code,
        })
    }

    /// JSON summary of every reflected enum and class.
    pub fn generate_metadata(&self) -> Result<String> {
        let run = self.run()?;
        let metadata = Metadata {
            includes: &run.includes,
            enums: unique_fragments(&run.output.enums)
                .into_iter()
                .map(|fragment| fragment.record())
                .collect(),
            classes: unique_fragments(&run.output.classes)
                .into_iter()
                .map(|fragment| fragment.record())
                .collect(),
        };
        serde_json::to_string_pretty(&metadata).map_err(Error::Metadata)
    }

    /// Contents of the marker header included by annotated sources.
    pub fn generate_marker_header(&self) -> String {
        format!(
            "// AUTO-GENERATED. DO NOT CHANGE.\n\
             \n\
             #pragma once\n\
             \n\
             #define OBS_MARKER \"{}\"\n\
             \n\
             #define OBS_ENUM(...)\n\
             #define OBS_CLASS(...)\n\
             #define OBS_PROP(...)\n",
            self.config.marker
        )
    }

    /// Every file of the run, fully rendered.
    ///
    /// Nothing is returned unless all of them could be generated.
    pub fn artifacts(&self) -> Result<Vec<Artifact>> {
        let mut artifacts = vec![Artifact {
            file_name: self.config.output_file.clone(),
            contents: self.generate()?,
        }];
        if let Some(file_name) = self.config.marker_header() {
            artifacts.push(Artifact {
                file_name: file_name.to_string(),
                contents: self.generate_marker_header(),
            });
        }
        if let Some(file_name) = &self.config.metadata_file {
            artifacts.push(Artifact {
                file_name: file_name.clone(),
                contents: self.generate_metadata()?,
            });
        }
        Ok(artifacts)
    }

    /// Write every artifact into `dir`, creating it when missing.
    ///
    /// Every file is staged under a hidden temporary name first and only
    /// renamed into place once all of them were written, so a failed write
    /// leaves the previous outputs untouched. A rename failing halfway still
    /// leaves the files renamed before it.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # fn main() -> obsidian_codegen::Result<()> {
    /// use obsidian_codegen::CodeGenerator;
    ///
    /// CodeGenerator::new()
    ///     .add_ast_file("build/types.json")?
    ///     .write_to_dir("generated/")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<Artifact>> {
        let dir = dir.as_ref();
        let artifacts = self.artifacts()?;
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(artifacts.len());
        for artifact in &artifacts {
            let path = dir.join(&artifact.file_name);
            let temp = staging_path(&path);
            if let Err(e) = fs::write(&temp, &artifact.contents) {
                discard(staged.iter().map(|(temp, _)| temp).chain([&temp]));
                return Err(Error::io(&temp, e));
            }
            staged.push((temp, path));
        }

        for (index, (temp, path)) in staged.iter().enumerate() {
            if let Err(e) = fs::rename(temp, path) {
                discard(staged[index..].iter().map(|(temp, _)| temp));
                return Err(Error::io(path, e));
            }
            info!("wrote {}", path.display());
        }
        Ok(artifacts)
    }

    /// Write the reflection header to a file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let code = self.generate()?;
        fs::write(path, code).map_err(|e| Error::io(path, e))
    }

    /// Write the reflection header to a writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        let code = self.generate()?;
        writer
            .write_all(code.as_bytes())
            .map_err(|e| Error::io("<writer>", e))
    }
}

/// `dir/.name.tmp` for `dir/name`.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".tmp");
    path.with_file_name(name)
}

fn discard<'a>(paths: impl Iterator<Item = &'a PathBuf>) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            warn!("could not remove {}: {e}", path.display());
        }
    }
}

fn banner(comment: &str) -> String {
    comment
        .lines()
        .map(|line| {
            if line.is_empty() {
                "//".to_string()
            } else {
                format!("// {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
