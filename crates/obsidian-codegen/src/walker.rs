//! Breadth-first traversal of the declaration tree.

use std::collections::{HashSet, VecDeque};

use log::{debug, trace};

use crate::ast::{Ast, Declaration, NodeId};
use crate::attributes::AttributeFilter;
use crate::emit::{ClassEmitter, ClassFragment, EnumEmitter, EnumFragment};
use crate::error::Result;
use crate::template::CompiledTemplates;

/// Fragments in discovery order plus every header they depend on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOutput {
    pub enums: Vec<EnumFragment>,
    pub classes: Vec<ClassFragment>,
    /// Source headers in discovery order, duplicates included. A fragment
    /// whose full name was already emitted contributes no header.
    pub dependencies: Vec<String>,
}

/// Fully-qualified names that already contributed their headers.
#[derive(Default)]
struct Seen {
    enums: HashSet<String>,
    classes: HashSet<String>,
}

fn first_emission(seen: &mut HashSet<String>, full_name: &str) -> bool {
    let first = seen.insert(full_name.to_string());
    if !first {
        debug!("`{full_name}` was already emitted, ignoring its header");
    }
    first
}

/// Visits namespaces level by level and emits every eligible declaration.
///
/// Within one namespace the order is: its enums, its classes, then enums
/// declared inside its classes (breadth-first through nested classes).
/// Child namespaces are queued after that. Classes nested in classes are
/// searched for enums only and are never reflected themselves.
pub struct ScopeWalker<'a> {
    ast: &'a Ast,
    filter: &'a AttributeFilter,
    templates: &'a CompiledTemplates,
}

impl<'a> ScopeWalker<'a> {
    pub fn new(ast: &'a Ast, filter: &'a AttributeFilter, templates: &'a CompiledTemplates) -> Self {
        Self {
            ast,
            filter,
            templates,
        }
    }

    /// Walk the whole tree from the root namespace.
    ///
    /// Stops at the first error; nothing gathered so far is returned then.
    pub fn walk(&self) -> Result<WalkOutput> {
        self.walk_from(self.ast.root())
    }

    /// Walk the subtree of namespace `start`.
    pub fn walk_from(&self, start: NodeId) -> Result<WalkOutput> {
        let enum_emitter = EnumEmitter::new(self.ast, &self.templates.enumeration);
        let class_emitter = ClassEmitter::new(self.ast, self.filter, &self.templates.class);
        let mut output = WalkOutput::default();
        let mut seen = Seen::default();

        let mut namespaces = VecDeque::from([start]);
        while let Some(ns_id) = namespaces.pop_front() {
            let Some(ns) = self.ast.namespace(ns_id) else {
                continue;
            };
            trace!("visiting namespace `{}`", self.ast.full_name(ns_id));

            for &id in &ns.enums {
                self.visit_enum(&enum_emitter, id, &mut output, &mut seen)?;
            }

            for &id in &ns.classes {
                let Some(class) = self.ast.class(id) else {
                    continue;
                };
                if self.filter.is_eligible(self.ast.node(id)) {
                    let fragment = class_emitter.emit(id, class);
                    if first_emission(&mut seen.classes, fragment.full_name()) {
                        output.dependencies.extend_from_slice(fragment.dependencies());
                    }
                    output.classes.push(fragment);
                }
            }

            let mut classes: VecDeque<NodeId> = ns.classes.iter().copied().collect();
            while let Some(class_id) = classes.pop_front() {
                let Some(class) = self.ast.class(class_id) else {
                    continue;
                };
                trace!("searching class `{}` for enums", self.ast.full_name(class_id));
                for &id in &class.enums {
                    self.visit_enum(&enum_emitter, id, &mut output, &mut seen)?;
                }
                classes.extend(class.classes.iter().copied());
            }

            namespaces.extend(ns.namespaces.iter().copied());
        }

        Ok(output)
    }

    fn visit_enum(
        &self,
        emitter: &EnumEmitter<'_>,
        id: NodeId,
        output: &mut WalkOutput,
        seen: &mut Seen,
    ) -> Result<()> {
        let Some(data) = self.ast.enumeration(id) else {
            return Ok(());
        };
        let node = self.ast.node(id);
        if !self.filter.is_eligible(node) {
            trace!("skipping enum `{}`", node.name());
            return Ok(());
        }
        let fragment = emitter.emit(id, data)?;
        if first_emission(&mut seen.enums, fragment.full_name()) {
            output.dependencies.extend_from_slice(fragment.dependencies());
        }
        output.enums.push(fragment);
        Ok(())
    }
}
