//! Arena representation of a parsed header set.
//!
//! The parser collaborator produces this tree; the generator only reads it.
//! Declarations live in a flat `Vec` and refer to each other through
//! [`NodeId`]s, so traversal never needs the call stack to follow nesting.
//!
//! Fully-qualified names are not stored. They are rebuilt from the parent
//! chain whenever they are needed ([`Ast::full_name`], [`Ast::scope`]).

/// Index of a declaration inside an [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Common view over anything that can carry attributes and a comment.
pub trait Declaration {
    fn name(&self) -> &str;
    fn attributes(&self) -> &[String];
    fn comment(&self) -> Option<&str>;
}

/// A namespace, class or enum stored in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    parent: Option<NodeId>,
    source_file: String,
    attributes: Vec<String>,
    comment: Option<String>,
    kind: NodeKind,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }
}

impl Declaration for Node {
    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &[String] {
        &self.attributes
    }

    fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

/// Kind-specific payload of a [`Node`].
#[derive(Debug, Clone)]
pub enum NodeKind {
    Namespace(NamespaceNode),
    Class(ClassNode),
    Enum(EnumNode),
}

/// Children of a namespace, each list in declaration order.
#[derive(Debug, Clone, Default)]
pub struct NamespaceNode {
    pub namespaces: Vec<NodeId>,
    pub classes: Vec<NodeId>,
    pub enums: Vec<NodeId>,
}

/// Members of a class or struct, each list in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ClassNode {
    pub fields: Vec<FieldDecl>,
    pub classes: Vec<NodeId>,
    pub enums: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct EnumNode {
    /// Size of the underlying integer type in bytes.
    pub underlying_size: u32,
    /// `enum class` rather than a plain `enum`.
    pub scoped: bool,
    pub items: Vec<EnumItem>,
}

/// A single enumerator.
///
/// Values are not assumed to be contiguous or unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumItem {
    pub name: String,
    pub value: i128,
    pub comment: Option<String>,
}

impl EnumItem {
    pub fn new(name: impl Into<String>, value: i128) -> Self {
        Self {
            name: name.into(),
            value,
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// A data member of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    /// Fully-qualified spelling of the declared type, e.g. `const char *`.
    pub type_name: String,
    /// Byte offset inside the enclosing class.
    pub offset: u64,
    /// Byte size of the field type.
    pub size: u64,
    pub attributes: Vec<String>,
    pub comment: Option<String>,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            offset: 0,
            size: 0,
            attributes: Vec::new(),
            comment: None,
        }
    }

    pub fn with_layout(mut self, offset: u64, size: u64) -> Self {
        self.offset = offset;
        self.size = size;
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

impl Declaration for FieldDecl {
    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &[String] {
        &self.attributes
    }

    fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

/// Header-level data shared by classes and enums when they are added.
#[derive(Debug, Clone, Default)]
pub struct DeclInfo {
    pub name: String,
    pub source_file: String,
    pub attributes: Vec<String>,
    pub comment: Option<String>,
}

/// Input for [`Ast::add_class`].
#[derive(Debug, Clone, Default)]
pub struct ClassDecl {
    pub info: DeclInfo,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            info: DeclInfo {
                name: name.into(),
                ..DeclInfo::default()
            },
        }
    }

    pub fn with_source_file(mut self, path: impl Into<String>) -> Self {
        self.info.source_file = path.into();
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.info.attributes.push(attribute.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.info.comment = Some(comment.into());
        self
    }
}

/// Input for [`Ast::add_enum`].
#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub info: DeclInfo,
    pub underlying_size: u32,
    pub scoped: bool,
    pub items: Vec<EnumItem>,
}

impl EnumDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            info: DeclInfo {
                name: name.into(),
                ..DeclInfo::default()
            },
            underlying_size: 4,
            scoped: true,
            items: Vec::new(),
        }
    }

    pub fn with_source_file(mut self, path: impl Into<String>) -> Self {
        self.info.source_file = path.into();
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.info.attributes.push(attribute.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.info.comment = Some(comment.into());
        self
    }

    pub fn with_underlying_size(mut self, bytes: u32) -> Self {
        self.underlying_size = bytes;
        self
    }

    /// Mark the enum as a plain (unscoped) `enum`.
    pub fn unscoped(mut self) -> Self {
        self.scoped = false;
        self
    }

    pub fn with_item(mut self, item: EnumItem) -> Self {
        self.items.push(item);
        self
    }
}

/// The whole parsed header set. Node 0 is the implicit global namespace.
#[derive(Debug, Clone)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Default for Ast {
    fn default() -> Self {
        Self {
            nodes: vec![Node {
                name: String::new(),
                parent: None,
                source_file: String::new(),
                attributes: Vec::new(),
                comment: None,
                kind: NodeKind::Namespace(NamespaceNode::default()),
            }],
        }
    }
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// The implicit global namespace.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, the root namespace included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when nothing but the root namespace exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Node behind `id`; panics when `id` comes from another arena.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// `None` unless `id` is a namespace.
    pub fn namespace(&self, id: NodeId) -> Option<&NamespaceNode> {
        match &self.node(id).kind {
            NodeKind::Namespace(ns) => Some(ns),
            _ => None,
        }
    }

    /// `None` unless `id` is a class.
    pub fn class(&self, id: NodeId) -> Option<&ClassNode> {
        match &self.node(id).kind {
            NodeKind::Class(class) => Some(class),
            _ => None,
        }
    }

    /// `None` unless `id` is an enum.
    pub fn enumeration(&self, id: NodeId) -> Option<&EnumNode> {
        match &self.node(id).kind {
            NodeKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Add a namespace under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a namespace.
    pub fn add_namespace(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let id = self.push(
            parent,
            DeclInfo {
                name: name.into(),
                ..DeclInfo::default()
            },
            NodeKind::Namespace(NamespaceNode::default()),
        );
        match &mut self.nodes[parent.0].kind {
            NodeKind::Namespace(ns) => ns.namespaces.push(id),
            _ => panic!("namespaces can only be nested inside namespaces"),
        }
        id
    }

    /// Add a class under a namespace or another class.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is an enum.
    pub fn add_class(&mut self, parent: NodeId, decl: ClassDecl) -> NodeId {
        let id = self.push(parent, decl.info, NodeKind::Class(ClassNode::default()));
        match &mut self.nodes[parent.0].kind {
            NodeKind::Namespace(ns) => ns.classes.push(id),
            NodeKind::Class(class) => class.classes.push(id),
            NodeKind::Enum(_) => panic!("classes cannot be declared inside an enum"),
        }
        id
    }

    /// Add an enum under a namespace or a class.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is an enum.
    pub fn add_enum(&mut self, parent: NodeId, decl: EnumDecl) -> NodeId {
        let kind = NodeKind::Enum(EnumNode {
            underlying_size: decl.underlying_size,
            scoped: decl.scoped,
            items: decl.items,
        });
        let id = self.push(parent, decl.info, kind);
        match &mut self.nodes[parent.0].kind {
            NodeKind::Namespace(ns) => ns.enums.push(id),
            NodeKind::Class(class) => class.enums.push(id),
            NodeKind::Enum(_) => panic!("enums cannot be declared inside an enum"),
        }
        id
    }

    /// Append a data member to a class.
    ///
    /// # Panics
    ///
    /// Panics if `class` is not a class.
    pub fn add_field(&mut self, class: NodeId, field: FieldDecl) {
        match &mut self.nodes[class.0].kind {
            NodeKind::Class(node) => node.fields.push(field),
            _ => panic!("fields can only be added to classes"),
        }
    }

    fn push(&mut self, parent: NodeId, info: DeclInfo, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: info.name,
            parent: Some(parent),
            source_file: info.source_file,
            attributes: info.attributes,
            comment: info.comment,
            kind,
        });
        id
    }

    /// `::`-joined names of every enclosing scope, outermost first.
    ///
    /// Empty for declarations that live directly in the global namespace.
    pub fn scope(&self, id: NodeId) -> String {
        match self.node(id).parent {
            Some(parent) => self.full_name(parent),
            None => String::new(),
        }
    }

    /// Fully-qualified name, e.g. `Outer::Inner::Color`.
    pub fn full_name(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            // The global namespace has no name and no parent.
            if node.parent.is_some() {
                segments.push(node.name.as_str());
            }
            current = node.parent;
        }
        segments.reverse();
        segments.join("::")
    }
}
