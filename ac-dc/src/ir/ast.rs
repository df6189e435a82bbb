use std::fmt;

use crate::error::{CompileResult, SemanticError};
use crate::ir::types::{DataType, Literal};
use crate::span::Span;

/// Index of a node inside its `Ast` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,      // +
    Subtract, // -
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Root; top-level declarations and statements in source order.
    Program { children: Vec<NodeId> },
    /// `f a` / `i a`; the child is the `Reference` naming the variable.
    Declaration { declared: DataType, target: NodeId },
    /// `a = value`
    Assign { target: NodeId, value: NodeId },
    /// `left + right`, `left - right`
    Compute {
        op: BinaryOperator,
        left: NodeId,
        right: NodeId,
    },
    Reference { name: char },
    Constant(Literal),
    /// `p a`
    Print { name: char },
    /// Explicit int -> float promotion, inserted by semantic analysis.
    Convert { child: NodeId },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub datatype: Option<DataType>,
    /// Non-owning link for diagnostics; the arena owns every node.
    pub parent: Option<NodeId>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}

impl Ast {
    pub fn new() -> Self {
        let root = Node {
            kind: NodeKind::Program { children: Vec::new() },
            datatype: None,
            parent: None,
            span: Span::default(),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Declarations and statements directly under the root.
    pub fn top_level(&self) -> &[NodeId] {
        match &self.node(self.root).kind {
            NodeKind::Program { children } => children,
            _ => &[],
        }
    }

    /// Allocates a detached node; link it with `push_top_level` or by
    /// passing its id into a parent built with `add_node`.
    pub fn add_node(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len());
        for child in kind_children(&kind) {
            self.nodes[child.0].parent = Some(id);
        }
        self.nodes.push(Node {
            kind,
            datatype: None,
            parent: None,
            span,
        });
        id
    }

    pub fn push_top_level(&mut self, id: NodeId) {
        let root = self.root;
        self.nodes[id.0].parent = Some(root);
        if let NodeKind::Program { children } = &mut self.nodes[root.0].kind {
            children.push(id);
        }
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        kind_children(&self.node(id).kind)
    }

    pub fn datatype(&self, id: NodeId) -> Option<DataType> {
        self.node(id).datatype
    }

    pub fn set_datatype(&mut self, id: NodeId, datatype: DataType) {
        self.node_mut(id).datatype = Some(datatype);
    }

    /// Retags an integer constant as a float constant with the same value.
    pub fn widen_constant(&mut self, id: NodeId) -> CompileResult<()> {
        let node = self.node_mut(id);
        match &mut node.kind {
            NodeKind::Constant(literal) => {
                *literal = literal.widen();
                node.datatype = Some(DataType::Float);
                Ok(())
            }
            _ => Err(SemanticError::NotAConstant.into()),
        }
    }

    /// Puts a `Convert` node between `id` and its parent, returning the new node.
    pub fn wrap_in_convert(&mut self, id: NodeId) -> NodeId {
        let parent = self.node(id).parent;
        let span = self.node(id).span;
        let convert = self.add_node(NodeKind::Convert { child: id }, span);
        self.node_mut(convert).datatype = Some(DataType::Float);
        self.node_mut(convert).parent = parent;
        if let Some(parent) = parent {
            self.replace_child(parent, id, convert);
        }
        convert
    }

    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        let swap = |slot: &mut NodeId| {
            if *slot == old {
                *slot = new;
            }
        };
        match &mut self.node_mut(parent).kind {
            NodeKind::Program { children } => children.iter_mut().for_each(swap),
            NodeKind::Declaration { target, .. } => swap(target),
            NodeKind::Assign { target, value } => {
                swap(target);
                swap(value);
            }
            NodeKind::Compute { left, right, .. } => {
                swap(left);
                swap(right);
            }
            NodeKind::Convert { child } => swap(child),
            NodeKind::Reference { .. } | NodeKind::Constant(_) | NodeKind::Print { .. } => {}
        }
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        let node = self.node(id);
        write!(f, "{:indent$}", "", indent = depth * 2)?;
        match &node.kind {
            NodeKind::Program { .. } => write!(f, "Program")?,
            NodeKind::Declaration { declared, .. } => write!(f, "Declaration {}", declared)?,
            NodeKind::Assign { .. } => write!(f, "Assign")?,
            NodeKind::Compute { op, .. } => write!(f, "Compute {:?}", op)?,
            NodeKind::Reference { name } => write!(f, "Reference {}", name)?,
            NodeKind::Constant(literal) => write!(f, "Constant {}", literal)?,
            NodeKind::Print { name } => write!(f, "Print {}", name)?,
            NodeKind::Convert { .. } => write!(f, "Convert")?,
        }
        if let Some(datatype) = node.datatype {
            write!(f, " : {}", datatype)?;
        }
        writeln!(f)?;
        for child in self.children(id) {
            self.fmt_node(f, child, depth + 1)?;
        }
        Ok(())
    }
}

fn kind_children(kind: &NodeKind) -> Vec<NodeId> {
    match kind {
        NodeKind::Program { children } => children.clone(),
        NodeKind::Declaration { target, .. } => vec![*target],
        NodeKind::Assign { target, value } => vec![*target, *value],
        NodeKind::Compute { left, right, .. } => vec![*left, *right],
        NodeKind::Convert { child } => vec![*child],
        NodeKind::Reference { .. } | NodeKind::Constant(_) | NodeKind::Print { .. } => Vec::new(),
    }
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.root, 0)
    }
}
