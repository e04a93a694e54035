//! Arena storage for expression nodes.
//!
//! Nodes live contiguously in a `Vec` and are hash-consed: building the same
//! node twice yields the same handle. Every [`Expression`](crate::Expression)
//! owns one arena; operations that combine expressions copy nodes across with
//! [`ExprArena::import`].

use hashbrown::HashMap;

use crate::expr::{ExprNode, Func, Operands, SymbolId};
use crate::handle::ExprHandle;
use crate::intern::InternTable;
use crate::literal::Literal;

/// Hash-consed node storage.
#[derive(Debug, Default, Clone)]
pub struct ExprArena {
    /// All nodes, indexed by handle.
    nodes: Vec<ExprNode>,
    /// Node content to handle.
    intern_map: HashMap<ExprNode, ExprHandle>,
    /// Symbol names.
    symbols: InternTable<String>,
}

impl ExprArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a node, returning the existing handle when it is already stored.
    ///
    /// # Panics
    ///
    /// Panics if the arena would exceed `u32::MAX` nodes.
    pub fn intern(&mut self, node: ExprNode) -> ExprHandle {
        if let Some(&handle) = self.intern_map.get(&node) {
            return handle;
        }
        let index = u32::try_from(self.nodes.len()).ok();
        assert!(
            index.is_some_and(|i| i < u32::MAX),
            "expression arena capacity exceeded"
        );
        let handle = ExprHandle::new(index.unwrap_or_default());
        self.nodes.push(node.clone());
        self.intern_map.insert(node, handle);
        handle
    }

    /// Returns the node behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle came from another arena and is out of range.
    #[must_use]
    pub fn get(&self, handle: ExprHandle) -> &ExprNode {
        &self.nodes[handle.slot()]
    }

    /// Interns a symbol name.
    pub fn intern_symbol(&mut self, name: &str) -> SymbolId {
        match self.symbols.lookup(name) {
            Some(id) => id,
            None => self.symbols.intern(name.to_string()),
        }
    }

    /// Returns the id of an already interned symbol.
    #[must_use]
    pub fn symbol_id(&self, name: &str) -> Option<SymbolId> {
        self.symbols.lookup(name)
    }

    /// Returns the name of a symbol.
    #[must_use]
    pub fn symbol_name(&self, id: SymbolId) -> Option<&str> {
        self.symbols.get(id).map(String::as_str)
    }

    /// Number of stored nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // === Constructors ===

    /// A numeric literal.
    pub fn number(&mut self, value: f64) -> ExprHandle {
        self.intern(ExprNode::Number(Literal::new(value)))
    }

    /// A symbol.
    pub fn symbol(&mut self, name: &str) -> ExprHandle {
        let id = self.intern_symbol(name);
        self.intern(ExprNode::Symbol(id))
    }

    /// A sum; the empty sum is `0` and a single term is returned as is.
    pub fn add(&mut self, args: impl Into<Operands>) -> ExprHandle {
        let args = args.into();
        match args.len() {
            0 => self.number(0.0),
            1 => args[0],
            _ => self.intern(ExprNode::Add(args)),
        }
    }

    /// A product; the empty product is `1` and a single factor is returned as is.
    pub fn mul(&mut self, args: impl Into<Operands>) -> ExprHandle {
        let args = args.into();
        match args.len() {
            0 => self.number(1.0),
            1 => args[0],
            _ => self.intern(ExprNode::Mul(args)),
        }
    }

    /// `a - b`, stored as `a + (-b)`.
    pub fn sub(&mut self, a: ExprHandle, b: ExprHandle) -> ExprHandle {
        let nb = self.neg(b);
        self.add(smallvec::smallvec![a, nb])
    }

    /// A power.
    pub fn pow(&mut self, base: ExprHandle, exp: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Pow { base, exp })
    }

    /// A negation.
    pub fn neg(&mut self, arg: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Neg(arg))
    }

    /// A quotient.
    pub fn div(&mut self, num: ExprHandle, den: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Div { num, den })
    }

    /// A function application.
    pub fn call(&mut self, func: Func, arg: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Call { func, arg })
    }

    /// Copies the expression rooted at `root` in `other` into this arena.
    pub fn import(&mut self, other: &ExprArena, root: ExprHandle) -> ExprHandle {
        let mut memo: HashMap<ExprHandle, ExprHandle> = HashMap::new();
        self.import_rec(other, root, &mut memo)
    }

    fn import_rec(
        &mut self,
        other: &ExprArena,
        h: ExprHandle,
        memo: &mut HashMap<ExprHandle, ExprHandle>,
    ) -> ExprHandle {
        if let Some(&done) = memo.get(&h) {
            return done;
        }
        let node = match other.get(h).clone() {
            ExprNode::Number(n) => ExprNode::Number(n),
            ExprNode::Symbol(id) => {
                let name = other.symbol_name(id).unwrap_or("_");
                ExprNode::Symbol(self.intern_symbol(name))
            }
            ExprNode::Add(args) => ExprNode::Add(
                args.iter()
                    .map(|&a| self.import_rec(other, a, memo))
                    .collect(),
            ),
            ExprNode::Mul(args) => ExprNode::Mul(
                args.iter()
                    .map(|&a| self.import_rec(other, a, memo))
                    .collect(),
            ),
            ExprNode::Pow { base, exp } => ExprNode::Pow {
                base: self.import_rec(other, base, memo),
                exp: self.import_rec(other, exp, memo),
            },
            ExprNode::Neg(a) => ExprNode::Neg(self.import_rec(other, a, memo)),
            ExprNode::Div { num, den } => ExprNode::Div {
                num: self.import_rec(other, num, memo),
                den: self.import_rec(other, den, memo),
            },
            ExprNode::Call { func, arg } => ExprNode::Call {
                func,
                arg: self.import_rec(other, arg, memo),
            },
        };
        let out = self.intern(node);
        memo.insert(h, out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_are_shared() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let y = arena.symbol("y");
        assert_eq!(x, arena.symbol("x"));
        assert_ne!(x, y);
        assert_eq!(arena.symbol_id("y"), Some(1));
    }

    #[test]
    fn test_hash_consing() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let one = arena.number(1.0);
        let s1 = arena.add(smallvec::smallvec![x, one]);
        let s2 = arena.add(smallvec::smallvec![x, one]);
        assert_eq!(s1, s2);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_import_preserves_structure() {
        let mut src = ExprArena::new();
        let y = src.symbol("y");
        let two = src.number(2.0);
        let p = src.pow(y, two);

        let mut dst = ExprArena::new();
        let x = dst.symbol("x");
        let q = dst.import(&src, p);
        let ExprNode::Pow { base, exp } = dst.get(q).clone() else {
            panic!("expected a power");
        };
        assert_ne!(base, x);
        assert_eq!(dst.get(base), &ExprNode::Symbol(dst.symbol_id("y").unwrap()));
        assert_eq!(dst.get(exp).as_number(), Some(2.0));
    }
}
