use jpamb_opcode::{MethodId, Opcode};
use std::sync::Arc;

/// An index into a [`crate::Cfg`]'s block arena (§9: arena indices, not
/// owning pointers, so the cyclic block/edge references a loop or a
/// recursive call produces are representable without `Rc`/`RefCell`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(pub usize);

/// An index into [`crate::CfgBuilder`]'s process-wide edge arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(pub usize);

/// A block identified by the method that owns it plus its index within that
/// method's arena. Interprocedural edges connect a `NodeRef` in the caller's
/// CFG to one in the callee's, which is why edges live in a shared arena
/// rather than inside a single [`crate::Cfg`] (§4.3 Interprocedural edges).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub method: Arc<MethodId>,
    pub block: BlockId,
}

/// A basic block: a maximal straight-line run of offsets, together with an
/// optional terminating opcode and a forwarding pointer used while the
/// block is still being split by a backward jump (§3 Basic block, §4.3
/// Back-edges).
#[derive(Debug, Clone)]
pub struct Block {
    pub offset_start: usize,
    pub offset_end: usize,
    pub terminator: Option<Opcode>,
    pub edges: Vec<EdgeId>,
    /// Set when a later backward jump split this block; the live half is
    /// reached by following this chain (§9: model `split-child` as an
    /// optional forward link; `active_tail` follows it to the leaf).
    pub split_child: Option<BlockId>,
}

impl Block {
    #[must_use]
    pub fn new(offset_start: usize, offset_end: usize) -> Self {
        Block {
            offset_start,
            offset_end,
            terminator: None,
            edges: Vec::new(),
            split_child: None,
        }
    }

    #[must_use]
    pub fn is_final(&self) -> bool {
        self.terminator.is_some()
    }

    #[must_use]
    pub fn is_return(&self) -> bool {
        matches!(self.terminator, Some(Opcode::Return { .. }))
    }
}

/// A control-flow edge (§3 CFG edge). Conditional edges carry the branch
/// opcode and an `eval` tag (`false` = fall-through, `true` = jump taken);
/// unconditional jumps carry the opcode with no tag; call, return, and plain
/// fall-through edges carry no tag, and fall-through/call edges carry no
/// opcode either except the call edge itself, which carries the invoking
/// opcode.
#[derive(Debug, Clone)]
pub struct Edge {
    pub from: NodeRef,
    pub to: NodeRef,
    pub opcode: Option<Opcode>,
    pub eval: Option<bool>,
}
