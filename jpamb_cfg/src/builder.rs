use crate::{BlockId, Cfg, Edge, EdgeId, Error, NodeRef, Result};
use jpamb_loader::{BytecodeCache, OpcodeSource};
use jpamb_opcode::{MethodId, Opcode};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A process-wide CFG registry that owns the recursive build algorithm
/// (§4.3, §9: "keep it but make registration explicit"). Registering a
/// method's CFG before recursing into it is what lets recursive
/// `InvokeStatic` calls find the in-progress graph instead of looping
/// forever.
#[derive(Debug)]
pub struct CfgBuilder<S> {
    cache: BytecodeCache<S>,
    cfgs: HashMap<MethodId, Cfg>,
    edges: Vec<Edge>,
}

impl<S: OpcodeSource> CfgBuilder<S> {
    #[must_use]
    pub fn new(cache: BytecodeCache<S>) -> Self {
        CfgBuilder {
            cache,
            cfgs: HashMap::new(),
            edges: Vec::new(),
        }
    }

    #[must_use]
    pub fn cfg(&self, method: &MethodId) -> Option<&Cfg> {
        self.cfgs.get(method)
    }

    #[must_use]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Builds (or returns the already-registered) CFG for `method`, returning
    /// a reference to its entry block.
    ///
    /// # Errors
    /// Propagates loader failures and [`Error`] for malformed opcode
    /// sequences (an invoke-special that is not an `AssertionError`
    /// constructor, or a backward jump with no enclosing block).
    pub fn build(&mut self, method: &MethodId) -> Result<NodeRef> {
        if let Some(existing) = self.cfgs.get(method) {
            return Ok(NodeRef {
                method: Arc::clone(&existing.method),
                block: existing.entry,
            });
        }

        debug!(%method, "building cfg");
        let method_arc = Arc::new(method.clone());
        let mut cfg = Cfg::new(Arc::clone(&method_arc));
        let entry = cfg.get_or_add_block(0, 0);
        cfg.entry = entry;
        self.cfgs.insert(method.clone(), cfg);

        let opcodes = self.cache.opcodes(method)?;
        let root = self.build_walk(method, &opcodes, 0, 0)?;

        let cfg = self.cfgs.get_mut(method).expect("registered above");
        cfg.entry = root;
        cfg.building = false;

        self.resolve_overlaps(method);
        self.finalize_pending_continuations(method)?;

        Ok(NodeRef {
            method: method_arc,
            block: root,
        })
    }

    /// The recursive walk proper: extends a block from `offset` until a
    /// terminator, a taken backward jump, or a call site ends it (§4.3
    /// Recursive build).
    fn build_walk(
        &mut self,
        method: &MethodId,
        opcodes: &[Opcode],
        offset_start: usize,
        mut offset: usize,
    ) -> Result<BlockId> {
        loop {
            let Some(opcode) = opcodes.get(offset).cloned() else {
                return Ok(self.get_or_add_block(method, offset_start, offset.saturating_sub(1)));
            };

            match opcode {
                Opcode::Ifz { target, .. } | Opcode::If { target, .. } => {
                    let node = self.get_or_add_block(method, offset_start, offset);
                    let fallthrough_start = offset + 1;
                    let fallthrough = self.build_walk(method, opcodes, fallthrough_start, fallthrough_start)?;
                    let taken = if target <= offset {
                        self.resolve_back_edge(method, target)?
                    } else {
                        self.build_walk(method, opcodes, target, target)?
                    };
                    self.set_terminator(method, node, opcode.clone());
                    self.push_edge(method, node, method, fallthrough, Some(opcode.clone()), Some(false));
                    self.push_edge(method, node, method, taken, Some(opcode), Some(true));
                    return Ok(node);
                }
                Opcode::Goto { target } => {
                    let node = self.get_or_add_block(method, offset_start, offset);
                    self.set_terminator(method, node, opcode.clone());
                    let to = if target <= offset {
                        self.resolve_back_edge(method, target)?
                    } else {
                        self.build_walk(method, opcodes, target, target)?
                    };
                    self.push_edge(method, node, method, to, Some(opcode), None);
                    return Ok(node);
                }
                Opcode::Return { .. } => {
                    let node = self.get_or_add_block(method, offset_start, offset);
                    self.set_terminator(method, node, opcode);
                    return Ok(node);
                }
                Opcode::InvokeSpecial { callee } if is_assertion_ctor(&callee) => {
                    let mut scan = offset;
                    loop {
                        match opcodes.get(scan) {
                            Some(Opcode::Throw) => break,
                            Some(_) => scan += 1,
                            None => {
                                return Err(Error::UnsupportedInvokeSpecial(callee.to_string()));
                            }
                        }
                    }
                    let node = self.get_or_add_block(method, offset_start, scan);
                    self.set_terminator(method, node, Opcode::Throw);
                    return Ok(node);
                }
                Opcode::InvokeSpecial { callee } => {
                    return Err(Error::UnsupportedInvokeSpecial(callee.to_string()));
                }
                Opcode::InvokeStatic { callee } => {
                    let node = self.get_or_add_block(method, offset_start, offset);
                    let continuation_start = offset + 1;
                    let continuation =
                        self.build_walk(method, opcodes, continuation_start, continuation_start)?;

                    let callee_ref = self.build(&callee)?;
                    self.push_edge(
                        method,
                        node,
                        &callee,
                        callee_ref.block,
                        Some(Opcode::InvokeStatic {
                            callee: callee.clone(),
                        }),
                        None,
                    );

                    let callee_building = self.cfgs.get(&callee).is_some_and(|c| c.building);
                    if callee_building {
                        let cfg = self.cfgs.get_mut(&callee).expect("checked above");
                        cfg.pending_continuations.push(NodeRef {
                            method: Arc::new(method.clone()),
                            block: continuation,
                        });
                    } else {
                        self.attach_return_edges(&callee, method, continuation);
                    }
                    return Ok(node);
                }
                _ => offset += 1,
            }
        }
    }

    fn get_or_add_block(&mut self, method: &MethodId, offset_start: usize, offset_end: usize) -> BlockId {
        self.cfgs
            .get_mut(method)
            .expect("cfg registered before walking")
            .get_or_add_block(offset_start, offset_end)
    }

    /// Sets the terminator on `block`'s active tail: a back-edge resolved
    /// while computing one of this opcode's successors may have split
    /// `block` itself, in which case the opcode actually lives in the split
    /// lower half, not the stale parent.
    fn set_terminator(&mut self, method: &MethodId, block: BlockId, opcode: Opcode) {
        let cfg = self.cfgs.get_mut(method).expect("cfg registered before walking");
        let tail = cfg.active_tail(block);
        cfg.block_mut(tail).terminator = Some(opcode);
    }

    /// Splits the block containing `target` in two, forwarding the upper
    /// half's edges and terminator onto the lower half (§4.3 Back-edges).
    fn resolve_back_edge(&mut self, method: &MethodId, target: usize) -> Result<BlockId> {
        let cfg = self.cfgs.get(method).expect("cfg registered");
        if let Some(existing) = cfg.block_at(target) {
            return Ok(existing);
        }
        let parent = cfg
            .block_containing(target)
            .ok_or(Error::UnresolvedBackEdge(target))?;
        let parent_end = cfg.block(parent).offset_end;

        let cfg = self.cfgs.get_mut(method).expect("cfg registered");
        let lower = cfg.get_or_add_block(target, parent_end);
        let transferred_edges = std::mem::take(&mut cfg.block_mut(parent).edges);
        let transferred_terminator = cfg.block_mut(parent).terminator.take();
        cfg.block_mut(parent).offset_end = target - 1;
        cfg.block_mut(lower).edges = transferred_edges;
        cfg.block_mut(lower).terminator = transferred_terminator;
        cfg.block_mut(parent).split_child = Some(lower);

        // Connects the stale parent half directly to its own tail, bypassing
        // push_edge's active_tail resolution: split_child was just set above,
        // so resolving `parent`'s tail here would immediately fold this edge
        // into a self-loop on `lower`.
        self.push_edge_raw(method, parent, method, lower, None, None);
        Ok(lower)
    }

    /// Resolves `from_block`'s active tail (it may have been split by a
    /// nested recursive call since it was created) and records an edge from
    /// there. `to_block` is used as given (§9: only the source side of an
    /// edge is re-resolved at push time).
    fn push_edge(
        &mut self,
        from_method: &MethodId,
        from_block: BlockId,
        to_method: &MethodId,
        to_block: BlockId,
        opcode: Option<Opcode>,
        eval: Option<bool>,
    ) -> EdgeId {
        let from_tail = self
            .cfgs
            .get(from_method)
            .expect("cfg registered")
            .active_tail(from_block);
        self.push_edge_raw(from_method, from_tail, to_method, to_block, opcode, eval)
    }

    fn push_edge_raw(
        &mut self,
        from_method: &MethodId,
        from_block: BlockId,
        to_method: &MethodId,
        to_block: BlockId,
        opcode: Option<Opcode>,
        eval: Option<bool>,
    ) -> EdgeId {
        let from_method_arc = Arc::clone(&self.cfgs.get(from_method).expect("cfg registered").method);
        let to_method_arc = Arc::clone(&self.cfgs.get(to_method).expect("cfg registered").method);

        let id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            from: NodeRef {
                method: from_method_arc,
                block: from_block,
            },
            to: NodeRef {
                method: to_method_arc,
                block: to_block,
            },
            opcode,
            eval,
        });
        self.cfgs
            .get_mut(from_method)
            .expect("cfg registered")
            .block_mut(from_block)
            .edges
            .push(id);
        id
    }

    fn attach_return_edges(&mut self, callee: &MethodId, caller: &MethodId, continuation: BlockId) {
        let returns = self
            .cfgs
            .get(callee)
            .map(Cfg::return_blocks)
            .unwrap_or_default();
        for r in returns {
            let opcode = self.cfgs.get(callee).and_then(|c| c.block(r).terminator.clone());
            self.push_edge(callee, r, caller, continuation, opcode, None);
        }
    }

    /// Attaches every pending continuation recorded on `method`'s CFG to
    /// each of its return blocks, now that it has finished building (§4.3
    /// Interprocedural edges).
    fn finalize_pending_continuations(&mut self, method: &MethodId) -> Result<()> {
        let pending = self
            .cfgs
            .get_mut(method)
            .expect("cfg registered")
            .pending_continuations
            .drain(..)
            .collect::<Vec<_>>();
        let returns = self.cfgs.get(method).expect("cfg registered").return_blocks();
        for continuation in pending {
            for &r in &returns {
                let opcode = self.cfgs.get(method).and_then(|c| c.block(r).terminator.clone());
                self.push_edge(method, r, &continuation.method.clone(), continuation.block, opcode, None);
            }
        }
        Ok(())
    }

    /// Post-build overlap resolution (§4.3 Overlap resolution): truncates any
    /// block whose recorded end reaches into the next block's start.
    fn resolve_overlaps(&mut self, method: &MethodId) {
        let order: Vec<(BlockId, usize, usize)> = {
            let cfg = self.cfgs.get(method).expect("cfg registered");
            let mut v: Vec<_> = cfg.blocks().map(|(id, b)| (id, b.offset_start, b.offset_end)).collect();
            v.sort_by_key(|&(_, start, _)| start);
            v
        };
        for window in order.windows(2) {
            let (current, _, current_end) = window[0];
            let (next, next_start, _) = window[1];
            if current_end >= next_start {
                let cfg = self.cfgs.get_mut(method).expect("cfg registered");
                let block = cfg.block_mut(current);
                block.offset_end = next_start.saturating_sub(1);
                block.edges.clear();
                block.terminator = None;
                self.push_edge(method, current, method, next, None, None);
            }
        }
    }
}

fn is_assertion_ctor(callee: &MethodId) -> bool {
    callee.class_name == "java/lang/AssertionError" && callee.method_name == "<init>"
}

#[cfg(test)]
mod tests {
    use super::*;
    use jpamb_loader::BytecodeCache;

    #[test]
    fn recursive_fib_has_one_cfg_with_entry_to_entry_call_edges() {
        let (suite, fib) = jpamb_test_util::recursive_fib();
        let mut builder = CfgBuilder::new(BytecodeCache::new(suite));
        let root = builder.build(&fib).unwrap();
        let cfg = builder.cfg(&fib).unwrap();
        assert_eq!(root.block, cfg.entry);
        assert!(cfg.ranges_are_disjoint());

        let call_edges_to_entry = builder
            .edges()
            .iter()
            .filter(|e| {
                e.to.block == cfg.entry
                    && *e.to.method == fib
                    && matches!(e.opcode, Some(Opcode::InvokeStatic { .. }))
            })
            .count();
        assert_eq!(call_edges_to_entry, 2, "both call sites should target fib's own entry");

        let returns = cfg.return_blocks();
        assert_eq!(returns.len(), 2, "fib has a base-case return and a recursive-case return");
        for r in &returns {
            let continuations = builder.edges().iter().filter(|e| e.from.block == *r).count();
            assert_eq!(continuations, 2, "every return must reach both call-site continuations");
        }
    }

    #[test]
    fn loop_back_edge_splits_the_header_block() {
        let (suite, sum) = jpamb_test_util::loop_with_back_edge();
        let mut builder = CfgBuilder::new(BytecodeCache::new(suite));
        builder.build(&sum).unwrap();
        let cfg = builder.cfg(&sum).unwrap();
        assert!(cfg.ranges_are_disjoint());

        let entry_block = cfg.block(cfg.entry);
        assert!(entry_block.split_child.is_some(), "the back-edge target fell inside the entry block");

        let tail = cfg.active_tail(cfg.entry);
        assert_ne!(tail, cfg.entry);
        let tail_block = cfg.block(tail);
        assert_eq!(tail_block.offset_start, 4);
        assert!(tail_block.is_final());

        let self_loop = builder
            .edges()
            .iter()
            .any(|e| e.from.block == tail && e.to.block == tail && e.eval == Some(true));
        assert!(self_loop, "the loop body must jump back to its own active tail");
    }

    #[test]
    fn straight_line_method_is_a_single_block() {
        let (suite, f) = jpamb_test_util::div_by_param();
        let mut builder = CfgBuilder::new(BytecodeCache::new(suite));
        builder.build(&f).unwrap();
        let cfg = builder.cfg(&f).unwrap();
        assert_eq!(cfg.blocks().count(), 1);
        assert!(cfg.block(cfg.entry).is_return());
    }
}
