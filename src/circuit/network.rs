//! The levelized circuit model: `TpgNetwork` and its builder.

use std::collections::HashSet;

use smallvec::SmallVec;

use crate::circuit::ffr::TpgFFR;
use crate::circuit::mffc::TpgMFFC;
use crate::circuit::node::{NodeKind, PrimType, TpgNode};
use crate::error::{DruidError, Result};
use crate::ids::{FfrId, MffcId, NodeId};

/// One DFF instance: its data input (a PPO node) and its output (a PPI node)
#[derive(Clone, Copy, Debug)]
pub struct Dff {
    /// The DFF's data-input node (a PPO)
    pub input: NodeId,
    /// The DFF's output node (a PPI)
    pub output: NodeId,
}

/// A levelized combinational DAG built from a gate-level netlist.
///
/// Immutable after construction: accessors return stable ids valid for the
/// network's lifetime. Built incrementally through [`TpgNetwork::builder`],
/// then finalized with [`NetworkBuilder::build`], which levelizes the graph
/// and partitions it into FFRs and MFFCs.
#[derive(Clone, Debug, Default)]
pub struct TpgNetwork {
    nodes: Vec<TpgNode>,
    inputs: Vec<NodeId>,
    outputs: Vec<NodeId>,
    dffs: Vec<Dff>,
    ffrs: Vec<TpgFFR>,
    mffcs: Vec<TpgMFFC>,
}

impl TpgNetwork {
    /// Start building a new network
    pub fn builder() -> NetworkBuilder {
        NetworkBuilder::new()
    }

    /// Number of nodes in the network
    pub fn nb_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of primary inputs
    pub fn nb_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Number of primary outputs
    pub fn nb_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Number of DFFs
    pub fn nb_dffs(&self) -> usize {
        self.dffs.len()
    }

    /// Whether the network is purely combinational (no DFFs)
    pub fn is_comb(&self) -> bool {
        self.dffs.is_empty()
    }

    /// Access a node by id
    pub fn node(&self, id: NodeId) -> &TpgNode {
        &self.nodes[id.index()]
    }

    /// The node id of the i-th primary input
    pub fn input(&self, i: usize) -> NodeId {
        self.inputs[i]
    }

    /// The node id of the i-th primary output
    pub fn output(&self, i: usize) -> NodeId {
        self.outputs[i]
    }

    /// All primary input ids
    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    /// All primary output ids
    pub fn outputs(&self) -> &[NodeId] {
        &self.outputs
    }

    /// All DFFs
    pub fn dffs(&self) -> &[Dff] {
        &self.dffs
    }

    /// All node ids, in construction (topological) order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::new)
    }

    /// The maximum level of any node
    pub fn max_level(&self) -> u32 {
        self.nodes.iter().map(|n| n.level()).max().unwrap_or(0)
    }

    /// Access an FFR by id
    pub fn ffr(&self, id: FfrId) -> &TpgFFR {
        &self.ffrs[id.index()]
    }

    /// All FFRs
    pub fn ffrs(&self) -> &[TpgFFR] {
        &self.ffrs
    }

    /// Access an MFFC by id
    pub fn mffc(&self, id: MffcId) -> &TpgMFFC {
        &self.mffcs[id.index()]
    }

    /// All MFFCs
    pub fn mffcs(&self) -> &[TpgMFFC] {
        &self.mffcs
    }
}

/// Incremental builder for [`TpgNetwork`].
///
/// Mirrors the netlist-reader contract of §6: inputs, outputs, DFFs and
/// logic-node records are fed in, in dependency order (a gate's fanins must
/// already exist), and `build()` produces an immutable network or a
/// [`DruidError::MalformedNetwork`] if a fanin/output reference is dangling.
#[derive(Default)]
pub struct NetworkBuilder {
    nodes: Vec<TpgNode>,
    inputs: Vec<NodeId>,
    outputs: Vec<NodeId>,
    dffs: Vec<Dff>,
}

impl NetworkBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        NetworkBuilder::default()
    }

    fn push_node(&mut self, kind: NodeKind, fanins: SmallVec<[NodeId; 5]>) -> Result<NodeId> {
        let id = NodeId::new(self.nodes.len());
        for &fin in &fanins {
            if fin.index() >= self.nodes.len() {
                return Err(DruidError::MalformedNetwork(format!(
                    "dangling fanin {fin} referenced before node {id} was defined"
                )));
            }
        }
        self.nodes.push(TpgNode::new(id, kind, fanins));
        for &fin in &fanins {
            self.nodes[fin.index()].push_fanout(id);
        }
        Ok(id)
    }

    /// Add a primary input
    pub fn add_input(&mut self) -> NodeId {
        self.push_node(NodeKind::Ppi, SmallVec::new()).unwrap()
    }

    /// Add a logic gate with the given primitive type and fanins
    pub fn add_gate(&mut self, prim: PrimType, fanins: &[NodeId]) -> Result<NodeId> {
        let expected_arity_ok = match prim {
            PrimType::C0 | PrimType::C1 => fanins.is_empty(),
            PrimType::Buff | PrimType::Not => fanins.len() == 1,
            _ => fanins.len() >= 2,
        };
        if !expected_arity_ok {
            return Err(DruidError::MalformedNetwork(format!(
                "gate type {prim:?} given {} fanins",
                fanins.len()
            )));
        }
        self.push_node(NodeKind::Logic(prim), SmallVec::from_slice(fanins))
    }

    /// Add a primary output wired to `source`
    pub fn add_output(&mut self, source: NodeId) -> Result<NodeId> {
        let mut fanins = SmallVec::new();
        fanins.push(source);
        let id = self.push_node(NodeKind::Ppo, fanins)?;
        self.outputs.push(id);
        Ok(id)
    }

    /// Add a DFF whose data input is wired to `d`. Returns the DFF's output node.
    pub fn add_dff(&mut self, d: NodeId) -> Result<NodeId> {
        let mut fanins = SmallVec::new();
        fanins.push(d);
        let input = self.push_node(NodeKind::Ppo, fanins)?;
        let output = self.push_node(NodeKind::Ppi, SmallVec::new())?;
        self.nodes[output.index()].set_alt_node(input);
        self.dffs.push(Dff { input, output });
        Ok(output)
    }

    /// Finalize the network: levelize and partition into FFRs and MFFCs
    pub fn build(mut self) -> Result<TpgNetwork> {
        let dff_outputs: HashSet<NodeId> = self.dffs.iter().map(|d| d.output).collect();
        self.inputs = self
            .nodes
            .iter()
            .filter(|n| n.is_ppi() && !dff_outputs.contains(&n.id()))
            .map(|n| n.id())
            .collect();
        levelize(&mut self.nodes);
        let ffrs = partition_ffrs(&mut self.nodes);
        let mffcs = partition_mffcs(&self.nodes, &ffrs);
        for mffc in &mffcs {
            for &fid in mffc.ffrs() {
                for &node in ffrs[fid.index()].nodes() {
                    self.nodes[node.index()].set_mffc_root(mffc.root());
                }
            }
        }
        Ok(TpgNetwork {
            nodes: self.nodes,
            inputs: self.inputs,
            outputs: self.outputs,
            dffs: self.dffs,
            ffrs,
            mffcs,
        })
    }
}

/// Levelize the DAG: every node gets `1 + max(level of fanins)`, PPIs at level 0.
///
/// Relies on the construction invariant that a node's fanins always have a
/// smaller id (a netlist reader must emit dependencies first), so a single
/// forward pass suffices — no explicit topological sort is needed.
fn levelize(nodes: &mut [TpgNode]) {
    for i in 0..nodes.len() {
        let level = if nodes[i].is_ppi() {
            0
        } else {
            nodes[i]
                .fanins()
                .iter()
                .map(|f| nodes[f.index()].level() + 1)
                .max()
                .unwrap_or(0)
        };
        nodes[i].set_level(level);
    }
}

/// Partition every node into exactly one FFR (§4.1).
///
/// A node is an FFR root iff it is a PPO or has more than one fanout. FFRs
/// are discovered by reverse BFS from each root, stopping at other roots
/// (which become boundary `inputs` rather than members).
fn partition_ffrs(nodes: &mut [TpgNode]) -> Vec<TpgFFR> {
    let n = nodes.len();
    let is_root: Vec<bool> = (0..n)
        .map(|i| nodes[i].is_ppo() || nodes[i].fanout_count() > 1)
        .collect();

    let mut assigned: Vec<Option<FfrId>> = vec![None; n];
    let mut ffrs = Vec::new();

    for i in 0..n {
        if !is_root[i] {
            continue;
        }
        let root_id = NodeId::new(i);
        let ffr_id = FfrId::new(ffrs.len());
        assigned[i] = Some(ffr_id);
        let mut members = vec![root_id];
        let mut inputs = Vec::new();
        let mut stack = vec![root_id];
        while let Some(cur) = stack.pop() {
            for &fin in nodes[cur.index()].fanins() {
                if is_root[fin.index()] {
                    inputs.push(fin);
                    continue;
                }
                if assigned[fin.index()].is_none() {
                    assigned[fin.index()] = Some(ffr_id);
                    members.push(fin);
                    stack.push(fin);
                }
            }
        }
        ffrs.push(TpgFFR::new(ffr_id, root_id, members, inputs));
    }

    for i in 0..n {
        if let Some(fid) = assigned[i] {
            nodes[i].set_ffr(fid, is_root[i]);
        }
    }
    ffrs
}

/// Partition FFRs into MFFCs (§4.1).
///
/// Processes FFR roots in descending level order (closest to the outputs
/// first). An FFR may be absorbed into a growing MFFC iff every fanout of
/// its root node lands inside an FFR already in that MFFC — the standard
/// dominance check, applied at FFR granularity instead of node granularity.
fn partition_mffcs(nodes: &[TpgNode], ffrs: &[TpgFFR]) -> Vec<TpgMFFC> {
    let mut order: Vec<usize> = (0..ffrs.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(nodes[ffrs[i].root().index()].level()));

    let mut mffc_of: Vec<Option<MffcId>> = vec![None; ffrs.len()];
    let mut mffcs = Vec::new();

    for &start in &order {
        if mffc_of[start].is_some() {
            continue;
        }
        let mffc_id = MffcId::new(mffcs.len());
        let mut included: HashSet<usize> = HashSet::new();
        included.insert(start);
        mffc_of[start] = Some(mffc_id);
        let mut stack = vec![start];
        while let Some(f) = stack.pop() {
            for &boundary in ffrs[f].inputs() {
                let cand = nodes[boundary.index()].ffr().unwrap().index();
                if included.contains(&cand) || mffc_of[cand].is_some() {
                    continue;
                }
                let all_in_cone = nodes[boundary.index()].fanouts().iter().all(|fo| {
                    let fo_ffr = nodes[fo.index()].ffr().unwrap().index();
                    included.contains(&fo_ffr)
                });
                if all_in_cone {
                    included.insert(cand);
                    mffc_of[cand] = Some(mffc_id);
                    stack.push(cand);
                }
            }
        }
        let mut ffr_list: Vec<FfrId> = included.into_iter().map(FfrId::new).collect();
        ffr_list.sort();
        let root = ffrs[start].root();
        mffcs.push(TpgMFFC::new(mffc_id, root, ffr_list));
    }
    mffcs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::node::PrimType::*;

    fn build_and2() -> TpgNetwork {
        let mut b = TpgNetwork::builder();
        let a = b.add_input();
        let c = b.add_input();
        let g = b.add_gate(And, &[a, c]).unwrap();
        b.add_output(g).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn test_levelization_monotone() {
        let net = build_and2();
        for id in net.node_ids() {
            for &fin in net.node(id).fanins() {
                assert!(net.node(fin).level() < net.node(id).level());
            }
        }
    }

    #[test]
    fn test_ffr_partition_and2() {
        let net = build_and2();
        // every node belongs to exactly one FFR
        for id in net.node_ids() {
            assert!(net.node(id).ffr().is_some());
        }
        // neither input nor the And gate fans out more than once, so the
        // whole cone collapses into a single FFR rooted at the PPO
        assert_eq!(net.ffrs().len(), 1);
        let ffr = &net.ffrs()[0];
        assert_eq!(ffr.nodes().len(), 4); // PPO + And gate + 2 inputs
        assert!(ffr.inputs().is_empty());
    }

    #[test]
    fn test_reconvergent_fanout_ffr_roots() {
        // a = AND(i0, i1); b = AND(a, i0); out = OR(a, b)
        // `a` fans out twice, so it must be its own FFR root
        let mut bld = TpgNetwork::builder();
        let i0 = bld.add_input();
        let i1 = bld.add_input();
        let a = bld.add_gate(And, &[i0, i1]).unwrap();
        let b = bld.add_gate(And, &[a, i0]).unwrap();
        let o = bld.add_gate(Or, &[a, b]).unwrap();
        bld.add_output(o).unwrap();
        let net = bld.build().unwrap();

        assert!(net.node(a).is_ffr_root());
        for id in net.node_ids() {
            assert!(net.node(id).ffr().is_some());
            if net.node(id).fanout_count() > 1 {
                assert!(net.node(id).is_ffr_root());
            }
        }
    }

    #[test]
    fn test_dff_alt_node() {
        let mut bld = TpgNetwork::builder();
        let d = bld.add_input();
        let q = bld.add_dff(d).unwrap();
        bld.add_output(q).unwrap();
        let net = bld.build().unwrap();
        let dff = net.dffs()[0];
        assert_eq!(net.node(dff.output).alt_node(), Some(dff.input));
    }
}
