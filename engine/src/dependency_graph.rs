//! FILENAME: engine/src/dependency_graph.rs
//! PURPOSE: Tracks which cells feed which formulas and orders recalculation.
//! CONTEXT: The graph keeps both directions of every edge: precedents (the
//! coords a formula reads) and dependents (the reverse lookup). When a cell
//! changes, the transitive dependents are collected and sorted with Kahn's
//! algorithm so each formula recomputes after its inputs. Cells that cannot
//! be ordered are participants in a cycle; they are reported separately so
//! the caller can tokenize them instead of recursing.
//!
//! The write path checks `would_create_cycle` before installing edges, so
//! under normal operation the graph never holds a cycle and `plan.cyclic`
//! stays empty.

use crate::address::CellCoord;
use std::collections::{HashMap, HashSet, VecDeque};

/// The ordered recalculation work produced for one changed cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecalcPlan {
    /// Formula cells to re-evaluate, inputs before consumers.
    /// The changed cell itself is not included.
    pub order: Vec<CellCoord>,
    /// Affected cells that participate in a cycle: excluded from `order`,
    /// to be displayed as the circular-error token.
    pub cyclic: Vec<CellCoord>,
}

/// Incrementally-maintained dependency adjacency between cells.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// coord -> the coords its formula reads.
    precedents: HashMap<CellCoord, HashSet<CellCoord>>,
    /// coord -> the formula coords that read it.
    dependents: HashMap<CellCoord, HashSet<CellCoord>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        DependencyGraph::default()
    }

    /// Replaces the dependency set of a formula cell, updating both
    /// directions of the adjacency. Passing an empty set unhooks the cell.
    pub fn set_dependencies(&mut self, cell: CellCoord, new_precedents: HashSet<CellCoord>) {
        self.clear_dependencies(cell);

        if new_precedents.is_empty() {
            return;
        }
        for &prec in &new_precedents {
            self.dependents.entry(prec).or_default().insert(cell);
        }
        self.precedents.insert(cell, new_precedents);
    }

    /// Removes every edge owned by `cell` (called when a formula is cleared
    /// or replaced by a literal).
    pub fn clear_dependencies(&mut self, cell: CellCoord) {
        if let Some(old) = self.precedents.remove(&cell) {
            for prec in old {
                if let Some(deps) = self.dependents.get_mut(&prec) {
                    deps.remove(&cell);
                    if deps.is_empty() {
                        self.dependents.remove(&prec);
                    }
                }
            }
        }
    }

    /// The coords a formula cell reads, if it has any.
    pub fn precedents_of(&self, cell: CellCoord) -> Option<&HashSet<CellCoord>> {
        self.precedents.get(&cell)
    }

    /// The formula coords reading a given cell, if any.
    pub fn dependents_of(&self, cell: CellCoord) -> Option<&HashSet<CellCoord>> {
        self.dependents.get(&cell)
    }

    /// Would installing these precedents for `cell` close a loop?
    ///
    /// True when `cell` is among its own precedents, or when any proposed
    /// precedent already (transitively) reads `cell`.
    pub fn would_create_cycle(&self, cell: CellCoord, new_precedents: &HashSet<CellCoord>) -> bool {
        if new_precedents.contains(&cell) {
            return true;
        }
        new_precedents.iter().any(|&p| self.reads(p, cell))
    }

    /// DFS along precedent edges: does evaluating `start` read `target`?
    fn reads(&self, start: CellCoord, target: CellCoord) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![start];

        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(precs) = self.precedents.get(&current) {
                stack.extend(precs.iter().copied().filter(|p| !visited.contains(p)));
            }
        }
        false
    }

    /// Plans the recalculation triggered by a change to `changed`: the
    /// transitive dependents in topological order, plus any cycle leftovers.
    pub fn recalc_plan(&self, changed: CellCoord) -> RecalcPlan {
        let affected = self.transitive_dependents(changed);
        if affected.is_empty() {
            return RecalcPlan::default();
        }
        self.sort(&affected)
    }

    /// Plans a full recalculation over every formula cell in the graph,
    /// used for batch import and structural edits.
    pub fn full_recalc_plan(&self) -> RecalcPlan {
        let all: HashSet<CellCoord> = self.precedents.keys().copied().collect();
        if all.is_empty() {
            return RecalcPlan::default();
        }
        self.sort(&all)
    }

    /// BFS over dependent edges, excluding the changed cell itself.
    fn transitive_dependents(&self, cell: CellCoord) -> HashSet<CellCoord> {
        let mut result = HashSet::new();
        let mut queue: VecDeque<CellCoord> = self
            .dependents
            .get(&cell)
            .map(|deps| deps.iter().copied().collect())
            .unwrap_or_default();

        while let Some(current) = queue.pop_front() {
            if !result.insert(current) {
                continue;
            }
            if let Some(deps) = self.dependents.get(&current) {
                queue.extend(deps.iter().copied().filter(|d| !result.contains(d)));
            }
        }
        result
    }

    /// Kahn's algorithm over the induced subgraph. Whatever cannot be
    /// dequeued is part of a cycle and lands in `cyclic`.
    fn sort(&self, cells: &HashSet<CellCoord>) -> RecalcPlan {
        let mut in_degree: HashMap<CellCoord, usize> =
            cells.iter().map(|&c| (c, 0)).collect();

        for &cell in cells {
            if let Some(precs) = self.precedents.get(&cell) {
                let within = precs.iter().filter(|p| cells.contains(p)).count();
                if let Some(deg) = in_degree.get_mut(&cell) {
                    *deg = within;
                }
            }
        }

        let mut queue: VecDeque<CellCoord> = in_degree
            .iter()
            .filter(|(_, &deg)| deg == 0)
            .map(|(&cell, _)| cell)
            .collect();

        let mut order = Vec::with_capacity(cells.len());
        while let Some(cell) = queue.pop_front() {
            order.push(cell);
            if let Some(deps) = self.dependents.get(&cell) {
                for dep in deps {
                    if let Some(deg) = in_degree.get_mut(dep) {
                        *deg -= 1;
                        if *deg == 0 {
                            queue.push_back(*dep);
                        }
                    }
                }
            }
        }

        let mut cyclic: Vec<CellCoord> = in_degree
            .into_iter()
            .filter(|&(_, deg)| deg > 0)
            .map(|(cell, _)| cell)
            .collect();
        cyclic.sort_unstable();

        RecalcPlan { order, cyclic }
    }

    /// Number of formula cells currently tracked.
    pub fn formula_cell_count(&self) -> usize {
        self.precedents.len()
    }

    /// Drops every edge.
    pub fn clear(&mut self) {
        self.precedents.clear();
        self.dependents.clear();
    }
}
