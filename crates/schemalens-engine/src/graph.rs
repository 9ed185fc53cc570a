//! Table relationship graph
//!
//! Nodes are the tables of a catalog and edges are foreign keys, pointing from
//! the referencing (child) table to the referenced (parent) table. Foreign keys
//! from a table to itself are not edges.

use schemalens_catalog::{Catalog, NamedObject, NamedObjectKey, Table};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Which way to follow foreign keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards referenced tables
    Parents,

    /// Towards referencing tables
    Children,
}

/// Decides whether a relationship may be followed when widening a table
/// selection
///
/// Implemented for closures taking the referencing and the referenced table.
pub trait TableRelationshipRule {
    fn test(&self, referencing: &Table, referenced: &Table) -> bool;
}

impl<F> TableRelationshipRule for F
where
    F: Fn(&Table, &Table) -> bool,
{
    fn test(&self, referencing: &Table, referenced: &Table) -> bool {
        self(referencing, referenced)
    }
}

/// Directed graph of foreign key relationships between tables
#[derive(Debug, Clone, Default)]
pub struct TableGraph {
    /// Forward edges: table -> tables it references
    parents: BTreeMap<NamedObjectKey, BTreeSet<NamedObjectKey>>,

    /// Reverse edges: table -> tables referencing it
    children: BTreeMap<NamedObjectKey, BTreeSet<NamedObjectKey>>,

    nodes: BTreeSet<NamedObjectKey>,
}

impl TableGraph {
    /// Build the graph of every table in the catalog
    ///
    /// Edges to tables that are not in the catalog are dropped.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self::from_tables(catalog.tables())
    }

    /// Build the graph of the given tables only
    ///
    /// Foreign keys to any other table are not edges.
    pub fn from_tables<'a>(tables: impl IntoIterator<Item = &'a Table>) -> Self {
        let tables: Vec<&Table> = tables.into_iter().collect();
        let mut graph = Self::default();
        for table in &tables {
            graph.nodes.insert(table.key());
        }

        for table in &tables {
            let child = table.key();
            for foreign_key in table.imported_foreign_keys() {
                let parent = foreign_key.primary_key_table();
                if parent == &child || !graph.nodes.contains(parent) {
                    continue;
                }
                graph.add_edge(child.clone(), parent.clone());
            }
        }
        graph
    }

    fn add_edge(&mut self, child: NamedObjectKey, parent: NamedObjectKey) {
        self.children
            .entry(parent.clone())
            .or_default()
            .insert(child.clone());
        self.parents.entry(child).or_default().insert(parent);
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NamedObjectKey> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.parents.values().map(BTreeSet::len).sum()
    }

    /// Tables directly referenced by `table`
    pub fn parents(&self, table: &NamedObjectKey) -> impl Iterator<Item = &NamedObjectKey> {
        self.parents.get(table).into_iter().flatten()
    }

    /// Tables directly referencing `table`
    pub fn children(&self, table: &NamedObjectKey) -> impl Iterator<Item = &NamedObjectKey> {
        self.children.get(table).into_iter().flatten()
    }

    fn neighbours(&self, table: &NamedObjectKey, direction: Direction) -> impl Iterator<Item = &NamedObjectKey> {
        let edges = match direction {
            Direction::Parents => &self.parents,
            Direction::Children => &self.children,
        };
        edges.get(table).into_iter().flatten()
    }

    /// Tables reachable from `start` in at most `depth` hops
    ///
    /// `follow` is asked about every hop as `(from, to)`; a refused hop is not
    /// taken. The start tables are part of the result.
    pub fn reachable(
        &self,
        start: &BTreeSet<NamedObjectKey>,
        direction: Direction,
        depth: usize,
        mut follow: impl FnMut(&NamedObjectKey, &NamedObjectKey) -> bool,
    ) -> BTreeSet<NamedObjectKey> {
        let mut visited: BTreeSet<NamedObjectKey> = start.clone();
        let mut queue: VecDeque<(NamedObjectKey, usize)> = start.iter().map(|key| (key.clone(), 0)).collect();

        // BFS, so every table is first reached by its shortest path
        while let Some((current, distance)) = queue.pop_front() {
            if distance >= depth {
                continue;
            }
            for next in self.neighbours(&current, direction) {
                if visited.contains(next) || !follow(&current, next) {
                    continue;
                }
                visited.insert(next.clone());
                queue.push_back((next.clone(), distance + 1));
            }
        }
        visited
    }

    /// Strongly connected components, found with Tarjan's algorithm
    ///
    /// Components come out in reverse topological order of the condensed
    /// graph. Every node is in exactly one component.
    pub fn strongly_connected_components(&self) -> Vec<Vec<NamedObjectKey>> {
        let nodes: Vec<&NamedObjectKey> = self.nodes.iter().collect();
        let position: BTreeMap<&NamedObjectKey, usize> = nodes.iter().enumerate().map(|(i, key)| (*key, i)).collect();
        let edges: Vec<Vec<usize>> = nodes
            .iter()
            .map(|key| {
                self.parents(key)
                    .filter_map(|parent| position.get(parent).copied())
                    .collect()
            })
            .collect();

        let count = nodes.len();
        let mut index: Vec<Option<usize>> = vec![None; count];
        let mut lowlink = vec![0; count];
        let mut on_stack = vec![false; count];
        let mut stack: Vec<usize> = Vec::new();
        let mut next_index = 0;
        let mut components = Vec::new();

        for root in 0..count {
            if index[root].is_some() {
                continue;
            }

            index[root] = Some(next_index);
            lowlink[root] = next_index;
            next_index += 1;
            stack.push(root);
            on_stack[root] = true;

            // Explicit call stack of (node, next edge to visit)
            let mut calls: Vec<(usize, usize)> = vec![(root, 0)];
            while let Some(frame) = calls.last_mut() {
                let node = frame.0;
                if frame.1 < edges[node].len() {
                    let next = edges[node][frame.1];
                    frame.1 += 1;
                    match index[next] {
                        None => {
                            index[next] = Some(next_index);
                            lowlink[next] = next_index;
                            next_index += 1;
                            stack.push(next);
                            on_stack[next] = true;
                            calls.push((next, 0));
                        }
                        Some(visited) if on_stack[next] => {
                            lowlink[node] = lowlink[node].min(visited);
                        }
                        Some(_) => {}
                    }
                    continue;
                }

                calls.pop();
                if let Some(&(caller, _)) = calls.last() {
                    lowlink[caller] = lowlink[caller].min(lowlink[node]);
                }
                if index[node] == Some(lowlink[node]) {
                    let mut component = Vec::new();
                    while let Some(member) = stack.pop() {
                        on_stack[member] = false;
                        component.push(nodes[member].clone());
                        if member == node {
                            break;
                        }
                    }
                    components.push(component);
                }
            }
        }
        components
    }

    /// Every cycle, as the members of each strongly connected component with
    /// more than one table
    ///
    /// Members are sorted by full name and cycles by their first member, so the
    /// result does not depend on traversal order.
    pub fn cycles(&self) -> Vec<Vec<NamedObjectKey>> {
        let mut cycles: Vec<Vec<NamedObjectKey>> = self
            .strongly_connected_components()
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|mut component| {
                component.sort_by_key(|key| key.to_string());
                component
            })
            .collect();
        cycles.sort_by_key(|cycle| cycle.first().map(|key| key.to_string()));
        cycles
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles().is_empty()
    }
}
