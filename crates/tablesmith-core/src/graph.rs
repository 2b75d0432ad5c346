use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::NormalizedSchema;

/// Summary of the foreign-key graph structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencySummary {
    pub nodes: usize,
    pub edges: usize,
}

/// Report for foreign-key dependency ordering.
///
/// `waves` groups tables that share no dependency on each other: wave one is
/// every table without foreign keys, wave two everything unlocked by wave
/// one, and so on. `topo_order` is the flattened waves. Both are `None` when
/// the graph is cyclic, in which case `cycle` names the tables involved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyReport {
    pub summary: DependencySummary,
    pub waves: Option<Vec<Vec<String>>>,
    pub topo_order: Option<Vec<String>>,
    pub cycle: Option<Vec<String>>,
}

/// Build a deterministic dependency report for a normalized schema.
///
/// Tables referenced by a foreign key but absent from the schema still
/// appear as graph nodes so the ordering stays total; synthesizing a child
/// of such a phantom table fails later with an unresolved-reference error.
pub fn build_dependency_report(schema: &NormalizedSchema) -> DependencyReport {
    let (graph, declaration_index) = build_adjacency(schema);
    let nodes = graph.len();
    let edges = graph.values().map(|targets| targets.len()).sum();
    let summary = DependencySummary { nodes, edges };

    match toposort_waves(&graph, &declaration_index) {
        Ok(waves) => {
            let topo_order = waves.iter().flatten().cloned().collect();
            DependencyReport {
                summary,
                waves: Some(waves),
                topo_order: Some(topo_order),
                cycle: None,
            }
        }
        Err(cycle) => DependencyReport {
            summary,
            waves: None,
            topo_order: None,
            cycle: Some(cycle),
        },
    }
}

/// Order tables so that every foreign-key reference points at an earlier
/// table, or fail with [`Error::CyclicSchema`].
pub fn generation_order(schema: &NormalizedSchema) -> Result<Vec<String>> {
    let report = build_dependency_report(schema);
    report
        .topo_order
        .ok_or_else(|| Error::CyclicSchema(report.cycle.unwrap_or_default()))
}

/// Adjacency (parent -> children) plus a stable ordering index per node.
///
/// The index follows table declaration order; phantom parents referenced but
/// never declared sort after every declared table.
fn build_adjacency(
    schema: &NormalizedSchema,
) -> (BTreeMap<String, BTreeSet<String>>, HashMap<String, usize>) {
    let mut graph: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut declaration_index: HashMap<String, usize> = HashMap::new();
    let mut next_index = 0_usize;

    for table in &schema.tables {
        graph.entry(table.name.clone()).or_default();
        declaration_index.entry(table.name.clone()).or_insert_with(|| {
            let index = next_index;
            next_index += 1;
            index
        });
    }

    for table in &schema.tables {
        for fk in &table.foreign_keys {
            graph.entry(fk.ref_table.clone()).or_default();
            declaration_index
                .entry(fk.ref_table.clone())
                .or_insert_with(|| {
                    let index = next_index;
                    next_index += 1;
                    index
                });
            graph
                .entry(fk.ref_table.clone())
                .or_default()
                .insert(table.name.clone());
        }
    }

    (graph, declaration_index)
}

/// Kahn's algorithm, wave by wave, stable by declaration order.
fn toposort_waves(
    graph: &BTreeMap<String, BTreeSet<String>>,
    declaration_index: &HashMap<String, usize>,
) -> std::result::Result<Vec<Vec<String>>, Vec<String>> {
    let mut indegree: BTreeMap<String, usize> = BTreeMap::new();
    for node in graph.keys() {
        indegree.entry(node.clone()).or_insert(0);
    }
    for targets in graph.values() {
        for target in targets {
            *indegree.entry(target.clone()).or_insert(0) += 1;
        }
    }

    let by_declaration = |names: &mut Vec<String>| {
        names.sort_by_key(|name| declaration_index.get(name).copied().unwrap_or(usize::MAX));
    };

    let mut ready: Vec<String> = indegree
        .iter()
        .filter_map(|(node, count)| (*count == 0).then(|| node.clone()))
        .collect();
    by_declaration(&mut ready);

    let mut waves = Vec::new();
    let mut ordered = 0_usize;

    while !ready.is_empty() {
        let wave = ready;
        ready = Vec::new();

        for node in &wave {
            if let Some(targets) = graph.get(node) {
                for target in targets {
                    if let Some(count) = indegree.get_mut(target) {
                        *count = count.saturating_sub(1);
                        if *count == 0 {
                            ready.push(target.clone());
                        }
                    }
                }
            }
        }
        by_declaration(&mut ready);

        ordered += wave.len();
        waves.push(wave);
    }

    if ordered == graph.len() {
        Ok(waves)
    } else {
        let mut cycle: Vec<String> = indegree
            .into_iter()
            .filter_map(|(node, count)| (count > 0).then_some(node))
            .collect();
        by_declaration(&mut cycle);
        Err(cycle)
    }
}
