//! Module for creating and analysing the dependency graph of a system-of-systems model
use crate::dependency::RelativeTimestep;
use crate::error::{SosError, not_found_bail};
use crate::id::ModelID;
use crate::model::SosModel;
use anyhow::Result;
use petgraph::Directed;
use petgraph::algo::toposort;
use petgraph::graph::{Graph, NodeIndex};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// A graph of the models in a system-of-systems model.
///
/// There is an edge from model A to model B if B has a dependency on the output of A for the
/// current timestep.
pub type DependencyGraph = Graph<ModelID, (), Directed>;

/// Create the dependency graph for the models contained in `sos`.
///
/// Nodes are added in the order the models were added to `sos`, so a node's index is the same as
/// its model's index. Dependencies on the previous timestep read prior state, so they don't
/// constrain the order of the models within a timestep and are not included.
pub fn create_dependency_graph(sos: &SosModel) -> Result<DependencyGraph> {
    let mut graph = Graph::new();
    for name in sos.models().keys() {
        graph.add_node(name.clone());
    }

    for (sink_index, model) in sos.models().values().enumerate() {
        for dependency in model.dependencies().values().flatten() {
            let Some(source_index) = sos.models().get_index_of(&dependency.source_model) else {
                not_found_bail!(
                    "Source model '{}' of {dependency} is not part of '{}'",
                    dependency.source_model,
                    sos.name()
                );
            };

            if dependency.timestep == RelativeTimestep::Current {
                graph.add_edge(NodeIndex::new(source_index), NodeIndex::new(sink_index), ());
            }
        }
    }

    Ok(graph)
}

/// Check that the graph has no cycles.
///
/// A model which depends on its own output for the current timestep counts as a cycle.
fn check_for_cycles(graph: &DependencyGraph, sos_name: &ModelID) -> Result<()> {
    toposort(graph, None).map_err(|cycle| {
        SosError::Configuration(format!(
            "Cycle detected in dependencies of '{sos_name}' for model {}",
            graph[cycle.node_id()]
        ))
    })?;

    Ok(())
}

/// Topologically sort the graph, preferring models which were added earlier.
///
/// The graph must not contain cycles.
fn stable_topo_sort(graph: &DependencyGraph) -> Vec<ModelID> {
    let mut in_degree: Vec<usize> = graph
        .node_indices()
        .map(|node| {
            graph
                .neighbors_directed(node, petgraph::Incoming)
                .count()
        })
        .collect();

    // Min-heap of models whose sources have all been visited
    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(index, _)| Reverse(index))
        .collect();

    let mut order = Vec::with_capacity(graph.node_count());
    while let Some(Reverse(index)) = ready.pop() {
        let node = NodeIndex::new(index);
        order.push(graph[node].clone());
        for sink in graph.neighbors_directed(node, petgraph::Outgoing) {
            let degree = &mut in_degree[sink.index()];
            *degree -= 1;
            if *degree == 0 {
                ready.push(Reverse(sink.index()));
            }
        }
    }

    order
}

/// The order in which to simulate the models contained in `sos`.
///
/// Each model comes after all the models it depends on for the current timestep. Otherwise, the
/// models are kept in the order they were added.
///
/// # Returns
///
/// The names of the models in simulation order, or an error if their dependencies for the current
/// timestep contain a cycle or refer to a model which is not part of `sos`.
pub fn evaluation_order(sos: &SosModel) -> Result<Vec<ModelID>> {
    let graph = create_dependency_graph(sos)?;
    check_for_cycles(&graph, sos.name())?;

    Ok(stable_topo_sort(&graph))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_kind;
    use crate::fixture::{assert_error, identity_model};
    use crate::model::Model;
    use crate::port::PortSpec;
    use itertools::assert_equal;
    use rstest::{fixture, rstest};

    /// A model with one input and one output, both called "x"
    fn passthrough(name: &str) -> Model {
        identity_model(name, vec![PortSpec::new("x")], vec![PortSpec::new("x")])
    }

    #[fixture]
    fn sos() -> SosModel {
        let mut sos = SosModel::new("sos");
        for name in ["a", "b", "c"] {
            sos.add_model(passthrough(name)).unwrap();
        }
        sos
    }

    fn order_names(sos: &SosModel) -> Vec<String> {
        evaluation_order(sos)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[rstest]
    fn test_no_dependencies_keeps_insertion_order(sos: SosModel) {
        assert_equal(order_names(&sos), ["a", "b", "c"]);
    }

    #[rstest]
    fn test_linear_graph(mut sos: SosModel) {
        // c -> b -> a
        sos.add_dependency("c", "x", "b", "x", RelativeTimestep::Current)
            .unwrap();
        sos.add_dependency("b", "x", "a", "x", RelativeTimestep::Current)
            .unwrap();
        assert_equal(order_names(&sos), ["c", "b", "a"]);
    }

    #[rstest]
    fn test_unconstrained_models_keep_insertion_order(mut sos: SosModel) {
        // Only b must come after c; a is unconstrained and stays first
        sos.add_dependency("c", "x", "b", "x", RelativeTimestep::Current)
            .unwrap();
        assert_equal(order_names(&sos), ["a", "c", "b"]);
    }

    #[rstest]
    fn test_previous_dependencies_do_not_constrain_order(mut sos: SosModel) {
        sos.add_dependency("c", "x", "a", "x", RelativeTimestep::Previous)
            .unwrap();
        sos.add_dependency("a", "x", "c", "x", RelativeTimestep::Current)
            .unwrap();
        assert_equal(order_names(&sos), ["a", "b", "c"]);
    }

    #[rstest]
    fn test_previous_self_dependency(mut sos: SosModel) {
        sos.add_dependency("a", "x", "a", "x", RelativeTimestep::Previous)
            .unwrap();
        assert_equal(order_names(&sos), ["a", "b", "c"]);
    }

    #[rstest]
    fn test_cyclic_graph(mut sos: SosModel) {
        sos.add_dependency("a", "x", "b", "x", RelativeTimestep::Current)
            .unwrap();
        sos.add_dependency("b", "x", "a", "x", RelativeTimestep::Current)
            .unwrap();
        let err = evaluation_order(&sos).unwrap_err();
        assert!(matches!(
            error_kind(&err),
            Some(SosError::Configuration(msg)) if msg.starts_with("Cycle detected in dependencies of 'sos'")
        ));
    }

    #[rstest]
    fn test_current_self_dependency(mut sos: SosModel) {
        sos.add_dependency("b", "x", "b", "x", RelativeTimestep::Current)
            .unwrap();
        assert_error!(
            evaluation_order(&sos),
            "Cycle detected in dependencies of 'sos' for model b"
        );
    }

    #[rstest]
    fn test_source_not_in_sos(mut sos: SosModel) {
        let outsider = passthrough("outsider");
        let mut sink = passthrough("d");
        sink.add_dependency(&outsider, "x", "x", RelativeTimestep::Current)
            .unwrap();
        sos.add_model(sink).unwrap();

        let err = evaluation_order(&sos).unwrap_err();
        assert!(matches!(error_kind(&err), Some(SosError::NotFound(_))));
    }
}
