//! Property-based tests for the lineage core.
//!
//! Record sets are generated with duplicate ids, dangling parents and
//! parent cycles, since the core must accept any input.
//! Run with `ProptestConfig::with_cases(100)`.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::arithmetic_side_effects
)]

use std::collections::HashSet;

use chrono::{Duration, TimeZone, Utc};
use culture_core::kinetics::{
    doubling_time_from_growth_rate, growth_rate, growth_rate_from_doubling_time,
};
use culture_core::lineage::LineageIndex;
use culture_core::{ProcessGraphBuilder, build_process_graph, to_tree};
use culture_types::{OperationType, ProcessId, StateId, StateRecord};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_operation() -> impl Strategy<Value = Option<OperationType>> {
    prop_oneof![
        Just(None),
        Just(Some(OperationType::None)),
        Just(Some(OperationType::Measurement)),
        Just(Some(OperationType::Measurement)),
        Just(Some(OperationType::StartNewCulture)),
        Just(Some(OperationType::Passage)),
        Just(Some(OperationType::Freeze)),
        Just(Some(OperationType::Thaw)),
        Just(Some(OperationType::Split)),
        Just(Some(OperationType::Harvest)),
    ]
}

/// Up to 40 records; ids and parents drawn from overlapping ranges so
/// duplicates, dangling parents and cycles all occur.
fn arb_records() -> impl Strategy<Value = Vec<StateRecord>> {
    proptest::collection::vec(
        (
            0_i64..30,
            proptest::option::of(0_i64..35),
            arb_operation(),
            0_i64..500,
        ),
        0..40,
    )
    .prop_map(|rows| {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        rows.into_iter()
            .map(|(id, parent, operation, hours)| {
                let mut record =
                    StateRecord::new(StateId(id), parent.map(StateId), base + Duration::hours(hours));
                record.operation_type = operation;
                record
            })
            .collect()
    })
}

/// Records that survive id de-duplication.
fn first_seen(records: &[StateRecord]) -> Vec<&StateRecord> {
    let mut seen = HashSet::new();
    records.iter().filter(|r| seen.insert(r.id)).collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: building twice yields identical graphs.
    #[test]
    fn prop_builder_is_deterministic(records in arb_records()) {
        let builder = ProcessGraphBuilder::default();
        prop_assert_eq!(builder.build(&records), builder.build(&records));
    }

    /// Property: traversal terminates and is anchored at the queried record.
    #[test]
    fn prop_traversal_is_cycle_safe(records in arb_records()) {
        let index = LineageIndex::new(&records);
        for record in first_seen(&records) {
            let chain = index.ancestors(record.id);
            prop_assert_eq!(chain.last().map(|r| r.id), Some(record.id));
            prop_assert!(chain.len() <= index.len());
            prop_assert_eq!(index.generation(record.id), Some(chain.len() - 1));

            let below = index.descendants(record.id);
            prop_assert_eq!(below.first().map(|r| r.id), Some(record.id));
            let unique: HashSet<StateId> = below.iter().map(|r| r.id).collect();
            prop_assert_eq!(unique.len(), below.len());
        }
    }

    /// Property: a parentless process start is always a graph root.
    #[test]
    fn prop_parentless_operation_is_root(records in arb_records()) {
        let graph = build_process_graph(&records, None);
        for record in first_seen(&records) {
            if record.parent_id.is_none() && record.is_process_start() {
                let node = graph.node(ProcessId::from(record.id));
                prop_assert!(node.is_some());
                prop_assert_eq!(node.and_then(|n| n.parent_process_id), None);
            }
        }
    }

    /// Property: edges reference existing nodes and each measurement is
    /// attached at most once.
    #[test]
    fn prop_graph_is_well_formed(records in arb_records()) {
        let graph = build_process_graph(&records, None);
        let ids: HashSet<ProcessId> = graph.nodes.iter().map(|n| n.id).collect();
        prop_assert_eq!(ids.len(), graph.nodes.len());
        for edge in &graph.edges {
            prop_assert!(ids.contains(&edge.source_process_id));
            prop_assert!(ids.contains(&edge.target_process_id));
        }

        let mut attached = HashSet::new();
        for node in &graph.nodes {
            for measurement in &node.measurements {
                prop_assert!(attached.insert(measurement.id));
            }
        }

        // The tree export reaches every node exactly once.
        let mut stack = vec![to_tree(&graph)];
        let mut reached = 0_usize;
        while let Some(tree) = stack.pop() {
            if tree.process.is_some() {
                reached += 1;
            }
            stack.extend(tree.children);
        }
        prop_assert_eq!(reached, graph.nodes.len());
    }

    /// Property: growth rate never decreases as the final density grows.
    #[test]
    fn prop_growth_rate_is_monotonic(
        initial in 1.0_f64..1e6,
        lower_factor in 1.001_f64..50.0,
        extra in 0.0_f64..50.0,
        hours in 0.5_f64..500.0,
    ) {
        let lower = initial * lower_factor;
        let higher = lower * (1.0 + extra);
        let slow = growth_rate(initial, lower, hours).unwrap();
        let fast = growth_rate(initial, higher, hours).unwrap();
        prop_assert!(fast >= slow);
    }

    /// Property: rate -> doubling time -> rate round-trips.
    #[test]
    fn prop_duality_round_trips(rate in 1e-6_f64..10.0) {
        let back = growth_rate_from_doubling_time(doubling_time_from_growth_rate(rate));
        prop_assert!(((back - rate) / rate).abs() < 1e-12);
    }
}
