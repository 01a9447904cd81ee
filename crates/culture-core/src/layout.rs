//! Deterministic coordinates for process graph nodes.
//!
//! A node's rank is its depth in the parent-process chain. Within a rank,
//! nodes take consecutive slots in node order. The same node list always
//! yields the same coordinates.

use std::collections::{BTreeMap, HashMap, HashSet};

use culture_types::{Position, ProcessId, ProcessNode};

use crate::config::LayoutConfig;

/// Depth of every node in its parent-process chain, in node order.
///
/// Links to processes absent from `nodes` end the chain. Nodes on a parent
/// cycle all take the cycle length minus one. Each node is walked once; a
/// walk stops at the first node already ranked.
pub fn ranks(nodes: &[ProcessNode]) -> Vec<u32> {
    let positions: HashMap<ProcessId, usize> = nodes
        .iter()
        .enumerate()
        .map(|(pos, node)| (node.id, pos))
        .collect();
    let parent_of = |pos: usize| {
        nodes
            .get(pos)
            .and_then(|node| node.parent_process_id)
            .and_then(|parent| positions.get(&parent).copied())
    };

    let mut ranks: Vec<Option<u32>> = vec![None; nodes.len()];
    for start in 0..nodes.len() {
        let mut path: Vec<usize> = Vec::new();
        let mut on_path: HashSet<usize> = HashSet::new();
        let mut above: Option<u32> = None;
        let mut cursor = Some(start);

        while let Some(pos) = cursor {
            if let Some(rank) = ranks.get(pos).copied().flatten() {
                above = Some(rank);
                break;
            }
            if !on_path.insert(pos) {
                let entry = path.iter().position(|p| *p == pos).unwrap_or_default();
                let cycle = path.split_off(entry);
                let rank = u32::try_from(cycle.len())
                    .unwrap_or(u32::MAX)
                    .saturating_sub(1);
                for member in cycle {
                    if let Some(slot) = ranks.get_mut(member) {
                        *slot = Some(rank);
                    }
                }
                above = Some(rank);
                break;
            }
            path.push(pos);
            cursor = parent_of(pos);
        }

        for pos in path.into_iter().rev() {
            let rank = above.map_or(0, |parent| parent.saturating_add(1));
            if let Some(slot) = ranks.get_mut(pos) {
                *slot = Some(rank);
            }
            above = Some(rank);
        }
    }

    ranks.into_iter().map(Option::unwrap_or_default).collect()
}

/// Coordinates of a slot in a rank.
pub fn position_for(rank: u32, slot: u32, config: &LayoutConfig) -> Position {
    Position {
        x: f64::from(rank).mul_add(config.rank_spacing, config.origin_x),
        y: f64::from(slot).mul_add(config.row_spacing, config.origin_y),
    }
}

/// Overwrite every node's position.
pub fn assign_positions(nodes: &mut [ProcessNode], config: &LayoutConfig) {
    let ranks = ranks(nodes);
    let mut next_slot: BTreeMap<u32, u32> = BTreeMap::new();
    for (node, rank) in nodes.iter_mut().zip(ranks) {
        let slot = next_slot.entry(rank).or_insert(0);
        node.position = position_for(rank, *slot, config);
        *slot = slot.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use culture_types::{OperationType, ProcessStatus, StateId, StateRecord};

    use super::*;

    fn node(id: i64, parent: Option<i64>) -> ProcessNode {
        let timestamp = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_default();
        ProcessNode {
            id: ProcessId(id),
            start_state: StateRecord::new(StateId(id), None, timestamp)
                .with_operation(OperationType::Passage),
            end_state: None,
            status: ProcessStatus::Open,
            measurements: Vec::new(),
            position: Position::default(),
            parent_process_id: parent.map(ProcessId),
            successor_count: 0,
            selected: false,
        }
    }

    #[test]
    fn ranks_follow_parent_chain() {
        let nodes = vec![node(1, None), node(2, Some(1)), node(3, Some(2)), node(4, Some(1))];
        assert_eq!(ranks(&nodes), vec![0, 1, 2, 1]);
    }

    #[test]
    fn unknown_parent_ends_chain() {
        let nodes = vec![node(5, Some(99))];
        assert_eq!(ranks(&nodes), vec![0]);
    }

    #[test]
    fn cyclic_parents_terminate() {
        let nodes = vec![node(1, Some(2)), node(2, Some(1))];
        assert_eq!(ranks(&nodes), vec![1, 1]);
    }

    #[test]
    fn chain_into_cycle_counts_from_the_cycle() {
        let nodes = vec![node(3, Some(1)), node(1, Some(2)), node(2, Some(1)), node(4, Some(4))];
        assert_eq!(ranks(&nodes), vec![2, 1, 1, 0]);
    }

    #[test]
    fn long_chain_ranks_by_depth() {
        let nodes: Vec<ProcessNode> = (0..5_000_i64)
            .map(|id| node(id, id.checked_sub(1)))
            .collect();
        let ranks = ranks(&nodes);
        assert_eq!(ranks.first().copied(), Some(0));
        assert_eq!(ranks.last().copied(), Some(4_999));
    }

    #[test]
    fn slots_fill_in_node_order() {
        let config = LayoutConfig::default();
        let mut nodes = vec![node(1, None), node(2, Some(1)), node(3, None), node(4, Some(1))];
        assign_positions(&mut nodes, &config);

        let coords: Vec<(f64, f64)> = nodes.iter().map(|n| (n.position.x, n.position.y)).collect();
        assert_eq!(
            coords,
            vec![(0.0, 0.0), (250.0, 0.0), (0.0, 100.0), (250.0, 100.0)]
        );
    }

    #[test]
    fn origin_offsets_apply() {
        let config = LayoutConfig {
            rank_spacing: 10.0,
            row_spacing: 5.0,
            origin_x: 1.0,
            origin_y: 2.0,
        };
        let position = position_for(2, 3, &config);
        assert!((position.x - 21.0).abs() < f64::EPSILON);
        assert!((position.y - 17.0).abs() < f64::EPSILON);
    }
}
