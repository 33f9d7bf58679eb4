use std::{collections::VecDeque, hash::Hash};

use crate::HashSet;

/// Generate a shortest paths map on a grid according to a neighbors function.
pub fn dijkstra_map<'a, T, I>(
    mut neighbors: impl FnMut(&T) -> I + 'a,
    starts: impl IntoIterator<Item = T>,
) -> impl Iterator<Item = (T, usize)> + 'a
where
    T: Clone + Eq + Hash + 'a,
    I: IntoIterator<Item = T>,
{
    let mut edge: VecDeque<(T, usize)> =
        starts.into_iter().map(|s| (s, 0)).collect();
    let mut seen = HashSet::default();

    std::iter::from_fn(move || {
        // Candidates are in a queue and consumed first-in, first-out. This
        // should guarantee that the first time a node is popped from the queue
        // it shows the shortest path length from start to that node.

        while let Some((node, len)) = edge.pop_front() {
            if !seen.contains(&node) {
                seen.insert(node.clone());
                for n in neighbors(&node) {
                    edge.push_back((n, len + 1));
                }
                return Some((node, len));
            }
        }
        None
    })
}

/// Breadth-first search for the shortest path to the first node that
/// satisfies `is_goal`.
///
/// The returned path does not include the start node. An empty vec means
/// either that the start node is already a goal or that no goal is
/// reachable, use `Option` returning `pathfinding::prelude::bfs` directly if
/// you need to tell the two apart.
pub fn bfs_path<T, I>(
    start: &T,
    neighbors: impl FnMut(&T) -> I,
    is_goal: impl FnMut(&T) -> bool,
) -> Vec<T>
where
    T: Clone + Eq + Hash,
    I: IntoIterator<Item = T>,
{
    let Some(mut path) = pathfinding::prelude::bfs(start, neighbors, is_goal)
    else {
        return Vec::new();
    };
    path.remove(0);
    path
}
