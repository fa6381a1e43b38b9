//! Exact tour optimization (Held-Karp)
//!
//! Dynamic program over remaining-node subsets: `dist(i, S)` is the
//! cost of starting at node `i`, visiting every node in `S` exactly
//! once and returning to node 0. Node 0 is the fixed origin. The memo
//! lives inside one `solve` call, so the solver is reentrant and
//! repeated solves cannot contaminate each other.
//!
//! Exponential in the matrix size; callers keep the number of
//! simultaneously compared waypoints small.

use std::collections::HashMap;

use nalgebra::DMatrix;

/// Best tour found for one cost matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourResult {
    /// Visiting order over matrix indices, starting at node 0.
    pub order: Vec<usize>,
    pub best_distance: i64,
}

type Memo = HashMap<(usize, u64), (i64, usize)>;

/// Solve the tour over an n x n cost matrix with node 0 as origin.
pub fn solve(matrix: &DMatrix<i64>) -> TourResult {
    let n = matrix.nrows();
    let mut memo: Memo = Memo::new();
    let full: u64 = if n <= 1 { 0 } else { ((1u64 << n) - 1) & !1 };

    let best_distance = dist(matrix, 0, full, &mut memo);

    let mut order = vec![0];
    let mut node = 0;
    let mut remaining = full;
    while remaining != 0 {
        match memo.get(&(node, remaining)) {
            Some(&(_, next)) => {
                order.push(next);
                remaining &= !(1u64 << next);
                node = next;
            }
            None => break,
        }
    }

    TourResult {
        order,
        best_distance,
    }
}

fn dist(matrix: &DMatrix<i64>, node: usize, remaining: u64, memo: &mut Memo) -> i64 {
    if remaining == 0 {
        return matrix[(node, 0)];
    }
    if let Some(&(cost, _)) = memo.get(&(node, remaining)) {
        return cost;
    }

    let mut best = i64::MAX;
    let mut best_next = 0;
    let mut rest = remaining;
    while rest != 0 {
        let next = rest.trailing_zeros() as usize;
        rest &= rest - 1;
        let candidate = matrix[(node, next)]
            .saturating_add(dist(matrix, next, remaining & !(1u64 << next), memo));
        if candidate < best {
            best = candidate;
            best_next = next;
        }
    }

    memo.insert((node, remaining), (best, best_next));
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tour_cost(matrix: &DMatrix<i64>, order: &[usize]) -> i64 {
        let mut cost = 0;
        for pair in order.windows(2) {
            cost += matrix[(pair[0], pair[1])];
        }
        cost + matrix[(order[order.len() - 1], 0)]
    }

    #[test]
    fn test_four_node_matrix() {
        let matrix = DMatrix::from_row_slice(4, 4, &[
            0, 5, 4, 10, //
            5, 0, 8, 5, //
            4, 8, 0, 3, //
            10, 5, 3, 0,
        ]);
        let result = solve(&matrix);
        // Optimal closed tour: 0 -> 1 -> 3 -> 2 -> 0 (or its reverse).
        assert_eq!(result.best_distance, 17);
        assert_eq!(result.order.len(), 4);
        assert_eq!(result.order[0], 0);
        let mut sorted = result.order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
        assert_eq!(tour_cost(&matrix, &result.order), result.best_distance);
    }

    #[test]
    fn test_single_node() {
        let matrix = DMatrix::from_element(1, 1, 0i64);
        let result = solve(&matrix);
        assert_eq!(result.best_distance, 0);
        assert_eq!(result.order, vec![0]);
    }

    #[test]
    fn test_two_nodes() {
        let matrix = DMatrix::from_row_slice(2, 2, &[0, 7, 3, 0]);
        let result = solve(&matrix);
        assert_eq!(result.best_distance, 10);
        assert_eq!(result.order, vec![0, 1]);
    }

    #[test]
    fn test_sentinel_edges_are_avoided() {
        const INF: i64 = 0x7FFF_FFFF;
        // Going 0 -> 2 directly is blocked; the tour must route through 1.
        let matrix = DMatrix::from_row_slice(3, 3, &[
            0, 1, INF, //
            0, 0, 1, //
            0, INF, 0,
        ]);
        let result = solve(&matrix);
        assert_eq!(result.order, vec![0, 1, 2]);
        assert_eq!(result.best_distance, 2);
    }
}
