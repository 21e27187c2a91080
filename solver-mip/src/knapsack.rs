//! Standalone 0/1-knapsack branch-and-bound.
//!
//! Takes a maximisation model whose first constraint is the `<=` capacity
//! row: weights are its coefficients, profits the objective costs, and the
//! capacity is the floor of its right-hand side. Items are enumerated
//! depth-first in decreasing profit/weight order, include branch before
//! exclude branch, with a greedy fractional upper bound for pruning.

use solver_core::{Model, Relation, Sense};

use crate::error::{MipError, MipResult};
use crate::settings::MipSettings;

/// One knapsack item, in sorted order.
#[derive(Debug, Clone)]
pub struct KnapsackItem {
    /// Position in the parsed model (0-based).
    pub index: usize,

    /// Weight from the capacity row.
    pub weight: f64,

    /// Profit from the objective.
    pub profit: f64,

    /// Profit per unit weight.
    pub ratio: f64,
}

/// Audit record of one visited enumeration node.
#[derive(Debug, Clone)]
pub struct KnapsackNode {
    /// Node identifier in visit order.
    pub id: usize,

    /// Next item position (in sorted order) to decide.
    pub level: usize,

    /// Profit accumulated so far.
    pub profit: f64,

    /// Weight accumulated so far.
    pub weight: f64,

    /// Greedy fractional upper bound for this subtree.
    pub bound: f64,

    /// Items taken so far, as 1-based original indices.
    pub taken: Vec<usize>,

    /// Whether the bound failed to beat the best profit and the subtree
    /// was pruned.
    pub pruned: bool,
}

/// Result of a knapsack solve.
#[derive(Debug, Clone)]
pub struct KnapsackSolution {
    /// Best profit found.
    pub best_profit: f64,

    /// Items in the best set, as sorted 1-based original indices.
    pub items: Vec<usize>,

    /// Capacity used (floor of the first constraint's RHS).
    pub capacity: f64,

    /// Every visited node, in visit order.
    pub nodes: Vec<KnapsackNode>,
}

/// 0/1-knapsack branch-and-bound solver.
pub struct KnapsackSolver {
    settings: MipSettings,
}

struct Search {
    items: Vec<KnapsackItem>,
    capacity: f64,
    best_profit: f64,
    best_taken: Vec<usize>,
    nodes: Vec<KnapsackNode>,
    verbose: bool,
}

impl KnapsackSolver {
    /// Create a solver with the given settings.
    pub fn new(settings: MipSettings) -> Self {
        Self { settings }
    }

    /// Solve the knapsack encoded by `model`.
    pub fn solve(&self, model: &Model) -> MipResult<KnapsackSolution> {
        model
            .validate()
            .map_err(|e| MipError::InvalidProblem(e.to_string()))?;
        if model.sense != Sense::Maximize {
            return Err(MipError::Domain(
                "knapsack requires a maximisation objective".into(),
            ));
        }
        let capacity_row = model
            .constraints
            .first()
            .ok_or_else(|| MipError::Domain("knapsack requires a capacity constraint".into()))?;
        if capacity_row.relation != Relation::Le {
            return Err(MipError::Domain(
                "knapsack capacity row must be a <= constraint".into(),
            ));
        }
        let capacity = capacity_row.rhs.floor();

        let mut items: Vec<KnapsackItem> = capacity_row
            .coeffs
            .iter()
            .zip(&model.costs)
            .enumerate()
            .map(|(index, (&weight, &profit))| KnapsackItem {
                index,
                weight,
                profit,
                ratio: profit / weight,
            })
            .collect();
        if items.iter().any(|it| it.weight <= 0.0) {
            return Err(MipError::Domain("knapsack weights must be positive".into()));
        }
        items.sort_by(|a, b| b.ratio.partial_cmp(&a.ratio).expect("ratios are comparable"));

        let mut search = Search {
            items,
            capacity,
            best_profit: 0.0,
            best_taken: Vec::new(),
            nodes: Vec::new(),
            verbose: self.settings.verbose,
        };
        let mut taken = Vec::new();
        search.explore(0, 0.0, 0.0, &mut taken);

        let mut best_items: Vec<usize> = search
            .best_taken
            .iter()
            .map(|&pos| search.items[pos].index + 1)
            .collect();
        best_items.sort_unstable();

        Ok(KnapsackSolution {
            best_profit: search.best_profit,
            items: best_items,
            capacity,
            nodes: search.nodes,
        })
    }
}

impl Search {
    /// DFS over include/exclude decisions for the item at `level`.
    fn explore(&mut self, level: usize, profit: f64, weight: f64, taken: &mut Vec<usize>) {
        let bound = self.fractional_bound(level, profit, weight);
        let pruned = bound <= self.best_profit;
        let id = self.nodes.len();
        let taken_original = self.to_original(taken);
        self.nodes.push(KnapsackNode {
            id,
            level,
            profit,
            weight,
            bound,
            taken: taken_original,
            pruned,
        });
        if pruned || level == self.items.len() {
            return;
        }

        let (item_weight, item_profit) = {
            let item = &self.items[level];
            (item.weight, item.profit)
        };

        // Include branch first.
        if weight + item_weight <= self.capacity {
            taken.push(level);
            if profit + item_profit > self.best_profit {
                self.best_profit = profit + item_profit;
                self.best_taken = taken.clone();
                if self.verbose {
                    log::info!("node {}: new best profit {:.3}", id, self.best_profit);
                }
            }
            self.explore(level + 1, profit + item_profit, weight + item_weight, taken);
            taken.pop();
        }

        // Exclude branch.
        self.explore(level + 1, profit, weight, taken);
    }

    /// Greedy fill of the remaining capacity, topped up with a fractional
    /// share of the first item that no longer fits.
    fn fractional_bound(&self, level: usize, profit: f64, weight: f64) -> f64 {
        let mut room = self.capacity - weight;
        let mut bound = profit;
        for item in &self.items[level..] {
            if item.weight <= room {
                room -= item.weight;
                bound += item.profit;
            } else {
                bound += item.ratio * room;
                break;
            }
        }
        bound
    }

    /// Sorted-order positions to 1-based original indices.
    fn to_original(&self, positions: &[usize]) -> Vec<usize> {
        positions
            .iter()
            .map(|&pos| self.items[pos].index + 1)
            .collect()
    }
}
