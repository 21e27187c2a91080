//! Plain-text and JSON rendering of solver output.
//!
//! Tableau cells are printed in fixed 10-character columns with three
//! decimals; every block is plain UTF-8 meant for humans, not machines.
//! The JSON summaries are the machine-readable counterpart.

use std::fmt::Write as _;

use serde::Serialize;
use solver_core::{
    CanonicalModel, LpStatus, RevisedEntry, SensitivityReport, Solution, SolveLog,
};
use solver_mip::{KnapsackSolution, MipSolution, NodeRecord, NodeStatus};

const CELL: usize = 10;

fn cell(value: f64) -> String {
    format!("{:>width$.3}", value, width = CELL)
}

fn vector(values: impl Iterator<Item = f64>) -> String {
    let mut out = String::from("[");
    for v in values {
        out.push_str(&cell(v));
    }
    out.push_str(" ]");
    out
}

fn range_side(value: f64) -> String {
    if value.is_infinite() {
        "inf".to_string()
    } else {
        format!("{:.3}", value)
    }
}

/// Canonical-form preamble block.
pub fn canonical_preamble(canon: &CanonicalModel) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Canonical form: {} rows, {} columns ({} decision, {} slack, {} artificial)",
        canon.num_rows(),
        canon.num_cols(),
        canon.n_decision,
        canon.n_slack,
        canon.n_artificial
    );
    let _ = writeln!(out, "Columns: {}", canon.names.join(" "));
    if canon.n_artificial > 0 {
        let _ = writeln!(out, "Big-M: {:.3e}", canon.big_m);
    }
    out
}

/// Per-iteration tableau blocks with entering/leaving annotations, followed
/// by the final report.
pub fn tableau_report(log: &SolveLog) -> String {
    let mut out = String::new();
    for (k, tableau) in log.tableaus.iter().enumerate() {
        if k > 0 {
            let entering = log.enterings[k - 1];
            let leaving = log.leavings[k - 1];
            let left = log.bases[k - 1][leaving];
            let _ = writeln!(
                out,
                "--> {} enters, row {} ({}) leaves",
                log.names[entering], leaving, log.names[left]
            );
        }
        let _ = writeln!(out, "Iteration {}", k);

        let mut header = String::from("        ");
        for name in &log.names {
            let _ = write!(header, "{:>width$}", name, width = CELL);
        }
        let _ = write!(header, "{:>width$}", "RHS", width = CELL);
        let _ = writeln!(out, "{}", header);
        let _ = writeln!(out, "{}", "-".repeat(header.len()));

        let basis = &log.bases[k];
        for i in 0..log.num_rows {
            let mut row = format!("xB {:<5}", log.names[basis[i]]);
            for j in 0..=log.num_cols {
                row.push_str(&cell(tableau[(i, j)]));
            }
            let _ = writeln!(out, "{}", row);
        }
        let mut z_row = String::from("z       ");
        for j in 0..=log.num_cols {
            z_row.push_str(&cell(tableau[(log.num_rows, j)]));
        }
        let _ = writeln!(out, "{}", z_row);
        out.push('\n');
    }
    out.push_str(&solution_report(&log.final_solution()));
    out
}

/// Final report block: objective and each decision value.
pub fn solution_report(solution: &Solution) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Objective z = {:.3}", solution.objective);
    for (name, value) in solution.names.iter().zip(&solution.values) {
        let _ = writeln!(out, "{} = {:.3}", name, value);
    }
    out
}

/// Interleaved Price-Out / Product-Form blocks with the status footer.
pub fn revised_report(log: &SolveLog) -> String {
    let mut out = String::new();
    for entry in &log.revised {
        match entry {
            RevisedEntry::PriceOut(p) => {
                let _ = writeln!(out, "[Price-Out]");
                let _ = writeln!(out, "  y = {}", vector(p.y.iter().copied()));
                let _ = writeln!(out, "  r = {}", vector(p.reduced.iter().copied()));
                match p.entering {
                    Some(j) => {
                        let _ = writeln!(
                            out,
                            "  entering: {} (r = {:.3})",
                            log.names[j], p.reduced[j]
                        );
                    }
                    None => {
                        let _ = writeln!(out, "  entering: none");
                    }
                }
                let _ = writeln!(out, "  z = {:.3}", p.objective);
            }
            RevisedEntry::ProductForm(p) => {
                let _ = writeln!(out, "[Product-Form]");
                let _ = writeln!(out, "  d  = {}", vector(p.direction.iter().copied()));
                let _ = writeln!(
                    out,
                    "  xB = {} -> {} (theta = {:.3})",
                    vector(p.basics_before.iter().copied()),
                    vector(p.basics_after.iter().copied()),
                    p.step
                );
            }
        }
    }
    if log.status == LpStatus::Optimal {
        out.push_str(&solution_report(&log.final_solution()));
    }
    let footer = match log.status {
        LpStatus::Optimal => "OPTIMAL",
        LpStatus::Unbounded => "UNBOUNDED",
        LpStatus::Infeasible => "INFEASIBLE",
        LpStatus::IterationLimit => "ITERATION LIMIT",
    };
    let _ = writeln!(out, "{}", footer);
    out
}

/// Branch-and-bound node table plus the best solution found.
pub fn branch_report(result: &MipSolution) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5} {:>6} {:<12} {:>10}  branches",
        "node", "depth", "status", "objective"
    );
    for node in &result.nodes {
        let _ = writeln!(
            out,
            "{:>5} {:>6} {:<12} {:>10}  {}",
            node.id,
            node.depth,
            node_status(node.status),
            node.objective
                .map(|o| format!("{:.3}", o))
                .unwrap_or_else(|| "-".to_string()),
            branch_list(node)
        );
    }
    out.push('\n');
    out.push_str(&mip_summary(result));
    out
}

/// Cutting-plane cut table plus the best solution found.
pub fn cuts_report(result: &MipSolution) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>5} {:>8} {:>10} {:>10}", "round", "cut", "bound", "objective");
    for cut in &result.cuts {
        let _ = writeln!(
            out,
            "{:>5} {:>8} {:>10.3} {:>10.3}",
            cut.round,
            format!("x{}", cut.var + 1),
            cut.bound,
            cut.objective
        );
    }
    out.push('\n');
    out.push_str(&mip_summary(result));
    out
}

fn mip_summary(result: &MipSolution) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Status: {:?}", result.status);
    if !result.values.is_empty() {
        let _ = writeln!(out, "Objective z = {:.3}", result.objective);
        for (j, value) in result.values.iter().enumerate() {
            let _ = writeln!(out, "x{} = {:.3}", j + 1, value);
        }
    }
    out
}

fn node_status(status: NodeStatus) -> &'static str {
    match status {
        NodeStatus::Integral => "integral",
        NodeStatus::Branched => "branched",
        NodeStatus::FathomedByBound => "fathomed",
        NodeStatus::Infeasible => "infeasible",
    }
}

fn branch_list(node: &NodeRecord) -> String {
    if node.branches.is_empty() {
        return "-".to_string();
    }
    node.branches
        .iter()
        .map(|bc| {
            let op = match bc.direction {
                solver_mip::BranchDirection::Down => "<=",
                solver_mip::BranchDirection::Up => ">=",
            };
            format!("x{}{}{}", bc.var + 1, op, bc.bound)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Knapsack exploration table plus the best set (1-based indices).
pub fn knapsack_report(solution: &KnapsackSolution) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Capacity: {:.0}", solution.capacity);
    let _ = writeln!(
        out,
        "{:>5} {:>6} {:>10} {:>10} {:>10}  taken",
        "node", "level", "profit", "weight", "bound"
    );
    for node in &solution.nodes {
        let taken = if node.taken.is_empty() {
            "{}".to_string()
        } else {
            format!(
                "{{{}}}",
                node.taken
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        };
        let _ = writeln!(
            out,
            "{:>5} {:>6} {:>10.3} {:>10.3} {:>10.3}  {}{}",
            node.id,
            node.level,
            node.profit,
            node.weight,
            node.bound,
            taken,
            if node.pruned { "  [pruned]" } else { "" }
        );
    }
    let _ = writeln!(out, "Best profit: {:.3}", solution.best_profit);
    let _ = writeln!(
        out,
        "Items: {{{}}}",
        solution
            .items
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    out
}

/// Sensitivity tables: shadow prices, cost ranging, RHS ranging.
pub fn sensitivity_report(report: &SensitivityReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Shadow prices:");
    for (row, price) in report.shadow_prices.iter().enumerate() {
        let _ = writeln!(out, "  row {}: {:.3}", row + 1, price);
    }
    let _ = writeln!(out, "Cost ranges (allowable decrease / increase):");
    for range in &report.cost_ranges {
        let _ = writeln!(
            out,
            "  {:<6} {:<8} -{} / +{}",
            range.name,
            if range.basic { "[basic]" } else { "" },
            range_side(range.range.decrease),
            range_side(range.range.increase)
        );
    }
    let _ = writeln!(out, "RHS ranges (allowable decrease / increase):");
    for range in &report.rhs_ranges {
        let _ = writeln!(
            out,
            "  row {}: -{} / +{}",
            range.row + 1,
            range_side(range.range.decrease),
            range_side(range.range.increase)
        );
    }
    out
}

/// Machine-readable summary of an LP solve.
#[derive(Debug, Serialize)]
pub struct JsonSolution {
    /// Terminal status.
    pub status: String,

    /// Objective in the parsed model's sense.
    pub objective: f64,

    /// Named decision values.
    pub variables: Vec<JsonVariable>,

    /// Pivot count.
    pub iterations: usize,
}

/// One named value.
#[derive(Debug, Serialize)]
pub struct JsonVariable {
    /// Variable name.
    pub name: String,

    /// Final value.
    pub value: f64,
}

impl JsonSolution {
    /// Summarise a completed LP solve.
    pub fn from_log(log: &SolveLog) -> Self {
        let solution = log.final_solution();
        Self {
            status: format!("{:?}", log.status),
            objective: solution.objective,
            variables: solution
                .names
                .iter()
                .zip(&solution.values)
                .map(|(name, &value)| JsonVariable {
                    name: name.clone(),
                    value,
                })
                .collect(),
            iterations: log.iterations(),
        }
    }

    /// Summarise an integer-programming solve.
    pub fn from_mip(result: &MipSolution) -> Self {
        Self {
            status: format!("{:?}", result.status),
            objective: result.objective,
            variables: result
                .values
                .iter()
                .enumerate()
                .map(|(j, &value)| JsonVariable {
                    name: format!("x{}", j + 1),
                    value,
                })
                .collect(),
            iterations: result.nodes.len() + result.cuts.len(),
        }
    }
}
