//! Statement
//!
//! Terminal rendering of optimization results. Tables are built with `tabled`
//! and written to any [`io::Write`].

use std::{fmt::Write, io, ops::Range};

use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    assembler::OptimizationResult, optimizer::ScenarioComparison, solvers::SearchStatus,
};

/// Errors that can occur when writing a statement.
#[derive(Debug, Error)]
pub enum StatementError {
    /// Output could not be written.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Printable statement for one optimized portfolio.
#[derive(Debug, Clone, Copy)]
pub struct Statement<'r, 'a> {
    result: &'r OptimizationResult<'a>,
}

impl<'r, 'a> Statement<'r, 'a> {
    /// Create a statement for `result`.
    #[must_use]
    pub fn new(result: &'r OptimizationResult<'a>) -> Self {
        Self { result }
    }

    /// Writes the positions table followed by the portfolio totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), StatementError> {
        let result = self.result;
        let mut builder = Builder::default();

        builder.push_record([
            "", "Opportunity", "Units", "Unit Cost", "Unit NPV", "Total Cost", "Total NPV",
        ]);

        for position in &result.positions {
            let opportunity = &position.opportunity;

            builder.push_record([
                format!("{:<4}", opportunity.id().to_string()),
                opportunity.name().to_string(),
                position.units.to_string(),
                opportunity.cost().to_string(),
                opportunity.npv().to_string(),
                position.total_cost.to_string(),
                position.total_value.to_string(),
            ]);
        }

        if result.positions.is_empty() {
            builder.push_record(["", "(nothing purchased)", "", "", "", "", ""]);
        }

        write_table(&mut out, builder, Columns::new(2..7))?;

        let financing = &result.financing;

        let lines = [
            (" Budget:", result.budget_limit.to_string()),
            (" Loan principal:", financing.principal.to_string()),
            (" Equity:", result.equity().to_string()),
            (" Invested:", result.total_cost.to_string()),
            (" Remaining:", result.remaining_budget.to_string()),
            (" Operational NPV:", result.operational_value.to_string()),
            (" Monthly payment:", financing.monthly_payment.to_string()),
            (" Net financing value:", financing.net_value.to_string()),
            (
                " \x1b[1mGrand total value:\x1b[0m",
                format!("\x1b[1m{}\x1b[0m", result.grand_total_value),
            ),
            (" ROI:", format_ratio(result.return_on_investment())),
            (" Search:", search_label(result)),
        ];

        write_summary(&mut out, &lines)?;

        for id in &result.skipped_forced {
            writeln!(out, " Forced opportunity {id} did not fit in the budget")?;
        }

        writeln!(out)?;

        Ok(())
    }
}

impl ScenarioComparison<'_> {
    /// Writes one row per scenario, marking the best grand total and best ROI.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), StatementError> {
        let best_total = self.best_total_value();
        let best_roi = self.best_return_on_investment();

        let mut builder = Builder::default();

        builder.push_record([
            "Scenario",
            "Units",
            "Invested",
            "Operational NPV",
            "Net Financing",
            "Grand Total",
            "ROI",
        ]);

        for (idx, (name, result)) in self.entries().iter().enumerate() {
            let mut grand_total = result.grand_total_value.to_string();
            let mut roi = format_ratio(result.return_on_investment());

            if best_total == Some(idx) {
                grand_total.push_str(" *");
            }

            if best_roi == Some(idx) {
                roi.push_str(" *");
            }

            builder.push_record([
                name.clone(),
                result.total_units().to_string(),
                result.total_cost.to_string(),
                result.operational_value.to_string(),
                result.financing.net_value.to_string(),
                grand_total,
                roi,
            ]);
        }

        write_table(&mut out, builder, Columns::new(1..7))?;

        writeln!(out, " * best in column\n")?;

        Ok(())
    }
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    numeric_columns: Columns<Range<usize>>,
) -> Result<(), StatementError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(numeric_columns, Alignment::right());

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}")?;

    Ok(())
}

fn write_summary(
    out: &mut impl io::Write,
    lines: &[(&str, String)],
) -> Result<(), StatementError> {
    let label_width = lines
        .iter()
        .map(|(label, _)| visible_width(label))
        .max()
        .unwrap_or(0);

    let value_width = lines
        .iter()
        .map(|(_, value)| visible_width(value))
        .max()
        .unwrap_or(0);

    for (label, value) in lines {
        let label_pad = label_width.saturating_sub(visible_width(label));
        let value_pad = value_width.saturating_sub(visible_width(value));

        writeln!(
            out,
            "{:>label_pad$}{label}  {:>value_pad$}{value}  ",
            "", ""
        )?;
    }

    Ok(())
}

fn search_label(result: &OptimizationResult<'_>) -> String {
    let status = match result.search.status {
        SearchStatus::Optimal => "optimal",
        SearchStatus::NodeLimitReached => "node limit reached",
    };

    format!("{status} ({} nodes)", result.search.stats.nodes_visited)
}

/// Formats a ratio with four decimal places, or a dash when there is none.
fn format_ratio(ratio: Option<Decimal>) -> String {
    ratio.map_or_else(|| "-".to_string(), |r| r.round_dp(4).to_string())
}

/// Wraps runs of box-drawing characters (U+2500..U+257F) in ANSI dark grey.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}
