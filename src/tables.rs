use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{channel::ChannelConfig, runner::Outcome, strategy::Strategy},
    prelude::*,
};

pub fn build_outcomes_table(channels: &[Result<ChannelConfig>], outcomes: &[Outcome]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["#", "Strategy", "Target", "Decision", "Value"]);
    for ((index, channel), outcome) in channels.iter().enumerate().zip(outcomes) {
        let (decision, value) = match outcome {
            Outcome::Written(decision) | Outcome::Evaluated(decision) => {
                let decision_cell = if decision.should_trigger {
                    Cell::new("on").fg(Color::Green)
                } else {
                    Cell::new("off").fg(Color::Red)
                };
                let value_cell = Cell::new(&decision.output_value);
                let value_cell = if matches!(outcome, Outcome::Evaluated(_)) {
                    value_cell.add_attribute(Attribute::Dim)
                } else {
                    value_cell
                };
                (decision_cell, value_cell)
            }
            Outcome::Skipped(skip) => (Cell::new(skip).fg(Color::DarkYellow), Cell::new("")),
            Outcome::Failed(error) => {
                (Cell::new("failed").fg(Color::Red), Cell::new(format!("{error:#}")))
            }
        };
        let (strategy, target) = match channel {
            Ok(channel) => (strategy_cell(&channel.strategy), Cell::new(&channel.target_state)),
            Err(_) => (Cell::new("malformed").fg(Color::Magenta), Cell::new("")),
        };
        table.add_row(vec![
            Cell::new(index).set_alignment(CellAlignment::Right),
            strategy,
            target,
            decision,
            value,
        ]);
    }
    table
}

pub fn build_channels_table(channels: &[Result<ChannelConfig>]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "#",
        "Home",
        "Strategy",
        "Active",
        "Trigger price",
        "Hours",
        "Target",
        "On",
        "Off",
    ]);
    for (index, channel) in channels.iter().enumerate() {
        let channel = match channel {
            Ok(channel) => channel,
            Err(error) => {
                table.add_row(vec![
                    Cell::new(index).set_alignment(CellAlignment::Right),
                    Cell::new(format!("{error:#}")).fg(Color::Red),
                ]);
                continue;
            }
        };
        table.add_row(vec![
            Cell::new(channel.index).set_alignment(CellAlignment::Right),
            Cell::new(&channel.home_id).add_attribute(Attribute::Dim),
            strategy_cell(&channel.strategy),
            Cell::new(if channel.active { "yes" } else { "no" }).fg(if channel.active {
                Color::Green
            } else {
                Color::Reset
            }),
            Cell::new(channel.trigger_price).set_alignment(CellAlignment::Right),
            Cell::new(channel.amount_hours).set_alignment(CellAlignment::Right),
            Cell::new(&channel.target_state),
            Cell::new(&channel.value_on),
            Cell::new(&channel.value_off),
        ]);
    }
    table
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

fn strategy_cell(strategy: &Strategy) -> Cell {
    let cell = Cell::new(strategy);
    match strategy {
        Strategy::Unrecognized(_) => cell.fg(Color::Magenta),
        _ => cell,
    }
}
