//! Block scheduling commands for CLI.

use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};
use dayblock_core::{format_label, format_range, BlockId, BlockSpec, GoalAggregator};

use super::{parse_clock_arg, CliResult, Context};

#[derive(Clone, Copy, ValueEnum)]
pub enum Edge {
    Start,
    End,
}

#[derive(Subcommand)]
pub enum BlockAction {
    /// Add a block
    Add {
        /// Date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Start time (HH:MM, default: start of the day window)
        #[arg(long, value_parser = parse_clock_arg)]
        start: Option<i64>,
        /// Duration in minutes
        #[arg(long)]
        duration: i64,
        /// Goal id
        #[arg(long)]
        goal: Option<String>,
        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },
    /// List blocks for a date
    List {
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a block
    Remove { id: BlockId },
    /// Move a block's start
    Move {
        id: BlockId,
        /// New start time (HH:MM)
        #[arg(long, value_parser = parse_clock_arg)]
        start: i64,
    },
    /// Drag one edge of a block
    Resize {
        id: BlockId,
        #[arg(long, value_enum)]
        edge: Edge,
        /// Target time for the edge (HH:MM)
        #[arg(long, value_parser = parse_clock_arg)]
        to: i64,
    },
    /// Minutes per goal for a date
    Totals {
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Free stretches of a date's window
    Free {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub fn run(ctx: &Context, action: BlockAction) -> CliResult {
    match action {
        BlockAction::Add {
            date,
            start,
            duration,
            goal,
            note,
        } => {
            let mut session = ctx.load_session(date)?;
            let mut spec = BlockSpec::new(session.active_date(), duration);
            spec.start_minute = start;
            spec.goal_id = goal;
            spec.note = note;
            let id = session.add_block(spec)?;
            ctx.save_session(&session)?;
            println!("{id}");
        }
        BlockAction::List { date, json } => {
            let session = ctx.load_session(date)?;
            let blocks = session.blocks();
            if json {
                println!("{}", serde_json::to_string_pretty(&blocks)?);
            } else if blocks.is_empty() {
                println!("No blocks on {}.", session.active_date());
            } else {
                for b in blocks {
                    println!(
                        "{}  {:<20}  {:<12}  {}",
                        b.id,
                        format_range(b.start_minute, b.duration_minutes),
                        b.goal_id.as_deref().unwrap_or("-"),
                        b.note.as_deref().unwrap_or("")
                    );
                }
            }
        }
        BlockAction::Remove { id } => {
            let mut session = ctx.load_session(None)?;
            match session.remove_block(id) {
                Some(_) => println!("Removed {id}."),
                None => println!("No block {id}; nothing removed."),
            }
            ctx.save_session(&session)?;
        }
        BlockAction::Move { id, start } => {
            let mut session = ctx.load_session(None)?;
            session.move_block_to(id, start)?;
            ctx.save_session(&session)?;
            print_block(&session, id);
        }
        BlockAction::Resize { id, edge, to } => {
            let mut session = ctx.load_session(None)?;
            match edge {
                Edge::Start => session.resize_block_start_to(id, to)?,
                Edge::End => session.resize_block_end_to(id, to)?,
            };
            ctx.save_session(&session)?;
            print_block(&session, id);
        }
        BlockAction::Totals { date, json } => {
            let session = ctx.load_session(date)?;
            let totals = GoalAggregator::totals_by_goal(session.blocks());
            if json {
                println!("{}", serde_json::to_string_pretty(&totals)?);
            } else {
                for row in totals.rows() {
                    println!(
                        "{:<20} {:>5} min",
                        row.goal_id.as_deref().unwrap_or("(unassigned)"),
                        row.minutes
                    );
                }
                println!("{:<20} {:>5} min", "total", totals.total());
            }
        }
        BlockAction::Free { date } => {
            let session = ctx.load_session(date)?;
            for slot in session.free_slots() {
                println!(
                    "{} - {}  ({} min)",
                    format_label(slot.start_minute),
                    format_label(slot.end_minute),
                    slot.duration_minutes()
                );
            }
        }
    }
    Ok(())
}

fn print_block(session: &dayblock_core::PlannerSession, id: BlockId) {
    if let Some(b) = session.block(id) {
        println!("{}  {}  ({} min)", b.id, format_range(b.start_minute, b.duration_minutes), b.duration_minutes);
    }
}
