//! Command dispatch and report formatting

use std::io;

use chrono::Datelike;
use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::family::load_family;
use crate::cli::args::{Cli, Commands, Order};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{Settings, TreeStyle};
use crate::domain::{AgePolicy, Clock, FixedClock, Member, SystemClock, TreeManager, TreeNodeConvert};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };
    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let family_file = cli.family.as_deref().or(settings.family_file.as_deref());
    debug!(?family_file, ?settings, "loading family");
    let mut manager = load_family(family_file)?;
    let clock: Box<dyn Clock> = match cli.today {
        Some(today) => Box::new(FixedClock(today)),
        None => Box::new(SystemClock),
    };

    match command {
        Commands::Tree => output::info(&tree_report(&manager, settings.tree_style)),
        Commands::Search { name, dfs } => {
            let report = search_report(&manager, name, *dfs, clock.as_ref(), settings.age_policy)
                .ok_or_else(|| not_found(name))?;
            output::success(&report);
        }
        Commands::Succession => output::info(&succession_report(&manager)),
        Commands::Position { name } => _position(&manager, name)?,
        Commands::List { order } => output::info(&list_report(&manager, *order)),
        Commands::Add {
            parent,
            name,
            born,
            title,
            deceased,
            died,
        } => {
            let mut member = Member::new(name.as_str(), *born, !deceased).with_title(title.as_str());
            if let Some(died) = died {
                member = member.with_date_of_death(*died);
            }
            manager.add_member(parent, member)?;
            output::action("Added", &format!("{} as a child of {}", name, parent));
            output::info(&tree_report(&manager, settings.tree_style));
            output::info(&succession_report(&manager));
        }
        Commands::Remove { name } => {
            manager.remove_member(name)?;
            output::action("Removed", name);
            output::info(&tree_report(&manager, settings.tree_style));
        }
        Commands::Completion { .. } => {}
    }
    Ok(())
}

fn not_found(name: &str) -> CliError {
    CliError::NotFound(format!("Member '{}' not found.", name))
}

#[instrument(skip(manager))]
fn _position(manager: &TreeManager, name: &str) -> CliResult<()> {
    if manager.search_breadth_first(name).is_none() {
        return Err(not_found(name));
    }
    match manager.succession_position(name) {
        Some(position) => output::info(&format!("{}: {}", name, position)),
        None => output::failure(&format!("{}: Not in line of succession", name)),
    }
    Ok(())
}

pub fn tree_report(manager: &TreeManager, style: TreeStyle) -> String {
    match style {
        TreeStyle::Glyph => manager.render_tree_text(),
        TreeStyle::Termtree => manager.tree().to_tree_string().to_string(),
    }
}

/// Search result with the found member's place in the line of succession.
pub fn search_report(
    manager: &TreeManager,
    name: &str,
    dfs: bool,
    clock: &dyn Clock,
    policy: AgePolicy,
) -> Option<String> {
    let (label, found) = if dfs {
        ("DFS", manager.search_depth_first(name))
    } else {
        ("BFS", manager.search_breadth_first(name))
    };
    let idx = found?;
    let member = manager.member(idx)?;
    let position = match manager.succession_position_of(idx) {
        Some(position) => format!("Position in line to throne: {}", position),
        None => "Not in line of succession".to_string(),
    };
    Some(format!(
        "Found ({}):\n{}\nAge: {}\n{}",
        label,
        member,
        member.age(clock, policy),
        position
    ))
}

pub fn succession_report(manager: &TreeManager) -> String {
    let line = manager.line_of_succession();
    if line.is_empty() {
        return "No living heirs found in the line of succession.".to_string();
    }
    let entries = line
        .iter()
        .filter_map(|&idx| manager.member(idx))
        .enumerate()
        .map(|(i, member)| {
            let title = if member.title.is_empty() {
                String::new()
            } else {
                format!(" ({})", member.title)
            };
            format!(
                "{}. {}{} - Born {}",
                i + 1,
                member.name,
                title,
                member.date_of_birth.year()
            )
        })
        .join("\n");
    format!("Line of Succession to the Throne:\n\n{}", entries)
}

/// One member per line, indented by generation.
pub fn list_report(manager: &TreeManager, order: Order) -> String {
    let nodes = match order {
        Order::Bfs => manager.all_nodes_breadth_first(),
        Order::Dfs => manager.all_nodes_depth_first(),
    };
    nodes
        .into_iter()
        .filter_map(|idx| {
            let member = manager.member(idx)?;
            let depth = manager.depth(idx)?;
            Some(format!("{}{}", "  ".repeat(depth), member))
        })
        .join("\n")
}
