//! Runs one parsed subcommand against the configured user's plan and
//! writes the operator-facing text to `out`.

use std::fs;
use std::io::{self, Write};

use anyhow::Context;

use crate::cli::{
    BudgetCommand, ChecklistCommand, Commands, GuestCommand, PhotoCommand, PrefCommand,
    TimelineCommand,
};
use crate::config::PlannerConfig;
use crate::generate::PlanGenerator;
use crate::llm::CommandGenerator;
use crate::menu;
use crate::planner::Planner;
use crate::prompt;
use crate::recommend::Recommendations;
use crate::store::PlanStore;

pub fn execute<W: Write>(
    command: Commands,
    config: &PlannerConfig,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Commands::Prompt(args) => {
            let template = match config.load_prompt_template()? {
                Some(t) => t,
                None => prompt::default_template(),
            };
            match args.output {
                Some(path) => {
                    fs::write(&path, &template).with_context(|| {
                        format!("failed to write prompt to {}", path.display())
                    })?;
                    writeln!(out, "Prompt written to '{}'.", path.display())?;
                }
                None => writeln!(out, "{template}")?,
            }
            Ok(())
        }
        Commands::Shell => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let user = match config.user.clone() {
                Some(u) => u,
                None => match menu::prompt_user_id(&mut input, out)? {
                    Some(u) => u,
                    None => return Ok(()),
                },
            };
            let mut planner = open_planner(config, &user)?;
            let generator = plan_generator(config)?;
            menu::run(&mut planner, &generator, &mut input, out)?;
            Ok(())
        }
        command => {
            let user = config.require_user()?.to_owned();
            let mut planner = open_planner(config, &user)?;
            run_on_plan(command, &mut planner, config, out)
        }
    }
}

pub fn open_planner(config: &PlannerConfig, user: &str) -> anyhow::Result<Planner> {
    Ok(Planner::open(user, PlanStore::new(&config.data_dir))?)
}

/// Generation facade backed by the configured generator command.
pub fn plan_generator(config: &PlannerConfig) -> anyhow::Result<PlanGenerator> {
    let generator = CommandGenerator::new(&config.generator_cmd, config.generate_timeout_sec)
        .with_args(config.generator_args.clone())
        .with_model(config.model.clone());
    Ok(PlanGenerator::new(Box::new(generator)).with_template(config.load_prompt_template()?))
}

fn run_on_plan<W: Write>(
    command: Commands,
    planner: &mut Planner,
    config: &PlannerConfig,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Commands::Budget(BudgetCommand::Set { amount }) => {
            planner.set_budget(amount)?;
            writeln!(out, "Budget set to ${amount}.")?;
        }
        Commands::Budget(BudgetCommand::Show) => {
            writeln!(out, "Budget: ${}", planner.budget())?;
        }
        Commands::Recommend(args) => {
            let recs = match args.budget {
                Some(budget) => Some(planner.recommend(budget)),
                None => planner.recommend_within_budget(),
            };
            match recs {
                Some(recs) => write_recommendations(&recs, out)?,
                None => writeln!(
                    out,
                    "Please set a valid budget first using 'partyplan budget set <amount>'."
                )?,
            }
        }
        Commands::Book(args) => {
            let msg = planner.book_service(args.service, &args.details)?;
            writeln!(out, "{msg}")?;
        }
        Commands::Guest(GuestCommand::Add { name }) => {
            planner.add_guest(&name)?;
            writeln!(out, "Guest '{}' added to the guest list.", name.trim())?;
        }
        Commands::Guest(GuestCommand::Remove { name }) => {
            planner.remove_guest(&name)?;
            writeln!(out, "Guest '{}' removed from the guest list.", name.trim())?;
        }
        Commands::Guest(GuestCommand::List) => write_guest_list(planner, out)?,
        Commands::Guest(GuestCommand::Rsvp) => write_rsvps(planner, out)?,
        Commands::Pref(PrefCommand::Set { key, value, json }) => {
            let value = if json {
                serde_json::from_str(&value)
                    .with_context(|| format!("preference value is not valid JSON: {value}"))?
            } else {
                serde_json::Value::String(value)
            };
            planner.update_preference(&key, value.clone())?;
            writeln!(out, "Preference '{}' updated to {value}.", key.trim())?;
        }
        Commands::Pref(PrefCommand::Show) => write_preferences(planner, out)?,
        Commands::Export(args) => {
            let path = planner.export(args.output.as_deref())?;
            writeln!(out, "Party plan exported to '{}'.", path.display())?;
        }
        Commands::Timeline(TimelineCommand::Add { task, days }) => {
            let deadline = planner.add_timeline_task(&task, days)?;
            writeln!(
                out,
                "Timeline task '{}' created with a deadline of {}.",
                task.trim(),
                deadline.format("%Y-%m-%d")
            )?;
        }
        Commands::Timeline(TimelineCommand::List) => write_timeline(planner, out)?,
        Commands::Photo(PhotoCommand::Add { path }) => {
            planner.add_photo(&path)?;
            writeln!(out, "Photo '{}' added to the gallery.", path.display())?;
        }
        Commands::Photo(PhotoCommand::List) => {
            if planner.photos().is_empty() {
                writeln!(out, "No photos in the gallery.")?;
            }
            for photo in planner.photos() {
                writeln!(out, "{}", photo.display())?;
            }
        }
        Commands::Checklist(ChecklistCommand::Add { item }) => {
            planner.add_checklist_item(&item)?;
            writeln!(out, "Checklist item '{}' added.", item.trim())?;
        }
        Commands::Checklist(ChecklistCommand::List) => write_checklist(planner, out)?,
        Commands::Plan(args) => {
            let generator = plan_generator(config)?;
            writeln!(out, "{}", generator.generate(&args.text()))?;
        }
        Commands::Adjust(args) => {
            let generator = plan_generator(config)?;
            let adjustment = planner.adjust_plan(&generator, &args.text());
            writeln!(out, "{}", adjustment.reply)?;
            adjustment.saved?;
        }
        command @ (Commands::Prompt(_) | Commands::Shell) => {
            anyhow::bail!("{command:?} does not operate on a single plan")
        }
    }
    Ok(())
}

pub(crate) fn write_recommendations<W: Write>(
    recs: &Recommendations,
    out: &mut W,
) -> io::Result<()> {
    if recs.is_empty() {
        return writeln!(out, "No available options within your budget.");
    }
    writeln!(out, "Recommendations:")?;
    for (category, entries) in recs {
        writeln!(out, "\n{category}:")?;
        for entry in entries {
            writeln!(out, "- {entry}")?;
        }
    }
    Ok(())
}

pub(crate) fn write_guest_list<W: Write>(planner: &Planner, out: &mut W) -> io::Result<()> {
    match planner.guest_list() {
        Some(list) => writeln!(out, "Current guests: {list}"),
        None => writeln!(out, "Current guests: No guests in the list."),
    }
}

pub(crate) fn write_rsvps<W: Write>(planner: &Planner, out: &mut W) -> io::Result<()> {
    let rsvps = planner.rsvps();
    if rsvps.is_empty() {
        return writeln!(out, "No guests in the list.");
    }
    let joined: Vec<String> = rsvps.iter().map(ToString::to_string).collect();
    writeln!(out, "RSVPs: {}", joined.join(", "))
}

pub(crate) fn write_preferences<W: Write>(planner: &Planner, out: &mut W) -> io::Result<()> {
    if planner.preferences().is_empty() {
        return writeln!(out, "User Preferences:\nNo preferences set.");
    }
    let pretty = serde_json::to_string_pretty(planner.preferences()).map_err(io::Error::other)?;
    writeln!(out, "User Preferences:\n{pretty}")
}

pub(crate) fn write_timeline<W: Write>(planner: &Planner, out: &mut W) -> io::Result<()> {
    if planner.timeline().is_empty() {
        return writeln!(out, "No timeline tasks.");
    }
    for t in planner.timeline() {
        writeln!(out, "{}  {}", t.deadline.format("%Y-%m-%d"), t.task)?;
    }
    Ok(())
}

pub(crate) fn write_checklist<W: Write>(planner: &Planner, out: &mut W) -> io::Result<()> {
    if planner.checklist().is_empty() {
        return writeln!(out, "No checklist items.");
    }
    writeln!(out, "Checklist Items:")?;
    for (idx, item) in planner.checklist().iter().enumerate() {
        writeln!(out, "{}. {item}", idx + 1)?;
    }
    Ok(())
}
