//! Line-oriented interactive menu over any reader/writer pair.
//!
//! Mirrors the subcommands one numbered option at a time. Bad input is
//! reported and the menu is shown again; end of input exits like option 11.

use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::app;
use crate::error::PlannerError;
use crate::generate::PlanGenerator;
use crate::planner::{Planner, ServiceType};

const MENU: &str = "\nPlease choose an option from the menu below:
1. Set Budget
2. Recommend Options
3. Book Service
4. Manage Guest List
5. Update/View Preferences
6. Export Plan
7. Create Event Timeline
8. Add Photo
9. Add/View Checklist
10. Adjust Plan
11. Exit";

const FAREWELL: &str = "Thank you for using the Birthday Party Assistant. Goodbye!";

/// Ask for a user id. `new` asks again for a fresh one. Returns `None` when
/// the answer is blank or input ends.
pub fn prompt_user_id<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> io::Result<Option<String>> {
    writeln!(out, "Welcome to the Birthday Party Planning Assistant!")?;
    let prompt = "Please enter your user ID (or type 'new' to create a new user): ";
    let Some(mut user) = ask(input, out, prompt)? else {
        return Ok(None);
    };
    if user.eq_ignore_ascii_case("new") {
        user = ask(input, out, "Enter a new user ID: ")?.unwrap_or_default();
    }
    if user.is_empty() {
        writeln!(out, "User ID cannot be empty. Exiting.")?;
        return Ok(None);
    }
    Ok(Some(user))
}

/// Run the menu until the operator exits or input ends.
pub fn run<R: BufRead, W: Write>(
    planner: &mut Planner,
    generator: &PlanGenerator,
    input: &mut R,
    out: &mut W,
) -> io::Result<()> {
    loop {
        writeln!(out, "{MENU}")?;
        let prompt = "Enter the number corresponding to your choice: ";
        let Some(choice) = ask(input, out, prompt)? else {
            writeln!(out, "\n{FAREWELL}")?;
            return Ok(());
        };

        let step = match choice.as_str() {
            "1" => set_budget(planner, input, out),
            "2" => recommend(planner, out),
            "3" => book(planner, input, out),
            "4" => guests(planner, input, out),
            "5" => preferences(planner, input, out),
            "6" => export(planner, out),
            "7" => timeline(planner, input, out),
            "8" => photo(planner, input, out),
            "9" => checklist(planner, input, out),
            "10" => adjust(planner, generator, input, out),
            "11" => {
                writeln!(out, "{FAREWELL}")?;
                return Ok(());
            }
            _ => {
                writeln!(out, "Invalid choice. Please enter a number between 1 and 11.")?;
                Ok(Step::Continue)
            }
        }?;

        if step == Step::Eof {
            writeln!(out, "\n{FAREWELL}")?;
            return Ok(());
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Eof,
}

/// Print `prompt`, read one line, trim it. `None` at end of input.
fn ask<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}

/// Print the outcome of a planner call: `ok` on success, the error text otherwise.
fn report<W: Write, T>(
    out: &mut W,
    result: Result<T, PlannerError>,
    ok: impl FnOnce(T) -> String,
) -> io::Result<Step> {
    match result {
        Ok(v) => writeln!(out, "{}", ok(v))?,
        Err(e) => writeln!(out, "{e}")?,
    }
    Ok(Step::Continue)
}

macro_rules! ask_or_eof {
    ($input:expr, $out:expr, $prompt:expr) => {
        match ask($input, $out, $prompt)? {
            Some(answer) => answer,
            None => return Ok(Step::Eof),
        }
    };
}

fn set_budget<R: BufRead, W: Write>(
    planner: &mut Planner,
    input: &mut R,
    out: &mut W,
) -> io::Result<Step> {
    let raw = ask_or_eof!(input, out, "Enter your budget amount: ");
    let Ok(amount) = raw.parse::<f64>() else {
        writeln!(out, "Invalid budget amount. Please enter a numeric value.")?;
        return Ok(Step::Continue);
    };
    report(out, planner.set_budget(amount), |()| format!("Budget set to ${amount}."))
}

fn recommend<W: Write>(planner: &Planner, out: &mut W) -> io::Result<Step> {
    match planner.recommend_within_budget() {
        Some(recs) => app::write_recommendations(&recs, out)?,
        None => writeln!(out, "Please set a valid budget first using the 'Set Budget' option.")?,
    }
    Ok(Step::Continue)
}

fn book<R: BufRead, W: Write>(
    planner: &mut Planner,
    input: &mut R,
    out: &mut W,
) -> io::Result<Step> {
    let raw = ask_or_eof!(input, out, "Enter the service type (venue/caterer/entertainment): ");
    let service = match raw.parse::<ServiceType>() {
        Ok(s) => s,
        Err(e) => {
            writeln!(out, "{e}")?;
            return Ok(Step::Continue);
        }
    };
    let details = ask_or_eof!(input, out, "Enter the details of the service (e.g., name): ");
    report(out, planner.book_service(service, &details), |msg| msg)
}

fn guests<R: BufRead, W: Write>(
    planner: &mut Planner,
    input: &mut R,
    out: &mut W,
) -> io::Result<Step> {
    writeln!(
        out,
        "\nGuest List Management:\na. Add Guest\nb. Remove Guest\nc. List Guests\nd. View RSVPs"
    )?;
    let action = ask_or_eof!(input, out, "Choose an action (a/b/c/d): ").to_ascii_lowercase();
    match action.as_str() {
        "a" => {
            let name = ask_or_eof!(input, out, "Enter the guest name to add: ");
            report(out, planner.add_guest(&name), |()| {
                format!("Guest '{name}' added to the guest list.")
            })
        }
        "b" => {
            let name = ask_or_eof!(input, out, "Enter the guest name to remove: ");
            report(out, planner.remove_guest(&name), |()| {
                format!("Guest '{name}' removed from the guest list.")
            })
        }
        "c" => {
            app::write_guest_list(planner, out)?;
            Ok(Step::Continue)
        }
        "d" => {
            app::write_rsvps(planner, out)?;
            Ok(Step::Continue)
        }
        _ => {
            writeln!(out, "Invalid action. Please choose a, b, c, or d.")?;
            Ok(Step::Continue)
        }
    }
}

fn preferences<R: BufRead, W: Write>(
    planner: &mut Planner,
    input: &mut R,
    out: &mut W,
) -> io::Result<Step> {
    writeln!(out, "\nPreferences Management:\na. Update Preferences\nb. View Preferences")?;
    let action = ask_or_eof!(input, out, "Choose an action (a/b): ").to_ascii_lowercase();
    match action.as_str() {
        "a" => {
            let pair = ask_or_eof!(
                input,
                out,
                "Enter the preference to update in 'key, value' format: "
            );
            report(out, planner.update_preference_pair(&pair), |(key, value)| {
                format!("Preference '{key}' updated to '{value}'.")
            })
        }
        "b" => {
            app::write_preferences(planner, out)?;
            Ok(Step::Continue)
        }
        _ => {
            writeln!(out, "Invalid action. Please choose a or b.")?;
            Ok(Step::Continue)
        }
    }
}

fn export<W: Write>(planner: &Planner, out: &mut W) -> io::Result<Step> {
    report(out, planner.export(None), |path| {
        format!("Party plan exported to '{}'.", path.display())
    })
}

fn timeline<R: BufRead, W: Write>(
    planner: &mut Planner,
    input: &mut R,
    out: &mut W,
) -> io::Result<Step> {
    let task = ask_or_eof!(input, out, "Enter the task for the timeline: ");
    if task.is_empty() {
        writeln!(out, "Task cannot be empty.")?;
        return Ok(Step::Continue);
    }
    let raw = ask_or_eof!(
        input,
        out,
        "Enter the number of days before the event for the deadline: "
    );
    let Ok(days) = raw.parse::<i64>() else {
        writeln!(out, "Invalid number of days. Please enter an integer.")?;
        return Ok(Step::Continue);
    };
    report(out, planner.add_timeline_task(&task, days), |deadline| {
        format!(
            "Timeline task '{task}' created with a deadline of {}.",
            deadline.format("%Y-%m-%d")
        )
    })
}

fn photo<R: BufRead, W: Write>(
    planner: &mut Planner,
    input: &mut R,
    out: &mut W,
) -> io::Result<Step> {
    let path = ask_or_eof!(input, out, "Enter the photo path to add: ");
    report(out, planner.add_photo(Path::new(&path)), |()| {
        format!("Photo '{path}' added to the gallery.")
    })
}

fn checklist<R: BufRead, W: Write>(
    planner: &mut Planner,
    input: &mut R,
    out: &mut W,
) -> io::Result<Step> {
    writeln!(out, "\nChecklist Management:\na. Add Checklist Item\nb. View Checklist")?;
    let action = ask_or_eof!(input, out, "Choose an action (a/b): ").to_ascii_lowercase();
    match action.as_str() {
        "a" => {
            let item = ask_or_eof!(input, out, "Enter the checklist item: ");
            report(out, planner.add_checklist_item(&item), |()| {
                format!("Checklist item '{item}' added.")
            })
        }
        "b" => {
            app::write_checklist(planner, out)?;
            Ok(Step::Continue)
        }
        _ => {
            writeln!(out, "Invalid action. Please choose a or b.")?;
            Ok(Step::Continue)
        }
    }
}

fn adjust<R: BufRead, W: Write>(
    planner: &Planner,
    generator: &PlanGenerator,
    input: &mut R,
    out: &mut W,
) -> io::Result<Step> {
    let details = ask_or_eof!(input, out, "Enter the new details to adjust the plan: ");
    if details.is_empty() {
        writeln!(out, "Adjustment details cannot be empty.")?;
        return Ok(Step::Continue);
    }
    let adjustment = planner.adjust_plan(generator, &details);
    writeln!(out, "{}", adjustment.reply)?;
    if let Err(e) = adjustment.saved {
        writeln!(out, "{e}")?;
    }
    Ok(Step::Continue)
}
