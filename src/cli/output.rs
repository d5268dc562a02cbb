//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::{ColoredString, Colorize};

use crate::domain::{EvaluatedTree, Site, UnevaluableTree};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data/JSON)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

fn flag(value: bool, on: &str) -> ColoredString {
    if value {
        on.red().bold()
    } else {
        "-".normal()
    }
}

/// Print site list
pub fn site_table(sites: &[Site]) {
    println!("{:<24} {:>11} {:>11}", "NAME".bold(), "LAT".bold(), "LON".bold());
    for s in sites {
        println!("{:<24} {:>11.5} {:>11.5}", s.name, s.latitude, s.longitude);
    }
}

/// Print full tree table with all risk flags
pub fn tree_table(trees: &[&EvaluatedTree]) {
    if trees.is_empty() {
        detail("(none)");
        return;
    }
    println!(
        "  {:<10} {:<18} {:>4} {:>9} {:>6} {:>8} {:>10}",
        "ID", "SPECIES", "AGE", "HEIGHT_M", "PRUNE", "OVER_MAX", "NEAR_LIMIT"
    );
    for t in trees {
        println!(
            "  {:<10} {:<18} {:>4} {:>9.2} {:>6} {:>8} {:>10}",
            t.id,
            t.species,
            t.age,
            t.current_height,
            flag(t.prune_recommended, "yes"),
            flag(t.over_max, "yes"),
            flag(t.near_limit, "yes"),
        );
    }
}

/// Print trees that could not be evaluated, with reasons
pub fn unevaluable_table(trees: &[UnevaluableTree]) {
    for t in trees {
        println!("  {} {:<10} {:<18} {}", "✗".red(), t.id, t.species, t.reason);
    }
}
