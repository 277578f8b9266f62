//! The `catalog` command

use anyhow::Result;

use super::output::Output;
use crate::catalog::identity;

pub fn run(output: &Output) -> Result<()> {
    let catalog = identity();

    if output.is_json() {
        output.data(&catalog);
        return Ok(());
    }

    println!(
        "Catalog: {} ({} generation steps, {} patch steps)",
        catalog.name,
        catalog.generation.len(),
        catalog.patches.len()
    );
    println!();

    println!("{:<36} {}", "TEMPLATE", "PATH");
    println!("{}", "-".repeat(100));
    for step in &catalog.generation {
        println!("{:<36} {}", step.template, step.path);
    }
    println!();

    println!("{:<36} {:<7} {}", "PATCH", "WHERE", "PATH");
    println!("{}", "-".repeat(100));
    for step in &catalog.patches {
        println!("{:<36} {:<7} {}", step.id, step.position.to_string(), step.path);
        if output.is_verbose() {
            output.row(&["", "anchor:", &step.anchor.to_string()]);
            output.row(&["", "predicate:", &step.predicate.to_string()]);
        }
    }

    Ok(())
}
