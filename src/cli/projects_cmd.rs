//! The `projects` command

use anyhow::Result;

use super::output::Output;
use crate::storage::{list_projects, Config};

pub fn run(config: &Config, extra_exclude: &[String], output: &Output) -> Result<()> {
    let mut exclude = config.run.exclude.clone();
    exclude.extend(extra_exclude.iter().cloned());

    let projects = list_projects(&config.root, &config.run.marker_dir, &exclude)?;

    if output.is_json() {
        output.data(&projects);
        return Ok(());
    }

    if projects.is_empty() {
        println!("No projects found under {}.", config.root.display());
        println!();
        println!("A project is a directory containing '{}/'.", config.run.marker_dir);
        return Ok(());
    }

    for project in &projects {
        println!("{}", project);
    }
    println!();
    println!("{} project(s)", projects.len());

    Ok(())
}
