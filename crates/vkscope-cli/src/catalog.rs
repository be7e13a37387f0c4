use serde::Serialize;
use vkscope::{Command, DeviceCommand, GlobalCommand, InstanceCommand};

use crate::ScopeArg;

#[derive(Debug, Serialize)]
struct CatalogEntry {
    scope: String,
    name: &'static str,
    requirement: String,
    aliases: Vec<&'static str>,
}

pub fn run_catalog(scope: Option<ScopeArg>, json: bool) -> anyhow::Result<()> {
    let mut entries = Vec::new();
    if matches!(scope, None | Some(ScopeArg::Global)) {
        collect::<GlobalCommand>(&mut entries);
    }
    if matches!(scope, None | Some(ScopeArg::Instance)) {
        collect::<InstanceCommand>(&mut entries);
    }
    if matches!(scope, None | Some(ScopeArg::Device)) {
        collect::<DeviceCommand>(&mut entries);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let mut current = None;
    for entry in &entries {
        if current != Some(entry.scope.as_str()) {
            println!();
            println!("{} scope", entry.scope);
            current = Some(entry.scope.as_str());
        }
        if entry.aliases.is_empty() {
            println!("  {:<48} {}", entry.name, entry.requirement);
        } else {
            println!(
                "  {:<48} {:<40} = {}",
                entry.name,
                entry.requirement,
                entry.aliases.join(", ")
            );
        }
    }
    println!();
    Ok(())
}

fn collect<C: Command>(entries: &mut Vec<CatalogEntry>) {
    for cmd in C::ALL.iter().copied() {
        let aliases = cmd
            .alias_group()
            .map(|group| {
                group
                    .iter()
                    .copied()
                    .filter(|member| *member != cmd)
                    .map(|member| member.name())
                    .collect()
            })
            .unwrap_or_default();
        entries.push(CatalogEntry {
            scope: C::SCOPE.to_string(),
            name: cmd.name(),
            requirement: cmd.requirement().to_string(),
            aliases,
        });
    }
}
