use serde::Serialize;
use vkscope::{ApiVersion, Command, EntryPointTable};

/// Resolution summary of one table.
#[derive(Debug, Serialize)]
pub struct TableReport {
    pub scope: String,
    pub resolved: usize,
    pub total: usize,
    /// Slots filled from another alias group member: (slot, supplier)
    pub fallbacks: Vec<(String, String)>,
    /// Null slots whose requirement the scope satisfies
    pub missing: Vec<String>,
    /// Every null slot
    pub unresolved: Vec<String>,
}

impl TableReport {
    pub fn new<C: Command, S: AsRef<str>>(
        table: &EntryPointTable<C>,
        api_version: ApiVersion,
        extensions: &[S],
    ) -> Self {
        let fallbacks = C::ALL
            .iter()
            .copied()
            .filter_map(|cmd| match table.origin(cmd) {
                Some(origin) if origin != cmd => {
                    Some((cmd.name().to_string(), origin.name().to_string()))
                }
                _ => None,
            })
            .collect();
        Self {
            scope: C::SCOPE.to_string(),
            resolved: table.resolved_count(),
            total: C::ALL.len(),
            fallbacks,
            missing: names(table.missing_for(api_version, extensions)),
            unresolved: names(table.unresolved().collect()),
        }
    }

    pub fn print(&self, show_unresolved: bool) {
        println!(
            "  {:<9} {:>4} / {:<4} resolved, {} via alias",
            self.scope,
            self.resolved,
            self.total,
            self.fallbacks.len()
        );
        for (slot, origin) in &self.fallbacks {
            println!("            {} <- {}", slot, origin);
        }
        for name in &self.missing {
            println!("    \x1b[33mmissing\x1b[0m {}", name);
        }
        if show_unresolved {
            for name in &self.unresolved {
                println!("    \x1b[90mnull\x1b[0m    {}", name);
            }
        }
    }
}

fn names<C: Command>(commands: Vec<C>) -> Vec<String> {
    commands.into_iter().map(|cmd| cmd.name().to_string()).collect()
}
