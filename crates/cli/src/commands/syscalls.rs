use std::io::Write;

use anyhow::Result;
use systract_core::model::SystemCall;
use systract_core::registry::SyscallRegistry;

/// List every system call the registry knows about.
pub fn list_syscalls_command(json: bool, out: &mut dyn Write) -> Result<()> {
    let registry = SyscallRegistry::x86_64();

    if json {
        let entries: Vec<SystemCall> =
            registry.iter().map(|(id, name)| SystemCall::new(id, name)).collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
        return Ok(());
    }

    writeln!(out, "System calls ({}):", registry.len())?;
    for (id, name) in registry.iter() {
        writeln!(out, "  {id:>3} {name}")?;
    }
    Ok(())
}
