//! External tool availability checking.
//!
//! Used as a preflight before bundling so a missing devkitPro install shows up
//! as one warning per tool instead of a cryptic launch failure later. A
//! missing tool never stops the run on its own.

use super::Toolchain;

/// Returns the tools from `names` that cannot be found for `toolchain`.
pub fn missing_tools(toolchain: &Toolchain, names: &[&str]) -> Vec<String> {
    names
        .iter()
        .filter(|name| !is_available(toolchain, name))
        .map(|name| name.to_string())
        .collect()
}

fn is_available(toolchain: &Toolchain, name: &str) -> bool {
    let found = match toolchain.tools_dir() {
        Some(dir) => which::which_in(name, Some(dir), dir),
        None => which::which(name),
    };

    match found {
        Ok(path) => {
            log::debug!("Found {} at: {}", name, path.display());
            true
        }
        Err(e) => {
            log::debug!("{name} not found: {e}");
            false
        }
    }
}
