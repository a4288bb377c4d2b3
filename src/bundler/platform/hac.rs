//! Nintendo Switch packaging (`nacptool`, `elf2nro`).

use super::PlatformDescriptor;
use crate::bundler::{
    settings::BuildConfig,
    tool::{BuildStep, Toolchain},
};
use std::path::{Path, PathBuf};

pub(super) const NACP_TOOL: &str = "nacptool";
pub(super) const EXECUTABLE_TOOL: &str = "elf2nro";

/// `nacptool --create <title> <author> <version> <out>.nacp`
pub(super) fn nacp_step(config: &BuildConfig, toolchain: &Toolchain, output: PathBuf) -> BuildStep {
    BuildStep::new(toolchain.program(NACP_TOOL), output.clone())
        .arg("--create")
        .arg(config.title())
        .arg(config.author())
        .arg(config.version())
        .path_arg(&output)
}

/// `elf2nro <binary> <out>.nro --nacp=<out>.nacp --icon=<icon> --romfs=<romfs>`
pub(super) fn executable_step(
    toolchain: &Toolchain,
    descriptor: &PlatformDescriptor,
    nacp: &Path,
    icon: &Path,
    output: PathBuf,
) -> BuildStep {
    BuildStep::new(toolchain.program(EXECUTABLE_TOOL), output.clone())
        .path_arg(&descriptor.binary)
        .path_arg(&output)
        .flag_arg("nacp", nacp)
        .flag_arg("icon", icon)
        .flag_arg("romfs", &descriptor.asset_image)
}
