//! Nintendo 3DS packaging (`smdhtool`, `3dsxtool`).

use super::PlatformDescriptor;
use crate::bundler::{
    settings::BuildConfig,
    tool::{BuildStep, Toolchain},
};
use std::path::{Path, PathBuf};

pub(super) const SMDH_TOOL: &str = "smdhtool";
pub(super) const EXECUTABLE_TOOL: &str = "3dsxtool";

/// `smdhtool --create <title> "<description> - <version>" <author> <icon> <out>.smdh`
pub(super) fn smdh_step(
    config: &BuildConfig,
    toolchain: &Toolchain,
    icon: &Path,
    output: PathBuf,
) -> BuildStep {
    let description = format!("{} - {}", config.description(), config.version());

    BuildStep::new(toolchain.program(SMDH_TOOL), output.clone())
        .arg("--create")
        .arg(config.title())
        .arg(description)
        .arg(config.author())
        .path_arg(icon)
        .path_arg(&output)
}

/// `3dsxtool <binary> <out>.3dsx --smdh=<out>.smdh --romfs=<romfs>`
pub(super) fn executable_step(
    toolchain: &Toolchain,
    descriptor: &PlatformDescriptor,
    smdh: &Path,
    output: PathBuf,
) -> BuildStep {
    BuildStep::new(toolchain.program(EXECUTABLE_TOOL), output.clone())
        .path_arg(&descriptor.binary)
        .path_arg(&output)
        .flag_arg("smdh", smdh)
        .flag_arg("romfs", &descriptor.asset_image)
}
