//! Nintendo Wii U packaging (`elf2rpl`, `wuhbtool`).
//!
//! Unlike the other consoles the first step does not take metadata: the
//! runtime ELF is converted to an `.rpx`, and all metadata goes to `wuhbtool`.

use super::PlatformDescriptor;
use crate::bundler::{
    settings::BuildConfig,
    tool::{BuildStep, Toolchain},
};
use std::path::{Path, PathBuf};

pub(super) const RPL_TOOL: &str = "elf2rpl";
pub(super) const EXECUTABLE_TOOL: &str = "wuhbtool";

/// `elf2rpl <binary> <out>.rpx`
pub(super) fn rpl_step(toolchain: &Toolchain, binary: &Path, output: PathBuf) -> BuildStep {
    BuildStep::new(toolchain.program(RPL_TOOL), output.clone())
        .path_arg(binary)
        .path_arg(&output)
}

/// `wuhbtool <out>.rpx <out>.wuhb --content=<dir> --name=<title> --short-name=<title> --author=<author> --icon=<icon>`
pub(super) fn executable_step(
    config: &BuildConfig,
    toolchain: &Toolchain,
    descriptor: &PlatformDescriptor,
    rpx: &Path,
    icon: &Path,
    output: PathBuf,
) -> BuildStep {
    BuildStep::new(toolchain.program(EXECUTABLE_TOOL), output.clone())
        .path_arg(rpx)
        .path_arg(&output)
        .flag_arg("content", &descriptor.asset_image)
        .arg(format!("--name={}", config.title()))
        .arg(format!("--short-name={}", config.title()))
        .arg(format!("--author={}", config.author()))
        .flag_arg("icon", icon)
}
