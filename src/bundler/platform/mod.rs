//! Console platforms supported by the bundler.
//!
//! Each [`Target`] has a static [`PlatformDescriptor`] describing where its
//! LÖVE Potion runtime lives and which constraints its icon must meet. The
//! per-platform submodules build the [`BuildStep`]s for the two-stage
//! packaging chain:
//!
//! | Target | Descriptor step        | Executable step        |
//! |--------|------------------------|------------------------|
//! | `ctr`  | `smdhtool` → `.smdh`   | `3dsxtool` → `.3dsx`   |
//! | `hac`  | `nacptool` → `.nacp`   | `elf2nro` → `.nro`     |
//! | `cafe` | `elf2rpl` → `.rpx`     | `wuhbtool` → `.wuhb`   |

mod cafe;
mod ctr;
mod hac;

use crate::bundler::{
    error::{Error, Result},
    settings::BuildConfig,
    tool::{BuildStep, Toolchain},
};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    str::FromStr,
};

/// Environment variable overriding the resources directory.
pub const RESOURCES_ENV: &str = "LOVEBREW_RESOURCES";

/// Console platform identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    /// Nintendo 3DS.
    Ctr,
    /// Nintendo Switch.
    Hac,
    /// Nintendo Wii U.
    Cafe,
}

impl Target {
    pub const ALL: [Target; 3] = [Target::Ctr, Target::Hac, Target::Cafe];

    /// Identifier used in `lovebrew.toml` and build directory names.
    pub fn id(self) -> &'static str {
        match self {
            Target::Ctr => "ctr",
            Target::Hac => "hac",
            Target::Cafe => "cafe",
        }
    }

    /// Human readable console name.
    pub fn console_name(self) -> &'static str {
        match self {
            Target::Ctr => "Nintendo 3DS",
            Target::Hac => "Nintendo Switch",
            Target::Cafe => "Nintendo Wii U",
        }
    }

    /// Required width and height of the square icon, in pixels.
    pub fn icon_dimension(self) -> u32 {
        match self {
            Target::Ctr => 48,
            Target::Hac => 256,
            Target::Cafe => 128,
        }
    }

    /// Accepted icon file extensions (lowercase, no dot).
    pub fn icon_extensions(self) -> &'static [&'static str] {
        match self {
            Target::Ctr | Target::Cafe => &["png"],
            Target::Hac => &["jpg", "jpeg"],
        }
    }

    /// Extension of the intermediate descriptor file.
    pub fn descriptor_extension(self) -> &'static str {
        match self {
            Target::Ctr => "smdh",
            Target::Hac => "nacp",
            Target::Cafe => "rpx",
        }
    }

    /// Extension of the final executable container.
    pub fn executable_extension(self) -> &'static str {
        match self {
            Target::Ctr => "3dsx",
            Target::Hac => "nro",
            Target::Cafe => "wuhb",
        }
    }

    /// External tools the packaging chain for this target needs.
    pub fn required_tools(self) -> &'static [&'static str] {
        match self {
            Target::Ctr => &[ctr::SMDH_TOOL, ctr::EXECUTABLE_TOOL],
            Target::Hac => &[hac::NACP_TOOL, hac::EXECUTABLE_TOOL],
            Target::Cafe => &[cafe::RPL_TOOL, cafe::EXECUTABLE_TOOL],
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ctr" => Ok(Target::Ctr),
            "hac" => Ok(Target::Hac),
            "cafe" => Ok(Target::Cafe),
            other => Err(Error::UnknownTarget(other.to_string())),
        }
    }
}

/// Static per-target data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDescriptor {
    pub target: Target,
    /// Icon used when the project supplies none.
    pub default_icon: PathBuf,
    /// LÖVE Potion runtime ELF.
    pub binary: PathBuf,
    /// RomFS image (3DS, Switch) or content directory (Wii U).
    pub asset_image: PathBuf,
}

impl PlatformDescriptor {
    /// Descriptor for `target` with the conventional layout under `root`.
    ///
    /// ```text
    /// <root>/ctr/icon.png   <root>/ctr/lovepotion.elf   <root>/ctr/files.romfs
    /// <root>/hac/icon.jpg   <root>/hac/lovepotion.elf   <root>/hac/files.romfs
    /// <root>/cafe/icon.png  <root>/cafe/lovepotion.elf  <root>/cafe/content
    /// ```
    pub fn from_root(root: &Path, target: Target) -> Self {
        let dir = root.join(target.id());
        let (icon, asset_image) = match target {
            Target::Ctr => ("icon.png", "files.romfs"),
            Target::Hac => ("icon.jpg", "files.romfs"),
            Target::Cafe => ("icon.png", "content"),
        };

        Self {
            target,
            default_icon: dir.join(icon),
            binary: dir.join("lovepotion.elf"),
            asset_image: dir.join(asset_image),
        }
    }

    pub fn icon_dimension(&self) -> u32 {
        self.target.icon_dimension()
    }

    pub fn icon_extensions(&self) -> &'static [&'static str] {
        self.target.icon_extensions()
    }

    /// `<build_dir>/<title>.<descriptor ext>`
    pub fn descriptor_path(&self, build_dir: &Path, title: &str) -> PathBuf {
        build_dir.join(format!("{title}.{}", self.target.descriptor_extension()))
    }

    /// `<build_dir>/<title>.<executable ext>`
    pub fn executable_path(&self, build_dir: &Path, title: &str) -> PathBuf {
        build_dir.join(format!("{title}.{}", self.target.executable_extension()))
    }

    /// First packaging step: icon/metadata descriptor.
    pub fn metadata_step(
        &self,
        config: &BuildConfig,
        toolchain: &Toolchain,
        build_dir: &Path,
        icon: &Path,
    ) -> BuildStep {
        let output = self.descriptor_path(build_dir, config.title());
        match self.target {
            Target::Ctr => ctr::smdh_step(config, toolchain, icon, output),
            Target::Hac => hac::nacp_step(config, toolchain, output),
            Target::Cafe => cafe::rpl_step(toolchain, &self.binary, output),
        }
    }

    /// Second packaging step: executable container consuming the descriptor.
    pub fn executable_step(
        &self,
        config: &BuildConfig,
        toolchain: &Toolchain,
        build_dir: &Path,
        icon: &Path,
    ) -> BuildStep {
        let descriptor = self.descriptor_path(build_dir, config.title());
        let output = self.executable_path(build_dir, config.title());
        match self.target {
            Target::Ctr => ctr::executable_step(toolchain, self, &descriptor, output),
            Target::Hac => hac::executable_step(toolchain, self, &descriptor, icon, output),
            Target::Cafe => {
                cafe::executable_step(config, toolchain, self, &descriptor, icon, output)
            }
        }
    }
}

/// Fixed mapping from target to descriptor, never mutated after construction.
#[derive(Debug, Clone)]
pub struct PlatformRegistry {
    root: PathBuf,
    descriptors: HashMap<Target, PlatformDescriptor>,
}

impl PlatformRegistry {
    /// Registry for every supported target rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let descriptors = Target::ALL
            .into_iter()
            .map(|target| (target, PlatformDescriptor::from_root(&root, target)))
            .collect();

        Self { root, descriptors }
    }

    /// Registry rooted at `$LOVEBREW_RESOURCES`, falling back to the user's
    /// local data directory.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(default_resources_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get(&self, target: Target) -> Option<&PlatformDescriptor> {
        self.descriptors.get(&target)
    }

    /// Resolves a raw identifier from the configuration.
    pub fn resolve(&self, id: &str) -> Result<&PlatformDescriptor> {
        let target = id.parse::<Target>()?;
        self.get(target)
            .ok_or_else(|| Error::UnknownTarget(id.to_string()))
    }
}

/// `$LOVEBREW_RESOURCES` or `<data-local-dir>/lovebrew/resources`.
pub fn default_resources_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(RESOURCES_ENV) {
        return Ok(PathBuf::from(dir));
    }

    dirs::data_local_dir()
        .map(|dir| dir.join("lovebrew").join("resources"))
        .ok_or_else(|| {
            Error::ConfigInvalid(format!(
                "cannot determine a resources directory; set {RESOURCES_ENV}"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_identifiers_round_trip() {
        for target in Target::ALL {
            assert_eq!(target.id().parse::<Target>().unwrap(), target);
        }
        assert!(matches!(
            "psp".parse::<Target>(),
            Err(Error::UnknownTarget(id)) if id == "psp"
        ));
    }

    #[test]
    fn registry_lays_out_resources_per_target() {
        let registry = PlatformRegistry::new("/res");

        let ctr = registry.resolve("ctr").unwrap();
        assert_eq!(ctr.default_icon, PathBuf::from("/res/ctr/icon.png"));
        assert_eq!(ctr.binary, PathBuf::from("/res/ctr/lovepotion.elf"));
        assert_eq!(ctr.asset_image, PathBuf::from("/res/ctr/files.romfs"));

        let hac = registry.resolve("hac").unwrap();
        assert_eq!(hac.default_icon, PathBuf::from("/res/hac/icon.jpg"));

        let cafe = registry.resolve("cafe").unwrap();
        assert_eq!(cafe.asset_image, PathBuf::from("/res/cafe/content"));
    }

    #[test]
    fn icon_constraints_per_target() {
        assert_eq!(Target::Ctr.icon_dimension(), 48);
        assert_eq!(Target::Hac.icon_dimension(), 256);
        assert_eq!(Target::Cafe.icon_dimension(), 128);
        assert_eq!(Target::Hac.icon_extensions(), &["jpg", "jpeg"]);
        assert_eq!(Target::Cafe.icon_extensions(), &["png"]);
    }

    fn config() -> BuildConfig {
        crate::bundler::BuildConfigBuilder::new()
            .package_settings(crate::bundler::PackageSettings {
                title: "SuperGame".into(),
                author: "SuperAuthor".into(),
                description: "SuperDescription".into(),
                version: "0.1.0".into(),
            })
            .targets(["ctr", "hac", "cafe"])
            .build()
            .unwrap()
    }

    fn steps(target: Target) -> (BuildStep, BuildStep) {
        let registry = PlatformRegistry::new("/res");
        let descriptor = registry.get(target).unwrap();
        let toolchain = Toolchain::in_dir("/tools");
        let build_dir = Path::new("/out").join(target.id());
        let icon = Path::new("/icons/icon");
        (
            descriptor.metadata_step(&config(), &toolchain, &build_dir, icon),
            descriptor.executable_step(&config(), &toolchain, &build_dir, icon),
        )
    }

    #[test]
    fn ctr_steps() {
        let (smdh, exe) = steps(Target::Ctr);

        assert_eq!(smdh.program, PathBuf::from("/tools/smdhtool"));
        assert_eq!(
            smdh.args,
            [
                "--create",
                "SuperGame",
                "SuperDescription - 0.1.0",
                "SuperAuthor",
                "/icons/icon",
                "/out/ctr/SuperGame.smdh",
            ]
        );
        assert_eq!(smdh.output, PathBuf::from("/out/ctr/SuperGame.smdh"));

        assert_eq!(exe.program, PathBuf::from("/tools/3dsxtool"));
        assert_eq!(
            exe.args,
            [
                "/res/ctr/lovepotion.elf",
                "/out/ctr/SuperGame.3dsx",
                "--smdh=/out/ctr/SuperGame.smdh",
                "--romfs=/res/ctr/files.romfs",
            ]
        );
        assert_eq!(exe.output, PathBuf::from("/out/ctr/SuperGame.3dsx"));
    }

    #[test]
    fn hac_steps() {
        let (nacp, exe) = steps(Target::Hac);

        assert_eq!(nacp.program, PathBuf::from("/tools/nacptool"));
        assert_eq!(
            nacp.args,
            [
                "--create",
                "SuperGame",
                "SuperAuthor",
                "0.1.0",
                "/out/hac/SuperGame.nacp",
            ]
        );

        assert_eq!(exe.program, PathBuf::from("/tools/elf2nro"));
        assert_eq!(
            exe.args,
            [
                "/res/hac/lovepotion.elf",
                "/out/hac/SuperGame.nro",
                "--nacp=/out/hac/SuperGame.nacp",
                "--icon=/icons/icon",
                "--romfs=/res/hac/files.romfs",
            ]
        );
    }

    #[test]
    fn cafe_steps() {
        let (rpl, exe) = steps(Target::Cafe);

        assert_eq!(rpl.program, PathBuf::from("/tools/elf2rpl"));
        assert_eq!(
            rpl.args,
            ["/res/cafe/lovepotion.elf", "/out/cafe/SuperGame.rpx"]
        );

        assert_eq!(exe.program, PathBuf::from("/tools/wuhbtool"));
        assert_eq!(
            exe.args,
            [
                "/out/cafe/SuperGame.rpx",
                "/out/cafe/SuperGame.wuhb",
                "--content=/res/cafe/content",
                "--name=SuperGame",
                "--short-name=SuperGame",
                "--author=SuperAuthor",
                "--icon=/icons/icon",
            ]
        );
        assert_eq!(exe.output, PathBuf::from("/out/cafe/SuperGame.wuhb"));
    }
}
