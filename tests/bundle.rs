//! Orchestrator behaviour with a fake tool runner.

use lovebrew_bundler::bundler::{
    BuildConfig, BuildConfigBuilder, BuildStep, BundleOptions, Bundler, Error, FailureKind,
    PackageSettings, PlatformRegistry, Result, Stage, ToolRunner,
};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tempfile::TempDir;

/// Writes every step's output, except for programs listed as missing or
/// silent. Silent programs run but leave no output behind.
#[derive(Default)]
struct FakeTools {
    missing: Vec<&'static str>,
    silent: Vec<&'static str>,
    calls: Arc<Mutex<Vec<BuildStep>>>,
}

impl FakeTools {
    fn without(missing: &[&'static str]) -> Self {
        Self {
            missing: missing.to_vec(),
            ..Default::default()
        }
    }

    fn silent(silent: &[&'static str]) -> Self {
        Self {
            silent: silent.to_vec(),
            ..Default::default()
        }
    }
}

fn programs(calls: &Mutex<Vec<BuildStep>>) -> Vec<String> {
    calls
        .lock()
        .unwrap()
        .iter()
        .map(BuildStep::program_name)
        .collect()
}

impl ToolRunner for FakeTools {
    async fn run(&self, step: &BuildStep) -> Result<()> {
        self.calls.lock().unwrap().push(step.clone());

        let program = step.program_name();
        if self.missing.contains(&program.as_str()) {
            return Err(Error::ProcessLaunchFailure {
                program,
                error: std::io::Error::new(ErrorKind::NotFound, "not found"),
            });
        }

        if !self.silent.contains(&program.as_str()) {
            std::fs::write(&step.output, format!("{program}\n"))?;
        }
        if !step.output.exists() {
            return Err(Error::OutputMissing {
                program,
                output: step.output.clone(),
            });
        }
        Ok(())
    }
}

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let game = dir.path().join("game");
        std::fs::create_dir_all(game.join("gfx")).unwrap();
        std::fs::write(game.join("main.lua"), "function love.draw() end").unwrap();
        image::RgbImage::new(16, 16)
            .save(game.join("gfx/sprite.png"))
            .unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn config(&self, targets: &[&str]) -> BuildConfigBuilder {
        BuildConfigBuilder::new()
            .project_dir(self.path())
            .package_settings(PackageSettings {
                title: "SuperGame".into(),
                author: "SuperAuthor".into(),
                description: "SuperDescription".into(),
                version: "0.1.0".into(),
            })
            .targets(targets.iter().copied())
    }

    fn registry(&self) -> PlatformRegistry {
        PlatformRegistry::new(self.path().join("resources"))
    }

    fn bundler(&self, config: BuildConfig, tools: FakeTools, options: BundleOptions) -> Bundler<FakeTools> {
        Bundler::with_runner(config, self.registry(), tools, options)
    }
}

fn options(output: &Path) -> BundleOptions {
    BundleOptions {
        output_dir: Some(output.to_path_buf()),
        ..Default::default()
    }
}

#[tokio::test]
async fn builds_every_target_in_request_order() {
    let project = Project::new();
    let out = project.path().join("build");
    let bundler = project.bundler(
        project.config(&["hac", "ctr", "cafe"]).build().unwrap(),
        FakeTools::default(),
        options(&out),
    );

    let outcomes = bundler.build().await.unwrap();

    let targets: Vec<_> = outcomes.iter().map(|o| o.target.as_str()).collect();
    assert_eq!(targets, ["hac", "ctr", "cafe"]);
    assert!(outcomes.iter().all(|o| o.success), "{outcomes:?}");

    assert_eq!(
        outcomes[1].artifact.as_deref(),
        Some(out.join("ctr/SuperGame.3dsx").as_path())
    );
    assert_eq!(outcomes[1].checksum.as_ref().map(String::len), Some(64));

    for (dir, exe, tool) in [
        ("ctr", "SuperGame.3dsx", "3dsxtool"),
        ("hac", "SuperGame.nro", "elf2nro"),
        ("cafe", "SuperGame.wuhb", "wuhbtool"),
    ] {
        let build_dir = out.join(dir);
        let bytes = std::fs::read(build_dir.join(exe)).unwrap();
        assert!(bytes.starts_with(format!("{tool}\n").as_bytes()));
        // zip end-of-central-directory record follows the executable
        assert!(bytes.windows(4).any(|w| w == b"PK\x05\x06"));

        assert!(!build_dir.join("SuperGame-bundle.zip").exists());
        assert!(!build_dir.join("game").exists());
    }

    // the source tree is never touched
    assert!(project.path().join("game/gfx/sprite.png").exists());
}

#[tokio::test]
async fn staged_assets_hold_converted_media_only() {
    let project = Project::new();
    let out = project.path().join("build");
    let tools = FakeTools::default();
    let bundler = project.bundler(
        project.config(&["ctr"]).build().unwrap(),
        tools,
        BundleOptions {
            keep_intermediates: true,
            ..options(&out)
        },
    );

    let outcomes = bundler.build().await.unwrap();
    assert!(outcomes[0].success, "{outcomes:?}");

    let staged = out.join("ctr/game");
    assert!(staged.join("gfx/sprite.t3x").exists());
    assert!(!staged.join("gfx/sprite.png").exists());

    let file = std::fs::File::open(out.join("ctr/SuperGame-bundle.zip")).unwrap();
    let archive = zip::ZipArchive::new(file).unwrap();
    let mut names: Vec<_> = archive.file_names().map(String::from).collect();
    names.sort();
    assert_eq!(names, ["gfx/sprite.t3x", "main.lua"]);
}

#[tokio::test]
async fn missing_tool_fails_only_its_target() {
    let project = Project::new();
    let out = project.path().join("build");
    let bundler = project.bundler(
        project.config(&["ctr", "hac", "cafe"]).build().unwrap(),
        FakeTools::without(&["3dsxtool"]),
        options(&out),
    );

    let outcomes = bundler.build().await.unwrap();

    let ctr = &outcomes[0];
    assert!(!ctr.success);
    assert_eq!(ctr.kind, Some(FailureKind::ProcessLaunchFailure));
    assert_eq!(ctr.failed_stage, Some(Stage::PackagingExecutable));
    assert!(ctr.reason.as_deref().unwrap().contains("3dsxtool"));
    assert!(ctr.artifact.is_none());

    assert!(outcomes[1].success && outcomes[2].success, "{outcomes:?}");
}

#[tokio::test]
async fn executable_left_over_from_an_earlier_build_does_not_count() {
    let project = Project::new();
    let out = project.path().join("build");
    std::fs::create_dir_all(out.join("ctr")).unwrap();
    std::fs::write(out.join("ctr/SuperGame.3dsx"), "OLD-EXE").unwrap();

    let bundler = project.bundler(
        project.config(&["ctr"]).build().unwrap(),
        FakeTools::silent(&["3dsxtool"]),
        options(&out),
    );

    let outcomes = bundler.build().await.unwrap();

    let ctr = &outcomes[0];
    assert!(!ctr.success);
    assert_eq!(ctr.kind, Some(FailureKind::OutputMissing));
    assert_eq!(ctr.failed_stage, Some(Stage::PackagingExecutable));
    assert!(ctr.artifact.is_none());
    assert!(!out.join("ctr/SuperGame.3dsx").exists());
}

#[tokio::test]
async fn zero_targets_is_an_error_before_any_output() {
    let project = Project::new();
    let out = project.path().join("build");
    let tools = FakeTools::default();
    let bundler = project.bundler(project.config(&[]).build().unwrap(), tools, options(&out));

    let err = bundler.build().await.unwrap_err();

    assert!(matches!(err, Error::NoTargetsConfigured));
    assert!(!out.exists());
}

#[tokio::test]
async fn unknown_target_is_skipped() {
    let project = Project::new();
    let out = project.path().join("build");
    let bundler = project.bundler(
        project.config(&["psp", "hac"]).build().unwrap(),
        FakeTools::default(),
        options(&out),
    );

    let outcomes = bundler.build().await.unwrap();

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].target, "psp");
    assert_eq!(outcomes[0].kind, Some(FailureKind::UnknownTarget));
    assert_eq!(outcomes[0].failed_stage, None);
    assert!(outcomes[1].success);
    assert!(!out.join("psp").exists());
}

#[tokio::test]
async fn invalid_icon_fails_before_any_tool_runs() {
    let project = Project::new();
    let out = project.path().join("build");
    let icon = project.path().join("icon32.png");
    image::RgbImage::new(32, 32).save(&icon).unwrap();

    let tools = FakeTools::default();
    let calls = Arc::clone(&tools.calls);
    let bundler = project.bundler(
        project
            .config(&["ctr"])
            .icon("ctr", "icon32.png")
            .build()
            .unwrap(),
        tools,
        BundleOptions {
            merge_assets: false,
            ..options(&out)
        },
    );

    let outcomes = bundler.build().await.unwrap();

    assert_eq!(outcomes[0].kind, Some(FailureKind::InvalidIconDimensions));
    assert_eq!(outcomes[0].failed_stage, Some(Stage::ValidatingIcon));
    assert!(outcomes[0].reason.as_deref().unwrap().contains("48x48"));
    assert!(programs(&calls).is_empty());
}

#[tokio::test]
async fn custom_icon_is_passed_to_the_tools() {
    let project = Project::new();
    let out = project.path().join("build");
    let icon = project.path().join("icons/icon256.jpg");
    std::fs::create_dir_all(icon.parent().unwrap()).unwrap();
    image::RgbImage::new(256, 256).save(&icon).unwrap();

    let tools = FakeTools::default();
    let bundler = project.bundler(
        project
            .config(&["hac"])
            .icon("hac", "icons/icon256.jpg")
            .build()
            .unwrap(),
        tools,
        BundleOptions {
            merge_assets: false,
            ..options(&out)
        },
    );

    let outcomes = bundler.build().await.unwrap();
    assert!(outcomes[0].success, "{outcomes:?}");

    let bytes = std::fs::read(out.join("hac/SuperGame.nro")).unwrap();
    assert_eq!(bytes, b"elf2nro\n");
}

#[tokio::test]
async fn parallel_build_keeps_request_order() {
    let project = Project::new();
    let out = project.path().join("build");
    let bundler = project.bundler(
        project.config(&["cafe", "psp", "ctr", "hac"]).build().unwrap(),
        FakeTools::without(&["nacptool"]),
        BundleOptions {
            parallel: true,
            ..options(&out)
        },
    );

    let outcomes = bundler.build().await.unwrap();

    let summary: Vec<_> = outcomes
        .iter()
        .map(|o| (o.target.as_str(), o.success))
        .collect();
    assert_eq!(
        summary,
        [("cafe", true), ("psp", false), ("ctr", true), ("hac", false)]
    );
    assert_eq!(outcomes[3].failed_stage, Some(Stage::PackagingMetadata));
}

#[tokio::test]
async fn strict_media_fails_on_bad_texture() {
    let project = Project::new();
    let out = project.path().join("build");
    image::RgbImage::new(2048, 8)
        .save(project.path().join("game/gfx/huge.png"))
        .unwrap();

    let lenient = project.bundler(
        project.config(&["ctr"]).build().unwrap(),
        FakeTools::default(),
        options(&out),
    );
    assert!(lenient.build().await.unwrap()[0].success);

    let strict = project.bundler(
        project.config(&["ctr"]).build().unwrap(),
        FakeTools::default(),
        BundleOptions {
            strict_media: true,
            ..options(&out)
        },
    );
    let outcomes = strict.build().await.unwrap();
    assert!(!outcomes[0].success);
    assert_eq!(outcomes[0].failed_stage, Some(Stage::MergingAssets));
    assert!(outcomes[0].reason.as_deref().unwrap().contains("huge.png"));
}

#[tokio::test]
async fn without_merge_no_converter_runs() {
    let project = Project::new();
    let out = project.path().join("build");
    let bundler = project.bundler(
        project.config(&["ctr"]).build().unwrap(),
        FakeTools::default(),
        BundleOptions {
            merge_assets: false,
            ..options(&out)
        },
    );

    let outcomes = bundler.build().await.unwrap();
    assert!(outcomes[0].success);
    assert_eq!(
        std::fs::read(out.join("ctr/SuperGame.3dsx")).unwrap(),
        b"3dsxtool\n"
    );
}

#[tokio::test]
async fn tool_calls_follow_the_packaging_chain() {
    let project = Project::new();
    let out = project.path().join("build");

    for (target, expected) in [
        ("ctr", ["smdhtool", "3dsxtool", "tex3ds"]),
        ("hac", ["nacptool", "elf2nro", "tex3ds"]),
        ("cafe", ["elf2rpl", "wuhbtool", "tex3ds"]),
    ] {
        let tools = FakeTools::default();
        let calls = Arc::clone(&tools.calls);
        let bundler = project.bundler(
            project.config(&[target]).build().unwrap(),
            tools,
            options(&out),
        );

        bundler.build().await.unwrap();
        assert_eq!(programs(&calls), expected);
    }
}

#[test]
fn default_output_dir_is_the_project() {
    let project = Project::new();
    let bundler = project.bundler(
        project.config(&["ctr"]).build().unwrap(),
        FakeTools::default(),
        BundleOptions::default(),
    );
    assert_eq!(bundler.output_dir(), PathBuf::from(project.path()));
}
