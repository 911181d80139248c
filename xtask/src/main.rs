//! XTask - build and release automation for Hidayah
//!
//! # Usage
//! ```sh
//! cargo xtask dist-web        # Build the WASM compass package
//! cargo xtask dev-web         # Build and write a compass test page
//! cargo xtask check-all       # Test every crate with every feature set
//! cargo xtask publish-crates  # Publish to crates.io
//! cargo xtask publish-npm     # Publish the WASM package to NPM
//! ```

use anyhow::{Context, Result, bail};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

/// NPM package name for the WASM build.
const NPM_NAME: &str = "@hidayah/qibla";

/// wasm-pack output file stem.
const WASM_OUT_NAME: &str = "hidayah";

/// Publish order: leaves first, facade last. `(package, directory under crates/)`.
const PUBLISH_ORDER: &[(&str, &str)] = &[
    ("hidayah-types", "hidayah-types"),
    ("hidayah-qibla", "hidayah-qibla"),
    ("hidayah-calendar", "hidayah-calendar"),
    ("hidayah-network", "hidayah-network"),
    ("hidayah-core", "hidayah_core"),
    ("hidayah", "hidayah"),
];

/// Feature sets exercised by `check-all`.
const FEATURE_MATRIX: &[&str] = &["", "async", "async,local-geo"];

enum Task {
    DistWeb,
    DevWeb,
    CheckAll,
    BuildAll,
    SyncVersions,
    PublishCrates,
    PublishNpm,
    PublishAll,
    Help,
}

impl Task {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "dist-web" => Task::DistWeb,
            "dev-web" => Task::DevWeb,
            "check-all" => Task::CheckAll,
            "build-all" => Task::BuildAll,
            "sync-versions" => Task::SyncVersions,
            "publish-crates" => Task::PublishCrates,
            "publish-npm" => Task::PublishNpm,
            "publish-all" => Task::PublishAll,
            "-h" | "--help" | "help" => Task::Help,
            _ => return None,
        })
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(first) = args.first() else {
        print_usage();
        return Ok(());
    };
    let dry_run = args.iter().any(|a| a == "--dry-run" || a == "-n");

    let Some(task) = Task::parse(first) else {
        eprintln!("❌ Unknown command: {}", first);
        print_usage();
        std::process::exit(1);
    };

    let ws = Workspace::locate()?;
    match task {
        Task::DistWeb => ws.dist_web(),
        Task::DevWeb => ws.dev_web(),
        Task::CheckAll => ws.check_all(),
        Task::BuildAll => ws.build_all(),
        Task::SyncVersions => ws.sync_versions(),
        Task::PublishCrates => ws.publish_crates(dry_run),
        Task::PublishNpm => ws.publish_npm(dry_run),
        Task::PublishAll => {
            ws.publish_crates(dry_run)?;
            ws.publish_npm(dry_run)
        }
        Task::Help => {
            print_usage();
            Ok(())
        }
    }
}

fn print_usage() {
    println!(
        r#"
🧭 Hidayah XTask

USAGE:
    cargo xtask <COMMAND> [OPTIONS]

BUILD COMMANDS:
    dist-web        Build the WASM compass (web + nodejs targets)
                    Output: dist/web/, pkg/
    dev-web         dist-web, plus a compass test page in dist/dev/
    check-all       Run workspace tests for every feature set
    build-all       sync-versions, release build, dist-web
    sync-versions   Copy the workspace version into pkg/package.json

PUBLISH COMMANDS:
    publish-crates  Publish all crates to crates.io
    publish-npm     Publish pkg/ to NPM
    publish-all     Both of the above

OPTIONS:
    --dry-run, -n   Validate without actually publishing
"#
    );
}

struct Workspace {
    root: PathBuf,
}

impl Workspace {
    fn locate() -> Result<Self> {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .context("xtask is not inside a workspace")?
            .to_path_buf();
        Ok(Self { root })
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Runs `program` in `dir` (the workspace root when `None`), inheriting stdio.
    fn run(&self, dir: Option<&Path>, program: &str, args: &[&str]) -> Result<()> {
        let dir = dir.unwrap_or(&self.root);
        println!("  → [{}] {} {}", dir.display(), program, args.join(" "));

        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.args(["/C", program]);
            c
        } else {
            Command::new(program)
        };
        let status = cmd
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| format!("Failed to start: {} {}", program, args.join(" ")))?;

        if !status.success() {
            bail!("'{}' failed with exit code {:?}", program, status.code());
        }
        Ok(())
    }

    fn version(&self) -> Result<String> {
        let manifest = fs::read_to_string(self.path("Cargo.toml"))?;
        manifest
            .lines()
            .skip_while(|l| l.trim() != "[workspace.package]")
            .find_map(|l| {
                let (key, value) = l.split_once('=')?;
                (key.trim() == "version").then(|| value.trim().trim_matches('"').to_string())
            })
            .context("no version under [workspace.package]")
    }

    fn sync_versions(&self) -> Result<()> {
        let version = self.version()?;
        println!("🔄 Syncing version {}...", version);
        set_json_field(&self.path("pkg/package.json"), "version", &version)?;
        println!("✅ Version sync complete!");
        Ok(())
    }

    fn dist_web(&self) -> Result<()> {
        println!("\n🕸️  Building WASM compass...\n");
        let wasm_dir = self.path("bindings/hidayah_wasm");

        if !command_exists("wasm-pack") {
            println!("  ⚠️ wasm-pack not found. Installing...");
            self.run(None, "cargo", &["install", "wasm-pack"])?;
        }

        for (target, out) in [("web", "dist/web"), ("nodejs", "pkg")] {
            let out_dir = self.path(out).to_string_lossy().into_owned();
            println!("  🏗️  wasm-pack --target {}", target);
            self.run(
                Some(&wasm_dir),
                "wasm-pack",
                &[
                    "build",
                    "--target",
                    target,
                    "--out-dir",
                    out_dir.as_str(),
                    "--out-name",
                    WASM_OUT_NAME,
                ],
            )?;
        }

        let pkg_json = self.path("pkg/package.json");
        set_json_field(&pkg_json, "name", NPM_NAME)?;
        for doc in ["README.md", "LICENSE"] {
            copy_if_present(&self.path(doc), &self.path("pkg").join(doc))?;
        }

        println!("\n✅ WASM build complete! (dist/web/, pkg/)");
        Ok(())
    }

    fn dev_web(&self) -> Result<()> {
        self.dist_web()?;
        let dev = self.path("dist/dev");
        fs::create_dir_all(&dev)?;

        for entry in fs::read_dir(self.path("dist/web"))? {
            let entry = entry?;
            if entry.path().is_file() {
                fs::copy(entry.path(), dev.join(entry.file_name()))?;
            }
        }
        fs::write(dev.join("index.html"), COMPASS_PAGE)?;

        println!("\n✅ Compass page ready in dist/dev/");
        println!("   Serve it over https (sensors need a secure context), e.g.:");
        println!("   python -m http.server 8080 -d dist/dev");
        Ok(())
    }

    fn check_all(&self) -> Result<()> {
        println!("\n🧪 Testing feature matrix...\n");
        for features in FEATURE_MATRIX {
            let args = if features.is_empty() {
                vec!["test", "--workspace", "--exclude", "hidayah-wasm"]
            } else {
                vec!["test", "-p", "hidayah", "--features", features]
            };
            self.run(None, "cargo", &args)?;
        }
        println!("\n✅ All feature sets pass!");
        Ok(())
    }

    fn build_all(&self) -> Result<()> {
        self.sync_versions()?;
        println!("\n🦀 Building Rust (release)...");
        self.run(None, "cargo", &["build", "--release", "-p", "hidayah", "--features", "async"])?;
        self.dist_web()?;
        println!("\n✅ All builds complete! (target/release, dist/web/, pkg/)");
        Ok(())
    }

    fn publish_crates(&self, dry_run: bool) -> Result<()> {
        println!("\n📦 Publishing crates to crates.io...\n");

        for (name, dir) in PUBLISH_ORDER {
            let mut args = vec!["publish"];
            if dry_run {
                args.push("--dry-run");
            }
            let output = Command::new("cargo")
                .args(&args)
                .current_dir(self.path("crates").join(dir))
                .output()
                .with_context(|| format!("Failed to run cargo publish for {}", name))?;

            let stderr = String::from_utf8_lossy(&output.stderr);
            if output.status.success() {
                println!("  ✅ {}", name);
            } else if stderr.contains("already exists") {
                println!("  ⏭️  {} already published", name);
                continue;
            } else {
                eprintln!("{}", String::from_utf8_lossy(&output.stdout));
                eprintln!("{}", stderr);
                bail!("Failed to publish {}", name);
            }

            if !dry_run {
                println!("  ⏳ Waiting for the crates.io index...");
                std::thread::sleep(Duration::from_secs(30));
            }
        }
        Ok(())
    }

    fn publish_npm(&self, dry_run: bool) -> Result<()> {
        let pkg = self.path("pkg");
        if !pkg.join(format!("{}_bg.wasm", WASM_OUT_NAME)).exists() {
            println!("  ⚠️ WASM not built. Building first...");
            self.dist_web()?;
        }
        let mut args = vec!["publish", "--access", "public"];
        if dry_run {
            args.push("--dry-run");
        }
        self.run(Some(&pkg), "npm", &args)?;
        println!("\n✅ NPM {}!", if dry_run { "validation complete" } else { "publish complete" });
        Ok(())
    }
}

fn command_exists(program: &str) -> bool {
    let locator = if cfg!(windows) { "where" } else { "which" };
    Command::new(locator)
        .arg(program)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

fn copy_if_present(src: &Path, dst: &Path) -> Result<()> {
    if src.exists() {
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(src, dst)?;
    }
    Ok(())
}

/// Rewrites the first top-level `"field": "..."` line of a JSON manifest.
fn set_json_field(path: &Path, field: &str, value: &str) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let key = format!("\"{}\"", field);
    let mut done = false;
    let updated: Vec<String> = fs::read_to_string(path)?
        .lines()
        .map(|line| {
            if !done && line.trim_start().starts_with(&key) {
                done = true;
                let indent = &line[..line.len() - line.trim_start().len()];
                let comma = if line.trim_end().ends_with(',') { "," } else { "" };
                format!("{}{}: \"{}\"{}", indent, key, value, comma)
            } else {
                line.to_string()
            }
        })
        .collect();
    fs::write(path, updated.join("\n"))?;
    println!("  ✅ {} {} = {}", path.display(), field, value);
    Ok(())
}

const COMPASS_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Hidayah - Qibla Compass</title>
    <style>
        body { font-family: system-ui, sans-serif; max-width: 480px; margin: 2rem auto; text-align: center; }
        h1 { color: #1a5f2a; }
        #dial { width: 260px; height: 260px; margin: 2rem auto; border: 4px solid #1a5f2a; border-radius: 50%; position: relative; }
        #needle { position: absolute; left: 50%; top: 10%; width: 6px; height: 40%; margin-left: -3px; background: #1a5f2a; transform-origin: 50% 100%; transition: transform 0.3s; }
        #needle.hidden { visibility: hidden; }
        #status { color: #555; }
        button { padding: 0.5rem 1rem; font-size: 1rem; background: #1a5f2a; color: white; border: none; cursor: pointer; }
    </style>
</head>
<body>
    <h1>🕋 Qibla</h1>
    <button id="start">Start compass</button>
    <div id="dial"><div id="needle" class="hidden"></div></div>
    <p id="status">Waiting for location…</p>

    <script type="module">
        import init, { QiblaCompass } from './hidayah.js';

        await init();
        const compass = new QiblaCompass(true);
        const needle = document.getElementById('needle');
        const status = document.getElementById('status');

        function render() {
            const angle = compass.visibleAngle();
            needle.classList.toggle('hidden', angle === undefined);
            if (angle !== undefined) needle.style.transform = `rotate(${angle}deg)`;
        }

        navigator.geolocation.getCurrentPosition(
            (p) => {
                const bearing = compass.setLocation(p.coords.latitude, p.coords.longitude);
                status.textContent = `Qibla bearing ${bearing.toFixed(1)}°`;
                render();
            },
            (e) => { status.textContent = `Location unavailable: ${e.message}`; },
        );

        document.getElementById('start').onclick = async () => {
            if (typeof DeviceOrientationEvent?.requestPermission === 'function') {
                await DeviceOrientationEvent.requestPermission();
            }
            window.addEventListener('deviceorientation', (e) => {
                compass.onOrientation(e.alpha);
                render();
            });
        };
    </script>
</body>
</html>"#;
