//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-runtime`: 运行 effects-runtime 覆盖率
//! - `cov-workspace`: 运行 workspace 覆盖率
//! - `asset-check`: 校验目录文件与手势脚本

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use effects_runtime::{Catalog, CompositorConfig, EffectsController, parse_script};
use walkdir::WalkDir;
use xshell::{Shell, cmd};

#[derive(Parser)]
#[command(name = "xtask", about = "开发辅助工具")]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand)]
enum Task {
    /// 运行 fmt、clippy、test 门禁检查
    CheckAll,
    /// 运行 effects-runtime 覆盖率报告
    CovRuntime,
    /// 运行 workspace 覆盖率报告
    CovWorkspace,
    /// 校验 assets/ 下的目录文件与手势脚本
    AssetCheck {
        /// 资源根目录
        #[arg(default_value = "assets")]
        root: PathBuf,
    },
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    match cli.command {
        Task::CheckAll => {
            eprintln!("\n==> cargo fmt --all -- --check");
            cmd!(sh, "cargo fmt --all -- --check").run()?;

            eprintln!("\n==> cargo clippy --workspace --all-targets");
            cmd!(sh, "cargo clippy --workspace --all-targets").run()?;

            eprintln!("\n==> cargo test --workspace");
            cmd!(sh, "cargo test --workspace").run()?;
        }
        Task::CovRuntime => {
            ensure_cargo_llvm_cov_available(&sh)?;

            eprintln!("\n==> cargo llvm-cov -p effects-runtime --html");
            cmd!(sh, "cargo llvm-cov -p effects-runtime --all-features --html").run()?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        Task::CovWorkspace => {
            ensure_cargo_llvm_cov_available(&sh)?;

            // 排除工具 crate，以免稀释信号
            eprintln!("\n==> cargo llvm-cov --workspace --exclude xtask --html");
            cmd!(
                sh,
                "cargo llvm-cov --workspace --exclude xtask --all-features --html"
            )
            .run()?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        Task::AssetCheck { root } => asset_check(&root)?,
    }

    Ok(())
}

fn ensure_cargo_llvm_cov_available(sh: &Shell) -> anyhow::Result<()> {
    if cmd!(sh, "cargo llvm-cov --version").quiet().run().is_err() {
        anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        );
    }
    Ok(())
}

//=============================================================================
// asset-check 命令实现
//=============================================================================

/// 检查结果
#[derive(Default)]
struct AssetCheckResult {
    catalogs_checked: usize,
    scripts_checked: usize,
    errors: Vec<String>,
}

/// 校验目录文件（`catalogs/*.json`）与手势脚本（`scripts/*.json|*.jsonl`）
///
/// 脚本在内置目录上严格回放：任何被拒绝的事件都算错误。
fn asset_check(root: &Path) -> anyhow::Result<()> {
    if !root.exists() {
        anyhow::bail!(
            "资源目录不存在: {}\n请在 workspace 根目录运行，或指定资源路径",
            root.display()
        );
    }

    let mut result = AssetCheckResult::default();

    for file in collect_files(&root.join("catalogs"), &["json"]) {
        result.catalogs_checked += 1;
        let checked = std::fs::read_to_string(&file)
            .map_err(anyhow::Error::from)
            .and_then(|json| Catalog::from_json(&json).map_err(anyhow::Error::from));
        if let Err(e) = checked {
            result.errors.push(format!("{}: {e:#}", file.display()));
        }
    }

    let catalog = Catalog::global();
    for file in collect_files(&root.join("scripts"), &["json", "jsonl"]) {
        result.scripts_checked += 1;
        if let Err(e) = replay_script(&file, catalog.clone()) {
            result.errors.push(format!("{}: {e:#}", file.display()));
        }
    }

    eprintln!("─────────────────────────────────────────────────────");
    eprintln!(
        "检查完成: {} 个目录文件, {} 个脚本",
        result.catalogs_checked, result.scripts_checked
    );
    for error in &result.errors {
        eprintln!("[ERROR] {error}");
    }

    if result.errors.is_empty() {
        eprintln!("✅ 检查通过，无错误");
        Ok(())
    } else {
        anyhow::bail!("资源检查发现 {} 个错误", result.errors.len())
    }
}

/// 收集目录下指定扩展名的文件（排序后返回）
fn collect_files(dir: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    let mut files: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.contains(&ext))
        })
        .collect();
    files.sort();
    files
}

/// 解析脚本并在新控制器上严格回放
fn replay_script(file: &Path, catalog: Arc<Catalog>) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)?;
    let inputs = parse_script(&text)?;

    let mut controller = EffectsController::new(catalog, CompositorConfig::default(), false);
    for (step, input) in inputs.iter().enumerate() {
        controller
            .handle(input)
            .map_err(|e| anyhow::anyhow!("第 {step} 个事件被拒绝: {e}"))?;
    }
    Ok(())
}
