//! # effects-cli
//!
//! 特效会话的 headless 宿主。
//!
//! ## 命令
//!
//! - `run <script>`: 回放手势脚本，每个事件后输出一行合成样式 JSON
//! - `catalog`: 输出当前目录（JSON）
//! - `init-config <path>`: 写出默认配置文件

mod config;
mod script;

use anyhow::Context;
use clap::{Parser, Subcommand};
use effects_runtime::EffectsController;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, info};

use config::StudioConfig;
use script::{ReplayOptions, load_script, replay};

#[derive(Parser, Debug)]
#[command(name = "effects-cli", about = "回放特效手势并输出合成样式")]
struct Cli {
    /// 配置文件路径
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// 覆盖配置中的目录文件
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// 强制镜像
    #[arg(long, conflicts_with = "no_mirror")]
    mirrored: bool,

    /// 强制不镜像
    #[arg(long)]
    no_mirror: bool,

    /// 输出 debug 日志
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// 回放手势脚本
    Run {
        /// 脚本路径（JSON 数组或 JSON Lines）
        script: PathBuf,

        /// 每个事件后呈现的帧数
        #[arg(long, default_value_t = 1)]
        frames: u32,

        /// 遇到被拒绝的事件立即失败
        #[arg(long)]
        strict: bool,
    },
    /// 输出当前目录
    Catalog,
    /// 写出默认配置文件
    InitConfig { path: PathBuf },
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("effects-cli error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let CliCommand::InitConfig { path } = &cli.command {
        StudioConfig::default()
            .save(path)
            .with_context(|| format!("写出配置失败: {}", path.display()))?;
        eprintln!("已写出默认配置: {}", path.display());
        return Ok(());
    }

    let mut config = StudioConfig::load(&cli.config)?;
    if let Some(catalog) = &cli.catalog {
        config.catalog_path = Some(catalog.clone());
    }
    if cli.mirrored {
        config.mirrored = true;
    }
    if cli.no_mirror {
        config.mirrored = false;
    }
    config.validate()?;

    init_logging(&config, cli.verbose);

    let catalog = config.load_catalog()?;
    info!(
        custom = config.catalog_path.is_some(),
        mirrored = config.mirrored,
        "目录加载完成"
    );

    match cli.command {
        CliCommand::Run {
            script,
            frames,
            strict,
        } => {
            let inputs = load_script(&script)?;
            let mut controller =
                EffectsController::new(catalog, config.compositor.clone(), config.mirrored);
            let options = ReplayOptions { frames, strict };
            let mut stdout = std::io::stdout().lock();
            let summary = replay(&mut controller, &config.frame, &inputs, options, &mut stdout)?;
            info!(
                events = summary.events,
                rejected = summary.rejected,
                frames = summary.frames,
                css = %controller.style().to_css(),
                "回放完成"
            );
        }
        CliCommand::Catalog => {
            println!("{}", catalog.to_json_pretty()?);
        }
        CliCommand::InitConfig { .. } => {}
    }

    Ok(())
}

fn init_logging(config: &StudioConfig, verbose: bool) {
    let level = if verbose {
        Level::DEBUG
    } else {
        config.log_level.parse().unwrap_or(Level::INFO)
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
