use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};
use specreport::clock::ReplayClock;
use specreport::reporter::{HtmlReporter, Reporter, RunPhase, SpecStatus};
use specreport::{ConfigLoader, DriverContext, PartialOptions};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 回放 NDJSON 生命周期事件流并生成报告
    Replay(ReplayArgs),
}

#[derive(Args)]
pub struct ReplayArgs {
    /// 事件文件，`-` 表示标准输入
    #[arg(default_value = "-")]
    pub input: String,

    /// 配置文件，默认查找 specreport.toml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 报告根目录
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// 报告文件名（不含 .html）
    #[arg(long)]
    pub filename: Option<String>,

    #[arg(long)]
    pub title: Option<String>,

    /// 不写逐个 spec 的 JSON 记录
    #[arg(long)]
    pub no_json: bool,

    /// 只在运行结束时写报告
    #[arg(long)]
    pub final_only: bool,

    #[arg(long)]
    pub platform: Option<String>,

    #[arg(long)]
    pub session_id: Option<String>,

    #[arg(long)]
    pub browser_name: Option<String>,

    #[arg(long)]
    pub browser_version: Option<String>,
}

impl ReplayArgs {
    /// CLI 上显式给出的配置，优先级最高
    fn overrides(&self) -> PartialOptions {
        PartialOptions {
            path: self.path.clone(),
            filename: self.filename.clone(),
            title: self.title.clone(),
            save_json: self.no_json.then_some(false),
            write_report_each_spec: self.final_only.then_some(false),
            ..PartialOptions::default()
        }
    }

    fn driver_context(&self) -> Option<DriverContext> {
        let driver = DriverContext {
            platform_name: self.platform.clone(),
            browser_name: self.browser_name.clone(),
            browser_version: self.browser_version.clone(),
            session_id: self.session_id.clone(),
        };
        (!driver.is_empty()).then_some(driver)
    }

    fn open_input(&self) -> Result<Box<dyn BufRead>> {
        if self.input == "-" {
            return Ok(Box::new(io::stdin().lock()));
        }
        let file = File::open(&self.input)
            .with_context(|| format!("Failed to open event stream: {}", self.input))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

pub fn run_replay(args: ReplayArgs) -> Result<()> {
    let base = match &args.config {
        Some(path) => ConfigLoader::load_from_path(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => ConfigLoader::find_and_load()?,
    };
    let options = base.merge(args.overrides());

    // 事件带时间戳时由回放驱动时钟
    let clock = ReplayClock::new();
    let mut reporter = HtmlReporter::with_clock(options, clock.clone())?;
    if let Some(driver) = args.driver_context() {
        reporter = reporter.with_driver_context(driver);
    }

    let input = args.open_input()?;
    specreport::events::replay_with_clock(input, &mut reporter, &clock)?;

    // 事件流没有 run_done 时补一次最终写入
    if reporter.phase() != RunPhase::Done {
        tracing::warn!("Event stream ended before run_done, flushing report");
        reporter.on_run_done()?;
    }

    print_summary(&reporter);
    Ok(())
}

/// 打印按状态统计的摘要
fn print_summary(reporter: &HtmlReporter) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Status", "Specs"]);

    for (status, count) in reporter.counts() {
        let color = match status {
            SpecStatus::Passed => Color::Green,
            SpecStatus::Failed | SpecStatus::Other(_) => Color::Red,
            _ => Color::Yellow,
        };
        table.add_row(vec![
            Cell::new(status).fg(color),
            Cell::new(count).add_attribute(Attribute::Bold),
        ]);
    }

    println!("{}", table);

    let failed = reporter
        .counts()
        .get(&SpecStatus::Failed)
        .copied()
        .unwrap_or(0);
    let total = reporter.sequence().len();
    if failed == 0 {
        println!("  {}: {} total", "Specs".bold(), total.to_string().green());
    } else {
        println!(
            "  {}: {} failed, {} total",
            "Specs".bold(),
            failed.to_string().red(),
            total
        );
    }
    println!(
        "  {}: {}",
        "Report".bold(),
        reporter.report_file().display().to_string().cyan()
    );
}
