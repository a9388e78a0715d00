use crate::Result;
use crate::clock::{Clock, SystemClock};
use crate::config::{PartialOptions, ReporterOptions};
use crate::reporter::Reporter;
use crate::reporter::record::{DriverContext, JsonRecord};
use crate::reporter::suspect::mark_suspect_line;
use crate::reporter::types::{RunInfo, RunTimer, SpecResult, StatusCounts, SuiteResult};
use crate::reporter::writer::{ReportLog, ReportWriter, write_json_record};
use crate::utils::make_directory_if_needed;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const JSON_DIR: &str = "JSON";

/// 运行阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    NotStarted,
    Running,
    Done,
}

/// 生成 HTML 报告和逐个 spec JSON 记录的 reporter
///
/// 一个实例对应一次运行，所有状态只属于该实例。
pub struct HtmlReporter {
    options: ReporterOptions,
    run_dir: PathBuf,
    json_dir: Option<PathBuf>,
    writer: ReportWriter,
    clock: Box<dyn Clock>,
    driver: Option<DriverContext>,
    phase: RunPhase,

    sequence: Vec<SpecResult>,
    counts: StatusCounts,
    timer: RunTimer,
    /// spec id -> 开始时间
    starts: HashMap<String, DateTime<Utc>>,
}

impl HtmlReporter {
    /// 使用系统时钟创建 reporter
    pub fn new(options: PartialOptions) -> Result<Self> {
        Self::with_clock(options, SystemClock)
    }

    /// 解析配置并创建输出目录
    ///
    /// 配置错误在任何目录被创建之前返回。
    pub fn with_clock(options: PartialOptions, clock: impl Clock + 'static) -> Result<Self> {
        let mut options = options.resolve()?;

        make_directory_if_needed(&options.path)?;
        // 相对路径按当前目录展开，报告里的 reportPath 总是绝对路径
        let run_dir = std::path::absolute(&options.path)?
            .join(format!("Test_{}", clock.now().timestamp_millis()));
        make_directory_if_needed(&run_dir)?;

        let destination = run_dir.join(format!("{}.html", options.filename));

        let json_dir = if options.save_json {
            let dir = run_dir.join(JSON_DIR);
            make_directory_if_needed(&dir)?;
            Some(dir)
        } else {
            None
        };

        options.report_path = Some(run_dir.clone());
        info!("Writing spec report to {}", destination.display());

        Ok(Self {
            options,
            run_dir,
            json_dir,
            writer: ReportWriter::new(destination),
            clock: Box::new(clock),
            driver: None,
            phase: RunPhase::NotStarted,
            sequence: Vec::new(),
            counts: StatusCounts::new(),
            timer: RunTimer::default(),
            starts: HashMap::new(),
        })
    }

    /// 注入自动化客户端信息，会附加到每条 JSON 记录
    pub fn with_driver_context(mut self, driver: DriverContext) -> Self {
        self.driver = Some(driver);
        self
    }

    pub fn options(&self) -> &ReporterOptions {
        &self.options
    }

    /// 本次运行的目录 `path/Test_<millis>`
    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    pub fn report_file(&self) -> &Path {
        self.writer.destination()
    }

    pub fn json_dir(&self) -> Option<&Path> {
        self.json_dir.as_deref()
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn sequence(&self) -> &[SpecResult] {
        &self.sequence
    }

    pub fn counts(&self) -> &StatusCounts {
        &self.counts
    }

    pub fn timer(&self) -> &RunTimer {
        &self.timer
    }

    /// 把当前完整日志写入报告文件
    pub fn flush(&self) -> Result<()> {
        self.writer.write(&ReportLog {
            options: &self.options,
            timer: &self.timer,
            counts: &self.counts,
            sequence: &self.sequence,
        })
    }

    fn write_record(&self, spec: &SpecResult, started: Option<DateTime<Utc>>) -> Result<()> {
        let Some(dir) = &self.json_dir else {
            return Ok(());
        };

        let record = JsonRecord::build(spec, started, self.driver.as_ref());
        // 没有开始时间时退回到结束时间命名
        let stamp = record
            .timestamp
            .or_else(|| spec.stopped.map(|t| t.timestamp_millis()))
            .unwrap_or_default();

        let path = write_json_record(dir, stamp, &record)?;
        debug!("Spec record written to {}", path.display());
        Ok(())
    }
}

impl Reporter for HtmlReporter {
    fn on_run_start(&mut self, info: &RunInfo) -> Result<()> {
        self.timer.start = Some(self.clock.now());
        self.phase = RunPhase::Running;

        match info.total_specs_defined {
            Some(total) => info!("Run started with {} specs defined", total),
            None => info!("Run started"),
        }
        Ok(())
    }

    fn on_suite_start(&mut self, suite: &SuiteResult) -> Result<()> {
        debug!("Suite started: {}", suite.full_name);
        Ok(())
    }

    fn on_spec_start(&mut self, spec: &SpecResult) -> Result<()> {
        debug!("Spec started: {} ({})", spec.full_name, spec.id);
        // 同一个 id 重复开始时以最后一次为准
        self.starts.insert(spec.id.clone(), self.clock.now());
        Ok(())
    }

    fn on_spec_done(&mut self, mut spec: SpecResult) -> Result<()> {
        let stopped = self.clock.now();
        let started = self.starts.get(&spec.id).copied();

        spec.stopped = Some(stopped);
        spec.prefix = Some(suite_prefix(&spec.full_name, &spec.description));
        spec.duration = started.map(|start| (stopped - start).num_milliseconds());
        if started.is_none() {
            warn!("Spec {} finished without a recorded start", spec.id);
        }

        for failure in &mut spec.failed_expectations {
            mark_suspect_line(failure, self.options.dependency_markers.as_slice());
        }

        debug!(
            "Spec done: {} [{}] {:?}ms",
            spec.full_name, spec.status, spec.duration
        );

        *self.counts.entry(spec.status.clone()).or_insert(0) += 1;
        self.sequence.push(spec);

        if self.options.write_report_each_spec {
            self.flush()?;
        }

        if let Some(spec) = self.sequence.last() {
            self.write_record(spec, started)?;
        }
        Ok(())
    }

    fn on_suite_done(&mut self, suite: &SuiteResult) -> Result<()> {
        debug!("Suite done: {}", suite.full_name);
        Ok(())
    }

    fn on_run_done(&mut self) -> Result<()> {
        self.timer.done = Some(self.clock.now());
        self.phase = RunPhase::Done;
        self.flush()?;

        info!(
            "Run done: {} specs, report at {}",
            self.sequence.len(),
            self.report_file().display()
        );
        Ok(())
    }
}

/// 去掉 full name 末尾的 description，得到所在 suite 路径
///
/// 从后往前找第一个匹配；找不到时原样返回。
fn suite_prefix(full_name: &str, description: &str) -> String {
    match full_name.rfind(description) {
        Some(index) if !description.is_empty() => {
            let mut prefix = String::with_capacity(full_name.len() - description.len());
            prefix.push_str(&full_name[..index]);
            prefix.push_str(&full_name[index + description.len()..]);
            prefix
        }
        _ => full_name.to_string(),
    }
}
