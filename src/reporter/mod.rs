pub mod html;
pub mod record;
pub mod suspect;
pub mod types;
pub mod writer;

pub use html::{HtmlReporter, RunPhase};
pub use record::{DriverContext, JsonRecord, RecordText};
pub use types::{Expectation, RunInfo, RunTimer, SpecResult, SpecStatus, StatusCounts, SuiteResult};
pub use writer::ReportWriter;

use crate::Result;

/// 测试运行器的生命周期回调
///
/// 运行器按顺序同步调用：
/// `on_run_start` → (`on_suite_start` → `on_spec_start` → `on_spec_done` → `on_suite_done`)* → `on_run_done`
pub trait Reporter {
    fn on_run_start(&mut self, info: &RunInfo) -> Result<()>;

    fn on_suite_start(&mut self, _suite: &SuiteResult) -> Result<()> {
        Ok(())
    }

    fn on_spec_start(&mut self, spec: &SpecResult) -> Result<()>;

    fn on_spec_done(&mut self, spec: SpecResult) -> Result<()>;

    fn on_suite_done(&mut self, _suite: &SuiteResult) -> Result<()> {
        Ok(())
    }

    fn on_run_done(&mut self) -> Result<()>;
}
