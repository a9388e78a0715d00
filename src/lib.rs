pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod logger;
pub mod reporter;
pub mod utils;

// Re-export commonly used types
pub use config::{ConfigLoader, PartialOptions, ReporterOptions};
pub use error::{Result, SpecReportError};
pub use reporter::{DriverContext, HtmlReporter, Reporter, SpecResult, SpecStatus};
