//! Hole Depth Estimator Common Library
//!
//! CLIとデスクトップビューアで共有される型とユーティリティ

pub mod types;
pub mod layout;
pub mod error;
pub mod parser;
pub mod prompts;
pub mod report;

pub use types::{DepthEstimate, Interpretation};
pub use layout::{ReportField, REPORT_FIELDS};
pub use error::ParseFailure;
pub use parser::{interpret, interpret_response, strip_wrapper_literals};
pub use prompts::DEPTH_ESTIMATION_PROMPT;
pub use report::{render, render_failure, render_markdown, render_text, ReportStyle};
