// src/monitor/mod.rs
//! Session side of the monitor: history, display frames, export and the
//! polling driver

pub mod display;
pub mod driver;
pub mod export;
pub mod history;

pub use display::{DisplaySnapshot, LogRenderer, PoseIndicators, Renderer};
pub use driver::Monitor;
pub use export::{export_history, write_csv, ExportError, ExportSummary};
pub use history::SessionHistory;
