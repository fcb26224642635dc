//! baseline（原文 vs 参照文）と proposed（変換文 vs 参照文）の二条件評価。
pub mod error;
pub mod files;
pub mod input;
pub mod orchestrator;
pub mod record;
pub mod report;
pub mod single;

pub use self::{
    error::{Capability, EvaluationError},
    orchestrator::Evaluator,
    record::{EvaluationRecord, InputRecord},
    report::{EvaluationReport, MetricSummary, SummaryReport},
    single::SingleReport,
};
