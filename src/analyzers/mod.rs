//! Survey aggregation pipeline.
//!
//! Every chart runs the same steps over a loaded [`crate::parser::Dataset`]:
//! clean the rows on the chart's required columns, normalize category labels,
//! then count, group, bin or average. The results are plain serializable
//! structures handed to the chart renderers.

pub mod aggregate;
pub mod analyzer;
pub mod averages;
pub mod bins;
pub mod categorical;
pub mod clean;
pub mod labels;
pub mod two_level;
pub mod types;
pub mod utility;
