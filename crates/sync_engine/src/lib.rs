//! # Sync Engine
//!
//! 双设备相位对齐引擎。
//!
//! 负责：
//! - 构建 follower 链路指标的 carry-forward 索引
//! - 用双指针合并配对 leader/follower 激活事件（半周期跳过规则）
//! - 为每个配对附加激活时刻的链路指标
//!
//! ## 使用示例
//!
//! ```ignore
//! use sync_engine::{MetricIndex, StreamAligner};
//!
//! let aligner = StreamAligner::new();
//! let alignment = aligner.align(&leader.activations, &follower.activations);
//!
//! let index = MetricIndex::build(follower.metrics.iter().copied());
//! let pairs = aligner.enrich(alignment.pairs, &index);
//! ```

mod aligner;
mod metric_index;

// Re-exports
pub use aligner::{Alignment, StreamAligner};
pub use metric_index::{MetricCursor, MetricIndex};

// Re-export contracts types
pub use contracts::{ActivationEvent, AlignmentStats, LinkMetrics, MetricSample, PairedSample};
