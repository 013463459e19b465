//! 分析指标收集模块
//!
//! 基于提取统计、对齐统计和分类结果记录指标。

use contracts::{AlignmentStats, ClassifiedSample, DeviceRole, ExtractionStats};
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};

/// 从 ExtractionStats 记录单个日志流的提取指标
///
/// `activations` 为去重、排序之后最终保留的激活事件数。
pub fn record_extraction(role: DeviceRole, stats: &ExtractionStats, activations: usize) {
    let role = role.as_str();

    counter!("phase_lines_total", "role" => role, "outcome" => "matched")
        .increment(stats.matched_lines as u64);
    counter!("phase_lines_total", "role" => role, "outcome" => "unmatched")
        .increment(stats.unmatched_lines as u64);

    counter!("phase_activations_total", "role" => role, "outcome" => "kept")
        .increment(activations as u64);

    // 无周期上下文而丢弃的激活
    if stats.discarded_without_period > 0 {
        counter!("phase_activations_total", "role" => role, "outcome" => "no_period")
            .increment(stats.discarded_without_period as u64);
    }

    if stats.duplicates_removed > 0 {
        counter!("phase_activations_total", "role" => role, "outcome" => "duplicate")
            .increment(stats.duplicates_removed as u64);
    }
}

/// 记录对齐过程中被跳过的事件与生成的配对数
pub fn record_alignment(stats: &AlignmentStats) {
    let skips = [
        ("leader", stats.skipped_leader),
        ("follower", stats.skipped_follower),
        ("trailing_leader", stats.trailing_leader),
        ("trailing_follower", stats.trailing_follower),
    ];

    for (side, count) in skips {
        if count > 0 {
            counter!("phase_alignment_skips_total", "side" => side).increment(count as u64);
        }
    }

    counter!("phase_pairs_total", "kind" => "matched").increment(stats.matched as u64);
    if stats.skip_pairs > 0 {
        counter!("phase_pairs_total", "kind" => "skip").increment(stats.skip_pairs as u64);
    }
}

/// 记录单个分类结果
pub fn record_classified(sample: &ClassifiedSample) {
    histogram!("phase_error_ms").record(sample.sample.phase_error_ms as f64);
    counter!("phase_status_total", "status" => sample.status.as_str()).increment(1);
}

/// 统计摘要
///
/// 空样本时所有字段为 `None`；标准差至少需要两个样本。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub count: u64,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
            min: stats.min(),
            max: stats.max(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.mean, self.min, self.max) {
            (Some(mean), Some(min), Some(max)) => {
                write!(f, "min={:.3}, max={:.3}, mean={:.3}", min, max, mean)?;
                match self.std_dev {
                    Some(std_dev) => write!(f, ", std={:.3}", std_dev)?,
                    None => write!(f, ", std=N/A")?,
                }
                write!(f, " (n={})", self.count)
            }
            _ => write!(f, "N/A"),
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// 样本方差 (n - 1)
    pub fn variance(&self) -> Option<f64> {
        (self.count >= 2).then(|| self.m2 / (self.count - 1) as f64)
    }

    /// 样本标准差
    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }

    /// 最小值
    pub fn min(&self) -> Option<f64> {
        (self.count > 0).then_some(self.min)
    }

    /// 最大值
    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max)
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary::from(self)
    }
}
