//! 配置校验模块
//!
//! 校验规则：
//! - 各字段声明的取值范围（contracts 上的 `validator` derive）
//! - classifier.good_ms <= classifier.warning_ms
//! - 弱信号阈值必须是有限的 dBm 值

use contracts::{AnalysisConfig, ContractError};
use ::validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// 校验 AnalysisConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &AnalysisConfig) -> Result<(), ContractError> {
    validate_field_ranges(config)?;
    validate_classifier(config)?;
    validate_correlation(config)?;
    Ok(())
}

/// 应用 derive 生成的范围规则
fn validate_field_ranges(config: &AnalysisConfig) -> Result<(), ContractError> {
    let Err(errors) = config.validate() else {
        return Ok(());
    };

    let mut failures = Vec::new();
    collect_failures("", &errors, &mut failures);
    failures.sort();

    match failures.into_iter().next() {
        Some((field, message)) => Err(ContractError::config_validation(field, message)),
        None => Err(ContractError::config_validation("config", errors.to_string())),
    }
}

fn collect_failures(prefix: &str, errors: &ValidationErrors, out: &mut Vec<(String, String)>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("value out of range ({})", error.code));
                    out.push((path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_failures(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    collect_failures(&format!("{path}[{idx}]"), inner, out);
                }
            }
        }
    }
}

/// 校验状态阈值
fn validate_classifier(config: &AnalysisConfig) -> Result<(), ContractError> {
    let thresholds = &config.classifier;
    if thresholds.good_ms > thresholds.warning_ms {
        return Err(ContractError::config_validation(
            "classifier.good_ms / classifier.warning_ms",
            format!(
                "good_ms ({}) must be <= warning_ms ({})",
                thresholds.good_ms, thresholds.warning_ms
            ),
        ));
    }
    Ok(())
}

/// 校验相关性阈值
fn validate_correlation(config: &AnalysisConfig) -> Result<(), ContractError> {
    let weak = config.correlation.weak_signal_dbm;
    if !weak.is_finite() {
        return Err(ContractError::config_validation(
            "correlation.weak_signal_dbm",
            format!("weak_signal_dbm must be finite, got {weak}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        assert!(validate(&AnalysisConfig::default()).is_ok());
    }

    #[test]
    fn test_good_above_warning() {
        let mut config = AnalysisConfig::default();
        config.classifier.good_ms = 60;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("must be <= warning_ms"), "got: {err}");
    }

    #[test]
    fn test_negative_threshold_reports_nested_path() {
        let mut config = AnalysisConfig::default();
        config.classifier.good_ms = -1;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("classifier.good_ms"), "got: {err}");
    }

    #[test]
    fn test_fraction_out_of_range() {
        let mut config = AnalysisConfig::default();
        config.correlation.link_clear_fraction = 2.0;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("correlation.link_clear_fraction"), "got: {err}");
    }

    #[test]
    fn test_non_finite_weak_signal() {
        let mut config = AnalysisConfig::default();
        config.correlation.weak_signal_dbm = f64::NAN;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("must be finite"), "got: {err}");
    }
}
