//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 从日志文本到分类统计的完整链路
//! - 配对规则与边界条件回归
//! - 确定性与游标查找一致性

#[cfg(test)]
fn run(
    config: &contracts::AnalysisConfig,
    leader: &str,
    follower: &str,
) -> (Vec<contracts::ClassifiedSample>, classifier::AnalysisSummary) {
    use classifier::{analyze, PhaseAggregator, PhaseClassifier};
    use contracts::DeviceRole;
    use ingestion::EventExtractor;
    use sync_engine::{MetricIndex, StreamAligner};

    let extractor = EventExtractor::new(config.extractor.clone()).unwrap();
    let leader = extractor.extract_text(leader, DeviceRole::Leader).unwrap();
    let follower = extractor.extract_text(follower, DeviceRole::Follower).unwrap();

    let aligner = StreamAligner::with_config(config.aligner.clone());
    let alignment = aligner.align(&leader.activations, &follower.activations);
    let index = MetricIndex::build(follower.metrics.iter().copied());
    let pairs = aligner.enrich(alignment.pairs, &index);

    let samples = analyze(&pairs, &PhaseClassifier::new(config.classifier.clone()));
    let summary = PhaseAggregator::summarize(config.correlation.clone(), &samples);
    (samples, summary)
}

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_config_defaults_are_valid() {
        let config = contracts::AnalysisConfig::default();
        assert!(config_loader::ConfigLoader::validate(&config).is_ok());
    }
}

#[cfg(test)]
mod extraction_tests {
    use contracts::{AnalysisConfig, DeviceRole, ExtractorConfig};
    use ingestion::{EventExtractor, IngestionError};

    const PERIOD: &str = "I (10) TIME_SYNC: Motor epoch set: 10000 us, cycle: 2000 ms\n";

    #[test]
    fn test_inactive_phase_never_activates() {
        let log = format!(
            "{PERIOD}\
             I (1000) MOTOR_TASK: SERVER: Cycle starts INACTIVE\n\
             I (1500) MOTOR_TASK: SERVER: Motor cmd INACTIVE\n\
             I (2000) MOTOR_TASK: SERVER: Cycle starts ACTIVE\n"
        );
        let extractor = EventExtractor::new(ExtractorConfig::default()).unwrap();
        let extraction = extractor.extract_text(&log, DeviceRole::Leader).unwrap();

        let timestamps: Vec<i64> = extraction
            .activations
            .iter()
            .map(|e| e.timestamp_ms)
            .collect();
        assert_eq!(timestamps, vec![2000]);
        assert_eq!(extraction.stats.inactive_phase_lines, 2);
    }

    #[test]
    fn test_spaced_capture_matches_compact_capture() {
        let compact = format!("{PERIOD}I (2000) MOTOR_TASK: Cycle starts ACTIVE\n");
        let spaced: String = compact
            .lines()
            .map(|line| {
                let mut widened: String = line.chars().flat_map(|c| [c, '\0']).collect();
                widened.push('\n');
                widened
            })
            .collect();

        let extractor = EventExtractor::new(ExtractorConfig::default()).unwrap();
        let a = extractor.extract_text(&compact, DeviceRole::Leader).unwrap();
        let b = extractor.extract_text(&spaced, DeviceRole::Leader).unwrap();
        assert_eq!(a.activations, b.activations);
    }

    #[test]
    fn test_dedup_toggle() {
        let log = format!(
            "{PERIOD}\
             I (2000) MOTOR_TASK: Cycle starts ACTIVE\n\
             I (2000) MOTOR_TASK: Motor cmd ACTIVE\n"
        );
        let mut config = AnalysisConfig::default();
        let deduped = EventExtractor::new(config.extractor.clone())
            .unwrap()
            .extract_text(&log, DeviceRole::Leader)
            .unwrap();
        assert_eq!(deduped.activations.len(), 1);
        assert_eq!(deduped.stats.duplicates_removed, 1);

        config.extractor.deduplicate_activations = false;
        let raw = EventExtractor::new(config.extractor)
            .unwrap()
            .extract_text(&log, DeviceRole::Leader)
            .unwrap();
        assert_eq!(raw.activations.len(), 2);
    }

    #[test]
    fn test_activation_before_period_fails_stream() {
        let log = "I (2000) MOTOR_TASK: Cycle starts ACTIVE\n";
        let extractor = EventExtractor::new(ExtractorConfig::default()).unwrap();
        let err = extractor.extract_text(log, DeviceRole::Follower).unwrap_err();
        assert!(matches!(
            err,
            IngestionError::EmptyStream {
                role: DeviceRole::Follower
            }
        ));
    }
}

#[cfg(test)]
mod e2e_tests {
    use super::run;
    use classifier::LinkVerdict;
    use contracts::{AnalysisConfig, MetricKind, PhaseStatus};

    fn leader_log(timestamps: &[i64]) -> String {
        let mut log = String::from("I (1) TIME_SYNC: Motor epoch set: 1000 us, cycle: 2000 ms\n");
        for ts in timestamps {
            log.push_str(&format!("I ({ts}) MOTOR_TASK: SERVER: Cycle starts ACTIVE\n"));
        }
        log
    }

    fn follower_log(cycles: &[(i64, Option<&str>)]) -> String {
        let mut log = String::from(
            "I (1) TIME_SYNC: Motor epoch set from handshake: 1000 μs, cycle: 2000 ms\n",
        );
        for (ts, metrics) in cycles {
            if let Some(metrics) = metrics {
                log.push_str(&format!("I ({}) BLE: {metrics}\n", ts - 1));
            }
            log.push_str(&format!("I ({ts}) MOTOR_TASK: CLIENT: Cycle starts ACTIVE\n"));
        }
        log
    }

    #[test]
    fn test_three_leader_two_follower() {
        let (samples, summary) = run(
            &AnalysisConfig::default(),
            &leader_log(&[0, 2000, 4000]),
            &follower_log(&[(1005, None), (3050, None)]),
        );

        let errors: Vec<i64> = samples.iter().map(|s| s.sample.phase_error_ms).collect();
        let statuses: Vec<PhaseStatus> = samples.iter().map(|s| s.status).collect();
        assert_eq!(errors, vec![5, 50]);
        assert_eq!(statuses, vec![PhaseStatus::Good, PhaseStatus::Warning]);
        assert_eq!(summary.status.total, 2);
    }

    #[test]
    fn test_skip_rule() {
        // 3100 is 2100 ms past the first target, outside the half period:
        // leader 0 is skipped, then 3100 pairs with leader 2000.
        let (samples, _) = run(
            &AnalysisConfig::default(),
            &leader_log(&[0, 2000]),
            &follower_log(&[(3100, None)]),
        );

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].sample.leader_timestamp, 2000);
        assert_eq!(samples[0].sample.phase_error_ms, 100);
        assert_eq!(samples[0].status, PhaseStatus::Drift);
    }

    #[test]
    fn test_early_follower_in_both_pairing_modes() {
        // 800 is 2200 ms before the target of the leader cycle at 2000
        let leader = leader_log(&[2000]);
        let follower = follower_log(&[(800, None), (3000, None)]);

        let mut config = AnalysisConfig::default();
        let (samples, _) = run(&config, &leader, &follower);
        let errors: Vec<i64> = samples.iter().map(|s| s.sample.phase_error_ms).collect();
        assert_eq!(errors, vec![0]);

        config.aligner.pair_skipped_events = true;
        let (samples, summary) = run(&config, &leader, &follower);
        let errors: Vec<i64> = samples.iter().map(|s| s.sample.phase_error_ms).collect();
        assert_eq!(errors, vec![-2200, 0]);
        assert_eq!(samples[0].status, PhaseStatus::Overlap);
        assert_eq!(summary.status.overlap, 1);
        assert_eq!(summary.status.good, 1);
    }

    #[test]
    fn test_poor_cycles_before_first_beacon_do_not_dilute_correlation() {
        let leaders: Vec<i64> = (0..14).map(|i| 10_000 + i * 2000).collect();
        let followers: Vec<(i64, Option<&str>)> = leaders
            .iter()
            .enumerate()
            .map(|(i, ts)| {
                let metrics = match i {
                    0..=3 => None,
                    4..=7 => Some("rssi=-95"),
                    _ => Some("rssi=-60"),
                };
                (ts + 1200, metrics)
            })
            .collect();
        let (_, summary) = run(
            &AnalysisConfig::default(),
            &leader_log(&leaders),
            &follower_log(&followers),
        );

        assert_eq!(summary.outliers.poor_samples, 14);
        assert_eq!(summary.outliers.poor_with_metrics, 10);
        let finding = summary.outliers.finding(MetricKind::SignalStrength).unwrap();
        assert_eq!(finding.count, 4);
        assert!(finding.correlated);
        assert_eq!(summary.outliers.verdict, LinkVerdict::LinkRelated);
    }

    #[test]
    fn test_classification_boundaries() {
        let cases = [
            (10, PhaseStatus::Good),
            (11, PhaseStatus::Warning),
            (50, PhaseStatus::Warning),
            (51, PhaseStatus::Drift),
            (-51, PhaseStatus::Overlap),
        ];
        for (error, expected) in cases {
            let (samples, _) = run(
                &AnalysisConfig::default(),
                &leader_log(&[10_000]),
                &follower_log(&[(11_000 + error, None)]),
            );
            assert_eq!(samples[0].status, expected, "error {error}");
        }
    }

    fn correlation_run(weak: usize, total: usize) -> classifier::AnalysisSummary {
        let leaders: Vec<i64> = (0..total as i64).map(|i| 10_000 + i * 2000).collect();
        let followers: Vec<(i64, Option<&str>)> = leaders
            .iter()
            .enumerate()
            .map(|(i, ts)| {
                let metrics = if i < weak { "rssi=-95" } else { "rssi=-50" };
                (ts + 1200, Some(metrics))
            })
            .collect();
        let (_, summary) = run(
            &AnalysisConfig::default(),
            &leader_log(&leaders),
            &follower_log(&followers),
        );
        summary
    }

    #[test]
    fn test_correlation_fraction_boundary() {
        let below = correlation_run(3, 10);
        assert_eq!(below.status.drift, 10);
        let finding = below.outliers.finding(MetricKind::SignalStrength).unwrap();
        assert_eq!(finding.count, 3);
        assert!(!finding.correlated);
        assert_eq!(below.outliers.verdict, LinkVerdict::Inconclusive);

        let above = correlation_run(4, 10);
        let finding = above.outliers.finding(MetricKind::SignalStrength).unwrap();
        assert_eq!(finding.count, 4);
        assert!(finding.correlated);
        assert_eq!(above.outliers.verdict, LinkVerdict::LinkRelated);
    }

    #[test]
    fn test_healthy_link_is_not_link_related() {
        let summary = correlation_run(0, 5);
        assert_eq!(summary.outliers.clean_samples, 5);
        assert_eq!(summary.outliers.verdict, LinkVerdict::NotLinkRelated);
    }

    #[test]
    fn test_metrics_carry_forward_onto_pairs() {
        let (samples, summary) = run(
            &AnalysisConfig::default(),
            &leader_log(&[0, 2000, 4000]),
            &follower_log(&[
                (1000, Some("rssi=-61 rtt=120000 quality=88%")),
                (3000, None),
                (5000, Some("rssi=-70")),
            ]),
        );

        let metrics: Vec<_> = samples.iter().map(|s| s.sample.metrics).collect();
        assert_eq!(metrics[0].signal_strength, Some(-61.0));
        assert_eq!(metrics[0].round_trip_time, Some(120.0));
        assert_eq!(metrics[1].signal_strength, Some(-61.0));
        assert_eq!(metrics[2].signal_strength, Some(-70.0));
        assert_eq!(metrics[2].sync_quality, Some(88.0));

        let good = &summary.correlation.good;
        assert_eq!(good.samples, 3);
        assert_eq!(good.get(MetricKind::SignalStrength).unwrap().count, 3);
    }

    #[test]
    fn test_determinism() {
        let leader = leader_log(&[0, 2000, 4000, 6000]);
        let follower = follower_log(&[(990, Some("rssi=-80")), (3060, None), (5200, None)]);
        let config = AnalysisConfig::default();

        let first = run(&config, &leader, &follower);
        let second = run(&config, &leader, &follower);
        assert_eq!(first.0, second.0);
        assert_eq!(first.1, second.1);
        assert_eq!(
            serde_json::to_string(&first.1).unwrap(),
            serde_json::to_string(&second.1).unwrap()
        );
    }

    #[test]
    fn test_config_file_drives_pipeline() {
        use std::io::Write;

        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[classifier]\ngood_ms = 60\nwarning_ms = 80").unwrap();
        let config = config_loader::ConfigLoader::load_from_path(file.path()).unwrap();

        let (samples, _) = run(
            &config,
            &leader_log(&[0]),
            &follower_log(&[(1050, None)]),
        );
        assert_eq!(samples[0].status, PhaseStatus::Good);
    }
}

#[cfg(test)]
mod metric_index_tests {
    use contracts::{MetricKind, MetricSample};
    use sync_engine::MetricIndex;

    #[test]
    fn test_cursor_matches_binary_search() {
        let mut samples = Vec::new();
        for i in 0..40i64 {
            let kind = MetricKind::ALL[(i % 3) as usize];
            // kinds share timestamps
            samples.push(MetricSample::new((i / 2) * 37, kind, i as f64));
        }
        let index = MetricIndex::build(samples);

        let queries: Vec<i64> = (-10..800).step_by(7).collect();
        let mut cursor = index.cursor();
        for &query in &queries {
            for kind in MetricKind::ALL {
                assert_eq!(cursor.lookup(query, kind), index.lookup(query, kind));
            }
        }

        // backwards queries reposition the cursor
        let mut cursor = index.cursor();
        for &query in queries.iter().rev() {
            assert_eq!(cursor.link_metrics(query), index.link_metrics(query), "query {query}");
        }
    }
}
