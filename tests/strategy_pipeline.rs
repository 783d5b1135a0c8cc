use nntc::config::ConfigManager;
use nntc::data::CsvConnector;
use nntc::ml::labeling::config::*;
use nntc::ml::labeling::{LabelRule, LabelStrategyKind};
use nntc::strategy::{ClassifierKind, StrategyRegistry, StrategyVariant};
use nntc::NntcError;
use polars::prelude::*;
use std::path::PathBuf;

fn temp_file(name: &str, ext: &str) -> PathBuf {
    std::env::temp_dir().join(format!("nntc_it_{}_{}.{}", name, std::process::id(), ext))
}

/// Two trend crossovers six bars apart (the 30 minute lookahead on 5m bars)
fn trend_table() -> DataFrame {
    let n = 20;
    let mut diff = vec![0.0; n];
    diff[2] = -1.0;
    diff[8] = 1.0;
    diff[10] = 1.0;
    diff[16] = -1.0;

    df! {
        "open" => vec![100.0; n],
        "high" => vec![101.0; n],
        "low" => vec![99.0; n],
        "close" => vec![100.0; n],
        "volume" => vec![10.0; n],
        DWT_DIFF => diff,
        PROFIT_THRESHOLD => vec![0.5; n],
        LOSS_THRESHOLD => vec![-0.5; n],
        FUTURE_PROFIT_MAX => vec![1.0; n],
        FUTURE_LOSS_MIN => vec![-1.0; n],
        FUTURE_MAX => vec![1.0; n],
        FUTURE_MIN => vec![-1.0; n],
    }
    .unwrap()
}

#[test]
fn test_registry_knows_both_variants() {
    let registry = StrategyRegistry::new();
    assert_eq!(registry.names(), vec!["NNTC_dwt_Wavenet", "NNTC_fbb_LSTM"]);

    let fbb = registry.resolve("nntc_fbb_lstm").unwrap();
    assert_eq!(fbb.classifier, ClassifierKind::Lstm);
    assert_eq!(fbb.label_strategy, LabelStrategyKind::OscillatorThreshold);

    assert!(matches!(
        registry.resolve("NNTC_missing"),
        Err(NntcError::UnknownVariant(_))
    ));
}

#[test]
fn test_variant_metadata_serialises() {
    let json = serde_json::to_value(StrategyVariant::fbb_lstm()).unwrap();
    assert_eq!(json["classifier"], "LSTM");
    assert_eq!(json["label_strategy"], "oscillator_threshold");
    assert_eq!(json["training"]["lookahead_hours"], 1.0);
    assert_eq!(json["parameters"].as_array().unwrap().len(), 15);
}

#[test]
fn test_dwt_variant_labels_csv_table() {
    let input = temp_file("dwt_in", "csv");
    let output = temp_file("dwt_out", "csv");
    let mut df = trend_table();
    CsvConnector::write(&mut df, &input).unwrap();

    let variant = StrategyVariant::dwt_wavenet();
    let labeler = variant.labeler("5m").unwrap().with_debug_indicators(true);
    assert_eq!(labeler.params().lookahead, 6);

    let loaded =
        CsvConnector::load_bar_table(&input, labeler.rule().required_columns(), None).unwrap();
    let mut labeled = labeler.label(&loaded).unwrap();

    assert_eq!(labeled.stats.buy_count, 1);
    assert_eq!(labeled.stats.sell_count, 1);
    assert_eq!(labeled.stats.hold_count, 18);
    assert_eq!(labeled.stats.total_count, 20);

    let buy = labeled.frame.column(TRAIN_BUY).unwrap().f64().unwrap().clone();
    let sell = labeled.frame.column(TRAIN_SELL).unwrap().f64().unwrap().clone();
    assert_eq!(buy.get(2), Some(1.0));
    assert_eq!(sell.get(10), Some(1.0));
    assert!(labeled.frame.column(&debug_name(FUTURE_MAX)).is_ok());

    CsvConnector::write(&mut labeled.frame, &output).unwrap();
    let reloaded = CsvConnector::load(&output).unwrap();
    assert_eq!(reloaded.height(), 20);
    assert!(reloaded.column(TRAIN_BUY).is_ok());

    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&output);
}

#[test]
fn test_fbb_variant_rejects_trend_table() {
    let input = temp_file("fbb_in", "csv");
    let mut df = trend_table();
    CsvConnector::write(&mut df, &input).unwrap();

    let labeler = StrategyVariant::fbb_lstm().labeler("5m").unwrap();
    let result = CsvConnector::load_bar_table(&input, labeler.rule().required_columns(), None);
    assert!(matches!(result, Err(NntcError::DataLoading(_))));

    let _ = std::fs::remove_file(&input);
}

#[test]
fn test_layered_config_drives_labeler() {
    let path = temp_file("layered", "toml");
    std::fs::write(
        &path,
        r#"
[labeling]
strategy = "oscillator_threshold"
lookahead_hours = 2.0
timeframe = "15m"
oscillator_extreme = 0.6

[model]
seq_len = 64
"#,
    )
    .unwrap();

    let manager = ConfigManager::new();
    manager.load_layered(Some(&path)).unwrap();
    let config = manager.get();

    assert_eq!(config.model.seq_len, 64);
    assert_eq!(config.model.seed, 42);

    let labeler = config.labeling.labeler().unwrap();
    assert_eq!(labeler.params().lookahead, 8);
    assert_eq!(labeler.rule().name(), "oscillator_threshold");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_layered_config_rejects_invalid_file() {
    let path = temp_file("invalid", "toml");
    std::fs::write(&path, "[model]\nseq_len = 0\n").unwrap();

    let manager = ConfigManager::new();
    assert!(manager.load_layered(Some(&path)).is_err());
    assert_eq!(manager.get().model.seq_len, 32);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_variant_lookahead_must_cover_a_bar() {
    // The [labeling] section is valid on 1h bars, the variant's 0.5h horizon is not
    let manager = ConfigManager::new();
    manager
        .update(|c| {
            c.labeling.timeframe = "1h".to_string();
            c.labeling.lookahead_hours = 1.0;
        })
        .unwrap();
    let timeframe = manager.get().labeling.timeframe;

    let dwt = StrategyVariant::dwt_wavenet();
    assert!(matches!(
        dwt.labeler(&timeframe),
        Err(NntcError::Configuration(_))
    ));

    // Row 0 is a buy under any lookahead of one bar or more
    let df = df! {
        DWT_DIFF => &[-1.0, 1.0, 1.0],
        LOSS_THRESHOLD => &[0.0, 0.0, 0.0],
        PROFIT_THRESHOLD => &[0.5, 0.5, 0.5],
        FUTURE_PROFIT_MAX => &[1.0, 1.0, 1.0],
        FUTURE_LOSS_MIN => &[0.0, 0.0, 0.0],
    }
    .unwrap();
    let labeled = dwt.labeler("15m").unwrap().label(&df).unwrap();
    assert_eq!(labeled.stats.buy_count, 1);
    let labeled = manager.get().labeling.labeler().unwrap().label(&df).unwrap();
    assert_eq!(labeled.stats.buy_count, 1);
}
