//! Оркестрация прогона: один проход от загрузки до отчета

#![allow(non_snake_case)]

use std::io::Write;
use std::path::PathBuf;

use crate::data::{DataLoader, StratifiedSplitter};
use crate::error::{Error, Result};
use crate::evaluation::{accuracy, classification_report, rank_features, roc_curve};
use crate::models::{GridSearch, ParamGrid, Penalty};
use crate::preprocessing::{feature_variances, log1p_features};
use crate::report::{FigureSink, Reporter};
use crate::types::{ClassBalance, DATA_FILE};

/// Параметры прогона; значения по умолчанию соответствуют
/// эталонному сценарию (seed 42, 748 синтетических строк)
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub data_path: PathBuf,
    pub seed: u64,
    pub test_ratio: f64,
    pub n_folds: usize,
    pub synthetic_rows: usize,
    pub grid: ParamGrid,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_path: DATA_FILE.into(),
            seed: 42,
            test_ratio: 0.25,
            n_folds: 5,
            synthetic_rows: 748,
            grid: ParamGrid::default(),
        }
    }
}

/// Итог прогона для вызывающего кода
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub n_rows: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub class_balance: ClassBalance,
    pub best_c: f64,
    pub best_penalty: Penalty,
    pub best_cv_score: f64,
    pub accuracy: f64,
    pub roc_auc: f64,
    pub ranked_features: Vec<(String, f64)>,
}

/// Выполняет все стадии строго по порядку, без ветвлений и повторов.
/// Единственная восстанавливаемая ошибка: отсутствие входного файла
/// внутри загрузчика; любая другая завершает прогон.
pub fn run<W: Write, S: FigureSink>(
    config: &PipelineConfig,
    out: W,
    sink: S,
) -> Result<PipelineSummary> {
    let mut reporter = Reporter::new(out, sink);
    reporter.header()?;

    // Загрузка
    let loader = DataLoader::new(&config.data_path, config.seed, config.synthetic_rows);
    let (mut dataset, source) = loader.load()?;
    tracing::info!(rows = dataset.len(), ?source, "dataset loaded");
    reporter.data_source(source, &config.data_path, dataset.len())?;
    reporter.shape_and_head(&dataset)?;
    reporter.summary_statistics(&dataset.describe())?;

    // Целевая переменная
    let balance = dataset.derive_target()?;
    reporter.class_balance(&balance)?;

    // Разбиение
    let X = dataset.feature_matrix();
    let y = dataset.target_vector();
    let split = StratifiedSplitter::new(config.test_ratio, config.seed).split(&X, &y)?;
    tracing::info!(
        train = split.train_indices.len(),
        test = split.test_indices.len(),
        "dataset split"
    );
    reporter.split_sizes(
        split.train_indices.len(),
        split.test_indices.len(),
        config.test_ratio,
    )?;

    // Преобразование признаков
    let names = dataset.feature_names().to_vec();
    reporter.raw_variances(&names, &feature_variances(&split.X_train))?;
    let X_train_log = log1p_features(&split.X_train);
    let X_test_log = log1p_features(&split.X_test);
    reporter.log_transform(&names, &split.X_train, &X_train_log)?;

    // Подбор модели на исходных обучающих признаках
    let search = GridSearch::new(config.grid.clone(), config.n_folds, config.seed);
    let selection = search.fit(&split.X_train, &split.y_train)?;
    reporter.grid_search(&selection)?;

    // Оценка: модель обучена на исходных признаках,
    // тестовые признаки подаются логарифмированными
    let y_pred = selection.model.predict(&X_test_log)?;
    let proba = selection.model.predict_proba(&X_test_log)?;
    let test_accuracy = accuracy(&split.y_test, &y_pred);
    let roc = roc_curve(&split.y_test, &proba).ok_or(Error::DegenerateTarget)?;
    tracing::info!(accuracy = test_accuracy, roc_auc = roc.auc, "test evaluation");
    reporter.test_metrics(test_accuracy, &roc)?;
    reporter.classification_report(&classification_report(&split.y_test, &y_pred))?;

    // Важность признаков
    let ranked = rank_features(&names, selection.model.coefficients()?);
    reporter.feature_importances(&ranked)?;

    Ok(PipelineSummary {
        n_rows: dataset.len(),
        n_train: split.train_indices.len(),
        n_test: split.test_indices.len(),
        class_balance: balance,
        best_c: selection.best.c,
        best_penalty: selection.best.penalty,
        best_cv_score: selection.best.mean_score,
        accuracy: test_accuracy,
        roc_auc: roc.auc,
        ranked_features: ranked,
    })
}
