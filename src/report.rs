//! Текстовый отчет о прогоне и выгрузка данных для графиков

use std::io::Write;

use serde::Serialize;

use crate::data::DataSource;
use crate::error::Result;
use crate::evaluation::{ClassReport, RocCurve};
use crate::models::GridSearchResult;
use crate::preprocessing::feature_variances;
use crate::types::{ClassBalance, ColumnSummary, Dataset};
use ndarray::{Array1, Array2};

/// Массивы и подписи для внешнего визуализатора
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Figure {
    TargetDistribution {
        labels: Vec<u8>,
        counts: Vec<usize>,
    },
    FeatureHistogram {
        feature: String,
        raw: Vec<f64>,
        transformed: Vec<f64>,
    },
    RocCurve {
        fpr: Vec<f64>,
        tpr: Vec<f64>,
        auc: f64,
    },
    FeatureImportance {
        features: Vec<String>,
        coefficients: Vec<f64>,
    },
}

/// Принимает готовые данные фигур; отрисовка остается за получателем
pub trait FigureSink {
    fn render(&mut self, figure: &Figure) -> Result<()>;
}

impl<T: FigureSink + ?Sized> FigureSink for &mut T {
    fn render(&mut self, figure: &Figure) -> Result<()> {
        (**self).render(figure)
    }
}

/// Выводит фигуры в журнал отладки как JSON
#[derive(Debug, Default)]
pub struct LogSink;

impl FigureSink for LogSink {
    fn render(&mut self, figure: &Figure) -> Result<()> {
        let payload = serde_json::to_string(figure)?;
        tracing::debug!(target: "donation_ml::figures", %payload, "figure");
        Ok(())
    }
}

/// Заглушка для тестов: фигуры только подсчитываются
#[derive(Debug, Default)]
pub struct DiscardSink {
    pub rendered: usize,
}

impl FigureSink for DiscardSink {
    fn render(&mut self, _figure: &Figure) -> Result<()> {
        self.rendered += 1;
        Ok(())
    }
}

/// Печатает этапы прогона в фиксированном порядке, нумеруя задачи
pub struct Reporter<W: Write, S: FigureSink> {
    out: W,
    sink: S,
    task: usize,
}

impl<W: Write, S: FigureSink> Reporter<W, S> {
    pub fn new(out: W, sink: S) -> Self {
        Self { out, sink, task: 0 }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn section(&mut self, title: &str) -> Result<()> {
        self.task += 1;
        writeln!(self.out)?;
        writeln!(self.out, "{}. {}", self.task, title)?;
        Ok(())
    }

    pub fn header(&mut self) -> Result<()> {
        writeln!(self.out, "=== Blood Donation Prediction ===")?;
        Ok(())
    }

    pub fn data_source(&mut self, source: DataSource, path: &std::path::Path, rows: usize) -> Result<()> {
        self.section("Loading dataset")?;
        match source {
            DataSource::File => {
                writeln!(self.out, "Read {} rows from {}", rows, path.display())?;
            }
            DataSource::Synthetic => {
                writeln!(
                    self.out,
                    "{} not found, generated {} synthetic rows",
                    path.display(),
                    rows
                )?;
            }
        }
        Ok(())
    }

    pub fn shape_and_head(&mut self, dataset: &Dataset) -> Result<()> {
        self.section("Dataset shape and first rows")?;
        writeln!(
            self.out,
            "Rows: {}, columns: {}",
            dataset.len(),
            dataset.columns().len()
        )?;

        let widths: Vec<usize> = dataset.columns().iter().map(|c| c.len().max(8)).collect();
        let mut header = String::new();
        for (name, width) in dataset.columns().iter().zip(widths.iter().copied()) {
            header.push_str(&format!("{:>width$}  ", name, width = width));
        }
        writeln!(self.out, "{}", header.trim_end())?;

        for record in dataset.head(5) {
            let mut row = String::new();
            for (value, width) in record.features().iter().zip(widths.iter().copied()) {
                row.push_str(&format!("{:>width$}  ", value, width = width));
            }
            row.push_str(&format!("{:>width$}", record.target, width = widths[4]));
            writeln!(self.out, "{}", row)?;
        }
        Ok(())
    }

    pub fn summary_statistics(&mut self, summaries: &[ColumnSummary]) -> Result<()> {
        self.section("Summary statistics")?;
        for summary in summaries {
            writeln!(
                self.out,
                "{}: count={} mean={:.2} std={:.2} min={} max={}",
                summary.name, summary.count, summary.mean, summary.std, summary.min, summary.max
            )?;
        }
        Ok(())
    }

    pub fn class_balance(&mut self, balance: &ClassBalance) -> Result<()> {
        self.section("Target variable and class balance")?;
        writeln!(self.out, "Total rows: {}", balance.total)?;
        for class in &balance.classes {
            writeln!(
                self.out,
                "target={}: {} rows ({:.2}%)",
                class.label,
                class.count,
                class.fraction * 100.0
            )?;
        }
        self.sink.render(&Figure::TargetDistribution {
            labels: balance.classes.iter().map(|c| c.label).collect(),
            counts: balance.classes.iter().map(|c| c.count).collect(),
        })
    }

    pub fn split_sizes(&mut self, n_train: usize, n_test: usize, test_ratio: f64) -> Result<()> {
        self.section("Train/test split")?;
        writeln!(
            self.out,
            "Train rows: {}, test rows: {} (test ratio {})",
            n_train, n_test, test_ratio
        )?;
        Ok(())
    }

    pub fn raw_variances(&mut self, names: &[String], variances: &Array1<f64>) -> Result<()> {
        self.section("Variance of raw training features")?;
        for (name, variance) in names.iter().zip(variances.iter()) {
            writeln!(self.out, "{}: {:.3}", name, variance)?;
        }
        Ok(())
    }

    pub fn log_transform(
        &mut self,
        names: &[String],
        raw: &Array2<f64>,
        transformed: &Array2<f64>,
    ) -> Result<()> {
        self.section("Log normalization")?;
        writeln!(
            self.out,
            "Applied log1p to train and test features; variance after transform:"
        )?;
        let variances = feature_variances(transformed);
        for (name, variance) in names.iter().zip(variances.iter()) {
            writeln!(self.out, "{}: {:.3}", name, variance)?;
        }
        for (j, name) in names.iter().enumerate() {
            self.sink.render(&Figure::FeatureHistogram {
                feature: name.clone(),
                raw: raw.column(j).to_vec(),
                transformed: transformed.column(j).to_vec(),
            })?;
        }
        Ok(())
    }

    pub fn grid_search(&mut self, result: &GridSearchResult) -> Result<()> {
        self.section("Grid search with cross-validation")?;
        writeln!(
            self.out,
            "{:>10} {:>8} {:>10} {:>8}",
            "C", "penalty", "mean AUC", "skipped"
        )?;
        for candidate in &result.candidates {
            writeln!(
                self.out,
                "{:>10} {:>8} {:>10.4} {:>8}",
                candidate.c, candidate.penalty, candidate.mean_score, candidate.skipped_folds
            )?;
        }
        writeln!(
            self.out,
            "Best parameters: C={}, penalty={} (CV ROC AUC {:.4})",
            result.best.c, result.best.penalty, result.best.mean_score
        )?;
        Ok(())
    }

    pub fn test_metrics(&mut self, accuracy: f64, roc: &RocCurve) -> Result<()> {
        self.section("Test set evaluation")?;
        writeln!(self.out, "Accuracy: {:.4}", accuracy)?;
        writeln!(self.out, "ROC AUC:  {:.4}", roc.auc)?;
        self.sink.render(&Figure::RocCurve {
            fpr: roc.fpr.clone(),
            tpr: roc.tpr.clone(),
            auc: roc.auc,
        })
    }

    pub fn classification_report(&mut self, report: &ClassReport) -> Result<()> {
        self.section("Classification report")?;
        write!(self.out, "{}", report.format())?;
        Ok(())
    }

    pub fn feature_importances(&mut self, ranked: &[(String, f64)]) -> Result<()> {
        self.section("Feature importances")?;
        for (position, (name, coefficient)) in ranked.iter().enumerate() {
            writeln!(self.out, "{}. {} {:+.4}", position + 1, name, coefficient)?;
        }
        self.sink.render(&Figure::FeatureImportance {
            features: ranked.iter().map(|(name, _)| name.clone()).collect(),
            coefficients: ranked.iter().map(|(_, coefficient)| *coefficient).collect(),
        })
    }
}
