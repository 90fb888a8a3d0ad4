/// Типы данных для пайплайна донорства

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Объем одной донации, куб. см
pub const UNIT_VOLUME: f64 = 250.0;

/// Имя входного файла (относительно рабочей директории)
pub const DATA_FILE: &str = "transfusion.data";

/// Имена колонок исходной таблицы
pub const COL_RECENCY: &str = "Recency (months)";
pub const COL_FREQUENCY: &str = "Frequency (times)";
pub const COL_MONETARY: &str = "Monetary (c.c. blood)";
pub const COL_TIME: &str = "Time (months)";
pub const COL_RAW_TARGET: &str = "whether he/she donated blood in March 2007";
pub const COL_TARGET: &str = "target";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationRecord {
    #[serde(rename = "Recency (months)")]
    pub recency: u32, // месяцев с последней донации
    #[serde(rename = "Frequency (times)")]
    pub frequency: u32, // число донаций
    #[serde(rename = "Monetary (c.c. blood)")]
    pub monetary: f64, // суммарный объем сданной крови
    #[serde(rename = "Time (months)")]
    pub time: u32, // месяцев с первой донации
    #[serde(rename = "whether he/she donated blood in March 2007")]
    pub target: u8, // 1 = сдал кровь в отчетном месяце
}

impl DonationRecord {
    /// Значения признаков в порядке колонок (без целевой)
    pub fn features(&self) -> [f64; 4] {
        [
            self.recency as f64,
            self.frequency as f64,
            self.monetary,
            self.time as f64,
        ]
    }
}

/// Распределение классов целевой переменной
#[derive(Debug, Clone, Serialize)]
pub struct ClassBalance {
    pub total: usize,
    pub classes: Vec<ClassCount>, // по возрастанию метки
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassCount {
    pub label: u8,
    pub count: usize,
    pub fraction: f64,
}

/// Сводная статистика по колонке
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Таблица записей плюс метаданные колонок.
///
/// После загрузки не изменяется, кроме единственного переименования
/// колонки исхода в `target`.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<DonationRecord>,
    columns: Vec<String>,
}

impl Dataset {
    pub fn new(records: Vec<DonationRecord>, columns: Vec<String>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::EmptyDataset);
        }
        if columns.len() != 5 {
            return Err(Error::ShapeMismatch {
                expected: "5 columns".to_string(),
                actual: format!("{} columns", columns.len()),
            });
        }
        Ok(Self { records, columns })
    }

    /// Имена колонок синтетической схемы
    pub fn default_columns() -> Vec<String> {
        vec![
            COL_RECENCY.to_string(),
            COL_FREQUENCY.to_string(),
            COL_MONETARY.to_string(),
            COL_TIME.to_string(),
            COL_RAW_TARGET.to_string(),
        ]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[DonationRecord] {
        &self.records
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Имена входных признаков (все колонки, кроме целевой)
    pub fn feature_names(&self) -> &[String] {
        &self.columns[..4]
    }

    pub fn head(&self, n: usize) -> &[DonationRecord] {
        &self.records[..n.min(self.records.len())]
    }

    /// Переименовывает колонку исхода в `target` и возвращает баланс классов.
    ///
    /// Значения строк не меняются; отсутствие колонки — фатальная ошибка.
    pub fn derive_target(&mut self) -> Result<ClassBalance> {
        let position = self
            .columns
            .iter()
            .position(|c| c == COL_RAW_TARGET)
            .ok_or_else(|| Error::ColumnNotFound(COL_RAW_TARGET.to_string()))?;
        self.columns[position] = COL_TARGET.to_string();
        Ok(self.class_balance())
    }

    fn class_balance(&self) -> ClassBalance {
        let mut counts = std::collections::BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.target).or_insert(0usize) += 1;
        }
        let total = self.records.len();
        let classes = counts
            .into_iter()
            .map(|(label, count)| ClassCount {
                label,
                count,
                fraction: count as f64 / total as f64,
            })
            .collect();
        ClassBalance { total, classes }
    }

    /// Матрица признаков, порядок строк сохраняется
    pub fn feature_matrix(&self) -> Array2<f64> {
        let mut matrix = Array2::zeros((self.records.len(), 4));
        for (i, record) in self.records.iter().enumerate() {
            for (j, value) in record.features().into_iter().enumerate() {
                matrix[[i, j]] = value;
            }
        }
        matrix
    }

    pub fn target_vector(&self) -> Array1<f64> {
        let mut target = Array1::zeros(self.records.len());
        for (i, record) in self.records.iter().enumerate() {
            target[i] = record.target as f64;
        }
        target
    }

    /// Сводная статистика по всем колонкам
    pub fn describe(&self) -> Vec<ColumnSummary> {
        let n = self.records.len();
        let mut summaries = Vec::with_capacity(self.columns.len());
        for (j, name) in self.columns.iter().enumerate() {
            let values: Vec<f64> = self
                .records
                .iter()
                .map(|r| {
                    if j < 4 {
                        r.features()[j]
                    } else {
                        r.target as f64
                    }
                })
                .collect();
            let mean = values.iter().sum::<f64>() / n as f64;
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            summaries.push(ColumnSummary {
                name: name.clone(),
                count: n,
                mean,
                std: variance.sqrt(),
                min,
                max,
            });
        }
        summaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dataset() -> Dataset {
        let records = vec![
            DonationRecord { recency: 2, frequency: 50, monetary: 12500.0, time: 98, target: 1 },
            DonationRecord { recency: 0, frequency: 13, monetary: 3250.0, time: 28, target: 1 },
            DonationRecord { recency: 23, frequency: 1, monetary: 250.0, time: 23, target: 0 },
            DonationRecord { recency: 16, frequency: 3, monetary: 750.0, time: 16, target: 0 },
        ];
        Dataset::new(records, Dataset::default_columns()).unwrap()
    }

    #[test]
    fn derive_target_renames_column() {
        let mut dataset = sample_dataset();
        let balance = dataset.derive_target().unwrap();

        assert_eq!(dataset.columns()[4], COL_TARGET);
        assert_eq!(balance.total, 4);
        assert_eq!(balance.classes.len(), 2);
        assert_eq!(balance.classes[0].label, 0);
        assert_eq!(balance.classes[0].count, 2);
        assert!((balance.classes[1].fraction - 0.5).abs() < 1e-12);
    }

    #[test]
    fn derive_target_fails_without_column() {
        let records = sample_dataset().records().to_vec();
        let columns = vec![
            COL_RECENCY.to_string(),
            COL_FREQUENCY.to_string(),
            COL_MONETARY.to_string(),
            COL_TIME.to_string(),
            "outcome".to_string(),
        ];
        let mut dataset = Dataset::new(records, columns).unwrap();

        assert!(matches!(
            dataset.derive_target(),
            Err(Error::ColumnNotFound(_))
        ));
    }

    #[test]
    fn feature_matrix_preserves_row_order() {
        let dataset = sample_dataset();
        let matrix = dataset.feature_matrix();

        assert_eq!(matrix.shape(), &[4, 4]);
        assert_eq!(matrix[[0, 0]], 2.0);
        assert_eq!(matrix[[0, 2]], 12500.0);
        assert_eq!(matrix[[3, 3]], 16.0);
    }

    #[test]
    fn describe_covers_all_columns() {
        let dataset = sample_dataset();
        let summaries = dataset.describe();

        assert_eq!(summaries.len(), 5);
        let recency = &summaries[0];
        assert_eq!(recency.count, 4);
        assert!((recency.mean - 10.25).abs() < 1e-12);
        assert_eq!(recency.min, 0.0);
        assert_eq!(recency.max, 23.0);
    }

    #[test]
    fn empty_dataset_is_rejected() {
        assert!(matches!(
            Dataset::new(Vec::new(), Dataset::default_columns()),
            Err(Error::EmptyDataset)
        ));
    }
}
