/// Модуль предобработки данных

pub mod log_transform;
pub mod normalization;

pub use log_transform::{feature_variances, log1p_features};
pub use normalization::StandardScaler;
