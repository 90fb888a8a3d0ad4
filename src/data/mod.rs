/// Загрузка и разбиение данных

pub mod loader;
pub mod splitter;

pub use loader::{DataLoader, DataSource};
pub use splitter::{StratifiedSplitter, TrainTestSplit};
