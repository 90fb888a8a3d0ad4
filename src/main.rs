/// Пакетный запуск пайплайна

use anyhow::Result;

use donation_ml::pipeline::{run, PipelineConfig};
use donation_ml::report::LogSink;

fn main() -> Result<()> {
    // Инициализация логирования
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = PipelineConfig::default();
    let stdout = std::io::stdout();
    let summary = run(&config, stdout.lock(), LogSink)?;

    tracing::info!(
        accuracy = summary.accuracy,
        roc_auc = summary.roc_auc,
        "run finished"
    );
    Ok(())
}
