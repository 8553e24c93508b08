use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting catalog run...");
        self.monitor.log_stats("Start");

        tracing::info!("Extracting catalog data...");
        let page = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} customers, {} products",
            page.customers.len(),
            page.products.len()
        );
        self.monitor.log_stats("Extract");

        tracing::info!("Rendering catalog...");
        let rendered = self.pipeline.transform(page).await?;
        self.monitor.log_stats("Transform");

        tracing::info!("Writing outputs...");
        let output_path = self.pipeline.load(rendered).await?;
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
