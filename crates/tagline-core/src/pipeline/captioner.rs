//! Run orchestration: caption every image of every subject folder, in order.

use rand::rngs::StdRng;
use rand::Rng;
use std::path::Path;
use std::time::Instant;

use crate::caption::Composer;
use crate::config::Config;
use crate::error::Result;
use crate::types::{Caption, RunStats};

use super::discovery::{DatasetDiscovery, DatasetPlan};
use super::sidecar::write_caption;

/// Walks a dataset and writes one caption sidecar per image.
pub struct DatasetCaptioner<R = StdRng> {
    discovery: DatasetDiscovery,
    composer: Composer<R>,
    dry_run: bool,
}

impl<R: Rng> DatasetCaptioner<R> {
    /// Create a captioner using the dataset settings from `config`.
    pub fn new(config: &Config, composer: Composer<R>) -> Self {
        Self {
            discovery: DatasetDiscovery::new(config.dataset.clone()),
            composer,
            dry_run: false,
        }
    }

    /// Compose captions without writing sidecar files.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The composer used for each image.
    pub fn composer(&self) -> &Composer<R> {
        &self.composer
    }

    /// List subject folders and their images under `root`.
    pub fn plan(&self, root: &Path) -> Result<DatasetPlan> {
        Ok(self.discovery.plan(root)?)
    }

    /// Plan and run in one step.
    pub async fn run_root(&mut self, root: &Path) -> Result<RunStats> {
        let plan = self.plan(root)?;
        Ok(self.run(&plan, |_, _| {}).await)
    }

    /// Caption every image in the plan, one at a time.
    ///
    /// `on_image` is called after each image with its path and caption.
    /// A sidecar that cannot be written is logged and counted; the run
    /// carries on with the next image.
    pub async fn run<F>(&mut self, plan: &DatasetPlan, mut on_image: F) -> RunStats
    where
        F: FnMut(&Path, &Caption),
    {
        let start = Instant::now();
        let mut stats = RunStats {
            folders_skipped: plan.skipped.len() as u64,
            ..Default::default()
        };

        for folder in &plan.folders {
            tracing::info!(
                "Processing folder: {} ({} images)",
                folder.label,
                folder.images.len()
            );
            stats.folders += 1;

            for image in &folder.images {
                let caption = self.composer.caption_image(&folder.label, image).await;
                stats.record(&caption);

                if self.dry_run {
                    tracing::info!("{:?}: {}", image, caption);
                } else {
                    match write_caption(image, &caption.text) {
                        Ok(sidecar) => tracing::debug!("Wrote {:?}", sidecar),
                        Err(e) => {
                            stats.write_failures += 1;
                            tracing::error!("Failed to write caption for {:?}: {e}", image);
                        }
                    }
                }

                on_image(image, &caption);
            }
        }

        stats.elapsed = start.elapsed();
        stats
    }
}
