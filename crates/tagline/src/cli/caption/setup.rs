//! Captioner setup: config overrides, model initialization, composer creation.

use std::time::Duration;

use tagline_core::config::expand_path;
use tagline_core::error::InferenceResult;
use tagline_core::{Composer, Config, DatasetCaptioner, VisionModel, VisionModelFactory};

use super::{CaptionArgs, CaptionContext};

/// Validate the root, bring up the model, and assemble the captioner from
/// the config `main` already loaded.
pub async fn setup_captioner(
    args: &CaptionArgs,
    mut config: Config,
) -> anyhow::Result<CaptionContext> {
    let root = expand_path(&args.root);
    if !root.is_dir() {
        anyhow::bail!(
            "Dataset root is not a directory: {:?}\n\n  \
             Hint: pass the folder that contains one subfolder per subject.",
            root
        );
    }

    apply_overrides(&mut config, args);

    let model = if args.no_model {
        tracing::info!("Vision model disabled; using template captions only");
        None
    } else {
        init_model(&config, args).await
    };

    let composer = Composer::from_config(model, &config);
    let captioner = DatasetCaptioner::new(&config, composer).dry_run(args.dry_run);

    Ok(CaptionContext { captioner, root })
}

/// Fold CLI flags into the loaded config.
pub(crate) fn apply_overrides(config: &mut Config, args: &CaptionArgs) {
    if let Some(seed) = args.seed {
        config.caption.seed = Some(seed);
    }
    if let Some(chars) = args.min_model_chars {
        config.caption.min_model_caption_chars = chars;
    }
    if let Some(provider) = args.provider {
        config.model.provider = provider.to_string();
    }
}

/// Build the configured model backend, falling back to
/// `model.fallback_model` on the same provider.
///
/// Returns `None` (template-only captions for the whole run) when neither
/// can be built and reached.
async fn init_model(config: &Config, args: &CaptionArgs) -> Option<Box<dyn VisionModel>> {
    let provider = config.model.provider.as_str();
    let timeout = Duration::from_millis(config.limits.model_timeout_ms);
    let primary = args.model.as_deref();
    let backup = config
        .model
        .fallback_model
        .as_deref()
        .filter(|name| Some(*name) != primary);

    tracing::info!("Loading {provider} vision model...");
    let candidates = std::iter::once(primary)
        .chain(backup.map(Some))
        .map(|name| VisionModelFactory::create(provider, &config.model, name, timeout));

    first_available(candidates).await
}

/// Return the first candidate that was built and reports itself available.
///
/// Candidates are built lazily, so a backup is only constructed when the
/// ones before it failed. A single warning is logged when all of them fail.
pub(crate) async fn first_available<I>(candidates: I) -> Option<Box<dyn VisionModel>>
where
    I: IntoIterator<Item = InferenceResult<Box<dyn VisionModel>>>,
{
    let mut failures = Vec::new();

    for (attempt, candidate) in candidates.into_iter().enumerate() {
        if attempt > 0 {
            tracing::info!("Trying backup vision model...");
        }

        let failure = match candidate {
            Ok(model) => {
                if model.is_available().await {
                    tracing::info!("{} vision model ready", model.name());
                    return Some(model);
                }
                format!("{} vision model is not reachable", model.name())
            }
            Err(e) => format!("failed to load vision model: {e}"),
        };
        tracing::debug!("{failure}");
        failures.push(failure);
    }

    tracing::warn!(
        "No vision model available ({}); continuing with template captions only",
        failures.join("; ")
    );
    None
}

#[cfg(test)]
mod tests {
    use super::super::types::ModelProvider;
    use super::*;
    use async_trait::async_trait;
    use std::cell::Cell;
    use tagline_core::vision::{CaptionRequest, CaptionResponse};
    use tagline_core::InferenceError;

    #[test]
    fn overrides_apply_when_set() {
        let mut config = Config::default();
        let args = CaptionArgs {
            seed: Some(9),
            min_model_chars: Some(4),
            provider: Some(ModelProvider::Anthropic),
            ..Default::default()
        };
        apply_overrides(&mut config, &args);

        assert_eq!(config.caption.seed, Some(9));
        assert_eq!(config.caption.min_model_caption_chars, 4);
        assert_eq!(config.model.provider, "anthropic");
    }

    #[test]
    fn overrides_leave_config_alone_when_unset() {
        let mut config = Config::default();
        config.caption.seed = Some(1);
        apply_overrides(&mut config, &CaptionArgs::default());

        assert_eq!(config.caption.seed, Some(1));
        assert_eq!(config.caption.min_model_caption_chars, 10);
        assert_eq!(config.model.provider, "ollama");
    }

    #[tokio::test]
    async fn missing_root_is_rejected() {
        let args = CaptionArgs {
            root: "/nonexistent/tagline/dataset".into(),
            no_model: true,
            ..Default::default()
        };
        let err = setup_captioner(&args, Config::default())
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("not a directory"));
    }

    #[tokio::test]
    async fn setup_uses_the_config_it_is_given() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sigiriya_fort")).unwrap();
        std::fs::write(dir.path().join("sigiriya_fort/a.webp"), b"not decoded").unwrap();
        std::fs::write(dir.path().join("sigiriya_fort/b.jpg"), b"not decoded").unwrap();

        let mut config = Config::default();
        config.dataset.extensions = vec!["webp".to_string()];
        let args = CaptionArgs {
            root: dir.path().to_path_buf(),
            no_model: true,
            ..Default::default()
        };

        let context = setup_captioner(&args, config).await.unwrap();
        let plan = context.captioner.plan(&context.root).unwrap();
        assert_eq!(plan.image_count(), 1);
    }

    struct StubModel {
        name: &'static str,
        available: bool,
    }

    #[async_trait]
    impl VisionModel for StubModel {
        fn name(&self) -> &str {
            self.name
        }

        async fn is_available(&self) -> bool {
            self.available
        }

        async fn caption(&self, _request: &CaptionRequest) -> InferenceResult<CaptionResponse> {
            Err(InferenceError::Unavailable("stub".to_string()))
        }
    }

    fn stub(name: &'static str, available: bool) -> InferenceResult<Box<dyn VisionModel>> {
        Ok(Box::new(StubModel { name, available }))
    }

    fn load_error() -> InferenceResult<Box<dyn VisionModel>> {
        Err(InferenceError::Unavailable("API key not set".to_string()))
    }

    #[tokio::test]
    async fn backup_used_when_primary_unreachable() {
        let model = first_available([stub("primary", false), stub("backup", true)]).await;
        assert_eq!(model.unwrap().name(), "backup");
    }

    #[tokio::test]
    async fn backup_used_when_primary_fails_to_build() {
        let model = first_available([load_error(), stub("backup", true)]).await;
        assert_eq!(model.unwrap().name(), "backup");
    }

    #[tokio::test]
    async fn no_model_when_every_candidate_fails() {
        assert!(first_available([load_error(), stub("backup", false)])
            .await
            .is_none());
        let none: Vec<InferenceResult<Box<dyn VisionModel>>> = Vec::new();
        assert!(first_available(none).await.is_none());
    }

    #[tokio::test]
    async fn backup_not_built_when_primary_ready() {
        let built = Cell::new(0);
        let candidates = [("primary", true), ("backup", true)];
        let model = first_available(candidates.into_iter().map(|(name, up)| {
            built.set(built.get() + 1);
            stub(name, up)
        }))
        .await;

        assert_eq!(model.unwrap().name(), "primary");
        assert_eq!(built.get(), 1);
    }
}
