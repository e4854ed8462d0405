//! The `tagline caption` command.

mod setup;
mod summary;
pub mod types;

pub use types::ModelProvider;

use clap::Args;
use std::path::PathBuf;
use tagline_core::{Config, DatasetCaptioner};

use setup::setup_captioner;
use summary::{create_progress_bar, print_summary};

/// Arguments for the `caption` command.
#[derive(Args, Debug)]
pub struct CaptionArgs {
    /// Dataset root: one subfolder per subject, images inside
    #[arg(required = true)]
    pub root: PathBuf,

    /// Vision model provider (defaults to `model.provider` from config)
    #[arg(long, value_enum)]
    pub provider: Option<ModelProvider>,

    /// Model name (provider-specific)
    #[arg(long)]
    pub model: Option<String>,

    /// Skip the vision model and caption from templates only
    #[arg(long)]
    pub no_model: bool,

    /// Seed for template selection, for reproducible captions
    #[arg(long)]
    pub seed: Option<u64>,

    /// Model captions of this many characters or fewer are discarded
    #[arg(long)]
    pub min_model_chars: Option<usize>,

    /// Compose and log captions without writing any files
    #[arg(long)]
    pub dry_run: bool,
}

/// Values match the clap annotations above; used to build args in tests.
impl Default for CaptionArgs {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            provider: None,
            model: None,
            no_model: false,
            seed: None,
            min_model_chars: None,
            dry_run: false,
        }
    }
}

/// Everything needed to run, assembled by setup_captioner().
pub(crate) struct CaptionContext {
    pub captioner: DatasetCaptioner,
    pub root: PathBuf,
}

/// Execute the caption command with an already loaded config.
pub async fn execute(args: CaptionArgs, config: Config) -> anyhow::Result<()> {
    let CaptionContext {
        mut captioner,
        root,
    } = setup_captioner(&args, config).await?;

    tracing::info!("Scanning directory: {:?}", root);
    let plan = captioner.plan(&root)?;
    let total = plan.image_count();
    if total == 0 {
        tracing::warn!("No images found under {:?}", root);
        return Ok(());
    }
    tracing::info!(
        "Found {} image(s) in {} folder(s)",
        total,
        plan.folders.len()
    );

    let progress = create_progress_bar(total as u64);
    let stats = captioner
        .run(&plan, |image, caption| {
            let name = image
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            tracing::debug!("✓ {} [{}]", name, caption.category);
            progress.inc(1);
            progress.set_message(name);
        })
        .await;
    progress.finish_and_clear();

    print_summary(&stats, args.dry_run);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: CaptionArgs,
    }

    #[test]
    fn caption_args_default_flags() {
        let args = CaptionArgs::default();
        assert!(!args.no_model);
        assert!(!args.dry_run);
        assert!(args.provider.is_none());
        assert!(args.seed.is_none());
        assert!(args.min_model_chars.is_none());
    }

    #[test]
    fn caption_args_parse() {
        let cli = TestCli::try_parse_from([
            "tagline",
            "./images",
            "--provider",
            "openai",
            "--model",
            "gpt-4o",
            "--seed",
            "42",
            "--min-model-chars",
            "15",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(cli.args.root, PathBuf::from("./images"));
        assert_eq!(cli.args.provider, Some(ModelProvider::Openai));
        assert_eq!(cli.args.model.as_deref(), Some("gpt-4o"));
        assert_eq!(cli.args.seed, Some(42));
        assert_eq!(cli.args.min_model_chars, Some(15));
        assert!(cli.args.dry_run);
    }

    #[test]
    fn caption_args_require_root() {
        assert!(TestCli::try_parse_from(["tagline"]).is_err());
    }

    #[test]
    fn caption_args_reject_unknown_provider() {
        assert!(TestCli::try_parse_from(["tagline", ".", "--provider", "blip"]).is_err());
    }
}
