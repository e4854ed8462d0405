//! Core data types shared across the captioning pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Semantic bucket a subject folder falls into. Drives template choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Wildlife,
    Architecture,
    Landscape,
    Cultural,
    Food,
}

impl Category {
    /// Order in which keyword sets are tested. The first match wins.
    pub const PRIORITY: [Category; 5] = [
        Category::Wildlife,
        Category::Architecture,
        Category::Landscape,
        Category::Cultural,
        Category::Food,
    ];

    /// Lowercase name, as used in logs and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Wildlife => "wildlife",
            Category::Architecture => "architecture",
            Category::Landscape => "landscape",
            Category::Cultural => "cultural",
            Category::Food => "food",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which composition rule produced a caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionPolicy {
    /// No usable model output: template description only
    Fallback,
    /// Model caption blended with the template description
    Enriched,
    /// Model answered, but too briefly to keep; rendered like `Fallback`
    Thin,
}

/// A composed caption plus how it was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    /// Final caption text, exactly as written to the sidecar file
    pub text: String,

    /// Category resolved from the folder label
    pub category: Category,

    /// Composition rule that was applied
    pub policy: CaptionPolicy,
}

impl fmt::Display for Caption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Counters for a complete dataset run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Subject folders whose images were captioned
    pub folders: u64,

    /// Subject folders skipped because they could not be listed
    pub folders_skipped: u64,

    /// Images a caption was composed for
    pub images: u64,

    /// Captions that blended a model caption
    pub enriched: u64,

    /// Captions produced from the template alone (including thin ones)
    pub fallback: u64,

    /// Sidecar files that could not be written
    pub write_failures: u64,

    /// Wall-clock time of the run
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
}

impl RunStats {
    /// Record the policy of one composed caption.
    pub fn record(&mut self, caption: &Caption) {
        self.images += 1;
        match caption.policy {
            CaptionPolicy::Enriched => self.enriched += 1,
            CaptionPolicy::Fallback | CaptionPolicy::Thin => self.fallback += 1,
        }
    }

    /// Sidecars actually written.
    pub fn written(&self) -> u64 {
        self.images.saturating_sub(self.write_failures)
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(secs.max(0.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Architecture).unwrap();
        assert_eq!(json, "\"architecture\"");
        assert_eq!(Category::Food.to_string(), "food");
    }

    #[test]
    fn test_priority_lists_every_category_once() {
        let seen: std::collections::HashSet<_> = Category::PRIORITY.iter().collect();
        assert_eq!(seen.len(), 5);
        assert_eq!(Category::PRIORITY[0], Category::Wildlife);
        assert_eq!(Category::PRIORITY[4], Category::Food);
    }

    #[test]
    fn test_run_stats_record() {
        let mut stats = RunStats::default();
        let caption = |policy| Caption {
            text: "x".to_string(),
            category: Category::Food,
            policy,
        };
        stats.record(&caption(CaptionPolicy::Enriched));
        stats.record(&caption(CaptionPolicy::Thin));
        stats.record(&caption(CaptionPolicy::Fallback));
        stats.write_failures = 1;

        assert_eq!(stats.images, 3);
        assert_eq!(stats.enriched, 1);
        assert_eq!(stats.fallback, 2);
        assert_eq!(stats.written(), 2);
    }

    #[test]
    fn test_run_stats_elapsed_as_seconds() {
        let stats = RunStats {
            elapsed: Duration::from_millis(1500),
            ..Default::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["elapsed"], 1.5);
    }
}
