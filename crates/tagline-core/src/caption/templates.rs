//! Caption templates per category.

use crate::types::Category;

/// Placeholder substituted with the subject when rendering a template.
pub const SUBJECT_PLACEHOLDER: &str = "{subject}";

/// Description templates for a category. Each contains exactly one
/// [`SUBJECT_PLACEHOLDER`].
pub fn templates(category: Category) -> &'static [&'static str] {
    match category {
        Category::Wildlife => &[
            "detailed view of {subject} in natural habitat, cinematic lighting with contrast, showcasing vivid colors, natural behavior, and environmental context",
            "close-up of {subject} with intricate details, golden hour lighting, displaying natural patterns, textures, and authentic wildlife behavior",
            "majestic {subject} captured in pristine natural setting, dramatic lighting highlighting distinctive features, colors, and characteristic poses",
        ],
        Category::Architecture => &[
            "architectural details of {subject}, emphasizing structural elements, historical significance, cultural heritage, and traditional craftsmanship",
            "stunning view of {subject} showcasing design elements, cultural importance, architectural style, and historical context",
            "detailed perspective of {subject} highlighting construction techniques, artistic elements, and cultural significance",
        ],
        Category::Landscape => &[
            "breathtaking landscape of {subject} with dramatic lighting, natural beauty, scenic vistas, and environmental characteristics",
            "panoramic view of {subject} featuring natural elements, atmospheric conditions, geological features, and scenic beauty",
            "serene landscape of {subject} capturing natural lighting, topographical features, and environmental essence",
        ],
        Category::Cultural => &[
            "traditional {subject} showcasing cultural heritage, craftsmanship, artistic techniques, and historical significance",
            "authentic representation of {subject} highlighting cultural practices, traditional methods, and artistic expression",
            "detailed view of {subject} emphasizing cultural importance, traditional craftsmanship, and historical context",
        ],
        Category::Food => &[
            "traditional preparation of {subject} showing culinary techniques, ingredients, presentation, and cultural food heritage",
            "authentic {subject} highlighting cooking methods, traditional ingredients, presentation style, and cultural significance",
            "detailed view of {subject} showcasing preparation process, traditional techniques, and cultural culinary practices",
        ],
    }
}

/// Substitute the subject into a template.
pub fn render(template: &str, subject: &str) -> String {
    template.replacen(SUBJECT_PLACEHOLDER, subject, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_templates() {
        for category in Category::PRIORITY {
            assert!(!templates(category).is_empty(), "{category} has no templates");
        }
    }

    #[test]
    fn test_every_template_has_one_placeholder() {
        for category in Category::PRIORITY {
            for template in templates(category) {
                assert_eq!(
                    template.matches(SUBJECT_PLACEHOLDER).count(),
                    1,
                    "template for {category} must hold exactly one placeholder: {template}"
                );
            }
        }
    }

    #[test]
    fn test_render_substitutes_subject() {
        let rendered = render("authentic {subject} highlighting cooking methods", "kottu");
        assert_eq!(rendered, "authentic kottu highlighting cooking methods");
    }

    #[test]
    fn test_render_leaves_braces_in_subject_alone() {
        let rendered = render("view of {subject}", "{subject}");
        assert_eq!(rendered, "view of {subject}");
    }
}
