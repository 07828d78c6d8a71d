//! Theme descriptor to template resolution
//!
//! Resolution is a pure function of the descriptor: an explicit known
//! template id wins, then the first keyword rule whose keyword occurs in the
//! primary color (case-insensitive), then the catalog default.

use std::sync::OnceLock;

use common::models::ThemeSettings;
use regex::Regex;

use super::catalog::{Template, TemplateCatalog};
use super::pattern::pattern_data_uri;

/// Background lightness below this percentage counts as dark
pub const DARK_LIGHTNESS_THRESHOLD: f32 = 50.0;

/// Keyword group mapped to a template id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRule {
    pub keywords: &'static [&'static str],
    pub template_id: &'static str,
}

impl MatchRule {
    /// `color` must already be lowercase
    fn matches(&self, color: &str) -> bool {
        self.keywords.iter().any(|keyword| color.contains(keyword))
    }
}

/// Evaluated top to bottom; the first match wins
pub const DEFAULT_RULES: &[MatchRule] = &[
    MatchRule {
        keywords: &["pink", "rose", "blush"],
        template_id: "blush-romance",
    },
    MatchRule {
        keywords: &["green", "sage", "olive"],
        template_id: "sage-garden",
    },
    MatchRule {
        keywords: &["navy", "dark", "midnight"],
        template_id: "midnight-elegance",
    },
    MatchRule {
        keywords: &["white", "black", "minimal"],
        template_id: "modern-minimal",
    },
    MatchRule {
        keywords: &["purple", "lavender", "violet"],
        template_id: "lavender-dream",
    },
];

/// A template together with the values derived from it
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTheme {
    pub template: Template,
    pub is_dark: bool,
    /// `data:` URI of the repeating background tile, if the template has one
    pub pattern_uri: Option<String>,
}

impl ResolvedTheme {
    pub fn from_template(template: &Template) -> Self {
        Self {
            template: template.clone(),
            is_dark: is_dark_color(&template.colors.background),
            pattern_uri: pattern_data_uri(template.pattern, &template.colors.accent),
        }
    }

    pub fn template_id(&self) -> &str {
        &self.template.id
    }

    /// CSS custom properties for the page root
    pub fn css_variables(&self) -> Vec<(&'static str, String)> {
        let colors = &self.template.colors;
        let mut vars = vec![
            ("--color-primary", colors.primary.clone()),
            ("--color-secondary", colors.secondary.clone()),
            ("--color-accent", colors.accent.clone()),
            ("--color-background", colors.background.clone()),
            ("--color-foreground", colors.foreground.clone()),
            ("--background-gradient", self.template.gradient.clone()),
        ];
        if let Some(uri) = &self.pattern_uri {
            vars.push(("--background-pattern", format!("url(\"{}\")", uri)));
        }
        vars
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TemplateResolver<'a> {
    catalog: &'a TemplateCatalog,
    rules: &'a [MatchRule],
}

impl TemplateResolver<'static> {
    /// Built-in catalog with the default rule table
    pub fn builtin() -> Self {
        Self::new(TemplateCatalog::builtin(), DEFAULT_RULES)
    }
}

impl<'a> TemplateResolver<'a> {
    pub fn new(catalog: &'a TemplateCatalog, rules: &'a [MatchRule]) -> Self {
        Self { catalog, rules }
    }

    pub fn catalog(&self) -> &'a TemplateCatalog {
        self.catalog
    }

    /// Pick the template for `descriptor`
    pub fn resolve(&self, descriptor: Option<&ThemeSettings>) -> &'a Template {
        let Some(descriptor) = descriptor else {
            return self.catalog.default_template();
        };

        if let Some(template) = descriptor
            .template_id
            .as_deref()
            .and_then(|id| self.catalog.get(id))
        {
            return template;
        }

        let Some(color) = descriptor.primary_color.as_deref() else {
            return self.catalog.default_template();
        };
        let color = color.to_lowercase();

        self.rules
            .iter()
            .find(|rule| rule.matches(&color))
            .and_then(|rule| self.catalog.get(rule.template_id))
            .unwrap_or_else(|| self.catalog.default_template())
    }

    /// Resolve and compute the derived values
    pub fn resolve_theme(&self, descriptor: Option<&ThemeSettings>) -> ResolvedTheme {
        ResolvedTheme::from_template(self.resolve(descriptor))
    }
}

/// Lightness (0-100) of an `hsl(...)`, bare `h s% l%` or `#rrggbb` color
pub fn lightness(color: &str) -> Option<f32> {
    static HSL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = HSL_REGEX.get_or_init(|| {
        Regex::new(
            r"^\s*(?:hsla?\(\s*)?-?[\d.]+(?:deg)?\s*[\s,]\s*[\d.]+%\s*[\s,]\s*([\d.]+)%",
        )
        .expect("Failed to compile hsl regex")
    });

    if let Some(captures) = regex.captures(color) {
        return captures.get(1)?.as_str().parse().ok();
    }

    let hex = color.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let hex = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => hex.to_string(),
        _ => return None,
    };
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let (r, g, b) = (channel(0)?, channel(2)?, channel(4)?);
    let max = r.max(g).max(b) as f32;
    let min = r.min(g).min(b) as f32;
    Some((max + min) / 2.0 / 255.0 * 100.0)
}

/// Unparseable colors count as light
pub fn is_dark_color(color: &str) -> bool {
    lightness(color).is_some_and(|l| l < DARK_LIGHTNESS_THRESHOLD)
}
