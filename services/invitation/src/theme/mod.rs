//! Wedding page theming: template catalog, resolver and provider

pub mod catalog;
pub mod pattern;
pub mod resolver;

use common::models::ThemeSettings;
use tracing::debug;

pub use catalog::{CatalogError, Template, TemplateCatalog, TemplateColors};
pub use pattern::PatternKind;
pub use resolver::{DEFAULT_RULES, MatchRule, ResolvedTheme, TemplateResolver};

/// Exposes the resolved theme to the view layer
///
/// Re-resolves only when the descriptor differs from the previous one.
#[derive(Debug)]
pub struct ThemeProvider {
    resolver: TemplateResolver<'static>,
    cached: Option<(Option<ThemeSettings>, ResolvedTheme)>,
    generation: u64,
}

impl Default for ThemeProvider {
    fn default() -> Self {
        Self::new(TemplateResolver::builtin())
    }
}

impl ThemeProvider {
    pub fn new(resolver: TemplateResolver<'static>) -> Self {
        Self {
            resolver,
            cached: None,
            generation: 0,
        }
    }

    pub fn resolve(&mut self, descriptor: Option<&ThemeSettings>) -> &ResolvedTheme {
        let stale = !matches!(&self.cached, Some((previous, _)) if previous.as_ref() == descriptor);
        if stale {
            self.cached = None;
            self.generation += 1;
        }

        let resolver = &self.resolver;
        let (_, theme) = self.cached.get_or_insert_with(|| {
            let theme = resolver.resolve_theme(descriptor);
            debug!("Resolved theme template: {}", theme.template_id());
            (descriptor.cloned(), theme)
        });
        theme
    }

    /// Last resolved theme, if any
    pub fn current(&self) -> Option<&ResolvedTheme> {
        self.cached.as_ref().map(|(_, theme)| theme)
    }

    /// Incremented every time a new resolution is computed
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn reset(&mut self) {
        self.cached = None;
        self.generation = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(primary: &str) -> ThemeSettings {
        ThemeSettings {
            primary_color: Some(primary.to_string()),
            ..ThemeSettings::default()
        }
    }

    #[test]
    fn test_reuses_resolution_for_same_descriptor() {
        let mut provider = ThemeProvider::default();
        let blush = settings("blush");

        assert_eq!(provider.resolve(Some(&blush)).template_id(), "blush-romance");
        assert_eq!(provider.resolve(Some(&blush.clone())).template_id(), "blush-romance");
        assert_eq!(provider.generation(), 1);

        assert_eq!(provider.resolve(Some(&settings("sage"))).template_id(), "sage-garden");
        assert_eq!(provider.generation(), 2);

        assert_eq!(provider.resolve(None).template_id(), "classic-ivory");
        assert_eq!(provider.resolve(None).template_id(), "classic-ivory");
        assert_eq!(provider.generation(), 3);
    }

    #[test]
    fn test_reset_clears_cache() {
        let mut provider = ThemeProvider::default();
        provider.resolve(None);
        provider.reset();
        assert!(provider.current().is_none());
        assert_eq!(provider.generation(), 0);
    }
}
