//! Versioned template catalog
//!
//! The built-in catalog ships as `catalog.json` and is parsed once. The first
//! entry is the default template.

use std::collections::HashSet;
use std::sync::OnceLock;

use serde::Deserialize;
use thiserror::Error;

use super::pattern::PatternKind;

/// Built-in catalog source
const BUILTIN_CATALOG: &str = include_str!("catalog.json");

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to parse template catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Template catalog is empty")]
    Empty,

    #[error("Duplicate template id: {0}")]
    DuplicateId(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub foreground: String,
}

/// One visual template of the public wedding page
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub colors: TemplateColors,
    pub pattern: PatternKind,
    pub gradient: String,
}

/// Catalog document as written, before its checks
#[derive(Deserialize)]
struct RawCatalog {
    version: u32,
    templates: Vec<Template>,
}

/// Non-empty template list with unique ids
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawCatalog")]
pub struct TemplateCatalog {
    version: u32,
    templates: Vec<Template>,
}

impl TryFrom<RawCatalog> for TemplateCatalog {
    type Error = CatalogError;

    fn try_from(raw: RawCatalog) -> Result<Self, Self::Error> {
        if raw.templates.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut ids = HashSet::new();
        for template in &raw.templates {
            if !ids.insert(template.id.as_str()) {
                return Err(CatalogError::DuplicateId(template.id.clone()));
            }
        }

        Ok(Self {
            version: raw.version,
            templates: raw.templates,
        })
    }
}

impl TemplateCatalog {
    /// Parse and check a catalog document
    pub fn from_json(source: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(source)?;
        Self::try_from(raw)
    }

    /// The catalog compiled into the binary
    pub fn builtin() -> &'static TemplateCatalog {
        static CATALOG: OnceLock<TemplateCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            TemplateCatalog::from_json(BUILTIN_CATALOG).expect("Failed to load built-in template catalog")
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// First entry; non-empty by construction
    pub fn default_template(&self) -> &Template {
        &self.templates[0]
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|template| template.id == id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
