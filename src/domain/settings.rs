//! Site settings domain entity.
//! The single editable record that drives SEO metadata and contact links.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::validation::{
    validate_max_len, validate_optional_asset_ref, validate_optional_email,
    validate_optional_url, validate_required, ValidationError, ValidationResult, KEYWORD_MAX_LEN,
    SEO_DESCRIPTION_MAX_LEN, SEO_TITLE_MAX_LEN, SITE_NAME_MAX_LEN,
};

pub const DEFAULT_SITE_NAME: &str = "Chidi Ogara Portfolio";
pub const DEFAULT_SEO_TITLE: &str = "Chidi Ogara | Software Engineer";
pub const DEFAULT_SEO_DESCRIPTION: &str =
    "Portfolio of Chidi Ogara, a software engineer building web applications, APIs and digital products.";
pub const DEFAULT_SEO_KEYWORDS: &[&str] = &[
    "Chidi Ogara",
    "software engineer",
    "full-stack developer",
    "portfolio",
];
pub const DEFAULT_CONTACT_EMAIL: &str = "hello@chidiogara.com";
pub const DEFAULT_SOCIAL_PROVIDERS: &[&str] = &["linkedin", "github", "twitter"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub seo_title: String,
    pub seo_description: String,
    pub seo_keywords: Vec<String>,
    pub og_image: String,
    pub site_name: String,
    pub contact_email: String,
    /// Provider name to profile URL. Values may be empty; `null` reads as no links.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub social_links: BTreeMap<String, String>,
    /// Fields not modelled here, kept so a stored record round-trips untouched.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The fallback record used whenever settings cannot be fetched.
impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            seo_title: DEFAULT_SEO_TITLE.to_string(),
            seo_description: DEFAULT_SEO_DESCRIPTION.to_string(),
            seo_keywords: DEFAULT_SEO_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            og_image: String::new(),
            site_name: DEFAULT_SITE_NAME.to_string(),
            contact_email: DEFAULT_CONTACT_EMAIL.to_string(),
            social_links: DEFAULT_SOCIAL_PROVIDERS
                .iter()
                .map(|provider| (provider.to_string(), String::new()))
                .collect(),
            extra: Map::new(),
        }
    }
}

impl SiteSettings {
    /// Rules for admin writes. Fetched records are only decoded, never checked here.
    pub fn validate(&self) -> ValidationResult {
        validate_required("seoTitle", &self.seo_title)?;
        validate_max_len("seoTitle", &self.seo_title, SEO_TITLE_MAX_LEN)?;
        validate_max_len("seoDescription", &self.seo_description, SEO_DESCRIPTION_MAX_LEN)?;
        validate_required("siteName", &self.site_name)?;
        validate_max_len("siteName", &self.site_name, SITE_NAME_MAX_LEN)?;

        for (index, keyword) in self.seo_keywords.iter().enumerate() {
            let field = format!("seoKeywords[{}]", index);
            validate_required(&field, keyword)?;
            validate_max_len(&field, keyword, KEYWORD_MAX_LEN)?;
        }

        validate_optional_asset_ref("ogImage", &self.og_image)?;
        validate_optional_email("contactEmail", &self.contact_email)?;

        for (provider, link) in &self.social_links {
            if provider.trim().is_empty() {
                return Err(ValidationError::new(
                    "socialLinks",
                    "provider name must not be empty",
                ));
            }
            validate_optional_url(&format!("socialLinks.{}", provider), link)?;
        }

        Ok(())
    }
}
