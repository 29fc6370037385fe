//! Singleton page sections: hero, about and footer.
//!
//! Each section is stored as a single row that the public site reads with
//! "find first". Writes go through a `*Fields` value, which is the complete
//! validated content of a section; `*Patch` payloads are merged over the
//! current row (or over defaults) to produce one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

use crate::utils::markdown::safe_markdown_to_html;

const DEFAULT_CTA_TEXT: &str = "Explore Gallery";
const DEFAULT_CTA_LINK: &str = "/portfolio";
const DEFAULT_EXPERIENCE: &str = "5+ years";
const DEFAULT_SOCIAL_LINK: &str = "#";
const DEFAULT_NEWSLETTER_TEXT: &str = "Stay updated with our latest artworks and events.";
const DEFAULT_COPYRIGHT_TEXT: &str = "All rights reserved.";

/// Which singleton an admin content request addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSection {
    Hero,
    About,
    Footer,
}

impl ContentSection {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "hero" => Some(ContentSection::Hero),
            "about" => Some(ContentSection::About),
            "footer" => Some(ContentSection::Footer),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContentSection::Hero => "Hero",
            ContentSection::About => "About",
            ContentSection::Footer => "Footer",
        }
    }
}

// ───── Hero ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub id: Uuid,
    pub title: String,
    pub subtitle: String,
    pub background_image: String,
    pub cta_text: String,
    pub cta_link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HeroFields {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Subtitle is required"))]
    pub subtitle: String,

    #[validate(length(min = 1, message = "Background image is required"))]
    pub background_image: String,

    pub cta_text: String,
    pub cta_link: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub background_image: Option<String>,
    pub cta_text: Option<String>,
    pub cta_link: Option<String>,
}

impl HeroPatch {
    /// Merges over `current`, or over the schema defaults when no hero exists.
    pub fn merge_into(self, current: Option<&Hero>) -> HeroFields {
        let base = current.map(HeroFields::from).unwrap_or_else(HeroFields::empty);
        HeroFields {
            title: trim_or(self.title, base.title),
            subtitle: trim_or(self.subtitle, base.subtitle),
            background_image: trim_or(self.background_image, base.background_image),
            cta_text: trim_or(self.cta_text, base.cta_text),
            cta_link: trim_or(self.cta_link, base.cta_link),
        }
    }
}

impl HeroFields {
    fn empty() -> Self {
        HeroFields {
            title: String::new(),
            subtitle: String::new(),
            background_image: String::new(),
            cta_text: DEFAULT_CTA_TEXT.to_string(),
            cta_link: DEFAULT_CTA_LINK.to_string(),
        }
    }

    /// Static content served when the store cannot be reached.
    pub fn fallback() -> Self {
        HeroFields {
            title: "Welcome to the Studio".to_string(),
            subtitle: "Discover Nature's Beauty Through Art".to_string(),
            background_image: "/images/art.jpg".to_string(),
            cta_text: DEFAULT_CTA_TEXT.to_string(),
            cta_link: DEFAULT_CTA_LINK.to_string(),
        }
    }
}

impl From<&Hero> for HeroFields {
    fn from(hero: &Hero) -> Self {
        HeroFields {
            title: hero.title.clone(),
            subtitle: hero.subtitle.clone(),
            background_image: hero.background_image.clone(),
            cta_text: hero.cta_text.clone(),
            cta_link: hero.cta_link.clone(),
        }
    }
}

// ───── About ────────────────────────────────────────────────────────

/// Raw `about_sections` row, including deprecated columns written by
/// earlier versions of the admin (`content`, `artist_name`, `specialties`).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AboutRecord {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub skills: Vec<String>,
    pub experience: String,
    pub content: Option<String>,
    pub artist_name: Option<String>,
    pub artist_bio: Option<String>,
    pub specialties: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// About section as exposed to clients, with legacy columns already folded in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct About {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub description_html: String,
    pub image: String,
    pub skills: Vec<String>,
    pub experience: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AboutRecord> for About {
    fn from(record: AboutRecord) -> Self {
        let description = non_blank(record.description)
            .or_else(|| non_blank(record.content))
            .unwrap_or_default();

        let skills = if record.skills.is_empty() {
            record.specialties
        } else {
            record.skills
        };

        let title = non_blank(record.title)
            .or_else(|| non_blank(record.artist_name).map(|name| format!("About {name}")))
            .unwrap_or_default();

        About {
            id: record.id,
            title,
            description_html: safe_markdown_to_html(&description),
            description,
            image: record.image.unwrap_or_default(),
            skills,
            experience: record.experience,
            artist_bio: record.artist_bio,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AboutFields {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(length(min = 1, message = "Image is required"))]
    pub image: String,

    pub skills: Vec<String>,
    pub experience: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<String>,
}

impl AboutPatch {
    pub fn merge_into(self, current: Option<&About>) -> AboutFields {
        let base = current.map(AboutFields::from).unwrap_or_else(AboutFields::empty);
        AboutFields {
            title: trim_or(self.title, base.title),
            description: trim_or(self.description, base.description),
            image: trim_or(self.image, base.image),
            skills: self
                .skills
                .map(|skills| {
                    skills
                        .into_iter()
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(base.skills),
            experience: trim_or(self.experience, base.experience),
        }
    }
}

impl AboutFields {
    fn empty() -> Self {
        AboutFields {
            title: String::new(),
            description: String::new(),
            image: String::new(),
            skills: Vec::new(),
            experience: DEFAULT_EXPERIENCE.to_string(),
        }
    }

    pub fn fallback() -> Self {
        AboutFields {
            title: "About the Artist".to_string(),
            description: "Welcome to my artistic journey! I'm passionate about capturing the beauty \
                of nature through various art forms. Each piece in my collection represents a moment \
                of inspiration drawn from the natural world around us."
                .to_string(),
            image: "/images/artist-portrait.jpg".to_string(),
            skills: ["Oil Painting", "Watercolor", "Digital Art", "Nature Studies"]
                .into_iter()
                .map(String::from)
                .collect(),
            experience: DEFAULT_EXPERIENCE.to_string(),
        }
    }
}

impl From<&About> for AboutFields {
    fn from(about: &About) -> Self {
        AboutFields {
            title: about.title.clone(),
            description: about.description.clone(),
            image: about.image.clone(),
            skills: about.skills.clone(),
            experience: about.experience.clone(),
        }
    }
}

// ───── Footer ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    #[serde(default = "default_social_link")]
    pub facebook: String,
    #[serde(default = "default_social_link")]
    pub instagram: String,
    #[serde(default = "default_social_link")]
    pub twitter: String,
    #[serde(default = "default_social_link")]
    pub linkedin: String,
}

impl Default for SocialLinks {
    fn default() -> Self {
        SocialLinks {
            facebook: default_social_link(),
            instagram: default_social_link(),
            twitter: default_social_link(),
            linkedin: default_social_link(),
        }
    }
}

fn default_social_link() -> String {
    DEFAULT_SOCIAL_LINK.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Footer {
    pub id: Uuid,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub social_links: Json<SocialLinks>,
    pub newsletter_text: String,
    pub copyright_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FooterFields {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,

    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,

    pub social_links: SocialLinks,
    pub newsletter_text: String,
    pub copyright_text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterPatch {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub social_links: Option<SocialLinks>,
    pub newsletter_text: Option<String>,
    pub copyright_text: Option<String>,
}

impl FooterPatch {
    pub fn merge_into(self, current: Option<&Footer>) -> FooterFields {
        let base = current.map(FooterFields::from).unwrap_or_else(FooterFields::empty);
        FooterFields {
            email: trim_or(self.email, base.email),
            phone: trim_or(self.phone, base.phone),
            address: trim_or(self.address, base.address),
            social_links: self.social_links.unwrap_or(base.social_links),
            newsletter_text: trim_or(self.newsletter_text, base.newsletter_text),
            copyright_text: trim_or(self.copyright_text, base.copyright_text),
        }
    }
}

impl FooterFields {
    fn empty() -> Self {
        FooterFields {
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            social_links: SocialLinks::default(),
            newsletter_text: DEFAULT_NEWSLETTER_TEXT.to_string(),
            copyright_text: DEFAULT_COPYRIGHT_TEXT.to_string(),
        }
    }

    pub fn fallback() -> Self {
        FooterFields {
            email: "contact@example.com".to_string(),
            ..FooterFields::empty()
        }
    }
}

impl From<&Footer> for FooterFields {
    fn from(footer: &Footer) -> Self {
        FooterFields {
            email: footer.email.clone(),
            phone: footer.phone.clone(),
            address: footer.address.clone(),
            social_links: footer.social_links.0.clone(),
            newsletter_text: footer.newsletter_text.clone(),
            copyright_text: footer.copyright_text.clone(),
        }
    }
}

// ───── Helper Functions ─────────────────────────────────────────────

fn trim_or(value: Option<String>, fallback: String) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or(fallback)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_record() -> AboutRecord {
        AboutRecord {
            id: Uuid::new_v4(),
            title: None,
            description: None,
            image: Some("/images/me.jpg".into()),
            skills: vec![],
            experience: DEFAULT_EXPERIENCE.into(),
            content: Some("I paint **rivers**.".into()),
            artist_name: Some("Mira".into()),
            artist_bio: Some("Born by the sea".into()),
            specialties: vec!["Watercolor".into()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn legacy_about_fields_are_folded_in() {
        let about = About::from(legacy_record());

        assert_eq!(about.title, "About Mira");
        assert_eq!(about.description, "I paint **rivers**.");
        assert!(about.description_html.contains("<strong>rivers</strong>"));
        assert_eq!(about.skills, vec!["Watercolor".to_string()]);
    }

    #[test]
    fn current_about_fields_win_over_legacy() {
        let mut record = legacy_record();
        record.title = Some("My Story".into());
        record.description = Some("Current text".into());
        record.skills = vec!["Oil".into()];

        let about = About::from(record);
        assert_eq!(about.title, "My Story");
        assert_eq!(about.description, "Current text");
        assert_eq!(about.skills, vec!["Oil".to_string()]);
    }

    #[test]
    fn hero_patch_without_current_uses_defaults() {
        let patch = HeroPatch {
            title: Some("  Hello  ".into()),
            subtitle: Some("World".into()),
            background_image: Some("/bg.jpg".into()),
            ..Default::default()
        };

        let fields = patch.merge_into(None);
        assert_eq!(fields.title, "Hello");
        assert_eq!(fields.cta_text, DEFAULT_CTA_TEXT);
        assert_eq!(fields.cta_link, DEFAULT_CTA_LINK);
        assert!(fields.validate().is_ok());
    }

    #[test]
    fn partial_hero_patch_keeps_current_values() {
        let current = Hero {
            id: Uuid::new_v4(),
            title: "Old".into(),
            subtitle: "Sub".into(),
            background_image: "/old.jpg".into(),
            cta_text: "Browse".into(),
            cta_link: "/gallery".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let patch = HeroPatch { title: Some("New".into()), ..Default::default() };

        let fields = patch.merge_into(Some(&current));
        assert_eq!(fields.title, "New");
        assert_eq!(fields.background_image, "/old.jpg");
        assert_eq!(fields.cta_text, "Browse");
    }

    #[test]
    fn whitespace_only_values_fail_validation() {
        let hero = HeroPatch {
            title: Some("Hello".into()),
            subtitle: Some("World".into()),
            background_image: Some("   ".into()),
            ..Default::default()
        }
        .merge_into(None);
        assert!(hero.validate().unwrap_err().field_errors().contains_key("background_image"));

        let about = AboutPatch {
            title: Some("About".into()),
            description: Some(" \n ".into()),
            image: Some("  ".into()),
            ..Default::default()
        }
        .merge_into(None);
        let errors = about.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("description"));
        assert!(errors.field_errors().contains_key("image"));
    }

    #[test]
    fn footer_patch_requires_contact_fields() {
        let fields = FooterPatch { email: Some("a@b.com".into()), ..Default::default() }.merge_into(None);

        let errors = fields.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("phone"));
        assert!(errors.field_errors().contains_key("address"));
    }

    #[test]
    fn missing_social_links_default_to_hash() {
        let links: SocialLinks = serde_json::from_str(r#"{"instagram": "https://instagram.com/x"}"#).unwrap();

        assert_eq!(links.facebook, "#");
        assert_eq!(links.instagram, "https://instagram.com/x");
    }

    #[test]
    fn section_parsing() {
        assert_eq!(ContentSection::parse("about"), Some(ContentSection::About));
        assert_eq!(ContentSection::parse("sidebar"), None);
    }
}
