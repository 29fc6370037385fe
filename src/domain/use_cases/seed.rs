use serde::Deserialize;
use validator::Validate;

use crate::{
    entities::{
        artwork::NewArtworkRequest,
        content::{AboutPatch, FooterPatch, HeroPatch},
    },
    errors::AppError,
    repositories::{artwork::ArtworkRepository, content::ContentRepository},
    use_cases::content::ContentHandler,
};

const SAMPLE_DATA: &str = include_str!("../../../data/seed.json");

#[derive(Deserialize)]
struct SampleData {
    artworks: Vec<NewArtworkRequest>,
    hero: HeroPatch,
    about: AboutPatch,
    footer: FooterPatch,
}

impl SampleData {
    fn load() -> Result<Self, AppError> {
        serde_json::from_str(SAMPLE_DATA)
            .map_err(|e| AppError::InternalError(format!("Invalid sample data: {e}")))
    }
}

/// What `seed_missing` inserted.
#[derive(Debug, Default, PartialEq)]
pub struct SeedReport {
    pub artworks: usize,
    pub hero: bool,
    pub about: bool,
    pub footer: bool,
}

/// Fills an empty gallery and missing page sections with the sample content.
/// Anything already present is left alone.
pub struct SeedHandler<A, C>
where
    A: ArtworkRepository,
    C: ContentRepository,
{
    pub artwork_repo: A,
    pub content_handler: ContentHandler<C>,
}

impl<A, C> SeedHandler<A, C>
where
    A: ArtworkRepository,
    C: ContentRepository,
{
    pub fn new(artwork_repo: A, content_repo: C) -> Self {
        SeedHandler {
            artwork_repo,
            content_handler: ContentHandler::new(content_repo),
        }
    }

    pub async fn seed_missing(&self) -> Result<SeedReport, AppError> {
        let data = SampleData::load()?;
        let mut report = SeedReport::default();

        if self.artwork_repo.list_artworks().await?.is_empty() {
            for request in data.artworks {
                request.validate()?;
                let artwork = self.artwork_repo.create_artwork(&request.prepare_for_insert()).await?;
                tracing::debug!(artwork_id = artwork.id, "Seeded artwork");
                report.artworks += 1;
            }
        }

        if self.content_handler.get_hero().await?.is_none() {
            self.content_handler.create_hero(data.hero).await?;
            report.hero = true;
        }
        if self.content_handler.get_about().await?.is_none() {
            self.content_handler.create_about(data.about).await?;
            report.about = true;
        }
        if self.content_handler.get_footer().await?.is_none() {
            self.content_handler.create_footer(data.footer).await?;
            report.footer = true;
        }

        Ok(report)
    }
}
