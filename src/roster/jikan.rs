use super::*;
use crate::normalize::normalize;
use serde::Deserialize;
use std::time::Duration;

/// Characters of a fixed list of anime, fetched from the Jikan API
pub struct JikanSource {
    base_url: String,
    anime_ids: Vec<u32>,
    request_delay: Duration,
    client: reqwest::Client,
}

impl JikanSource {
    pub fn new(
        base_url: String,
        anime_ids: Vec<u32>,
        request_delay: Duration,
    ) -> RosterResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anime_ids,
            request_delay,
            client,
        })
    }

    pub fn from_config(config: &RosterConfig) -> RosterResult<Self> {
        Self::new(
            config.jikan_base_url.clone(),
            config.anime_ids.clone(),
            config.request_delay,
        )
    }

    async fn fetch_anime(&self, anime_id: u32) -> RosterResult<Vec<CharacterEntry>> {
        let url = format!("{}/anime/{}/characters", self.base_url, anime_id);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(RosterError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        let body: JikanCharactersResponse = response
            .json()
            .await
            .map_err(|e| RosterError::Parse(e.to_string()))?;

        Ok(entries_from_response(body))
    }
}

#[derive(Debug, Deserialize)]
pub struct JikanCharactersResponse {
    #[serde(default)]
    pub data: Vec<JikanCastMember>,
}

#[derive(Debug, Deserialize)]
pub struct JikanCastMember {
    pub character: JikanCharacter,
}

#[derive(Debug, Deserialize)]
pub struct JikanCharacter {
    pub name: String,
    #[serde(default)]
    pub images: Option<JikanImages>,
}

#[derive(Debug, Deserialize)]
pub struct JikanImages {
    #[serde(default)]
    pub jpg: Option<JikanImage>,
}

#[derive(Debug, Deserialize)]
pub struct JikanImage {
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Turn one characters page into roster entries.
/// Characters without a jpg image are skipped.
pub fn entries_from_response(body: JikanCharactersResponse) -> Vec<CharacterEntry> {
    body.data
        .into_iter()
        .filter_map(|member| {
            let character = member.character;
            let image_url = character
                .images
                .and_then(|images| images.jpg)
                .and_then(|jpg| jpg.image_url)
                .filter(|url| !url.is_empty())?;

            let display_name = fix_name(&character.name);
            let mut localized_name = to_arabic(&display_name);
            if normalize(&localized_name).is_empty() {
                localized_name = display_name.clone();
            }

            let entry = CharacterEntry::new(display_name, localized_name, Some(image_url));
            if entry.is_none() {
                tracing::debug!("Skipping unguessable character name: {}", character.name);
            }
            entry
        })
        .collect()
}

#[async_trait]
impl RosterSource for JikanSource {
    async fn fetch(&self) -> RosterResult<Vec<CharacterEntry>> {
        let mut entries = Vec::new();

        for (i, anime_id) in self.anime_ids.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.request_delay).await;
            }

            match self.fetch_anime(*anime_id).await {
                Ok(batch) => {
                    tracing::info!("Fetched {} characters for anime {}", batch.len(), anime_id);
                    entries.extend(batch);
                }
                Err(e) => {
                    tracing::warn!("Skipping anime {}: {}", anime_id, e);
                }
            }
        }

        Ok(entries)
    }

    fn name(&self) -> &str {
        "jikan"
    }
}
