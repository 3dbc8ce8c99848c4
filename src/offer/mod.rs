//! Rental offers: entity, output shape, collaborator contract and controller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::projection::{Field, Projection};
use crate::user::{User, UserRdo};

mod controller;
mod dto;

pub use controller::OfferController;
pub use dto::{CreateOfferDto, UpdateOfferDto, limits};

/// The fixed set of cities offers can be listed in.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum City {
    Paris,
    Cologne,
    Brussels,
    Amsterdam,
    Hamburg,
    Dusseldorf,
}

impl City {
    pub const ALL: [City; 6] = [
        City::Paris,
        City::Cologne,
        City::Brussels,
        City::Amsterdam,
        City::Hamburg,
        City::Dusseldorf,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paris      => "Paris",
            Self::Cologne    => "Cologne",
            Self::Brussels   => "Brussels",
            Self::Amsterdam  => "Amsterdam",
            Self::Hamburg    => "Hamburg",
            Self::Dusseldorf => "Dusseldorf",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn parse(name: &str) -> Option<City> {
        Self::ALL.into_iter().find(|c| c.as_str().eq_ignore_ascii_case(name))
    }

    /// City centre.
    pub fn location(self) -> Location {
        let (latitude, longitude) = match self {
            Self::Paris      => (48.85661, 2.351499),
            Self::Cologne    => (50.938361, 6.959974),
            Self::Brussels   => (50.846557, 4.351697),
            Self::Amsterdam  => (52.370216, 4.895168),
            Self::Hamburg    => (53.550341, 10.000654),
            Self::Dusseldorf => (51.225402, 6.776314),
        };
        Location { latitude, longitude }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HousingType {
    Apartment,
    House,
    Room,
    Hotel,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub title: String,
    pub description: String,
    pub city: City,
    pub preview_image: String,
    pub images: Vec<String>,
    pub is_premium: bool,
    pub is_favorite: bool,
    pub rating: f64,
    pub housing_type: HousingType,
    pub room_count: u8,
    pub guest_count: u8,
    pub price: u32,
    pub amenities: Vec<String>,
    pub author: User,
    pub comment_count: u32,
    pub location: Location,
}

/// Public view of an offer. The author is projected through [`UserRdo`].
pub struct OfferRdo;

impl Projection for OfferRdo {
    const SHAPE: &'static [Field] = &[
        Field::plain("id"),
        Field::plain("title"),
        Field::plain("description"),
        Field::plain("city"),
        Field::plain("previewImage"),
        Field::plain("images"),
        Field::plain("isPremium"),
        Field::plain("isFavorite"),
        Field::plain("rating"),
        Field::plain("housingType"),
        Field::plain("roomCount"),
        Field::plain("guestCount"),
        Field::plain("price"),
        Field::plain("amenities"),
        Field::nested("author", UserRdo::SHAPE),
        Field::plain("commentCount"),
        Field::plain("location"),
    ];
}

/// Offer persistence, provided by the host application.
#[async_trait]
pub trait OfferService: Send + Sync + 'static {
    async fn create(&self, dto: CreateOfferDto) -> anyhow::Result<Offer>;
    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Offer>>;
    async fn find(&self, limit: Option<usize>) -> anyhow::Result<Vec<Offer>>;
    async fn update_by_id(&self, id: &str, dto: UpdateOfferDto) -> anyhow::Result<Option<Offer>>;

    /// Removes the offer, returning it if it existed.
    async fn delete_by_id(&self, id: &str) -> anyhow::Result<Option<Offer>>;
    async fn exists(&self, id: &str) -> anyhow::Result<bool>;
    async fn find_premium(&self, city: City) -> anyhow::Result<Vec<Offer>>;
}
