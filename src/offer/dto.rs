use std::fmt::Display;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::{City, HousingType};
use crate::failure::{FieldViolation, Violations};
use crate::middleware::{Validate, is_object_id};

/// Bounds enforced on offer input.
pub mod limits {
    use std::ops::RangeInclusive;

    pub const TITLE_LEN: RangeInclusive<usize> = 10..=100;
    pub const DESCRIPTION_LEN: RangeInclusive<usize> = 20..=1024;
    pub const PRICE: RangeInclusive<u32> = 500..=2000;
    pub const RATING: RangeInclusive<f64> = 1.0..=5.0;
    pub const ROOM_COUNT: RangeInclusive<u8> = 1..=4;
    pub const GUEST_COUNT: RangeInclusive<u8> = 1..=4;
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOfferDto {
    pub title: String,
    pub description: String,
    pub city: String,
    pub preview_image: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub is_premium: bool,
    pub rating: f64,
    pub housing_type: HousingType,
    pub room_count: u8,
    pub guest_count: u8,
    pub price: u32,
    pub amenities: Vec<String>,
    pub author_id: String,
}

impl CreateOfferDto {
    /// The validated city.
    pub fn city(&self) -> Option<City> {
        City::parse(&self.city)
    }
}

impl Validate for CreateOfferDto {
    fn validate(&self) -> Vec<FieldViolation> {
        let mut v = Violations::default();
        length(&mut v, "title", &self.title, limits::TITLE_LEN);
        length(&mut v, "description", &self.description, limits::DESCRIPTION_LEN);
        city(&mut v, &self.city);
        v.check(!self.preview_image.is_empty(), "previewImage", "must not be empty");
        bounded(&mut v, "rating", self.rating, limits::RATING);
        bounded(&mut v, "roomCount", self.room_count, limits::ROOM_COUNT);
        bounded(&mut v, "guestCount", self.guest_count, limits::GUEST_COUNT);
        bounded(&mut v, "price", self.price, limits::PRICE);
        v.check(!self.amenities.is_empty(), "amenities", "must contain at least one amenity");
        v.check(is_object_id(&self.author_id), "authorId", "must be a valid id");
        v.into_vec()
    }
}

/// Partial update: only the fields present are checked and applied.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOfferDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub preview_image: Option<String>,
    pub images: Option<Vec<String>>,
    pub is_premium: Option<bool>,
    pub rating: Option<f64>,
    pub housing_type: Option<HousingType>,
    pub room_count: Option<u8>,
    pub guest_count: Option<u8>,
    pub price: Option<u32>,
    pub amenities: Option<Vec<String>>,
}

impl UpdateOfferDto {
    pub fn city(&self) -> Option<City> {
        self.city.as_deref().and_then(City::parse)
    }
}

impl Validate for UpdateOfferDto {
    fn validate(&self) -> Vec<FieldViolation> {
        let mut v = Violations::default();
        if let Some(title) = &self.title {
            length(&mut v, "title", title, limits::TITLE_LEN);
        }
        if let Some(description) = &self.description {
            length(&mut v, "description", description, limits::DESCRIPTION_LEN);
        }
        if let Some(name) = &self.city {
            city(&mut v, name);
        }
        if let Some(rating) = self.rating {
            bounded(&mut v, "rating", rating, limits::RATING);
        }
        if let Some(rooms) = self.room_count {
            bounded(&mut v, "roomCount", rooms, limits::ROOM_COUNT);
        }
        if let Some(guests) = self.guest_count {
            bounded(&mut v, "guestCount", guests, limits::GUEST_COUNT);
        }
        if let Some(price) = self.price {
            bounded(&mut v, "price", price, limits::PRICE);
        }
        if let Some(amenities) = &self.amenities {
            v.check(!amenities.is_empty(), "amenities", "must contain at least one amenity");
        }
        v.into_vec()
    }
}

// ── Rules ─────────────────────────────────────────────────────────────────────

fn length(v: &mut Violations, property: &str, value: &str, range: RangeInclusive<usize>) {
    let len = value.chars().count();
    v.check(
        range.contains(&len),
        property,
        format!("length must be between {} and {}", range.start(), range.end()),
    );
}

fn bounded<T: PartialOrd + Display>(v: &mut Violations, property: &str, value: T, range: RangeInclusive<T>) {
    if value < *range.start() {
        v.push(property, format!("must be >= {}", range.start()));
    } else if value > *range.end() {
        v.push(property, format!("must be <= {}", range.end()));
    }
}

fn city(v: &mut Violations, name: &str) {
    let known = City::ALL.map(City::as_str).join(", ");
    v.check(City::parse(name).is_some(), "city", format!("must be one of: {known}"));
}
