//! Diesel models for stored apartment listings.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde_json::Value;

use crate::domain::listing::{Listing as DomainListing, NewListing as DomainNewListing};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::apartments)]
pub struct Apartment {
    pub id: i32,
    pub external_id: String,
    pub source: String,
    pub title: String,
    pub description: Option<String>,
    pub price: i32,
    pub price_type: String,
    pub city: String,
    pub district: Option<String>,
    pub street: Option<String>,
    pub postal_code: Option<String>,
    pub rooms: f64,
    pub area: f64,
    pub floor: Option<i32>,
    pub total_floors: Option<i32>,
    pub property_type: String,
    pub features: String, // store JSON text in the DB
    pub images: String,
    pub contact_info: String,
    pub original_url: String,
    pub application_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::apartments)]
pub struct NewApartment {
    pub external_id: String,
    pub source: String,
    pub title: String,
    pub description: Option<String>,
    pub price: i32,
    pub price_type: String,
    pub city: String,
    pub district: Option<String>,
    pub street: Option<String>,
    pub postal_code: Option<String>,
    pub rooms: f64,
    pub area: f64,
    pub floor: Option<i32>,
    pub total_floors: Option<i32>,
    pub property_type: String,
    pub features: String,
    pub images: String,
    pub contact_info: String,
    pub original_url: String,
    pub application_url: Option<String>,
}

impl From<Apartment> for DomainListing {
    fn from(apartment: Apartment) -> Self {
        let features: Vec<String> = serde_json::from_str(&apartment.features).unwrap_or_default();
        let images: Vec<String> = serde_json::from_str(&apartment.images).unwrap_or_default();
        let contact_info: Value =
            serde_json::from_str(&apartment.contact_info).unwrap_or_default();

        Self {
            id: apartment.id,
            external_id: apartment.external_id,
            source: apartment.source.into(),
            title: apartment.title,
            description: apartment.description,
            price: apartment.price,
            price_type: apartment.price_type,
            city: apartment.city,
            district: apartment.district,
            street: apartment.street,
            postal_code: apartment.postal_code,
            rooms: apartment.rooms,
            area: apartment.area,
            floor: apartment.floor,
            total_floors: apartment.total_floors,
            property_type: apartment.property_type,
            features,
            images,
            contact_info,
            original_url: apartment.original_url,
            application_url: apartment.application_url,
            created_at: apartment.created_at,
            updated_at: apartment.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewListing> for NewApartment {
    fn from(listing: &'a DomainNewListing) -> Self {
        Self {
            external_id: listing.external_id.clone(),
            source: listing.source.to_string(),
            title: listing.title.clone(),
            description: listing.description.clone(),
            price: listing.price,
            price_type: listing.price_type.clone(),
            city: listing.city.clone(),
            district: listing.district.clone(),
            street: listing.street.clone(),
            postal_code: listing.postal_code.clone(),
            rooms: listing.rooms,
            area: listing.area,
            floor: listing.floor,
            total_floors: listing.total_floors,
            property_type: listing.property_type.clone(),
            features: Value::from(listing.features.clone()).to_string(),
            images: Value::from(listing.images.clone()).to_string(),
            contact_info: listing.contact_info.to_string(),
            original_url: listing.original_url.clone(),
            application_url: listing.application_url.clone(),
        }
    }
}

impl From<DomainNewListing> for NewApartment {
    fn from(listing: DomainNewListing) -> Self {
        Self::from(&listing)
    }
}
