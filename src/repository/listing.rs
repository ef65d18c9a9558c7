//! Repository implementation for stored apartment listings.

use std::collections::HashSet;

use chrono::{Duration, Utc};
use diesel::{prelude::*, upsert::excluded};

use crate::domain::listing::{Listing, ListingSource, NewListing};
use crate::models::listing::{Apartment as DbApartment, NewApartment as DbNewApartment};
use crate::repository::{
    DieselRepository, ListingListQuery, ListingReader, ListingSearchQuery, ListingWriter,
    errors::RepositoryResult,
};

impl ListingReader for DieselRepository {
    fn get_listing_by_id(&self, id: i32) -> RepositoryResult<Option<Listing>> {
        use crate::schema::apartments;

        let mut conn = self.conn()?;
        let db_apartment = apartments::table
            .filter(apartments::id.eq(id))
            .first::<DbApartment>(&mut conn)
            .optional()?;

        Ok(db_apartment.map(Into::into))
    }

    fn get_listing_by_key(
        &self,
        source: &ListingSource,
        external_id: &str,
    ) -> RepositoryResult<Option<Listing>> {
        use crate::schema::apartments;

        let mut conn = self.conn()?;
        let db_apartment = apartments::table
            .filter(apartments::external_id.eq(external_id))
            .filter(apartments::source.eq(source.to_string()))
            .first::<DbApartment>(&mut conn)
            .optional()?;

        Ok(db_apartment.map(Into::into))
    }

    fn list_listings(&self, query: ListingListQuery) -> RepositoryResult<(usize, Vec<Listing>)> {
        use crate::schema::apartments;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = apartments::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(city) = &query.city {
                items = items.filter(apartments::city.like(format!("%{city}%")));
            }
            if let Some(source) = &query.source {
                items = items.filter(apartments::source.eq(source.to_string()));
            }
            items
        };

        // Total count before pagination is applied
        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let db_apartments = items
            .order(apartments::created_at.desc())
            .load::<DbApartment>(&mut conn)?;

        Ok((total, db_apartments.into_iter().map(Into::into).collect()))
    }

    fn search_listings(
        &self,
        query: ListingSearchQuery,
    ) -> RepositoryResult<(usize, Vec<Listing>)> {
        use crate::schema::apartments;

        let mut conn = self.conn()?;

        let query_builder = || {
            // Listings with a negative price never match, whatever the
            // requested bounds are.
            let mut items = apartments::table
                .filter(apartments::price.ge(0))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(city) = &query.city {
                items = items.filter(apartments::city.like(format!("%{city}%")));
            }
            if let Some(min_price) = query.min_price {
                items = items.filter(apartments::price.ge(min_price));
            }
            if let Some(max_price) = query.max_price {
                items = items.filter(apartments::price.le(max_price));
            }
            if let Some(min_rooms) = query.min_rooms {
                items = items.filter(apartments::rooms.ge(min_rooms));
            }
            if let Some(max_rooms) = query.max_rooms {
                items = items.filter(apartments::rooms.le(max_rooms));
            }
            if let Some(min_area) = query.min_area {
                items = items.filter(apartments::area.ge(min_area));
            }
            if let Some(max_area) = query.max_area {
                items = items.filter(apartments::area.le(max_area));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let db_apartments = items
            .order(apartments::created_at.desc())
            .load::<DbApartment>(&mut conn)?;

        Ok((total, db_apartments.into_iter().map(Into::into).collect()))
    }

    fn list_known_listing_keys(&self) -> RepositoryResult<HashSet<String>> {
        use crate::schema::apartments;

        let mut conn = self.conn()?;
        let pairs = apartments::table
            .select((apartments::source, apartments::external_id))
            .load::<(String, String)>(&mut conn)?;

        Ok(pairs
            .into_iter()
            .map(|(source, external_id)| format!("{source}_{external_id}"))
            .collect())
    }
}

impl ListingWriter for DieselRepository {
    fn upsert_listing(&self, new_listing: &NewListing) -> RepositoryResult<Listing> {
        use crate::schema::apartments;

        let mut conn = self.conn()?;

        let db_new: DbNewApartment = new_listing.into();
        let now = Utc::now().naive_utc();

        // `created_at` is deliberately left out of the conflict update so a
        // refreshed listing keeps its first-seen time.
        let db_apartment = diesel::insert_into(apartments::table)
            .values(&db_new)
            .on_conflict((apartments::external_id, apartments::source))
            .do_update()
            .set((
                apartments::title.eq(excluded(apartments::title)),
                apartments::description.eq(excluded(apartments::description)),
                apartments::price.eq(excluded(apartments::price)),
                apartments::price_type.eq(excluded(apartments::price_type)),
                apartments::city.eq(excluded(apartments::city)),
                apartments::district.eq(excluded(apartments::district)),
                apartments::street.eq(excluded(apartments::street)),
                apartments::postal_code.eq(excluded(apartments::postal_code)),
                apartments::rooms.eq(excluded(apartments::rooms)),
                apartments::area.eq(excluded(apartments::area)),
                apartments::floor.eq(excluded(apartments::floor)),
                apartments::total_floors.eq(excluded(apartments::total_floors)),
                apartments::property_type.eq(excluded(apartments::property_type)),
                apartments::features.eq(excluded(apartments::features)),
                apartments::images.eq(excluded(apartments::images)),
                apartments::contact_info.eq(excluded(apartments::contact_info)),
                apartments::original_url.eq(excluded(apartments::original_url)),
                apartments::application_url.eq(excluded(apartments::application_url)),
                apartments::updated_at.eq(now),
            ))
            .get_result::<DbApartment>(&mut conn)?;

        Ok(db_apartment.into())
    }

    fn delete_listings_older_than(&self, days: i64) -> RepositoryResult<usize> {
        use crate::schema::apartments;

        let mut conn = self.conn()?;
        let cutoff = Utc::now().naive_utc() - Duration::days(days);

        let deleted = diesel::delete(apartments::table.filter(apartments::created_at.lt(cutoff)))
            .execute(&mut conn)?;

        Ok(deleted)
    }
}
