use super::{NewVenue, Venue, VenueDetails, VenueId};
use crate::database::SqliteRepository;
use crate::pagination::PageWindow;
use anyhow::Result;
use rocket::async_trait;

#[async_trait]
pub(crate) trait VenueRepository: Send {
    async fn add_venue(&mut self, venue: NewVenue) -> Result<Venue>;

    /// Replaces the editable fields and, if given, the image.
    /// Returns `false` if there is no such venue.
    async fn update_venue(
        &mut self,
        id: VenueId,
        details: VenueDetails,
        image: Option<String>,
    ) -> Result<bool>;

    /// Deletes the venue together with all of its events.
    async fn delete_venue(&mut self, id: VenueId) -> Result<bool>;

    async fn venue_by_id(&mut self, id: VenueId) -> Result<Option<Venue>>;

    /// All venues in store order (by id).
    async fn all_venues(&mut self) -> Result<Vec<Venue>>;

    async fn count_venues(&mut self) -> Result<u64>;

    async fn venues_page(&mut self, window: &PageWindow) -> Result<Vec<Venue>>;

    /// Venues whose name contains `term`, ordered by name.
    async fn search_venues(&mut self, term: &str) -> Result<Vec<Venue>>;
}

#[async_trait]
impl VenueRepository for SqliteRepository {
    async fn add_venue(&mut self, venue: NewVenue) -> Result<Venue> {
        let NewVenue {
            details,
            owner_id,
            image,
        } = venue;
        Ok(sqlx::query_as(
            "INSERT INTO venues (name, address, zip_code, phone, web, email_address, owner_id, image)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING *",
        )
        .bind(details.name)
        .bind(details.address)
        .bind(details.zip_code)
        .bind(details.phone)
        .bind(details.web)
        .bind(details.email_address)
        .bind(owner_id)
        .bind(image)
        .fetch_one(&mut *self.0)
        .await?)
    }

    async fn update_venue(
        &mut self,
        id: VenueId,
        details: VenueDetails,
        image: Option<String>,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE venues
             SET name = ?2, address = ?3, zip_code = ?4, phone = ?5, web = ?6,
                 email_address = ?7, image = coalesce(?8, image)
             WHERE id = ?1",
        )
        .bind(id)
        .bind(details.name)
        .bind(details.address)
        .bind(details.zip_code)
        .bind(details.phone)
        .bind(details.web)
        .bind(details.email_address)
        .bind(image)
        .execute(&mut *self.0)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete_venue(&mut self, id: VenueId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM venues WHERE id = ?1")
            .bind(id)
            .execute(&mut *self.0)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn venue_by_id(&mut self, id: VenueId) -> Result<Option<Venue>> {
        Ok(sqlx::query_as("SELECT * FROM venues WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *self.0)
            .await?)
    }

    async fn all_venues(&mut self) -> Result<Vec<Venue>> {
        Ok(sqlx::query_as("SELECT * FROM venues ORDER BY id")
            .fetch_all(&mut *self.0)
            .await?)
    }

    async fn count_venues(&mut self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT count(1) FROM venues")
            .fetch_one(&mut *self.0)
            .await?;
        Ok(u64::try_from(count)?)
    }

    async fn venues_page(&mut self, window: &PageWindow) -> Result<Vec<Venue>> {
        Ok(sqlx::query_as("SELECT * FROM venues ORDER BY id LIMIT ?1 OFFSET ?2")
            .bind(i64::try_from(window.limit)?)
            .bind(i64::try_from(window.offset)?)
            .fetch_all(&mut *self.0)
            .await?)
    }

    async fn search_venues(&mut self, term: &str) -> Result<Vec<Venue>> {
        Ok(
            sqlx::query_as("SELECT * FROM venues WHERE instr(name, ?1) > 0 ORDER BY name, id")
                .bind(term)
                .fetch_all(&mut *self.0)
                .await?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventRepository;
    use crate::pagination::Paginator;
    use crate::testing::{add_event, add_user, add_venue, repository, venue_details};
    use std::num::NonZeroU64;

    #[rocket::async_test]
    async fn adds_and_fetches_a_venue() {
        let mut repository = repository().await;
        let owner = add_user(&mut repository, "ada").await;
        let venue = add_venue(&mut repository, owner.id, "Town Hall").await;

        let fetched = repository.venue_by_id(venue.id).await.unwrap().unwrap();
        assert_eq!("Town Hall", fetched.name);
        assert_eq!(owner.id, fetched.owner_id);
        assert_eq!(None, fetched.image);
    }

    #[rocket::async_test]
    async fn update_keeps_image_unless_replaced() {
        let mut repository = repository().await;
        let owner = add_user(&mut repository, "ada").await;
        let venue = repository
            .add_venue(NewVenue {
                details: venue_details("Town Hall"),
                owner_id: owner.id,
                image: Some("images/hall.png".to_owned()),
            })
            .await
            .unwrap();

        assert!(repository
            .update_venue(venue.id, venue_details("City Hall"), None)
            .await
            .unwrap());
        let updated = repository.venue_by_id(venue.id).await.unwrap().unwrap();
        assert_eq!("City Hall", updated.name);
        assert_eq!(Some("images/hall.png"), updated.image.as_deref());

        repository
            .update_venue(venue.id, venue_details("City Hall"), Some("images/new.png".to_owned()))
            .await
            .unwrap();
        let updated = repository.venue_by_id(venue.id).await.unwrap().unwrap();
        assert_eq!(Some("images/new.png"), updated.image.as_deref());
    }

    #[rocket::async_test]
    async fn updating_a_missing_venue_reports_false() {
        let mut repository = repository().await;
        assert!(!repository
            .update_venue(VenueId(99), venue_details("Nowhere"), None)
            .await
            .unwrap());
    }

    #[rocket::async_test]
    async fn deleting_a_venue_deletes_its_events() {
        let mut repository = repository().await;
        let owner = add_user(&mut repository, "ada").await;
        let hall = add_venue(&mut repository, owner.id, "Town Hall").await;
        let park = add_venue(&mut repository, owner.id, "Park").await;
        let concert = add_event(&mut repository, "Concert", Some(hall.id), "2026-10-19 18:00").await;
        let picnic = add_event(&mut repository, "Picnic", Some(park.id), "2026-10-20 12:00").await;

        assert!(repository.delete_venue(hall.id).await.unwrap());

        assert!(repository.venue_by_id(hall.id).await.unwrap().is_none());
        assert!(repository.event_by_id(concert.id).await.unwrap().is_none());
        assert!(repository.event_by_id(picnic.id).await.unwrap().is_some());
        assert!(!repository.delete_venue(hall.id).await.unwrap());
    }

    #[rocket::async_test]
    async fn pages_through_venues_in_id_order() {
        let mut repository = repository().await;
        let owner = add_user(&mut repository, "ada").await;
        for name in ["A", "B", "C", "D", "E"] {
            add_venue(&mut repository, owner.id, name).await;
        }
        let paginator = Paginator::new(NonZeroU64::new(2).unwrap());
        let total = repository.count_venues().await.unwrap();
        assert_eq!(5, total);

        let window = paginator.window(Some(10), total);
        assert_eq!(3, window.num_pages);
        let last_page = repository.venues_page(&window).await.unwrap();
        assert_eq!(vec!["E"], names(&last_page));

        let second_page = repository
            .venues_page(&paginator.window(Some(2), total))
            .await
            .unwrap();
        assert_eq!(vec!["C", "D"], names(&second_page));
    }

    #[rocket::async_test]
    async fn empty_search_matches_every_venue() {
        let mut repository = repository().await;
        let owner = add_user(&mut repository, "ada").await;
        add_venue(&mut repository, owner.id, "Town Hall").await;
        add_venue(&mut repository, owner.id, "Park").await;

        let found = repository.search_venues("").await.unwrap();
        assert_eq!(vec!["Park", "Town Hall"], names(&found));
    }

    #[rocket::async_test]
    async fn search_matches_substrings_of_the_name() {
        let mut repository = repository().await;
        let owner = add_user(&mut repository, "ada").await;
        add_venue(&mut repository, owner.id, "Town Hall").await;
        add_venue(&mut repository, owner.id, "Music Hall").await;
        add_venue(&mut repository, owner.id, "Park").await;

        let found = repository.search_venues("Hall").await.unwrap();
        assert_eq!(vec!["Music Hall", "Town Hall"], names(&found));
        assert!(repository.search_venues("Stadium").await.unwrap().is_empty());
    }

    fn names(venues: &[Venue]) -> Vec<&str> {
        venues.iter().map(|v| v.name.as_str()).collect()
    }
}
