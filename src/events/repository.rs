use super::{Event, EventDetails, EventId, EventListing, NewEvent};
use crate::database::SqliteRepository;
use crate::users::{User, UserId};
use crate::venues::VenueId;
use anyhow::Result;
use rocket::async_trait;
use sqlx::Connection as _;
use std::collections::BTreeSet;
use time::PrimitiveDateTime;

macro_rules! select_listings {
    ($($clause:literal),*) => {
        concat!(
            "SELECT events.*, venues.name AS venue_name, users.username AS manager_name
             FROM events
             LEFT JOIN venues ON venues.id = events.venue_id
             LEFT JOIN users ON users.id = events.manager_id ",
            $($clause),*
        )
    };
}

#[async_trait]
pub(crate) trait EventRepository: Send {
    async fn add_event(&mut self, event: NewEvent) -> Result<Event>;

    /// Replaces the editable fields, the manager and the attendees.
    /// Leaves the approval flag untouched.
    async fn update_event(
        &mut self,
        id: EventId,
        details: EventDetails,
        manager_id: Option<UserId>,
        attendees: &[UserId],
    ) -> Result<bool>;

    async fn delete_event(&mut self, id: EventId) -> Result<bool>;

    async fn event_by_id(&mut self, id: EventId) -> Result<Option<Event>>;

    async fn event_listing_by_id(&mut self, id: EventId) -> Result<Option<EventListing>>;

    /// Every event, newest first.
    async fn all_events(&mut self) -> Result<Vec<EventListing>>;

    /// Events with `start <= event_date < end`, oldest first.
    /// Without an `end` the range is open.
    async fn events_between(
        &mut self,
        start: PrimitiveDateTime,
        end: Option<PrimitiveDateTime>,
    ) -> Result<Vec<EventListing>>;

    async fn events_by_manager(&mut self, manager_id: UserId) -> Result<Vec<EventListing>>;

    async fn events_by_venue(&mut self, venue_id: VenueId) -> Result<Vec<EventListing>>;

    /// Events whose description contains `term`, newest first.
    async fn search_events(&mut self, term: &str) -> Result<Vec<EventListing>>;

    async fn attendees(&mut self, id: EventId) -> Result<Vec<User>>;

    async fn count_events(&mut self) -> Result<u64>;

    /// Unapproves every event and then approves exactly `approved`,
    /// all in one transaction. Unknown ids are skipped.
    /// Returns the number of events that ended up approved.
    async fn replace_approvals(&mut self, approved: &BTreeSet<EventId>) -> Result<u64>;
}

#[async_trait]
impl EventRepository for SqliteRepository {
    async fn add_event(&mut self, event: NewEvent) -> Result<Event> {
        let NewEvent {
            details,
            manager_id,
            attendees,
        } = event;
        let mut transaction = self.0.begin().await?;

        let event: Event = sqlx::query_as(
            "INSERT INTO events (name, event_date, venue_id, manager_id, description)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING *",
        )
        .bind(details.name)
        .bind(details.event_date)
        .bind(details.venue_id)
        .bind(manager_id)
        .bind(details.description)
        .fetch_one(&mut *transaction)
        .await?;

        for user_id in attendees {
            sqlx::query("INSERT OR IGNORE INTO event_attendees (event_id, user_id) VALUES (?1, ?2)")
                .bind(event.id)
                .bind(user_id)
                .execute(&mut *transaction)
                .await?;
        }

        transaction.commit().await?;
        Ok(event)
    }

    async fn update_event(
        &mut self,
        id: EventId,
        details: EventDetails,
        manager_id: Option<UserId>,
        attendees: &[UserId],
    ) -> Result<bool> {
        let mut transaction = self.0.begin().await?;

        let updated = sqlx::query(
            "UPDATE events
             SET name = ?2, event_date = ?3, venue_id = ?4, manager_id = ?5, description = ?6
             WHERE id = ?1",
        )
        .bind(id)
        .bind(details.name)
        .bind(details.event_date)
        .bind(details.venue_id)
        .bind(manager_id)
        .bind(details.description)
        .execute(&mut *transaction)
        .await?
        .rows_affected()
            == 1;
        if !updated {
            return Ok(false);
        }

        sqlx::query("DELETE FROM event_attendees WHERE event_id = ?1")
            .bind(id)
            .execute(&mut *transaction)
            .await?;
        for &user_id in attendees {
            sqlx::query("INSERT OR IGNORE INTO event_attendees (event_id, user_id) VALUES (?1, ?2)")
                .bind(id)
                .bind(user_id)
                .execute(&mut *transaction)
                .await?;
        }

        transaction.commit().await?;
        Ok(true)
    }

    async fn delete_event(&mut self, id: EventId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?1")
            .bind(id)
            .execute(&mut *self.0)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn event_by_id(&mut self, id: EventId) -> Result<Option<Event>> {
        Ok(sqlx::query_as("SELECT * FROM events WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *self.0)
            .await?)
    }

    async fn event_listing_by_id(&mut self, id: EventId) -> Result<Option<EventListing>> {
        Ok(sqlx::query_as(select_listings!("WHERE events.id = ?1"))
            .bind(id)
            .fetch_optional(&mut *self.0)
            .await?)
    }

    async fn all_events(&mut self) -> Result<Vec<EventListing>> {
        Ok(sqlx::query_as(select_listings!(
            "ORDER BY events.event_date DESC, events.id"
        ))
        .fetch_all(&mut *self.0)
        .await?)
    }

    async fn events_between(
        &mut self,
        start: PrimitiveDateTime,
        end: Option<PrimitiveDateTime>,
    ) -> Result<Vec<EventListing>> {
        Ok(sqlx::query_as(select_listings!(
            "WHERE events.event_date >= ?1 AND (?2 IS NULL OR events.event_date < ?2) ",
            "ORDER BY events.event_date, events.id"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&mut *self.0)
        .await?)
    }

    async fn events_by_manager(&mut self, manager_id: UserId) -> Result<Vec<EventListing>> {
        Ok(sqlx::query_as(select_listings!(
            "WHERE events.manager_id = ?1 ",
            "ORDER BY events.event_date DESC, events.id"
        ))
        .bind(manager_id)
        .fetch_all(&mut *self.0)
        .await?)
    }

    async fn events_by_venue(&mut self, venue_id: VenueId) -> Result<Vec<EventListing>> {
        Ok(sqlx::query_as(select_listings!(
            "WHERE events.venue_id = ?1 ",
            "ORDER BY events.event_date DESC, events.id"
        ))
        .bind(venue_id)
        .fetch_all(&mut *self.0)
        .await?)
    }

    async fn search_events(&mut self, term: &str) -> Result<Vec<EventListing>> {
        Ok(sqlx::query_as(select_listings!(
            "WHERE instr(events.description, ?1) > 0 ",
            "ORDER BY events.event_date DESC, events.id"
        ))
        .bind(term)
        .fetch_all(&mut *self.0)
        .await?)
    }

    async fn attendees(&mut self, id: EventId) -> Result<Vec<User>> {
        Ok(sqlx::query_as(
            "SELECT users.* FROM users
             JOIN event_attendees ON event_attendees.user_id = users.id
             WHERE event_attendees.event_id = ?1
             ORDER BY users.username",
        )
        .bind(id)
        .fetch_all(&mut *self.0)
        .await?)
    }

    async fn count_events(&mut self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT count(1) FROM events")
            .fetch_one(&mut *self.0)
            .await?;
        Ok(u64::try_from(count)?)
    }

    async fn replace_approvals(&mut self, approved: &BTreeSet<EventId>) -> Result<u64> {
        let mut transaction = self.0.begin().await?;

        sqlx::query("UPDATE events SET approved = 0")
            .execute(&mut *transaction)
            .await?;
        let mut approved_count = 0;
        for id in approved {
            approved_count += sqlx::query("UPDATE events SET approved = 1 WHERE id = ?1")
                .bind(*id)
                .execute(&mut *transaction)
                .await?
                .rows_affected();
        }

        transaction.commit().await?;
        Ok(approved_count)
    }
}
