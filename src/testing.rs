//! Fixtures shared by the repository and route tests.

use crate::auth::{hash_password_with_cost, USER_ID_COOKIE_NAME};
use crate::database::{ClubDatabase, SqliteRepository};
use crate::events::{Event, EventDetails, EventRepository, NewEvent};
use crate::users::{NewUser, Role, User, UserId, UserRepository};
use crate::venues::{NewVenue, Venue, VenueDetails, VenueId, VenueRepository};
use crate::infra::config::figment;
use rand::distr::{Alphanumeric, SampleString as _};
use rand::rng;
use rocket::figment::providers::Serialized;
use rocket::http::Cookie;
use rocket::local::asynchronous::Client;
use rocket_db_pools::Database as _;
use sqlx::sqlite::SqlitePoolOptions;
use time::macros::format_description;
use time::PrimitiveDateTime;

/// A fresh, migrated in-memory database.
pub(crate) async fn repository() -> SqliteRepository {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();
    SqliteRepository(pool.acquire().await.unwrap())
}

/// The whole application on a fresh database file and media directory.
pub(crate) async fn client() -> Client {
    let dir = std::env::temp_dir().join(format!(
        "club-calendar-test-{}",
        Alphanumeric.sample_string(&mut rng(), 12)
    ));
    std::fs::create_dir_all(&dir).unwrap();
    let figment = figment()
        .merge(Serialized::global(
            "databases.sqlite.url",
            dir.join("club-calendar.sqlite").display().to_string(),
        ))
        .merge(Serialized::global("media_dir", dir.join("media")));
    Client::tracked(crate::build(figment)).await.unwrap()
}

/// A connection to the database behind `client`.
pub(crate) async fn client_repository(client: &Client) -> SqliteRepository {
    let database = ClubDatabase::fetch(client.rocket()).unwrap();
    SqliteRepository(database.acquire().await.unwrap())
}

/// Adds a user whose password is `password`, hashed cheaply.
pub(crate) async fn add_user_with_password(
    repository: &mut SqliteRepository,
    username: &str,
    password: &str,
) -> User {
    let password_hash = hash_password_with_cost(password.to_owned(), 4).await.unwrap();
    repository
        .add_user(NewUser {
            password_hash,
            ..new_user(username)
        })
        .await
        .unwrap()
}

/// The cookie a signed in `user` sends along.
pub(crate) fn login_cookie(user: &User) -> Cookie<'static> {
    Cookie::new(USER_ID_COOKIE_NAME, user.id.to_string())
}

pub(crate) fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_owned(),
        first_name: username.to_owned(),
        last_name: "Tester".to_owned(),
        email_address: format!("{username}@example.com"),
        password_hash: "not-a-real-hash".to_owned(),
    }
}

pub(crate) fn user_with_role(role: Role) -> User {
    User {
        id: UserId(1),
        username: "ada".to_owned(),
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        email_address: "ada@example.com".to_owned(),
        password_hash: String::new(),
        role,
    }
}

pub(crate) async fn add_user(repository: &mut SqliteRepository, username: &str) -> User {
    repository.add_user(new_user(username)).await.unwrap()
}

pub(crate) fn venue_details(name: &str) -> VenueDetails {
    VenueDetails {
        name: name.to_owned(),
        address: "1 Main Street".to_owned(),
        zip_code: "12345".to_owned(),
        phone: String::new(),
        web: String::new(),
        email_address: String::new(),
    }
}

pub(crate) async fn add_venue(
    repository: &mut SqliteRepository,
    owner_id: UserId,
    name: &str,
) -> Venue {
    repository
        .add_venue(NewVenue {
            details: venue_details(name),
            owner_id,
            image: None,
        })
        .await
        .unwrap()
}

pub(crate) fn event_details(name: &str, venue_id: Option<VenueId>, date: &str) -> EventDetails {
    EventDetails {
        name: name.to_owned(),
        event_date: datetime(date),
        venue_id,
        description: format!("All about {name}"),
    }
}

pub(crate) async fn add_event(
    repository: &mut SqliteRepository,
    name: &str,
    venue_id: Option<VenueId>,
    date: &str,
) -> Event {
    repository
        .add_event(NewEvent {
            details: event_details(name, venue_id, date),
            manager_id: None,
            attendees: Vec::new(),
        })
        .await
        .unwrap()
}

/// Parses `YYYY-MM-DD HH:MM`.
pub(crate) fn datetime(value: &str) -> PrimitiveDateTime {
    PrimitiveDateTime::parse(value, format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .unwrap()
}
