use crate::events::EventRepository;
use crate::users::UserRepository;
use crate::venues::VenueRepository;
use rocket::fairing::{self, AdHoc, Fairing};
use rocket::outcome::try_outcome;
use rocket::request::{FromRequest, Outcome};
use rocket::{async_trait, error, Build, Request, Rocket};
use rocket_db_pools::{Connection, Database};
use sqlx::pool::PoolConnection;
use sqlx::Sqlite;

pub(crate) type SqliteConnection = PoolConnection<Sqlite>;

#[derive(Database)]
#[database("sqlite")]
pub(crate) struct ClubDatabase(sqlx::SqlitePool);

/// Everything the request handlers need from the store.
pub(crate) trait Repository: UserRepository + VenueRepository + EventRepository + Send {}

impl<T> Repository for T where T: UserRepository + VenueRepository + EventRepository + Send {}

/// The single implementation of all repository traits.
/// Each entity module implements its trait for this type.
pub(crate) struct SqliteRepository(pub(crate) SqliteConnection);

#[async_trait]
impl<'r> FromRequest<'r> for Box<dyn Repository> {
    type Error = <Connection<ClubDatabase> as FromRequest<'r>>::Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let connection: Connection<ClubDatabase> = try_outcome!(request.guard().await);
        Outcome::Success(Box::new(SqliteRepository(connection.into_inner())))
    }
}

pub(crate) fn migrations() -> impl Fairing {
    AdHoc::try_on_ignite("SQLite Migrations", run_migrations)
}

async fn run_migrations(rocket: Rocket<Build>) -> fairing::Result {
    match ClubDatabase::fetch(&rocket) {
        Some(database) => match sqlx::migrate!().run(&**database).await {
            Ok(()) => Ok(rocket),
            Err(e) => {
                error!("failed to run database migrations: {e:?}");
                Err(rocket)
            }
        },
        None => Err(rocket),
    }
}

/// True when the error comes from a violated UNIQUE constraint.
pub(crate) fn is_unique_violation(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<sqlx::Error>(),
        Some(sqlx::Error::Database(e)) if e.is_unique_violation()
    )
}
