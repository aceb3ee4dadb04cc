use crate::clock::{SharedClock, SystemClock};
use crate::database::{migrations, ClubDatabase, SqliteRepository};
use crate::infra::config::{figment, AppConfig};
use crate::infra::tera::configure_template_engines;
use crate::users::UserRepository as _;
use anyhow::{Context as _, Result};
use rocket::fairing::{self, AdHoc, Fairing};
use rocket::figment::Figment;
use rocket::fs::FileServer;
use rocket::tokio::fs::create_dir_all;
use rocket::{error, info, launch, Build, Orbit, Rocket};
use rocket_db_pools::Database as _;
use rocket_dyn_templates::Template;
use std::sync::Arc;

mod auth;
mod clock;
mod database;
mod error_pages;
mod events;
mod ids;
mod infra;
mod login;
mod pagination;
mod result;
mod search;
mod template;
#[cfg(test)]
mod testing;
mod users;
mod validation;
mod venues;

#[launch]
fn rocket() -> _ {
    build(figment())
}

pub(crate) fn build(figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .attach(ClubDatabase::init())
        .attach(migrations())
        .attach(Template::custom(|engines| {
            configure_template_engines(engines)
        }))
        .attach(AdHoc::config::<AppConfig>())
        .attach(media_files())
        .attach(AdHoc::on_liftoff("First User Notice", |rocket| {
            Box::pin(async move {
                if let Err(e) = announce_first_user(rocket).await {
                    error!("failed to check for existing users: {e:?}");
                }
            })
        }))
        .manage::<SharedClock>(Arc::new(SystemClock))
        .mount("/", events::routes())
        .mount("/", venues::routes())
        .mount("/", login::routes())
        .register("/", error_pages::catchers())
        .register("/", login::catchers())
}

/// Serves uploaded venue images from the configured media directory.
fn media_files() -> impl Fairing {
    AdHoc::try_on_ignite("Media Files", mount_media_files)
}

async fn mount_media_files(rocket: Rocket<Build>) -> fairing::Result {
    let config: AppConfig = match rocket.figment().extract() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid application configuration: {e}");
            return Err(rocket);
        }
    };
    if let Err(e) = create_dir_all(&config.media_dir).await {
        error!(
            "failed to create media directory {}: {e}",
            config.media_dir.display()
        );
        return Err(rocket);
    }
    Ok(rocket.mount("/media", FileServer::from(config.media_dir)))
}

async fn announce_first_user(rocket: &Rocket<Orbit>) -> Result<()> {
    let Some(database) = ClubDatabase::fetch(rocket) else {
        return Ok(());
    };
    let connection = database
        .acquire()
        .await
        .context("failed to acquire a database connection")?;
    if !SqliteRepository(connection).has_users().await? {
        info!("no users yet, the next registration becomes the superuser");
    }
    Ok(())
}
