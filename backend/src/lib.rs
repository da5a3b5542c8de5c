pub mod canonical;
pub mod catchers;
pub mod config;
pub mod error;
pub mod mail;
pub mod memory;
pub mod pages;
pub mod pg;
pub mod routes;
pub mod store;
pub mod subscription;
pub mod utils;
pub mod voting;
pub use shared::{models::*, paths, validation, voter};

use std::path::Path;
use rocket::{catchers, Build, Rocket};
use rocket_dyn_templates::Template;
use routes::AppState;

/// Assembles the site: route table, catchers, templates and shared state.
pub fn build_rocket(state: AppState, template_dir: impl AsRef<Path>) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("template_dir", template_dir.as_ref().display().to_string()));

    rocket::custom(figment)
        .attach(Template::fairing())
        .manage(state)
        .mount("/", routes::all())
        .register(
            "/",
            catchers![
                catchers::not_found,
                catchers::internal_error,
                catchers::default
            ],
        )
}
