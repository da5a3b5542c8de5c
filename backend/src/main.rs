use meetup::{build_rocket, config::SiteConfig, routes::AppState};
use shuttle_runtime::CustomError;
use sqlx::PgPool;
use tracing::info;
use include_dir::{include_dir, Dir};
use uuid::Uuid;

static TEMPLATES_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

#[shuttle_runtime::main]
async fn rocket(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secret_store: shuttle_runtime::SecretStore,
) -> shuttle_rocket::ShuttleRocket {
    info!("🚀 Starting meetup site");

    let config = SiteConfig::from_secrets(|key| secret_store.get(key));
    let app_state = AppState::with_postgres(pool.clone(), config);

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(CustomError::new)?;

    info!("📋 Migrations complete");

    let template_dir = std::env::temp_dir().join(format!("meetup_templates_{}", Uuid::new_v4()));
    std::fs::create_dir_all(&template_dir).map_err(CustomError::new)?;
    TEMPLATES_DIR.extract(&template_dir).map_err(CustomError::new)?;

    info!("🖼️ Templates extracted to {}", template_dir.display());

    Ok(build_rocket(app_state, template_dir).into())
}
