use std::process;
use std::sync::Arc;

use clinica::{
    application::{
        admin::{
            banners::AdminBannerService, categories::AdminCategoryService,
            contact::AdminContactService, media::AdminMediaService, news::AdminNewsService,
            posts::AdminPostService, services::AdminServiceService, team::AdminTeamService,
            users::AdminUserService,
        },
        audit::AuditService,
        auth::AuthService,
        error::AppError,
        repos::{
            AuditRepo, AuthRepo, BannersRepo, CategoriesRepo, ContactRepo, MediaRepo, NewsRepo,
            NewsWriteRepo, PostsRepo, PostsWriteRepo, ServicesRepo, ServicesWriteRepo, TeamRepo,
            UsersRepo,
        },
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, ApiState},
        media::MediaStorage,
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match cli_args
        .command
        .unwrap_or(config::Command::Serve(config::ServeArgs::default()))
    {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let pool = PostgresRepositories::connect(
        &settings.database.url,
        settings.database.max_connections,
    )
    .await
    .map_err(InfraError::database)?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(InfraError::database)?;

    let repos = Arc::new(PostgresRepositories::new(pool));
    let state = build_state(repos, &settings)?;

    let addr = settings
        .listen_addr()
        .map_err(|err| AppError::unexpected(err.to_string()))?;

    http::serve(http::build_router(state), addr).await?;
    Ok(())
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let pool = PostgresRepositories::connect(
        &settings.database.url,
        settings.database.max_connections,
    )
    .await
    .map_err(InfraError::database)?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(InfraError::database)?;

    info!("migrations applied");
    Ok(())
}

fn build_state(
    repos: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> Result<ApiState, AppError> {
    let posts_repo: Arc<dyn PostsRepo> = repos.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = repos.clone();
    let news_repo: Arc<dyn NewsRepo> = repos.clone();
    let news_write_repo: Arc<dyn NewsWriteRepo> = repos.clone();
    let services_repo: Arc<dyn ServicesRepo> = repos.clone();
    let services_write_repo: Arc<dyn ServicesWriteRepo> = repos.clone();
    let team_repo: Arc<dyn TeamRepo> = repos.clone();
    let banners_repo: Arc<dyn BannersRepo> = repos.clone();
    let contact_repo: Arc<dyn ContactRepo> = repos.clone();
    let media_repo: Arc<dyn MediaRepo> = repos.clone();
    let categories_repo: Arc<dyn CategoriesRepo> = repos.clone();
    let users_repo: Arc<dyn UsersRepo> = repos.clone();
    let audit_repo: Arc<dyn AuditRepo> = repos.clone();
    let auth_repo: Arc<dyn AuthRepo> = repos.clone();

    let audit = AuditService::new(audit_repo);
    let auth = AuthService::new(auth_repo);

    let media_storage = MediaStorage::new(
        settings.media.root.clone(),
        settings.media.public_base.clone(),
    )
    .map_err(InfraError::Io)?;

    Ok(ApiState {
        auth,
        audit: audit.clone(),
        posts: Arc::new(AdminPostService::new(
            posts_repo,
            posts_write_repo,
            audit.clone(),
        )),
        news: Arc::new(AdminNewsService::new(
            news_repo,
            news_write_repo,
            audit.clone(),
        )),
        services: Arc::new(AdminServiceService::new(
            services_repo,
            services_write_repo,
            audit.clone(),
        )),
        team: Arc::new(AdminTeamService::new(team_repo, audit.clone())),
        banners: Arc::new(AdminBannerService::new(banners_repo, audit.clone())),
        contact: Arc::new(AdminContactService::new(contact_repo, audit.clone())),
        media: Arc::new(AdminMediaService::new(media_repo, audit.clone())),
        categories: Arc::new(AdminCategoryService::new(categories_repo, audit.clone())),
        users: Arc::new(AdminUserService::new(users_repo, audit)),
        media_storage: Arc::new(media_storage),
        db: Some(repos),
    })
}
