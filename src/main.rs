use actix_web::{App, HttpServer, middleware::Logger, web};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use authcore::{
  adapters::http::{
    AuthRouteDependencies, GoogleRouteDependencies, RefreshCookie, RequestIdMiddleware,
    configure_auth_routes, health_handler,
  },
  application::auth::{
    GetCurrentUserUseCase, LoginGoogleUseCase, LoginUserUseCase, LogoutUserUseCase,
    RedirectGoogleUseCase, RefreshAccessTokenUseCase, RegisterUserUseCase,
  },
  domain::auth::{
    ports::{OAuthProvider, TokenService},
    services::{AuthService, AuthServiceConfig, AuthServiceDependencies},
  },
  infrastructure::{
    config::{Config, DatabaseConfig},
    oauth::{GoogleOAuthProvider, MockOAuthProvider},
    persistence::{
      InMemoryRepository,
      postgres::{
        PostgresSessionRepository, PostgresUserProfileRepository, PostgresUserProviderRepository,
        PostgresUserRepository,
      },
    },
    security::{Argon2PasswordEncrypter, JwtTokenService, SecureRefreshTokenGenerator},
  },
};

const DEFAULT_EXCHANGE_TIMEOUT_SECONDS: u64 = 10;

async fn connect_database(database: &DatabaseConfig) -> std::io::Result<PgPool> {
  tracing::info!("Connecting to database");

  let db_pool = tokio::time::timeout(
    Duration::from_secs(database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(database.max_connections)
      .acquire_timeout(Duration::from_secs(database.acquire_timeout_seconds))
      .connect(&database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    match e {
      sqlx::Error::Io(_) => std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "Could not connect to database. Is PostgreSQL running?",
      ),
      _ => std::io::Error::other(format!("Database error: {}", e)),
    }
  })?;

  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .map_err(|e| std::io::Error::other(format!("Failed to run database migrations: {}", e)))?;
  tracing::info!("Database migrations completed");

  Ok(db_pool)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "authcore=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting authcore");

  let config = Config::load().expect("Failed to load configuration");
  tracing::info!("Configuration loaded successfully");

  // Initialize security services
  let password_encrypter = Arc::new(
    Argon2PasswordEncrypter::new(&config.password).expect("Failed to create password encrypter"),
  );
  let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_config(&config.jwt));
  let refresh_tokens = Arc::new(SecureRefreshTokenGenerator::new());

  // Initialize repositories
  let deps = match &config.database {
    Some(database) => {
      let db_pool = connect_database(database).await?;
      AuthServiceDependencies {
        user_repo: Arc::new(PostgresUserRepository::new(db_pool.clone())),
        provider_repo: Arc::new(PostgresUserProviderRepository::new(db_pool.clone())),
        profile_repo: Arc::new(PostgresUserProfileRepository::new(db_pool.clone())),
        session_repo: Arc::new(PostgresSessionRepository::new(db_pool)),
        password_encrypter,
        token_service: token_service.clone(),
        refresh_tokens,
      }
    }
    None => {
      tracing::warn!("No database configured, using in-memory persistence");
      let store = Arc::new(InMemoryRepository::new());
      AuthServiceDependencies {
        user_repo: store.clone(),
        provider_repo: store.clone(),
        profile_repo: store.clone(),
        session_repo: store,
        password_encrypter,
        token_service: token_service.clone(),
        refresh_tokens,
      }
    }
  };

  let auth_service = Arc::new(AuthService::new(
    deps,
    AuthServiceConfig {
      refresh_token_ttl_seconds: config.session.refresh_token_ttl_seconds,
    },
  ));

  // Initialize the OAuth provider; without one the Google routes stay unmounted
  let oauth_provider: Option<(Arc<dyn OAuthProvider>, u64)> = if Config::mock_oauth_enabled() {
    tracing::info!("Using mock OAuth provider for development");
    let redirect_url = format!(
      "http://{}:{}/api/v1/auth/google/callback",
      config.server.host, config.server.port
    );
    let exchange_timeout = config
      .google
      .as_ref()
      .map(|google| google.exchange_timeout_seconds)
      .unwrap_or(DEFAULT_EXCHANGE_TIMEOUT_SECONDS);
    let provider: Arc<dyn OAuthProvider> = Arc::new(
      MockOAuthProvider::new(&redirect_url).expect("Failed to create mock OAuth provider"),
    );
    Some((provider, exchange_timeout))
  } else if let Some(google) = &config.google {
    let provider: Arc<dyn OAuthProvider> = Arc::new(
      GoogleOAuthProvider::new(google).expect("Failed to create Google OAuth provider"),
    );
    Some((provider, google.exchange_timeout_seconds))
  } else {
    tracing::warn!("Google OAuth configuration not found, Google sign-in disabled");
    None
  };

  // Cancel in-flight OAuth exchanges when the server is asked to stop
  let shutdown = CancellationToken::new();
  let signal_token = shutdown.clone();
  actix_web::rt::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      tracing::info!("Shutdown signal received");
      signal_token.cancel();
    }
  });

  // Initialize use cases
  let route_deps = AuthRouteDependencies {
    register: Arc::new(RegisterUserUseCase::new(auth_service.clone())),
    login: Arc::new(LoginUserUseCase::new(auth_service.clone())),
    google: oauth_provider.map(|(provider, exchange_timeout)| GoogleRouteDependencies {
      login: Arc::new(LoginGoogleUseCase::new(
        auth_service.clone(),
        provider.clone(),
        Duration::from_secs(exchange_timeout),
      )),
      redirect: Arc::new(RedirectGoogleUseCase::new(provider)),
    }),
    refresh: Arc::new(RefreshAccessTokenUseCase::new(auth_service.clone())),
    logout: Arc::new(LogoutUserUseCase::new(auth_service.clone())),
    current_user: Arc::new(GetCurrentUserUseCase::new(auth_service)),
    token_service,
    refresh_cookie: RefreshCookie::new(&config.session),
    shutdown,
  };

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    let route_deps = route_deps.clone();
    App::new()
      .wrap(RequestIdMiddleware::new())
      .wrap(Logger::default())
      .service(
        web::scope("/api/v1/auth").configure(move |cfg| configure_auth_routes(cfg, route_deps)),
      )
      .route("/health", web::get().to(health_handler))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await
}
