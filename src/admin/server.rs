//! Admin server implementation
//!
//! Owns the shared application state and serves the admin API over axum,
//! with optional CORS and request logging layers.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::logconf::DocumentStore;
use crate::registry::{
    LoggerRegistry, MemoryInventory, MemoryLoggerRegistry, MemoryScheduleRegistry,
    RuntimeInventory, ScheduleRegistry,
};

use super::api::create_router;
use super::loggers::LoggersController;
use super::sched::SchedulersController;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the admin server
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Server bind address
    pub bind_address: SocketAddr,

    /// Directory holding the logging document (`logging.yaml`)
    pub etc_dir: PathBuf,

    /// Bearer token for mutating routes; unset fails all guarded requests
    pub api_token: Option<String>,

    /// Runtime version stamped into the logging document
    pub runtime_version: String,

    /// Enable CORS for the API
    pub enable_cors: bool,

    /// Enable request logging
    pub enable_request_logging: bool,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".parse().unwrap(),
            etc_dir: PathBuf::from("etc"),
            api_token: None,
            runtime_version: env!("CARGO_PKG_VERSION").to_string(),
            enable_cors: true,
            enable_request_logging: true,
        }
    }
}

impl AdminConfig {
    /// Create a new config builder
    pub fn builder() -> AdminConfigBuilder {
        AdminConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_token.as_deref() == Some("") {
            return Err(ConfigError::InvalidValue {
                field: "api_token".to_string(),
                reason: "token must not be empty".to_string(),
            });
        }
        if self.runtime_version.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "runtime_version".to_string(),
                reason: "version stamp must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for AdminConfig
#[derive(Debug, Default)]
pub struct AdminConfigBuilder {
    bind_address: Option<SocketAddr>,
    etc_dir: Option<PathBuf>,
    api_token: Option<String>,
    runtime_version: Option<String>,
    enable_cors: Option<bool>,
    enable_request_logging: Option<bool>,
}

impl AdminConfigBuilder {
    /// Set bind address
    pub fn bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = Some(addr);
        self
    }

    /// Set bind address from string
    pub fn bind_address_str(mut self, addr: &str) -> Result<Self, ConfigError> {
        self.bind_address = Some(addr.parse().map_err(|_| ConfigError::InvalidValue {
            field: "bind_address".to_string(),
            reason: format!("Invalid address: {addr}"),
        })?);
        Ok(self)
    }

    /// Set the etc directory
    pub fn etc_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.etc_dir = Some(dir.into());
        self
    }

    /// Set the admin bearer token
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set the runtime version stamp
    pub fn runtime_version(mut self, version: impl Into<String>) -> Self {
        self.runtime_version = Some(version.into());
        self
    }

    /// Enable/disable CORS
    pub fn enable_cors(mut self, enable: bool) -> Self {
        self.enable_cors = Some(enable);
        self
    }

    /// Enable/disable request logging
    pub fn enable_request_logging(mut self, enable: bool) -> Self {
        self.enable_request_logging = Some(enable);
        self
    }

    /// Build the config
    pub fn build(self) -> Result<AdminConfig, ConfigError> {
        let defaults = AdminConfig::default();
        let config = AdminConfig {
            bind_address: self.bind_address.unwrap_or(defaults.bind_address),
            etc_dir: self.etc_dir.unwrap_or(defaults.etc_dir),
            api_token: self.api_token,
            runtime_version: self.runtime_version.unwrap_or(defaults.runtime_version),
            enable_cors: self.enable_cors.unwrap_or(defaults.enable_cors),
            enable_request_logging: self
                .enable_request_logging
                .unwrap_or(defaults.enable_request_logging),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

// ============================================================================
// Runtime Handles
// ============================================================================

/// The runtime registries the admin layer operates on
#[derive(Clone)]
pub struct RuntimeHandles {
    /// Live logger tree
    pub loggers: Arc<dyn LoggerRegistry>,

    /// Scheduler table
    pub schedules: Arc<dyn ScheduleRegistry>,

    /// Loaded plugin/logic inventory
    pub inventory: Arc<dyn RuntimeInventory>,
}

impl RuntimeHandles {
    /// Fresh in-memory registries, for the standalone server and tests
    pub fn in_memory() -> Self {
        Self {
            loggers: Arc::new(MemoryLoggerRegistry::new()),
            schedules: Arc::new(MemoryScheduleRegistry::new()),
            inventory: Arc::new(MemoryInventory::new()),
        }
    }
}

// ============================================================================
// App State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Loggers controller
    pub loggers: Arc<LoggersController>,

    /// Schedulers controller
    pub schedulers: Arc<SchedulersController>,

    /// Server start time
    pub start_time: Instant,

    /// Configuration
    pub config: AdminConfig,
}

// ============================================================================
// Admin Server
// ============================================================================

/// Main admin server
pub struct AdminServer {
    config: AdminConfig,
    state: AppState,
}

impl AdminServer {
    /// Create a new admin server over the given runtime handles
    pub fn new(config: AdminConfig, handles: RuntimeHandles) -> Result<Self, ServerError> {
        config
            .validate()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        let store = DocumentStore::new(&config.etc_dir, &config.runtime_version);
        let loggers = Arc::new(LoggersController::new(
            handles.loggers,
            handles.inventory,
            store,
        ));
        let schedulers = Arc::new(SchedulersController::new(handles.schedules));

        let state = AppState {
            loggers,
            schedulers,
            start_time: Instant::now(),
            config: config.clone(),
        };

        Ok(Self { config, state })
    }

    /// Get the application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let mut router = create_router(self.state.clone());

        if self.config.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        if self.config.enable_request_logging {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Start the server
    pub async fn start(&self) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.config.bind_address;

        tracing::info!("Starting admin server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(e.to_string()))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        Ok(())
    }

    /// Start with graceful shutdown
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.config.bind_address;

        tracing::info!("Starting admin server on {} (with graceful shutdown)", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(e.to_string()))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        tracing::info!("Admin server shutdown complete");
        Ok(())
    }
}

/// Server errors
#[derive(Debug, Clone, Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to bind to address
    #[error("Failed to bind: {0}")]
    Bind(String),

    /// Server error
    #[error("Server error: {0}")]
    Serve(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AdminConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.enable_cors);
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = AdminConfig::builder()
            .bind_address_str("127.0.0.1:9000")
            .unwrap()
            .etc_dir("/tmp/etc")
            .api_token("secret")
            .enable_cors(false)
            .build()
            .unwrap();

        assert_eq!(config.bind_address.port(), 9000);
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert!(!config.enable_cors);
    }

    #[test]
    fn test_empty_token_rejected() {
        let result = AdminConfig::builder().api_token("").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_server_creation() {
        let config = AdminConfig::default();
        let server = AdminServer::new(config, RuntimeHandles::in_memory());
        assert!(server.is_ok());
    }

    #[test]
    fn test_state_components() {
        let config = AdminConfig::default();
        let server = AdminServer::new(config, RuntimeHandles::in_memory()).unwrap();
        let state = server.state();

        assert!(state.loggers.active_loggers().is_empty());
        assert!(state.schedulers.list().is_empty());
    }
}
