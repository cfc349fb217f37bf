//! Outdial Core - Shared service infrastructure
//!
//! This crate provides:
//! - Standard service trait all outdial microservices implement
//! - Error handling utilities
//! - Configuration management

pub mod config;
pub mod error;
pub mod service;

pub use config::ServiceConfig;
pub use error::{OutdialError, Result};
pub use service::{DependencyStatus, HealthStatus, MicroserviceRuntime, OutdialService, ReadinessStatus};
