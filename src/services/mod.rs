//! Service layer
//!
//! Services tie rule evaluation, rule storage and notification delivery
//! together.

pub mod alert_service;

pub use alert_service::{AlertService, DeliveryConfig, NotificationReport, ProcessReport};
