//! Alert delivery over provider HTTP APIs.
//!
//! This crate provides:
//! - `Notifier` trait, one implementation per channel (WhatsApp relay,
//!   Telegram, SendGrid/Mailgun email, signed custom webhooks)
//! - Minijinja rendering of the alert text, subject and HTML email
//! - `Dispatcher`, which routes an integration to its adapter and
//!   reduces every outcome to a boolean

pub mod dispatcher;
pub mod email;
pub mod telegram;
pub mod templating;
pub mod traits;
pub mod webhook;
pub mod whatsapp;

pub use dispatcher::Dispatcher;
pub use templating::MessageRenderer;
pub use traits::{sample_alert, Notifier, NotifyError};
