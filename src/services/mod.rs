//! Services module
//!
//! This module contains the delivery capability and the notification
//! service built on top of it.

pub mod courier;
pub mod notification;

pub use courier::{Courier, TelegramCourier};
pub use notification::{NotificationService, NotificationStats};
