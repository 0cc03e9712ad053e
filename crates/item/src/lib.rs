//! MShop items
//!
//! Items are the value objects passed between managers and the storefront.
//! Each item keeps its values under prefixed keys (`order.statuspayment`,
//! `locale.currency.label`, ...), validates them in its setters and tracks
//! whether anything changed since it was loaded.
//!
//! # Example
//!
//! ```
//! use mshop_item::{Item, Order, PaymentStatus};
//! use serde_json::json;
//!
//! let values = json!({"order.id": "1", "order.statuspayment": 4, "order.type": "web"});
//! let mut order = Order::from_values(values.as_object().cloned().unwrap()).unwrap();
//! assert!(!order.is_modified());
//!
//! order.set_payment_status(PaymentStatus::Received);
//! assert!(order.is_modified());
//! assert_eq!(order.old_payment_status(), PaymentStatus::Pending);
//! assert!(order.date_payment().is_some());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod base;
pub mod currency;
pub mod error;
pub mod order;
pub mod order_attribute;

pub use base::{CODE_MAX_LENGTH, DATETIME_FORMAT, Item, ItemBase, ValueMap, check_code};
pub use currency::{Currency, check_currency_id};
pub use error::{ItemError, ItemResult};
pub use order::{DeliveryStatus, Order, PaymentStatus};
pub use order_attribute::OrderProductAttribute;
