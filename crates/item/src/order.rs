//! Order invoice item (`order.*`).
//!
//! An order records the payment and delivery state of an order base. Setting
//! a new payment status stamps the payment date. The statuses the item was
//! loaded with are kept so that callers can detect transitions.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::base::{
    Item, ItemBase, ValueMap, check_code, format_datetime, int, optional_datetime, optional_text,
    text,
};
use crate::error::{ItemError, ItemResult};

const PREFIX: &str = "order.";

/// Delivery state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum DeliveryStatus {
    /// Order is not finished yet.
    #[default]
    Unfinished,
    /// Order was deleted.
    Deleted,
    /// Waiting for delivery.
    Pending,
    /// Delivery is in progress.
    Progress,
    /// Parcel has left the warehouse.
    Dispatched,
    /// Customer received the parcel.
    Delivered,
    /// Parcel was lost.
    Lost,
    /// Customer refused the parcel.
    Refused,
    /// Customer sent the parcel back.
    Returned,
}

impl DeliveryStatus {
    /// Stored status code.
    pub fn code(self) -> i64 {
        match self {
            Self::Unfinished => -1,
            Self::Deleted => 0,
            Self::Pending => 1,
            Self::Progress => 2,
            Self::Dispatched => 3,
            Self::Delivered => 4,
            Self::Lost => 5,
            Self::Refused => 6,
            Self::Returned => 7,
        }
    }
}

impl TryFrom<i64> for DeliveryStatus {
    type Error = ItemError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Ok(match code {
            -1 => Self::Unfinished,
            0 => Self::Deleted,
            1 => Self::Pending,
            2 => Self::Progress,
            3 => Self::Dispatched,
            4 => Self::Delivered,
            5 => Self::Lost,
            6 => Self::Refused,
            7 => Self::Returned,
            value => {
                return Err(ItemError::InvalidStatus {
                    kind: "delivery".to_string(),
                    value,
                });
            }
        })
    }
}

impl From<DeliveryStatus> for i64 {
    fn from(status: DeliveryStatus) -> Self {
        status.code()
    }
}

/// Payment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum PaymentStatus {
    /// Order is not finished yet.
    #[default]
    Unfinished,
    /// Order was deleted.
    Deleted,
    /// Payment was canceled.
    Canceled,
    /// Payment provider refused the payment.
    Refused,
    /// Money was paid back.
    Refund,
    /// Waiting for the payment.
    Pending,
    /// Payment is authorized but not captured.
    Authorized,
    /// Money was received.
    Received,
}

impl PaymentStatus {
    /// Stored status code.
    pub fn code(self) -> i64 {
        match self {
            Self::Unfinished => -1,
            Self::Deleted => 0,
            Self::Canceled => 1,
            Self::Refused => 2,
            Self::Refund => 3,
            Self::Pending => 4,
            Self::Authorized => 5,
            Self::Received => 6,
        }
    }
}

impl TryFrom<i64> for PaymentStatus {
    type Error = ItemError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Ok(match code {
            -1 => Self::Unfinished,
            0 => Self::Deleted,
            1 => Self::Canceled,
            2 => Self::Refused,
            3 => Self::Refund,
            4 => Self::Pending,
            5 => Self::Authorized,
            6 => Self::Received,
            value => {
                return Err(ItemError::InvalidStatus {
                    kind: "payment".to_string(),
                    value,
                });
            }
        })
    }
}

impl From<PaymentStatus> for i64 {
    fn from(status: PaymentStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// An order invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    base: ItemBase,
    base_id: Option<String>,
    order_type: String,
    payment_status: PaymentStatus,
    delivery_status: DeliveryStatus,
    date_payment: Option<NaiveDateTime>,
    date_delivery: Option<NaiveDateTime>,
    related_id: Option<String>,
    old_payment_status: PaymentStatus,
    old_delivery_status: DeliveryStatus,
}

impl Default for Order {
    fn default() -> Self {
        Self {
            base: ItemBase::new(PREFIX),
            base_id: None,
            order_type: String::new(),
            payment_status: PaymentStatus::default(),
            delivery_status: DeliveryStatus::default(),
            date_payment: None,
            date_delivery: None,
            related_id: None,
            old_payment_status: PaymentStatus::default(),
            old_delivery_status: DeliveryStatus::default(),
        }
    }
}

impl Order {
    /// Creates a new, unfinished order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an order from stored values.
    ///
    /// The loaded statuses become the old statuses and the item is unmodified.
    pub fn from_values(mut values: ValueMap) -> ItemResult<Self> {
        let mut item = Self::new();
        item.apply(&mut values, true)?;
        item.old_payment_status = item.payment_status;
        item.old_delivery_status = item.delivery_status;
        item.base.reset_modified();
        Ok(item)
    }

    /// Sets the id.
    pub fn set_id(&mut self, id: Option<String>) -> &mut Self {
        self.base.set_id(id);
        self
    }

    /// Id of the order base.
    pub fn base_id(&self) -> Option<&str> {
        self.base_id.as_deref()
    }

    /// Sets the id of the order base.
    pub fn set_base_id(&mut self, id: impl Into<String>) -> &mut Self {
        let id = Some(id.into());
        if id != self.base_id {
            self.base_id = id;
            self.base.set_modified();
        }
        self
    }

    /// Channel the order was placed with, e.g. `web`.
    pub fn order_type(&self) -> &str {
        &self.order_type
    }

    /// Sets the order channel.
    pub fn set_order_type(&mut self, order_type: &str) -> ItemResult<&mut Self> {
        if order_type != self.order_type {
            self.order_type = check_code(order_type)?;
            self.base.set_modified();
        }
        Ok(self)
    }

    /// Current payment status.
    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    /// Sets the payment status; a change sets the payment date to now.
    pub fn set_payment_status(&mut self, status: PaymentStatus) -> &mut Self {
        if status != self.payment_status {
            self.date_payment = Some(chrono::Local::now().naive_local());
            self.payment_status = status;
            self.base.set_modified();
        }
        self
    }

    /// Current delivery status.
    pub fn delivery_status(&self) -> DeliveryStatus {
        self.delivery_status
    }

    /// Sets the delivery status.
    pub fn set_delivery_status(&mut self, status: DeliveryStatus) -> &mut Self {
        if status != self.delivery_status {
            self.delivery_status = status;
            self.base.set_modified();
        }
        self
    }

    /// Time of the last payment status change.
    pub fn date_payment(&self) -> Option<&NaiveDateTime> {
        self.date_payment.as_ref()
    }

    /// Sets the payment date.
    pub fn set_date_payment(&mut self, date: Option<NaiveDateTime>) -> &mut Self {
        if date != self.date_payment {
            self.date_payment = date;
            self.base.set_modified();
        }
        self
    }

    /// Time of delivery.
    pub fn date_delivery(&self) -> Option<&NaiveDateTime> {
        self.date_delivery.as_ref()
    }

    /// Sets the delivery date.
    pub fn set_date_delivery(&mut self, date: Option<NaiveDateTime>) -> &mut Self {
        if date != self.date_delivery {
            self.date_delivery = date;
            self.base.set_modified();
        }
        self
    }

    /// Id of a related order, e.g. the original of a return.
    pub fn related_id(&self) -> Option<&str> {
        self.related_id.as_deref()
    }

    /// Sets the related order id.
    pub fn set_related_id(&mut self, id: Option<String>) -> &mut Self {
        if id != self.related_id {
            self.related_id = id;
            self.base.set_modified();
        }
        self
    }

    /// Payment status the order was loaded with.
    pub fn old_payment_status(&self) -> PaymentStatus {
        self.old_payment_status
    }

    /// Delivery status the order was loaded with.
    pub fn old_delivery_status(&self) -> DeliveryStatus {
        self.old_delivery_status
    }
}

impl Item for Order {
    fn resource_type(&self) -> &'static str {
        "order"
    }

    fn base(&self) -> &ItemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ItemBase {
        &mut self.base
    }

    fn apply(&mut self, values: &mut ValueMap, private: bool) -> ItemResult<()> {
        self.base.apply(values, private, true)?;

        if let Some(id) = values.remove("order.baseid") {
            if private {
                self.set_base_id(text(&id));
            }
        }
        if let Some(order_type) = values.remove("order.type") {
            self.set_order_type(&text(&order_type))?;
        }

        // Statuses first, explicit dates override the payment stamp.
        if let Some(status) = values.remove("order.statuspayment") {
            self.set_payment_status(PaymentStatus::try_from(int(&status))?);
        }
        if let Some(status) = values.remove("order.statusdelivery") {
            self.set_delivery_status(DeliveryStatus::try_from(int(&status))?);
        }
        if let Some(date) = values.remove("order.datepayment") {
            self.set_date_payment(optional_datetime(&date)?);
        }
        if let Some(date) = values.remove("order.datedelivery") {
            self.set_date_delivery(optional_datetime(&date)?);
        }
        if let Some(id) = values.remove("order.relatedid") {
            self.set_related_id(optional_text(&id));
        }

        Ok(())
    }

    fn to_map(&self, private: bool) -> ValueMap {
        let date = |value: &Option<NaiveDateTime>| {
            value
                .as_ref()
                .map(|d| Value::String(format_datetime(d)))
                .unwrap_or(Value::Null)
        };

        let mut map = self.base.to_map(private);
        map.insert("order.type".to_string(), Value::from(self.order_type.as_str()));
        map.insert("order.statusdelivery".to_string(), Value::from(self.delivery_status.code()));
        map.insert("order.statuspayment".to_string(), Value::from(self.payment_status.code()));
        map.insert("order.datepayment".to_string(), date(&self.date_payment));
        map.insert("order.datedelivery".to_string(), date(&self.date_delivery));
        map.insert(
            "order.relatedid".to_string(),
            self.related_id.clone().map(Value::String).unwrap_or(Value::Null),
        );

        if private {
            map.insert(
                "order.baseid".to_string(),
                self.base_id.clone().map(Value::String).unwrap_or(Value::Null),
            );
        }

        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::parse_datetime;
    use serde_json::json;

    fn values() -> ValueMap {
        json!({
            "order.id": "15",
            "order.siteid": "99",
            "order.baseid": "4",
            "order.type": "web",
            "order.datepayment": "2004-12-01 12:34:56",
            "order.datedelivery": "2004-01-03 12:34:56",
            "order.statuspayment": 6,
            "order.statusdelivery": 4,
            "order.relatedid": "2",
            "order.mtime": "2011-01-01 00:00:02",
            "order.ctime": "2011-01-01 00:00:01",
            "order.editor": "unitTestUser"
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    // ========================================================================
    // Status codes
    // ========================================================================

    #[test]
    fn test_status_codes() {
        for code in -1..=7 {
            assert_eq!(DeliveryStatus::try_from(code).unwrap().code(), code);
        }
        for code in -1..=6 {
            assert_eq!(PaymentStatus::try_from(code).unwrap().code(), code);
        }
        assert!(matches!(
            PaymentStatus::try_from(7),
            Err(ItemError::InvalidStatus { value: 7, .. })
        ));
        assert!(DeliveryStatus::try_from(-2).is_err());
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(serde_json::to_value(PaymentStatus::Received).unwrap(), json!(6));
        let status: DeliveryStatus = serde_json::from_value(json!(3)).unwrap();
        assert_eq!(status, DeliveryStatus::Dispatched);
        assert!(serde_json::from_value::<DeliveryStatus>(json!(42)).is_err());
    }

    // ========================================================================
    // Item
    // ========================================================================

    #[test]
    fn test_from_values() {
        let item = Order::from_values(values()).unwrap();

        assert_eq!(item.id(), Some("15"));
        assert_eq!(item.base().site_id(), Some("99"));
        assert_eq!(item.base_id(), Some("4"));
        assert_eq!(item.order_type(), "web");
        assert_eq!(item.payment_status(), PaymentStatus::Received);
        assert_eq!(item.delivery_status(), DeliveryStatus::Delivered);
        assert_eq!(item.old_payment_status(), PaymentStatus::Received);
        assert_eq!(item.old_delivery_status(), DeliveryStatus::Delivered);
        assert_eq!(
            item.date_payment(),
            Some(&parse_datetime("2004-12-01 12:34:56").unwrap())
        );
        assert_eq!(item.related_id(), Some("2"));
        assert_eq!(item.base().editor(), "unitTestUser");
        assert!(!item.is_modified());
    }

    #[test]
    fn test_defaults() {
        let item = Order::new();
        assert_eq!(item.payment_status(), PaymentStatus::Unfinished);
        assert_eq!(item.delivery_status(), DeliveryStatus::Unfinished);
        assert_eq!(item.order_type(), "");
        assert_eq!(item.date_payment(), None);
        assert_eq!(item.resource_type(), "order");
    }

    #[test]
    fn test_set_payment_status_stamps_date() {
        let mut item = Order::from_values(values()).unwrap();
        let loaded = *item.date_payment().unwrap();

        item.set_payment_status(PaymentStatus::Received);
        assert!(!item.is_modified());
        assert_eq!(item.date_payment(), Some(&loaded));

        item.set_payment_status(PaymentStatus::Refund);
        assert!(item.is_modified());
        assert_ne!(item.date_payment(), Some(&loaded));
        assert_eq!(item.old_payment_status(), PaymentStatus::Received);
    }

    #[test]
    fn test_set_delivery_status() {
        let mut item = Order::from_values(values()).unwrap();
        item.set_delivery_status(DeliveryStatus::Returned);

        assert_eq!(item.delivery_status(), DeliveryStatus::Returned);
        assert_eq!(item.old_delivery_status(), DeliveryStatus::Delivered);
        assert!(item.is_modified());
    }

    #[test]
    fn test_set_order_type_checks_length() {
        let mut item = Order::new();
        item.set_order_type("phone").unwrap();
        assert!(item.is_modified());
        assert!(item.set_order_type(&"x".repeat(65)).is_err());
        assert_eq!(item.order_type(), "phone");
    }

    #[test]
    fn test_apply_explicit_payment_date_wins() {
        let mut item = Order::new();
        let mut values = json!({
            "order.datepayment": "2020-05-05 10:00:00",
            "order.statuspayment": "5"
        })
        .as_object()
        .cloned()
        .unwrap();

        item.apply(&mut values, false).unwrap();

        assert_eq!(item.payment_status(), PaymentStatus::Authorized);
        assert_eq!(
            item.date_payment(),
            Some(&parse_datetime("2020-05-05 10:00:00").unwrap())
        );
        assert!(values.is_empty());
    }

    #[test]
    fn test_apply_public_ignores_private_keys() {
        let mut item = Order::new();
        let mut values = values();
        item.apply(&mut values, false).unwrap();

        assert_eq!(item.id(), None);
        assert_eq!(item.base_id(), None);
        assert_eq!(item.base().site_id(), None);
        assert_eq!(item.order_type(), "web");
        assert!(values.is_empty());
    }

    #[test]
    fn test_apply_rejects_invalid_values() {
        let mut item = Order::new();
        let mut values = json!({"order.statusdelivery": 12}).as_object().cloned().unwrap();
        assert!(matches!(
            item.apply(&mut values, false),
            Err(ItemError::InvalidStatus { .. })
        ));

        let mut values = json!({"order.datedelivery": "2004-01-03"}).as_object().cloned().unwrap();
        assert!(matches!(
            item.apply(&mut values, false),
            Err(ItemError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_to_map() {
        let item = Order::from_values(values()).unwrap();

        let public = item.to_map(false);
        assert_eq!(public["order.id"], "15");
        assert_eq!(public["order.statuspayment"], 6);
        assert_eq!(public["order.datedelivery"], "2004-01-03 12:34:56");
        assert!(!public.contains_key("order.baseid"));
        assert!(!public.contains_key("order.siteid"));

        let private = item.to_map(true);
        assert_eq!(private["order.baseid"], "4");
        assert_eq!(private["order.ctime"], "2011-01-01 00:00:01");

        let again = Order::from_values(private).unwrap();
        assert_eq!(again, item);
    }
}
