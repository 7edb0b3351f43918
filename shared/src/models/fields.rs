//! Order field table
//!
//! One table drives everything that touches order attributes by name:
//! - [`OrderField`]: every attribute, with its local and wire name
//! - [`OrderAttributes`]: the typed values, one `Option` per attribute
//! - merge from a wire object ([`OrderAttributes::merge`])
//! - change detection ([`diff`], [`changes`])
//!
//! Local names are the Rust field names. Wire names are the JSON keys used by
//! the API. They differ for most fields; `customer_po` travels as `shippingPO`.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::order::{OrderItem, OrderStatus, Reference};

macro_rules! order_fields {
    ($( $variant:ident => $field:ident : $ty:ty = $wire:literal ),* $(,)?) => {
        /// Attribute of a sales order
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum OrderField {
            $( $variant, )*
        }

        impl OrderField {
            /// Every registered attribute, in table order
            pub const ALL: &'static [OrderField] = &[ $( OrderField::$variant, )* ];

            pub const fn local_name(self) -> &'static str {
                match self {
                    $( OrderField::$variant => stringify!($field), )*
                }
            }

            pub const fn wire_name(self) -> &'static str {
                match self {
                    $( OrderField::$variant => $wire, )*
                }
            }

            pub fn from_local(name: &str) -> Option<Self> {
                match name {
                    $( stringify!($field) => Some(OrderField::$variant), )*
                    _ => None,
                }
            }

            pub fn from_wire(name: &str) -> Option<Self> {
                match name {
                    $( $wire => Some(OrderField::$variant), )*
                    _ => None,
                }
            }
        }

        /// Typed attribute values of an order. `None` means unset.
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct OrderAttributes {
            $( pub $field: Option<$ty>, )*
        }

        impl OrderAttributes {
            /// Current value of `field` as JSON (`null` when unset)
            ///
            /// Every attribute type serializes infallibly (strings, numbers,
            /// decimals, dates, references), so the `null` fallback only
            /// covers an unset field in practice.
            pub fn get(&self, field: OrderField) -> Value {
                match field {
                    $( OrderField::$variant => serde_json::to_value(&self.$field).unwrap_or_default(), )*
                }
            }

            /// Replace `field` with a JSON value; `null` unsets it
            pub fn set(&mut self, field: OrderField, value: Value) -> Result<(), serde_json::Error> {
                match field {
                    $( OrderField::$variant => self.$field = serde_json::from_value(value)?, )*
                }
                Ok(())
            }

            /// Copy one attribute over from `other`
            pub fn copy_field(&mut self, other: &OrderAttributes, field: OrderField) {
                match field {
                    $( OrderField::$variant => self.$field = other.$field.clone(), )*
                }
            }

            fn field_differs(&self, other: &OrderAttributes, field: OrderField) -> bool {
                match field {
                    $( OrderField::$variant => self.$field != other.$field, )*
                }
            }

            pub fn is_set(&self, field: OrderField) -> bool {
                match field {
                    $( OrderField::$variant => self.$field.is_some(), )*
                }
            }
        }
    };
}

order_fields! {
    OrderNo => order_no: String = "orderNo",
    Customer => customer: Reference = "customer",
    Status => status: OrderStatus = "status",
    OrderType => order_type: String = "type",
    Hold => hold: bool = "hold",
    OrderDate => order_date: NaiveDate = "orderDate",
    Address => address: Reference = "address",
    ShippingAddress => shipping_address: Reference = "shippingAddress",
    CustomerPo => customer_po: String = "shippingPO",
    Fob => fob: String = "fob",
    TermsCode => terms_code: String = "termsCode",
    TermsText => terms_text: String = "termsText",
    Freight => freight: Decimal = "freight",
    Taxes => taxes: Decimal = "taxes",
    Subtotal => subtotal: Decimal = "subtotal",
    SubtotalOrdered => subtotal_ordered: Decimal = "subtotalOrdered",
    Discount => discount: Decimal = "discount",
    TotalDiscount => total_discount: Decimal = "totalDiscount",
    Total => total: Decimal = "total",
    TotalOrdered => total_ordered: Decimal = "totalOrdered",
    GrossProfit => gross_profit: Decimal = "grossProfit",
    Items => items: Vec<OrderItem> = "items",
    BackgroundColor => background_color: u32 = "backgroundColor",
    CreatedBy => created_by: String = "createdBy",
    ModifiedBy => modified_by: String = "modifiedBy",
    Created => created: NaiveDateTime = "created",
    Modified => modified: NaiveDateTime = "modified",
}

impl OrderField {
    /// Server-assigned fields that must never be sent on a write
    pub const fn is_read_only(self) -> bool {
        matches!(
            self,
            OrderField::CreatedBy
                | OrderField::ModifiedBy
                | OrderField::Created
                | OrderField::Modified
        )
    }
}

impl core::fmt::Display for OrderField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.local_name())
    }
}

/// Look up an incoming value, wire name first, then local name.
///
/// `null` counts as absent so the next source gets a chance.
pub fn lookup<'a>(fields: &'a Map<String, Value>, wire: &str, local: &str) -> Option<&'a Value> {
    fields
        .get(wire)
        .filter(|v| !v.is_null())
        .or_else(|| fields.get(local).filter(|v| !v.is_null()))
}

impl OrderAttributes {
    /// Merge a (partial) wire object into these attributes.
    ///
    /// For each attribute the wire-name key wins, then the local-name key;
    /// when neither is present the current value stays. Either every value
    /// decodes and the merge is applied, or nothing changes.
    ///
    /// Returns the attributes that were taken from `fields`.
    pub fn merge(&mut self, fields: &Map<String, Value>) -> Result<Vec<OrderField>, serde_json::Error> {
        let mut next = self.clone();
        let mut merged = Vec::new();

        for &field in OrderField::ALL {
            if let Some(value) = lookup(fields, field.wire_name(), field.local_name()) {
                next.set(field, value.clone())?;
                merged.push(field);
            }
        }

        *self = next;
        Ok(merged)
    }

    /// All set attributes keyed by wire name
    pub fn to_wire(&self) -> Map<String, Value> {
        OrderField::ALL
            .iter()
            .filter(|field| self.is_set(**field))
            .map(|field| (field.wire_name().to_string(), self.get(*field)))
            .collect()
    }
}

/// One changed attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub old: Value,
    pub new: Value,
}

/// Attributes whose values differ between `old` and `new`
pub fn diff(old: &OrderAttributes, new: &OrderAttributes) -> BTreeSet<OrderField> {
    OrderField::ALL
        .iter()
        .copied()
        .filter(|field| old.field_differs(new, *field))
        .collect()
}

/// Like [`diff`], with the old and new values of each changed attribute
pub fn changes(old: &OrderAttributes, new: &OrderAttributes) -> BTreeMap<OrderField, Change> {
    diff(old, new)
        .into_iter()
        .map(|field| {
            let change = Change {
                old: old.get(field),
                new: new.get(field),
            };
            (field, change)
        })
        .collect()
}
