//! Sales order resource
//!
//! An [`Order`] holds the typed attributes of one sales order together with
//! a clean snapshot of what the server last confirmed. Everything that differs
//! from the snapshot is pending and goes out on the next update.
//!
//! Nothing here talks to the network on its own: setters and status changes
//! are local, and only [`Order::save`], [`Order::update`] and
//! [`Order::delete`] issue requests through the client passed in.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value, json};
use spire_shared::models::fields::{self, lookup};
use spire_shared::{Change, OrderAttributes, OrderField, OrderId, OrderItem, OrderStatus, Reference};

use crate::error::{SpireError, SpireResult};
use crate::http::HttpClient;
use crate::resource::{self, Resource};

/// Collection endpoint for sales orders
pub const ORDERS_PATH: &str = "sales/orders/";

/// Row color sent on create when none is set (white)
pub const DEFAULT_BACKGROUND_COLOR: u32 = 16_777_215;

/// Required before a persisted order is accepted
const ACCEPTANCE_FIELDS: [OrderField; 4] = [
    OrderField::Customer,
    OrderField::Address,
    OrderField::ShippingAddress,
    OrderField::Items,
];

/// Sales order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Order {
    id: Option<OrderId>,
    attributes: OrderAttributes,
    clean: OrderAttributes,
    previous_changes: BTreeMap<OrderField, Change>,
}

impl Order {
    /// Unsaved order with no attributes
    pub fn new() -> Self {
        Self::default()
    }

    /// Unsaved order ready to be created
    pub fn with_lines(
        customer: Reference,
        address: Reference,
        shipping_address: Reference,
        items: Vec<OrderItem>,
    ) -> Self {
        let mut order = Self::new();
        order.attributes.customer = Some(customer);
        order.attributes.address = Some(address);
        order.attributes.shipping_address = Some(shipping_address);
        order.attributes.items = Some(items);
        order
    }

    /// Hydrate an order from a response body. The result has no pending changes.
    pub fn from_wire(value: Value) -> SpireResult<Self> {
        let fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(SpireError::InvalidResponse(format!(
                    "expected an order object, got {}",
                    json_kind(&other)
                )));
            }
        };
        let mut order = Self::new();
        order.update_fields(&fields)?;
        Ok(order)
    }

    pub fn id(&self) -> Option<OrderId> {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn attributes(&self) -> &OrderAttributes {
        &self.attributes
    }

    /// Mutable attributes. Whatever is changed here shows up in [`Order::changes`].
    pub fn attributes_mut(&mut self) -> &mut OrderAttributes {
        &mut self.attributes
    }

    /// Current value of `field` as JSON
    pub fn get(&self, field: OrderField) -> Value {
        self.attributes.get(field)
    }

    /// Set one attribute from any serializable value
    pub fn set<V: Serialize>(&mut self, field: OrderField, value: V) -> SpireResult<()> {
        let value = serde_json::to_value(value)?;
        self.attributes
            .set(field, value)
            .map_err(|e| SpireError::validation(format!("{}: {}", field, e)))
    }

    /// Status, `Active` when the server has not sent one
    pub fn status(&self) -> OrderStatus {
        self.attributes.status.unwrap_or_default()
    }

    pub fn make_inactive(&mut self) {
        self.attributes.status = Some(OrderStatus::Inactive);
    }

    pub fn put_on_hold(&mut self) {
        self.attributes.status = Some(OrderStatus::OnHold);
    }

    pub fn make_active(&mut self) {
        self.attributes.status = Some(OrderStatus::Active);
    }

    // ========== Change tracking ==========

    /// Pending changes since the last load or save
    pub fn changes(&self) -> BTreeMap<OrderField, Change> {
        fields::changes(&self.clean, &self.attributes)
    }

    pub fn is_dirty(&self) -> bool {
        self.clean != self.attributes
    }

    /// Accept the current values as clean
    pub fn clear_changes(&mut self) {
        self.clean = self.attributes.clone();
    }

    /// Drop local edits to server-assigned fields
    fn revert_read_only(&mut self) {
        for &field in OrderField::ALL.iter().filter(|f| f.is_read_only()) {
            self.attributes.copy_field(&self.clean, field);
        }
    }

    /// Changes sent by the last successful update
    pub fn previous_changes(&self) -> &BTreeMap<OrderField, Change> {
        &self.previous_changes
    }

    /// Merge server state into this order.
    ///
    /// Keys are matched by wire name first, then local name; missing keys and
    /// `null` leave the attribute alone. Merged values count as confirmed by
    /// the server, so they are not reported as changes. `id` is merged the
    /// same way. On a decode error nothing is changed.
    pub fn update_fields(&mut self, fields: &Map<String, Value>) -> SpireResult<&mut Self> {
        let id = match lookup(fields, "id", "id") {
            Some(value) => Some(serde_json::from_value::<OrderId>(value.clone())?),
            None => None,
        };

        let merged = self.attributes.merge(fields)?;
        for field in merged {
            self.clean.copy_field(&self.attributes, field);
        }
        if id.is_some() {
            self.id = id;
        }
        Ok(self)
    }

    // ========== Payloads ==========

    /// Body of a create request
    pub fn create_payload(&self) -> Map<String, Value> {
        let mut payload: Map<String, Value> = ACCEPTANCE_FIELDS
            .iter()
            .map(|field| (field.wire_name().to_string(), self.attributes.get(*field)))
            .collect();
        payload.insert(
            OrderField::BackgroundColor.wire_name().to_string(),
            json!(self
                .attributes
                .background_color
                .unwrap_or(DEFAULT_BACKGROUND_COLOR)),
        );
        payload
    }

    /// Body of an update request: new values of pending, writable attributes
    pub fn update_payload(&self) -> Map<String, Value> {
        self.changes()
            .into_iter()
            .filter(|(field, _)| !field.is_read_only())
            .map(|(field, change)| (field.wire_name().to_string(), change.new))
            .collect()
    }

    // ========== Validation ==========

    fn missing(&self, required: &[OrderField]) -> Vec<&'static str> {
        required
            .iter()
            .filter(|field| !self.attributes.is_set(**field))
            .map(|field| field.local_name())
            .collect()
    }

    fn require(missing: Vec<&'static str>) -> SpireResult<()> {
        if missing.is_empty() {
            return Ok(());
        }
        Err(SpireError::validation(format!(
            "order is missing required fields: {}",
            missing.join(", ")
        )))
    }

    /// Acceptance check for a persisted order: id, customer, address,
    /// shipping address and items must all be present.
    pub fn validate(&self) -> SpireResult<()> {
        let mut missing = Vec::new();
        if self.id.is_none() {
            missing.push("id");
        }
        missing.extend(self.missing(&ACCEPTANCE_FIELDS));
        Self::require(missing)
    }

    /// Same as [`Order::validate`] minus the id, which a new order cannot have
    fn validate_for_create(&self) -> SpireResult<()> {
        Self::require(self.missing(&ACCEPTANCE_FIELDS))
    }

    /// True when order number, items and customer are all set
    pub fn is_valid(&self) -> bool {
        self.attributes.order_no.is_some()
            && self.attributes.items.is_some()
            && self.attributes.customer.is_some()
    }

    // ========== Remote operations ==========

    pub async fn find<C: HttpClient + ?Sized>(client: &C, id: OrderId) -> SpireResult<Self> {
        resource::find(client, id, &[]).await
    }

    /// Orders matching a free-form query.
    ///
    /// No status filter is applied, so inactive orders are included.
    pub async fn search<C: HttpClient + ?Sized>(client: &C, query: &str) -> SpireResult<Vec<Self>> {
        resource::find_many(client, &[("q", query)]).await
    }

    /// Create when unsaved, update otherwise
    pub async fn save<C: HttpClient + ?Sized>(&mut self, client: &C) -> SpireResult<()> {
        if self.is_persisted() {
            self.update(client).await?;
        } else {
            self.create(client).await?;
        }
        Ok(())
    }

    async fn create<C: HttpClient + ?Sized>(&mut self, client: &C) -> SpireResult<()> {
        self.validate_for_create()?;

        let created: Order = resource::create(client, self.create_payload())
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Order create failed"))?;
        let Some(id) = created.id else {
            return Err(SpireError::InvalidResponse(
                "create response carried no order id".into(),
            ));
        };

        *self = created;
        tracing::info!(order_id = %id, "Order created");
        Ok(())
    }

    /// Send pending changes.
    ///
    /// Only an id is required; a partially loaded order (e.g. a search row)
    /// can be updated. Local edits to read-only fields are discarded first.
    /// Only changed, writable attributes are sent. Pending changes are cleared
    /// once the server accepts them; on failure they stay pending. Returns the
    /// response body, or `None` when there was nothing to send.
    pub async fn update<C: HttpClient + ?Sized>(&mut self, client: &C) -> SpireResult<Option<Value>> {
        let id = self
            .id
            .ok_or_else(|| SpireError::validation("cannot update an order without an id"))?;
        self.revert_read_only();

        let payload = self.update_payload();
        if payload.is_empty() {
            tracing::debug!(order_id = %id, "No pending changes, update skipped");
            return Ok(None);
        }

        let changes: BTreeMap<OrderField, Change> = self
            .changes()
            .into_iter()
            .filter(|(field, _)| !field.is_read_only())
            .collect();
        let response = client
            .put(&Self::member_path(id), &Value::Object(payload))
            .await
            .inspect_err(|e| tracing::warn!(order_id = %id, error = %e, "Order update failed"))?;

        self.previous_changes = changes;
        self.clear_changes();
        tracing::info!(order_id = %id, fields = self.previous_changes.len(), "Order updated");
        Ok(Some(response))
    }

    /// Delete on the server. The local value is left as is.
    pub async fn delete<C: HttpClient + ?Sized>(&self, client: &C) -> SpireResult<Value> {
        let id = self
            .id
            .ok_or_else(|| SpireError::validation("cannot delete an order without an id"))?;

        let response = client
            .delete(&Self::member_path(id))
            .await
            .inspect_err(|e| tracing::warn!(order_id = %id, error = %e, "Order delete failed"))?;
        tracing::info!(order_id = %id, "Order deleted");
        Ok(response)
    }
}

impl Resource for Order {
    const COLLECTION: &'static str = ORDERS_PATH;

    fn from_wire(value: Value) -> SpireResult<Self> {
        Order::from_wire(value)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> Order {
        Order::from_wire(json!({
            "id": 42,
            "orderNo": "00042",
            "customer": {"id": 1, "name": "Acme"},
            "address": {"id": 10},
            "shippingAddress": {"id": 10},
            "shippingPO": "PO-1",
            "hold": false,
            "status": 0,
            "total": "100.00",
            "items": [{"id": 1, "inventory": {"id": 500}, "orderQty": "2"}],
            "createdBy": "admin",
            "created": "2024-03-01T09:30:00"
        }))
        .unwrap()
    }

    #[test]
    fn test_hydrated_order_is_clean() {
        let order = loaded();
        assert_eq!(order.id(), Some(OrderId(42)));
        assert_eq!(order.attributes().customer_po.as_deref(), Some("PO-1"));
        assert!(!order.is_dirty());
        assert!(order.changes().is_empty());
        assert!(order.update_payload().is_empty());
    }

    #[test]
    fn test_setting_same_value_is_not_a_change() {
        let mut order = loaded();
        order.attributes_mut().hold = Some(false);
        order.set(OrderField::OrderNo, "00042").unwrap();

        assert!(!order.is_dirty());
        assert!(order.update_payload().is_empty());
    }

    #[test]
    fn test_reverting_a_change_clears_it() {
        let mut order = loaded();
        order.attributes_mut().hold = Some(true);
        assert!(order.is_dirty());

        order.attributes_mut().hold = Some(false);
        assert!(!order.is_dirty());
    }

    #[test]
    fn test_update_payload_uses_wire_names() {
        let mut order = loaded();
        order.attributes_mut().customer_po = Some("PO-2".into());
        order.attributes_mut().hold = Some(true);

        assert_eq!(
            Value::Object(order.update_payload()),
            json!({"shippingPO": "PO-2", "hold": true})
        );

        let changes = order.changes();
        assert_eq!(changes[&OrderField::Hold].old, json!(false));
        assert_eq!(changes[&OrderField::Hold].new, json!(true));
    }

    #[test]
    fn test_update_payload_never_contains_read_only_fields() {
        let mut order = loaded();
        order.set(OrderField::CreatedBy, "mallory").unwrap();
        order.set(OrderField::Modified, "2024-04-01T00:00:00").unwrap();
        order.attributes_mut().fob = Some("Origin".into());

        assert!(order.changes().contains_key(&OrderField::CreatedBy));
        assert_eq!(Value::Object(order.update_payload()), json!({"fob": "Origin"}));
    }

    #[test]
    fn test_set_rejects_wrong_type() {
        let mut order = Order::new();
        let err = order.set(OrderField::Hold, "not a bool").unwrap_err();
        assert!(matches!(err, SpireError::Validation(msg) if msg.starts_with("hold:")));
    }

    #[test]
    fn test_create_payload() {
        let order = Order::with_lines(
            Reference::new(1),
            Reference::new(10),
            Reference::new(10),
            vec![OrderItem::inventory(500)],
        );

        assert_eq!(
            Value::Object(order.create_payload()),
            json!({
                "customer": {"id": 1},
                "address": {"id": 10},
                "shippingAddress": {"id": 10},
                "items": [{"inventory": {"id": 500}}],
                "backgroundColor": 16777215
            })
        );
    }

    #[test]
    fn test_create_payload_keeps_explicit_background_color() {
        let mut order = Order::new();
        order.attributes_mut().background_color = Some(0xFF0000);
        assert_eq!(order.create_payload()["backgroundColor"], json!(16711680));
    }

    #[test]
    fn test_update_fields_precedence() {
        let mut order = loaded();
        let incoming = json!({
            "shippingPO": "PO-WIRE",
            "customer_po": "PO-LOCAL",
            "terms_code": "N30"
        });
        order.update_fields(incoming.as_object().unwrap()).unwrap();

        let attrs = order.attributes();
        assert_eq!(attrs.customer_po.as_deref(), Some("PO-WIRE"));
        assert_eq!(attrs.terms_code.as_deref(), Some("N30"));
        assert_eq!(attrs.order_no.as_deref(), Some("00042"));
        assert_eq!(order.id(), Some(OrderId(42)));
        assert!(!order.is_dirty());
    }

    #[test]
    fn test_update_fields_keeps_local_edits_it_does_not_touch() {
        let mut order = loaded();
        order.attributes_mut().hold = Some(true);
        order
            .update_fields(json!({"fob": "Origin"}).as_object().unwrap())
            .unwrap();

        assert_eq!(
            Value::Object(order.update_payload()),
            json!({"hold": true})
        );
    }

    #[test]
    fn test_update_fields_merges_id() {
        let mut order = Order::new();
        order
            .update_fields(json!({"id": 7}).as_object().unwrap())
            .unwrap()
            .make_inactive();

        assert_eq!(order.id(), Some(OrderId(7)));
        assert_eq!(order.status(), OrderStatus::Inactive);
    }

    #[test]
    fn test_from_wire_rejects_non_object() {
        let err = Order::from_wire(json!([1, 2])).unwrap_err();
        assert!(matches!(err, SpireError::InvalidResponse(msg) if msg.contains("an array")));
    }

    #[test]
    fn test_validate_requires_id_and_references() {
        assert!(loaded().validate().is_ok());

        let unsaved = Order::with_lines(
            Reference::new(1),
            Reference::new(10),
            Reference::new(10),
            vec![],
        );
        let err = unsaved.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: order is missing required fields: id"
        );

        let err = Order::new().validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: order is missing required fields: id, customer, address, shipping_address, items"
        );
    }

    #[test]
    fn test_is_valid() {
        let mut order = Order::new();
        order.attributes_mut().customer = Some(Reference::new(1));
        order.attributes_mut().items = Some(vec![OrderItem::inventory(500)]);
        assert!(!order.is_valid());

        order.attributes_mut().order_no = Some("00001".into());
        assert!(order.is_valid());

        order.make_inactive();
        assert!(order.is_valid());
        order.put_on_hold();
        assert!(order.is_valid());
    }

    #[test]
    fn test_is_valid_and_validate_are_independent() {
        // valid but not acceptable: no id, no addresses
        let mut order = Order::new();
        order.attributes_mut().order_no = Some("00001".into());
        order.attributes_mut().customer = Some(Reference::new(1));
        order.attributes_mut().items = Some(vec![]);
        assert!(order.is_valid());
        assert!(order.validate().is_err());

        // acceptable but not valid: no order number
        let mut order = loaded();
        order.attributes_mut().order_no = None;
        assert!(order.validate().is_ok());
        assert!(!order.is_valid());
    }

    #[test]
    fn test_status_mutators_are_local() {
        let mut order = loaded();
        assert_eq!(order.status(), OrderStatus::Active);

        order.put_on_hold();
        assert_eq!(order.status(), OrderStatus::OnHold);
        assert_eq!(Value::Object(order.update_payload()), json!({"status": 1}));

        order.make_inactive();
        assert_eq!(Value::Object(order.update_payload()), json!({"status": 2}));

        order.make_active();
        assert!(!order.is_dirty());
    }

    #[test]
    fn test_status_defaults_to_active() {
        assert_eq!(Order::new().status(), OrderStatus::Active);
    }
}
