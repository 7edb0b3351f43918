//! Generic resource operations
//!
//! A [`Resource`] is a record type living under one collection path. The
//! functions here cover lookup by id, listing and creation for any of them;
//! resource types wrap these with their own typed entry points.

use serde_json::{Map, Value};
use spire_shared::ListResponse;

use crate::error::{SpireError, SpireResult};
use crate::http::HttpClient;

/// Record type served from a collection endpoint
pub trait Resource: Sized {
    /// Collection path relative to the API root, with trailing `/`
    const COLLECTION: &'static str;

    /// Build the record from a response body
    fn from_wire(value: Value) -> SpireResult<Self>;

    /// Path of a single record
    fn member_path(id: impl core::fmt::Display) -> String {
        format!("{}{}", Self::COLLECTION, id)
    }
}

/// Fetch one record by id
pub async fn find<R, C>(client: &C, id: impl core::fmt::Display, params: &[(&str, &str)]) -> SpireResult<R>
where
    R: Resource,
    C: HttpClient + ?Sized,
{
    let path = R::member_path(id);
    let body = client.get(&path, params).await?;
    if body.is_null() {
        return Err(SpireError::not_found(path));
    }
    R::from_wire(body)
}

/// Fetch every record matching `params`
///
/// Accepts both the `{records: [...]}` envelope and a bare array.
pub async fn find_many<R, C>(client: &C, params: &[(&str, &str)]) -> SpireResult<Vec<R>>
where
    R: Resource,
    C: HttpClient + ?Sized,
{
    let body = client.get(R::COLLECTION, params).await?;
    let records = match body {
        Value::Null => Vec::new(),
        Value::Array(records) => records,
        other => serde_json::from_value::<ListResponse<Value>>(other)?.records,
    };
    records.into_iter().map(R::from_wire).collect()
}

/// Create a record from a field map
pub async fn create<R, C>(client: &C, fields: Map<String, Value>) -> SpireResult<R>
where
    R: Resource,
    C: HttpClient + ?Sized,
{
    let body = client.post(R::COLLECTION, &Value::Object(fields)).await?;
    R::from_wire(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Method, MockHttpClient};
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    struct Widget(u64);

    impl Resource for Widget {
        const COLLECTION: &'static str = "inventory/widgets/";

        fn from_wire(value: Value) -> SpireResult<Self> {
            value["id"]
                .as_u64()
                .map(Widget)
                .ok_or_else(|| SpireError::InvalidResponse("missing id".into()))
        }
    }

    #[tokio::test]
    async fn test_find_builds_member_path() {
        let client = MockHttpClient::new();
        client.respond_with(json!({"id": 7}));

        let widget: Widget = find(&client, 7, &[("fields", "id")]).await.unwrap();
        assert_eq!(widget, Widget(7));

        let request = client.last_request().unwrap();
        assert_eq!(request.path, "inventory/widgets/7");
        assert_eq!(request.query, vec![("fields".to_string(), "id".to_string())]);
    }

    #[tokio::test]
    async fn test_find_null_body_is_not_found() {
        let client = MockHttpClient::new();
        let err = find::<Widget, _>(&client, 8, &[]).await.unwrap_err();
        assert!(matches!(err, SpireError::NotFound(path) if path == "inventory/widgets/8"));
    }

    #[tokio::test]
    async fn test_find_many_accepts_envelope_and_array() {
        let client = MockHttpClient::new();
        client
            .respond_with(json!({"records": [{"id": 1}, {"id": 2}], "count": 2}))
            .respond_with(json!([{"id": 3}]));

        let first: Vec<Widget> = find_many(&client, &[]).await.unwrap();
        assert_eq!(first, vec![Widget(1), Widget(2)]);

        let second: Vec<Widget> = find_many(&client, &[]).await.unwrap();
        assert_eq!(second, vec![Widget(3)]);
        assert_eq!(client.last_request().unwrap().path, "inventory/widgets/");
    }

    #[tokio::test]
    async fn test_create_posts_to_collection() {
        let client = MockHttpClient::new();
        client.respond_with(json!({"id": 11}));

        let mut fields = Map::new();
        fields.insert("name".into(), json!("Sprocket"));
        let widget: Widget = create(&client, fields).await.unwrap();

        assert_eq!(widget, Widget(11));
        let request = client.last_request().unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.body, Some(json!({"name": "Sprocket"})));
    }
}
