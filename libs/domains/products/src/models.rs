use chrono::{DateTime, SubsecRound, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Sale status of a product
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    /// Listed and available
    #[default]
    ForSale,
    /// Listed but unavailable
    SoldOut,
}

/// Product document as stored in MongoDB.
///
/// Carries the password, so it is never serialized to clients directly;
/// handlers convert it into [`ProductResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    pub manager: String,
    pub password: String,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(with = "bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Stores chrono timestamps as native BSON dates so they sort server-side.
mod bson_datetime {
    use chrono::{DateTime, Utc};
    use mongodb::bson;
    use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        bson::DateTime::from_millis(value.timestamp_millis()).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let millis = bson::DateTime::deserialize(deserializer)?.timestamp_millis();
        DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {millis}")))
    }
}

/// Body of `POST /products`.
///
/// Every field is optional at the type level so that absence is reported
/// as a blank-field error instead of a parse failure.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateProduct {
    #[serde(deserialize_with = "lenient_text::deserialize")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_text::deserialize")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_text::deserialize")]
    pub manager: Option<String>,
    #[serde(deserialize_with = "lenient_text::deserialize")]
    pub password: Option<String>,
}

/// Text fields accept any JSON value: `null` is absent, strings are taken
/// as-is and anything else is kept as its JSON text.
mod lenient_text {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => None,
            Value::String(text) => Some(text),
            other => Some(other.to_string()),
        })
    }
}

/// Body of `PUT`/`PATCH /products/{id}`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateProduct {
    /// Must match the stored password
    #[serde(deserialize_with = "lenient_text::deserialize")]
    pub password: Option<String>,
    #[serde(deserialize_with = "lenient_text::deserialize")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_text::deserialize")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_text::deserialize")]
    pub manager: Option<String>,
    /// `FOR_SALE` or `SOLD_OUT`; left unchanged when omitted
    #[serde(deserialize_with = "lenient_text::deserialize")]
    #[schema(example = "SOLD_OUT")]
    pub status: Option<String>,
}

/// Body of `DELETE /products/{id}`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct DeleteProduct {
    #[serde(deserialize_with = "lenient_text::deserialize")]
    pub password: Option<String>,
}

/// Product as returned to clients. Never includes the password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    /// 24-character hex ObjectId
    #[schema(example = "65a1f0c2e4b0a1b2c3d4e5f6")]
    pub product_id: String,
    pub name: String,
    pub description: String,
    pub manager: String,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload of a successful delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedProduct {
    pub product_id: String,
}

/// Validated field changes for an update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub manager: Option<String>,
    pub status: Option<ProductStatus>,
}

/// Current time at the precision BSON dates keep, so a freshly created
/// product compares equal to the one read back from the store.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

impl Product {
    /// New product listed for sale, both timestamps set to now.
    pub fn new(name: String, description: String, manager: String, password: String) -> Self {
        let now = now();
        Self {
            id: ObjectId::new(),
            name,
            description,
            manager,
            password,
            status: ProductStatus::ForSale,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply supplied changes and bump `updated_at`.
    pub fn apply_changes(&mut self, changes: ProductChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(manager) = changes.manager {
            self.manager = manager;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        self.updated_at = now();
    }

    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            product_id: product.id.to_hex(),
            name: product.name,
            description: product.description,
            manager: product.manager,
            status: product.status,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl From<ObjectId> for DeletedProduct {
    fn from(id: ObjectId) -> Self {
        Self {
            product_id: id.to_hex(),
        }
    }
}
