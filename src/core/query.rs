//! Typed query values built by the router and consumed by a [`ToyStore`]
//!
//! Each route turns its path segments, query string and body into one of the
//! values below. Stores translate them into backend queries, so handlers never
//! assemble filter documents by hand.
//!
//! [`ToyStore`]: crate::core::store::ToyStore

use crate::core::error::RequestError;
use crate::core::toy::{bson_to_json, fields, json_to_bson};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document, doc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Identifier of a stored toy, parsed from a 24-character hex path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToyId(ObjectId);

impl ToyId {
    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    /// Filter document selecting exactly this toy.
    pub fn to_filter(&self) -> Document {
        doc! { fields::ID: self.0 }
    }
}

impl FromStr for ToyId {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
            .map(ToyId)
            .map_err(|e| RequestError::InvalidToyId {
                id: s.to_string(),
                message: e.to_string(),
            })
    }
}

impl From<ObjectId> for ToyId {
    fn from(oid: ObjectId) -> Self {
        ToyId(oid)
    }
}

impl fmt::Display for ToyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Query string parameters
// ---------------------------------------------------------------------------

/// Decoded query string pairs, in the order they appeared.
pub type QueryPairs = Vec<(String, String)>;

/// First value given for `name`. Repeated keys never reject a request.
fn first_value(pairs: &[(String, String)], name: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.clone())
}

/// Query parameters for `GET /toys`
///
/// `limit` is kept as raw text: an unparseable value means "no limit",
/// never a rejected request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub limit: Option<String>,
}

impl ListParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            limit: first_value(pairs, "limit"),
        }
    }
}

/// Query parameters for `GET /myToys`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SellerParams {
    pub email: Option<String>,
    pub sort: Option<String>,
}

impl SellerParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            email: first_value(pairs, "email"),
            sort: first_value(pairs, "sort"),
        }
    }
}

/// Cap on the number of records returned by a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLimit(i64);

impl ListLimit {
    /// Parse a `limit` query value with leading-integer semantics.
    ///
    /// Leading whitespace and a sign are accepted, parsing stops at the first
    /// non-digit (`"3abc"` is 3). Returns `None` (no limit) when no digits are
    /// present, when the value is 0, or when it does not fit an `i64`.
    /// Negative values cap at their absolute value.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim_start();
        let (negative, rest) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let digits = &rest[..digits_end];

        let value: i64 = digits.parse().ok()?;
        let value = if negative { -value } else { value };

        match value {
            0 => None,
            n => Some(ListLimit(n.abs())),
        }
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

/// Ordering applied to `price` by `GET /myToys`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSort {
    Ascending,
    Descending,
}

impl PriceSort {
    /// Only the exact values `asc` and `desc` select an ordering.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(PriceSort::Ascending),
            "desc" => Some(PriceSort::Descending),
            _ => None,
        }
    }

    pub fn to_document(&self) -> Document {
        match self {
            PriceSort::Ascending => doc! { fields::PRICE: 1 },
            PriceSort::Descending => doc! { fields::PRICE: -1 },
        }
    }
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Selection applied by a find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToyFilter {
    /// Every record
    All,
    /// `toyName` matches the pattern, case-insensitive and unanchored
    NameMatches(String),
    /// Exact, case-sensitive `category`
    Category(String),
    /// Exact `sellerEmail`
    SellerEmail(String),
}

impl ToyFilter {
    /// Seller filter for `GET /myToys`; a missing or empty email selects everything.
    pub fn seller(email: Option<String>) -> Self {
        match email {
            Some(email) if !email.is_empty() => ToyFilter::SellerEmail(email),
            _ => ToyFilter::All,
        }
    }

    pub fn to_document(&self) -> Document {
        match self {
            ToyFilter::All => doc! {},
            ToyFilter::NameMatches(pattern) => doc! {
                fields::TOY_NAME: { "$regex": pattern.as_str(), "$options": "i" }
            },
            ToyFilter::Category(category) => doc! { fields::CATEGORY: category.as_str() },
            ToyFilter::SellerEmail(email) => doc! { fields::SELLER_EMAIL: email.as_str() },
        }
    }
}

/// A complete find request.
///
/// `numeric_collation` runs the query under the `en_US` collation with
/// numeric ordering. Equality filters are then collation-aware too, so
/// `"a01"` and `"a1"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindQuery {
    pub filter: ToyFilter,
    pub sort: Option<PriceSort>,
    pub limit: Option<ListLimit>,
    pub numeric_collation: bool,
}

impl FindQuery {
    pub fn new(filter: ToyFilter) -> Self {
        Self {
            filter,
            sort: None,
            limit: None,
            numeric_collation: false,
        }
    }

    /// Seller listing for `GET /myToys`, the only collated query.
    pub fn seller(email: Option<String>, sort: Option<PriceSort>) -> Self {
        Self::new(ToyFilter::seller(email))
            .with_sort(sort)
            .with_numeric_collation()
    }

    pub fn all() -> Self {
        Self::new(ToyFilter::All)
    }

    pub fn with_sort(mut self, sort: Option<PriceSort>) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_limit(mut self, limit: Option<ListLimit>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_numeric_collation(mut self) -> Self {
        self.numeric_collation = true;
        self
    }
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Partial update accepted by `PATCH /updateToy/{id}`.
///
/// Exactly three fields are written. Any other key in the body is dropped; a
/// field missing from the body is written as `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ToyUpdate {
    pub price: Bson,
    pub available_quantity: Bson,
    pub details: Bson,
}

impl ToyUpdate {
    pub fn from_body(body: &Value) -> Result<Self, RequestError> {
        let Some(object) = body.as_object() else {
            return Err(RequestError::InvalidBody {
                message: "expected a JSON object".to_string(),
            });
        };

        let field = |name: &str| object.get(name).cloned().map_or(Bson::Null, json_to_bson);

        Ok(Self {
            price: field(fields::PRICE),
            available_quantity: field(fields::AVAILABLE_QUANTITY),
            details: field(fields::DETAILS),
        })
    }

    /// The `$set` fields as a plain document.
    pub fn fields(&self) -> Document {
        doc! {
            fields::PRICE: self.price.clone(),
            fields::AVAILABLE_QUANTITY: self.available_quantity.clone(),
            fields::DETAILS: self.details.clone(),
        }
    }

    pub fn to_document(&self) -> Document {
        doc! { "$set": self.fields() }
    }
}

// ---------------------------------------------------------------------------
// Acknowledgments
// ---------------------------------------------------------------------------

fn serialize_bson<S: Serializer>(value: &Bson, serializer: S) -> Result<S::Ok, S::Error> {
    bson_to_json(value.clone()).serialize(serializer)
}

fn serialize_opt_bson<S: Serializer>(
    value: &Option<Bson>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    value.clone().map(bson_to_json).serialize(serializer)
}

/// Result of an insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    #[serde(serialize_with = "serialize_bson")]
    pub inserted_id: Bson,
}

/// Result of an update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    #[serde(serialize_with = "serialize_opt_bson")]
    pub upserted_id: Option<Bson>,
}

/// Result of a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}
