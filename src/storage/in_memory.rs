//! In-memory implementation of ToyStore for testing and development
//!
//! Records are kept in insertion order, which is the order an unsorted find
//! returns them in. Query semantics follow the MongoDB backend:
//! - name search is a case-insensitive, unanchored regular expression
//! - category filters are exact matches
//! - collated queries (the seller listing) compare the seller and sort strings
//!   with numeric collation, so `"9" < "10" < "100"` and `"a01" == "a1"`
//! - price sorting follows BSON type order

use crate::core::error::{GatewayResult, StorageError};
use crate::core::query::{
    DeleteAck, FindQuery, InsertAck, PriceSort, ToyFilter, ToyId, ToyUpdate, UpdateAck,
};
use crate::core::store::ToyStore;
use crate::core::toy::{Toy, fields};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document};
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

const BACKEND: &str = "InMemory";

/// In-memory toy store
///
/// Uses RwLock for thread-safe access. Clones share the same records.
#[derive(Clone, Default)]
pub struct InMemoryToyStore {
    toys: Arc<RwLock<Vec<Document>>>,
}

impl InMemoryToyStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self, operation: &'static str) -> GatewayResult<RwLockReadGuard<'_, Vec<Document>>> {
        self.toys.read().map_err(|e| {
            StorageError::QueryFailed {
                backend: BACKEND,
                operation,
                message: format!("Failed to acquire read lock: {}", e),
            }
            .into()
        })
    }

    fn write(
        &self,
        operation: &'static str,
    ) -> GatewayResult<RwLockWriteGuard<'_, Vec<Document>>> {
        self.toys.write().map_err(|e| {
            StorageError::QueryFailed {
                backend: BACKEND,
                operation,
                message: format!("Failed to acquire write lock: {}", e),
            }
            .into()
        })
    }
}

/// A compiled [`ToyFilter`].
enum Matcher<'a> {
    All,
    Name(Regex),
    Equals(&'static str, &'a str),
    CollatedEquals(&'static str, &'a str),
}

impl<'a> Matcher<'a> {
    fn compile(query: &'a FindQuery) -> GatewayResult<Self> {
        let collated = query.numeric_collation;
        Ok(match &query.filter {
            ToyFilter::All => Matcher::All,
            ToyFilter::NameMatches(pattern) => {
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| StorageError::QueryFailed {
                        backend: BACKEND,
                        operation: "find",
                        message: format!("invalid regular expression: {}", e),
                    })?;
                Matcher::Name(regex)
            }
            ToyFilter::Category(category) => Self::equals(fields::CATEGORY, category, collated),
            ToyFilter::SellerEmail(email) => Self::equals(fields::SELLER_EMAIL, email, collated),
        })
    }

    fn equals(field: &'static str, value: &'a str, collated: bool) -> Self {
        if collated {
            Matcher::CollatedEquals(field, value)
        } else {
            Matcher::Equals(field, value)
        }
    }

    fn matches(&self, toy: &Document) -> bool {
        match self {
            Matcher::All => true,
            Matcher::Name(regex) => match toy.get(fields::TOY_NAME) {
                Some(Bson::String(name)) => regex.is_match(name),
                _ => false,
            },
            Matcher::Equals(field, expected) => {
                matches!(toy.get(*field), Some(Bson::String(value)) if value == expected)
            }
            Matcher::CollatedEquals(field, expected) => matches!(
                toy.get(*field),
                Some(Bson::String(value)) if collate_numeric(value, expected) == Ordering::Equal
            ),
        }
    }
}

fn has_id(toy: &Document, id: &ToyId) -> bool {
    matches!(toy.get(fields::ID), Some(Bson::ObjectId(oid)) if *oid == id.object_id())
}

/// Position of a value in BSON sort order. Missing fields sort as null.
fn type_rank(value: Option<&Bson>) -> u8 {
    match value {
        None | Some(Bson::Null) | Some(Bson::Undefined) => 0,
        Some(Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_)) => 1,
        Some(Bson::String(_) | Bson::Symbol(_)) => 2,
        Some(Bson::Document(_)) => 3,
        Some(Bson::Array(_)) => 4,
        Some(Bson::Binary(_)) => 5,
        Some(Bson::ObjectId(_)) => 6,
        Some(Bson::Boolean(_)) => 7,
        Some(Bson::DateTime(_)) => 8,
        Some(Bson::Timestamp(_)) => 9,
        Some(_) => 10,
    }
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(*n as f64),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

fn compare_numbers(a: f64, b: f64) -> Ordering {
    // NaN sorts below every other number
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Split a string into alternating runs of digits and non-digits.
fn chunks(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut prev_digit = None;
    for (i, c) in s.char_indices() {
        let digit = c.is_ascii_digit();
        if prev_digit.is_some_and(|p| p != digit) {
            out.push(&s[start..i]);
            start = i;
        }
        prev_digit = Some(digit);
    }
    if start < s.len() {
        out.push(&s[start..]);
    }
    out
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Primary weight of a non-digit run's character: punctuation and symbols
/// sort before digits, letters after them.
fn char_key(c: char) -> (u8, char) {
    if c.is_alphabetic() {
        (2, c.to_lowercase().next().unwrap_or(c))
    } else {
        (0, c)
    }
}

fn run_rank(run: &str) -> u8 {
    match run.chars().next() {
        Some(c) if c.is_ascii_digit() => 1,
        Some(c) => char_key(c).0,
        None => 0,
    }
}

/// `en_US` collation with numeric ordering.
///
/// Digit runs compare by value. Punctuation sorts before digits and digits
/// before letters. Letters compare case-insensitively first and lowercase
/// sorts before uppercase on ties.
pub(crate) fn collate_numeric(a: &str, b: &str) -> Ordering {
    let (ca, cb) = (chunks(a), chunks(b));
    for (x, y) in ca.iter().zip(cb.iter()) {
        let ord = run_rank(x).cmp(&run_rank(y)).then_with(|| {
            if run_rank(x) == 1 {
                compare_digit_runs(x, y)
            } else {
                x.chars().map(char_key).cmp(y.chars().map(char_key))
            }
        });
        if ord != Ordering::Equal {
            return ord;
        }
    }

    ca.len().cmp(&cb.len()).then_with(|| {
        let case = |s: &str| {
            s.chars()
                .filter(|c| c.is_alphabetic())
                .map(char::is_uppercase)
                .collect::<Vec<_>>()
        };
        case(a).cmp(&case(b))
    })
}

fn compare_prices(a: Option<&Bson>, b: Option<&Bson>, collated: bool) -> Ordering {
    let (ra, rb) = (type_rank(a), type_rank(b));
    if ra != rb {
        return ra.cmp(&rb);
    }

    match (a, b) {
        (Some(Bson::String(x)), Some(Bson::String(y))) if collated => collate_numeric(x, y),
        (Some(Bson::String(x)), Some(Bson::String(y))) => x.cmp(y),
        (Some(x), Some(y)) => match (as_f64(x), as_f64(y)) {
            (Some(x), Some(y)) => compare_numbers(x, y),
            _ => match (x, y) {
                (Bson::Boolean(x), Bson::Boolean(y)) => x.cmp(y),
                (Bson::DateTime(x), Bson::DateTime(y)) => x.cmp(y),
                (Bson::ObjectId(x), Bson::ObjectId(y)) => x.cmp(y),
                _ => Ordering::Equal,
            },
        },
        _ => Ordering::Equal,
    }
}

fn sort_by_price(toys: &mut [Document], sort: PriceSort, collated: bool) {
    toys.sort_by(|a, b| {
        let ord = compare_prices(a.get(fields::PRICE), b.get(fields::PRICE), collated);
        match sort {
            PriceSort::Ascending => ord,
            PriceSort::Descending => ord.reverse(),
        }
    });
}

#[async_trait]
impl ToyStore for InMemoryToyStore {
    async fn find(&self, query: FindQuery) -> GatewayResult<Vec<Toy>> {
        let matcher = Matcher::compile(&query)?;
        let toys = self.read("find")?;

        let mut found: Vec<Document> = toys
            .iter()
            .filter(|toy| matcher.matches(toy))
            .cloned()
            .collect();
        drop(toys);

        if let Some(sort) = query.sort {
            sort_by_price(&mut found, sort, query.numeric_collation);
        }
        if let Some(limit) = query.limit {
            found.truncate(limit.get() as usize);
        }

        Ok(found)
    }

    async fn find_one(&self, id: ToyId) -> GatewayResult<Option<Toy>> {
        let toys = self.read("findOne")?;
        Ok(toys.iter().find(|toy| has_id(toy, &id)).cloned())
    }

    async fn insert_one(&self, toy: Toy) -> GatewayResult<InsertAck> {
        let mut toys = self.write("insertOne")?;

        let (inserted_id, stored) = match toy.get(fields::ID) {
            Some(id) => (id.clone(), toy),
            None => {
                let id = Bson::ObjectId(ObjectId::new());
                let mut stored = Document::new();
                stored.insert(fields::ID, id.clone());
                for (key, value) in toy {
                    stored.insert(key, value);
                }
                (id, stored)
            }
        };

        if toys.iter().any(|t| t.get(fields::ID) == Some(&inserted_id)) {
            return Err(StorageError::QueryFailed {
                backend: BACKEND,
                operation: "insertOne",
                message: format!("duplicate key: _id {}", inserted_id),
            }
            .into());
        }

        toys.push(stored);

        Ok(InsertAck {
            acknowledged: true,
            inserted_id,
        })
    }

    async fn update_one(&self, id: ToyId, update: ToyUpdate) -> GatewayResult<UpdateAck> {
        let mut toys = self.write("updateOne")?;

        let Some(toy) = toys.iter_mut().find(|toy| has_id(toy, &id)) else {
            return Ok(UpdateAck {
                acknowledged: true,
                matched_count: 0,
                modified_count: 0,
                upserted_count: 0,
                upserted_id: None,
            });
        };

        let mut modified = false;
        for (field, value) in update.fields() {
            if toy.get(&field) != Some(&value) {
                toy.insert(field, value);
                modified = true;
            }
        }

        Ok(UpdateAck {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(modified),
            upserted_count: 0,
            upserted_id: None,
        })
    }

    async fn delete_one(&self, id: ToyId) -> GatewayResult<DeleteAck> {
        let mut toys = self.write("deleteOne")?;

        let deleted_count = match toys.iter().position(|toy| has_id(toy, &id)) {
            Some(index) => {
                toys.remove(index);
                1
            }
            None => 0,
        };

        Ok(DeleteAck {
            acknowledged: true,
            deleted_count,
        })
    }

    async fn ensure_indexes(&self) -> GatewayResult<()> {
        Ok(())
    }

    async fn ping(&self) -> GatewayResult<()> {
        self.read("ping").map(|_| ())
    }
}
