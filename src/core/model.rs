//! Defines application business models.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use utoipa::{openapi::RefOr, IntoParams, ToSchema};
use validify::Validate;

pub mod document;

/// Upper bound for the amount of items a single page can hold.
pub const MAX_PER_PAGE: usize = 100;

/// Used to obtain paginated lists with a total number of items in
/// the tables.
#[derive(Debug, Serialize)]
pub struct List<T> {
    pub total: usize,
    pub items: Vec<T>,
}

impl<'__s, T> ToSchema<'__s> for List<T>
where
    T: ToSchema<'__s>,
{
    fn schema() -> (
        &'__s str,
        utoipa::openapi::RefOr<utoipa::openapi::schema::Schema>,
    ) {
        let (_, item_schema) = T::schema();

        let list_schema = utoipa::openapi::schema::ObjectBuilder::new()
            .title(Some("List"))
            .property(
                "total",
                utoipa::openapi::schema::ObjectBuilder::new()
                    .title(Some("total"))
                    .schema_type(utoipa::openapi::SchemaType::Integer),
            )
            .property(
                "items",
                utoipa::openapi::schema::ArrayBuilder::new().items(item_schema),
            )
            .build();

        (
            "List",
            RefOr::T(utoipa::openapi::Schema::Object(list_schema)),
        )
    }
}

impl<T> List<T> {
    pub fn new(total: usize, items: Vec<T>) -> Self {
        Self { total, items }
    }
}

impl<T> From<Vec<T>> for List<T> {
    /// Wraps an unpaginated result, the total being its length.
    fn from(items: Vec<T>) -> Self {
        Self::new(items.len(), items)
    }
}

impl<T> std::iter::IntoIterator for List<T> {
    type Item = T;

    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Used to paginate queries.
#[serde_as]
#[derive(Debug, Clone, Copy, Deserialize, Validate, ToSchema, IntoParams)]
#[serde(default)]
pub struct Pagination {
    /// The page number, starting from 1.
    #[serde_as(as = "DisplayFromStr")]
    #[validate(range(min = 1.))]
    pub page: usize,

    /// Items per page, capped at [MAX_PER_PAGE].
    #[serde_as(as = "DisplayFromStr")]
    #[validate(range(min = 1.))]
    pub per_page: usize,
}

impl Pagination {
    pub fn new(per_page: usize, page: usize) -> Self {
        Self { per_page, page }
    }

    /// Returns a tuple whose first element is the LIMIT and second
    /// the OFFSET for the query. The limit never exceeds [MAX_PER_PAGE]
    /// and the offset saturates at `i64::MAX`.
    pub fn to_limit_offset(&self) -> (i64, i64) {
        let per_page = self.per_page.clamp(1, MAX_PER_PAGE);
        let offset = (self.page.max(1) - 1).saturating_mul(per_page);
        (
            per_page as i64,
            i64::try_from(offset).unwrap_or(i64::MAX),
        )
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            per_page: 10,
            page: 1,
        }
    }
}
