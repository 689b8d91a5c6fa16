//! Translation of list query parameters into a filter and an ordering.
//!
//! Recognised keys:
//! - `categoryId`: restrict to that category (first value, cast to integer)
//! - `sort`: `price` sorts by price, any other value by expiry
//! - `order`: present at all means descending; its value is never read
//!
//! Unknown keys are ignored.

use sea_orm::{ColumnTrait, Order, QueryFilter, QueryOrder, Select};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

use crate::entity;
use crate::models::Product;

pub const CATEGORY_KEY: &str = "categoryId";
pub const SORT_KEY: &str = "sort";
pub const ORDER_KEY: &str = "order";

/// Query-string multimap: every value supplied for a key, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, Vec<String>>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.0.get(key)?.first().map(String::as_str)
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.0.get(key).map(Vec::as_slice).unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        let mut params = QueryParams::new();
        for (key, value) in pairs {
            params.insert(key, value);
        }
        params
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    Any,
    Id(i32),
    /// `categoryId` was not an integer, so no row can match
    Unmatchable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Price,
    Expiry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: SortColumn,
    pub direction: SortDirection,
}

/// Filter and ordering for a product listing. Both apply together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub category: CategoryFilter,
    /// `None` keeps the store's default order
    pub sort: Option<SortOrder>,
}

impl ProductQuery {
    pub fn from_params(params: &QueryParams) -> Self {
        let category = match params.first(CATEGORY_KEY) {
            None => CategoryFilter::Any,
            Some(raw) => match raw.trim().parse::<i32>() {
                Ok(id) => CategoryFilter::Id(id),
                Err(_) => CategoryFilter::Unmatchable,
            },
        };

        let sort = params.first(SORT_KEY).map(|key| SortOrder {
            column: if key == "price" {
                SortColumn::Price
            } else {
                SortColumn::Expiry
            },
            direction: if params.contains(ORDER_KEY) {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            },
        });

        let query = Self { category, sort };
        debug!(?query, "Built product query");
        query
    }

    pub fn is_unmatchable(&self) -> bool {
        self.category == CategoryFilter::Unmatchable
    }

    /// `WHERE category_id = $1` and `ORDER BY price|expiry ASC|DESC`
    pub fn apply(&self, select: Select<entity::Entity>) -> Select<entity::Entity> {
        let select = match self.category {
            CategoryFilter::Any => select,
            CategoryFilter::Id(id) => select.filter(entity::Column::CategoryId.eq(id)),
            // primary key is never NULL
            CategoryFilter::Unmatchable => select.filter(entity::Column::Id.is_null()),
        };

        match self.sort {
            None => select,
            Some(SortOrder { column, direction }) => {
                let column = match column {
                    SortColumn::Price => entity::Column::Price,
                    SortColumn::Expiry => entity::Column::Expiry,
                };
                let order = match direction {
                    SortDirection::Asc => Order::Asc,
                    SortDirection::Desc => Order::Desc,
                };
                select.order_by(column, order)
            }
        }
    }

    /// In-memory equivalent of the `WHERE` clause
    pub fn matches(&self, product: &Product) -> bool {
        match self.category {
            CategoryFilter::Any => true,
            CategoryFilter::Id(id) => product.category_id == id,
            CategoryFilter::Unmatchable => false,
        }
    }

    /// In-memory equivalent of the `ORDER BY` clause
    pub fn sort(&self, products: &mut [Product]) {
        let Some(SortOrder { column, direction }) = self.sort else {
            return;
        };

        products.sort_by(|a, b| {
            let ordering: Ordering = match column {
                SortColumn::Price => a.price.total_cmp(&b.price),
                SortColumn::Expiry => a.expiry.cmp(&b.expiry),
            };
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sea_orm::{DbBackend, EntityTrait, QueryTrait};

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs.iter().copied().collect()
    }

    fn sql(query: ProductQuery) -> String {
        query
            .apply(entity::Entity::find())
            .build(DbBackend::Postgres)
            .to_string()
    }

    fn product(id: i32, price: f64, day: u32, category_id: i32) -> Product {
        Product {
            id,
            name: format!("p{}", id),
            price,
            expiry: Utc.with_ymd_and_hms(2030, 1, day, 0, 0, 0).unwrap(),
            category_id,
        }
    }

    #[test]
    fn test_query_params_keep_all_values() {
        let params = params(&[("categoryId", "2"), ("categoryId", "9"), ("sort", "price")]);
        assert_eq!(params.first("categoryId"), Some("2"));
        assert_eq!(params.get_all("categoryId").len(), 2);
        assert!(params.get_all("order").is_empty());
    }

    #[test]
    fn test_no_params_means_everything_unordered() {
        let query = ProductQuery::from_params(&QueryParams::new());
        assert_eq!(query, ProductQuery::default());

        let sql = sql(query);
        assert!(!sql.contains("WHERE"));
        assert!(!sql.contains("ORDER BY"));
    }

    #[test]
    fn test_category_uses_first_value() {
        let query = ProductQuery::from_params(&params(&[("categoryId", "12"), ("categoryId", "4")]));
        assert_eq!(query.category, CategoryFilter::Id(12));
        assert!(sql(query).contains(r#"WHERE "products"."category_id" = 12"#));
    }

    #[test]
    fn test_non_integer_category_is_unmatchable() {
        for raw in ["abc", "", "1.5", "99999999999"] {
            let query = ProductQuery::from_params(&params(&[("categoryId", raw)]));
            assert!(query.is_unmatchable(), "{raw:?} should match nothing");
        }
        let query = ProductQuery::from_params(&params(&[("categoryId", "x")]));
        assert!(sql(query).contains(r#""products"."id" IS NULL"#));
    }

    #[test]
    fn test_sort_price_defaults_to_ascending() {
        let query = ProductQuery::from_params(&params(&[("sort", "price")]));
        assert_eq!(
            query.sort,
            Some(SortOrder {
                column: SortColumn::Price,
                direction: SortDirection::Asc
            })
        );
        assert!(sql(query).contains(r#"ORDER BY "products"."price" ASC"#));
    }

    #[test]
    fn test_order_presence_means_descending_whatever_its_value() {
        for value in ["desc", "asc", ""] {
            let query = ProductQuery::from_params(&params(&[("sort", "price"), ("order", value)]));
            assert_eq!(query.sort.unwrap().direction, SortDirection::Desc);
        }
    }

    #[test]
    fn test_any_other_sort_key_uses_expiry() {
        let query = ProductQuery::from_params(&params(&[("sort", "name"), ("order", "1")]));
        assert!(sql(query).contains(r#"ORDER BY "products"."expiry" DESC"#));
    }

    #[test]
    fn test_order_without_sort_has_no_effect() {
        let query = ProductQuery::from_params(&params(&[("order", "desc")]));
        assert_eq!(query.sort, None);
    }

    #[test]
    fn test_filter_and_sort_compose() {
        let query = ProductQuery::from_params(&params(&[
            ("categoryId", "3"),
            ("sort", "price"),
            ("order", "desc"),
            ("page", "2"),
        ]));
        let sql = sql(query);
        assert!(sql.contains(r#"WHERE "products"."category_id" = 3"#));
        assert!(sql.contains(r#"ORDER BY "products"."price" DESC"#));
    }

    #[test]
    fn test_in_memory_filter_and_sort() {
        let query = ProductQuery::from_params(&params(&[("categoryId", "1"), ("sort", "price")]));
        let mut products: Vec<Product> = vec![
            product(1, 5.0, 3, 1),
            product(2, 1.0, 2, 2),
            product(3, 2.0, 1, 1),
        ]
        .into_iter()
        .filter(|p| query.matches(p))
        .collect();
        query.sort(&mut products);

        let ids: Vec<i32> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_in_memory_expiry_descending() {
        let query = ProductQuery::from_params(&params(&[("sort", "expiry"), ("order", "")]));
        let mut products = vec![product(1, 1.0, 1, 1), product(2, 1.0, 9, 1), product(3, 1.0, 5, 1)];
        query.sort(&mut products);

        let ids: Vec<i32> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
