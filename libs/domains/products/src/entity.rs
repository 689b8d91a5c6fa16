use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

use crate::models::{NewProduct, Product};

/// Sea-ORM Entity for the products table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub price: f64,
    pub expiry: DateTimeWithTimeZone,
    pub category_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
            expiry: model.expiry.into(),
            category_id: model.category_id,
        }
    }
}

/// Insert; the id comes from the serial column.
impl From<NewProduct> for ActiveModel {
    fn from(input: NewProduct) -> Self {
        ActiveModel {
            id: NotSet,
            name: Set(input.name),
            price: Set(input.price),
            expiry: Set(input.expiry.into()),
            category_id: Set(input.category_id),
        }
    }
}

/// Full overwrite of the row with `product.id`.
impl From<Product> for ActiveModel {
    fn from(product: Product) -> Self {
        ActiveModel {
            id: Set(product.id),
            name: Set(product.name),
            price: Set(product.price),
            expiry: Set(product.expiry.into()),
            category_id: Set(product.category_id),
        }
    }
}
