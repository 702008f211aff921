pub mod product;
pub mod schema;
pub mod service_center;
pub mod service_request;
pub mod user;
pub mod warranty;

pub use schema::{CollectionSchema, Entity, FieldError, ValidationFailure};

use product::Product;
use service_center::ServiceCenter;
use service_request::ServiceRequest;
use user::User;
use warranty::Warranty;

/// Field metadata for every persisted record kind.
pub fn collection_schemas() -> Vec<CollectionSchema> {
    vec![
        User::schema(),
        Product::schema(),
        ServiceCenter::schema(),
        ServiceRequest::schema(),
        Warranty::schema(),
    ]
}
