//! Repository traits for catalog reads.
//!
//! Writes go through [`UnitOfWork`](crate::UnitOfWork) so that a product and
//! its images always change together.

pub mod images;
pub mod products;

pub use images::ImageRepo;
pub use products::ProductRepo;
