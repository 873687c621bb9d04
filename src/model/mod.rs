pub mod product;
pub mod timeline;
