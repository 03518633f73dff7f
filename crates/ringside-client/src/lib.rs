pub mod bouts;
mod html;
pub mod fetcher;
pub mod pipeline;
pub mod rankings;
pub mod resolver;
pub mod search;

pub use bouts::{BoutExtractor, BoutPage};
pub use fetcher::ReqwestFetcher;
pub use pipeline::DatasetBuilder;
pub use resolver::IdentityResolver;
