pub mod artwork;

pub use artwork::{ArtworkError, ArtworkResolver, ConfigManager, FetchError, ImageResult, ImageType, ResolverConfig};
