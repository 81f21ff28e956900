pub mod artifacts;
pub mod gallery;
pub mod neighbors;
pub mod posters;
pub mod providers;
pub mod recommendations;

pub use artifacts::{ensure_artifacts, ArtifactFetcher, ArtifactSources, HttpArtifactFetcher};
pub use gallery::Gallery;
pub use neighbors::{top_neighbors, Neighbor};
pub use posters::PosterResolver;
pub use recommendations::Recommender;
