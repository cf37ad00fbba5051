pub mod credentials;
pub mod error;
pub mod extractor;
pub mod harvester;
pub mod logger;
pub mod profile_api;
pub mod search_api;

// Exporting types for convenience
pub use credentials::{CredentialOverrides, Credentials};
pub use error::{Result, ScraperError};
pub use extractor::Extractor;
pub use harvester::{HarvestParams, HarvestState, Harvester};
pub use profile_api::{enrich, ContactRecord, LinkedInClient, ProfileApi};
pub use search_api::{OxylabsClient, QueryResponse, SearchApi, SerpRequest};
