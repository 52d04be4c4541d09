//! Cost query pipeline and its data models.

pub mod aggregator;
pub mod backoff;
pub mod cost_fetcher;
pub mod http;
pub mod logging;
pub mod mock_data;
pub mod models;
pub mod pagination;
pub mod pipeline;
pub mod pricing;
pub mod validator;

pub use aggregator::aggregate;
pub use backoff::{BackoffPolicy, Sleeper, TokioSleeper};
pub use cost_fetcher::{CostFetcher, CostFilters, CostPageSource, FetchedPage, PageRequest};
pub use mock_data::MockDataGenerator;
pub use models::{
    CostAmount, CostBucket, CostPage, CostResult, CostsPayload, ModelUsage, ProjectUsage,
    RobotOutput, UsageData, UsageOutcome, UsageResponse,
};
pub use pagination::{Paginated, fetch_all};
pub use pipeline::{ClientSettings, UsagePipeline};
pub use pricing::{ModelPricing, PricingTable, ToolPricing};
pub use validator::CredentialValidator;
