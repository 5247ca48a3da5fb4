//! Dataset selector arguments shared by the tile and capabilities commands.

use clap::Args;
use occmap::server::params::{self, ParamError, QueryParams};

/// Which dataset to read. At most one may be given; none selects all data.
#[derive(Debug, Clone, Default, Args)]
pub struct DatasetArgs {
    /// Taxon key
    #[arg(long)]
    pub taxon_key: Option<String>,

    /// Dataset UUID
    #[arg(long)]
    pub dataset_key: Option<String>,

    /// Publishing organisation UUID
    #[arg(long)]
    pub publishing_org: Option<String>,

    /// ISO country code where the occurrence was recorded
    #[arg(long)]
    pub country: Option<String>,

    /// ISO country code of the publisher
    #[arg(long)]
    pub publishing_country: Option<String>,
}

impl DatasetArgs {
    /// The selectors as request query parameters.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("taxonKey", &self.taxon_key),
            ("datasetKey", &self.dataset_key),
            ("publishingOrg", &self.publishing_org),
            ("country", &self.country),
            ("publishingCountry", &self.publishing_country),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.clone().map(|v| (name, v)))
        .collect()
    }

    /// Storage key for the selected dataset.
    pub fn storage_key(&self) -> Result<String, ParamError> {
        params::dataset_key(&self.query_pairs().into_iter().collect::<QueryParams>())
    }
}
