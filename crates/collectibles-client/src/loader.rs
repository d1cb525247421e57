//! The seam between catalog assembly and the network.

use std::future::Future;

use collectibles_core::{Locale, RawCategoryTree};

use crate::client::CommerceClient;
use crate::error::FetchError;

/// Produces one locale's raw category tree.
///
/// [`CommerceClient`] is the production implementation; tests substitute
/// canned trees.
pub trait CategorySource: Sync {
    fn load(
        &self,
        locale: &Locale,
    ) -> impl Future<Output = Result<RawCategoryTree, FetchError>> + Send;
}

impl CategorySource for CommerceClient {
    fn load(
        &self,
        locale: &Locale,
    ) -> impl Future<Output = Result<RawCategoryTree, FetchError>> + Send {
        self.fetch_categories(locale.code())
    }
}
