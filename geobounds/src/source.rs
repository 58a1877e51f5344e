use std::future::Future;

use crate::FeatureCollection;

/// Supplies the features of a table, optionally narrowed by a text filter.
///
/// A blank filter is the same as no filter.
pub trait FeatureSource {
    type Error;

    fn fetch(
        &self,
        table: &str,
        filter: Option<&str>,
    ) -> impl Future<Output = Result<FeatureCollection, Self::Error>> + Send;
}

/// Trims a user-supplied filter, mapping blank input to `None`.
pub fn normalize_filter(filter: Option<&str>) -> Option<&str> {
    filter.map(str::trim).filter(|f| !f.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filters_are_dropped() {
        assert_eq!(normalize_filter(None), None);
        assert_eq!(normalize_filter(Some("   ")), None);
        assert_eq!(normalize_filter(Some(" sapi ")), Some("sapi"));
    }
}
