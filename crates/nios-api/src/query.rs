// WAPI request shaping.
//
// Every WAPI call takes the same family of underscore-prefixed query
// arguments for field selection, paging, and envelope control, plus
// plain `field=value` and `*ExtAttr=value` search filters.

/// Query arguments for a single WAPI request.
///
/// Built fluently and rendered with [`QueryParams::to_pairs`]:
///
/// ```
/// use nios_api::QueryParams;
///
/// let q = QueryParams::new()
///     .return_fields_plus(["extattrs"])
///     .return_as_object()
///     .extattr_filter("Site", "HQ");
/// assert!(q.to_pairs().contains(&("*Site".into(), "HQ".into())));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    return_fields: Vec<String>,
    return_fields_plus: Vec<String>,
    return_as_object: bool,
    paging: bool,
    max_results: Option<u32>,
    page_id: Option<String>,
    filters: Vec<(String, String)>,
    extattr_filters: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// `_return_fields`: replace the default field set.
    pub fn return_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.return_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// `_return_fields+`: add fields to the default set.
    pub fn return_fields_plus<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.return_fields_plus
            .extend(fields.into_iter().map(Into::into));
        self
    }

    /// `_return_as_object=1`: wrap results in `{ "result": ... }`.
    pub fn return_as_object(mut self) -> Self {
        self.return_as_object = true;
        self
    }

    /// `_paging=1` with `_max_results` as the page size.
    pub fn paging(mut self, page_size: u32) -> Self {
        self.paging = true;
        self.max_results = Some(page_size);
        self
    }

    /// `_max_results` without paging (hard cap on the result count).
    pub fn max_results(mut self, max: u32) -> Self {
        self.max_results = Some(max);
        self
    }

    /// `_page_id` cursor returned by the previous page.
    pub fn page_id(mut self, page_id: impl Into<String>) -> Self {
        self.page_id = Some(page_id.into());
        self
    }

    /// Exact-match search on a plain object field.
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    /// Exact-match search on an extensible attribute (`*Name=value`).
    pub fn extattr_filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extattr_filters.push((name.into(), value.into()));
        self
    }

    pub fn is_paged(&self) -> bool {
        self.paging
    }

    /// Render as `(key, value)` pairs for `reqwest::RequestBuilder::query`.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if !self.return_fields.is_empty() {
            pairs.push(("_return_fields".to_owned(), self.return_fields.join(",")));
        }
        if !self.return_fields_plus.is_empty() {
            pairs.push((
                "_return_fields+".to_owned(),
                self.return_fields_plus.join(","),
            ));
        }
        if self.return_as_object {
            pairs.push(("_return_as_object".to_owned(), "1".to_owned()));
        }
        if self.paging {
            pairs.push(("_paging".to_owned(), "1".to_owned()));
        }
        if let Some(max) = self.max_results {
            pairs.push(("_max_results".to_owned(), max.to_string()));
        }
        if let Some(ref page_id) = self.page_id {
            pairs.push(("_page_id".to_owned(), page_id.clone()));
        }
        for (field, value) in &self.filters {
            pairs.push((field.clone(), value.clone()));
        }
        for (name, value) in &self.extattr_filters {
            pairs.push((format!("*{name}"), value.clone()));
        }

        pairs
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_owned(), v.to_owned())
    }

    #[test]
    fn empty_query_renders_nothing() {
        assert!(QueryParams::new().to_pairs().is_empty());
    }

    #[test]
    fn renders_all_arguments_in_stable_order() {
        let q = QueryParams::new()
            .return_fields(["name", "comment"])
            .return_fields_plus(["extattrs"])
            .return_as_object()
            .paging(100)
            .page_id("789c:abc")
            .filter("name", "default")
            .extattr_filter("Terraform Internal ID", "id-1");

        assert_eq!(
            q.to_pairs(),
            vec![
                pair("_return_fields", "name,comment"),
                pair("_return_fields+", "extattrs"),
                pair("_return_as_object", "1"),
                pair("_paging", "1"),
                pair("_max_results", "100"),
                pair("_page_id", "789c:abc"),
                pair("name", "default"),
                pair("*Terraform Internal ID", "id-1"),
            ]
        );
        assert!(q.is_paged());
    }

    #[test]
    fn max_results_without_paging() {
        let q = QueryParams::new().max_results(5);
        assert!(!q.is_paged());
        assert_eq!(q.to_pairs(), vec![pair("_max_results", "5")]);
    }
}
