use serde::Serialize;

use super::query_params::QueryParams;

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// `limit`/`offset` pagination. Invalid values fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    const LIMIT: &'static str = "limit";
    const OFFSET: &'static str = "offset";
    pub const MAX_LIMIT: i64 = 100;

    pub fn from_params(params: &QueryParams, default_limit: i64) -> Self {
        let limit = params
            .get_parsed::<i64>(Self::LIMIT)
            .ok()
            .flatten()
            .filter(|limit| *limit > 0)
            .unwrap_or(default_limit)
            .min(Self::MAX_LIMIT);
        let offset = params
            .get_parsed::<i64>(Self::OFFSET)
            .ok()
            .flatten()
            .filter(|offset| *offset >= 0)
            .unwrap_or(0);

        Self { limit, offset }
    }

    /// Wraps `results`, linking neighbours relative to `path` with the other parameters kept.
    pub fn page<T>(&self, results: Vec<T>, count: i64, path: &str, params: &QueryParams) -> Page<T> {
        let next_offset = self.offset.saturating_add(self.limit);
        let next = (next_offset < count).then(|| {
            let mut params = params.clone();
            params.set_param(Self::LIMIT, &self.limit.to_string());
            params.set_param(Self::OFFSET, &next_offset.to_string());
            link(path, &params)
        });

        let previous = (self.offset > 0).then(|| {
            let mut params = params.clone();
            params.set_param(Self::LIMIT, &self.limit.to_string());
            let previous_offset = self.offset.saturating_sub(self.limit);
            if previous_offset <= 0 {
                params.remove_param(Self::OFFSET);
            } else {
                params.set_param(Self::OFFSET, &previous_offset.to_string());
            }
            link(path, &params)
        });

        Page {
            count,
            next,
            previous,
            results,
        }
    }
}

fn link(path: &str, params: &QueryParams) -> String {
    let query = params.to_query_string();
    if query.is_empty() {
        path.to_owned()
    } else {
        format!("{path}?{query}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        QueryParams::from_pairs(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults() {
        let pagination = Pagination::from_params(&QueryParams::new(), 6);
        assert_eq!(pagination, Pagination { limit: 6, offset: 0 });
    }

    #[test]
    fn invalid_values_fall_back() {
        let pagination =
            Pagination::from_params(&params(&[("limit", "0"), ("offset", "-3")]), 6);
        assert_eq!(pagination, Pagination { limit: 6, offset: 0 });

        let pagination = Pagination::from_params(&params(&[("limit", "ten")]), 6);
        assert_eq!(pagination.limit, 6);
    }

    #[test]
    fn first_page_links_only_forward() {
        let params = params(&[("tags", "lunch")]);
        let pagination = Pagination::from_params(&params, 2);

        let page = pagination.page(vec![1, 2], 5, "/api/recipes/", &params);

        assert_eq!(page.count, 5);
        assert_eq!(
            page.next.as_deref(),
            Some("/api/recipes/?limit=2&offset=2&tags=lunch")
        );
        assert_eq!(page.previous, None);
    }

    #[test]
    fn middle_page_links_both_ways() {
        let params = params(&[("limit", "2"), ("offset", "2")]);
        let pagination = Pagination::from_params(&params, 6);

        let page = pagination.page(vec![3, 4], 5, "/api/users/", &params);

        assert_eq!(page.next.as_deref(), Some("/api/users/?limit=2&offset=4"));
        assert_eq!(page.previous.as_deref(), Some("/api/users/?limit=2"));
    }

    #[test]
    fn last_page_links_only_back() {
        let params = params(&[("limit", "2"), ("offset", "4")]);
        let pagination = Pagination::from_params(&params, 6);

        let page = pagination.page(vec![5], 5, "/api/users/", &params);

        assert_eq!(page.next, None);
        assert_eq!(page.previous.as_deref(), Some("/api/users/?limit=2&offset=2"));
    }

    #[test]
    fn limit_is_capped() {
        let params = params(&[("limit", "500")]);
        let pagination = Pagination::from_params(&params, 6);

        assert_eq!(pagination.limit, Pagination::MAX_LIMIT);
    }

    #[test]
    fn huge_values_do_not_overflow() {
        let max = i64::MAX.to_string();
        let params = params(&[("limit", max.as_str()), ("offset", "5")]);
        let pagination = Pagination::from_params(&params, 6);

        let page = pagination.page(vec![6, 7, 8, 9, 10], 10, "/api/recipes/", &params);

        assert_eq!(page.next, None);
        assert_eq!(page.previous.as_deref(), Some("/api/recipes/?limit=100"));

        let pagination = Pagination {
            limit: i64::MAX,
            offset: i64::MAX,
        };
        let page = pagination.page(Vec::<i32>::new(), 10, "/api/recipes/", &QueryParams::new());
        assert_eq!(page.next, None);
    }
}
