use serde::Deserialize;

use crate::core::filter::Filter;
use crate::core::models::common::{Pagination, DEFAULT_PAGE_SIZE};

/// Query string of every list endpoint: filters plus paging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub team: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl ListParams {
    pub fn filter(&self) -> Filter {
        Filter {
            search: self.search.clone(),
            status: self.status.clone(),
            kind: self.kind.clone(),
            team: self.team.clone(),
        }
        .normalized()
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::page(self.page.unwrap_or(1), self.size.unwrap_or(DEFAULT_PAGE_SIZE))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PageParams {
    pub fn pagination(&self) -> Pagination {
        Pagination::page(self.page.unwrap_or(1), self.size.unwrap_or(DEFAULT_PAGE_SIZE))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationParams {
    #[serde(rename = "type")]
    pub status: Option<String>,
    pub search: Option<String>,
}
