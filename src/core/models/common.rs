pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    limit: i64,
    offset: Option<i64>,
}

impl Pagination {
    pub fn new(limit: i64, offset: Option<i64>) -> Self {
        Self { limit, offset }
    }

    /// Pages are 1-based; out-of-range values are clamped instead of rejected.
    pub fn page(page: i64, size: i64) -> Self {
        let size = size.clamp(1, MAX_PAGE_SIZE);
        let page = page.max(1);
        Self::new(size, Some((page - 1).saturating_mul(size)))
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }

    pub fn to_sql_clause(&self) -> String {
        let mut stmt = format!(" LIMIT {} ", self.limit);
        if let Some(offset) = self.offset {
            stmt.push_str(&format!("OFFSET {}", offset));
        }
        stmt
    }

    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().skip(self.offset() as usize).take(self.limit as usize).collect()
    }
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_page_clamps() {
        let p = Pagination::page(0, 1000);
        assert_eq!(p.limit(), MAX_PAGE_SIZE);
        assert_eq!(p.offset(), 0);
        let p = Pagination::page(3, 10);
        assert_eq!(p.offset(), 20);
        assert_eq!(p.to_sql_clause(), " LIMIT 10 OFFSET 20");
    }

    #[test]
    fn test_page_past_i64_range() {
        let p = Pagination::page(i64::MAX, 10);
        assert_eq!(p.offset(), i64::MAX);
        assert_eq!(p.to_sql_clause(), format!(" LIMIT 10 OFFSET {}", i64::MAX));
        assert!(p.slice(vec![1, 2, 3]).is_empty());
    }

    #[test]
    fn test_slice() {
        let p = Pagination::page(2, 2);
        assert_eq!(p.slice(vec![1, 2, 3, 4, 5]), vec![3, 4]);
    }
}
