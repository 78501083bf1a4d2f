pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Keyset pagination over ascending ids: at most `size` rows with id greater than `last_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    size: u32,
    last_id: Option<i64>,
}

impl Pagination {
    pub fn new(size: u32, last_id: Option<i64>) -> Self {
        let size = if size == 0 { DEFAULT_PAGE_SIZE } else { size };
        Self { size, last_id }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn last_id(&self) -> Option<i64> {
        self.last_id
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, None)
    }
}
