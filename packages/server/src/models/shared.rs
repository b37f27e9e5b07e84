use serde::Deserialize;

/// Zero-based pagination parameters shared by the list endpoints.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct PageQuery {
    /// Page number, 0-based.
    #[param(example = 0)]
    pub page: Option<u64>,
    /// Number of items per page.
    #[param(example = 10)]
    pub page_size: Option<u64>,
}

impl PageQuery {
    /// Normalized (page, page_size) with the size clamped to 1..=100.
    pub fn normalize(&self) -> (u64, u64) {
        let page = self.page.unwrap_or(0);
        let page_size = self.page_size.unwrap_or(10).clamp(1, 100);
        (page, page_size)
    }
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
