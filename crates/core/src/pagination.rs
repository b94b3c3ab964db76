use serde::Serialize;

/// The page the caller asked for plus the exact count the backend reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow {
    pub page: u32,
    pub per_page: u32,
    pub total_count: u64,
}

impl PageWindow {
    pub fn new(page: u32, per_page: u32, total_count: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
            total_count,
        }
    }

    /// `ceil(total_count / per_page)`, never below 1.
    pub fn total_pages(&self) -> u32 {
        let pages = self.total_count.div_ceil(u64::from(self.per_page));
        u32::try_from(pages).unwrap_or(u32::MAX).max(1)
    }

    /// Last valid page when the requested page is past the end.
    ///
    /// Returns `None` for an empty result set, so a zero count never
    /// redirects. The returned page is always within bounds, which keeps the
    /// rewrite to a single hop.
    pub fn clamp_redirect(&self) -> Option<u32> {
        if self.total_count == 0 {
            return None;
        }
        let last = self.total_pages();
        (self.page > last).then_some(last)
    }
}
