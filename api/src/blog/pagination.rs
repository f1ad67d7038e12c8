use serde::Serialize;

use super::store::Window;

/// Posts per page on every feed.
pub const PER_PAGE: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub number: i64,
    pub num_pages: i64,
    pub count: i64,
    pub page_size: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PageInfo {
    pub fn window(&self) -> Window {
        Window {
            offset: (self.number - 1) * self.page_size,
            limit: self.page_size,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(flatten)]
    pub info: PageInfo,
}

pub struct Paginator {
    count: i64,
    page_size: i64,
}

impl Paginator {
    pub fn new(count: i64, page_size: i64) -> Self {
        Paginator {
            count: count.max(0),
            page_size: page_size.max(1),
        }
    }

    /// There is always at least one, possibly empty, page.
    pub fn num_pages(&self) -> i64 {
        ((self.count + self.page_size - 1) / self.page_size).max(1)
    }

    /// Resolves a raw `?page=` value. Anything that isn't a number means the
    /// first page; numbers outside the range are clamped to it.
    pub fn page(&self, requested: Option<&str>) -> PageInfo {
        let num_pages = self.num_pages();
        let number = requested
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .map(|n| n.clamp(1, num_pages))
            .unwrap_or(1);

        PageInfo {
            number,
            num_pages,
            count: self.count,
            page_size: self.page_size,
            has_next: number < num_pages,
            has_previous: number > 1,
        }
    }
}
