use hyper::HeaderMap;
use serde::{Deserialize, Serialize};
use std::future::Future;
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 2000;
/// Largest offset a database accepts; row offsets are signed 64-bit.
pub const MAX_OFFSET: u64 = i64::MAX.unsigned_abs();

/// Raw `page` / `size` query parameters.
///
/// Values are kept as strings so that malformed or out-of-range input falls
/// back to the defaults instead of rejecting the request.
#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageRequest {
    /// Zero-based page number.
    #[param(value_type = Option<u64>, example = 0)]
    pub page: Option<String>,
    /// Page size, clamped to 1..=2000.
    #[param(value_type = Option<u64>, example = 20)]
    pub size: Option<String>,
}

impl PageRequest {
    #[must_use]
    pub fn pageable(&self) -> Pageable {
        let page = self
            .page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .map_or(0, |page| u64::try_from(page).unwrap_or(0));
        let size = self
            .size
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .and_then(|size| u64::try_from(size).ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Pageable::of(page, size)
    }
}

/// Zero-based page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pageable {
    page: u64,
    size: u64,
}

impl Default for Pageable {
    fn default() -> Self {
        Self::of(0, DEFAULT_PAGE_SIZE)
    }
}

impl Pageable {
    /// A size of zero means "use the default"; larger sizes are capped at
    /// [`MAX_PAGE_SIZE`]. The page number is capped so that the offset never
    /// exceeds [`MAX_OFFSET`].
    #[must_use]
    pub fn of(page: u64, size: u64) -> Self {
        let size = if size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            size.min(MAX_PAGE_SIZE)
        };
        let page = page.min(MAX_OFFSET / size);
        Self { page, size }
    }

    #[must_use]
    pub const fn page_number(&self) -> u64 {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.size
    }

    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub page_number: u64,
    pub page_size: u64,
    pub offset: u64,
    pub paged: bool,
    pub unpaged: bool,
}

impl From<Pageable> for PageMetadata {
    fn from(pageable: Pageable) -> Self {
        Self {
            page_number: pageable.page_number(),
            page_size: pageable.page_size(),
            offset: pageable.offset(),
            paged: true,
            unpaged: false,
        }
    }
}

/// One page of results together with the size of the whole result set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub pageable: PageMetadata,
    pub total_elements: u64,
    pub total_pages: u64,
    pub last: bool,
    pub first: bool,
    pub number: u64,
    pub size: u64,
    pub number_of_elements: u64,
    pub empty: bool,
}

impl<T> Page<T> {
    /// Builds a page from its content and the total reported by a count query.
    ///
    /// A count taken separately from the content can disagree with it; when
    /// the content is non-empty and the page reaches past `total`, the total
    /// is recomputed from the content.
    #[must_use]
    pub fn new(content: Vec<T>, pageable: Pageable, total: u64) -> Self {
        let returned = content.len() as u64;
        let total_elements = if !content.is_empty()
            && pageable.offset().saturating_add(pageable.page_size()) > total
        {
            pageable.offset().saturating_add(returned)
        } else {
            total
        };
        let total_pages = total_elements.div_ceil(pageable.page_size());
        let number = pageable.page_number();

        Self {
            content,
            pageable: pageable.into(),
            total_elements,
            total_pages,
            last: number.saturating_add(1) >= total_pages,
            first: number == 0,
            number,
            size: pageable.page_size(),
            number_of_elements: returned,
            empty: returned == 0,
        }
    }

    /// Builds a page, running `count` only when the total cannot be derived
    /// from the content alone.
    ///
    /// The total is known without a count query on a first page that is not
    /// full, and on any later page that is non-empty but not full.
    ///
    /// # Errors
    ///
    /// Returns whatever error `count` produces.
    pub async fn with_lazy_total<F, Fut, E>(
        content: Vec<T>,
        pageable: Pageable,
        count: F,
    ) -> Result<Self, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<u64, E>>,
    {
        let returned = content.len() as u64;
        let partial = pageable.page_size() > returned;

        if pageable.offset() == 0 {
            if partial {
                return Ok(Self::new(content, pageable, returned));
            }
        } else if returned != 0 && partial {
            return Ok(Self::new(content, pageable, pageable.offset().saturating_add(returned)));
        }

        let total = count().await?;
        Ok(Self::new(content, pageable, total))
    }

    /// `Content-Range` header describing this page, e.g. `members 0-1/4`.
    /// An empty page has no range and reports `members */4`.
    #[must_use]
    pub fn content_range(&self, resource_name: &str) -> HeaderMap {
        if self.empty {
            return content_range_header(&format!(
                "{} */{}",
                sanitized(resource_name),
                self.total_elements
            ));
        }
        calculate_content_range(
            self.pageable.offset,
            self.size,
            self.total_elements,
            resource_name,
        )
    }
}

/// Function to calculate the total count and generate the Content-Range header.
///
/// # Arguments
///
/// * `offset` - The starting point of the range.
/// * `limit` - The maximum number of items to include in the range.
/// * `total_count` - The total number of items available.
/// * `resource_name` - The name of the resource being paginated.
#[must_use]
pub fn calculate_content_range(
    offset: u64,
    limit: u64,
    total_count: u64,
    resource_name: &str,
) -> HeaderMap {
    let max_offset_limit = offset
        .saturating_add(limit)
        .saturating_sub(1)
        .min(total_count.saturating_sub(1));
    content_range_header(&format!(
        "{} {offset}-{max_offset_limit}/{total_count}",
        sanitized(resource_name)
    ))
}

fn sanitized(resource_name: &str) -> String {
    resource_name
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .collect()
}

fn content_range_header(content_range: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = content_range.parse() {
        headers.insert("Content-Range", value);
    }
    headers
}
