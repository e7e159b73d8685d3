use serde_json::{Map, Value};

use super::error::{ClientError, ClientResult};
use super::transport::Transport;
use super::{DateFilter, Page};

/// Walks one endpoint page by page.
///
/// The walk ends after the first page holding fewer than `page_size` records.
/// When the data ends on a full page, one extra request is needed to see the
/// empty page that closes the walk.
pub struct Paginator<'a> {
    transport: &'a dyn Transport,
    url: String,
    base_filters: Map<String, Value>,
    dates: DateFilter,
    page_size: usize,
    page: u32,
    exhausted: bool,
}

impl<'a> Paginator<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        url: impl Into<String>,
        base_filters: Map<String, Value>,
        dates: &DateFilter,
        page_size: usize,
    ) -> Self {
        Self {
            transport,
            url: url.into(),
            base_filters,
            dates: dates.clone(),
            page_size,
            page: 1,
            exhausted: false,
        }
    }

    fn params(&self) -> Value {
        let mut params = Map::new();
        params.insert("page".into(), Value::from(self.page));
        params.insert("per_page".into(), Value::from(self.page_size));
        for (key, value) in &self.base_filters {
            params.insert(key.clone(), value.clone());
        }
        if let Some(since) = &self.dates.since {
            params.insert("since".into(), Value::from(since.as_str()));
        }
        if let Some(until) = &self.dates.until {
            params.insert("until".into(), Value::from(until.as_str()));
        }
        Value::Object(params)
    }

    /// Fetches the next page, or `None` once the walk is over.
    pub async fn next_page(&mut self) -> ClientResult<Option<Page>> {
        if self.exhausted {
            return Ok(None);
        }

        let response = self.transport.get(&self.url, Some(&self.params())).await?;
        if !response.is_success() {
            self.exhausted = true;
            return Err(ClientError::Status {
                status: response.status(),
                url: response.url().to_string(),
                body: response.text().chars().take(200).collect(),
            });
        }

        let page: Page = response.json()?;
        self.page += 1;
        if page.len() < self.page_size {
            self.exhausted = true;
        }

        Ok(Some(page))
    }
}
