//! Products grid data source.

use super::{GridDataSource, IndexPath, ProductCellModel};
use crate::catalog::{ProductsService, SearchResult, SearchResultsProduct};
use tracing::{debug, info, warn};

/// Load state of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridState {
    /// Nothing loaded, the last search had no results, or it failed
    Empty,
    /// A search has been issued and not yet applied
    Loading,
    /// Products are available
    Populated,
}

/// Identifies one issued load. Only the most recently issued ticket may update the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Owns the displayed product list and exposes grid accessors over it.
pub struct ProductsGridDataSource<S> {
    service: S,
    products: Option<Vec<SearchResultsProduct>>,
    state: GridState,
    generation: u64,
}

impl<S: ProductsService> ProductsGridDataSource<S> {
    /// Creates an empty data source backed by the given service.
    pub fn new(service: S) -> Self {
        Self { service, products: None, state: GridState::Empty, generation: 0 }
    }

    /// Returns the backing service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Returns the loaded products; `None` when nothing is loaded.
    pub fn products(&self) -> Option<&[SearchResultsProduct]> {
        self.products.as_deref()
    }

    /// Replaces the product list directly.
    pub fn set_products(&mut self, products: Option<Vec<SearchResultsProduct>>) {
        self.state = if products.is_some() { GridState::Populated } else { GridState::Empty };
        self.products = products;
    }

    /// Returns the current load state.
    pub fn state(&self) -> GridState {
        self.state
    }

    /// Searches through the service and applies the outcome.
    ///
    /// Products are replaced on success with results and cleared on no results
    /// or failure. The outcome is returned unchanged to the caller. Dropping the
    /// future before it completes cancels the load and keeps the previous list.
    pub async fn load_data(&mut self) -> SearchResult {
        let ticket = self.begin_load();
        let pending = PendingLoad { source: self, ticket: Some(ticket) };
        pending.run().await
    }

    /// Marks a new load as in flight and returns its ticket.
    ///
    /// Any ticket issued earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = GridState::Loading;
        debug!("Grid load {} started", self.generation);
        LoadTicket(self.generation)
    }

    /// Applies a search outcome if `ticket` is the latest one issued.
    ///
    /// Outcomes for stale tickets leave the grid untouched.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: SearchResult) -> SearchResult {
        if ticket.0 != self.generation {
            debug!("Ignoring stale grid load {} (current {})", ticket.0, self.generation);
            return result;
        }

        match &result {
            Ok(Some(products)) => {
                info!("Grid loaded {} products", products.len());
                self.set_products(Some(products.clone()));
            }
            Ok(None) => {
                info!("Grid search returned no results");
                self.set_products(None);
            }
            Err(e) => {
                warn!("Grid load failed: {}", e);
                self.set_products(None);
            }
        }

        result
    }

    /// Abandons an issued load without a result.
    ///
    /// The grid leaves `Loading` and keeps whatever list it held. Stale tickets are ignored.
    pub fn cancel_load(&mut self, ticket: LoadTicket) {
        if ticket.0 != self.generation || self.state != GridState::Loading {
            return;
        }

        debug!("Grid load {} cancelled", ticket.0);
        self.state =
            if self.products.is_some() { GridState::Populated } else { GridState::Empty };
    }

    /// Returns the product backing a grid position.
    pub fn product_for(&self, index_path: IndexPath) -> Option<&SearchResultsProduct> {
        if index_path.section != 0 {
            return None;
        }
        self.products.as_ref().and_then(|products| products.get(index_path.item))
    }
}

/// In-flight `load_data` call; cancels its ticket if dropped before finishing.
struct PendingLoad<'a, S: ProductsService> {
    source: &'a mut ProductsGridDataSource<S>,
    ticket: Option<LoadTicket>,
}

impl<S: ProductsService> PendingLoad<'_, S> {
    async fn run(mut self) -> SearchResult {
        let result = self.source.service.fetch_list().await;
        match self.ticket.take() {
            Some(ticket) => self.source.finish_load(ticket, result),
            None => result,
        }
    }
}

impl<S: ProductsService> Drop for PendingLoad<'_, S> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            self.source.cancel_load(ticket);
        }
    }
}

impl<S: ProductsService> GridDataSource for ProductsGridDataSource<S> {
    fn number_of_sections(&self) -> usize {
        1
    }

    fn number_of_items(&self, _section: usize) -> usize {
        self.products.as_ref().map_or(0, Vec::len)
    }

    fn item_at(&self, index_path: IndexPath) -> ProductCellModel {
        let count = self.number_of_items(index_path.section);
        let Some(product) = self.product_for(index_path) else {
            panic!("grid position {:?} is out of range ({} items)", index_path, count);
        };
        ProductCellModel::from_product(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DetailResult, Product, ServiceError};
    use crate::grid::render_cells;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Stub service returning a canned search outcome.
    struct ProductsServiceStub {
        outcome: Mutex<Option<SearchResult>>,
        never_responds: bool,
    }

    impl ProductsServiceStub {
        fn returning(outcome: SearchResult) -> Self {
            Self { outcome: Mutex::new(Some(outcome)), never_responds: false }
        }

        fn hanging() -> Self {
            Self { outcome: Mutex::new(None), never_responds: true }
        }

        fn empty() -> Self {
            Self::returning(Ok(None))
        }
    }

    #[async_trait]
    impl ProductsService for ProductsServiceStub {
        async fn fetch_list(&self) -> SearchResult {
            if self.never_responds {
                std::future::pending::<()>().await;
            }
            self.outcome.lock().unwrap().take().unwrap_or(Ok(None))
        }

        async fn fetch_product_details(&self, product_id: &str) -> DetailResult {
            Err(ServiceError::Status { url: format!("/products/{}", product_id), status: 500 })
        }
    }

    fn search_product() -> SearchResultsProduct {
        SearchResultsProduct::new("234", "A product", "123.00", "//img/234?")
    }

    fn failure() -> ServiceError {
        ServiceError::Status { url: "/products/search".to_string(), status: 400 }
    }

    #[test]
    fn test_single_section() {
        let data_source = ProductsGridDataSource::new(ProductsServiceStub::empty());
        assert_eq!(data_source.number_of_sections(), 1);
        assert_eq!(data_source.number_of_items(0), 0);
        assert_eq!(data_source.state(), GridState::Empty);
        assert!(data_source.products().is_none());
    }

    #[test]
    fn test_load_empty_clears_products() {
        let mut data_source = ProductsGridDataSource::new(ProductsServiceStub::empty());
        data_source.set_products(Some(vec![search_product()]));
        assert_eq!(data_source.state(), GridState::Populated);

        let result = tokio_test::block_on(data_source.load_data());
        assert!(matches!(result, Ok(None)));
        assert!(data_source.products().is_none());
        assert_eq!(data_source.state(), GridState::Empty);
    }

    #[test]
    fn test_load_error_clears_products() {
        let stub = ProductsServiceStub::returning(Err(failure()));
        let mut data_source = ProductsGridDataSource::new(stub);
        data_source.set_products(Some(vec![search_product()]));

        let result = tokio_test::block_on(data_source.load_data());
        assert_eq!(result.unwrap_err().status(), Some(400));
        assert!(data_source.products().is_none());
        assert_eq!(data_source.number_of_items(0), 0);
    }

    #[tokio::test]
    async fn test_load_products() {
        let stub = ProductsServiceStub::returning(Ok(Some(vec![search_product()])));
        let mut data_source = ProductsGridDataSource::new(stub);

        let result = data_source.load_data().await;
        assert_eq!(result.unwrap().map(|p| p.len()), Some(1));
        assert_eq!(data_source.products().map(<[_]>::len), Some(1));
        assert_eq!(data_source.number_of_items(0), 1);
        assert_eq!(data_source.state(), GridState::Populated);
    }

    #[tokio::test]
    async fn test_item_at_binds_cell() {
        let stub = ProductsServiceStub::returning(Ok(Some(vec![search_product()])));
        let mut data_source = ProductsGridDataSource::new(stub);
        data_source.load_data().await.unwrap();

        let cell = data_source.item_at(IndexPath::new(0, 0));
        assert_eq!(cell.title, "A product");
        assert_eq!(cell.price, "£123.00");
        assert_eq!(cell.image_url.as_deref(), Some("https://img/234?"));
    }

    #[tokio::test]
    async fn test_product_for_index_path() {
        let stub = ProductsServiceStub::returning(Ok(Some(vec![search_product()])));
        let mut data_source = ProductsGridDataSource::new(stub);
        data_source.load_data().await.unwrap();

        let product = data_source.product_for(IndexPath::new(0, 0));
        assert_eq!(product.map(|p| p.product_id.as_str()), Some("234"));
        assert!(data_source.product_for(IndexPath::new(0, 1)).is_none());
        assert!(data_source.product_for(IndexPath::new(1, 0)).is_none());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_item_at_out_of_range_panics() {
        let data_source = ProductsGridDataSource::new(ProductsServiceStub::empty());
        data_source.item_at(IndexPath::new(0, 0));
    }

    #[test]
    fn test_stale_load_is_ignored() {
        let mut data_source = ProductsGridDataSource::new(ProductsServiceStub::empty());

        let first = data_source.begin_load();
        let second = data_source.begin_load();
        assert_eq!(data_source.state(), GridState::Loading);

        let latest = SearchResultsProduct::new("2", "Latest", "2.00", "");
        data_source.finish_load(second, Ok(Some(vec![latest])));

        // The earlier request completes last and must not overwrite the grid
        let result = data_source.finish_load(first, Err(failure()));
        assert!(result.is_err());
        assert_eq!(data_source.state(), GridState::Populated);
        assert_eq!(data_source.products().unwrap()[0].title, "Latest");
    }

    #[tokio::test]
    async fn test_dropped_load_keeps_previous_list() {
        let mut data_source = ProductsGridDataSource::new(ProductsServiceStub::hanging());
        data_source.set_products(Some(vec![search_product()]));

        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(20), data_source.load_data())
                .await;
        assert!(timed_out.is_err());

        assert_eq!(data_source.state(), GridState::Populated);
        assert_eq!(data_source.number_of_items(0), 1);
    }

    #[tokio::test]
    async fn test_dropped_first_load_returns_to_empty() {
        let mut data_source = ProductsGridDataSource::new(ProductsServiceStub::hanging());

        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(20), data_source.load_data())
                .await;
        assert!(timed_out.is_err());

        assert_eq!(data_source.state(), GridState::Empty);
        assert!(data_source.products().is_none());
    }

    #[test]
    fn test_cancel_stale_ticket_is_ignored() {
        let mut data_source = ProductsGridDataSource::new(ProductsServiceStub::empty());

        let first = data_source.begin_load();
        let _second = data_source.begin_load();
        data_source.cancel_load(first);
        assert_eq!(data_source.state(), GridState::Loading);
    }

    #[tokio::test]
    async fn test_render_cells_in_order() {
        let products = vec![
            SearchResultsProduct::new("1", "First", "1.00", ""),
            SearchResultsProduct::new("2", "Second", "2.00", "//img/2"),
        ];
        let stub = ProductsServiceStub::returning(Ok(Some(products)));
        let mut data_source = ProductsGridDataSource::new(stub);
        data_source.load_data().await.unwrap();

        let cells = render_cells(&data_source);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].title, "First");
        assert!(cells[0].image_url.is_none());
        assert_eq!(cells[1].price, "£2.00");
    }

    #[tokio::test]
    async fn test_detail_fetch_through_service() {
        let data_source = ProductsGridDataSource::new(ProductsServiceStub::empty());
        let result: Result<Product, _> = data_source.service().fetch_product_details("9").await;
        assert_eq!(result.unwrap_err().url(), "/products/9");
    }
}
