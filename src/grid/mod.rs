//! Grid data source feeding a single-section product grid.

pub mod cell;
pub mod data_source;

pub use cell::{ImageLoader, ProductCellModel};
pub use data_source::{GridState, LoadTicket, ProductsGridDataSource};

/// Position of a cell in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexPath {
    pub section: usize,
    pub item: usize,
}

impl IndexPath {
    /// Creates an index path.
    pub fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

/// Count and item accessors consumed by a grid renderer.
pub trait GridDataSource {
    /// Returns the number of sections in the grid.
    fn number_of_sections(&self) -> usize;

    /// Returns the number of items in a section.
    fn number_of_items(&self, section: usize) -> usize;

    /// Returns the cell for a position. Panics when the position is out of range.
    fn item_at(&self, index_path: IndexPath) -> ProductCellModel;
}

/// Walks every section and item in order, the way a renderer populates cells.
pub fn render_cells(source: &impl GridDataSource) -> Vec<ProductCellModel> {
    (0..source.number_of_sections())
        .flat_map(|section| {
            (0..source.number_of_items(section))
                .map(move |item| source.item_at(IndexPath::new(section, item)))
        })
        .collect()
}
