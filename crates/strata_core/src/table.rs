//! # Data sources
//! A [`Table`] is a read-only view producing a lazy, restartable sequence of
//! rows. It also knows the [`Navigation`] that re-obtains it from the root
//! catalog, which is what compiled programs hold instead of the table itself.

use std::sync::Arc;

use crate::{
    error::SourceError,
    schema::Navigation,
    value::{ElementShape, Row},
};

pub type RowStream = Box<dyn Iterator<Item = Row> + Send>;

pub trait Table: Send + Sync {
    /// The static shape of every row produced.
    fn shape(&self) -> &ElementShape;

    /// How to re-obtain this table from the root catalog.
    fn navigation(&self) -> &Navigation;

    /// A fresh traversal from the start. Each call is independent of all
    /// others and has no side effects.
    fn rows(&self) -> Result<RowStream, SourceError>;
}

/// A table over an in-memory list of rows.
pub struct ListTable {
    shape: ElementShape,
    navigation: Navigation,
    rows: Arc<[Row]>,
}

impl ListTable {
    pub fn new(shape: ElementShape, navigation: Navigation, rows: impl IntoIterator<Item = Row>) -> Self {
        let rows: Arc<[Row]> = rows.into_iter().collect();
        assert!(
            rows.iter().all(|row| shape.admits(row)),
            "rows of a list table must have shape {shape}"
        );
        Self {
            shape,
            navigation,
            rows,
        }
    }
}

impl Table for ListTable {
    fn shape(&self) -> &ElementShape {
        &self.shape
    }

    fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    fn rows(&self) -> Result<RowStream, SourceError> {
        let rows = self.rows.clone();
        Ok(Box::new((0..rows.len()).map(move |i| rows[i].clone())))
    }
}
