use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::application::GridController;
use crate::domain::{Cell, Column, DomainResult};

/// Columns and starting rows for a sheet.
///
/// Loaded from JSON of the form
/// `{ "columns": [{ "label": "2019", "width": "30%" }], "grid": [[{ "value": "1" }]] }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SheetConfig {
    pub columns: Vec<Column>,
    #[serde(default)]
    pub grid: Vec<Vec<Cell>>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        let columns = vec![
            Column::new("2019", "30%"),
            Column::new("2020", "20%"),
            Column::new("2021", "20%"),
            Column::new("2022", "20%").with_default(0.0),
        ];

        let seed_row = || vec![Cell::new("1"), Cell::new("2"), Cell::new("3"), Cell::new(4.0)];
        let mut grid: Vec<Vec<Cell>> = (0..14).map(|_| seed_row()).collect();
        grid[0][3] = Cell::new(4.0).with_attribute("data-foo", "bar");

        Self { columns, grid }
    }
}

impl SheetConfig {
    pub fn load(path: impl AsRef<Path>) -> DomainResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: SheetConfig = serde_json::from_str(&content)?;
        for column in &config.columns {
            column.parsed_width()?;
        }
        info!(path = %path.display(), columns = config.columns.len(), rows = config.grid.len(), "loaded sheet config");
        Ok(config)
    }

    pub fn into_controller(self) -> DomainResult<GridController> {
        GridController::new(self.columns, self.grid)
    }
}
