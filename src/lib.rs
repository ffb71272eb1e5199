//! gridview - virtualized canvas data grid for the web
//!
//! Renders and drives large data grids in the browser via WebAssembly and
//! Canvas 2D:
//! - Lazily measured geometry (millions of rows without layout rebuilds)
//! - Unified row/column/cell selection with additive merge
//! - Pointer-region hit testing (headers, handles, append affordances)
//! - Layered render pipeline with frozen panes
//! - Windowed image and sprite caches
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { WebGridView } from 'gridview';
//! await init();
//! const grid = new WebGridView(canvas, { rowCount: 100000, columns });
//! grid.setCellSource((col, row) => data[row][col]);
//! grid.on('selectionChanged', sel => console.log(sel));
//! ```
//!
//! The engine itself is target independent; everything outside
//! `viewer::web` runs (and is tested) natively.

// Engine modules
pub mod cache;
pub mod callbacks;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod regions;
pub mod scheduler;
pub mod scroll;
pub mod selection;
pub mod types;

// Rendering modules (Canvas 2D)
pub mod render;
pub mod viewer;

use wasm_bindgen::prelude::*;

// Re-export the main engine struct
pub use viewer::{GridOptions, GridView};

pub use error::{GridError, Result};
pub use selection::{CombinedSelection, SelectionKind};
pub use types::*;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
