pub mod app;
pub mod blocks;
pub mod config;
pub mod db;
pub mod document;
pub mod focus;
pub mod ids;
pub mod interpreter;
pub mod logging;
pub mod menu;
pub mod session;
pub mod store;
pub mod surface;
pub mod writer;

pub use blocks::{Block, BlockId, BlockType};
pub use document::{Document, Removal};
pub use session::EditorSession;
pub use surface::{EditSurface, Key, KeyDisposition, KeyEvent, Modifiers, Point, Rect};
