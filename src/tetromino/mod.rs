//! Tetromino shapes, puzzle parameters, tiled layouts and their file formats

pub mod catalog;
pub mod puzzle;
pub mod layout;
pub mod io;

pub use catalog::{anchored_cells, Offset, Orientation, ShapeClass, UnknownShapeId};
pub use puzzle::PuzzleSpec;
pub use layout::Layout;
pub use io::{
    create_example_layouts, format_piece_list, load_layout_from_file, parse_piece_list,
    save_layout_to_file,
};
