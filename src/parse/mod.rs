//! Parsing module for the carousel block decorator
//!
//! This module turns authored markup snapshots into typed models:
//! the snapshot parser, the variant detector chain and the row classifier.

pub mod markup;
pub mod detect;
pub mod row;

// Re-export commonly used types
pub use markup::{parse_block, parse_block_with_sibling, parse_fragment, MarkupError};
pub use detect::{detect_variant, row_variant, Detection, Detector, Removal, SiblingUpdate, VariantOutcome};
pub use row::{classify_row, extract_image, keyword, parse_row, ParseIssue, RowClass};
