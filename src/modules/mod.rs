// Vessel cross-referencing
// Registry loading, taxonomy parsing, and the join between the two

pub mod extractor;
pub mod registry;
pub mod taxonomy;
