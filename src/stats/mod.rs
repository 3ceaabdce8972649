// Statistics normalization core: the category table, the stat value
// extractor, the season mapper, the historical aggregator, and the
// comparison dataset builder.

pub mod aggregate;
pub mod categories;
pub mod compare;
pub mod extract;
