pub mod cli;
pub mod input;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod resolver;

pub mod prelude {
    pub use crate::model::organism::Organism;
    pub use crate::model::table::Table;
    pub use crate::pipeline::attributes::{AttributeTable, MAPPING_KEY};
    pub use crate::pipeline::session::Session;
    pub use crate::pipeline::wheel::{INTERACTION_COLUMNS, WheelInput};
    pub use crate::resolver::Resolver;
}

#[cfg(test)]
#[path = "../tests/src_inline/support.rs"]
pub(crate) mod test_support;
