pub mod block;
pub mod node;
pub mod record;

pub use block::{Block, BlockSet, CommandBlocks};
pub use node::NodeId;
pub use record::{FieldValue, ParseOutput, ParsedRecord};
