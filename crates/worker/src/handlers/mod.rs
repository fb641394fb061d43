mod direct_index;
mod pre_reverse;
mod reverse_index;
mod tokenize;

pub use direct_index::direct_index;
pub use pre_reverse::pre_reverse;
pub use reverse_index::reverse_index;
pub use tokenize::tokenize;
