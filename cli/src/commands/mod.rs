pub mod inspect;
pub mod translate;

pub use inspect::{print_grammar, print_host_paths, print_mounts};
pub use translate::translate;
