pub mod gomod;
pub mod output;
pub mod walker;

pub use gomod::{find_go_mod, parse_go_directive, unit_version};
pub use output::{create_writer, open_destination, OutputFormat, OutputWriter};
pub use walker::{find_packages, GoPackage, PackageWalker};
