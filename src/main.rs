//! # photo-dumper CLI
//!
//! Command-line interface for the photo dumper.
//!
//! ## Usage
//! ```bash
//! photo-dumper dump ~/Downloads/phone ~/Pictures/Library
//! photo-dumper dump ~/Downloads/phone ~/Pictures/Library --dry-run --output json
//! ```

mod cli;

use photo_dumper::Result;

fn main() -> Result<()> {
    cli::run()
}
