//! Top-level facade crate for taskdeck.
//!
//! Re-exports the core types and the server library so users can depend on a single crate.

pub mod core {
    pub use taskdeck_core::*;
}

pub mod server {
    pub use taskdeck_server::*;
}
