//! External collaborators: the toolchain that runs build tools and the
//! fetcher that downloads and verifies sources.

pub mod cmd;
pub mod fetch;
pub mod types;

pub use cmd::{ProcessToolchain, Toolchain};
pub use fetch::{Fetcher, Resource};
pub use types::{FetchError, Invocation, ToolError, ToolOutput};
