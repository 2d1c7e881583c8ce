pub mod config;
pub mod error;
pub mod git;
pub mod model;
pub mod output;
pub mod scan;

pub use config::Config;
pub use error::{Error, Result};
pub use model::{Branch, Commit, Project, Report};
