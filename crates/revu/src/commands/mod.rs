//! CLI subcommands.

mod publish;

pub use publish::PublishArgs;
