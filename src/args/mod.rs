//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;

#[cfg(test)]
mod tests;

pub use cli::{
    Command, ControlArgs, DemoArgs, LooperArgs, PageArgs, RecordsAction, RecordsArgs, SendAction,
    SendArgs, ServeArgs,
};

pub(crate) use defaults::default_playlist;
