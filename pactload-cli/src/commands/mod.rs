pub mod broker;
pub mod folder;
mod report;
