//! tinify-img の adapter 層

pub(crate) mod tinify_client;

#[cfg(test)]
pub(crate) mod memory_fs;
#[cfg(test)]
pub(crate) mod stub_service;

pub(crate) use tinify_client::TinifyClient;
