//! # esa-client
//!
//! Gateway to the esa.io v1 posts API.
//!
//! This crate provides:
//! - Wire model: raw post records with typed accessors, typed payloads
//! - A [`Transport`] seam so callers can substitute scripted responses
//! - [`HttpTransport`], the `reqwest` implementation of that seam
//! - [`EsaClient`], which attaches the bearer credential to every call and
//!   classifies each HTTP outcome as success or failure

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod client;
pub mod model;
pub mod transport;

pub use client::{classify, EsaClient};
pub use model::{
    Author, Order, Post, PostInput, PostList, PostPatch, SearchParams, Sort, BODY_HTML, BODY_MD,
};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport, DEFAULT_BASE_URL};
