//! Client for the Kibela GraphQL API.
//!
//! [`KibelaClient`] sends a single GraphQL operation per call to the team
//! endpoint and hands back the `data` member of the response. The
//! [`GraphQLClient`] trait is the seam used by the MCP server so that tool
//! handlers can run against any implementation.

pub mod client;
pub mod config;
pub mod error;
pub mod model;

pub use client::{GraphQLClient, GraphQLRequest, KibelaClient};
pub use config::KibelaConfig;
pub use error::{ClientError, GraphQLError};
