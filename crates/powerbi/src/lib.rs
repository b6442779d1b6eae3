//! Power BI REST client.
//!
//! Implements [`AnalyticsApi`](pbiembed_types::AnalyticsApi) over the
//! `v1.0/myorg/groups/{workspace}` endpoints: report listing, dataset lookup
//! and embed token generation.

pub mod client;
pub mod http_util;

pub use client::{PowerBiClient, PowerBiConnector};
