//! Inbound adapters translating transport requests into dispatched domain
//! requests.

pub mod http;
