//! PatternFly Documentation MCP Service
//!
//! This crate provides a Model Context Protocol (MCP) server exposing
//! PatternFly documentation from local files and the external PatternFly
//! mirrors. Repeated requests are served from bounded, sliding-expiration
//! in-memory caches instead of being re-fetched.
//!
//! # Features
//!
//! - Combine local documentation files and remote URLs into one response
//! - Independent sliding caches per source and per tool
//! - MCP server over stdio or SSE transports
//!
//! # Modules
//!
//! - [`cache`]: Generic memoization cache with sliding expiration
//! - [`docs`]: Token classification, fetching and document resolution
//! - [`mcp`]: MCP tools and protocol handling
//! - [`options`]: Run-time configuration
//! - [`server`]: Transport startup

pub mod cache;
pub mod docs;
pub mod mcp;
pub mod options;
pub mod server;
