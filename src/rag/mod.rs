//! Retrieval-augmented generation seam.
//!
//! This module provides:
//! - `retrieval`: wire types and the `RetrievalService` trait, plus the
//!   HTTP client for the external orchestrator
//! - `chunker`: corpus loading and chunking for evaluation runs
//! - `keyword`: local keyword retriever over loaded chunks

pub mod chunker;
pub mod keyword;
pub mod retrieval;
